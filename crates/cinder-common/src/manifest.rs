use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name searched for when locating a project manifest.
pub const MANIFEST_FILE: &str = "Cinder.toml";

/// Extension every Cinder source file carries.
pub const SOURCE_EXTENSION: &str = "cin";

/// The parsed Cinder.toml manifest.
#[derive(Debug, Clone)]
pub struct CinderManifest {
    pub project: ProjectSection,
    pub scan: ScanSection,
    /// The directory containing the Cinder.toml file.
    pub root_dir: PathBuf,
}

impl CinderManifest {
    /// The entry source file, resolved against the manifest directory.
    pub fn entry_path(&self) -> PathBuf {
        self.root_dir.join(&self.project.entry)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    pub version: String,
    pub entry: String,
}

/// Defaults for the token dump; command-line flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanSection {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub quiet: bool,
}

/// How the token stream is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize)]
struct RawManifest {
    project: ProjectSection,
    #[serde(default)]
    scan: ScanSection,
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("no Cinder.toml found (searched from {0})")]
    NotFound(String),
    #[error("failed to read Cinder.toml: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid Cinder.toml: {0}")]
    ParseError(String),
    #[error("invalid Cinder.toml: [project] name must not be empty")]
    EmptyName,
    #[error("invalid Cinder.toml: entry '{0}' is not a .cin source file")]
    BadEntry(String),
}

/// Walk up from `start_dir` looking for `Cinder.toml`.
/// Returns the path to the manifest file if found.
pub fn find_manifest(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a Cinder.toml manifest from a file path.
pub fn load_manifest(path: &Path) -> Result<CinderManifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let root_dir = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    parse_manifest(&content, root_dir)
}

/// Parse and validate a Cinder.toml manifest from a string.
pub fn parse_manifest(content: &str, root_dir: PathBuf) -> Result<CinderManifest, ManifestError> {
    let raw: RawManifest =
        toml::from_str(content).map_err(|e| ManifestError::ParseError(e.to_string()))?;

    if raw.project.name.trim().is_empty() {
        return Err(ManifestError::EmptyName);
    }
    let is_source = Path::new(&raw.project.entry)
        .extension()
        .is_some_and(|ext| ext == SOURCE_EXTENSION);
    if !is_source {
        return Err(ManifestError::BadEntry(raw.project.entry));
    }

    Ok(CinderManifest {
        project: raw.project,
        scan: raw.scan,
        root_dir,
    })
}

/// Find and load the manifest starting from a directory.
pub fn find_and_load_manifest(start_dir: &Path) -> Result<CinderManifest, ManifestError> {
    let manifest_path = find_manifest(start_dir)
        .ok_or_else(|| ManifestError::NotFound(start_dir.display().to_string()))?;
    load_manifest(&manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_manifest() {
        let toml = r#"
[project]
name = "demo"
version = "0.1.0"
entry = "src/main.cin"
"#;
        let manifest = parse_manifest(toml, PathBuf::from("/work")).unwrap();
        assert_eq!(manifest.project.name, "demo");
        assert_eq!(manifest.project.version, "0.1.0");
        assert_eq!(manifest.scan.format, OutputFormat::Text);
        assert!(!manifest.scan.quiet);
        assert_eq!(manifest.entry_path(), PathBuf::from("/work/src/main.cin"));
    }

    #[test]
    fn parse_scan_section() {
        let toml = r#"
[project]
name = "demo"
version = "0.1.0"
entry = "main.cin"

[scan]
format = "json"
quiet = true
"#;
        let manifest = parse_manifest(toml, PathBuf::from(".")).unwrap();
        assert_eq!(manifest.scan.format, OutputFormat::Json);
        assert!(manifest.scan.quiet);
    }

    #[test]
    fn unknown_format_fails() {
        let toml = r#"
[project]
name = "demo"
version = "0.1.0"
entry = "main.cin"

[scan]
format = "yaml"
"#;
        let err = parse_manifest(toml, PathBuf::from(".")).unwrap_err();
        assert!(matches!(err, ManifestError::ParseError(_)));
    }

    #[test]
    fn missing_project_section_fails() {
        let err = parse_manifest("[scan]\nquiet = true\n", PathBuf::from(".")).unwrap_err();
        assert!(matches!(err, ManifestError::ParseError(_)));
    }

    #[test]
    fn empty_name_rejected() {
        let toml = "[project]\nname = \"  \"\nversion = \"0.1.0\"\nentry = \"main.cin\"\n";
        let err = parse_manifest(toml, PathBuf::from(".")).unwrap_err();
        assert!(matches!(err, ManifestError::EmptyName));
    }

    #[test]
    fn non_source_entry_rejected() {
        let toml = "[project]\nname = \"demo\"\nversion = \"0.1.0\"\nentry = \"main.txt\"\n";
        let err = parse_manifest(toml, PathBuf::from(".")).unwrap_err();
        assert!(matches!(err, ManifestError::BadEntry(ref e) if e == "main.txt"));
        assert_eq!(
            err.to_string(),
            "invalid Cinder.toml: entry 'main.txt' is not a .cin source file"
        );
    }

    #[test]
    fn find_manifest_walks_up() {
        let tmp = std::env::temp_dir().join("cinder_test_manifest");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(tmp.join("src/nested")).unwrap();
        std::fs::write(
            tmp.join(MANIFEST_FILE),
            "[project]\nname = \"test\"\nversion = \"0.1.0\"\nentry = \"src/main.cin\"\n",
        )
        .unwrap();

        let found = find_manifest(&tmp.join("src/nested"));
        assert_eq!(found, Some(tmp.join(MANIFEST_FILE)));

        let manifest = find_and_load_manifest(&tmp.join("src/nested")).unwrap();
        assert_eq!(manifest.root_dir, tmp);
        assert_eq!(manifest.entry_path(), tmp.join("src/main.cin"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
