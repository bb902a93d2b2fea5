use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, info};

use cinder_common::manifest::{self, CinderManifest, ManifestError, OutputFormat};
use cinder_common::Diagnostic;
use cinder_compiler::lexer::{Scanner, Token};

mod logging;

/// Cinder language scanner.
///
/// Tokenizes a .cin source file and prints the token stream.
#[derive(Parser, Debug)]
#[command(
    name = "cinderc",
    version,
    about,
    long_about = "Cinder language scanner.\n\nTokenizes a .cin source file and prints one token per line.\nWithout INPUT, the entry file of the nearest Cinder.toml is used.\n\nExamples:\n  cinderc hello.cin                 Print the token stream\n  cinderc hello.cin --format json   Print tokens as JSON\n  cinderc --check                   Check the project entry for errors only"
)]
struct Cli {
    /// Input .cin source file (default: the manifest's entry).
    input: Option<PathBuf>,

    /// Token output format (default: from Cinder.toml, else text).
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Check for lexical errors without printing tokens.
    #[arg(long)]
    check: bool,

    /// Print only diagnostics.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read '{path}': {source}")]
    Read { path: String, source: io::Error },
    #[error("no input file given and no Cinder.toml found (searched from {0})")]
    NoInput(String),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("failed to serialize tokens: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Command-line flags merged over manifest defaults.
#[derive(Debug)]
struct Settings {
    input: PathBuf,
    format: Format,
    check: bool,
    quiet: bool,
}

impl Settings {
    fn resolve(cli: Cli, manifest: Option<&CinderManifest>) -> Result<Self, CliError> {
        let input = match (cli.input, manifest) {
            (Some(input), _) => input,
            (None, Some(m)) => m.entry_path(),
            (None, None) => return Err(CliError::NoInput(".".to_string())),
        };
        let scan = manifest.map(|m| m.scan.clone()).unwrap_or_default();
        Ok(Self {
            input,
            format: cli.format.unwrap_or_else(|| scan.format.into()),
            check: cli.check,
            quiet: cli.quiet || scan.quiet,
        })
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(CliError::from)
        .and_then(|cwd| run(cli, &cwd, &mut io::stdout().lock()));
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Directory the manifest search starts from. Always absolute when `cwd`
/// is, so the walk up covers every ancestor of a relative input.
fn manifest_search_dir(input: Option<&Path>, cwd: &Path) -> PathBuf {
    match input.and_then(Path::parent) {
        Some(parent) => cwd.join(parent),
        None => cwd.to_path_buf(),
    }
}

/// Scan one file; tokens and the `--check` summary go to `out`, diagnostics
/// to stderr.
fn run(cli: Cli, cwd: &Path, out: &mut impl Write) -> Result<ExitCode, CliError> {
    let search_dir = manifest_search_dir(cli.input.as_deref(), cwd);
    let manifest = match manifest::find_and_load_manifest(&search_dir) {
        Ok(m) => {
            debug!(project = %m.project.name, root = %m.root_dir.display(), "loaded manifest");
            Some(m)
        }
        Err(ManifestError::NotFound(_)) if cli.input.is_some() => None,
        Err(ManifestError::NotFound(dir)) => return Err(CliError::NoInput(dir)),
        Err(e) => return Err(e.into()),
    };
    let settings = Settings::resolve(cli, manifest.as_ref())?;

    let source =
        fs::read_to_string(cwd.join(&settings.input)).map_err(|source| CliError::Read {
            path: settings.input.display().to_string(),
            source,
        })?;
    let file_name = settings
        .input
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    info!(file = %file_name, bytes = source.len(), "scanning");
    let (tokens, diags) = Scanner::new(&source, &file_name).tokenize();

    for diag in diags.diagnostics() {
        print_diagnostic(diag, &source, &file_name)?;
    }

    if settings.check {
        if diags.has_errors() {
            writeln!(out, "{} lexical error(s) found.", diags.error_count())?;
        } else {
            writeln!(out, "No lexical errors.")?;
        }
    } else if !settings.quiet {
        match settings.format {
            Format::Text => write!(out, "{}", render_text(&tokens))?,
            Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&tokens)?)?,
        }
    }

    Ok(if diags.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// One token per line: `line:column KIND "lexeme"`.
fn render_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let start = token.span().start;
        out.push_str(&format!(
            "{:>4}:{:<3} {:?} {:?}\n",
            start.line,
            start.column,
            token.kind(),
            token.lexeme(),
        ));
    }
    out
}

/// ariadne counts offsets in chars, spans count bytes.
fn char_index(source: &str, byte_offset: usize) -> usize {
    let end = byte_offset.min(source.len());
    source[..end].chars().count()
}

fn print_diagnostic(diag: &Diagnostic, source: &str, file_name: &str) -> io::Result<()> {
    let start = char_index(source, diag.span.start.offset);
    let end = char_index(source, diag.span.end.offset).max(start + 1);

    let mut report = Report::build(ReportKind::Error, file_name, start)
        .with_message(&diag.message)
        .with_label(
            Label::new((file_name, start..end))
                .with_message(&diag.message)
                .with_color(Color::Red),
        );

    if let Some(ref suggestion) = diag.suggestion {
        report = report.with_help(suggestion);
    }

    report
        .finish()
        .eprint((file_name, Source::from(source)))
}
