use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ini::{Document, Lookup, Section, Syntax};
use tracing_subscriber::EnvFilter;

/// Inspect, check and reformat INI documents.
#[derive(Debug, Parser)]
#[command(name = "ini", version, about)]
struct Cli {
    #[command(flatten)]
    syntax: SyntaxArgs,

    /// Raise log verbosity (-v for debug, -vv for trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SyntaxArgs {
    /// Characters that start a comment.
    #[arg(long, global = true, value_name = "CHARS")]
    comment_prefixes: Option<String>,

    /// Key/value delimiters, highest precedence first.
    #[arg(long, global = true, value_name = "CHARS")]
    delimiters: Option<String>,

    /// Trim whitespace inside section brackets.
    #[arg(long, global = true)]
    trim_section_names: bool,
}

impl SyntaxArgs {
    fn to_syntax(&self) -> Syntax {
        let defaults = Syntax::default();

        Syntax {
            comment_prefixes: self
                .comment_prefixes
                .as_ref()
                .map_or(defaults.comment_prefixes, |s| s.chars().collect()),
            delimiters: self
                .delimiters
                .as_ref()
                .map_or(defaults.delimiters, |s| s.chars().collect()),
            trim_section_names: self.trim_section_names,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one value.
    Get {
        /// Input file, or `-` for stdin.
        path: PathBuf,
        key: String,
        /// Look the key up in this section instead of the top level.
        #[arg(short, long)]
        section: Option<String>,
        /// Convert the value before printing it.
        #[arg(long = "as", value_enum, default_value_t = Kind::Str)]
        kind: Kind,
    },
    /// Print the document in canonical form.
    Fmt { path: PathBuf },
    /// Print the document as JSON.
    Json {
        path: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Read a JSON document and print it as INI.
    FromJson { path: PathBuf },
    /// Parse the document and report the first error, if any.
    Check { path: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Str,
    Int,
    Float,
    Bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let syntax = cli.syntax.to_syntax();
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Command::Get {
            path,
            key,
            section,
            kind,
        } => {
            let document = load(path, &syntax)?;
            let value = match section {
                Some(name) => {
                    let section: &Section = document
                        .section(name)
                        .with_context(|| format!("no section named `{name}`"))?;
                    render(section, key, *kind)?
                }
                None => render(&document, key, *kind)?,
            };

            match value {
                Some(value) => writeln!(stdout, "{value}")?,
                None => bail!("`{key}` has no value"),
            }
        }
        Command::Fmt { path } => {
            let document = load(path, &syntax)?;
            ini::write(&document, &mut stdout)?;
        }
        Command::Json { path, pretty } => {
            let document = load(path, &syntax)?;
            if *pretty {
                serde_json::to_writer_pretty(&mut stdout, &document)?;
            } else {
                serde_json::to_writer(&mut stdout, &document)?;
            }
            writeln!(stdout)?;
        }
        Command::FromJson { path } => {
            let text = read_input(path)?;
            let document: Document = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON document", path.display()))?;
            ini::write(&document, &mut stdout)?;
        }
        Command::Check { path } => {
            let document = load(path, &syntax)?;
            tracing::debug!(entries = document.len(), "document is valid");
            writeln!(stdout, "ok")?;
        }
    }

    Ok(())
}

/// Look up `key` and convert it per `kind`. Missing, unset and empty values all come back as
/// `None`.
fn render<L>(scope: &L, key: &str, kind: Kind) -> anyhow::Result<Option<String>>
where
    L: Lookup,
{
    let value = match kind {
        Kind::Str => scope.get_str(key).map(str::to_owned),
        Kind::Int => scope.get_int(key)?.map(|n| n.to_string()),
        Kind::Float => scope.get_float(key)?.map(|n| n.to_string()),
        Kind::Bool => scope.get_bool(key)?.map(|b| b.to_string()),
    };

    Ok(value)
}

fn load(path: &Path, syntax: &Syntax) -> anyhow::Result<Document> {
    let text = read_input(path)?;
    ini::read_with(&text, syntax).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}
