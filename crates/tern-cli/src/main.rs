//! Tern front-end CLI

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tern_error::{DiagnosticRenderer, Diagnostics, SourceCache};
use tern_lexer::scan;
use tern_parser::{parse, printer, shape, Node, TranslationUnit};
use thiserror::Error;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "tern")]
#[command(author = "Guilherme Mendes")]
#[command(version)]
#[command(about = "Tern language front end", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Prints diagnostics without ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Logs front-end progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Shows file tokens
    Lex {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Prints the tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Shows the syntax tree of a file
    Parse {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Reports every scan and syntax error in a file
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Prints a file in canonical form
    Fmt {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Rewrites the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot serialize tokens: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} error(s) found")]
    Invalid(usize),
}

/// A source file registered with the diagnostic cache
struct Input {
    cache: SourceCache,
    file_id: u32,
    source: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(&cli) {
        eprintln!("error: {error}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Lex { input, json } => {
            let file = read(input)?;
            let scanned = scan(&file.source);

            if *json {
                println!("{}", serde_json::to_string_pretty(&scanned.tokens)?);
            } else {
                for token in &scanned.tokens {
                    println!(
                        "  {:4}:{:<3}  {:<18}  {:?}",
                        token.location.line,
                        token.location.column,
                        format!("{:?}", token.lexeme),
                        token.text
                    );
                }
                println!("\nTotal: {} tokens", scanned.tokens.len());
            }

            let diagnostics = Diagnostics::collect(&scanned.errors, &[], file.file_id);
            report(cli, &file, &diagnostics)
        }

        Commands::Parse { input } => {
            let file = read(input)?;
            let result = parse(&file.source);
            println!("{}", outline(&result.unit));
            report(cli, &file, &result.diagnostics(file.file_id))
        }

        Commands::Check { input } => {
            let file = read(input)?;
            let result = parse(&file.source);
            report(cli, &file, &result.diagnostics(file.file_id))?;
            println!("{}: no errors found", input.display());
            Ok(())
        }

        Commands::Fmt { input, write } => {
            let file = read(input)?;
            let result = parse(&file.source);
            report(cli, &file, &result.diagnostics(file.file_id))?;

            let formatted = printer::print(&result.unit);
            if *write {
                fs::write(input, &formatted).map_err(|source| CliError::Write {
                    path: input.clone(),
                    source,
                })?;
                debug!(file = %input.display(), "rewrote file");
            } else {
                print!("{formatted}");
            }
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<Input, CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cache = SourceCache::new();
    let file_id = cache.add(path.display().to_string(), source.clone());
    Ok(Input {
        cache,
        file_id,
        source,
    })
}

/// Prints diagnostics to stderr and fails if there are any
fn report(cli: &Cli, input: &Input, diagnostics: &Diagnostics) -> Result<(), CliError> {
    if diagnostics.is_empty() {
        return Ok(());
    }

    let mut renderer = DiagnosticRenderer::new(&input.cache);
    if cli.no_color {
        renderer = renderer.without_colors();
    }
    eprintln!("{}", diagnostics.render(&renderer));
    Err(CliError::Invalid(diagnostics.len()))
}

/// One S-expression per top-level item
fn outline(unit: &Node) -> String {
    match unit.try_cast::<TranslationUnit>() {
        Ok(unit) => unit
            .children()
            .into_iter()
            .map(shape)
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => shape(unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn source_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tern").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let parsed = cli(&["lex", "a.tn", "--json", "--no-color"]);
        assert!(parsed.no_color);
        assert!(!parsed.verbose);
        assert!(matches!(parsed.command, Commands::Lex { json: true, .. }));
    }

    #[test]
    fn test_check_clean_file() {
        let file = source_file("module m;\nx: Int = 1;\n");
        let path = file.path().to_str().unwrap();
        assert!(run(&cli(&["check", path])).is_ok());
    }

    #[test]
    fn test_check_reports_errors() {
        let file = source_file("module;\nx = ;\n");
        let path = file.path().to_str().unwrap();
        let result = run(&cli(&["--no-color", "check", path]));
        assert!(matches!(result, Err(CliError::Invalid(2))));
    }

    #[test]
    fn test_missing_file() {
        let result = run(&cli(&["parse", "/nonexistent/input.tn"]));
        assert!(matches!(result, Err(CliError::Read { .. })));
    }

    #[test]
    fn test_fmt_write() {
        let file = source_file("module m;x=1+2;");
        let path = file.path().to_str().unwrap();
        run(&cli(&["fmt", "--write", path])).unwrap();
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "module m;\n\nx = 1 + 2;\n"
        );
    }

    #[test]
    fn test_outline() {
        let result = parse("module m; import io; f = 1;");
        assert_eq!(
            outline(&result.unit),
            "(module m)\n(imports (import io))\n(def (decl f ()) 1)"
        );
    }
}
