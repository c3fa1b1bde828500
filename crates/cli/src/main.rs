mod config;
mod logging;
mod report;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use quickbatch_core::{Batch, BatchParser, ParserOptions, TrailingFields};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Batch command language toolchain.
#[derive(Parser)]
#[command(
    name = "quickbatch",
    version,
    about = "Batch command language parser and previewer"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a TOML config file (default: ./quickbatch.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log parser decisions at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Ignore a trailing key that has no value instead of rejecting the line
    #[arg(long, global = true)]
    lenient: bool,

    /// Parse lines in parallel
    #[arg(long, global = true)]
    parallel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a script and print the batch preview
    Parse {
        /// Path to the script file, or '-' for stdin
        script: PathBuf,
        /// Batch name
        #[arg(long, default_value = "batch")]
        name: String,
        /// Owning user
        #[arg(long, default_value = "anonymous")]
        user: String,
    },

    /// Parse a script and fail if any line is rejected
    Check {
        /// Path to the script file, or '-' for stdin
        script: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };
    logging::init_logging(config.logging.filter.as_deref(), cli.verbose);

    let mut options = config.parser;
    if cli.lenient {
        options.trailing_fields = TrailingFields::Lenient;
    }
    if cli.parallel {
        options.parallel = true;
    }

    match cli.command {
        Commands::Parse { script, name, user } => {
            cmd_parse(&script, &name, &user, options, cli.output, cli.quiet);
        }
        Commands::Check { script } => {
            cmd_check(&script, options, cli.output, cli.quiet);
        }
    }
}

/// Read the script text. The file's final line terminator is dropped so it
/// does not show up as an empty trailing command.
fn read_script(path: &Path) -> Result<String, String> {
    let mut text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("error reading stdin: {}", e))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("error reading file '{}': {}", path.display(), e))?
    };
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn parse_batch(
    path: &Path,
    name: &str,
    user: &str,
    options: ParserOptions,
    output: OutputFormat,
    quiet: bool,
) -> Batch {
    let script = match read_script(path) {
        Ok(s) => s,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    tracing::debug!(path = %path.display(), bytes = script.len(), "read script");
    BatchParser::new()
        .with_options(options)
        .parse(name, user, &script)
}

fn cmd_parse(
    path: &Path,
    name: &str,
    user: &str,
    options: ParserOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let batch = parse_batch(path, name, user, options, output, quiet);
    match output {
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&batch.to_json_value())
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            if quiet {
                println!(
                    "{} command(s), {} error(s)",
                    batch.len(),
                    batch.error_count()
                );
            } else {
                print!("{}", report::render_preview(&batch));
            }
        }
    }
}

fn cmd_check(path: &Path, options: ParserOptions, output: OutputFormat, quiet: bool) {
    let name = path.display().to_string();
    let batch = parse_batch(path, &name, "anonymous", options, output, quiet);
    let valid = !batch.has_errors();

    match output {
        OutputFormat::Json => {
            let errors: Vec<_> = batch
                .commands()
                .iter()
                .filter_map(|c| {
                    c.error_message().map(|message| {
                        serde_json::json!({
                            "index": c.index(),
                            "raw": c.raw(),
                            "message": message,
                        })
                    })
                })
                .collect();
            let json = serde_json::json!({
                "valid": valid,
                "commands": batch.len(),
                "errors": errors,
            });
            let pretty = serde_json::to_string_pretty(&json).unwrap_or_default();
            if valid {
                println!("{}", pretty);
            } else {
                eprintln!("{}", pretty);
            }
        }
        OutputFormat::Text => {
            if valid {
                if !quiet {
                    println!("valid: {} command(s)", batch.len());
                }
            } else if !quiet {
                eprintln!(
                    "invalid: {} of {} command(s) rejected",
                    batch.error_count(),
                    batch.len()
                );
                eprint!("{}", report::render_errors(&batch));
            }
        }
    }

    if !valid {
        process::exit(1);
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
