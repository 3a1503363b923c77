//! # sqlscan
//!
//! Tokenize SQL scripts or split them into statements.

use clap::{Args, Parser, Subcommand};
use sql_scanner::config::runtime::{parse_log_level, RuntimeConfig};
use sql_scanner::logging::{self, LogCrateLogger, LogLevel, LoggingService};
use sql_scanner::{log_error, log_info};
use sql_scanner_cli::{load_config, load_dialect, read_script, run_split, run_tokens, CliError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "sqlscan", version, about = "Rule-based SQL script scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Runtime preferences (TOML with [scanner], [splitter] and [logging] tables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimum log level (error, warn, info, debug)
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LogLevel>,

    /// Emit log events as JSON lines
    #[arg(long, global = true)]
    structured_logs: bool,

    /// Route log events through env_logger (honours RUST_LOG)
    #[arg(long, global = true)]
    env_log: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every token with its offset, length and type
    Tokens(ScriptArgs),

    /// Print the statements of a script
    Split {
        #[command(flatten)]
        script: ScriptArgs,

        /// Keep the trailing `;` on each statement
        #[arg(long)]
        keep_delimiters: bool,

        /// Treat comment-only chunks as statements
        #[arg(long)]
        comment_statements: bool,
    },
}

#[derive(Debug, Args)]
struct ScriptArgs {
    /// SQL script to scan
    file: PathBuf,

    /// Dialect definition (TOML); defaults to a generic dialect
    #[arg(long)]
    dialect: Option<PathBuf>,

    /// JSON output
    #[arg(long)]
    json: bool,
}

fn parse_level(value: &str) -> Result<LogLevel, String> {
    parse_log_level(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

fn init_logging(cli: &Cli, config: &RuntimeConfig) -> Result<(), String> {
    let mut preferences = config.logging.clone();
    if let Some(level) = cli.log_level {
        preferences.min_log_level = level;
    }
    preferences.use_structured_logging |= cli.structured_logs;
    let min_level = preferences.min_log_level;
    logging::config::init_runtime_preferences(preferences)?;

    if cli.env_log {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .try_init()
            .map_err(|e| e.to_string())?;
        let service = LoggingService::new(Arc::new(LogCrateLogger), min_level);
        logging::init_global_logging_with_service(Arc::new(service))
    } else {
        logging::init_global_logging()
    }
}

fn run(cli: &Cli, config: RuntimeConfig) -> Result<String, CliError> {
    let scanner_preferences = config.scanner;
    match &cli.command {
        Command::Tokens(script) => {
            let dialect = load_dialect(script.dialect.as_deref())?;
            let document = read_script(&script.file)?;
            let output = logging::with_file_context(script.file.clone(), || {
                run_tokens(&document, dialect, scanner_preferences, script.json)
            })?;
            Ok(output)
        }
        Command::Split {
            script,
            keep_delimiters,
            comment_statements,
        } => {
            let dialect = load_dialect(script.dialect.as_deref())?;
            let document = read_script(&script.file)?;
            let mut splitter_preferences = config.splitter;
            splitter_preferences.keep_delimiters |= *keep_delimiters;
            splitter_preferences.comment_only_statements |= *comment_statements;
            let output = logging::with_file_context(script.file.clone(), || {
                run_split(
                    &document,
                    dialect,
                    scanner_preferences,
                    splitter_preferences,
                    script.json,
                )
            })?;
            Ok(output)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = sql_scanner::lexical::validate_limits() {
        log_error!(logging::codes::system::INITIALIZATION_FAILURE, "Scanner limits rejected",
            "error" => e
        );
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    log_info!("sqlscan starting",
        "version" => env!("CARGO_PKG_VERSION"),
        "limits" => sql_scanner::config::build_info::profile_file()
    );

    match run(&cli, config) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!(e.error_code(), "sqlscan failed", "error" => e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
