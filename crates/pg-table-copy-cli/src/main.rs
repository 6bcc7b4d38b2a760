//! pg-table-copy CLI - copy one table between two PostgreSQL environments.

use clap::Parser;
use pg_table_copy::{
    ConfigStore, CopyEvent, CopyFailure, CopyOrchestrator, CopyReporter, CopyResult, PgConnector,
    TracingReporter, EXIT_RUNTIME_ERROR,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};

/// Exit code for a malformed command line.
const EXIT_USAGE: u8 = 1;

#[derive(Parser)]
#[command(name = "pg-table-copy")]
#[command(about = "Copy one table between two configured PostgreSQL environments")]
#[command(version)]
struct Cli {
    /// Environment to read rows from
    source_env: String,

    /// Environment to append rows to
    target_env: String,

    /// Path to YAML configuration file
    #[arg(short, long, default_value = pg_table_copy::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

/// Prints progress to stdout as the copy runs.
struct ConsoleReporter;

impl CopyReporter for ConsoleReporter {
    fn report(&self, event: &CopyEvent) {
        match event {
            CopyEvent::CloseFailed { .. } => eprintln!("Warning: {}", event),
            _ => println!("{}", event),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through the error path too.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    setup_logging(&cli.verbosity, &cli.log_format);

    match run(&cli).await {
        Ok(result) => {
            if cli.output_json {
                match result.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("ERROR: failed to serialize result: {}", e);
                        return ExitCode::from(EXIT_RUNTIME_ERROR);
                    }
                }
            } else {
                println!("\nCopy completed!");
                println!(
                    "  From: {} -> {}",
                    result.source_environment, result.target_environment
                );
                println!("  Table: {}", result.table);
                println!("  Rows: {}", result.rows_inserted);
                println!("  Duration: {:.2}s", result.duration_seconds);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<CopyResult, CopyFailure> {
    let store = ConfigStore::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    // Keep stdout clean for the JSON document.
    let reporter: Arc<dyn CopyReporter> = if cli.output_json {
        Arc::new(TracingReporter)
    } else {
        Arc::new(ConsoleReporter)
    };

    CopyOrchestrator::new(Arc::new(store), Arc::new(PgConnector::new()))
        .with_reporter(reporter)
        .run(&cli.source_env, &cli.target_env)
        .await
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pg-table-copy", "qa", "staging"]).unwrap();
        assert_eq!(cli.source_env, "qa");
        assert_eq!(cli.target_env, "staging");
        assert_eq!(cli.config, PathBuf::from("db_config.yaml"));
        assert!(!cli.output_json);
        assert_eq!(cli.log_format, "text");
        assert_eq!(cli.verbosity, "info");
    }

    #[test]
    fn test_wrong_argument_count_is_usage_error() {
        for args in [
            vec!["pg-table-copy"],
            vec!["pg-table-copy", "qa"],
            vec!["pg-table-copy", "qa", "staging", "prod"],
        ] {
            let err = match Cli::try_parse_from(args) {
                Err(e) => e,
                Ok(_) => panic!("expected a usage error"),
            };
            assert!(err.use_stderr());
        }
    }
}
