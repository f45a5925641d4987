//! loginprobe CLI - Main Entry Point
//!
//! Runs the login page suite, lists its cases, probes the page's error
//! messages and shows the effective configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

mod commands;
mod output;

use commands::{config, diagnose, list, run};
use loginprobe_common::{LoadOptions, SuiteConfig};
use loginprobe_e2e::E2eError;

/// Exit code for runtime failures outside the suite itself
const RUNTIME_ERROR: i32 = 1;

/// Exit code for usage and configuration errors
const USAGE_ERROR: i32 = 4;

/// loginprobe - Browser checks for the login page
#[derive(Parser)]
#[command(name = "loginprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./loginprobe.toml when present)
    #[arg(long, global = true, env = "LOGINPROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Env file loaded before reading the environment (defaults to ./.env)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite
    Run(run::RunArgs),

    /// List collected cases
    List(list::ListArgs),

    /// Check that the page shows its validation errors
    Diagnose,

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not errors
            let code = if e.use_stderr() { USAGE_ERROR } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            error_exit_code(&e)
        }
    };
    std::process::exit(code);
}

/// Argument and configuration problems exit with 4, anything else with 1
fn error_exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<loginprobe_common::Error>().is_some() {
        return USAGE_ERROR;
    }
    match error.downcast_ref::<E2eError>() {
        Some(
            E2eError::InvalidExpression(_) | E2eError::UnsupportedBrowser(_) | E2eError::Config(_),
        ) => USAGE_ERROR,
        _ => RUNTIME_ERROR,
    }
}

async fn execute(cli: Cli) -> anyhow::Result<i32> {
    let options = LoadOptions {
        config_path: cli.config,
        env_file: cli.env_file,
    };

    let load = || -> anyhow::Result<SuiteConfig> {
        let config = SuiteConfig::load(&options)?;
        debug!("Loaded configuration for {}", config.base_url);
        Ok(config)
    };

    match cli.command {
        Commands::List(args) => list::execute(args),
        Commands::Run(args) => run::execute(args, load()?).await,
        Commands::Diagnose => diagnose::execute(load()?).await,
        Commands::Config(args) => config::execute(args, &load()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loginprobe_common::BrowserKind;
    use loginprobe_e2e::TraceStyle;
    use test_case::test_case;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = parse(&[
            "loginprobe", "run", "-k", "email and not smoke", "-m", "boundary", "--tb", "short",
            "-x", "-s", "--browser", "edge", "--headless",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.keyword.as_deref(), Some("email and not smoke"));
        assert_eq!(args.marker.as_deref(), Some("boundary"));
        assert_eq!(args.tb, TraceStyle::Short);
        assert!(args.exit_first);
        assert!(args.no_capture);
        assert_eq!(args.browser, Some(BrowserKind::Edge));
        assert!(args.headless);
    }

    #[test_case(&["loginprobe", "run"], false; "captured by default")]
    #[test_case(&["loginprobe", "run", "-s"], true; "short flag")]
    #[test_case(&["loginprobe", "run", "--capture=no"], true; "capture no")]
    #[test_case(&["loginprobe", "run", "--capture", "fd"], false; "capture fd")]
    fn test_capture_flags(args: &[&str], shown: bool) {
        let Commands::Run(args) = parse(args).command else {
            panic!("expected run");
        };
        assert_eq!(args.show_output(), shown);
    }

    #[test]
    fn test_run_overrides_config() {
        let cli = parse(&[
            "loginprobe", "run", "--base-url", "http://127.0.0.1:5500/", "--headless",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        let mut config = SuiteConfig::default();
        args.apply(&mut config);
        assert_eq!(config.base_url, "http://127.0.0.1:5500/");
        assert!(config.headless);
        assert_eq!(config.browser, BrowserKind::Chrome);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["loginprobe", "config", "--config", "ci.toml", "-v"]);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_error_exit_codes() {
        let config = anyhow::Error::new(loginprobe_common::Error::InvalidConfig(
            "LOGINPROBE_HEADLESS must be true or false, got 'maybe'".to_string(),
        ));
        assert_eq!(error_exit_code(&config), USAGE_ERROR);

        let selection = anyhow::Error::new(E2eError::InvalidExpression("smoke and".to_string()))
            .context("invalid selection expression");
        assert_eq!(error_exit_code(&selection), USAGE_ERROR);

        let firefox = anyhow::Error::new(E2eError::UnsupportedBrowser("firefox".to_string()));
        assert_eq!(error_exit_code(&firefox), USAGE_ERROR);

        let launch = anyhow::Error::new(E2eError::BrowserLaunch("chrome exited".to_string()));
        assert_eq!(error_exit_code(&launch), RUNTIME_ERROR);
    }

    #[test_case(&["loginprobe", "run", "--tb", "full"]; "unknown tb style")]
    #[test_case(&["loginprobe", "run", "--browser", "safari"]; "unknown browser")]
    #[test_case(&["loginprobe", "list", "--format", "xml"]; "unknown format")]
    #[test_case(&["loginprobe", "run", "--capture", "sys"]; "unknown capture mode")]
    fn test_rejects_bad_values(args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
