//! Run Command

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::sync::Arc;

use loginprobe_common::{BrowserKind, SuiteConfig};
use loginprobe_e2e::{catalog, CdpDriverFactory, Reporter, RunnerConfig, Selection, TestRunner, TraceStyle};

use crate::output::{print_info, print_warning};

/// Output capturing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Capture {
    /// Show case output only for failures
    #[default]
    Fd,
    /// Show case output for every case
    No,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Only run cases whose node id or markers match the expression
    #[arg(short = 'k', value_name = "EXPR")]
    pub keyword: Option<String>,

    /// Only run cases whose markers match the expression
    #[arg(short = 'm', value_name = "MARKEXPR")]
    pub marker: Option<String>,

    /// Failure detail style
    #[arg(long = "tb", value_enum, default_value = "long")]
    pub tb: TraceStyle,

    /// Stop after the first failure or error
    #[arg(short = 'x', long = "exitfirst")]
    pub exit_first: bool,

    /// Show case output for passing cases too (same as --capture=no)
    #[arg(short = 's')]
    pub no_capture: bool,

    /// Output capturing mode
    #[arg(long, value_enum, default_value = "fd")]
    pub capture: Capture,

    /// Page under test
    #[arg(long)]
    pub base_url: Option<String>,

    /// Browser to launch (chrome, edge, firefox)
    #[arg(long, value_parser = parse_browser)]
    pub browser: Option<BrowserKind>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}

impl RunArgs {
    /// Overlay the command-line flags onto `config`
    pub fn apply(&self, config: &mut SuiteConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(browser) = self.browser {
            config.browser = browser;
        }
        if self.headless {
            config.headless = true;
        }
    }

    /// Whether notes of passing cases are shown
    pub fn show_output(&self) -> bool {
        self.no_capture || self.capture == Capture::No
    }

    pub fn selection(&self) -> Result<Selection> {
        Selection::new(self.keyword.as_deref(), self.marker.as_deref())
            .context("invalid selection expression")
    }
}

pub fn parse_browser(value: &str) -> std::result::Result<BrowserKind, String> {
    value.parse().map_err(|e: loginprobe_common::Error| e.to_string())
}

/// Run the suite; returns the process exit code
pub async fn execute(args: RunArgs, mut config: SuiteConfig) -> Result<i32> {
    args.apply(&mut config);
    let options = RunnerConfig {
        selection: args.selection()?,
        exit_first: args.exit_first,
    };

    let runner = TestRunner::with_config(config, Arc::new(CdpDriverFactory), options);
    let mut reporter = Reporter::stdout(args.tb, args.show_output());
    let suite = runner.run(catalog(), &mut reporter).await;

    match runner.write_results(&suite) {
        Ok(path) => print_info(&format!("Results written to {}", path.display())),
        Err(e) => print_warning(&format!("Could not write results: {}", e)),
    }

    Ok(suite.exit_code())
}
