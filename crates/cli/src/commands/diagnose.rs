//! Diagnose Command

use anyhow::Result;
use colored::Colorize;

use loginprobe_common::SuiteConfig;
use loginprobe_e2e::{diagnose, CdpDriverFactory, DiagnosticLine};

use crate::output::{print_success, print_warning};

/// Probe the page's error messages; returns the process exit code
pub async fn execute(config: SuiteConfig) -> Result<i32> {
    println!("{}", "=".repeat(60));
    println!("DIAGNOSTIC: Checking error message functionality");
    println!("{}", "=".repeat(60));
    println!("Target: {}", config.base_url);

    let lines = diagnose::run(&CdpDriverFactory, &config).await?;
    for line in &lines {
        print_line(line);
    }

    println!("{}", "=".repeat(60));
    let failed = lines.iter().filter(|l| !l.ok).count();
    if failed == 0 {
        print_success("All error message checks passed");
        Ok(0)
    } else {
        print_warning(&format!("{} of {} checks failed", failed, lines.len()));
        Ok(1)
    }
}

fn print_line(line: &DiagnosticLine) {
    println!();
    println!("{}. {}", line.step, line.title);
    if line.ok {
        println!("   {} {}", "✓".green(), line.detail);
    } else {
        println!("   {} {}", "✗".red(), line.detail.red());
    }
}
