//! Config Command

use anyhow::Result;
use clap::Args;

use loginprobe_common::SuiteConfig;

use crate::output::OutputFormat;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Output format; table and plain print TOML
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Effective configuration in the requested format
pub fn render(config: &SuiteConfig, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Table | OutputFormat::Plain => config.to_toml_string()?,
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(text)
}

pub fn execute(args: ConfigArgs, config: &SuiteConfig) -> Result<i32> {
    println!("{}", render(config, args.format)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OutputFormat::Plain, "base_url = \"https://ronit0000.github.io/Login-Page/\"")]
    #[test_case(OutputFormat::Json, "\"base_url\": \"https://ronit0000.github.io/Login-Page/\"")]
    #[test_case(OutputFormat::Yaml, "base_url: https://ronit0000.github.io/Login-Page/")]
    fn test_render(format: OutputFormat, expected: &str) {
        let text = render(&SuiteConfig::default(), format).unwrap();
        assert!(text.contains(expected), "{}", text);
    }
}
