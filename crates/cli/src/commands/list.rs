//! List Command

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use loginprobe_e2e::{catalog, Selection, TestCase};

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only list cases whose node id or markers match the expression
    #[arg(short = 'k', value_name = "EXPR")]
    pub keyword: Option<String>,

    /// Only list cases whose markers match the expression
    #[arg(short = 'm', value_name = "MARKEXPR")]
    pub marker: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Case display wrapper for serialization
#[derive(Debug, Serialize)]
pub struct CaseDisplay {
    pub node_id: String,
    pub id: Option<String>,
    pub markers: Vec<String>,
    pub description: String,
}

impl From<&TestCase> for CaseDisplay {
    fn from(case: &TestCase) -> Self {
        Self {
            node_id: case.node_id(),
            id: case.id.map(String::from),
            markers: case.all_markers(),
            description: case.description.to_string(),
        }
    }
}

impl TableDisplay for CaseDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Node ID", "ID", "Markers", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.node_id.clone(),
            self.id.clone().unwrap_or_else(|| "-".to_string()),
            self.markers.join(", "),
            self.description.clone(),
        ]
    }
}

/// Collected cases after selection
pub fn collect(args: &ListArgs) -> Result<(Vec<CaseDisplay>, usize)> {
    let selection = Selection::new(args.keyword.as_deref(), args.marker.as_deref())
        .context("invalid selection expression")?;

    let cases = catalog();
    let total = cases.len();
    let selected: Vec<CaseDisplay> = cases
        .iter()
        .filter(|case| selection.selects(case))
        .map(CaseDisplay::from)
        .collect();
    let deselected = total - selected.len();
    Ok((selected, deselected))
}

/// List the collected cases; returns the process exit code
pub fn execute(args: ListArgs) -> Result<i32> {
    let (selected, deselected) = collect(&args)?;
    print_list(&selected, args.format)?;

    if args.format == OutputFormat::Table {
        println!(
            "{} tests collected ({} deselected)",
            selected.len(),
            deselected
        );
    }

    Ok(if selected.is_empty() { 5 } else { 0 })
}
