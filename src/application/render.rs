//! Text renderings of a sorted category listing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::records::category_to_value;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{sort_with_depth, Category, CategoryForest};

/// Output format for a sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One label per line
    List,
    /// Labels indented by depth
    #[default]
    Indented,
    /// Box-drawing tree
    Tree,
    /// Sorted records as a JSON array
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::List => "list",
            OutputFormat::Indented => "indented",
            OutputFormat::Tree => "tree",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OutputFormat {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(OutputFormat::List),
            "indented" => Ok(OutputFormat::Indented),
            "tree" => Ok(OutputFormat::Tree),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApplicationError::Config {
                message: format!("unknown output format: {other}"),
            }),
        }
    }
}

/// Presentation knobs taken from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix repeated once per depth level
    pub indent: String,
    /// Suffix for orphan-tail entries in indented output
    pub orphan_marker: String,
    /// Label of the synthetic root in tree output
    pub root_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            orphan_marker: " (orphan)".to_string(),
            root_label: "categories".to_string(),
        }
    }
}

/// Sort `categories` and render them. Input order does not matter.
pub fn render(
    categories: &[Category],
    format: OutputFormat,
    options: &RenderOptions,
) -> ApplicationResult<String> {
    let entries = sort_with_depth(categories);

    let rendered = match format {
        OutputFormat::List => entries
            .iter()
            .map(|entry| entry.category.label())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Indented => entries
            .iter()
            .map(|entry| {
                let marker = if entry.orphan {
                    options.orphan_marker.as_str()
                } else {
                    ""
                };
                format!(
                    "{}{}{}",
                    options.indent.repeat(entry.depth),
                    entry.category.label(),
                    marker
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Tree => CategoryForest::from_entries(&entries)
            .to_tree_string(&options.root_label)?
            .trim_end()
            .to_string(),
        OutputFormat::Json => {
            let records: Vec<Value> = entries
                .iter()
                .map(|entry| category_to_value(entry.category))
                .collect();
            serde_json::to_string_pretty(&records).map_err(|e| {
                ApplicationError::OperationFailed {
                    context: "serialize categories".to_string(),
                    source: Box::new(e),
                }
            })?
        }
    };

    Ok(rendered)
}
