//! Commands for inspecting a content item document.

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use folio_model::ContentItem;
use folio_query::{FieldResolver, QueryLimits};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print whether the item has a top-level property
    Has { name: String },

    /// Print the value at a dotted path
    Get { path: String },

    /// Set the value at a dotted path and print the updated document.
    /// VALUE is parsed as JSON, falling back to a plain string.
    Set { path: String, value: String },

    /// List the item's parts
    Parts,

    /// Resolve a dotted path under the configured query limits
    Resolve { path: String },
}

/// Reads and parses a content item document.
pub fn load_item(path: &Path) -> Result<ContentItem> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read content item {:?}", path))?;
    let item = ContentItem::from_json(&json).context("Failed to parse content item")?;
    debug!(id = %item.id(), content_type = %item.content_type(), "loaded content item");
    Ok(item)
}

/// Runs `command` against `item`, returning the text to print.
pub fn run(command: &Command, item: &ContentItem, limits: &QueryLimits) -> Result<String> {
    match command {
        Command::Has { name } => Ok(item.has(name).to_string()),
        Command::Get { path } => {
            let value = item
                .content()
                .get(path.as_str())
                .ok_or_else(|| anyhow!("no value at '{}'", path))?;
            Ok(serde_json::to_string_pretty(&value)?)
        }
        Command::Set { path, value } => {
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.clone()));
            item.content()
                .set(path.as_str(), value)
                .with_context(|| format!("Failed to set '{}'", path))?;
            Ok(item.to_json_pretty()?)
        }
        Command::Parts => {
            let lines: Vec<String> = item
                .parts()?
                .into_iter()
                .map(|(name, part)| format!("{} ({} properties)", name, part.property_names().len()))
                .collect();
            Ok(lines.join("\n"))
        }
        Command::Resolve { path } => {
            let resolver = FieldResolver::new(limits);
            match resolver.resolve(item, path) {
                Ok(value) => Ok(serde_json::to_string_pretty(&value)?),
                Err(e) => Err(anyhow!(limits.describe_error(&e))),
            }
        }
    }
}
