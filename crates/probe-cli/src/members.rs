//! Non-interactive member listing.

use anyhow::{Context, Result};
use probe_eval::evaluate_value;
use probe_explorer::{enumerate, Explorer, PropertyDescriptor};

/// Enumerate the value at `path` with the explorer's current settings.
pub fn list(explorer: &Explorer, path: &str) -> Result<Vec<PropertyDescriptor>> {
    let value = evaluate_value(path, explorer.environment())
        .with_context(|| format!("Failed to evaluate '{path}'"))?;
    let config = explorer.configuration();
    Ok(enumerate(
        &value,
        path,
        config.include_prototype,
        config.include_private,
    )?)
}

/// The listing as aligned `label  type` rows.
pub fn render(explorer: &Explorer, path: &str) -> Result<String> {
    let entries = list(explorer, path)?;
    let width = entries
        .iter()
        .map(|d| d.label.chars().count())
        .max()
        .unwrap_or(0);
    let rows: Vec<String> = entries
        .iter()
        .map(|d| format!("{:<width$}  {}", d.label, d.description))
        .collect();
    Ok(rows.join("\n"))
}

/// The listing as a JSON array of `{label, description, typeTag, accessPath}`.
pub fn render_json(explorer: &Explorer, path: &str) -> Result<String> {
    let entries: Vec<serde_json::Value> = list(explorer, path)?
        .iter()
        .map(|d| {
            serde_json::json!({
                "label": d.label,
                "description": d.description,
                "typeTag": d.type_tag,
                "accessPath": d.access_path,
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize member listing")
}
