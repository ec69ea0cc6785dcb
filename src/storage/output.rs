use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::Result;
use crate::models::ItemSeries;

const MODULE_BANNER: &str = "// This file is auto-generated by poe-market-prophet. Do not edit by hand.";
const MODULE_EXPORT: &str = "processedChartData";

/// Where the two artifacts of a run are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub module: PathBuf,
    pub raw_json: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, module_file: &str, raw_file: &str) -> Self {
        Self {
            module: dir.join(module_file),
            raw_json: dir.join(raw_file),
        }
    }
}

/// The dataset as an ES module the dashboard imports directly.
pub fn render_module(series: &[ItemSeries]) -> Result<String> {
    let json = serde_json::to_string_pretty(series)?;
    Ok(format!("{}\nexport const {} = {};\n", MODULE_BANNER, MODULE_EXPORT, json))
}

pub async fn save_module(series: &[ItemSeries], path: &Path) -> Result<()> {
    let content = render_module(series)?;
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), series = series.len(), "wrote chart module");
    Ok(())
}

pub async fn save_raw_json(series: &[ItemSeries], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(series)?;
    tokio::fs::write(path, json).await?;
    info!(path = %path.display(), series = series.len(), "wrote raw json");
    Ok(())
}

/// Reload a dataset written by `save_raw_json`.
pub async fn load_series(path: &Path) -> Result<Vec<ItemSeries>> {
    let content = tokio::fs::read_to_string(path).await?;
    let series = serde_json::from_str(&content)?;
    Ok(series)
}
