use futures::future::join_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::data::{aggregate, ingest_source, observations, source_id, KeyedSeries, SourceBatch, SourceEpochs};
use crate::errors::{ProphetError, Result};
use crate::fetcher::{manual_icon_table, IconResolver, NinjaApiClient};
use crate::models::ItemSeries;
use crate::storage::{save_module, save_raw_json};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    pub files_found: usize,
    pub files_skipped: usize,
    pub leagues: usize,
    pub rows_read: usize,
    pub rows_retained: usize,
    pub rows_dropped: usize,
    pub series_written: usize,
    pub icons_resolved: usize,
}

/// Every `*.csv` file in `dir`, sorted by name so runs are reproducible.
pub async fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Parse every file on the blocking pool, one task per file.
///
/// The result keeps the order of `paths`; unreadable or headerless files come
/// back as `None`.
pub async fn ingest_files(paths: &[PathBuf]) -> Vec<Option<SourceBatch>> {
    let tasks = paths.iter().map(|path| async move {
        let source = source_id(path)?;
        let content = match tokio::fs::read(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read export, skipping");
                return None;
            }
        };

        match tokio::task::spawn_blocking(move || ingest_source(&source, &content)).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "parse task failed");
                None
            }
        }
    });

    join_all(tasks).await
}

/// Reduce the per-file batches into one keyed dataset.
pub fn build_dataset(batches: &[SourceBatch]) -> (SourceEpochs, Vec<KeyedSeries>) {
    let epochs = SourceEpochs::from_batches(batches);
    let observations = observations(batches, &epochs);
    (epochs, aggregate(&observations))
}

pub fn attach_icons(keyed: Vec<KeyedSeries>, icons: &HashMap<String, String>) -> Vec<ItemSeries> {
    keyed
        .into_iter()
        .map(|KeyedSeries { key, series }| {
            let icon = icons.get(&key).cloned();
            series.with_icon(icon)
        })
        .collect()
}

pub fn icon_resolver(config: &Config) -> Result<IconResolver> {
    let mut resolver = IconResolver::new(manual_icon_table())
        .with_item_types(config.icons.item_types.clone())
        .with_concurrency(config.icons.concurrency)
        .with_timeout(config.icons.timeout());

    if config.icons.enabled {
        let client = NinjaApiClient::new(&config.icons.base_url, &config.icons.league, config.icons.timeout())?;
        resolver = resolver.with_lookup(Box::new(client));
    }
    Ok(resolver)
}

/// Turn the exports in `config.data_dir` into the series dataset.
pub async fn process(config: &Config, resolver: &IconResolver) -> Result<(Vec<ItemSeries>, ProcessingSummary)> {
    let paths = list_sources(&config.data_dir).await?;
    if paths.is_empty() {
        return Err(ProphetError::NoInputFiles(config.data_dir.clone()));
    }
    info!(count = paths.len(), dir = %config.data_dir.display(), "found league exports");

    let parsed = ingest_files(&paths).await;
    let files_skipped = parsed.iter().filter(|batch| batch.is_none()).count();
    let batches: Vec<SourceBatch> = parsed.into_iter().flatten().collect();

    let (epochs, keyed) = build_dataset(&batches);

    let keys: HashSet<String> = keyed.iter().map(|k| k.key.clone()).collect();
    let icons = resolver.resolve_icons(&keys).await;
    let series = attach_icons(keyed, &icons);

    let summary = ProcessingSummary {
        files_found: paths.len(),
        files_skipped,
        leagues: epochs.len(),
        rows_read: batches.iter().map(|b| b.rows_read).sum(),
        rows_retained: batches.iter().map(|b| b.quotes.len()).sum(),
        rows_dropped: batches.iter().map(|b| b.rows_dropped()).sum(),
        series_written: series.len(),
        icons_resolved: series.iter().filter(|s| s.icon.is_some()).count(),
    };
    Ok((series, summary))
}

/// Full batch run: process the exports and write both artifacts.
pub async fn run(config: &Config) -> Result<ProcessingSummary> {
    let resolver = icon_resolver(config)?;
    let (series, summary) = process(config, &resolver).await?;

    let paths = config.output_paths();
    save_module(&series, &paths.module).await?;
    save_raw_json(&series, &paths.raw_json).await?;

    info!(
        files = summary.files_found,
        skipped = summary.files_skipped,
        leagues = summary.leagues,
        rows_retained = summary.rows_retained,
        rows_dropped = summary.rows_dropped,
        series = summary.series_written,
        icons = summary.icons_resolved,
        "processing finished"
    );
    Ok(summary)
}
