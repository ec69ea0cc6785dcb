use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::normalizer::normalize_name;
use crate::models::{PriceObservation, PriceQuote, RawTransactionRecord};

/// Only quotes priced in this currency are kept.
pub const REFERENCE_CURRENCY: &str = "Chaos Orb";

/// Exports carry a free-text preamble; data starts at the line with this prefix.
pub const HEADER_LINE: &str = "League;Date;Get;Pay;Value;Confidence";

const DELIMITER: u8 = b';';

/// Everything one export file contributes to the run.
///
/// A batch is built from its file alone, so files can be parsed in parallel
/// and reduced afterwards.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub source: String,
    /// Date of the first dated row in the file, whatever it was paid in.
    pub first_date: Option<NaiveDate>,
    pub quotes: Vec<PriceQuote>,
    pub rows_read: usize,
}

impl SourceBatch {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.quotes.len())
    }
}

/// Start date of every league. The first date recorded for a league sticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceEpochs {
    epochs: BTreeMap<String, NaiveDate>,
}

impl SourceEpochs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Epochs of the batches in parse order.
    pub fn from_batches(batches: &[SourceBatch]) -> Self {
        let mut epochs = Self::new();
        for batch in batches {
            if let Some(date) = batch.first_date {
                epochs.record(&batch.source, date);
            }
        }
        epochs
    }

    /// Returns false if the league already had an epoch.
    pub fn record(&mut self, source: &str, date: NaiveDate) -> bool {
        if self.epochs.contains_key(source) {
            return false;
        }
        self.epochs.insert(source.to_string(), date);
        true
    }

    pub fn get(&self, source: &str) -> Option<NaiveDate> {
        self.epochs.get(source).copied()
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

/// League name of an export: the file name up to its first `.`.
pub fn source_id(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let id = file_name.split('.').next().unwrap_or(file_name);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Calendar date (UTC) of a timestamp column.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc().date());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// 1-based day of `date` relative to the league epoch.
///
/// The distance is absolute, so a date before the epoch still maps onto a
/// positive index.
pub fn day_index(date: NaiveDate, epoch: NaiveDate) -> u32 {
    let days = date.signed_duration_since(epoch).num_days().unsigned_abs();
    u32::try_from(days).unwrap_or(u32::MAX - 1) + 1
}

/// Parse one export file.
///
/// Returns `None` when the header line is missing; the caller skips the
/// file. Malformed rows are dropped one by one.
pub fn ingest_source(source: &str, content: &str) -> Option<SourceBatch> {
    let body = match locate_header(content) {
        Some(offset) => &content[offset..],
        None => {
            warn!(source, "header line not found, skipping file");
            return None;
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut first_date = None;
    let mut quotes = Vec::new();
    let mut rows_read = 0;

    for (line, row) in reader.deserialize::<RawTransactionRecord>().enumerate() {
        rows_read += 1;
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                debug!(source, line = line + 2, error = %e, "dropping malformed row");
                continue;
            }
        };

        let date = record.date.as_deref().and_then(parse_date);
        if first_date.is_none() {
            first_date = date;
        }

        if let Some(quote) = quote(&record, date) {
            quotes.push(quote);
        } else if date.is_none() && record.is_paid_in(REFERENCE_CURRENCY) {
            debug!(source, line = line + 2, "dropping row with unparseable date");
        }
    }

    info!(
        source,
        first_date = ?first_date,
        rows_read,
        rows_retained = quotes.len(),
        "parsed export"
    );

    Some(SourceBatch {
        source: source.to_string(),
        first_date,
        quotes,
        rows_read,
    })
}

/// Place every retained quote on its league's day axis.
///
/// Quotes of a league without an epoch are dropped.
pub fn observations(batches: &[SourceBatch], epochs: &SourceEpochs) -> Vec<PriceObservation> {
    let mut observations = Vec::new();
    for batch in batches {
        let epoch = match epochs.get(&batch.source) {
            Some(epoch) => epoch,
            None => {
                if !batch.quotes.is_empty() {
                    warn!(source = %batch.source, dropped = batch.quotes.len(), "no epoch for league");
                }
                continue;
            }
        };

        observations.extend(batch.quotes.iter().map(|quote| PriceObservation {
            key: quote.key.clone(),
            day: day_index(quote.date, epoch),
            price: quote.price,
            display_name: quote.display_name.clone(),
        }));
    }
    observations
}

fn locate_header(content: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.starts_with(HEADER_LINE) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn quote(record: &RawTransactionRecord, date: Option<NaiveDate>) -> Option<PriceQuote> {
    if !record.is_paid_in(REFERENCE_CURRENCY) {
        return None;
    }
    record.league.as_deref().map(str::trim).filter(|league| !league.is_empty())?;
    let price = record.price()?;
    let name = record.get.as_deref()?.trim();
    let key = normalize_name(name);
    if key.is_empty() {
        return None;
    }

    Some(PriceQuote {
        key,
        date: date?,
        price,
        display_name: name.to_string(),
    })
}
