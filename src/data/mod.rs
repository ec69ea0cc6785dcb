pub mod aggregator;
pub mod ingestor;
pub mod normalizer;

pub use aggregator::{aggregate, DailyAggregator, KeyedSeries, MAX_DAY};
pub use ingestor::{
    day_index,
    ingest_source,
    observations,
    parse_date,
    source_id,
    SourceBatch,
    SourceEpochs,
    HEADER_LINE,
    REFERENCE_CURRENCY,
};
pub use normalizer::normalize_name;
