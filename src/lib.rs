pub mod analyzer;
pub mod config;
pub mod data;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod storage;

pub use analyzer::{rank_candidates, ChartWindow, RoiAnalyzer};
pub use config::Config;
pub use errors::{ProphetError, Result};
pub use models::{ItemSeries, PricePoint, RankedCandidate, RankingQuery, RankingResult};
