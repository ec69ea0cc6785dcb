pub mod candidate;
pub mod item_type;
pub mod series;
pub mod transaction;

pub use candidate::{
    RankedCandidate,
    RankingQuery,
    RankingResult,
};

pub use item_type::{
    OverviewKind,
    OverviewType,
};

pub use series::{
    ItemSeries,
    PricePoint,
};

pub use transaction::{
    PriceObservation,
    PriceQuote,
    RawTransactionRecord,
};
