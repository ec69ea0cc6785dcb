pub mod chart;
pub mod roi;

pub use chart::ChartWindow;
pub use roi::{rank_candidates, roi, RoiAnalyzer};
