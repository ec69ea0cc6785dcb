mod icon_resolver;
mod ninja_api;

pub use icon_resolver::{
    manual_icon_table,
    IconLookup,
    IconOverlay,
    IconResolver,
};

pub use ninja_api::{
    CurrencyDetail,
    NinjaApiClient,
    OverviewLine,
    OverviewResponse,
    DEFAULT_BASE_URL,
};
