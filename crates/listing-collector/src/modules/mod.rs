//! 데이터 수집 모듈.

pub mod listing_sync;

pub use listing_sync::{
    build_sources, collect_sources, run_pipeline, select_sources, sync_listings, ListingRun,
    Profile, RunOptions,
};
