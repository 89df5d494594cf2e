//! Standalone listing metadata collector.
//!
//! 이 crate는 여러 공개 출처의 종목 목록을 수집하는 바이너리를 제공합니다:
//! - 대만 상장/장외 종목 (증권거래소, 장외시장 Open API)
//! - 대만 ETF (ISIN 조회 페이지, 내장 계열별 목록, Yahoo chart 탐색)
//! - 미국 종목 (심볼 디렉토리, 규제기관 티커 파일)
//!
//! 수집 결과는 중복 제거 후 JSON Lines 파일로 저장됩니다.

pub mod config;
pub mod error;
pub mod logging;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
