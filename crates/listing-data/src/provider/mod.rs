//! Source Adapter 모듈.
//!
//! 각 출처에서 원시 레코드를 가져오는 어댑터들을 정의합니다.
//!
//! ## 대만 시장
//! - `TwseListedSource`: 증권거래소 Open API (상장 종목)
//! - `TpexOtcSource`: 장외시장 Open API (OTC 종목)
//! - `IsinEtfSource`: ISIN 조회 페이지 크롤러 (ETF)
//! - `YahooProbeSource`: Yahoo chart 엔드포인트 탐색 (ETF)
//!
//! ## 미국 시장
//! - `SymbolDirectorySource`: nasdaqlisted.txt / otherlisted.txt
//! - `SecTickerSource`: 규제기관 company_tickers.json
//!
//! ## 정적 데이터
//! - `StaticTableSource`: 내장 시드 테이블
//! - `FallbackSource`: 실패 시 정적 테이블로 대체

pub mod exchange;
pub mod http;
pub mod isin;
pub mod sec;
pub mod source;
pub mod static_table;
pub mod symbol_directory;
pub mod yahoo_probe;

pub use exchange::{TpexOtcSource, TwseListedSource};
pub use http::{HttpSettings, DEFAULT_USER_AGENT};
pub use isin::IsinEtfSource;
pub use sec::SecTickerSource;
pub use source::{fetch_contained, Origin, RawRecord, SourceAdapter, SourceBatch};
pub use static_table::{FallbackSource, StaticTableSource};
pub use symbol_directory::{DirectoryFile, SymbolDirectorySource};
pub use yahoo_probe::{ProbeSettings, YahooProbeSource, DEFAULT_FUND_KEYWORDS};
