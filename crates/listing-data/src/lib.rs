//! 상장 종목 메타데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - 출처별 Source Adapter (Open API, 심볼 디렉토리, ISIN 페이지, chart 탐색, 정적 테이블)
//! - 출처별 필드를 정규 스키마로 옮기는 Normalizer
//! - first-seen-wins 중복 제거 Collector
//! - JSON Lines Sink (시장별 분할 지원)

pub mod collector;
pub mod error;
pub mod normalizer;
pub mod provider;
pub mod record;
pub mod seed;
pub mod sink;

pub use error::{DataError, Result};
pub use record::{quote_symbol, CanonicalRecord, Market, Region};

pub use collector::{collect, Collection, Collector, SourceSummary};
pub use normalizer::{normalize, FieldMap};
pub use sink::{JsonLinesSink, PartitionMode, SinkReport};

// Source Adapter 재내보내기
pub use provider::{
    fetch_contained, DirectoryFile, FallbackSource, HttpSettings, IsinEtfSource, Origin,
    ProbeSettings, RawRecord, SecTickerSource, SourceAdapter, SourceBatch, StaticTableSource,
    SymbolDirectorySource, TpexOtcSource, TwseListedSource, YahooProbeSource,
};
pub use seed::SeedTable;
