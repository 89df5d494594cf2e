//! Source Adapter 공통 정의.
//!
//! 각 소스는 [`SourceAdapter`]를 구현하여 원시 레코드([`RawRecord`]) 목록을 반환합니다.
//! 네트워크 소스와 정적 테이블이 같은 인터페이스 뒤에 놓이므로
//! 테스트에서는 작은 픽스처 테이블로 교체할 수 있습니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Instant;

use crate::Result;

/// 레코드 출처.
///
/// Normalizer가 어떤 필드 매핑 테이블을 사용할지 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// 증권거래소 Open API (상장 회사 기본 정보)
    TwseListed,
    /// 장외시장 Open API
    TpexOtc,
    /// 증권거래소 ISIN 조회 페이지 (ETF)
    TwseIsinEtf,
    /// 심볼 디렉토리 nasdaqlisted.txt
    NasdaqListed,
    /// 심볼 디렉토리 otherlisted.txt
    OtherListed,
    /// 규제기관 company_tickers.json
    SecTickers,
    /// Yahoo Finance chart 엔드포인트 탐색
    YahooChart,
    /// 내장 정적 테이블
    SeedTable,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwseListed => "twse_listed",
            Self::TpexOtc => "tpex_otc",
            Self::TwseIsinEtf => "twse_isin_etf",
            Self::NasdaqListed => "nasdaq_listed",
            Self::OtherListed => "other_listed",
            Self::SecTickers => "sec_tickers",
            Self::YahooChart => "yahoo_chart",
            Self::SeedTable => "seed_table",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 원시 레코드.
///
/// 소스별 필드명을 그대로 유지하는 문자열 키 맵입니다. 불변 조건은 없습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// 필드 추가 (빌더 형식).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 필드를 문자열로 읽기 (앞뒤 공백 제거).
    ///
    /// 숫자와 bool은 JSON 표기 그대로 문자열화합니다. null, 배열, 객체는 `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// 필드를 bool 플래그로 읽기.
    ///
    /// `true`, `"Y"`, `"y"`, `"true"`, `"1"`, `1`을 참으로 봅니다.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(n.as_i64() == Some(1)),
            Value::String(s) => {
                let s = s.trim();
                Some(s.eq_ignore_ascii_case("y") || s.eq_ignore_ascii_case("true") || s == "1")
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Source Adapter trait.
///
/// `fetch`는 내부적으로 `Result`를 반환하지만, 파이프라인은 항상
/// [`fetch_contained`]를 통해 호출하므로 실패가 실행 전체로 번지지 않습니다.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// 소스 이름 (CLI `--sources`에서 사용).
    fn name(&self) -> &str;

    /// 레코드 출처.
    fn origin(&self) -> Origin;

    /// 원시 레코드 조회.
    async fn fetch(&self) -> Result<Vec<RawRecord>>;

    /// 원시 레코드와 실제 출처를 함께 조회.
    ///
    /// 대체 소스처럼 조회 결과에 따라 출처가 달라지는 어댑터만 재정의합니다.
    async fn fetch_tagged(&self) -> Result<(Origin, Vec<RawRecord>)> {
        Ok((self.origin(), self.fetch().await?))
    }
}

/// 한 소스의 조회 결과.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    /// 소스 이름
    pub source: String,
    /// 레코드 출처
    pub origin: Origin,
    /// 원시 레코드 (실패 시 비어 있음)
    pub records: Vec<RawRecord>,
    /// 실패 메시지
    pub error: Option<String>,
}

impl SourceBatch {
    /// 성공 결과 생성.
    pub fn new(source: impl Into<String>, origin: Origin, records: Vec<RawRecord>) -> Self {
        Self {
            source: source.into(),
            origin,
            records,
            error: None,
        }
    }

    /// 실패 결과 생성 (레코드 없음).
    pub fn failed(source: impl Into<String>, origin: Origin, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            origin,
            records: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// 소스를 호출하고 실패를 경계 안에서 처리.
///
/// 실패 시 빈 레코드와 에러 메시지를 담은 배치를 반환합니다.
pub async fn fetch_contained(adapter: &dyn SourceAdapter) -> SourceBatch {
    let start = Instant::now();
    tracing::info!(source = adapter.name(), "소스 조회 시작");

    match adapter.fetch_tagged().await {
        Ok((origin, records)) => {
            tracing::info!(
                source = adapter.name(),
                count = records.len(),
                elapsed = format!("{:.1}s", start.elapsed().as_secs_f64()),
                "소스 조회 완료"
            );
            SourceBatch::new(adapter.name(), origin, records)
        }
        Err(e) => {
            tracing::warn!(
                source = adapter.name(),
                error = %e,
                "소스 조회 실패, 빈 결과로 계속 진행"
            );
            SourceBatch::failed(adapter.name(), adapter.origin(), e.to_string())
        }
    }
}
