//! 거래소 Open API 소스.
//!
//! - `TwseListedSource`: 증권거래소 상장 회사 기본 정보 (`/v1/opendata/t187ap03_L`)
//! - `TpexOtcSource`: 장외시장 종목 정보 (`/openapi/v1/stock/info`)
//!
//! 두 API 모두 JSON 객체 배열을 반환하며, 필드명은 소스 고유의 이름을 그대로 유지합니다.

use async_trait::async_trait;
use serde_json::Value;

use super::http::{get_checked, HttpSettings};
use super::source::{Origin, RawRecord, SourceAdapter};
use crate::{DataError, Result};

const TWSE_BASE_URL: &str = "https://openapi.twse.com.tw";
const TWSE_LISTED_PATH: &str = "/v1/opendata/t187ap03_L";

const TPEX_BASE_URL: &str = "https://www.tpex.org.tw";
const TPEX_OTC_PATH: &str = "/openapi/v1/stock/info";

/// JSON 배열 응답을 원시 레코드 목록으로 변환.
///
/// 배열 원소 중 객체가 아닌 값은 건너뜁니다.
pub(crate) fn parse_object_rows(body: Value) -> Result<Vec<RawRecord>> {
    match body {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(RawRecord::from(map)),
                _ => None,
            })
            .collect()),
        other => Err(DataError::ParseError(format!(
            "JSON 배열이 아닌 응답: {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

async fn fetch_rows(settings: &HttpSettings, path: &str) -> Result<Vec<RawRecord>> {
    let client = settings.client()?;
    let url = settings.url(path);

    let response = get_checked(&client, &url).await?;
    let body: Value = response.json().await?;

    parse_object_rows(body)
}

/// 증권거래소 상장 종목 소스.
pub struct TwseListedSource {
    settings: HttpSettings,
}

impl TwseListedSource {
    pub fn new() -> Self {
        Self::with_settings(HttpSettings::new(TWSE_BASE_URL))
    }

    pub fn with_settings(settings: HttpSettings) -> Self {
        Self { settings }
    }

    pub fn default_base_url() -> &'static str {
        TWSE_BASE_URL
    }
}

impl Default for TwseListedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for TwseListedSource {
    fn name(&self) -> &str {
        "twse"
    }

    fn origin(&self) -> Origin {
        Origin::TwseListed
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let rows = fetch_rows(&self.settings, TWSE_LISTED_PATH).await?;
        tracing::info!("증권거래소 상장 종목 수집: {}개", rows.len());
        Ok(rows)
    }
}

/// 장외시장 종목 소스.
pub struct TpexOtcSource {
    settings: HttpSettings,
}

impl TpexOtcSource {
    pub fn new() -> Self {
        Self::with_settings(HttpSettings::new(TPEX_BASE_URL))
    }

    pub fn with_settings(settings: HttpSettings) -> Self {
        Self { settings }
    }

    pub fn default_base_url() -> &'static str {
        TPEX_BASE_URL
    }
}

impl Default for TpexOtcSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for TpexOtcSource {
    fn name(&self) -> &str {
        "tpex"
    }

    fn origin(&self) -> Origin {
        Origin::TpexOtc
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let rows = fetch_rows(&self.settings, TPEX_OTC_PATH).await?;
        tracing::info!("장외시장 종목 수집: {}개", rows.len());
        Ok(rows)
    }
}
