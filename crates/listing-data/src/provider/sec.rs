//! 규제기관 company_tickers.json 소스.
//!
//! 응답은 인덱스 문자열을 키로 하는 객체입니다:
//! `{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}`

use async_trait::async_trait;
use serde_json::Value;

use super::exchange::json_kind;
use super::http::{get_checked, HttpSettings};
use super::source::{Origin, RawRecord, SourceAdapter};
use crate::{DataError, Result};

const SEC_BASE_URL: &str = "https://www.sec.gov";
const SEC_TICKERS_PATH: &str = "/files/company_tickers.json";

/// 규제기관 티커 파일 소스.
pub struct SecTickerSource {
    settings: HttpSettings,
}

impl SecTickerSource {
    pub fn new() -> Self {
        Self::with_settings(HttpSettings::new(SEC_BASE_URL))
    }

    pub fn with_settings(settings: HttpSettings) -> Self {
        Self { settings }
    }

    pub fn default_base_url() -> &'static str {
        SEC_BASE_URL
    }
}

impl Default for SecTickerSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for SecTickerSource {
    fn name(&self) -> &str {
        "sec"
    }

    fn origin(&self) -> Origin {
        Origin::SecTickers
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let client = self.settings.client()?;
        let url = self.settings.url(SEC_TICKERS_PATH);

        let response = get_checked(&client, &url).await?;
        let body: Value = response.json().await?;

        let rows = parse_company_tickers(body)?;
        tracing::info!("SEC 티커 수집: {}개", rows.len());
        Ok(rows)
    }
}

/// 응답 객체를 원시 레코드 목록으로 변환.
///
/// 키가 `"0"`, `"1"`, ... 이므로 숫자 순서로 정렬하여 원본 순서를 보존합니다.
pub fn parse_company_tickers(body: Value) -> Result<Vec<RawRecord>> {
    let Value::Object(map) = body else {
        return Err(DataError::ParseError(format!(
            "JSON 객체가 아닌 응답: {}",
            json_kind(&body)
        )));
    };

    let mut entries: Vec<(u64, RawRecord)> = map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(company) => {
                Some((key.parse::<u64>().unwrap_or(u64::MAX), RawRecord::from(company)))
            }
            _ => None,
        })
        .collect();

    entries.sort_by_key(|(index, _)| *index);

    Ok(entries.into_iter().map(|(_, record)| record).collect())
}
