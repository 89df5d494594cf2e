//! Yahoo Finance chart 엔드포인트 탐색 소스.
//!
//! 숫자 ID 구간(기본 50..1000)을 4자리 코드(`0050`)로 만들어
//! `/v8/finance/chart/{code}.TW`를 하나씩 조회하고, 이름에 펀드 키워드가 있는
//! 종목만 레코드로 만듭니다.
//!
//! - 요청마다 고정 타임아웃 적용
//! - 요청 사이 고정 딜레이 (응답 속도/오류와 무관)
//! - ID 단위 실패(HTTP 오류, 형식 불일치, 필드 누락)는 "레코드 없음"으로 처리하고 계속 진행

use async_trait::async_trait;
use serde::Deserialize;
use std::ops::Range;
use std::time::Duration;

use super::http::{get_checked, HttpSettings};
use super::source::{Origin, RawRecord, SourceAdapter};
use crate::Result;

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// 펀드 판별 키워드 (소문자 비교).
pub const DEFAULT_FUND_KEYWORDS: [&str; 4] = ["etf", "指數", "基金", "信託"];

/// 탐색 설정.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// 탐색할 ID 구간 (끝 미포함)
    pub range: Range<u32>,
    /// 코드 자릿수 (0 채움)
    pub width: usize,
    /// 요청 간 딜레이
    pub delay: Duration,
    /// 펀드 판별 키워드
    pub keywords: Vec<String>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            range: 50..1000,
            width: 4,
            delay: Duration::from_millis(100),
            keywords: DEFAULT_FUND_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: Option<ChartBody>,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    exchange_name: Option<String>,
    #[serde(default)]
    instrument_type: Option<String>,
}

/// Yahoo chart 탐색 소스.
pub struct YahooProbeSource {
    settings: HttpSettings,
    probe: ProbeSettings,
}

impl YahooProbeSource {
    /// 기본 설정 (5초 타임아웃, 100ms 딜레이).
    pub fn new() -> Self {
        Self::with_settings(
            HttpSettings::new(YAHOO_BASE_URL).with_timeout(Duration::from_secs(5)),
            ProbeSettings::default(),
        )
    }

    pub fn with_settings(settings: HttpSettings, probe: ProbeSettings) -> Self {
        Self { settings, probe }
    }

    pub fn default_base_url() -> &'static str {
        YAHOO_BASE_URL
    }

    /// ID를 코드 문자열로 변환 (예: 50 → "0050").
    pub fn code_for(&self, id: u32) -> String {
        format!("{:0width$}", id, width = self.probe.width)
    }

    /// 단일 코드 조회. 펀드가 아니거나 필드가 없으면 `Ok(None)`.
    async fn probe_one(&self, client: &reqwest::Client, code: &str) -> Result<Option<RawRecord>> {
        let url = self.settings.url(&format!("/v8/finance/chart/{}.TW", code));
        let response = get_checked(client, &url).await?;
        let data: ChartResponse = response.json().await?;

        let Some(meta) = data
            .chart
            .and_then(|c| c.result)
            .and_then(|r| r.into_iter().next())
            .and_then(|r| r.meta)
        else {
            return Ok(None);
        };

        let symbol = meta.symbol.unwrap_or_default();
        let name = meta
            .short_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| meta.long_name.clone().filter(|n| !n.trim().is_empty()));

        let Some(name) = name else {
            return Ok(None);
        };
        if symbol.is_empty() || !self.is_fund_name(&name) {
            return Ok(None);
        }

        let mut record = RawRecord::new()
            .with("code", code)
            .with("symbol", symbol)
            .with("shortName", meta.short_name.unwrap_or_default())
            .with("longName", meta.long_name.unwrap_or_default());
        if let Some(exchange) = meta.exchange_name {
            record.insert("exchangeName", exchange);
        }
        if let Some(instrument) = meta.instrument_type {
            record.insert("instrumentType", instrument);
        }

        Ok(Some(record))
    }

    fn is_fund_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.probe
            .keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

impl Default for YahooProbeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for YahooProbeSource {
    fn name(&self) -> &str {
        "yahoo-probe"
    }

    fn origin(&self) -> Origin {
        Origin::YahooChart
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let client = self.settings.client()?;
        let mut found = Vec::new();
        let mut failures = 0usize;
        let last = self.probe.range.end.saturating_sub(1);

        for id in self.probe.range.clone() {
            let code = self.code_for(id);

            match self.probe_one(&client, &code).await {
                Ok(Some(record)) => {
                    tracing::debug!(code = %code, "펀드 종목 발견");
                    found.push(record);
                }
                Ok(None) => {}
                Err(e) => {
                    failures += 1;
                    tracing::trace!(code = %code, error = %e, "탐색 실패, 계속 진행");
                }
            }

            // Rate limiting: 요청 간 고정 딜레이
            if id != last && !self.probe.delay.is_zero() {
                tokio::time::sleep(self.probe.delay).await;
            }
        }

        tracing::info!(
            range = ?self.probe.range,
            found = found.len(),
            failures,
            "Yahoo chart 탐색 완료"
        );

        Ok(found)
    }
}
