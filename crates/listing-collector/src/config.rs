//! 환경변수 기반 설정 모듈.

use std::path::PathBuf;
use std::time::Duration;

use listing_data::provider::yahoo_probe::ProbeSettings;
use listing_data::{
    HttpSettings, IsinEtfSource, PartitionMode, SecTickerSource, SymbolDirectorySource,
    TpexOtcSource, TwseListedSource, YahooProbeSource,
};

use crate::error::CollectorError;
use crate::Result;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 출력 설정
    pub output: OutputConfig,
    /// HTTP 공통 설정
    pub http: HttpConfig,
    /// 소스별 Base URL
    pub endpoints: EndpointConfig,
    /// Yahoo chart 탐색 설정
    pub probe: ProbeConfig,
}

/// 출력 설정
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// 출력 디렉토리
    pub dir: PathBuf,
    /// 시장별 분할 모드
    pub partition: PartitionMode,
}

/// HTTP 공통 설정
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
}

/// 소스별 Base URL (테스트/미러 서버 교체용)
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub twse: String,
    pub tpex: String,
    pub isin: String,
    pub symbol_directory: String,
    pub sec: String,
    pub yahoo: String,
}

/// Yahoo chart 탐색 설정
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// 탐색 시작 ID (포함)
    pub start: u32,
    /// 탐색 종료 ID (미포함)
    pub end: u32,
    /// 요청 간 딜레이 (밀리초)
    pub delay_ms: u64,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        // 빈 조회 함수 → 모든 값이 기본값
        Self::from_lookup(|_| None)
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 파일 포함)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// 키 조회 함수로 설정 생성. 파싱할 수 없는 값은 기본값 사용.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let partition = match lookup("LISTING_PARTITION") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "LISTING_PARTITION 무시, 기본값 사용");
                PartitionMode::default()
            }),
            None => PartitionMode::default(),
        };

        Self {
            output: OutputConfig {
                dir: lookup("LISTING_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data")),
                partition,
            },
            http: HttpConfig {
                timeout_secs: var_parse(&lookup, "LISTING_HTTP_TIMEOUT_SECS", 30),
                user_agent: lookup("LISTING_USER_AGENT")
                    .unwrap_or_else(|| listing_data::provider::DEFAULT_USER_AGENT.to_string()),
            },
            endpoints: EndpointConfig {
                twse: var_or(&lookup, "TWSE_OPENAPI_URL", TwseListedSource::default_base_url()),
                tpex: var_or(&lookup, "TPEX_OPENAPI_URL", TpexOtcSource::default_base_url()),
                isin: var_or(&lookup, "TWSE_ISIN_URL", IsinEtfSource::default_base_url()),
                symbol_directory: var_or(
                    &lookup,
                    "SYMBOL_DIRECTORY_URL",
                    SymbolDirectorySource::default_base_url(),
                ),
                sec: var_or(&lookup, "SEC_TICKERS_URL", SecTickerSource::default_base_url()),
                yahoo: var_or(&lookup, "YAHOO_CHART_URL", YahooProbeSource::default_base_url()),
            },
            probe: ProbeConfig {
                start: var_parse(&lookup, "PROBE_START", 50),
                end: var_parse(&lookup, "PROBE_END", 1000),
                delay_ms: var_parse(&lookup, "PROBE_DELAY_MS", 100),
                timeout_secs: var_parse(&lookup, "PROBE_TIMEOUT_SECS", 5),
            },
        }
    }

    /// 설정 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.probe.start > self.probe.end {
            return Err(CollectorError::Config(format!(
                "PROBE_START({})가 PROBE_END({})보다 큽니다",
                self.probe.start, self.probe.end
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(CollectorError::Config(
                "LISTING_HTTP_TIMEOUT_SECS는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 소스별 HTTP 설정 생성
    pub fn http_settings(&self, base_url: &str) -> HttpSettings {
        HttpSettings::new(base_url)
            .with_timeout(self.http.timeout())
            .with_user_agent(&self.http.user_agent)
    }

    /// Yahoo 탐색용 HTTP 설정 (탐색 전용 타임아웃)
    pub fn probe_http_settings(&self) -> HttpSettings {
        HttpSettings::new(&self.endpoints.yahoo)
            .with_timeout(Duration::from_secs(self.probe.timeout_secs))
            .with_user_agent(&self.http.user_agent)
    }

    /// Yahoo 탐색 설정
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            range: self.probe.start..self.probe.end,
            delay: self.probe.delay(),
            ..ProbeSettings::default()
        }
    }
}

impl HttpConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ProbeConfig {
    /// 요청 간 딜레이를 Duration으로 반환
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// 값을 파싱 (실패 시 기본값 사용)
fn var_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 값이 없거나 비어 있으면 기본값
fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
