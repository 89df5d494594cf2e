//! 로깅 초기화.
//!
//! 로그는 stderr로 출력되고, stdout은 사람이 읽는 수집 요약에 사용됩니다.
//! 레벨은 `RUST_LOG`가 있으면 우선하며, 형식은 `LOG_FORMAT`(text, json, compact)으로 고릅니다.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 기본 한 줄 형식
    #[default]
    Text,
    /// 로그 집계용 JSON 형식
    Json,
    /// 간결한 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// `LOG_FORMAT` 환경변수에서 읽기 (없거나 잘못되면 Text).
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// CLI 로그 레벨을 두 crate에 적용하는 필터 문자열.
pub fn default_filter(level: &str) -> String {
    format!("listing_collector={level},listing_data={level}", level = level)
}

/// 로깅 초기화.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter(level)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}
