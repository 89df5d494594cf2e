//! 에러 타입 정의.
//!
//! 소스 실패는 수집 결과에 기록될 뿐 에러가 아닙니다.
//! 실행을 중단시키는 것은 잘못된 실행 인자와 출력 파일 기록 실패뿐입니다.

use std::fmt;

use listing_data::DataError;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러 (환경변수 값, 탐색 범위 등)
    Config(String),
    /// 프로필에 없는 소스 이름
    UnknownSource {
        profile: String,
        name: String,
        available: Vec<String>,
    },
    /// 출력 파일 기록 에러
    Sink(DataError),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::UnknownSource {
                profile,
                name,
                available,
            } => write!(
                f,
                "Unknown source '{}' for profile {} (available: {})",
                name,
                profile,
                available.join(", ")
            ),
            Self::Sink(e) => write!(f, "Sink error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sink(e) => Some(e),
            _ => None,
        }
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
