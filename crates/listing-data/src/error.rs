//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터 가져오기 오류 (네트워크, 타임아웃)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 2xx 이외의 HTTP 응답
    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// 파싱 오류 (응답 형식 불일치)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::ParseError(err.to_string())
        } else if err.is_timeout() {
            DataError::FetchError(format!("timeout: {}", err))
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        // 기록 중 입출력 실패(디스크 부족 등)는 Io로 분류
        if err.is_io() {
            DataError::Io(std::io::Error::from(err))
        } else {
            DataError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
