//! HTTP 공통 설정.

use reqwest::{Client, Response};
use std::time::Duration;

use crate::{DataError, Result};

/// 기본 User-Agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP 소스 설정.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Base URL (테스트에서 mock 서버로 교체)
    pub base_url: String,
    /// 요청 타임아웃
    pub timeout: Duration,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl HttpSettings {
    /// 기본 타임아웃(30초)으로 생성.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// 경로를 붙여 전체 URL 생성.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// 타임아웃과 User-Agent가 적용된 클라이언트 생성.
    pub fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))
    }
}

/// GET 요청 후 2xx가 아니면 오류로 처리.
pub async fn get_checked(client: &Client, url: &str) -> Result<Response> {
    tracing::debug!(url = %url, "HTTP 요청");

    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(DataError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}
