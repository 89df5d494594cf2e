//! 심볼 디렉토리 소스 (nasdaqlisted.txt / otherlisted.txt).
//!
//! 파이프(`|`) 구분 텍스트이며 첫 줄은 헤더, 마지막 줄은 `File Creation Time` 푸터입니다.
//! 열 위치가 파일마다 다르므로 헤더 이름으로 필드를 매핑합니다.
//!
//! ```text
//! Symbol|Security Name|Market Category|Test Issue|Financial Status|Round Lot Size|ETF|NextShares
//! AAPL|Apple Inc. - Common Stock|Q|N|N|100|N|N
//! File Creation Time: 0101202500:00|||||||
//! ```

use async_trait::async_trait;

use super::http::{get_checked, HttpSettings};
use super::source::{Origin, RawRecord, SourceAdapter};
use crate::{DataError, Result};

const SYMBOL_DIRECTORY_BASE_URL: &str = "https://www.nasdaqtrader.com";

/// 심볼 디렉토리 파일 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryFile {
    /// NASDAQ 상장 종목
    NasdaqListed,
    /// 기타 거래소 상장 종목 (NYSE, NYSE American, Cboe 등)
    OtherListed,
}

impl DirectoryFile {
    fn path(&self) -> &'static str {
        match self {
            Self::NasdaqListed => "/dynamic/SymDir/nasdaqlisted.txt",
            Self::OtherListed => "/dynamic/SymDir/otherlisted.txt",
        }
    }

    fn source_name(&self) -> &'static str {
        match self {
            Self::NasdaqListed => "nasdaq-listed",
            Self::OtherListed => "other-listed",
        }
    }

    fn origin(&self) -> Origin {
        match self {
            Self::NasdaqListed => Origin::NasdaqListed,
            Self::OtherListed => Origin::OtherListed,
        }
    }
}

/// 심볼 디렉토리 소스.
pub struct SymbolDirectorySource {
    file: DirectoryFile,
    settings: HttpSettings,
}

impl SymbolDirectorySource {
    pub fn new(file: DirectoryFile) -> Self {
        Self::with_settings(file, HttpSettings::new(SYMBOL_DIRECTORY_BASE_URL))
    }

    pub fn with_settings(file: DirectoryFile, settings: HttpSettings) -> Self {
        Self { file, settings }
    }

    pub fn default_base_url() -> &'static str {
        SYMBOL_DIRECTORY_BASE_URL
    }
}

#[async_trait]
impl SourceAdapter for SymbolDirectorySource {
    fn name(&self) -> &str {
        self.file.source_name()
    }

    fn origin(&self) -> Origin {
        self.file.origin()
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let client = self.settings.client()?;
        let url = self.settings.url(self.file.path());

        let response = get_checked(&client, &url).await?;
        let body = response.text().await?;

        let rows = parse_directory(&body)?;
        tracing::info!(file = ?self.file, "심볼 디렉토리 수집: {}개", rows.len());
        Ok(rows)
    }
}

/// 파이프 구분 디렉토리 텍스트 파싱.
///
/// 헤더가 없거나 `|`가 없는 본문은 파싱 오류입니다.
pub fn parse_directory(body: &str) -> Result<Vec<RawRecord>> {
    let mut lines = body.lines().filter(|l| !l.trim().is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| DataError::ParseError("빈 심볼 디렉토리".to_string()))?;

    if !header_line.contains('|') {
        return Err(DataError::ParseError(format!(
            "파이프 구분 헤더가 아님: {}",
            header_line.chars().take(40).collect::<String>()
        )));
    }

    let headers: Vec<&str> = header_line.split('|').map(str::trim).collect();

    let rows = lines
        .filter(|line| line.contains('|') && !line.starts_with("File Creation Time"))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('|').collect();
            if parts.first().map(|p| p.trim().is_empty()).unwrap_or(true) {
                return None;
            }
            Some(
                headers
                    .iter()
                    .zip(parts.iter())
                    .map(|(h, v)| (h.to_string(), v.trim().to_string()))
                    .collect::<RawRecord>(),
            )
        })
        .collect();

    Ok(rows)
}
