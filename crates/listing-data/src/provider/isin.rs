//! 증권거래소 ISIN 조회 페이지 크롤러 (ETF).
//!
//! `C_public.jsp?strMode=2` 페이지는 Big5 인코딩 HTML 테이블입니다.
//! 각 행의 첫 셀은 `코드<U+3000>종목명` 형식이고, 이어서 ISIN, 상장일, 시장, 업종 순입니다.
//!
//! ```text
//! <tr><td>0050　元大台灣50</td><td>TW0000050004</td><td>2003/06/30</td><td>上市</td><td></td><td>CEOGEU</td><td></td></tr>
//! ```

use async_trait::async_trait;
use scraper::{Html, Selector};

use super::http::{get_checked, HttpSettings};
use super::source::{Origin, RawRecord, SourceAdapter};
use crate::{DataError, Result};

const ISIN_BASE_URL: &str = "https://isin.twse.com.tw";
const ISIN_ETF_PATH: &str = "/isin/C_public.jsp?strMode=2";

/// 원시 레코드 필드명 (페이지 헤더와 동일).
pub const FIELD_CODE: &str = "有價證券代號";
pub const FIELD_NAME: &str = "有價證券名稱";
pub const FIELD_ISIN: &str = "國際證券辨識號碼";
pub const FIELD_LISTING_DATE: &str = "上市日";
pub const FIELD_MARKET: &str = "市場別";
pub const FIELD_INDUSTRY: &str = "產業別";

/// ISIN 페이지 ETF 소스.
pub struct IsinEtfSource {
    settings: HttpSettings,
}

impl IsinEtfSource {
    pub fn new() -> Self {
        Self::with_settings(HttpSettings::new(ISIN_BASE_URL))
    }

    pub fn with_settings(settings: HttpSettings) -> Self {
        Self { settings }
    }

    pub fn default_base_url() -> &'static str {
        ISIN_BASE_URL
    }
}

impl Default for IsinEtfSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for IsinEtfSource {
    fn name(&self) -> &str {
        "isin-etf"
    }

    fn origin(&self) -> Origin {
        Origin::TwseIsinEtf
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let client = self.settings.client()?;
        let url = self.settings.url(ISIN_ETF_PATH);

        let response = get_checked(&client, &url).await?;
        // 헤더의 charset(MS950 등)과 무관하게 Big5로 디코딩
        let bytes = response.bytes().await?;
        let (html, _, had_errors) = encoding_rs::BIG5.decode(&bytes);
        if had_errors {
            tracing::debug!("ISIN 페이지에 Big5로 해석되지 않는 바이트 포함");
        }

        let rows = parse_isin_page(&html)?;
        tracing::info!("ISIN 페이지 ETF 수집: {}개", rows.len());
        Ok(rows)
    }
}

/// ISIN 페이지 HTML에서 ETF 행 추출.
///
/// 코드가 `00`으로 시작하고 앞 4자리가 숫자인 행만 ETF로 간주합니다.
pub fn parse_isin_page(html: &str) -> Result<Vec<RawRecord>> {
    let tr_selector = Selector::parse("tr")
        .map_err(|e| DataError::ParseError(format!("selector 오류: {:?}", e)))?;
    let td_selector = Selector::parse("td")
        .map_err(|e| DataError::ParseError(format!("selector 오류: {:?}", e)))?;

    let document = Html::parse_document(html);
    let mut rows = Vec::new();

    for tr in document.select(&tr_selector) {
        let cells: Vec<String> = tr
            .select(&td_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();

        if cells.len() < 5 {
            continue;
        }

        let Some((code, name)) = split_code_name(&cells[0]) else {
            continue;
        };

        if !is_etf_code(code) {
            continue;
        }

        rows.push(
            RawRecord::new()
                .with(FIELD_CODE, code)
                .with(FIELD_NAME, name)
                .with(FIELD_ISIN, cells[1].as_str())
                .with(FIELD_LISTING_DATE, cells[2].as_str())
                .with(FIELD_MARKET, cells[3].as_str())
                .with(FIELD_INDUSTRY, cells[4].as_str()),
        );
    }

    Ok(rows)
}

/// `코드<U+3000>종목명` 분리. 전각 공백이 없으면 일반 공백으로 시도.
fn split_code_name(cell: &str) -> Option<(&str, &str)> {
    let (code, name) = cell
        .split_once('\u{3000}')
        .or_else(|| cell.split_once(char::is_whitespace))?;
    let code = code.trim();
    let name = name.trim();

    if code.is_empty() {
        return None;
    }
    Some((code, name))
}

fn is_etf_code(code: &str) -> bool {
    code.starts_with("00")
        && code.len() >= 4
        && code.chars().take(4).all(|c| c.is_ascii_digit())
}
