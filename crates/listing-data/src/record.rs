//! 정규화된 종목 레코드.
//!
//! 모든 소스의 원시 레코드는 [`CanonicalRecord`] 하나의 스키마로 변환됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 시장 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Market {
    /// 상장 (거래소 본시장)
    Listed,
    /// 장외 시장 (OTC)
    OverTheCounter,
    /// 신흥 시장
    Emerging,
    /// NASDAQ 상장
    Nasdaq,
    /// 기타 거래소 상장 (NYSE, NYSE American 등)
    OtherExchange,
    /// 규제기관 공시 파일
    RegulatorFiling,
}

impl Market {
    /// 모든 시장 (출력 순서 고정용).
    pub const ALL: [Market; 6] = [
        Market::Listed,
        Market::OverTheCounter,
        Market::Emerging,
        Market::Nasdaq,
        Market::OtherExchange,
        Market::RegulatorFiling,
    ];

    /// 직렬화 이름과 동일한 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listed => "listed",
            Self::OverTheCounter => "over-the-counter",
            Self::Emerging => "emerging",
            Self::Nasdaq => "nasdaq",
            Self::OtherExchange => "other-exchange",
            Self::RegulatorFiling => "regulator-filing",
        }
    }

    /// 문자열에서 시장 파싱.
    ///
    /// 직렬화 이름 외에 원본 소스가 쓰는 표기(上市, 上櫃, 興櫃, NASDAQ, SEC 등)도 인식합니다.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let upper = s.to_uppercase();
        match upper.as_str() {
            "LISTED" | "上市" | "TWSE" => Some(Self::Listed),
            "OVER-THE-COUNTER" | "OTC" | "上櫃" | "TPEX" => Some(Self::OverTheCounter),
            "EMERGING" | "興櫃" => Some(Self::Emerging),
            "NASDAQ" => Some(Self::Nasdaq),
            "OTHER-EXCHANGE" | "OTHER" => Some(Self::OtherExchange),
            "REGULATOR-FILING" | "SEC" => Some(Self::RegulatorFiling),
            _ => None,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 거래소 지역 (국내/해외).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// 대만 (국내)
    #[serde(rename = "TW")]
    Tw,
    /// 미국 (해외)
    #[serde(rename = "US")]
    Us,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tw => "TW",
            Self::Us => "US",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TW" | "TWN" => Some(Self::Tw),
            "US" | "USA" => Some(Self::Us),
            _ => None,
        }
    }

    /// 시세 조회용 심볼 접미사.
    ///
    /// - TW 상장: `.TW`
    /// - TW 장외/신흥: `.TWO`
    /// - US: 접미사 없음
    pub fn quote_suffix(&self, market: Market) -> &'static str {
        match (self, market) {
            (Self::Tw, Market::OverTheCounter | Market::Emerging) => ".TWO",
            (Self::Tw, _) => ".TW",
            (Self::Us, _) => "",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정규화된 종목 레코드.
///
/// 선택 필드는 값이 없을 때도 빈 문자열로 유지되어 출력에 항상 나타납니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// 종목 코드 (예: 2330, 0050, AAPL)
    pub code: String,
    /// 종목명
    pub name: String,
    /// 시장 구분
    pub market: Market,
    /// 지역
    pub region: Region,
    /// 시세 조회용 심볼 (예: 2330.TW, 6488.TWO, AAPL)
    pub quote_symbol: String,
    /// ISIN 코드
    #[serde(default)]
    pub isin: String,
    /// 상장일 (검증하지 않음)
    #[serde(default)]
    pub listing_date: String,
    /// 업종
    #[serde(default)]
    pub industry: String,
    /// 펀드/ETF 여부
    #[serde(default)]
    pub is_fund: bool,
}

/// 코드와 지역/시장으로 시세 심볼 생성.
pub fn quote_symbol(code: &str, region: Region, market: Market) -> String {
    format!("{}{}", code, region.quote_suffix(market))
}

impl CanonicalRecord {
    /// 필수 필드만으로 생성 (시세 심볼은 자동 유도).
    pub fn new(code: impl Into<String>, name: impl Into<String>, market: Market, region: Region) -> Self {
        let code = code.into();
        let quote_symbol = quote_symbol(&code, region, market);
        Self {
            code,
            name: name.into(),
            market,
            region,
            quote_symbol,
            isin: String::new(),
            listing_date: String::new(),
            industry: String::new(),
            is_fund: false,
        }
    }

    /// 표시 문자열 생성: "코드 - 종목명 (시세 심볼)".
    pub fn to_display_string(&self) -> String {
        format!("{} - {} ({})", self.code, self.name, self.quote_symbol)
    }
}
