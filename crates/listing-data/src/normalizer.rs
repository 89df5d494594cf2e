//! Record Normalizer.
//!
//! 출처별 원시 필드명을 정규 스키마([`CanonicalRecord`])로 옮깁니다.
//! 매핑은 출처마다 고정된 [`FieldMap`] 테이블 하나로 정의되며,
//! 필수 필드 `code`가 없거나 공백뿐이면 레코드를 버립니다.
//!
//! | 출처 | code | name | market | region | fund |
//! |------|------|------|--------|--------|------|
//! | twse_listed | 公司代號 | 公司簡稱 → 公司名稱 | listed | TW | - |
//! | tpex_otc | Code | Name | over-the-counter | TW | - |
//! | twse_isin_etf | 有價證券代號 | 有價證券名稱 | 市場別 (기본 listed) | TW | 항상 |
//! | nasdaq_listed | Symbol | Security Name | nasdaq | US | ETF 열 |
//! | other_listed | ACT Symbol | Security Name | other-exchange | US | ETF 열 |
//! | sec_tickers | ticker | title | regulator-filing | US | - |
//! | yahoo_chart | code | shortName → longName | listed | TW | 항상 |
//! | seed_table | code | name | market 열 | region 열 | is_fund 열 |

use crate::provider::isin;
use crate::provider::source::{Origin, RawRecord};
use crate::record::{quote_symbol, CanonicalRecord, Market, Region};
use crate::seed;

/// 시장 결정 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketRule {
    /// 고정 값
    Fixed(Market),
    /// 원시 필드에서 읽고, 없거나 인식할 수 없으면 기본값
    Field { key: &'static str, default: Market },
}

/// 지역 결정 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRule {
    Fixed(Region),
    Field { key: &'static str, default: Region },
}

/// 펀드 여부 결정 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundRule {
    Never,
    Always,
    /// 플래그 필드 (`true`, `"Y"`, `"1"` 등이면 펀드)
    Flag(&'static str),
}

/// 출처별 필드 매핑 테이블.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub code: &'static str,
    /// 종목명 후보 필드 (앞에서부터 처음으로 비어 있지 않은 값 사용)
    pub name: &'static [&'static str],
    pub isin: Option<&'static str>,
    pub listing_date: Option<&'static str>,
    pub industry: Option<&'static str>,
    /// 업종 필드가 비어 있을 때 사용할 값
    pub industry_default: &'static str,
    pub market: MarketRule,
    pub region: RegionRule,
    pub fund: FundRule,
}

const TWSE_LISTED: FieldMap = FieldMap {
    code: "公司代號",
    name: &["公司簡稱", "公司名稱"],
    isin: Some("ISIN"),
    listing_date: Some("上市日期"),
    industry: Some("產業別"),
    industry_default: "",
    market: MarketRule::Fixed(Market::Listed),
    region: RegionRule::Fixed(Region::Tw),
    fund: FundRule::Never,
};

const TPEX_OTC: FieldMap = FieldMap {
    code: "Code",
    name: &["Name"],
    isin: Some("ISIN"),
    listing_date: Some("ListingDate"),
    industry: Some("Industry"),
    industry_default: "",
    market: MarketRule::Fixed(Market::OverTheCounter),
    region: RegionRule::Fixed(Region::Tw),
    fund: FundRule::Never,
};

const TWSE_ISIN_ETF: FieldMap = FieldMap {
    code: isin::FIELD_CODE,
    name: &[isin::FIELD_NAME],
    isin: Some(isin::FIELD_ISIN),
    listing_date: Some(isin::FIELD_LISTING_DATE),
    industry: Some(isin::FIELD_INDUSTRY),
    industry_default: "ETF",
    market: MarketRule::Field {
        key: isin::FIELD_MARKET,
        default: Market::Listed,
    },
    region: RegionRule::Fixed(Region::Tw),
    fund: FundRule::Always,
};

const NASDAQ_LISTED: FieldMap = FieldMap {
    code: "Symbol",
    name: &["Security Name"],
    isin: None,
    listing_date: None,
    industry: None,
    industry_default: "",
    market: MarketRule::Fixed(Market::Nasdaq),
    region: RegionRule::Fixed(Region::Us),
    fund: FundRule::Flag("ETF"),
};

const OTHER_LISTED: FieldMap = FieldMap {
    code: "ACT Symbol",
    name: &["Security Name"],
    isin: None,
    listing_date: None,
    industry: None,
    industry_default: "",
    market: MarketRule::Fixed(Market::OtherExchange),
    region: RegionRule::Fixed(Region::Us),
    fund: FundRule::Flag("ETF"),
};

const SEC_TICKERS: FieldMap = FieldMap {
    code: "ticker",
    name: &["title"],
    isin: None,
    listing_date: None,
    industry: None,
    industry_default: "",
    market: MarketRule::Fixed(Market::RegulatorFiling),
    region: RegionRule::Fixed(Region::Us),
    fund: FundRule::Never,
};

const YAHOO_CHART: FieldMap = FieldMap {
    code: "code",
    name: &["shortName", "longName"],
    isin: None,
    listing_date: None,
    industry: None,
    industry_default: "ETF",
    market: MarketRule::Fixed(Market::Listed),
    region: RegionRule::Fixed(Region::Tw),
    fund: FundRule::Always,
};

const SEED_TABLE: FieldMap = FieldMap {
    code: seed::FIELD_CODE,
    name: &[seed::FIELD_NAME],
    isin: None,
    listing_date: None,
    industry: Some(seed::FIELD_INDUSTRY),
    industry_default: "",
    market: MarketRule::Field {
        key: seed::FIELD_MARKET,
        default: Market::Listed,
    },
    region: RegionRule::Field {
        key: seed::FIELD_REGION,
        default: Region::Tw,
    },
    fund: FundRule::Flag(seed::FIELD_IS_FUND),
};

impl FieldMap {
    /// 출처에 해당하는 매핑 테이블.
    pub fn for_origin(origin: Origin) -> &'static FieldMap {
        match origin {
            Origin::TwseListed => &TWSE_LISTED,
            Origin::TpexOtc => &TPEX_OTC,
            Origin::TwseIsinEtf => &TWSE_ISIN_ETF,
            Origin::NasdaqListed => &NASDAQ_LISTED,
            Origin::OtherListed => &OTHER_LISTED,
            Origin::SecTickers => &SEC_TICKERS,
            Origin::YahooChart => &YAHOO_CHART,
            Origin::SeedTable => &SEED_TABLE,
        }
    }

    /// 원시 레코드에 매핑 적용. 코드가 없으면 `None`.
    pub fn apply(&self, raw: &RawRecord) -> Option<CanonicalRecord> {
        let code = raw.text(self.code).filter(|c| !c.is_empty())?;

        let name = self
            .name
            .iter()
            .filter_map(|key| raw.text(key))
            .find(|n| !n.is_empty())
            .unwrap_or_default();

        let market = match self.market {
            MarketRule::Fixed(market) => market,
            MarketRule::Field { key, default } => raw
                .text(key)
                .and_then(|v| Market::parse(&v))
                .unwrap_or(default),
        };

        let region = match self.region {
            RegionRule::Fixed(region) => region,
            RegionRule::Field { key, default } => raw
                .text(key)
                .and_then(|v| Region::parse(&v))
                .unwrap_or(default),
        };

        let is_fund = match self.fund {
            FundRule::Never => false,
            FundRule::Always => true,
            FundRule::Flag(key) => raw.flag(key).unwrap_or(false),
        };

        let optional = |key: Option<&'static str>| -> String {
            key.and_then(|k| raw.text(k)).unwrap_or_default()
        };

        let mut industry = optional(self.industry);
        if industry.is_empty() {
            industry = self.industry_default.to_string();
        }

        Some(CanonicalRecord {
            quote_symbol: quote_symbol(&code, region, market),
            code,
            name,
            market,
            region,
            isin: optional(self.isin),
            listing_date: optional(self.listing_date),
            industry,
            is_fund,
        })
    }
}

/// 원시 레코드를 출처의 매핑 테이블로 정규화.
///
/// 순수 함수이며 같은 입력에는 항상 같은 결과를 반환합니다.
pub fn normalize(raw: &RawRecord, origin: Origin) -> Option<CanonicalRecord> {
    FieldMap::for_origin(origin).apply(raw)
}
