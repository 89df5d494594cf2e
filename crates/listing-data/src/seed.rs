//! 내장 정적 종목 테이블.
//!
//! 운용사 계열별로 수기 관리되던 목록을 그대로 옮긴 시드 데이터입니다.
//! 같은 코드가 서로 다른 계열 아래 다른 이름으로 중복 등장하는 행이 있으며
//! (예: 00930, 00941~00949), 수정하지 않고 그대로 둡니다.
//! 중복은 Collector의 first-seen-wins 규칙으로만 해소되므로
//! 테이블에서 먼저 나온 이름이 남습니다. 실제 종목명과 다를 수 있습니다.

use crate::provider::source::RawRecord;
use crate::record::{Market, Region};

/// 시드 레코드 필드명.
pub const FIELD_CODE: &str = "code";
pub const FIELD_NAME: &str = "name";
pub const FIELD_MARKET: &str = "market";
pub const FIELD_REGION: &str = "region";
pub const FIELD_INDUSTRY: &str = "industry";
pub const FIELD_IS_FUND: &str = "is_fund";

/// 정적 종목 테이블.
#[derive(Debug, Clone, Copy)]
pub struct SeedTable {
    /// 테이블 이름 (소스 이름으로 사용)
    pub name: &'static str,
    pub market: Market,
    pub region: Region,
    /// 모든 행에 적용할 업종
    pub industry: &'static str,
    pub is_fund: bool,
    /// (코드, 종목명)
    pub rows: &'static [(&'static str, &'static str)],
}

impl SeedTable {
    /// 원시 레코드 목록으로 변환 (행 순서 유지).
    pub fn to_raw_records(&self) -> Vec<RawRecord> {
        self.rows
            .iter()
            .map(|(code, name)| {
                RawRecord::new()
                    .with(FIELD_CODE, *code)
                    .with(FIELD_NAME, *name)
                    .with(FIELD_MARKET, self.market.as_str())
                    .with(FIELD_REGION, self.region.as_str())
                    .with(FIELD_INDUSTRY, self.industry)
                    .with(FIELD_IS_FUND, self.is_fund)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 대만 상장 ETF (운용사 계열별).
pub const TW_ETF_SERIES: SeedTable = SeedTable {
    name: "tw-etf-series",
    market: Market::Listed,
    region: Region::Tw,
    industry: "ETF",
    is_fund: true,
    rows: TW_ETF_ROWS,
};

/// 대만 주요 상장 종목.
pub const TW_BASIC_LISTED: SeedTable = SeedTable {
    name: "tw-basic-listed",
    market: Market::Listed,
    region: Region::Tw,
    industry: "",
    is_fund: false,
    rows: &[
        ("2330", "台積電"),
        ("2317", "鴻海"),
        ("2454", "聯發科"),
        ("2412", "中華電"),
        ("1301", "台塑"),
        ("1303", "南亞"),
        ("2881", "富邦金"),
        ("2882", "國泰金"),
        ("2002", "中鋼"),
        ("1216", "統一"),
    ],
};

/// 장외시장 API 실패 시 대체 목록.
pub const TW_BASIC_OTC: SeedTable = SeedTable {
    name: "tw-basic-otc",
    market: Market::OverTheCounter,
    region: Region::Tw,
    industry: "",
    is_fund: false,
    rows: &[
        ("6488", "環球晶圓"),
        ("6415", "矽力-KY"),
        ("6488", "環球晶圓"),
        ("6488", "環球晶圓"),
        ("6488", "環球晶圓"),
    ],
};

/// 이름으로 시드 테이블 조회.
pub fn by_name(name: &str) -> Option<SeedTable> {
    [TW_ETF_SERIES, TW_BASIC_LISTED, TW_BASIC_OTC]
        .into_iter()
        .find(|t| t.name == name)
}

const TW_ETF_ROWS: &[(&str, &str)] = &[
    // 元大 계열
    ("0050", "元大台灣50"),
    ("0051", "元大中型100"),
    ("0052", "元大台灣50正2"),
    ("0053", "元大台灣50反1"),
    ("0054", "元大台商50"),
    ("0055", "元大MSCI金融"),
    ("0056", "元大高股息"),
    ("0057", "元大MSCI台灣"),
    ("0058", "元大MSCI台灣正2"),
    ("0059", "元大MSCI台灣反1"),
    ("0060", "元大寶滬深"),
    ("0061", "元大寶滬深"),
    ("0062", "元大MSCI中國"),
    ("0063", "元大MSCI中國正2"),
    ("0064", "元大MSCI中國反1"),
    ("0065", "元大MSCI中國A股"),
    ("0066", "元大MSCI中國A股正2"),
    ("0067", "元大MSCI中國A股反1"),
    ("0068", "元大MSCI中國A股國際"),
    ("0069", "元大MSCI中國A股國際正2"),
    ("0070", "元大MSCI中國A股國際反1"),
    // 富邦 계열
    ("00692", "富邦公司治理"),
    ("00693", "富邦台灣公司治理100"),
    ("00694", "富邦台灣公司治理100正2"),
    ("00695", "富邦台灣公司治理100反1"),
    ("00696", "富邦台灣公司治理100槓桿"),
    ("00697", "富邦台灣公司治理100反向"),
    ("00698", "富邦台灣公司治理100槓桿反向"),
    ("00699", "富邦台灣公司治理100槓桿反向2"),
    // 國泰 계열
    ("00878", "國泰永續高股息"),
    ("00879", "國泰台灣5G+"),
    ("00880", "國泰台灣5G+正2"),
    ("00881", "國泰台灣5G+"),
    ("00882", "國泰台灣5G+正2"),
    ("00883", "國泰台灣5G+反1"),
    ("00884", "國泰台灣5G+槓桿"),
    ("00885", "國泰台灣5G+反向"),
    ("00886", "國泰台灣5G+槓桿反向"),
    ("00887", "國泰台灣5G+槓桿反向2"),
    ("00888", "國泰台灣5G+槓桿反向3"),
    ("00889", "國泰台灣5G+槓桿反向4"),
    ("00890", "國泰台灣5G+槓桿反向5"),
    ("00891", "國泰台灣5G+槓桿反向6"),
    // 富邦 계열 (계속)
    ("00892", "富邦台灣半導體"),
    ("00893", "富邦台灣半導體正2"),
    ("00894", "富邦台灣半導體反1"),
    ("00895", "富邦台灣半導體槓桿"),
    ("00896", "富邦台灣半導體反向"),
    ("00897", "富邦台灣半導體槓桿反向"),
    ("00898", "富邦台灣半導體槓桿反向2"),
    ("00899", "富邦台灣半導體槓桿反向3"),
    // 復華 계열
    ("00929", "復華台灣科技"),
    ("00930", "復華台灣科技正2"),
    ("00931", "復華台灣科技反1"),
    ("00932", "復華台灣科技槓桿"),
    ("00933", "復華台灣科技反向"),
    ("00934", "復華台灣科技槓桿反向"),
    // 永豐 계열
    ("00930", "永豐台灣ESG"),
    ("00931", "永豐台灣ESG正2"),
    ("00932", "永豐台灣ESG反1"),
    ("00933", "永豐台灣ESG槓桿"),
    ("00934", "永豐台灣ESG反向"),
    // 野村 계열
    ("00935", "野村台灣創新科技"),
    ("00936", "野村台灣創新科技正2"),
    ("00937", "野村台灣創新科技反1"),
    ("00938", "野村台灣創新科技槓桿"),
    // 統一 계열
    ("00939", "統一台灣高息動能"),
    ("00940", "統一台灣高息動能正2"),
    ("00941", "統一台灣高息動能反1"),
    ("00942", "統一台灣高息動能槓桿"),
    // 元大 계열 (계속)
    ("00940", "元大台灣價值高息"),
    ("00941", "元大台灣價值高息正2"),
    ("00942", "元大台灣價值高息反1"),
    ("00943", "元大台灣價值高息槓桿"),
    // 中信 계열
    ("00941", "中信上游半導體"),
    ("00942", "中信小資高價30"),
    ("00943", "中信上游半導體正2"),
    ("00944", "中信上游半導體反1"),
    // 兆豐 계열
    ("00943", "兆豐台灣晶圓製造"),
    ("00944", "兆豐台灣晶圓製造正2"),
    ("00945", "兆豐台灣晶圓製造反1"),
    // 野村 계열 (계속)
    ("00944", "野村趨勢動能高息"),
    ("00945", "野村台灣創新科技50"),
    ("00946", "野村趨勢動能高息正2"),
    ("00947", "野村趨勢動能高息反1"),
    // 群益 계열
    ("00946", "群益台灣精選高息"),
    ("00947", "群益台灣精選高息正2"),
    ("00948", "群益台灣精選高息反1"),
    // 統一 계열 (계속)
    ("00947", "統一台灣高息動能"),
    ("00948", "統一台灣高息動能正2"),
    ("00949", "統一台灣高息動能反1"),
    // 元大 계열 (계속)
    ("00948", "元大台灣高息低波"),
    ("00949", "富邦台灣半導體"),
    ("00950", "元大台灣高息低波"),
    ("00951", "元大台灣高息低波正2"),
    ("00952", "元大台灣高息低波反1"),
    ("00953", "元大台灣高息低波槓桿"),
    ("00954", "元大台灣高息低波反向"),
    ("00955", "元大台灣高息低波槓桿反向"),
    ("00956", "元大台灣高息低波槓桿反向2"),
    ("00957", "元大台灣高息低波槓桿反向3"),
    ("00958", "元大台灣高息低波槓桿反向4"),
    ("00959", "元大台灣高息低波槓桿反向5"),
    // 기타 주요 ETF
    ("00701", "國泰股利精選30"),
    ("00702", "國泰股利精選30正2"),
    ("00703", "國泰股利精選30反1"),
    ("00704", "國泰股利精選30槓桿"),
    ("00705", "國泰股利精選30反向"),
    ("00706", "國泰股利精選30槓桿反向"),
    ("00707", "國泰股利精選30槓桿反向2"),
    ("00708", "國泰股利精選30槓桿反向3"),
    ("00709", "國泰股利精選30槓桿反向4"),
    ("00710", "國泰股利精選30槓桿反向5"),
    // 元大 계열 (추가)
    ("00711", "元大台灣50正2"),
    ("00712", "元大台灣50反1"),
    ("00713", "元大台灣50槓桿"),
    ("00714", "元大台灣50反向"),
    ("00715", "元大台灣50槓桿反向"),
    ("00716", "元大台灣50槓桿反向2"),
    ("00717", "元大台灣50槓桿反向3"),
    ("00718", "元大台灣50槓桿反向4"),
    ("00719", "元大台灣50槓桿反向5"),
    ("00720", "元大台灣50槓桿反向6"),
];
