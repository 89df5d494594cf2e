//! Source Adapter 통합 테스트 (mock HTTP 서버).

use std::time::Duration;

use listing_data::provider::yahoo_probe::ProbeSettings;
use listing_data::{
    fetch_contained, normalize, DirectoryFile, FallbackSource, HttpSettings, IsinEtfSource,
    Market, Origin, SecTickerSource, SourceAdapter, StaticTableSource, SymbolDirectorySource,
    TpexOtcSource, TwseListedSource, YahooProbeSource,
};
use mockito::{Matcher, Server};

fn settings(server: &Server) -> HttpSettings {
    HttpSettings::new(server.url()).with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_twse_listed_fetch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/opendata/t187ap03_L")
        .with_status(200)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body(
            r#"[
                {"出表日期":"1140101","公司代號":"2330","公司名稱":"台灣積體電路製造股份有限公司","公司簡稱":"台積電","產業別":"24","上市日期":"19940905"},
                {"出表日期":"1140101","公司代號":"2317","公司名稱":"鴻海精密工業股份有限公司","公司簡稱":"鴻海","產業別":"31","上市日期":"19910618"}
            ]"#,
        )
        .create_async()
        .await;

    let source = TwseListedSource::with_settings(settings(&server));
    let batch = fetch_contained(&source).await;

    mock.assert_async().await;
    assert!(!batch.is_failed());
    assert_eq!(batch.origin, Origin::TwseListed);
    assert_eq!(batch.records.len(), 2);

    let record = normalize(&batch.records[0], batch.origin).unwrap();
    assert_eq!(record.quote_symbol, "2330.TW");
    assert_eq!(record.name, "台積電");
}

#[tokio::test]
async fn test_tpex_non_200_is_contained() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/openapi/v1/stock/info")
        .with_status(503)
        .create_async()
        .await;

    let source = TpexOtcSource::with_settings(settings(&server));
    let batch = fetch_contained(&source).await;

    assert!(batch.is_failed());
    assert!(batch.records.is_empty());
    assert!(batch.error.unwrap().contains("503"));
}

#[tokio::test]
async fn test_tpex_malformed_payload_is_contained() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/openapi/v1/stock/info")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"maintenance"}"#)
        .create_async()
        .await;

    let source = TpexOtcSource::with_settings(settings(&server));
    let batch = fetch_contained(&source).await;

    assert!(batch.is_failed());
    assert!(batch.records.is_empty());
}

#[tokio::test]
async fn test_tpex_failure_falls_back_to_seed_table() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/openapi/v1/stock/info")
        .with_status(500)
        .create_async()
        .await;

    let source = FallbackSource::new(
        Box::new(TpexOtcSource::with_settings(settings(&server))),
        StaticTableSource::from_seed(&listing_data::seed::TW_BASIC_OTC),
    );
    let batch = fetch_contained(&source).await;

    assert!(!batch.is_failed());
    assert_eq!(batch.source, "tpex");
    assert_eq!(batch.origin, Origin::SeedTable);

    let record = normalize(&batch.records[0], batch.origin).unwrap();
    assert_eq!(record.market, Market::OverTheCounter);
    assert_eq!(record.quote_symbol, "6488.TWO");
}

#[tokio::test]
async fn test_tpex_success_keeps_primary_origin() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/openapi/v1/stock/info")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"Code":"6488","Name":"環球晶","ISIN":"TW0006488000","ListingDate":"20150925","Industry":"24"}]"#)
        .create_async()
        .await;

    let source = FallbackSource::new(
        Box::new(TpexOtcSource::with_settings(settings(&server))),
        StaticTableSource::from_seed(&listing_data::seed::TW_BASIC_OTC),
    );
    let batch = fetch_contained(&source).await;

    assert_eq!(batch.origin, Origin::TpexOtc);
    assert_eq!(batch.records.len(), 1);

    let record = normalize(&batch.records[0], batch.origin).unwrap();
    assert_eq!(record.isin, "TW0006488000");
    assert_eq!(record.listing_date, "20150925");
}

#[tokio::test]
async fn test_isin_etf_page_big5() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/isin/C_public.jsp")
        .match_query(Matcher::UrlEncoded("strMode".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(include_bytes!("fixtures/isin_etf_big5.html").as_slice())
        .create_async()
        .await;

    let source = IsinEtfSource::with_settings(settings(&server));
    let batch = fetch_contained(&source).await;

    assert!(!batch.is_failed());
    let records: Vec<_> = batch
        .records
        .iter()
        .filter_map(|raw| normalize(raw, batch.origin))
        .collect();

    let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["0050", "0056", "00878"]);
    assert_eq!(records[2].name, "國泰永續高股息");
    assert!(records.iter().all(|r| r.is_fund));
}

#[tokio::test]
async fn test_isin_etf_page_ignores_header_charset() {
    for content_type in ["text/html;charset=MS950", "text/html; charset=cp950"] {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/isin/C_public.jsp")
            .match_query(Matcher::UrlEncoded("strMode".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", content_type)
            .with_body(include_bytes!("fixtures/isin_etf_big5.html").as_slice())
            .create_async()
            .await;

        let source = IsinEtfSource::with_settings(settings(&server));
        let batch = fetch_contained(&source).await;

        assert!(!batch.is_failed(), "{}", content_type);
        let records: Vec<_> = batch
            .records
            .iter()
            .filter_map(|raw| normalize(raw, batch.origin))
            .collect();
        assert_eq!(records.len(), 3, "{}", content_type);
        assert_eq!(records[0].name, "元大台灣50", "{}", content_type);
    }
}

#[tokio::test]
async fn test_symbol_directory_files() {
    let mut server = Server::new_async().await;
    let _nasdaq = server
        .mock("GET", "/dynamic/SymDir/nasdaqlisted.txt")
        .with_status(200)
        .with_body(
            "Symbol|Security Name|Market Category|Test Issue|Financial Status|Round Lot Size|ETF|NextShares\n\
             AAPL|Apple Inc. - Common Stock|Q|N|N|100|N|N\n\
             QQQ|Invesco QQQ Trust, Series 1|G|N|N|100|Y|N\n\
             File Creation Time: 0101202500:00|||||||\n",
        )
        .create_async()
        .await;
    let _other = server
        .mock("GET", "/dynamic/SymDir/otherlisted.txt")
        .with_status(200)
        .with_body(
            "ACT Symbol|Security Name|Exchange|CQS Symbol|ETF|Round Lot Size|Test Issue|NASDAQ Symbol\n\
             SPY|SPDR S&P 500 ETF Trust|P|SPY|Y|100|N|SPY\n\
             File Creation Time: 0101202500:00|||||||\n",
        )
        .create_async()
        .await;

    let nasdaq = SymbolDirectorySource::with_settings(DirectoryFile::NasdaqListed, settings(&server));
    let other = SymbolDirectorySource::with_settings(DirectoryFile::OtherListed, settings(&server));

    let nasdaq_batch = fetch_contained(&nasdaq).await;
    let other_batch = fetch_contained(&other).await;

    assert_eq!(nasdaq.name(), "nasdaq-listed");
    assert_eq!(nasdaq_batch.records.len(), 2);
    assert_eq!(other_batch.records.len(), 1);

    let qqq = normalize(&nasdaq_batch.records[1], nasdaq_batch.origin).unwrap();
    assert_eq!(qqq.market, Market::Nasdaq);
    assert!(qqq.is_fund);

    let spy = normalize(&other_batch.records[0], other_batch.origin).unwrap();
    assert_eq!(spy.market, Market::OtherExchange);
    assert_eq!(spy.quote_symbol, "SPY");
}

#[tokio::test]
async fn test_sec_company_tickers() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/files/company_tickers.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"0":{"cik_str":320193,"ticker":"AAPL","title":"Apple Inc."},"1":{"cik_str":789019,"ticker":"MSFT","title":"MICROSOFT CORP"}}"#,
        )
        .create_async()
        .await;

    let source = SecTickerSource::with_settings(settings(&server));
    let batch = fetch_contained(&source).await;

    assert_eq!(batch.records.len(), 2);
    let msft = normalize(&batch.records[1], batch.origin).unwrap();
    assert_eq!(msft.code, "MSFT");
    assert_eq!(msft.market, Market::RegulatorFiling);
}

#[tokio::test]
async fn test_unreachable_host_is_contained() {
    // 사용하지 않는 포트
    let source = SecTickerSource::with_settings(
        HttpSettings::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2)),
    );
    let batch = fetch_contained(&source).await;

    assert!(batch.is_failed());
    assert!(batch.records.is_empty());
}

#[tokio::test]
async fn test_yahoo_probe_skips_failed_ids() {
    let mut server = Server::new_async().await;
    let _hit = server
        .mock("GET", "/v8/finance/chart/0050.TW")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"chart":{"result":[{"meta":{"symbol":"0050.TW","shortName":"YUANTA/P-SHARES TW TOP 50 ETF","longName":"Yuanta Taiwan Top 50 ETF","exchangeName":"TAI","instrumentType":"ETF"}}],"error":null}}"#,
        )
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/v8/finance/chart/0051.TW")
        .with_status(404)
        .create_async()
        .await;
    let _malformed = server
        .mock("GET", "/v8/finance/chart/0052.TW")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;
    let _stock = server
        .mock("GET", "/v8/finance/chart/0053.TW")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"chart":{"result":[{"meta":{"symbol":"0053.TW","shortName":"SOME INDUSTRIAL CORP"}}]}}"#)
        .create_async()
        .await;
    let _no_result = server
        .mock("GET", "/v8/finance/chart/0054.TW")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#)
        .create_async()
        .await;

    let probe = ProbeSettings {
        range: 50..55,
        delay: Duration::ZERO,
        ..ProbeSettings::default()
    };
    let source = YahooProbeSource::with_settings(settings(&server), probe);
    let batch = fetch_contained(&source).await;

    assert!(!batch.is_failed());
    assert_eq!(batch.records.len(), 1);

    let record = normalize(&batch.records[0], batch.origin).unwrap();
    assert_eq!(record.code, "0050");
    assert_eq!(record.name, "YUANTA/P-SHARES TW TOP 50 ETF");
    assert_eq!(record.quote_symbol, "0050.TW");
    assert!(record.is_fund);
}

#[tokio::test]
async fn test_yahoo_probe_applies_delay_between_requests() {
    let mut server = Server::new_async().await;
    let _any = server
        .mock("GET", Matcher::Regex(r"^/v8/finance/chart/.*$".to_string()))
        .with_status(404)
        .expect(3)
        .create_async()
        .await;

    let probe = ProbeSettings {
        range: 60..63,
        delay: Duration::from_millis(50),
        ..ProbeSettings::default()
    };
    let source = YahooProbeSource::with_settings(settings(&server), probe);

    let start = std::time::Instant::now();
    let rows = source.fetch().await.unwrap();

    assert!(rows.is_empty());
    // 3건 요청, 딜레이는 요청 사이 2회
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
#[ignore] // 실제 네트워크 필요
async fn test_live_twse_listed() {
    let batch = fetch_contained(&TwseListedSource::new()).await;
    assert!(!batch.is_failed());
    assert!(batch.records.len() > 500);
}
