//! 수집 → 저장 전체 흐름 테스트.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use listing_collector::error::CollectorError;
use listing_collector::modules::{run_pipeline, sync_listings, Profile, RunOptions};
use listing_collector::CollectorConfig;
use listing_data::{
    CanonicalRecord, JsonLinesSink, PartitionMode, RawRecord, SourceAdapter, StaticTableSource,
};
use mockito::Server;
use tempfile::TempDir;

fn fixture(name: &str, rows: &[(&str, &str)]) -> Box<dyn SourceAdapter> {
    Box::new(StaticTableSource::new(
        name,
        rows.iter()
            .map(|(code, name)| {
                RawRecord::new()
                    .with("code", *code)
                    .with("name", *name)
                    .with("market", "listed")
            })
            .collect(),
    ))
}

fn read_records(path: &Path) -> Vec<CanonicalRecord> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_first_seen_wins_across_sources() {
    let dir = TempDir::new().unwrap();
    let sources = vec![
        fixture("a", &[("0050", "X")]),
        fixture("b", &[("0050", "Y"), ("0056", "Z")]),
    ];
    let sink = JsonLinesSink::new(dir.path(), "test").with_partition(PartitionMode::None);

    let run = run_pipeline(Profile::Taiwan, &sources, &sink, true)
        .await
        .unwrap();

    let written = read_records(&run.report.combined().unwrap().path);
    let pairs: Vec<(&str, &str)> = written
        .iter()
        .map(|r| (r.code.as_str(), r.name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("0050", "X"), ("0056", "Z")]);
    assert_eq!(run.stats.total_records, 2);
}

#[tokio::test]
async fn test_record_without_code_is_dropped() {
    let dir = TempDir::new().unwrap();
    let sources: Vec<Box<dyn SourceAdapter>> = vec![Box::new(StaticTableSource::new(
        "a",
        vec![
            RawRecord::new().with("name", "missing code"),
            RawRecord::new().with("code", "2330").with("name", "台積電"),
        ],
    ))];
    let sink = JsonLinesSink::new(dir.path(), "test").with_partition(PartitionMode::None);

    let run = run_pipeline(Profile::Taiwan, &sources, &sink, true)
        .await
        .unwrap();

    let written = read_records(&run.report.combined().unwrap().path);
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].code, "2330");
    assert_eq!(run.stats.failed_sources, 0);
}

#[tokio::test]
async fn test_zero_records_writes_empty_file() {
    let dir = TempDir::new().unwrap();
    let sources = vec![fixture("empty", &[])];
    let sink = JsonLinesSink::new(dir.path(), "test").with_partition(PartitionMode::Also);

    let run = run_pipeline(Profile::Taiwan, &sources, &sink, true)
        .await
        .unwrap();

    let combined = run.report.combined().unwrap();
    assert_eq!(combined.count, 0);
    assert_eq!(fs::read_to_string(&combined.path).unwrap(), "");
    assert_eq!(run.report.partitions().count(), 0);
}

#[tokio::test]
async fn test_sorted_output_is_byte_identical_across_runs() {
    let dir = TempDir::new().unwrap();
    let sources = vec![
        fixture("a", &[("2454", "聯發科"), ("2330", "台積電")]),
        fixture("b", &[("2317", "鴻海"), ("2330", "TSMC")]),
    ];

    let first = JsonLinesSink::new(dir.path(), "first").with_partition(PartitionMode::None);
    let second = JsonLinesSink::new(dir.path(), "second").with_partition(PartitionMode::None);

    let a = run_pipeline(Profile::Taiwan, &sources, &first, true).await.unwrap();
    let b = run_pipeline(Profile::Taiwan, &sources, &second, true).await.unwrap();

    let a = fs::read(&a.report.combined().unwrap().path).unwrap();
    let b = fs::read(&b.report.combined().unwrap().path).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_sink_failure_is_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let sources = vec![fixture("a", &[("0050", "X")])];
    let sink = JsonLinesSink::new(blocker.join("out"), "test");

    let result = run_pipeline(Profile::Taiwan, &sources, &sink, true).await;
    assert!(matches!(result, Err(CollectorError::Sink(_))));
}

#[tokio::test]
async fn test_taiwan_profile_with_mock_endpoints() {
    let mut server = Server::new_async().await;
    let _twse = server
        .mock("GET", "/v1/opendata/t187ap03_L")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"公司代號":"2330","公司簡稱":"台積電 (mock)","產業別":"24","上市日期":"19940905"}]"#,
        )
        .create_async()
        .await;
    let _tpex = server
        .mock("GET", "/openapi/v1/stock/info")
        .with_status(502)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let vars: HashMap<&str, String> = HashMap::from([
        ("TWSE_OPENAPI_URL", server.url()),
        ("TPEX_OPENAPI_URL", server.url()),
        ("LISTING_HTTP_TIMEOUT_SECS", "5".to_string()),
    ]);
    let config = CollectorConfig::from_lookup(|key| vars.get(key).cloned());

    let output = dir.path().join("taiwan.jsonl");
    let options = RunOptions {
        profile: Profile::Taiwan,
        output: Some(output.clone()),
        partition: Some(PartitionMode::Also),
        ..RunOptions::default()
    };

    let run = sync_listings(&config, &options).await.unwrap();

    let written = read_records(&output);
    let tsmc = written.iter().find(|r| r.code == "2330").unwrap();
    // 앞선 소스(증권거래소 API)의 이름이 남음
    assert_eq!(tsmc.name, "台積電 (mock)");
    assert_eq!(tsmc.quote_symbol, "2330.TW");

    // 장외시장 API 실패 → 내장 목록 대체
    let otc = written.iter().find(|r| r.code == "6488").unwrap();
    assert_eq!(otc.quote_symbol, "6488.TWO");

    let codes: Vec<&str> = written.iter().map(|r| r.code.as_str()).collect();
    let mut sorted = codes.clone();
    sorted.sort();
    assert_eq!(codes, sorted);

    // 분할 파일 합집합 == 통합 파일
    let mut union: Vec<String> = run
        .report
        .partitions()
        .flat_map(|f| read_records(&f.path))
        .map(|r| r.code)
        .collect();
    union.sort();
    let mut combined: Vec<String> = written.iter().map(|r| r.code.clone()).collect();
    combined.sort();
    assert_eq!(union, combined);

    assert!(run
        .report
        .partitions()
        .all(|f| f.path.parent() == Some(dir.path())));
    assert_eq!(run.stats.failed_sources, 0);
}

#[tokio::test]
async fn test_unreachable_sources_do_not_fail_run() {
    let dir = TempDir::new().unwrap();
    let vars: HashMap<&str, String> = HashMap::from([
        ("TWSE_ISIN_URL", "http://127.0.0.1:9".to_string()),
        ("LISTING_HTTP_TIMEOUT_SECS", "2".to_string()),
    ]);
    let config = CollectorConfig::from_lookup(|key| vars.get(key).cloned());

    let options = RunOptions {
        profile: Profile::TwEtf,
        output_dir: Some(dir.path().to_path_buf()),
        partition: Some(PartitionMode::None),
        ..RunOptions::default()
    };

    let run = sync_listings(&config, &options).await.unwrap();

    assert_eq!(run.stats.failed_sources, 1);
    assert!(run.stats.total_records > 0);
    assert!(run.collection.records.iter().all(|r| r.is_fund));

    let combined = run.report.combined().unwrap();
    let name = combined.path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("tw_etfs_"));
}
