//! 종목 목록 수집 모듈.
//!
//! 프로필별로 소스 우선순위를 정하고, 소스를 하나씩 순서대로 호출한 뒤
//! 중복 제거 결과를 JSON Lines 파일로 저장합니다.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use listing_data::seed::{TW_BASIC_LISTED, TW_BASIC_OTC, TW_ETF_SERIES};
use listing_data::{
    fetch_contained, Collection, Collector, DirectoryFile, FallbackSource, IsinEtfSource,
    JsonLinesSink, PartitionMode, SecTickerSource, SinkReport, SourceAdapter, StaticTableSource,
    SymbolDirectorySource, TpexOtcSource, TwseListedSource, YahooProbeSource,
};

use crate::error::CollectorError;
use crate::{CollectionStats, CollectorConfig, Result};

/// chart 탐색 소스 이름
const YAHOO_PROBE: &str = "yahoo-probe";

/// 수집 프로필
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// 대만 상장/장외 + 대만 ETF + 미국 종목
    #[default]
    Stocks,
    /// 대만 ETF (ISIN 페이지 + 계열별 목록)
    TwEtf,
    /// 대만 ETF 전체 (계열별 목록 + 선택적 chart 탐색)
    TwEtfComplete,
    /// 대만 상장/장외 종목
    Taiwan,
}

impl Profile {
    pub const ALL: [Profile; 4] = [
        Profile::Stocks,
        Profile::TwEtf,
        Profile::TwEtfComplete,
        Profile::Taiwan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::TwEtf => "tw-etf",
            Self::TwEtfComplete => "tw-etf-complete",
            Self::Taiwan => "taiwan",
        }
    }

    /// 출력 파일명 접두사
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::TwEtf => "tw_etfs",
            Self::TwEtfComplete => "tw_etfs_complete",
            Self::Taiwan => "taiwan_stocks",
        }
    }

    /// 우선순위 순서의 소스 이름
    pub fn source_names(&self) -> &'static [&'static str] {
        match self {
            Self::Stocks => &[
                "twse",
                "tpex",
                "tw-etf-series",
                "nasdaq-listed",
                "other-listed",
                "sec",
            ],
            Self::TwEtf => &["isin-etf", "tw-etf-series"],
            Self::TwEtfComplete => &["tw-etf-series", YAHOO_PROBE],
            Self::Taiwan => &["twse", "tpex", "tw-basic-listed"],
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("알 수 없는 프로필: {} ({})", s, names.join("|"))
            })
    }
}

/// 실행 옵션 (CLI 인자)
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub profile: Profile,
    /// 지정 시 해당 소스만 호출
    pub sources: Option<Vec<String>>,
    /// 통합 파일 경로
    pub output: Option<PathBuf>,
    /// 출력 디렉토리 (설정값 대체)
    pub output_dir: Option<PathBuf>,
    /// 분할 모드 (설정값 대체)
    pub partition: Option<PartitionMode>,
    /// 코드 정렬 생략
    pub no_sort: bool,
    /// tw-etf-complete 프로필에서 chart 탐색 실행
    pub probe: bool,
}

/// 수집 실행 결과
#[derive(Debug)]
pub struct ListingRun {
    pub collection: Collection,
    pub report: SinkReport,
    pub stats: CollectionStats,
}

/// 프로필의 소스 생성 (우선순위 순서)
pub fn build_sources(
    profile: Profile,
    config: &CollectorConfig,
    probe: bool,
) -> Vec<Box<dyn SourceAdapter>> {
    let endpoints = &config.endpoints;
    let twse = || -> Box<dyn SourceAdapter> {
        Box::new(TwseListedSource::with_settings(
            config.http_settings(&endpoints.twse),
        ))
    };
    // 장외시장 API 실패 시 내장 목록으로 대체
    let tpex = || -> Box<dyn SourceAdapter> {
        Box::new(FallbackSource::new(
            Box::new(TpexOtcSource::with_settings(
                config.http_settings(&endpoints.tpex),
            )),
            StaticTableSource::from_seed(&TW_BASIC_OTC),
        ))
    };
    let etf_series = || -> Box<dyn SourceAdapter> {
        Box::new(StaticTableSource::from_seed(&TW_ETF_SERIES))
    };

    let mut sources: Vec<Box<dyn SourceAdapter>> = Vec::new();

    match profile {
        Profile::Stocks => {
            sources.push(twse());
            sources.push(tpex());
            sources.push(etf_series());
            for file in [DirectoryFile::NasdaqListed, DirectoryFile::OtherListed] {
                sources.push(Box::new(SymbolDirectorySource::with_settings(
                    file,
                    config.http_settings(&endpoints.symbol_directory),
                )));
            }
            sources.push(Box::new(SecTickerSource::with_settings(
                config.http_settings(&endpoints.sec),
            )));
        }
        Profile::TwEtf => {
            sources.push(Box::new(IsinEtfSource::with_settings(
                config.http_settings(&endpoints.isin),
            )));
            sources.push(etf_series());
        }
        Profile::TwEtfComplete => {
            sources.push(etf_series());
            if probe {
                sources.push(Box::new(YahooProbeSource::with_settings(
                    config.probe_http_settings(),
                    config.probe_settings(),
                )));
            }
        }
        Profile::Taiwan => {
            sources.push(twse());
            sources.push(tpex());
            sources.push(Box::new(StaticTableSource::from_seed(&TW_BASIC_LISTED)));
        }
    }

    sources
}

/// 이름으로 소스 선택 (우선순위는 프로필 순서 유지)
///
/// 프로필에 없는 이름은 `UnknownSource` 에러입니다.
pub fn select_sources(
    sources: Vec<Box<dyn SourceAdapter>>,
    profile: Profile,
    names: &[String],
) -> Result<Vec<Box<dyn SourceAdapter>>> {
    if let Some(unknown) = names
        .iter()
        .find(|n| !profile.source_names().contains(&n.as_str()))
    {
        return Err(CollectorError::UnknownSource {
            profile: profile.to_string(),
            name: unknown.clone(),
            available: profile
                .source_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        });
    }

    Ok(sources
        .into_iter()
        .filter(|s| names.iter().any(|n| n == s.name()))
        .collect())
}

/// 소스를 순서대로 호출하고 결과를 수집.
///
/// 소스 실패는 빈 결과로 처리되며 실행을 중단하지 않습니다.
pub async fn collect_sources(sources: &[Box<dyn SourceAdapter>], sort: bool) -> Collection {
    let mut collector = Collector::new();

    for source in sources {
        let batch = fetch_contained(source.as_ref()).await;
        let summary = collector.absorb(batch);

        match &summary.error {
            Some(error) => println!("❌ {}: 수집 실패 ({})", summary.source, error),
            None => println!(
                "✓ {}: {}개 조회, {}개 추가 (누적 {}개)",
                summary.source,
                summary.fetched,
                summary.accepted,
                collector.len()
            ),
        }
    }

    collector.finish(sort)
}

/// 수집 → 저장 전체 실행.
///
/// 저장 실패만 에러로 반환합니다.
pub async fn run_pipeline(
    profile: Profile,
    sources: &[Box<dyn SourceAdapter>],
    sink: &JsonLinesSink,
    sort: bool,
) -> Result<ListingRun> {
    let start = Instant::now();
    let mut stats = CollectionStats::new(profile.as_str());

    tracing::info!(profile = %profile, sources = sources.len(), "종목 수집 시작");

    let collection = collect_sources(sources, sort).await;
    stats.record_collection(&collection);

    let report = sink.write(&collection.records).map_err(|e| {
        tracing::error!(error = %e, "출력 파일 저장 실패");
        CollectorError::Sink(e)
    })?;
    stats.record_sink(&report);

    stats.elapsed = start.elapsed();

    Ok(ListingRun {
        collection,
        report,
        stats,
    })
}

/// chart 탐색 소스 생성 여부.
///
/// `--probe` 또는 `--sources`에 `yahoo-probe`를 직접 지정한 경우.
pub fn scan_enabled(options: &RunOptions) -> bool {
    options.probe
        || options
            .sources
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == YAHOO_PROBE))
}

/// 설정과 실행 옵션으로 종목 수집
pub async fn sync_listings(config: &CollectorConfig, options: &RunOptions) -> Result<ListingRun> {
    let profile = options.profile;

    if options.probe && profile != Profile::TwEtfComplete {
        tracing::warn!(profile = %profile, "--probe는 tw-etf-complete 프로필에서만 사용됩니다");
    }

    let mut sources = build_sources(profile, config, scan_enabled(options));
    if let Some(names) = &options.sources {
        sources = select_sources(sources, profile, names)?;
    }

    if sources.is_empty() {
        tracing::warn!(profile = %profile, "호출할 소스가 없습니다");
    }

    let dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.dir.clone());
    let mut sink = JsonLinesSink::new(dir, profile.file_prefix())
        .with_partition(options.partition.unwrap_or(config.output.partition));
    if let Some(output) = &options.output {
        sink = sink.with_output(output);
    }

    run_pipeline(profile, &sources, &sink, !options.no_sort).await
}
