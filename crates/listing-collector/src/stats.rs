//! 수집 통계 구조체.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use listing_data::{CanonicalRecord, Collection, Market, SinkReport};

/// 계열별 집계 대상 운용사 (이름에 포함되면 해당 계열)
const FUND_FAMILIES: [&str; 3] = ["元大", "富邦", "國泰"];
const OTHER_FAMILY: &str = "其他";

/// ETF 이름으로 운용사 계열 판정
pub fn fund_family(name: &str) -> &'static str {
    FUND_FAMILIES
        .into_iter()
        .find(|family| name.contains(family))
        .unwrap_or(OTHER_FAMILY)
}

/// 소스별 수집 결과
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceStats {
    pub source: String,
    pub fetched: usize,
    pub accepted: usize,
    pub duplicates: usize,
    pub rejected: usize,
    /// 실패 메시지
    pub error: Option<String>,
}

/// 수집 작업 통계
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 실행 프로필
    pub profile: String,
    /// 시작 시각
    pub started_at: DateTime<Utc>,
    /// 호출한 소스 수
    pub total_sources: usize,
    /// 실패한 소스 수
    pub failed_sources: usize,
    /// 최종 레코드 수
    pub total_records: usize,
    /// 펀드/ETF 레코드 수
    pub fund_records: usize,
    /// 시장별 레코드 수
    pub by_market: BTreeMap<Market, usize>,
    /// 운용사 계열별 펀드/ETF 수 (元大, 富邦, 國泰, 其他 순)
    pub by_family: Vec<(String, usize)>,
    /// 소스별 결과 (우선순위 순서)
    pub sources: Vec<SourceStats>,
    /// 기록한 파일 경로
    pub files: Vec<String>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            started_at: Utc::now(),
            total_sources: 0,
            failed_sources: 0,
            total_records: 0,
            fund_records: 0,
            by_market: BTreeMap::new(),
            by_family: Vec::new(),
            sources: Vec::new(),
            files: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// 수집 결과 반영
    pub fn record_collection(&mut self, collection: &Collection) {
        self.total_sources = collection.sources.len();
        self.failed_sources = collection.failed_sources();
        self.total_records = collection.len();
        self.fund_records = collection.fund_count();
        self.by_market = collection.count_by_market();
        self.by_family = FUND_FAMILIES
            .into_iter()
            .chain(std::iter::once(OTHER_FAMILY))
            .map(|family| {
                let count = collection
                    .records
                    .iter()
                    .filter(|r| r.is_fund && fund_family(&r.name) == family)
                    .count();
                (family.to_string(), count)
            })
            .collect();
        self.sources = collection
            .sources
            .iter()
            .map(|s| SourceStats {
                source: s.source.clone(),
                fetched: s.fetched,
                accepted: s.accepted,
                duplicates: s.duplicates,
                rejected: s.rejected,
                error: s.error.clone(),
            })
            .collect();
    }

    /// 기록 결과 반영
    pub fn record_sink(&mut self, report: &SinkReport) {
        self.files = report
            .files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect();
    }

    /// 소스 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total_sources == 0 {
            0.0
        } else {
            ((self.total_sources - self.failed_sources) as f64 / self.total_sources as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            profile = %self.profile,
            total_sources = self.total_sources,
            failed_sources = self.failed_sources,
            total_records = self.total_records,
            fund_records = self.fund_records,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }

    /// 사람이 읽는 요약 출력 (시장별, 소스별, 미리보기)
    pub fn print_summary(&self, preview: &[CanonicalRecord]) {
        println!("\n{}", "=".repeat(60));
        println!("✅ 종목 수집 완료! ({})", self.profile);
        println!("   총: {}개 (펀드/ETF {}개)", self.total_records, self.fund_records);

        println!("\n📊 시장별:");
        for (market, count) in &self.by_market {
            println!("   {}: {}개", market, count);
        }

        println!("\n📡 소스별:");
        for source in &self.sources {
            match &source.error {
                Some(error) => println!("   ❌ {}: 실패 ({})", source.source, error),
                None => println!(
                    "   {}: 조회 {}개, 채택 {}개, 중복 {}개, 제외 {}개",
                    source.source, source.fetched, source.accepted, source.duplicates, source.rejected
                ),
            }
        }

        if self.profile == "tw-etf-complete" {
            println!("\n🏦 계열별:");
            for (family, count) in &self.by_family {
                println!("   {}: {}개", family, count);
            }
        }

        if !self.files.is_empty() {
            println!("\n💾 저장 파일:");
            for file in &self.files {
                println!("   {}", file);
            }
        }

        if !preview.is_empty() {
            println!("\n🔍 미리보기 (처음 {}개):", preview.len());
            for record in preview {
                println!("   {}", record.to_display_string());
            }
        }

        println!("{}\n", "=".repeat(60));
    }
}
