//! Deduplicating Collector.
//!
//! 소스 배치를 우선순위 순서대로 받아 정규화하고, 코드 기준 first-seen-wins로
//! 중복을 제거합니다. 나중 소스는 앞선 레코드를 덮어쓰거나 보강하지 않습니다.
//!
//! 본 코드 집합은 Collector 인스턴스가 소유하므로 한 프로세스에서 여러 번
//! 실행해도 중복 제거 상태가 섞이지 않습니다.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::normalizer::normalize;
use crate::provider::source::{Origin, SourceBatch};
use crate::record::{CanonicalRecord, Market};

/// 소스별 수집 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub origin: Origin,
    /// 소스가 반환한 원시 레코드 수
    pub fetched: usize,
    /// 코드 누락으로 버린 수
    pub rejected: usize,
    /// 이미 본 코드라 버린 수
    pub duplicates: usize,
    /// 최종 채택 수
    pub accepted: usize,
    /// 조회 실패 메시지
    pub error: Option<String>,
}

impl SourceSummary {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// 수집 결과.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub records: Vec<CanonicalRecord>,
    /// 우선순위 순서의 소스별 요약
    pub sources: Vec<SourceSummary>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 시장별 레코드 수.
    pub fn count_by_market(&self) -> BTreeMap<Market, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.market).or_insert(0) += 1;
        }
        counts
    }

    /// 펀드/ETF 레코드 수.
    pub fn fund_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_fund).count()
    }

    /// 실패한 소스 수.
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.is_failed()).count()
    }
}

/// 중복 제거 수집기.
#[derive(Debug, Default)]
pub struct Collector {
    seen: HashSet<String>,
    records: Vec<CanonicalRecord>,
    summaries: Vec<SourceSummary>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 배치 하나를 흡수.
    ///
    /// 배치는 호출 순서가 곧 우선순위입니다.
    pub fn absorb(&mut self, batch: SourceBatch) -> SourceSummary {
        let fetched = batch.records.len();
        let mut rejected = 0;
        let mut duplicates = 0;
        let mut accepted = 0;

        for raw in &batch.records {
            let Some(record) = normalize(raw, batch.origin) else {
                rejected += 1;
                tracing::debug!(source = %batch.source, "코드 없는 레코드 제외");
                continue;
            };

            if self.seen.insert(record.code.clone()) {
                self.records.push(record);
                accepted += 1;
            } else {
                duplicates += 1;
            }
        }

        let summary = SourceSummary {
            source: batch.source,
            origin: batch.origin,
            fetched,
            rejected,
            duplicates,
            accepted,
            error: batch.error,
        };

        tracing::debug!(
            source = %summary.source,
            fetched,
            rejected,
            duplicates,
            accepted,
            "배치 흡수"
        );

        self.summaries.push(summary.clone());
        summary
    }

    /// 지금까지 채택된 레코드 수.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 수집 종료. `sort`면 코드 기준 안정 정렬.
    pub fn finish(self, sort: bool) -> Collection {
        let mut records = self.records;
        if sort {
            records.sort_by(|a, b| a.code.cmp(&b.code));
        }

        Collection {
            records,
            sources: self.summaries,
        }
    }
}

/// 배치 목록을 한 번에 수집.
pub fn collect<I>(batches: I, sort: bool) -> Collection
where
    I: IntoIterator<Item = SourceBatch>,
{
    let mut collector = Collector::new();
    for batch in batches {
        collector.absorb(batch);
    }
    collector.finish(sort)
}
