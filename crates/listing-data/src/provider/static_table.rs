//! 정적 테이블 소스와 대체(fallback) 소스.

use async_trait::async_trait;

use super::source::{Origin, RawRecord, SourceAdapter};
use crate::seed::SeedTable;
use crate::Result;

/// 메모리 내 테이블을 그대로 반환하는 소스.
///
/// 내장 시드 테이블 또는 테스트 픽스처에 사용합니다.
pub struct StaticTableSource {
    name: String,
    rows: Vec<RawRecord>,
}

impl StaticTableSource {
    pub fn new(name: impl Into<String>, rows: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// 시드 테이블로 생성.
    pub fn from_seed(table: &SeedTable) -> Self {
        Self::new(table.name, table.to_raw_records())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl SourceAdapter for StaticTableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> Origin {
        Origin::SeedTable
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        Ok(self.rows.clone())
    }
}

/// 기본 소스가 실패하거나 빈 결과를 내면 정적 테이블로 대체하는 소스.
///
/// 대체 시 레코드 출처가 `SeedTable`로 바뀌며, [`SourceAdapter::fetch_tagged`]가
/// 바뀐 출처를 함께 반환합니다.
pub struct FallbackSource {
    primary: Box<dyn SourceAdapter>,
    fallback: StaticTableSource,
}

impl FallbackSource {
    pub fn new(primary: Box<dyn SourceAdapter>, fallback: StaticTableSource) -> Self {
        Self { primary, fallback }
    }

    async fn resolve(&self) -> Result<(Origin, Vec<RawRecord>)> {
        match self.primary.fetch().await {
            Ok(rows) if !rows.is_empty() => return Ok((self.primary.origin(), rows)),
            Ok(_) => {
                tracing::warn!(
                    source = self.primary.name(),
                    fallback = self.fallback.name(),
                    "빈 응답, 대체 목록 사용"
                );
            }
            Err(e) => {
                tracing::warn!(
                    source = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "조회 실패, 대체 목록 사용"
                );
            }
        }

        Ok((Origin::SeedTable, self.fallback.fetch().await?))
    }
}

#[async_trait]
impl SourceAdapter for FallbackSource {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn origin(&self) -> Origin {
        self.primary.origin()
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        self.resolve().await.map(|(_, rows)| rows)
    }

    async fn fetch_tagged(&self) -> Result<(Origin, Vec<RawRecord>)> {
        self.resolve().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::TW_BASIC_OTC;
    use crate::DataError;

    struct Failing;

    #[async_trait]
    impl SourceAdapter for Failing {
        fn name(&self) -> &str {
            "tpex"
        }

        fn origin(&self) -> Origin {
            Origin::TpexOtc
        }

        async fn fetch(&self) -> Result<Vec<RawRecord>> {
            Err(DataError::HttpStatus {
                status: 503,
                url: "http://localhost/openapi".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_static_table_returns_rows_in_order() {
        let source = StaticTableSource::new(
            "fixture",
            vec![
                RawRecord::new().with("code", "0056"),
                RawRecord::new().with("code", "0050"),
            ],
        );

        let rows = source.fetch().await.unwrap();
        assert_eq!(rows[0].text("code").as_deref(), Some("0056"));
        assert_eq!(rows[1].text("code").as_deref(), Some("0050"));
        assert_eq!(source.origin(), Origin::SeedTable);
    }

    #[tokio::test]
    async fn test_fallback_used_on_primary_error() {
        let source = FallbackSource::new(
            Box::new(Failing),
            StaticTableSource::from_seed(&TW_BASIC_OTC),
        );

        let (origin, rows) = source.fetch_tagged().await.unwrap();
        assert_eq!(origin, Origin::SeedTable);
        assert_eq!(rows.len(), TW_BASIC_OTC.len());
        assert_eq!(source.name(), "tpex");
    }

    #[tokio::test]
    async fn test_fallback_batch_is_tagged_with_seed_origin() {
        let source = FallbackSource::new(
            Box::new(Failing),
            StaticTableSource::from_seed(&TW_BASIC_OTC),
        );

        let batch = crate::provider::fetch_contained(&source).await;
        assert!(!batch.is_failed());
        assert_eq!(batch.origin, Origin::SeedTable);
        assert_eq!(batch.source, "tpex");
    }

    #[tokio::test]
    async fn test_fallback_used_on_empty_primary() {
        let source = FallbackSource::new(
            Box::new(StaticTableSource::new("empty", Vec::new())),
            StaticTableSource::new("backup", vec![RawRecord::new().with("code", "6488")]),
        );

        let rows = source.fetch().await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
