//! JSON Lines Sink.
//!
//! 레코드 한 개를 한 줄의 JSON 객체로 기록합니다 (UTF-8, 비ASCII 문자 그대로).
//! 시장별 분할 파일을 통합 파일과 함께 또는 단독으로 기록할 수 있습니다.
//!
//! 파일명:
//! - 통합: `{prefix}_{YYYYmmdd_HHMMSS}.jsonl`
//! - 분할: `{prefix}_{market}_{YYYYmmdd_HHMMSS}.jsonl`

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use serde::Serialize;

use crate::record::{CanonicalRecord, Market};
use crate::{DataError, Result};

/// 시장별 분할 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionMode {
    /// 통합 파일만
    None,
    /// 통합 파일 + 시장별 파일
    #[default]
    Also,
    /// 시장별 파일만
    Only,
}

impl PartitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Also => "also",
            Self::Only => "only",
        }
    }

    fn writes_combined(&self) -> bool {
        !matches!(self, Self::Only)
    }

    fn writes_partitions(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "also" | "both" => Ok(Self::Also),
            "only" => Ok(Self::Only),
            other => Err(DataError::ConfigError(format!(
                "알 수 없는 분할 모드: {} (none|also|only)",
                other
            ))),
        }
    }
}

/// 기록된 파일 하나.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkFile {
    pub path: PathBuf,
    /// 분할 파일이면 해당 시장
    pub market: Option<Market>,
    pub count: usize,
}

/// Sink 기록 결과.
#[derive(Debug, Clone, Default)]
pub struct SinkReport {
    pub files: Vec<SinkFile>,
}

impl SinkReport {
    /// 통합 파일 (기록한 경우).
    pub fn combined(&self) -> Option<&SinkFile> {
        self.files.iter().find(|f| f.market.is_none())
    }

    /// 시장별 분할 파일.
    pub fn partitions(&self) -> impl Iterator<Item = &SinkFile> {
        self.files.iter().filter(|f| f.market.is_some())
    }

    /// 기록한 레코드 수 (통합 파일 기준, 없으면 분할 파일 합계).
    pub fn record_count(&self) -> usize {
        match self.combined() {
            Some(file) => file.count,
            None => self.partitions().map(|f| f.count).sum(),
        }
    }
}

/// JSON Lines 파일 Sink.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    dir: PathBuf,
    prefix: String,
    output: Option<PathBuf>,
    partition: PartitionMode,
    stamp: String,
}

impl JsonLinesSink {
    /// 출력 디렉토리와 파일명 접두사로 생성. 타임스탬프는 현재 시각.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            output: None,
            partition: PartitionMode::default(),
            stamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// 통합 파일 경로 지정.
    ///
    /// 분할 파일은 같은 디렉토리에 파일명(확장자 제외)을 접두사로 기록됩니다.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(stem) = path.file_stem() {
            self.prefix = stem.to_string_lossy().into_owned();
        }
        self.dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        self.output = Some(path);
        self
    }

    pub fn with_partition(mut self, partition: PartitionMode) -> Self {
        self.partition = partition;
        self
    }

    /// 파일명 타임스탬프 고정.
    pub fn with_timestamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = stamp.into();
        self
    }

    pub fn partition(&self) -> PartitionMode {
        self.partition
    }

    pub fn combined_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self
                .dir
                .join(format!("{}_{}.jsonl", self.prefix, self.stamp)),
        }
    }

    pub fn partition_path(&self, market: Market) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}.jsonl", self.prefix, market, self.stamp))
    }

    /// 레코드 기록.
    ///
    /// 레코드가 없으면 통합 파일은 빈 파일로 기록됩니다 (`Only` 모드 포함).
    pub fn write(&self, records: &[CanonicalRecord]) -> Result<SinkReport> {
        let mut report = SinkReport::default();

        // 분할 파일이 하나도 생기지 않는 경우에도 출력 파일은 남김
        if self.partition.writes_combined() || records.is_empty() {
            let path = self.combined_path();
            let count = write_records(&path, records)?;
            tracing::info!(path = %path.display(), count, "통합 파일 저장");
            report.files.push(SinkFile {
                path,
                market: None,
                count,
            });
        }

        if self.partition.writes_partitions() {
            let mut by_market: BTreeMap<Market, Vec<&CanonicalRecord>> = BTreeMap::new();
            for record in records {
                by_market.entry(record.market).or_default().push(record);
            }

            for (market, group) in by_market {
                let path = self.partition_path(market);
                let count = write_records(&path, group)?;
                tracing::info!(path = %path.display(), market = %market, count, "시장별 파일 저장");
                report.files.push(SinkFile {
                    path,
                    market: Some(market),
                    count,
                });
            }
        }

        Ok(report)
    }
}

/// 레코드를 JSON Lines 파일로 기록하고 기록한 줄 수를 반환.
///
/// 상위 디렉토리가 없으면 생성합니다.
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
        count += 1;
    }

    writer.flush()?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Region;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn records() -> Vec<CanonicalRecord> {
        vec![
            CanonicalRecord::new("0050", "元大台灣50", Market::Listed, Region::Tw),
            CanonicalRecord::new("6488", "環球晶", Market::OverTheCounter, Region::Tw),
            CanonicalRecord::new("2330", "台積電", Market::Listed, Region::Tw),
            CanonicalRecord::new("AAPL", "Apple Inc.", Market::Nasdaq, Region::Us),
        ]
    }

    fn read_codes(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| {
                serde_json::from_str::<CanonicalRecord>(line)
                    .unwrap()
                    .code
            })
            .collect()
    }

    #[test]
    fn test_empty_records_write_empty_file() {
        let dir = TempDir::new().unwrap();
        let sink = JsonLinesSink::new(dir.path(), "stocks")
            .with_partition(PartitionMode::None)
            .with_timestamp("20250101_000000");

        let report = sink.write(&[]).unwrap();

        let combined = report.combined().unwrap();
        assert_eq!(combined.count, 0);
        assert_eq!(combined.path, dir.path().join("stocks_20250101_000000.jsonl"));
        assert_eq!(fs::read_to_string(&combined.path).unwrap(), "");
    }

    #[test]
    fn test_partition_union_equals_combined() {
        let dir = TempDir::new().unwrap();
        let sink = JsonLinesSink::new(dir.path(), "stocks")
            .with_partition(PartitionMode::Also)
            .with_timestamp("20250101_000000");

        let report = sink.write(&records()).unwrap();

        let mut combined = read_codes(&report.combined().unwrap().path);
        let mut union: Vec<String> = report
            .partitions()
            .flat_map(|f| read_codes(&f.path))
            .collect();
        combined.sort();
        union.sort();

        assert_eq!(combined, union);
        assert_eq!(report.partitions().count(), 3);
        assert!(dir
            .path()
            .join("stocks_over-the-counter_20250101_000000.jsonl")
            .exists());
    }

    #[test]
    fn test_partition_only_skips_combined() {
        let dir = TempDir::new().unwrap();
        let sink = JsonLinesSink::new(dir.path(), "stocks")
            .with_partition(PartitionMode::Only)
            .with_timestamp("20250101_000000");

        let report = sink.write(&records()).unwrap();

        assert!(report.combined().is_none());
        assert_eq!(report.record_count(), 4);
        assert!(!sink.combined_path().exists());
    }

    #[test]
    fn test_partition_only_with_no_records_writes_empty_file() {
        let dir = TempDir::new().unwrap();
        let sink = JsonLinesSink::new(dir.path(), "stocks")
            .with_partition(PartitionMode::Only)
            .with_timestamp("20250101_000000");

        let report = sink.write(&[]).unwrap();

        assert_eq!(report.files.len(), 1);
        let combined = report.combined().unwrap();
        assert_eq!(combined.count, 0);
        assert_eq!(fs::read_to_string(&combined.path).unwrap(), "");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.jsonl");

        write_records(&path, &records()[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("元大台灣50"));
        assert!(!content.contains("\\u"));
        assert!(content.contains(r#""isin":"""#));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_explicit_output_path_and_partition_prefix() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("my_list.jsonl");
        let sink = JsonLinesSink::new("unused", "stocks")
            .with_output(&output)
            .with_partition(PartitionMode::Also)
            .with_timestamp("20250101_000000");

        let report = sink.write(&records()).unwrap();

        assert_eq!(report.combined().unwrap().path, output);
        let names: HashSet<String> = report
            .partitions()
            .filter_map(|f| f.path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert!(names.contains("my_list_listed_20250101_000000.jsonl"));
        assert!(names.contains("my_list_nasdaq_20250101_000000.jsonl"));
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let sink = JsonLinesSink::new(blocker.join("sub"), "stocks");
        let result = sink.write(&records());

        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[test]
    fn test_partition_mode_parse() {
        assert_eq!("none".parse::<PartitionMode>().unwrap(), PartitionMode::None);
        assert_eq!(" ALSO ".parse::<PartitionMode>().unwrap(), PartitionMode::Also);
        assert_eq!("only".parse::<PartitionMode>().unwrap(), PartitionMode::Only);
        assert!("sometimes".parse::<PartitionMode>().is_err());
    }
}
