//! Standalone listing collector CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use listing_collector::modules::{self, Profile, RunOptions};
use listing_collector::logging::{self, LogFormat};
use listing_collector::CollectorConfig;
use listing_data::PartitionMode;

#[derive(Parser)]
#[command(name = "listing-collector")]
#[command(about = "Stock/ETF listing metadata collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 목록 수집 (기본 명령)
    Run(RunArgs),

    /// 프로필별 소스 목록 출력
    Sources,
}

#[derive(Args, Clone)]
struct RunArgs {
    /// 수집 프로필 (stocks, tw-etf, tw-etf-complete, taiwan)
    #[arg(long, default_value = "stocks")]
    profile: Profile,

    /// 특정 소스만 호출 (쉼표로 구분, 예: "twse,tpex")
    #[arg(long, value_delimiter = ',')]
    sources: Option<Vec<String>>,

    /// 통합 출력 파일 경로
    #[arg(long)]
    output: Option<PathBuf>,

    /// 출력 디렉토리 (LISTING_OUTPUT_DIR 대체)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// 시장별 분할 모드 (none, also, only)
    #[arg(long)]
    partition: Option<PartitionMode>,

    /// 코드 정렬 생략
    #[arg(long)]
    no_sort: bool,

    /// Yahoo chart 탐색 실행 (tw-etf-complete, `--sources yahoo-probe` 지정 시에도 실행)
    #[arg(long)]
    probe: bool,

    /// 미리보기 레코드 수
    #[arg(long, default_value_t = 10)]
    preview: usize,
}

impl RunArgs {
    fn to_options(&self) -> RunOptions {
        RunOptions {
            profile: self.profile,
            sources: self.sources.clone(),
            output: self.output.clone(),
            output_dir: self.output_dir.clone(),
            partition: self.partition,
            no_sort: self.no_sort,
            probe: self.probe,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 로깅 초기화
    logging::init_logging(&cli.log_level, LogFormat::from_env())?;

    match cli.command {
        Some(Commands::Sources) => {
            for profile in Profile::ALL {
                println!("{} ({}):", profile, profile.file_prefix());
                for name in profile.source_names() {
                    println!("   {}", name);
                }
            }
            Ok(())
        }
        Some(Commands::Run(args)) => run(&args).await,
        None => run(&cli.run).await,
    }
}

async fn run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Listing Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(output_dir = %config.output.dir.display(), "설정 로드 완료");

    let options = args.to_options();
    println!("\n🔍 종목 목록 수집 시작... (프로필: {})", options.profile);
    println!();

    let result = modules::sync_listings(&config, &options).await?;

    result.stats.log_summary("종목 수집");
    let preview_len = args.preview.min(result.collection.records.len());
    result
        .stats
        .print_summary(&result.collection.records[..preview_len]);

    tracing::info!("Listing Collector 종료");

    Ok(())
}
