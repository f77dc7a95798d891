//! 마켓 워치리스트 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 지지/저항 레벨과 근접 알림
//! watchlist levels -i data/btc_15m.json -s BTCUSDT --interval 15
//!
//! # 참조 레벨로 검증한 리젝션 패턴
//! watchlist patterns -i data/btc_15m.json -c contexts.json -s BTCUSDT
//!
//! # 거래량 델타 / CVD
//! watchlist volume-delta -i data/btc_15m.json
//!
//! # JSON 로그와 별도 설정 파일
//! watchlist --config config/prod.toml --log-format json levels -i data/eth_1h.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use watchlist_cli::commands::{levels, patterns, volume_delta};
use watchlist_cli::settings::{load_settings, SettingsOverrides};
use watchlist_core::{init_logging, LogConfig};

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Market watchlist engine - 거래량 기반 지지/저항 및 리젝션 패턴 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml, 없으면 무시)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 지지/저항 레벨, 횡보 구간, 레벨 근접 알림
    Levels(levels::LevelsArgs),

    /// 참조 레벨로 검증한 리젝션 캔들 패턴
    Patterns(patterns::PatternsArgs),

    /// 캔들별 거래량 델타와 CVD
    VolumeDelta(volume_delta::VolumeDeltaArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = load_settings(&SettingsOverrides {
        config_path: cli.config,
        log_format: cli.log_format,
    })?;

    if let Err(e) = init_logging(LogConfig::from(&settings.logging)) {
        eprintln!("로깅 초기화 실패: {}", e);
    }

    let result = match cli.command {
        Commands::Levels(args) => levels::run(args, &settings).await,
        Commands::Patterns(args) => patterns::run(args, &settings).await,
        Commands::VolumeDelta(args) => volume_delta::run(args),
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}
