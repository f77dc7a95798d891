//! 거래량 델타 / CVD 명령어.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;
use watchlist_analytics::{VolumeDeltaIndicator, VolumeDeltaPoint};
use watchlist_core::{validate_series, Timeframe};

use crate::commands::print_json;
use crate::input::{limit_to_days, load_candles};

/// `volume-delta` 명령 인자.
#[derive(Debug, Clone, Args)]
pub struct VolumeDeltaArgs {
    /// 캔들 파일 (JSON 배열 또는 kline 응답)
    #[arg(short, long)]
    pub input: PathBuf,

    /// 인터벌
    #[arg(long, default_value = "15")]
    pub interval: String,

    /// 최근 N일만 사용
    #[arg(long)]
    pub days: Option<u32>,
}

/// 캔들별 거래량 델타와 누적값을 계산합니다.
pub fn compute_volume_delta(args: &VolumeDeltaArgs) -> Result<Vec<VolumeDeltaPoint>> {
    let timeframe = Timeframe::parse_lenient(&args.interval);
    let candles = limit_to_days(load_candles(&args.input)?, timeframe, args.days);
    validate_series(&candles)?;

    let points = VolumeDeltaIndicator::new().calculate(&candles);
    info!(
        points = points.len(),
        cvd = points.last().map(|p| p.cvd).unwrap_or(0.0),
        "Volume delta computed"
    );
    Ok(points)
}

/// `volume-delta` 명령을 실행합니다.
pub fn run(args: VolumeDeltaArgs) -> Result<()> {
    let points = compute_volume_delta(&args)?;
    print_json(&points)
}
