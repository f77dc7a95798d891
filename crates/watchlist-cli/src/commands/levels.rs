//! 지지/저항 레벨 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 15분봉 파일에서 레벨 계산
//! watchlist levels -i data/btc_15m.json -s BTCUSDT
//!
//! # 최근 7일만 사용하고 근접 알림 전송
//! watchlist levels -i data/btc_15m.json -s BTCUSDT --days 7 --send
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn, Instrument};
use watchlist_analytics::{
    LevelProximityAlert, LevelProximityScanner, SupportResistanceAnalyzer,
    SupportResistanceConfig, SupportResistanceReport,
};
use watchlist_core::{analysis_span, AppConfig, CooldownTracker, Timeframe};

use crate::commands::{notification_manager, print_json};
use crate::input::{limit_to_days, load_candles};
use crate::settings::load_engine_config;

/// `levels` 명령 인자.
#[derive(Debug, Clone, Args)]
pub struct LevelsArgs {
    /// 캔들 파일 (JSON 배열 또는 kline 응답)
    #[arg(short, long)]
    pub input: PathBuf,

    /// 심볼
    #[arg(short, long, default_value = "BTCUSDT")]
    pub symbol: String,

    /// 인터벌 (1, 3, 5, 15, 30, 60, 120, 240, D, W 또는 15m, 1h 등)
    #[arg(long, default_value = "15")]
    pub interval: String,

    /// 최근 N일만 사용
    #[arg(long)]
    pub days: Option<u32>,

    /// 지지/저항 설정 JSON 파일
    #[arg(long)]
    pub sr_config: Option<PathBuf>,

    /// 근접 알림을 전송
    #[arg(long, default_value = "false")]
    pub send: bool,
}

/// `levels` 명령 출력.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsOutput {
    pub symbol: String,
    pub interval: String,
    #[serde(flatten)]
    pub report: SupportResistanceReport,
    pub alerts: Vec<LevelProximityAlert>,
}

/// 레벨을 계산하고 근접 알림을 판정합니다.
pub fn analyze_levels(
    args: &LevelsArgs,
    settings: &AppConfig,
    cooldown: &mut CooldownTracker,
) -> Result<LevelsOutput> {
    let timeframe = Timeframe::parse_lenient(&args.interval);
    let candles = limit_to_days(load_candles(&args.input)?, timeframe, args.days);

    let config: SupportResistanceConfig = load_engine_config(args.sr_config.as_deref())?;
    let report = SupportResistanceAnalyzer::new(config)?
        .analyze(&candles)
        .context("지지/저항 계산 실패")?;

    let scanner = LevelProximityScanner::new(
        settings.alerts.level_proximity_percent,
        settings.alerts.level_min_strength,
    )?;
    let alerts = scanner.scan_with_cooldown(&args.symbol, &report, cooldown, Utc::now());

    info!(
        resistances = report.resistances.len(),
        supports = report.supports.len(),
        zones = report.consolidation_zones.len(),
        alerts = alerts.len(),
        "Support/resistance analysis finished"
    );

    Ok(LevelsOutput {
        symbol: args.symbol.clone(),
        interval: timeframe.code().to_string(),
        report,
        alerts,
    })
}

/// 저장된 쿨다운 기록으로 레벨을 분석하고 갱신된 기록을 다시 저장합니다.
///
/// `alerts.cooldown_file`이 비어 있으면 이번 실행 안에서만 쿨다운이 적용됩니다.
pub fn scan_levels(args: &LevelsArgs, settings: &AppConfig) -> Result<LevelsOutput> {
    let cooldown_secs = settings.alerts.cooldown_secs;
    let state_file = settings.alerts.cooldown_file.trim();

    if state_file.is_empty() {
        let mut cooldown = CooldownTracker::new(cooldown_secs);
        return analyze_levels(args, settings, &mut cooldown);
    }

    let path = Path::new(state_file);
    let mut cooldown = CooldownTracker::load(path, cooldown_secs)
        .with_context(|| format!("쿨다운 기록을 읽을 수 없습니다: {}", path.display()))?;
    let output = analyze_levels(args, settings, &mut cooldown)?;

    cooldown.prune(Utc::now());
    cooldown
        .save(path)
        .with_context(|| format!("쿨다운 기록을 저장할 수 없습니다: {}", path.display()))?;
    Ok(output)
}

/// `levels` 명령을 실행합니다.
pub async fn run(args: LevelsArgs, settings: &AppConfig) -> Result<()> {
    let span = analysis_span!("levels", args.symbol, args.interval);

    async {
        let output = scan_levels(&args, settings)?;
        print_json(&output)?;

        if (args.send || settings.alerts.enabled) && !output.alerts.is_empty() {
            let manager = notification_manager(settings, args.send)?;
            if manager.reachable_senders().await == 0 {
                warn!(alerts = output.alerts.len(), "No alert listener is reachable, skipping delivery");
                return Ok(());
            }
            for alert in &output.alerts {
                if let Err(e) = manager.notify_level(alert, &output.interval).await {
                    warn!(key = %alert.cooldown_key(), error = %e, "Level alert was not delivered");
                }
            }
        }
        Ok(())
    }
    .instrument(span)
    .await
}
