//! 리젝션 패턴 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 컨텍스트 파일의 참조 레벨로 패턴 감지
//! watchlist patterns -i data/btc_15m.json -c contexts.json -s BTCUSDT
//!
//! # 캔들에서 계산한 볼륨 프로파일도 참조 레벨로 사용하고 알림 전송
//! watchlist patterns -i data/btc_15m.json --profile-buckets 24 --send
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn, Instrument};
use watchlist_analytics::{
    extract_reference_levels, ReferenceContext, ReferenceLevel, ReferenceSourceType,
    RejectionConfig, RejectionPattern, RejectionPatternDetector, VolumeProfileCalculator,
};
use watchlist_core::{analysis_span, AppConfig, Timeframe};

use crate::commands::{notification_manager, print_json};
use crate::input::{drop_in_progress, limit_to_days, load_candles};
use crate::settings::load_engine_config;

/// 캔들에서 계산한 볼륨 프로파일 컨텍스트 ID.
const PROFILE_CONTEXT_ID: &str = "candles";

/// `patterns` 명령 인자.
#[derive(Debug, Clone, Args)]
pub struct PatternsArgs {
    /// 캔들 파일 (JSON 배열 또는 kline 응답)
    #[arg(short, long)]
    pub input: PathBuf,

    /// 참조 컨텍스트 JSON 배열 파일
    #[arg(short, long)]
    pub contexts: Option<PathBuf>,

    /// 심볼
    #[arg(short, long, default_value = "BTCUSDT")]
    pub symbol: String,

    /// 인터벌
    #[arg(long, default_value = "15")]
    pub interval: String,

    /// 최근 N일만 사용
    #[arg(long)]
    pub days: Option<u32>,

    /// 리젝션 설정 JSON 파일
    #[arg(long)]
    pub rejection_config: Option<PathBuf>,

    /// 캔들로 볼륨 프로파일을 계산해 참조 레벨에 추가 (버킷 수)
    #[arg(long)]
    pub profile_buckets: Option<usize>,

    /// 감지된 패턴 알림을 전송
    #[arg(long, default_value = "false")]
    pub send: bool,
}

/// `patterns` 명령 출력.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternsOutput {
    pub symbol: String,
    pub interval: String,
    pub reference_levels: Vec<ReferenceLevel>,
    pub patterns: Vec<RejectionPattern>,
    #[serde(skip)]
    pub alerts_enabled: bool,
    #[serde(skip)]
    pub user_config: Value,
}

fn load_contexts(path: &Path) -> Result<Vec<ReferenceContext>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("컨텍스트 파일을 읽을 수 없습니다: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("컨텍스트 파일 형식 오류: {}", path.display()))
}

/// 참조 레벨을 모으고 패턴을 감지합니다.
pub fn analyze_patterns(args: &PatternsArgs) -> Result<PatternsOutput> {
    let timeframe = Timeframe::parse_lenient(&args.interval);
    let candles = limit_to_days(load_candles(&args.input)?, timeframe, args.days);
    // 아직 마감되지 않은 마지막 캔들은 리젝션으로 확정할 수 없음
    let candles = drop_in_progress(candles, timeframe, Utc::now().timestamp_millis());

    let mut contexts = match &args.contexts {
        Some(path) => load_contexts(path)?,
        None => Vec::new(),
    };
    if let Some(buckets) = args.profile_buckets {
        match VolumeProfileCalculator::new(buckets).calculate(&candles) {
            Some(profile) => contexts.push(profile.to_context(
                PROFILE_CONTEXT_ID,
                ReferenceSourceType::VolumeProfileDynamic,
                1.0,
            )),
            None => warn!("Not enough candles for a volume profile"),
        }
    }
    let reference_levels = extract_reference_levels(&contexts);

    let config: RejectionConfig = load_engine_config(args.rejection_config.as_deref())?;
    let alerts_enabled = config.alerts_enabled;
    let user_config = serde_json::to_value(&config)?;
    let patterns = RejectionPatternDetector::new(config)?
        .detect(&candles, &reference_levels)
        .context("리젝션 패턴 감지 실패")?;

    info!(
        contexts = contexts.len(),
        reference_levels = reference_levels.len(),
        patterns = patterns.len(),
        "Rejection pattern scan finished"
    );

    Ok(PatternsOutput {
        symbol: args.symbol.clone(),
        interval: timeframe.code().to_string(),
        reference_levels,
        patterns,
        alerts_enabled,
        user_config,
    })
}

/// `patterns` 명령을 실행합니다.
pub async fn run(args: PatternsArgs, settings: &AppConfig) -> Result<()> {
    let span = analysis_span!("patterns", args.symbol, args.interval);

    async {
        let output = analyze_patterns(&args)?;
        print_json(&output)?;

        if (args.send || output.alerts_enabled) && !output.patterns.is_empty() {
            let manager = notification_manager(settings, true)?;
            if manager.reachable_senders().await == 0 {
                warn!(patterns = output.patterns.len(), "No alert listener is reachable, skipping delivery");
                return Ok(());
            }
            for pattern in &output.patterns {
                if let Err(e) = manager
                    .notify_pattern(
                        &output.symbol,
                        &output.interval,
                        pattern,
                        Some(output.user_config.clone()),
                    )
                    .await
                {
                    warn!(pattern = %pattern.pattern_type, error = %e, "Pattern alert was not delivered");
                }
            }
        }
        Ok(())
    }
    .instrument(span)
    .await
}
