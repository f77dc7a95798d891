//! 리젝션 패턴 신뢰도 산정.
//!
//! | 항목 | 최대 | 계산 |
//! |------|------|------|
//! | 패턴 품질 | 30 | `quality * 30` |
//! | 근접도 | 40 | 근접 레벨 최대 가중치 * 40 |
//! | 거래량 | 15 | 직전 10개 평균 대비 단계 점수 * 15 (`requireVolumeSpike`일 때만) |
//! | 상대 크기 | 15 | 직전 10개 평균 범위 대비 단계 점수 * 15 |
//!
//! 합계는 100으로 제한됩니다.

use serde::{Deserialize, Serialize};
use watchlist_core::{round_dp, Candle, METRIC_DP};

/// 상대 비교에 쓰는 직전 캔들 수.
pub const RELATIVE_LOOKBACK: usize = 10;

/// 비교 윈도우가 비었거나 평균이 0일 때의 중립 점수.
pub const NEUTRAL_SCORE: f64 = 0.5;

const QUALITY_WEIGHT: f64 = 30.0;
const PROXIMITY_WEIGHT: f64 = 40.0;
const VOLUME_WEIGHT: f64 = 15.0;
const SIZE_WEIGHT: f64 = 15.0;
const MAX_CONFIDENCE: f64 = 100.0;

/// 평균 대비 배수를 단계 점수로 변환합니다.
pub fn step_score(ratio: f64) -> f64 {
    if ratio >= 2.0 {
        1.0
    } else if ratio >= 1.5 {
        0.8
    } else if ratio >= 1.2 {
        0.6
    } else if ratio >= 1.0 {
        0.4
    } else {
        0.2
    }
}

/// 직전 캔들 마지막 10개의 평균 대비 `current`의 단계 점수.
fn relative_score(current: f64, context: &[Candle], value: impl Fn(&Candle) -> f64) -> f64 {
    let start = context.len().saturating_sub(RELATIVE_LOOKBACK);
    let recent = &context[start..];
    if recent.is_empty() {
        return NEUTRAL_SCORE;
    }

    let mean = recent.iter().map(value).sum::<f64>() / recent.len() as f64;
    if mean == 0.0 {
        return NEUTRAL_SCORE;
    }
    step_score(current / mean)
}

/// 거래량 점수 (0.2 - 1.0, 비교 불가 시 0.5).
pub fn volume_score(candle: &Candle, context: &[Candle]) -> f64 {
    relative_score(candle.volume, context, |c| c.volume)
}

/// 캔들 범위 크기 점수 (0.2 - 1.0, 비교 불가 시 0.5).
pub fn size_score(candle: &Candle, context: &[Candle]) -> f64 {
    relative_score(candle.range(), context, Candle::range)
}

/// 신뢰도 구성 요소.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfidenceInputs {
    /// 패턴 품질 (0 - 1)
    pub quality: f64,
    /// 근접 레벨 최대 가중치 (근접 레벨이 없으면 `None`)
    pub proximity: Option<f64>,
    /// 거래량 점수
    pub volume: f64,
    /// 크기 점수
    pub size: f64,
    /// 거래량 점수 반영 여부
    pub include_volume: bool,
}

impl ConfidenceInputs {
    /// 반올림하지 않은 신뢰도 (0 - 100).
    pub fn confidence(&self) -> f64 {
        let mut total = self.quality * QUALITY_WEIGHT;
        if let Some(weight) = self.proximity {
            total += weight * PROXIMITY_WEIGHT;
        }
        if self.include_volume {
            total += self.volume * VOLUME_WEIGHT;
        }
        total += self.size * SIZE_WEIGHT;
        total.min(MAX_CONFIDENCE)
    }
}

/// 감지 결과에 첨부되는 세부 지표 (소수점 3자리).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternMetrics {
    pub pattern_quality: f64,
    pub proximity_score: f64,
    pub near_levels_count: usize,
    pub volume_score: f64,
    pub size_score: f64,
}

impl PatternMetrics {
    /// 신뢰도 구성 요소와 근접 레벨 수로 지표를 만듭니다.
    pub fn from_inputs(inputs: &ConfidenceInputs, near_levels_count: usize) -> Self {
        Self {
            pattern_quality: round_dp(inputs.quality, METRIC_DP),
            proximity_score: round_dp(inputs.proximity.unwrap_or(0.0), METRIC_DP),
            near_levels_count,
            volume_score: round_dp(inputs.volume, METRIC_DP),
            size_score: round_dp(inputs.size, METRIC_DP),
        }
    }
}
