//! 참조 레벨로 검증하는 리젝션 패턴 감지기.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use watchlist_core::{round_dp, validate_series, Candle, CONFIDENCE_DP};

use super::confidence::{size_score, volume_score, ConfidenceInputs, PatternMetrics};
use super::config::RejectionConfig;
use super::patterns::{doji, engulfing, is_hammer, is_shooting_star, PatternType};
use super::reference::ReferenceLevel;
use crate::indicators::{IndicatorResult, StatisticsWindow};

/// 캔들별 문맥으로 쓰는 직전 캔들 최대 수.
pub const CONTEXT_WINDOW: usize = 20;

/// 검증을 통과한 리젝션 패턴.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionPattern {
    /// 캔들 시각 (ms)
    pub timestamp: i64,
    /// 패턴 유형
    pub pattern_type: PatternType,
    /// 신뢰도 (0 - 100, 소수점 2자리)
    pub confidence: f64,
    /// 종가
    pub price: f64,
    /// 캔들 스냅샷
    pub candle: Candle,
    /// 근접한 참조 레벨
    pub near_levels: Vec<ReferenceLevel>,
    /// 출처별 근접 점수
    pub context_scores: BTreeMap<String, f64>,
    /// 세부 지표
    pub metrics: PatternMetrics,
}

/// 리젝션 패턴 감지기.
///
/// 설정만 보관하며 호출 간 상태가 없습니다.
#[derive(Debug, Clone)]
pub struct RejectionPatternDetector {
    config: RejectionConfig,
}

impl RejectionPatternDetector {
    /// 검증된 설정으로 감지기를 생성합니다.
    pub fn new(config: RejectionConfig) -> IndicatorResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 설정.
    pub fn config(&self) -> &RejectionConfig {
        &self.config
    }

    /// 캔들 시계열에서 참조 레벨로 검증된 패턴을 찾습니다.
    ///
    /// 참조 레벨이 하나도 없으면 검증할 수 없으므로 항상 빈 목록을 반환합니다.
    pub fn detect(
        &self,
        candles: &[Candle],
        reference_levels: &[ReferenceLevel],
    ) -> IndicatorResult<Vec<RejectionPattern>> {
        if reference_levels.is_empty() {
            warn!("No reference levels supplied, skipping rejection pattern detection");
            return Ok(Vec::new());
        }
        if !self.config.any_pattern_enabled() {
            warn!("All pattern families are disabled, skipping rejection pattern detection");
            return Ok(Vec::new());
        }
        if candles.len() < 2 {
            return Ok(Vec::new());
        }
        validate_series(candles)?;

        let gate = self.volume_gate(candles)?;
        let mut patterns = Vec::new();
        let mut gated = 0usize;

        for i in 1..candles.len() {
            let candle = &candles[i];
            let context = &candles[i.saturating_sub(CONTEXT_WINDOW)..i];

            if let Some(zscores) = &gate {
                let filter = &self.config.volume_z_score;
                if i + 1 < filter.lookback_period || zscores[i] < filter.min_z_score {
                    gated += 1;
                    continue;
                }
            }

            for pattern_type in self.candidates(&candles[i - 1], candle) {
                if let Some(pattern) = self.validate(candle, pattern_type, reference_levels, context) {
                    patterns.push(pattern);
                }
            }
        }

        debug!(
            candles = candles.len(),
            reference_levels = reference_levels.len(),
            volume_gated = gated,
            patterns = patterns.len(),
            "Rejection pattern scan complete"
        );

        Ok(patterns)
    }

    fn volume_gate(&self, candles: &[Candle]) -> IndicatorResult<Option<Vec<f64>>> {
        let filter = &self.config.volume_z_score;
        if !filter.enabled {
            return Ok(None);
        }
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        let window = StatisticsWindow::new(filter.lookback_period)?;
        Ok(Some(window.population_zscores(&volumes)))
    }

    /// 활성화된 계열 순서(망치형, 유성형, 장악형, 도지)대로 후보를 판정합니다.
    fn candidates(&self, prev: &Candle, candle: &Candle) -> Vec<PatternType> {
        let patterns = &self.config.patterns;
        let mut found = Vec::new();

        if patterns.hammer.enabled && is_hammer(candle, patterns.hammer.min_wick_ratio) {
            found.push(PatternType::Hammer);
        }
        if patterns.shooting_star.enabled
            && is_shooting_star(candle, patterns.shooting_star.min_wick_ratio)
        {
            found.push(PatternType::ShootingStar);
        }
        if patterns.engulfing.enabled {
            found.extend(engulfing(prev, candle));
        }
        if patterns.doji.enabled {
            found.extend(doji(candle));
        }

        found
    }

    fn validate(
        &self,
        candle: &Candle,
        pattern_type: PatternType,
        reference_levels: &[ReferenceLevel],
        context: &[Candle],
    ) -> Option<RejectionPattern> {
        let filters = &self.config.filters;
        let proximity_ratio = filters.proximity_percent / 100.0;

        let near_levels: Vec<ReferenceLevel> = reference_levels
            .iter()
            .filter(|level| level.distance_ratio(candle.close) <= proximity_ratio)
            .cloned()
            .collect();

        if filters.require_near_level && near_levels.is_empty() {
            return None;
        }

        let inputs = ConfidenceInputs {
            quality: pattern_type.quality(candle),
            proximity: near_levels.iter().map(|l| l.weight).reduce(f64::max),
            volume: volume_score(candle, context),
            size: size_score(candle, context),
            include_volume: filters.require_volume_spike,
        };
        let confidence = inputs.confidence();
        if confidence < filters.min_confidence {
            return None;
        }

        let mut context_scores: BTreeMap<String, f64> = BTreeMap::new();
        for level in &near_levels {
            let closeness = (1.0 - level.distance_ratio(candle.close) / proximity_ratio).max(0.0);
            *context_scores.entry(level.source_key()).or_default() +=
                closeness * level.weight * 100.0;
        }

        Some(RejectionPattern {
            timestamp: candle.timestamp,
            pattern_type,
            confidence: round_dp(confidence, CONFIDENCE_DP),
            price: candle.close,
            candle: *candle,
            metrics: PatternMetrics::from_inputs(&inputs, near_levels.len()),
            near_levels,
            context_scores,
        })
    }
}

/// 간편 함수: 설정과 참조 레벨로 리젝션 패턴을 감지합니다.
pub fn detect_rejection_patterns(
    candles: &[Candle],
    config: &RejectionConfig,
    reference_levels: &[ReferenceLevel],
) -> IndicatorResult<Vec<RejectionPattern>> {
    RejectionPatternDetector::new(config.clone())?.detect(candles, reference_levels)
}
