//! 리젝션 패턴 감지 설정.
//!
//! JSON 형태는 외부 인터페이스와 같은 camelCase이며 모든 필드에 기본값이 있습니다.
//!
//! ```json
//! {
//!   "patterns": {
//!     "hammer": {"enabled": true, "minWickRatio": 2.0},
//!     "shootingStar": {"enabled": true, "minWickRatio": 2.0},
//!     "engulfing": {"enabled": true},
//!     "doji": {"enabled": false}
//!   },
//!   "filters": {"minConfidence": 60, "requireNearLevel": true,
//!               "proximityPercent": 1.0, "requireVolumeSpike": true},
//!   "alertsEnabled": false,
//!   "volumeZScore": {"enabled": false, "lookbackPeriod": 20, "minZScore": 1.0}
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::indicators::{IndicatorError, IndicatorResult};

/// 꼬리 비율을 쓰는 패턴(망치형/유성형) 설정.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WickPatternConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 최소 꼬리/몸통 비율
    pub min_wick_ratio: f64,
}

impl Default for WickPatternConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_wick_ratio: 2.0,
        }
    }
}

/// 활성화 플래그만 있는 패턴 설정.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TogglePatternConfig {
    /// 활성화 여부
    pub enabled: bool,
}

impl Default for TogglePatternConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// 패턴 계열별 설정.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternToggles {
    pub hammer: WickPatternConfig,
    pub shooting_star: WickPatternConfig,
    pub engulfing: TogglePatternConfig,
    pub doji: TogglePatternConfig,
}

impl Default for PatternToggles {
    fn default() -> Self {
        Self {
            hammer: WickPatternConfig::default(),
            shooting_star: WickPatternConfig::default(),
            engulfing: TogglePatternConfig::default(),
            doji: TogglePatternConfig { enabled: false },
        }
    }
}

/// 후보 검증 필터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectionFilters {
    /// 최소 신뢰도 (0 - 100)
    pub min_confidence: f64,
    /// 참조 레벨 근접 필수 여부
    pub require_near_level: bool,
    /// 근접 판정 거리 (%)
    pub proximity_percent: f64,
    /// 거래량 점수 반영 여부
    pub require_volume_spike: bool,
}

impl Default for RejectionFilters {
    fn default() -> Self {
        Self {
            min_confidence: 60.0,
            require_near_level: true,
            proximity_percent: 1.0,
            require_volume_spike: true,
        }
    }
}

/// 거래량 Z-점수 게이트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeZScoreFilter {
    /// 활성화 여부
    pub enabled: bool,
    /// Z-점수 롤링 기간
    pub lookback_period: usize,
    /// 최소 Z-점수
    pub min_z_score: f64,
}

impl Default for VolumeZScoreFilter {
    fn default() -> Self {
        Self {
            enabled: false,
            lookback_period: 20,
            min_z_score: 1.0,
        }
    }
}

/// 리젝션 패턴 감지 설정.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectionConfig {
    /// 패턴 계열별 설정
    pub patterns: PatternToggles,
    /// 검증 필터
    pub filters: RejectionFilters,
    /// 감지 결과 알림 전송 여부
    pub alerts_enabled: bool,
    /// 거래량 Z-점수 게이트
    pub volume_z_score: VolumeZScoreFilter,
}

impl RejectionConfig {
    /// 설정 값 검증.
    pub fn validate(&self) -> IndicatorResult<()> {
        for (name, wick) in [
            ("hammer", &self.patterns.hammer),
            ("shootingStar", &self.patterns.shooting_star),
        ] {
            if !(wick.min_wick_ratio.is_finite() && wick.min_wick_ratio >= 0.0) {
                return Err(IndicatorError::InvalidParameter(format!(
                    "{}.minWickRatio는 0 이상이어야 합니다: {}",
                    name, wick.min_wick_ratio
                )));
            }
        }

        let filters = &self.filters;
        if !(filters.proximity_percent.is_finite() && filters.proximity_percent > 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "proximityPercent는 0보다 커야 합니다: {}",
                filters.proximity_percent
            )));
        }
        if !filters.min_confidence.is_finite() {
            return Err(IndicatorError::InvalidParameter(
                "minConfidence는 유한한 값이어야 합니다".to_string(),
            ));
        }

        let gate = &self.volume_z_score;
        if gate.enabled && gate.lookback_period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "volumeZScore.lookbackPeriod는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }

    /// 활성화된 패턴 계열이 하나라도 있는지 확인합니다.
    pub fn any_pattern_enabled(&self) -> bool {
        let p = &self.patterns;
        p.hammer.enabled || p.shooting_star.enabled || p.engulfing.enabled || p.doji.enabled
    }
}
