//! 지지/저항 레벨 근접 알림 판정.
//!
//! 활성 상태이고 강도가 `min_strength` 이상인 레벨 중 현재가가
//! `proximity_pct` 이내로 다가온 레벨마다 알림 후보를 만듭니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use watchlist_core::{pct_distance, AlertSeverity, CooldownTracker};

use crate::indicators::{IndicatorError, IndicatorResult};
use crate::support_resistance::{Level, LevelStatus, LevelType, SupportResistanceReport};

/// 레벨 근접 알림.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProximityAlert {
    /// 심볼
    pub symbol: String,
    /// 레벨 종류
    pub level_type: LevelType,
    /// 레벨 가격
    pub level_price: f64,
    /// 현재가
    pub current_price: f64,
    /// 레벨 강도
    pub strength: f64,
    /// 터치 횟수
    pub touches: usize,
    /// 레벨 대비 거리 (%)
    pub distance_pct: f64,
    /// 심각도
    pub severity: AlertSeverity,
}

impl LevelProximityAlert {
    /// 쿨다운 키 (`sr_alert_{symbol}_{R|S}_{price:.2}`).
    pub fn cooldown_key(&self) -> String {
        format!(
            "sr_alert_{}_{}_{:.2}",
            self.symbol,
            self.level_type.short_code(),
            self.level_price
        )
    }
}

/// 레벨 근접 스캐너.
#[derive(Debug, Clone, Copy)]
pub struct LevelProximityScanner {
    proximity_pct: f64,
    min_strength: f64,
}

impl Default for LevelProximityScanner {
    fn default() -> Self {
        Self {
            proximity_pct: 0.3,
            min_strength: 5.0,
        }
    }
}

impl LevelProximityScanner {
    /// 새 스캐너 생성. 근접 거리는 0 이상이어야 합니다.
    pub fn new(proximity_pct: f64, min_strength: f64) -> IndicatorResult<Self> {
        if !(proximity_pct.is_finite() && proximity_pct >= 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "근접 거리는 0 이상이어야 합니다: {}",
                proximity_pct
            )));
        }
        Ok(Self {
            proximity_pct,
            min_strength,
        })
    }

    /// 단일 레벨 판정.
    pub fn check(&self, symbol: &str, level: &Level, current_price: f64) -> Option<LevelProximityAlert> {
        if level.status != LevelStatus::Active || level.strength < self.min_strength {
            return None;
        }

        let distance_pct = pct_distance(current_price, level.price);
        if distance_pct > self.proximity_pct {
            return None;
        }

        Some(LevelProximityAlert {
            symbol: symbol.to_string(),
            level_type: level.level_type,
            level_price: level.price,
            current_price,
            strength: level.strength,
            touches: level.touches,
            distance_pct,
            severity: AlertSeverity::from_strength(level.strength),
        })
    }

    /// 보고서의 모든 레벨을 현재가로 판정합니다. 현재가가 없으면 빈 목록입니다.
    pub fn scan(&self, symbol: &str, report: &SupportResistanceReport) -> Vec<LevelProximityAlert> {
        let Some(current_price) = report.current_price else {
            return Vec::new();
        };

        let alerts: Vec<LevelProximityAlert> = report
            .resistances
            .iter()
            .chain(&report.supports)
            .filter_map(|level| self.check(symbol, level, current_price))
            .collect();

        debug!(symbol, alerts = alerts.len(), "Level proximity scan complete");
        alerts
    }

    /// 쿨다운 중인 키를 제외하고 판정하며, 통과한 알림은 쿨다운에 기록합니다.
    pub fn scan_with_cooldown(
        &self,
        symbol: &str,
        report: &SupportResistanceReport,
        cooldown: &mut CooldownTracker,
        now: DateTime<Utc>,
    ) -> Vec<LevelProximityAlert> {
        self.scan(symbol, report)
            .into_iter()
            .filter(|alert| cooldown.try_acquire(&alert.cooldown_key(), now))
            .collect()
    }
}
