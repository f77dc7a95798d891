//! 레벨 강도 및 상태 판정.
//!
//! 강도 공식:
//! - `recency = max(0.1, 1 - 경과일/30)`, 경과일은 0 미만이면 0
//! - `spread = max(1, (last_touch - first_touch) 일수)`
//! - `raw = touches * avg_z_score * recency / spread`
//! - `strength = clamp(raw / 5 * 10, 0, 10)`, 소수점 2자리

use watchlist_core::{days_between, round_dp, Candle, STRENGTH_DP};

use super::clustering::{Level, LevelStatus};
use super::pivots::LevelType;

/// 최신성 감쇠 기간 (일).
pub const RECENCY_DECAY_DAYS: f64 = 30.0;

/// 최신성 하한.
pub const RECENCY_FLOOR: f64 = 0.1;

/// 최대 강도.
pub const MAX_STRENGTH: f64 = 10.0;

/// 레벨 점수 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevelScorer;

impl LevelScorer {
    /// 새 점수 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 기준 시각 `now_ms`에서 레벨 강도를 계산합니다.
    pub fn strength(&self, level: &Level, now_ms: i64) -> f64 {
        // 기준 시각이 마지막 터치보다 앞서도 최신성은 1을 넘지 않음
        let days_since = days_between(level.last_touch, now_ms).max(0.0);
        let recency = (1.0 - days_since / RECENCY_DECAY_DAYS).max(RECENCY_FLOOR);
        let time_spread_days = days_between(level.first_touch, level.last_touch).max(1.0);

        let raw = level.touches as f64 * level.avg_z_score * recency / time_spread_days;
        let strength = (raw / 5.0 * 10.0).clamp(0.0, MAX_STRENGTH);

        round_dp(strength, STRENGTH_DP)
    }

    /// 현재가와 이후 캔들을 기준으로 레벨 상태를 판정합니다.
    ///
    /// 마지막 터치 이후 종가가 불리한 방향으로 넘어선 캔들이 있으면 `Broken`,
    /// 현재가가 아직 레벨로 돌아오지 않았으면 `Active`, 그 외는 `Tested`입니다.
    pub fn status(&self, level: &Level, current_price: f64, candles: &[Candle]) -> LevelStatus {
        let broken = candles
            .iter()
            .filter(|c| c.timestamp > level.last_touch)
            .any(|c| match level.level_type {
                LevelType::Resistance => c.close > level.price,
                LevelType::Support => c.close < level.price,
            });

        if broken {
            return LevelStatus::Broken;
        }

        let untested = match level.level_type {
            LevelType::Resistance => current_price < level.price,
            LevelType::Support => current_price > level.price,
        };

        if untested {
            LevelStatus::Active
        } else {
            LevelStatus::Tested
        }
    }

    /// 강도와 상태를 레벨에 기록합니다. `break_volume`은 비워 둡니다.
    pub fn score(&self, level: &mut Level, now_ms: i64, current_price: f64, candles: &[Candle]) {
        level.strength = self.strength(level, now_ms);
        level.status = self.status(level, current_price, candles);
        level.break_volume = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    fn level(level_type: LevelType, price: f64, touches: usize, first: i64, last: i64, z: f64) -> Level {
        Level {
            level_type,
            price,
            touches,
            touch_timestamps: vec![first, last],
            first_touch: first,
            last_touch: last,
            avg_volume: 100.0,
            avg_z_score: z,
            strength: 0.0,
            status: LevelStatus::Active,
            break_volume: None,
        }
    }

    fn close_at(ts: i64, close: f64) -> Candle {
        Candle::new(ts, close, close, close, close, 1.0).unwrap()
    }

    #[test]
    fn test_strength_fresh_level() {
        // 2 * 2.0 * 1.0 / 1 = 4 → 4/5*10 = 8
        let l = level(LevelType::Support, 100.0, 2, 0, 0, 2.0);
        assert_eq!(LevelScorer::new().strength(&l, 0), 8.0);
    }

    #[test]
    fn test_strength_capped_at_ten() {
        let l = level(LevelType::Support, 100.0, 10, 0, 0, 3.0);
        assert_eq!(LevelScorer::new().strength(&l, 0), 10.0);
    }

    #[test]
    fn test_recency_floor() {
        // 60일 경과: recency는 0이 아닌 0.1
        let l = level(LevelType::Resistance, 100.0, 2, 0, 0, 2.0);
        assert_eq!(LevelScorer::new().strength(&l, 60 * DAY), 0.8);
    }

    #[test]
    fn test_time_spread_divides() {
        // 4일 간격: 2 * 2.0 * 1.0 / 4 = 1 → 2.0
        let l = level(LevelType::Resistance, 100.0, 2, 0, 4 * DAY, 2.0);
        assert_eq!(LevelScorer::new().strength(&l, 4 * DAY), 2.0);
    }

    #[test]
    fn test_now_before_last_touch_keeps_full_recency() {
        // 10일 간격: 2 * 1.0 * 1.0 / 10 = 0.2 → 0.4
        let l = level(LevelType::Support, 100.0, 2, 0, 10 * DAY, 1.0);
        let scorer = LevelScorer::new();
        assert_eq!(scorer.strength(&l, 10 * DAY), 0.4);
        assert_eq!(scorer.strength(&l, 5 * DAY), 0.4);
    }

    #[test]
    fn test_negative_significance_floors_at_zero() {
        let l = level(LevelType::Resistance, 100.0, 2, 0, 0, -1.0);
        assert_eq!(LevelScorer::new().strength(&l, 0), 0.0);
    }

    #[test]
    fn test_status_broken() {
        let l = level(LevelType::Resistance, 100.0, 2, 0, 10, 2.0);
        let candles = vec![close_at(5, 105.0), close_at(20, 101.0)];
        assert_eq!(LevelScorer::new().status(&l, 95.0, &candles), LevelStatus::Broken);
    }

    #[test]
    fn test_status_ignores_candles_before_last_touch() {
        let l = level(LevelType::Support, 100.0, 2, 0, 10, 2.0);
        let candles = vec![close_at(5, 90.0), close_at(10, 90.0), close_at(20, 103.0)];
        assert_eq!(LevelScorer::new().status(&l, 103.0, &candles), LevelStatus::Active);
    }

    #[test]
    fn test_status_tested() {
        let l = level(LevelType::Resistance, 100.0, 2, 0, 10, 2.0);
        let candles = vec![close_at(20, 99.0)];
        assert_eq!(LevelScorer::new().status(&l, 100.0, &candles), LevelStatus::Tested);
    }

    #[test]
    fn test_score_leaves_break_volume_empty() {
        let mut l = level(LevelType::Support, 100.0, 2, 0, 10, 2.0);
        let candles = vec![close_at(20, 90.0)];
        LevelScorer::new().score(&mut l, 20, 90.0, &candles);
        assert_eq!(l.status, LevelStatus::Broken);
        assert!(l.break_volume.is_none());
    }
}
