//! 피봇(국소 고점/저점) 감지.
//!
//! 인덱스 `i`가 피봇 고점이 되려면 `high[i]`가 왼쪽 `left_bars`개와 오른쪽
//! `right_bars`개 캔들의 고가보다 모두 엄격하게 커야 합니다. 동률이 하나라도
//! 있으면 피봇이 아닙니다. 피봇 저점은 `low`와 `<` 비교로 대칭입니다.

use serde::{Deserialize, Serialize};
use tracing::debug;
use watchlist_core::Candle;

/// 레벨/피봇 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelType {
    /// 지지 (피봇 저점)
    Support,
    /// 저항 (피봇 고점)
    Resistance,
}

impl LevelType {
    /// 알림 키 등에 쓰는 한 글자 약어.
    pub fn short_code(&self) -> &'static str {
        match self {
            LevelType::Support => "S",
            LevelType::Resistance => "R",
        }
    }
}

impl std::fmt::Display for LevelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelType::Support => write!(f, "support"),
            LevelType::Resistance => write!(f, "resistance"),
        }
    }
}

/// 감지된 피봇.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pivot {
    /// 피봇 방향
    #[serde(rename = "type")]
    pub level_type: LevelType,
    /// 피봇 가격 (저항은 고가, 지지는 저가)
    pub price: f64,
    /// 캔들 타임스탬프 (ms)
    pub timestamp: i64,
    /// 캔들 거래량
    pub volume: f64,
    /// 거래량 유의성 점수
    pub z_score: f64,
    /// 캔들 인덱스
    pub candle_index: usize,
}

/// 피봇 감지기.
#[derive(Debug, Clone, Copy)]
pub struct PivotDetector {
    left_bars: usize,
    right_bars: usize,
}

impl Default for PivotDetector {
    fn default() -> Self {
        Self::new(15, 15)
    }
}

impl PivotDetector {
    /// 새 감지기 생성.
    pub fn new(left_bars: usize, right_bars: usize) -> Self {
        Self {
            left_bars,
            right_bars,
        }
    }

    /// 캔들 시계열에서 피봇을 감지합니다.
    ///
    /// # 인자
    /// * `candles` - 오름차순 캔들
    /// * `significance` - 캔들별 거래량 유의성 (피봇의 `z_score`로 기록, 없으면 0)
    /// * `gate` - 설정 시 `significance[i] < gate`인 캔들은 건너뜀
    ///
    /// # 반환
    /// 캔들 인덱스 순서의 피봇 목록. 같은 캔들에서 저항 피봇이 지지 피봇보다 먼저 나옵니다.
    pub fn detect(&self, candles: &[Candle], significance: &[f64], gate: Option<f64>) -> Vec<Pivot> {
        let mut pivots = Vec::new();
        if candles.len() <= self.left_bars + self.right_bars {
            return pivots;
        }

        let end = candles.len() - self.right_bars;
        for i in self.left_bars..end {
            let z_score = significance.get(i).copied().unwrap_or(0.0);
            if let Some(threshold) = gate {
                if z_score < threshold {
                    continue;
                }
            }

            let neighbors = candles[i - self.left_bars..i]
                .iter()
                .chain(&candles[i + 1..=i + self.right_bars]);
            let candle = &candles[i];

            let (mut is_high, mut is_low) = (true, true);
            for other in neighbors {
                is_high &= candle.high > other.high;
                is_low &= candle.low < other.low;
                if !is_high && !is_low {
                    break;
                }
            }

            if is_high {
                pivots.push(Pivot {
                    level_type: LevelType::Resistance,
                    price: candle.high,
                    timestamp: candle.timestamp,
                    volume: candle.volume,
                    z_score,
                    candle_index: i,
                });
            }
            if is_low {
                pivots.push(Pivot {
                    level_type: LevelType::Support,
                    price: candle.low,
                    timestamp: candle.timestamp,
                    volume: candle.volume,
                    z_score,
                    candle_index: i,
                });
            }
        }

        debug!(
            candles = candles.len(),
            pivots = pivots.len(),
            left_bars = self.left_bars,
            right_bars = self.right_bars,
            "Pivot detection complete"
        );

        pivots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, high: f64, low: f64) -> Candle {
        let mid = (high + low) / 2.0;
        Candle::new(ts, mid, high, low, mid, 100.0).unwrap()
    }

    fn series(highs_lows: &[(f64, f64)]) -> Vec<Candle> {
        highs_lows
            .iter()
            .enumerate()
            .map(|(i, &(h, l))| bar(i as i64 * 60_000, h, l))
            .collect()
    }

    #[test]
    fn test_simple_peak_and_trough() {
        let candles = series(&[(10.0, 9.0), (12.0, 8.0), (11.0, 5.0), (10.5, 9.5), (10.0, 9.0)]);
        let pivots = PivotDetector::new(1, 1).detect(&candles, &[], None);

        let resistance: Vec<_> = pivots
            .iter()
            .filter(|p| p.level_type == LevelType::Resistance)
            .collect();
        let support: Vec<_> = pivots
            .iter()
            .filter(|p| p.level_type == LevelType::Support)
            .collect();

        assert_eq!(resistance.len(), 1);
        assert_eq!(resistance[0].candle_index, 1);
        assert_eq!(resistance[0].price, 12.0);
        assert_eq!(support.len(), 1);
        assert_eq!(support[0].candle_index, 2);
        assert_eq!(support[0].price, 5.0);
    }

    #[test]
    fn test_tie_disqualifies() {
        let candles = series(&[(10.0, 9.0), (12.0, 8.0), (12.0, 8.5), (10.0, 9.0)]);
        let pivots = PivotDetector::new(1, 1).detect(&candles, &[], None);
        assert!(pivots
            .iter()
            .all(|p| p.level_type != LevelType::Resistance));
    }

    #[test]
    fn test_candle_can_be_both_pivots() {
        let candles = series(&[(10.0, 9.0), (15.0, 1.0), (10.0, 9.0)]);
        let pivots = PivotDetector::new(1, 1).detect(&candles, &[], None);
        assert_eq!(pivots.len(), 2);
        assert_eq!(pivots[0].level_type, LevelType::Resistance);
        assert_eq!(pivots[1].level_type, LevelType::Support);
        assert!(pivots.iter().all(|p| p.candle_index == 1));
    }

    #[test]
    fn test_zscore_gate_skips_candles() {
        let candles = series(&[(10.0, 9.0), (12.0, 8.0), (10.0, 9.0)]);
        let detector = PivotDetector::new(1, 1);

        assert!(detector.detect(&candles, &[0.0, 1.0, 0.0], Some(1.5)).is_empty());

        let pivots = detector.detect(&candles, &[0.0, 2.0, 0.0], Some(1.5));
        assert_eq!(pivots.len(), 2);
        assert_eq!(pivots[0].z_score, 2.0);
    }

    #[test]
    fn test_too_short_series() {
        let candles = series(&[(10.0, 9.0), (12.0, 8.0)]);
        assert!(PivotDetector::new(1, 1).detect(&candles, &[], None).is_empty());
        assert!(PivotDetector::default().detect(&[], &[], None).is_empty());
    }
}
