//! 리젝션 캔들 패턴 판정.
//!
//! ## 지원 패턴
//! - **HAMMER**: 긴 아랫꼬리, 윗꼬리 거의 없음, 종가가 범위 상단
//! - **SHOOTING_STAR**: 망치형의 대칭
//! - **ENGULFING_BULLISH / BEARISH**: 직전 반대색 캔들의 몸통을 양쪽에서 감쌈
//! - **DOJI_DRAGONFLY / GRAVESTONE**: 몸통이 범위의 5% 이하인 긴 꼬리 도지
//!
//! 고가와 저가가 같은 캔들(범위 0)은 어떤 패턴도 만들지 않습니다.

use serde::{Deserialize, Serialize};
use watchlist_core::Candle;

/// 망치형/유성형 반대쪽 꼬리 허용치 (몸통 대비).
const OPPOSITE_WICK_MAX: f64 = 0.1;

/// 망치형/유성형 종가 위치 최소치 (범위 대비).
const CLOSE_POSITION_MIN: f64 = 0.6;

/// 도지 몸통 최대 비율 (범위 대비).
const DOJI_BODY_MAX: f64 = 0.05;

/// 도지 긴 꼬리 최소 비율 (범위 대비).
const DOJI_LONG_WICK_MIN: f64 = 0.6;

/// 도지 짧은 꼬리 최대 비율 (범위 대비).
const DOJI_SHORT_WICK_MAX: f64 = 0.1;

/// 리젝션 패턴 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    /// 망치형 (강세)
    Hammer,
    /// 유성형 (약세)
    ShootingStar,
    /// 강세 장악형
    EngulfingBullish,
    /// 약세 장악형
    EngulfingBearish,
    /// 잠자리 도지 (강세)
    DojiDragonfly,
    /// 비석 도지 (약세)
    DojiGravestone,
}

/// 패턴이 암시하는 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternDirection {
    /// 상승 반전
    Bullish,
    /// 하락 반전
    Bearish,
}

impl PatternType {
    /// 와이어 이름 (`HAMMER`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hammer => "HAMMER",
            Self::ShootingStar => "SHOOTING_STAR",
            Self::EngulfingBullish => "ENGULFING_BULLISH",
            Self::EngulfingBearish => "ENGULFING_BEARISH",
            Self::DojiDragonfly => "DOJI_DRAGONFLY",
            Self::DojiGravestone => "DOJI_GRAVESTONE",
        }
    }

    /// 패턴 방향.
    pub fn direction(&self) -> PatternDirection {
        match self {
            Self::Hammer | Self::EngulfingBullish | Self::DojiDragonfly => PatternDirection::Bullish,
            Self::ShootingStar | Self::EngulfingBearish | Self::DojiGravestone => {
                PatternDirection::Bearish
            }
        }
    }

    /// 패턴 형태 품질 (0.0 - 1.0).
    ///
    /// - 망치형/유성형: `min(1, 꼬리/몸통/3 * 0.7 + 종가위치 * 0.3)`
    /// - 장악형: `min(1, 몸통/범위 * 1.2)`
    /// - 도지: `1 - min(1, 몸통/범위 * 10)`
    pub fn quality(&self, candle: &Candle) -> f64 {
        let range = candle.range();
        if range == 0.0 {
            return 0.0;
        }
        let body = candle.body();

        match self {
            Self::Hammer => {
                let wick_ratio = if body > 0.0 { candle.lower_shadow() / body } else { 0.0 };
                let position = (candle.close - candle.low) / range;
                (wick_ratio / 3.0 * 0.7 + position * 0.3).min(1.0)
            }
            Self::ShootingStar => {
                let wick_ratio = if body > 0.0 { candle.upper_shadow() / body } else { 0.0 };
                let position = (candle.high - candle.close) / range;
                (wick_ratio / 3.0 * 0.7 + position * 0.3).min(1.0)
            }
            Self::EngulfingBullish | Self::EngulfingBearish => (body / range * 1.2).min(1.0),
            Self::DojiDragonfly | Self::DojiGravestone => 1.0 - (body / range * 10.0).min(1.0),
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 망치형 판정.
pub fn is_hammer(candle: &Candle, min_wick_ratio: f64) -> bool {
    let range = candle.range();
    if range == 0.0 {
        return false;
    }
    let body = candle.body();

    candle.lower_shadow() >= min_wick_ratio * body
        && candle.upper_shadow() <= OPPOSITE_WICK_MAX * body
        && (candle.close - candle.low) / range >= CLOSE_POSITION_MIN
}

/// 유성형 판정.
pub fn is_shooting_star(candle: &Candle, min_wick_ratio: f64) -> bool {
    let range = candle.range();
    if range == 0.0 {
        return false;
    }
    let body = candle.body();

    candle.upper_shadow() >= min_wick_ratio * body
        && candle.lower_shadow() <= OPPOSITE_WICK_MAX * body
        && (candle.high - candle.close) / range >= CLOSE_POSITION_MIN
}

/// 장악형 판정. 직전 캔들과 색이 반대이고 몸통을 양쪽에서 엄격히 감싸야 합니다.
pub fn engulfing(prev: &Candle, curr: &Candle) -> Option<PatternType> {
    let prev_top = prev.open.max(prev.close);
    let prev_bottom = prev.open.min(prev.close);
    let curr_top = curr.open.max(curr.close);
    let curr_bottom = curr.open.min(curr.close);
    let contains = curr_bottom < prev_bottom && curr_top > prev_top;

    if prev.is_bearish() && curr.is_bullish() && contains {
        Some(PatternType::EngulfingBullish)
    } else if prev.is_bullish() && curr.is_bearish() && contains {
        Some(PatternType::EngulfingBearish)
    } else {
        None
    }
}

/// 도지 판정. 잠자리 도지를 비석 도지보다 먼저 확인합니다.
pub fn doji(candle: &Candle) -> Option<PatternType> {
    let range = candle.range();
    if range == 0.0 || candle.body() / range > DOJI_BODY_MAX {
        return None;
    }

    let lower = candle.lower_shadow();
    let upper = candle.upper_shadow();

    if lower > range * DOJI_LONG_WICK_MIN && upper < range * DOJI_SHORT_WICK_MAX {
        Some(PatternType::DojiDragonfly)
    } else if upper > range * DOJI_LONG_WICK_MIN && lower < range * DOJI_SHORT_WICK_MAX {
        Some(PatternType::DojiGravestone)
    } else {
        None
    }
}
