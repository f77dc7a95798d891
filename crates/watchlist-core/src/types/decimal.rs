//! 보고용 점수 반올림 유틸리티.
//!
//! 엔진 계산은 `f64`로 수행하고, 외부로 내보내는 점수만 `Decimal`을 거쳐
//! 은행가 반올림(half-even)으로 자릿수를 맞춥니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// 강도 점수 소수점 자릿수.
pub const STRENGTH_DP: u32 = 2;

/// 신뢰도 점수 소수점 자릿수.
pub const CONFIDENCE_DP: u32 = 2;

/// 패턴 지표 소수점 자릿수.
pub const METRIC_DP: u32 = 3;

/// `f64` 값을 지정된 소수점 자릿수로 반올림합니다.
///
/// `Decimal`로 표현할 수 없는 값(NaN, 무한대, 범위 초과)은 그대로 반환합니다.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// 두 가격 사이의 거리를 기준 가격 대비 퍼센트로 반환합니다.
///
/// 기준 가격이 0이면 무한대를 반환합니다.
pub fn pct_distance(price: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return f64::INFINITY;
    }
    (price - reference).abs() / reference.abs() * 100.0
}
