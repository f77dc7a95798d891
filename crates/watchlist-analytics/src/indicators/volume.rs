//! 거래량 델타 / CVD (Cumulative Volume Delta) 지표.
//!
//! ## 계산 방식
//! - 종가 ≥ 시가: 델타 = +거래량
//! - 종가 < 시가: 델타 = -거래량
//! - CVD = 델타의 누적합
//!
//! ## 활용
//! - 가격 상승 + CVD 하락: 매수세가 약한 상승 (다이버전스)
//! - CVD 기울기로 공격적 매수/매도 우위 판단

use serde::{Deserialize, Serialize};
use watchlist_core::Candle;

/// 캔들별 거래량 델타 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDeltaPoint {
    /// 캔들 시작 시간 (ms)
    pub timestamp: i64,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량
    pub volume: f64,
    /// 부호가 붙은 거래량
    pub volume_delta: f64,
    /// 누적 거래량 델타
    pub cvd: f64,
}

/// 거래량 델타 계산기.
#[derive(Debug, Default)]
pub struct VolumeDeltaIndicator;

impl VolumeDeltaIndicator {
    /// 새로운 거래량 델타 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 캔들 시계열에서 델타와 CVD를 계산합니다. 빈 입력은 빈 결과입니다.
    pub fn calculate(&self, candles: &[Candle]) -> Vec<VolumeDeltaPoint> {
        let mut cvd = 0.0;

        candles
            .iter()
            .map(|candle| {
                let volume_delta = if candle.close >= candle.open {
                    candle.volume
                } else {
                    -candle.volume
                };
                cvd += volume_delta;

                VolumeDeltaPoint {
                    timestamp: candle.timestamp,
                    open: candle.open,
                    high: candle.high,
                    low: candle.low,
                    close: candle.close,
                    volume: candle.volume,
                    volume_delta,
                    cvd,
                }
            })
            .collect()
    }
}
