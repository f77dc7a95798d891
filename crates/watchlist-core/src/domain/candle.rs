//! OHLCV 캔들 데이터.
//!
//! 이 모듈은 엔진의 입력이 되는 캔들 타입과 시계열 검증을 정의합니다:
//! - `Candle` - 불변식이 검증된 OHLCV 캔들
//! - `validate_series` - 타임스탬프 오름차순 검증
//! - `parse_exchange_rows` - Bybit v5 kline 행 변환

use crate::error::CandleError;
use crate::types::Timeframe;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들스틱 데이터.
///
/// `high ≥ max(open, close)`, `low ≤ min(open, close)`, `volume ≥ 0`을
/// 생성 시점에 보장합니다. 역직렬화도 같은 검증을 거칩니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCandle")]
pub struct Candle {
    /// 캔들 시작 시간 (ms epoch)
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
}

/// 검증 전의 캔들 원시 데이터.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawCandle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl TryFrom<RawCandle> for Candle {
    type Error = CandleError;

    fn try_from(raw: RawCandle) -> Result<Self, Self::Error> {
        Candle::new(
            raw.timestamp,
            raw.open,
            raw.high,
            raw.low,
            raw.close,
            raw.volume,
        )
    }
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, CandleError> {
        for (field, value) in [
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", close),
            ("volume", volume),
        ] {
            if !value.is_finite() {
                return Err(CandleError::NonFinite { field, value });
            }
        }

        if volume < 0.0 {
            return Err(CandleError::NegativeVolume(volume));
        }

        let body_top = open.max(close);
        if high < body_top {
            return Err(CandleError::HighBelowBody { high, body_top });
        }

        let body_bottom = open.min(close);
        if low > body_bottom {
            return Err(CandleError::LowAboveBody { low, body_bottom });
        }

        Ok(Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// 캔들 몸통 크기(절대값)를 반환합니다.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// 윗꼬리 길이.
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// 아랫꼬리 길이.
    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 현재 시각 기준으로 아직 마감되지 않은 캔들인지 확인합니다.
    pub fn is_in_progress(&self, now_ms: i64, timeframe: Timeframe) -> bool {
        now_ms - self.timestamp < timeframe.as_millis()
    }
}

/// 캔들 시계열의 타임스탬프가 엄격한 오름차순인지 검증합니다.
pub fn validate_series(candles: &[Candle]) -> Result<(), CandleError> {
    for (index, pair) in candles.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(CandleError::UnorderedTimestamp {
                index: index + 1,
                timestamp: pair[1].timestamp,
                previous: pair[0].timestamp,
            });
        }
    }
    Ok(())
}

/// Bybit v5 kline 행(`[ts, open, high, low, close, volume, turnover]`, 문자열, 최신순)을
/// 오름차순 캔들 시계열로 변환합니다.
///
/// 같은 타임스탬프가 반복되면 마지막으로 나온 행을 유지합니다.
pub fn parse_exchange_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Vec<Candle>, CandleError> {
    let mut candles = Vec::with_capacity(rows.len());

    for (row_idx, row) in rows.iter().enumerate() {
        if row.len() < 6 {
            return Err(CandleError::MalformedRow {
                row: row_idx,
                reason: format!("필드가 6개 미만입니다 ({}개)", row.len()),
            });
        }

        let timestamp: i64 = row[0]
            .as_ref()
            .trim()
            .parse()
            .map_err(|e| CandleError::MalformedRow {
                row: row_idx,
                reason: format!("타임스탬프: {}", e),
            })?;

        let mut values = [0.0_f64; 5];
        for (slot, field) in values.iter_mut().zip(&row[1..6]) {
            *slot = field
                .as_ref()
                .trim()
                .parse()
                .map_err(|e| CandleError::MalformedRow {
                    row: row_idx,
                    reason: format!("숫자 필드 '{}': {}", field.as_ref(), e),
                })?;
        }
        let [open, high, low, close, volume] = values;

        candles.push(Candle::new(timestamp, open, high, low, close, volume)?);
    }

    candles.sort_by_key(|c| c.timestamp);
    // 안정 정렬이므로 중복 구간의 마지막 원소가 나중에 나온 행
    let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        match deduped.last_mut() {
            Some(last) if last.timestamp == candle.timestamp => *last = candle,
            _ => deduped.push(candle),
        }
    }

    Ok(deduped)
}
