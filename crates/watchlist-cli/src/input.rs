//! 캔들 입력 파일 로딩.
//!
//! 두 가지 형식을 받습니다:
//! - 캔들 객체의 JSON 배열 (`[{"timestamp": .., "open": .., ...}]`)
//! - Bybit v5 kline 응답 원문 (`{"retCode":0,"result":{"list":[[...]]}}`)

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use watchlist_core::{parse_exchange_rows, Candle, Timeframe};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KlineResponse {
    #[serde(default)]
    ret_code: i64,
    #[serde(default)]
    ret_msg: String,
    result: KlineResult,
}

#[derive(Debug, Deserialize)]
struct KlineResult {
    #[serde(default)]
    list: Vec<Vec<String>>,
}

/// 파일에서 캔들 시계열을 읽습니다.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("캔들 파일을 읽을 수 없습니다: {}", path.display()))?;
    parse_candles(&text).with_context(|| format!("캔들 파일 형식 오류: {}", path.display()))
}

/// JSON 텍스트를 캔들 시계열로 변환합니다.
pub fn parse_candles(text: &str) -> Result<Vec<Candle>> {
    let value: Value = serde_json::from_str(text).context("JSON 파싱 실패")?;

    let candles = match value {
        Value::Array(_) => {
            serde_json::from_value::<Vec<Candle>>(value).context("캔들 배열 변환 실패")?
        }
        Value::Object(_) => {
            let response: KlineResponse =
                serde_json::from_value(value).context("kline 응답 형식이 아닙니다")?;
            if response.ret_code != 0 {
                bail!(
                    "거래소 응답 에러 (retCode {}): {}",
                    response.ret_code,
                    response.ret_msg
                );
            }
            parse_exchange_rows(&response.result.list)?
        }
        _ => bail!("캔들 배열 또는 kline 응답 객체가 필요합니다"),
    };

    debug!(count = candles.len(), "Candles loaded");
    Ok(candles)
}

/// 최근 `days`일에 해당하는 캔들만 남깁니다. 일수는 인터벌별 최대치로 제한됩니다.
pub fn limit_to_days(mut candles: Vec<Candle>, timeframe: Timeframe, days: Option<u32>) -> Vec<Candle> {
    if let Some(days) = days {
        let keep = timeframe.candles_for_days(days);
        if candles.len() > keep {
            candles.drain(..candles.len() - keep);
        }
    }
    candles
}

/// 마지막 캔들이 `now_ms` 시점에 아직 진행 중이면 제외합니다.
pub fn drop_in_progress(mut candles: Vec<Candle>, timeframe: Timeframe, now_ms: i64) -> Vec<Candle> {
    if candles
        .last()
        .is_some_and(|last| last.is_in_progress(now_ms, timeframe))
    {
        candles.pop();
        debug!(remaining = candles.len(), "Dropped in-progress candle");
    }
    candles
}
