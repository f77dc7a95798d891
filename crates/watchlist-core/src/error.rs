//! 워치리스트 엔진의 에러 타입.
//!
//! 이 모듈은 엔진 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 엔진 에러.
#[derive(Debug, Error)]
pub enum WatchlistError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 캔들 데이터 에러
    #[error("캔들 에러: {0}")]
    Candle(#[from] CandleError),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 엔진 작업을 위한 Result 타입.
pub type WatchlistResult<T> = Result<T, WatchlistError>;

impl From<serde_json::Error> for WatchlistError {
    fn from(err: serde_json::Error) -> Self {
        WatchlistError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for WatchlistError {
    fn from(err: config::ConfigError) -> Self {
        WatchlistError::Config(err.to_string())
    }
}

/// 캔들 불변식 위반 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandleError {
    /// 유한하지 않은 값 (NaN, 무한대)
    #[error("유한하지 않은 {field} 값: {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// 음수 거래량
    #[error("음수 거래량: {0}")]
    NegativeVolume(f64),

    /// 고가가 시가/종가보다 낮음
    #[error("고가({high})가 시가/종가 최댓값({body_top})보다 낮습니다")]
    HighBelowBody { high: f64, body_top: f64 },

    /// 저가가 시가/종가보다 높음
    #[error("저가({low})가 시가/종가 최솟값({body_bottom})보다 높습니다")]
    LowAboveBody { low: f64, body_bottom: f64 },

    /// 타임스탬프가 오름차순이 아님
    #[error("인덱스 {index}의 타임스탬프({timestamp})가 이전 값({previous}) 이후가 아닙니다")]
    UnorderedTimestamp {
        index: usize,
        timestamp: i64,
        previous: i64,
    },

    /// 거래소 행 파싱 실패
    #[error("거래소 캔들 행 파싱 실패 (행 {row}): {reason}")]
    MalformedRow { row: usize, reason: String },
}
