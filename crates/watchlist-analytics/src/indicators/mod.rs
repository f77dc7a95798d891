//! 기본 지표 모듈.
//!
//! 상위 분석기(지지/저항, 리젝션 패턴)가 공유하는 저수준 지표를 제공합니다.
//!
//! # 지원 지표
//!
//! - **StatisticsWindow**: 인과적 롤링 평균/Z-점수
//! - **VolumeDelta / CVD**: 캔들 방향으로 부호를 붙인 거래량과 누적합
//!
//! # 사용 예시
//!
//! ```ignore
//! use watchlist_analytics::indicators::{StatisticsWindow, VolumeDeltaIndicator};
//!
//! let window = StatisticsWindow::new(50)?;
//! let z = window.zscores(&volumes);
//!
//! let cvd = VolumeDeltaIndicator::new().calculate(&candles);
//! ```

pub mod statistics;
pub mod volume;

use thiserror::Error;
use watchlist_core::CandleError;

pub use statistics::StatisticsWindow;
pub use volume::{VolumeDeltaIndicator, VolumeDeltaPoint};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 잘못된 캔들 시계열
    #[error("잘못된 캔들 시계열: {0}")]
    InvalidCandles(#[from] CandleError),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;
