//! 분석 엔진의 입력 도메인 모델과 알림 공통 타입.

mod alert;
mod candle;

pub use alert::*;
pub use candle::*;
