//! 엔진 전반에서 사용되는 공통 타입.

mod decimal;
mod time;
mod timeframe;

pub use decimal::*;
pub use time::*;
pub use timeframe::*;
