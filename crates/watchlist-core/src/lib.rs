//! # Watchlist Core
//!
//! 마켓 워치리스트 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - OHLCV 캔들 및 캔들 시계열 검증
//! - 거래소 인터벌(타임프레임) 정의
//! - 점수 반올림 및 시간 변환 유틸리티
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
