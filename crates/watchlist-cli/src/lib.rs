//! 워치리스트 CLI 구성 요소.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 캔들 파일 로딩 (JSON 배열, kline 응답)
//! - 설정 로딩과 커맨드라인 오버라이드
//! - `levels`, `patterns`, `volume-delta` 명령

pub mod commands;
pub mod input;
pub mod settings;
