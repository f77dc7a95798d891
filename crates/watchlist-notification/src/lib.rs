//! # Watchlist Notification
//!
//! 감지 결과 알림 서비스.
//!
//! 지원 알림:
//! - 리젝션 패턴 알림 (트레이딩 봇용 단순 메시지 + 모니터링용 상세 정보)
//! - 지지/저항 레벨 근접 알림
//!
//! 전송 채널:
//! - Webhook (`POST {base}/api/alerts`, 단일 시도)

pub mod manager;
pub mod payload;
pub mod types;
pub mod webhook;

pub use manager::*;
pub use payload::*;
pub use types::*;
pub use webhook::*;
