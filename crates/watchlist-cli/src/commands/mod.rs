//! CLI 명령어 구현 모듈.

pub mod levels;
pub mod patterns;
pub mod volume_delta;

use anyhow::Result;
use serde::Serialize;
use watchlist_core::AppConfig;
use watchlist_notification::{NotificationManager, WebhookConfig, WebhookSender};

/// 알림 관리자를 구성합니다. `force`이면 설정의 `alerts.enabled`와 무관하게 전송합니다.
pub fn notification_manager(settings: &AppConfig, force: bool) -> Result<NotificationManager> {
    let mut webhook = WebhookConfig::from(&settings.alerts);
    webhook.enabled = webhook.enabled || force;

    let mut manager = NotificationManager::new(settings.display.utc_offset_hours);
    manager.add_sender(WebhookSender::new(webhook)?);
    Ok(manager)
}

/// 결과를 들여쓴 JSON으로 표준 출력에 씁니다.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
