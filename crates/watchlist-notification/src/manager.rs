//! 여러 전송기로 알림을 보내는 관리자.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};
use watchlist_analytics::{LevelProximityAlert, RejectionPattern};

use crate::payload::{LevelAlertPayload, PatternAlertPayload};
use crate::types::{Notification, NotificationResult, NotificationSender};

/// 여러 전송기를 관리하는 알림 관리자.
pub struct NotificationManager {
    senders: Vec<Box<dyn NotificationSender>>,
    utc_offset_hours: i32,
}

impl NotificationManager {
    /// 새 알림 관리자를 생성합니다. 시각은 `utc_offset_hours` 기준으로 표시됩니다.
    pub fn new(utc_offset_hours: i32) -> Self {
        Self {
            senders: Vec::new(),
            utc_offset_hours,
        }
    }

    /// 알림 전송기를 추가합니다.
    pub fn add_sender<S: NotificationSender + 'static>(&mut self, sender: S) {
        self.senders.push(Box::new(sender));
    }

    /// 활성화된 전송기 수.
    pub fn enabled_senders(&self) -> usize {
        self.senders.iter().filter(|s| s.is_enabled()).count()
    }

    /// 수신 측에 도달 가능한 활성 전송기 수.
    pub async fn reachable_senders(&self) -> usize {
        let mut reachable = 0usize;
        for sender in self.senders.iter().filter(|s| s.is_enabled()) {
            match sender.health_check().await {
                Ok(true) => reachable += 1,
                Ok(false) => {}
                Err(e) => warn!("Health check via {} failed: {}", sender.name(), e),
            }
        }
        reachable
    }

    /// 활성화된 모든 전송기를 통해 알림을 전송합니다.
    ///
    /// 실패한 전송기가 있어도 나머지에 계속 보내며,
    /// 활성 전송기가 모두 실패한 경우에만 마지막 에러를 반환합니다.
    pub async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        let mut last_error = None;
        let mut attempted = 0usize;
        let mut delivered = 0usize;

        for sender in self.senders.iter().filter(|s| s.is_enabled()) {
            attempted += 1;
            match sender.send(notification).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    error!("Failed to send notification via {}: {}", sender.name(), e);
                    last_error = Some(e);
                }
            }
        }

        if attempted == 0 {
            debug!(title = notification.title(), "No enabled notification senders");
        }

        match last_error {
            Some(e) if delivered == 0 => Err(e),
            _ => Ok(()),
        }
    }

    /// 리젝션 패턴 알림을 전송합니다.
    pub async fn notify_pattern(
        &self,
        symbol: &str,
        interval: &str,
        pattern: &RejectionPattern,
        user_config: Option<Value>,
    ) -> NotificationResult<()> {
        let mut payload = PatternAlertPayload::new(symbol, interval, pattern, self.utc_offset_hours);
        if let Some(config) = user_config {
            payload = payload.with_user_config(config);
        }
        self.notify(&Notification::pattern(payload)).await
    }

    /// 레벨 근접 알림을 전송합니다.
    pub async fn notify_level(
        &self,
        alert: &LevelProximityAlert,
        interval: &str,
    ) -> NotificationResult<()> {
        let payload = LevelAlertPayload::new(alert, interval, Utc::now(), self.utc_offset_hours);
        self.notify(&Notification::level(payload)).await
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(0)
    }
}
