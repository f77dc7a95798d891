//! Webhook 알림 서비스.
//!
//! 알림 리스너에 JSON 페이로드를 한 번 POST 합니다. 큐와 재시도는 없습니다.
//!
//! - 전송: `POST {base_url}/api/alerts` (HTTP 200이면 성공)
//! - 상태 확인: `GET {base_url}/api/health`

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use watchlist_core::AlertConfig;

use crate::types::{Notification, NotificationError, NotificationResult, NotificationSender};

/// Webhook 전송 설정.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 알림 리스너 기본 URL
    pub base_url: String,
    /// 전송 활성화 여부
    pub enabled: bool,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl WebhookConfig {
    /// 새 webhook 설정을 생성합니다.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            enabled: true,
            timeout: Duration::from_secs(5),
        }
    }

    /// 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 알림 엔드포인트 URL.
    pub fn alerts_url(&self) -> String {
        format!("{}/api/alerts", self.base_url.trim_end_matches('/'))
    }

    /// 상태 확인 엔드포인트 URL.
    pub fn health_url(&self) -> String {
        format!("{}/api/health", self.base_url.trim_end_matches('/'))
    }
}

impl From<&AlertConfig> for WebhookConfig {
    fn from(config: &AlertConfig) -> Self {
        Self {
            base_url: config.webhook_url.clone(),
            enabled: config.enabled,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Webhook 알림 전송기.
pub struct WebhookSender {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookSender {
    /// 새 webhook 전송기를 생성합니다.
    pub fn new(config: WebhookConfig) -> NotificationResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(NotificationError::InvalidConfig(
                "webhook URL이 비어 있습니다".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(NotificationError::NetworkError)?;

        Ok(Self { config, client })
    }

    /// 설정.
    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    async fn post(&self, notification: &Notification) -> NotificationResult<()> {
        let url = self.config.alerts_url();
        debug!(url = %url, title = notification.title(), "Posting alert");

        let response = self
            .client
            .post(&url)
            .json(&notification.payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Cannot reach alert listener");
                NotificationError::NetworkError(e)
            })?;

        let status = response.status();
        if status.as_u16() == 200 {
            info!(title = notification.title(), "Alert sent");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Alert listener rejected alert");
            Err(NotificationError::SendFailed(format!("HTTP {}: {}", status, body)))
        }
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("Webhook notifications are disabled, skipping");
            return Ok(());
        }
        self.post(notification).await
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.base_url.trim().is_empty()
    }

    fn name(&self) -> &str {
        "webhook"
    }

    /// `GET {base_url}/api/health`가 200이면 도달 가능으로 봅니다.
    async fn health_check(&self) -> NotificationResult<bool> {
        let url = self.config.health_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        let reachable = response.status().as_u16() == 200;
        if reachable {
            info!(url = %url, "Alert listener is reachable");
        } else {
            warn!(url = %url, status = %response.status(), "Alert listener health check failed");
        }
        Ok(reachable)
    }
}
