//! 알림 메시지, 에러, 전송기 trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use watchlist_core::AlertSeverity;

use crate::payload::{LevelAlertPayload, PatternAlertPayload};

/// 전송 대상 알림 본문.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertPayload {
    /// 리젝션 패턴 알림
    Pattern(PatternAlertPayload),
    /// 레벨 근접 알림
    Level(LevelAlertPayload),
}

impl AlertPayload {
    /// 알림 제목.
    pub fn title(&self) -> &str {
        match self {
            Self::Pattern(p) => &p.title,
            Self::Level(l) => &l.title,
        }
    }

    /// 심각도.
    pub fn severity(&self) -> AlertSeverity {
        match self {
            Self::Pattern(p) => p.severity,
            Self::Level(l) => l.severity,
        }
    }

    /// 심볼.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Pattern(p) => &p.symbol,
            Self::Level(l) => &l.symbol,
        }
    }
}

/// 알림 메시지.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// 알림 본문
    pub payload: AlertPayload,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// 현재 시각으로 알림을 감쌉니다.
    pub fn new(payload: AlertPayload) -> Self {
        Self {
            payload,
            created_at: Utc::now(),
        }
    }

    /// 리젝션 패턴 알림.
    pub fn pattern(payload: PatternAlertPayload) -> Self {
        Self::new(AlertPayload::Pattern(payload))
    }

    /// 레벨 근접 알림.
    pub fn level(payload: LevelAlertPayload) -> Self {
        Self::new(AlertPayload::Level(payload))
    }

    /// 알림 제목.
    pub fn title(&self) -> &str {
        self.payload.title()
    }

    /// 심각도.
    pub fn severity(&self) -> AlertSeverity {
        self.payload.severity()
    }
}

/// 알림 전송 Result.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 리스너가 거부했습니다: {0}")]
    SendFailed(String),

    #[error("알림 설정 오류: {0}")]
    InvalidConfig(String),

    #[error("알림 리스너 연결 실패: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("페이로드 직렬화 실패: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 알림 채널. 비활성 채널은 관리자가 건너뜁니다.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 한 번 전송합니다. 재시도는 하지 않습니다.
    async fn send(&self, notification: &Notification) -> NotificationResult<()>;

    /// 전송 가능 여부.
    fn is_enabled(&self) -> bool;

    /// 로그에 쓰는 채널 이름.
    fn name(&self) -> &str;

    /// 수신 측 도달 가능 여부. 확인 수단이 없는 채널은 항상 `true`입니다.
    async fn health_check(&self) -> NotificationResult<bool> {
        Ok(true)
    }
}
