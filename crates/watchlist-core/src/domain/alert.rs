//! 알림 심각도와 재발송 억제.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use watchlist_core::domain::{AlertSeverity, CooldownTracker};
//!
//! let mut cooldown = CooldownTracker::new(3600);
//! if cooldown.try_acquire("sr_alert_BTCUSDT_R_100.00", Utc::now()) {
//!     // 알림 전송
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WatchlistResult;

/// 알림 심각도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    /// 낮음
    Low,
    /// 보통
    Medium,
    /// 높음
    High,
}

impl AlertSeverity {
    /// 패턴 신뢰도(0 - 100) 기준 심각도. 80 이상 HIGH, 65 이상 MEDIUM.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 80.0 {
            Self::High
        } else if confidence >= 65.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// 레벨 강도(0 - 10) 기준 심각도. 8 이상 HIGH, 6 이상 MEDIUM.
    pub fn from_strength(strength: f64) -> Self {
        if strength >= 8.0 {
            Self::High
        } else if strength >= 6.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// 수신 측 우선순위 (1이 가장 높음).
    pub fn priority(&self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// 와이어 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 키별 마지막 발송 시각을 기억하여 쿨다운 내 재발송을 막습니다.
///
/// 호출자가 소유하는 상태이며 분석 엔진은 이 값을 보관하지 않습니다.
/// 프로세스 간에 유지하려면 [`CooldownTracker::load`]와 [`CooldownTracker::save`]를 씁니다.
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    cooldown_secs: i64,
    last_fired: HashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    /// 쿨다운(초)으로 트래커를 생성합니다.
    pub fn new(cooldown_secs: u64) -> Self {
        Self {
            cooldown_secs: i64::try_from(cooldown_secs).unwrap_or(i64::MAX),
            last_fired: HashMap::new(),
        }
    }

    /// 쿨다운(초).
    pub fn cooldown_secs(&self) -> i64 {
        self.cooldown_secs
    }

    /// 키가 `now` 시점에 쿨다운 중인지 확인합니다.
    pub fn is_in_cooldown(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.last_fired
            .get(key)
            .map(|last| now.signed_duration_since(*last).num_seconds() < self.cooldown_secs)
            .unwrap_or(false)
    }

    /// 쿨다운 중이 아니면 발송을 기록하고 `true`를 반환합니다.
    pub fn try_acquire(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        if self.is_in_cooldown(key, now) {
            return false;
        }
        self.last_fired.insert(key.to_string(), now);
        true
    }

    /// `now` 기준으로 쿨다운이 끝난 기록을 지웁니다.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cooldown_secs = self.cooldown_secs;
        self.last_fired
            .retain(|_, last| now.signed_duration_since(*last).num_seconds() < cooldown_secs);
    }

    /// 파일에 저장된 발송 기록을 읽습니다. 파일이 없으면 빈 트래커입니다.
    ///
    /// 파일 형식은 키에서 RFC 3339 시각으로의 JSON 객체입니다.
    pub fn load(path: &Path, cooldown_secs: u64) -> WatchlistResult<Self> {
        let mut tracker = Self::new(cooldown_secs);
        if !path.exists() {
            return Ok(tracker);
        }

        let text = std::fs::read_to_string(path)?;
        tracker.last_fired = serde_json::from_str(&text)?;
        debug!(path = %path.display(), entries = tracker.len(), "Cooldown state loaded");
        Ok(tracker)
    }

    /// 발송 기록을 파일에 씁니다. 상위 디렉터리가 없으면 만듭니다.
    pub fn save(&self, path: &Path) -> WatchlistResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.last_fired)?)?;
        debug!(path = %path.display(), entries = self.len(), "Cooldown state saved");
        Ok(())
    }

    /// 기록된 키 수.
    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    /// 기록이 비었는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_severity_from_confidence() {
        assert_eq!(AlertSeverity::from_confidence(80.0), AlertSeverity::High);
        assert_eq!(AlertSeverity::from_confidence(79.99), AlertSeverity::Medium);
        assert_eq!(AlertSeverity::from_confidence(65.0), AlertSeverity::Medium);
        assert_eq!(AlertSeverity::from_confidence(60.0), AlertSeverity::Low);
        assert_eq!(AlertSeverity::High.priority(), 1);
        assert_eq!(AlertSeverity::Low.priority(), 3);
    }

    #[test]
    fn test_severity_from_strength() {
        assert_eq!(AlertSeverity::from_strength(8.0), AlertSeverity::High);
        assert_eq!(AlertSeverity::from_strength(6.5), AlertSeverity::Medium);
        assert_eq!(AlertSeverity::from_strength(5.0), AlertSeverity::Low);
        assert_eq!(serde_json::to_string(&AlertSeverity::Medium).unwrap(), "\"MEDIUM\"");
    }

    #[test]
    fn test_cooldown_blocks_repeats() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut tracker = CooldownTracker::new(3600);

        assert!(tracker.try_acquire("a", t0));
        assert!(!tracker.try_acquire("a", t0 + Duration::minutes(59)));
        assert!(tracker.try_acquire("b", t0 + Duration::minutes(1)));
        assert!(tracker.try_acquire("a", t0 + Duration::hours(1)));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_prune_drops_expired_entries() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut tracker = CooldownTracker::new(3600);
        tracker.try_acquire("old", t0);
        tracker.try_acquire("new", t0 + Duration::minutes(30));

        tracker.prune(t0 + Duration::minutes(61));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.is_in_cooldown("new", t0 + Duration::minutes(61)));
    }

    #[test]
    fn test_saved_state_suppresses_repeat_after_reload() {
        let dir = std::env::temp_dir().join(format!("watchlist-cooldown-{}", std::process::id()));
        let path = dir.join("state").join("cooldown.json");
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        // 파일이 없으면 빈 상태
        let mut first = CooldownTracker::load(&path, 3600).unwrap();
        assert!(first.is_empty());
        assert!(first.try_acquire("sr_alert_BTCUSDT_S_100.00", t0));
        first.save(&path).unwrap();

        let mut second = CooldownTracker::load(&path, 3600).unwrap();
        assert_eq!(second.len(), 1);
        assert!(!second.try_acquire("sr_alert_BTCUSDT_S_100.00", t0 + Duration::minutes(5)));
        assert!(second.try_acquire("sr_alert_BTCUSDT_S_100.00", t0 + Duration::hours(2)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_corrupt_state_is_error() {
        let dir = std::env::temp_dir().join(format!("watchlist-cooldown-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cooldown.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            CooldownTracker::load(&path, 3600),
            Err(crate::error::WatchlistError::Serialization(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
