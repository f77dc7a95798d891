//! 설정 관리.
//!
//! 설정은 세 단계로 겹쳐 로드됩니다:
//! 1. 내장 기본값
//! 2. TOML 파일 (`config/default.toml`, 명시 경로는 필수)
//! 3. `WATCHLIST__` 접두사 환경 변수 (예: `WATCHLIST__ALERTS__WEBHOOK_URL`)

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "WATCHLIST";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 알림 설정
    #[serde(default)]
    pub alerts: AlertConfig,
    /// 표시 설정
    #[serde(default)]
    pub display: DisplayConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 알림 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// 알림 전송 활성화 여부
    pub enabled: bool,
    /// 알림 리스너 기본 URL (예: `http://localhost:5000`)
    pub webhook_url: String,
    /// 레벨 근접 알림 임계 거리 (%)
    pub level_proximity_percent: f64,
    /// 레벨 근접 알림 최소 강도
    pub level_min_strength: f64,
    /// 같은 레벨 알림 재전송 대기 시간 (초)
    pub cooldown_secs: u64,
    /// 실행 간 쿨다운 기록 파일. 비어 있으면 저장하지 않습니다.
    pub cooldown_file: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: "http://localhost:5000".to_string(),
            level_proximity_percent: 0.3,
            level_min_strength: 5.0,
            cooldown_secs: 3600,
            cooldown_file: ".watchlist/cooldown.json".to_string(),
            timeout_secs: 5,
        }
    }
}

/// 표시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 표시용 시간대의 UTC 오프셋 (시간). 기본값은 보고타(UTC-5).
    pub utc_offset_hours: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: -5,
        }
    }
}

/// 기본값, 파일, 환경 변수 소스를 겹친 설정 빌더를 생성합니다.
///
/// `path`가 `None`이면 [`DEFAULT_CONFIG_PATH`]를 선택적으로 읽습니다.
pub fn layered_builder(path: Option<&Path>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
    };

    let builder = config::Config::builder()
        // 기본값으로 시작
        .set_default("logging.level", "info")?
        .set_default("logging.format", "pretty")?
        .set_default("alerts.enabled", false)?
        // 파일에서 로드
        .add_source(file)
        // 환경 변수로 오버라이드
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    Ok(builder)
}

/// 겹친 소스에서 임의의 설정 타입을 로드합니다.
pub fn load_layered<T: DeserializeOwned>(path: Option<&Path>) -> Result<T, ConfigError> {
    layered_builder(path)?.build()?.try_deserialize()
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_layered(Some(path.as_ref()))
    }

    /// 기본 경로에서 설정을 로드합니다. 파일이 없으면 기본값을 사용합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        load_layered(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_defaults() {
        let config = AppConfig::default();
        assert!(!config.alerts.enabled);
        assert_eq!(config.alerts.level_proximity_percent, 0.3);
        assert_eq!(config.alerts.level_min_strength, 5.0);
        assert_eq!(config.alerts.cooldown_secs, 3600);
        assert_eq!(config.alerts.cooldown_file, ".watchlist/cooldown.json");
        assert_eq!(config.display.utc_offset_hours, -5);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("watchlist-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            r#"
[logging]
level = "debug"
format = "json"

[alerts]
enabled = true
webhook_url = "http://alerts.local:5000"
cooldown_secs = 60
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert!(config.alerts.enabled);
        assert_eq!(config.alerts.webhook_url, "http://alerts.local:5000");
        assert_eq!(config.alerts.cooldown_secs, 60);
        // 파일에 없는 필드는 기본값 유지
        assert_eq!(config.alerts.level_proximity_percent, 0.3);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = AppConfig::load("/definitely/not/here/watchlist.toml");
        assert!(result.is_err());
    }
}
