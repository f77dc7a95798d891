//! tracing 기반 로깅 초기화.
//!
//! 로그는 항상 표준 에러로 나갑니다. 표준 출력은 명령 결과 JSON 전용입니다.
//!
//! 형식:
//! - **pretty**: 여러 줄, 색상 (개발용)
//! - **json**: 한 줄 JSON (로그 수집용)
//! - **compact**: 한 줄 요약

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{WatchlistError, WatchlistResult};

/// 로그 형식 환경 변수.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = WatchlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(WatchlistError::Config(format!(
                "알 수 없는 로그 형식: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        };
        f.write_str(name)
    }
}

/// 로깅 초기화 옵션.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: `info`, `watchlist_analytics=debug`)
    pub filter: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 파일명/줄 번호 표시
    pub with_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
            with_location: false,
        }
    }
}

impl LogConfig {
    /// 필터 지시문으로 생성합니다.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_location(mut self, enabled: bool) -> Self {
        self.with_location = enabled;
        self
    }

    /// `RUST_LOG`와 `LOG_FORMAT`에서 읽습니다. 잘못된 형식은 pretty로 대체합니다.
    pub fn from_env() -> Self {
        let filter = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| "info".to_string());
        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        Self::new(filter).with_format(format)
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(section: &LoggingConfig) -> Self {
        Self::new(section.level.clone()).with_format(section.format.parse().unwrap_or_default())
    }
}

/// 전역 구독자를 설치합니다. `RUST_LOG`가 설정되어 있으면 필터보다 우선합니다.
///
/// # 예제
///
/// ```no_run
/// use watchlist_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json))?;
/// # Ok::<(), watchlist_core::WatchlistError>(())
/// ```
pub fn init_logging(config: LogConfig) -> WatchlistResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| WatchlistError::Config(format!("로그 필터 오류: {}", e)))?,
    };

    let layer = tfmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.with_location)
        .with_line_number(config.with_location);

    let installed = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(layer.pretty())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json().flatten_event(true))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init(),
    };
    installed.map_err(|e| WatchlistError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(format = %config.format, filter = %config.filter, "Logging initialized");
    Ok(())
}

/// 환경 변수만으로 로깅을 초기화합니다.
pub fn init_logging_from_env() -> WatchlistResult<()> {
    init_logging(LogConfig::from_env())
}

/// 심볼(과 인터벌) 필드가 붙은 분석 span.
#[macro_export]
macro_rules! analysis_span {
    ($name:expr, $symbol:expr) => {
        tracing::info_span!($name, symbol = %$symbol)
    };
    ($name:expr, $symbol:expr, $interval:expr) => {
        tracing::info_span!($name, symbol = %$symbol, interval = %$interval)
    };
}
