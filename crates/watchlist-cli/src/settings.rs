//! CLI 설정 로딩.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use watchlist_core::{layered_builder, AppConfig};

/// 커맨드라인에서 받은 설정 오버라이드.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// 설정 파일 경로 (없으면 `config/default.toml`을 선택적으로 읽음)
    pub config_path: Option<PathBuf>,
    /// 로그 형식
    pub log_format: Option<String>,
}

/// 파일과 환경 변수 위에 커맨드라인 오버라이드를 얹어 설정을 로드합니다.
pub fn load_settings(overrides: &SettingsOverrides) -> Result<AppConfig> {
    let mut builder = layered_builder(overrides.config_path.as_deref())?;
    if let Some(format) = &overrides.log_format {
        builder = builder.set_override("logging.format", format.as_str())?;
    }

    let settings: AppConfig = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .context("설정을 불러올 수 없습니다")?;
    Ok(settings)
}

/// 엔진 설정 JSON 파일을 읽습니다. 경로가 없으면 기본값입니다.
pub fn load_engine_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("설정 파일을 읽을 수 없습니다: {}", p.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("설정 파일 형식 오류: {}", p.display()))
        }
        None => Ok(T::default()),
    }
}
