//! 밀리초 epoch 타임스탬프 변환 유틸리티.

use chrono::{DateTime, FixedOffset, Utc};

/// 하루의 밀리초.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// 두 타임스탬프(ms) 사이의 일수를 반환합니다. `to < from`이면 음수입니다.
pub fn days_between(from_ms: i64, to_ms: i64) -> f64 {
    (to_ms - from_ms) as f64 / MS_PER_DAY
}

/// 밀리초 타임스탬프를 UTC 시각으로 변환합니다.
pub fn datetime_from_millis(ts_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_ms)
}

/// 밀리초 타임스탬프를 고정 UTC 오프셋 시각 문자열로 포맷합니다.
///
/// 오프셋이 범위를 벗어나면 UTC로 표시합니다.
pub fn format_millis(ts_ms: i64, utc_offset_hours: i32, fmt: &str) -> String {
    let Some(dt) = datetime_from_millis(ts_ms) else {
        return ts_ms.to_string();
    };
    match FixedOffset::east_opt(utc_offset_hours * 3600) {
        Some(offset) => dt.with_timezone(&offset).format(fmt).to_string(),
        None => dt.format(fmt).to_string(),
    }
}
