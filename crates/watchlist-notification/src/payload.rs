//! 알림 페이로드 구성.
//!
//! 리젝션 패턴 알림은 두 형식을 함께 담습니다:
//! - `message`: 트레이딩 봇이 실행하는 단순 형식
//!   (`[2025-09-16 10:12:00] [BTCUSDT] ABRIR LONG 45000.50`)
//! - `title`/`description`/`data`: 모니터링용 상세 정보

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use watchlist_analytics::{
    LevelProximityAlert, LevelType, PatternDirection, PatternMetrics, PatternType,
    ReferenceLevel, ReferenceSourceType, RejectionPattern,
};
use watchlist_core::{format_millis, AlertSeverity, Candle};

/// 알림 시각 표시 형식.
pub const ALERT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 리젝션 패턴 알림 종류.
pub const PATTERN_ALERT_TYPE: &str = "REJECTION_PATTERN_ALERT";

/// 레벨 근접 알림 종류.
pub const LEVEL_ALERT_TYPE: &str = "S/R Level";

/// 레벨 근접 알림 지표 이름.
pub const LEVEL_INDICATOR_NAME: &str = "Support & Resistance";

/// 설명에 표시할 최대 근접 레벨 수.
const MAX_DESCRIBED_LEVELS: usize = 3;

/// 트레이딩 봇 실행 동작.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    /// 롱 진입
    #[serde(rename = "ABRIR LONG")]
    OpenLong,
    /// 숏 진입
    #[serde(rename = "ABRIR SHORT")]
    OpenShort,
}

impl TradeAction {
    /// 와이어 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenLong => "ABRIR LONG",
            Self::OpenShort => "ABRIR SHORT",
        }
    }
}

impl From<PatternDirection> for TradeAction {
    fn from(direction: PatternDirection) -> Self {
        match direction {
            PatternDirection::Bullish => Self::OpenLong,
            PatternDirection::Bearish => Self::OpenShort,
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 패턴 표시 이모지.
pub fn pattern_emoji(pattern_type: PatternType) -> &'static str {
    match pattern_type {
        PatternType::Hammer => "🔨",
        PatternType::ShootingStar => "⭐",
        PatternType::EngulfingBullish => "📈",
        PatternType::EngulfingBearish => "📉",
        PatternType::DojiDragonfly => "🐉",
        PatternType::DojiGravestone => "🪦",
    }
}

/// 패턴 표시 이름.
pub fn pattern_display_name(pattern_type: PatternType) -> &'static str {
    match pattern_type {
        PatternType::Hammer => "Hammer",
        PatternType::ShootingStar => "Shooting Star",
        PatternType::EngulfingBullish => "Bullish Engulfing",
        PatternType::EngulfingBearish => "Bearish Engulfing",
        PatternType::DojiDragonfly => "Dragonfly Doji",
        PatternType::DojiGravestone => "Gravestone Doji",
    }
}

/// 천 단위 구분 기호와 소수점 2자리로 포맷합니다 (`1,234.50`).
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// 출처 종류를 단어별 대문자 표기로 바꿉니다 (`Volume Profile Dynamic`).
fn source_display_name(source_type: ReferenceSourceType) -> String {
    source_type
        .as_str()
        .split('_')
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// 리젝션 패턴 상세 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAlertData {
    pub pattern_type: PatternType,
    pub confidence: f64,
    pub price: f64,
    pub near_levels: Vec<ReferenceLevel>,
    pub metrics: PatternMetrics,
    pub candle: Candle,
    pub context_scores: BTreeMap<String, f64>,
}

/// 리젝션 패턴 알림 페이로드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAlertPayload {
    /// 봇 실행용 단순 메시지
    pub message: String,
    /// 캔들 시각 (표시 오프셋 적용)
    pub timestamp: String,
    pub symbol: String,
    pub action: TradeAction,
    pub price: f64,
    pub confidence: f64,
    pub interval: String,
    /// 알림 종류 (`REJECTION_PATTERN_ALERT`)
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: AlertSeverity,
    /// 1(높음) - 3(낮음)
    pub priority: u8,
    pub title: String,
    pub description: String,
    pub data: PatternAlertData,
    /// 사용자 설정 (없으면 빈 객체)
    pub user_config: Value,
}

impl PatternAlertPayload {
    /// 감지된 패턴으로 페이로드를 구성합니다.
    pub fn new(
        symbol: &str,
        interval: &str,
        pattern: &RejectionPattern,
        utc_offset_hours: i32,
    ) -> Self {
        let pattern_type = pattern.pattern_type;
        let action = TradeAction::from(pattern_type.direction());
        let severity = AlertSeverity::from_confidence(pattern.confidence);
        let timestamp = format_millis(pattern.timestamp, utc_offset_hours, ALERT_TIME_FORMAT);

        Self {
            message: format!("[{}] [{}] {} {:.2}", timestamp, symbol, action, pattern.price),
            timestamp,
            symbol: symbol.to_string(),
            action,
            price: pattern.price,
            confidence: pattern.confidence,
            interval: interval.to_string(),
            alert_type: PATTERN_ALERT_TYPE.to_string(),
            severity,
            priority: severity.priority(),
            title: format!(
                "{} {} | {} - {}",
                pattern_emoji(pattern_type),
                symbol,
                interval,
                pattern_display_name(pattern_type)
            ),
            description: describe_pattern(pattern),
            data: PatternAlertData {
                pattern_type,
                confidence: pattern.confidence,
                price: pattern.price,
                near_levels: pattern.near_levels.clone(),
                metrics: pattern.metrics,
                candle: pattern.candle,
                context_scores: pattern.context_scores.clone(),
            },
            user_config: Value::Object(Default::default()),
        }
    }

    /// 사용자 설정을 첨부합니다.
    pub fn with_user_config(mut self, user_config: Value) -> Self {
        self.user_config = user_config;
        self
    }
}

fn describe_pattern(pattern: &RejectionPattern) -> String {
    let name = pattern_display_name(pattern.pattern_type);
    let mut lines = vec![
        format!("{} detected @ ${}", name, format_price(pattern.price)),
        format!("Confidence: {:.1}%", pattern.confidence),
    ];

    if !pattern.near_levels.is_empty() {
        lines.push(format!("Near {} key level(s):", pattern.near_levels.len()));
        for level in pattern.near_levels.iter().take(MAX_DESCRIBED_LEVELS) {
            let distance_pct = level.distance_ratio(pattern.price) * 100.0;
            lines.push(format!(
                "  • {} @ ${} ({:.2}% away) - {}",
                level.level_type,
                format_price(level.price),
                distance_pct,
                source_display_name(level.source_type)
            ));
        }
    }

    lines.push(format!(
        "Pattern Quality: {:.2} | Volume: {:.2}",
        pattern.metrics.pattern_quality, pattern.metrics.volume_score
    ));

    lines.join("\n")
}

/// 레벨 근접 상세 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelAlertData {
    /// 현재가
    pub price: f64,
    pub level_price: f64,
    pub level_type: LevelType,
    pub strength: f64,
    pub touches: usize,
    /// 레벨 대비 거리 (%)
    pub distance: f64,
}

/// 레벨 근접 알림 페이로드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelAlertPayload {
    pub indicator_type: String,
    pub severity: AlertSeverity,
    pub priority: u8,
    pub icon: String,
    pub title: String,
    pub symbol: String,
    pub interval: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub description: String,
    /// 감지 시각 (표시 오프셋 적용)
    pub timestamp: String,
    pub data: LevelAlertData,
}

impl LevelAlertPayload {
    /// 근접 알림으로 페이로드를 구성합니다.
    pub fn new(
        alert: &LevelProximityAlert,
        interval: &str,
        detected_at: DateTime<Utc>,
        utc_offset_hours: i32,
    ) -> Self {
        let (icon, side) = match alert.level_type {
            LevelType::Resistance => ("🔴", "Resistance"),
            LevelType::Support => ("🟢", "Support"),
        };

        Self {
            indicator_type: LEVEL_INDICATOR_NAME.to_string(),
            severity: alert.severity,
            priority: alert.severity.priority(),
            icon: icon.to_string(),
            title: format!("{} approaching {}", alert.symbol, side),
            symbol: alert.symbol.clone(),
            interval: interval.to_string(),
            alert_type: LEVEL_ALERT_TYPE.to_string(),
            description: format!(
                "Price ${:.2} is {:.2}% from {} level at ${:.2}\nStrength: {:.1}/10 • Touches: {}x",
                alert.current_price,
                alert.distance_pct,
                alert.level_type,
                alert.level_price,
                alert.strength,
                alert.touches
            ),
            timestamp: format_millis(
                detected_at.timestamp_millis(),
                utc_offset_hours,
                ALERT_TIME_FORMAT,
            ),
            data: LevelAlertData {
                price: alert.current_price,
                level_price: alert.level_price,
                level_type: alert.level_type,
                strength: alert.strength,
                touches: alert.touches,
                distance: alert.distance_pct,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use watchlist_analytics::ReferenceLevelType;

    fn hammer_pattern(confidence: f64) -> RejectionPattern {
        let level = ReferenceLevel::new(
            45_000.0,
            ReferenceLevelType::Poc,
            "vp1",
            ReferenceSourceType::VolumeProfileDynamic,
            0.8,
        )
        .unwrap();
        let mut context_scores = BTreeMap::new();
        context_scores.insert("VOLUME_PROFILE_DYNAMIC_vp1".to_string(), 72.5);

        RejectionPattern {
            // 2024-01-01 15:00:00 UTC
            timestamp: 1_704_121_200_000,
            pattern_type: PatternType::Hammer,
            confidence,
            price: 45_000.5,
            candle: Candle::new(1_704_121_200_000, 45_010.0, 45_010.0, 44_500.0, 45_000.5, 12.0)
                .unwrap(),
            near_levels: vec![level],
            context_scores,
            metrics: PatternMetrics {
                pattern_quality: 0.954,
                proximity_score: 0.8,
                near_levels_count: 1,
                volume_score: 0.6,
                size_score: 0.8,
            },
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(45_000.5), "45,000.50");
        assert_eq!(format_price(999.994), "999.99");
        assert_eq!(format_price(1_234_567.0), "1,234,567.00");
        assert_eq!(format_price(-1_000.0), "-1,000.00");
        assert_eq!(format_price(0.5), "0.50");
    }

    #[test]
    fn test_pattern_payload_bot_message() {
        let payload = PatternAlertPayload::new("BTCUSDT", "15", &hammer_pattern(85.0), -5);

        assert_eq!(payload.timestamp, "2024-01-01 10:00:00");
        assert_eq!(payload.message, "[2024-01-01 10:00:00] [BTCUSDT] ABRIR LONG 45000.50");
        assert_eq!(payload.action, TradeAction::OpenLong);
        assert_eq!(payload.severity, AlertSeverity::High);
        assert_eq!(payload.priority, 1);
        assert_eq!(payload.title, "🔨 BTCUSDT | 15 - Hammer");
    }

    #[test]
    fn test_pattern_payload_description() {
        let payload = PatternAlertPayload::new("BTCUSDT", "15", &hammer_pattern(70.0), 0);
        let lines: Vec<&str> = payload.description.lines().collect();

        assert_eq!(lines[0], "Hammer detected @ $45,000.50");
        assert_eq!(lines[1], "Confidence: 70.0%");
        assert_eq!(lines[2], "Near 1 key level(s):");
        assert_eq!(lines[3], "  • POC @ $45,000.00 (0.00% away) - Volume Profile Dynamic");
        assert_eq!(lines[4], "Pattern Quality: 0.95 | Volume: 0.60");
        assert_eq!(payload.severity, AlertSeverity::Medium);
    }

    #[test]
    fn test_pattern_payload_wire_shape() {
        let payload = PatternAlertPayload::new("ETHUSDT", "60", &hammer_pattern(61.0), 0)
            .with_user_config(serde_json::json!({"minConfidence": 60}));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["type"], "REJECTION_PATTERN_ALERT");
        assert_eq!(json["action"], "ABRIR LONG");
        assert_eq!(json["severity"], "LOW");
        assert_eq!(json["priority"], 3);
        assert_eq!(json["data"]["patternType"], "HAMMER");
        assert_eq!(json["data"]["nearLevels"][0]["sourceId"], "vp1");
        assert_eq!(json["data"]["contextScores"]["VOLUME_PROFILE_DYNAMIC_vp1"], 72.5);
        assert_eq!(json["data"]["metrics"]["near_levels_count"], 1);
        assert_eq!(json["userConfig"]["minConfidence"], 60);
    }

    #[test]
    fn test_bearish_patterns_open_short() {
        for pattern_type in [
            PatternType::ShootingStar,
            PatternType::EngulfingBearish,
            PatternType::DojiGravestone,
        ] {
            assert_eq!(TradeAction::from(pattern_type.direction()), TradeAction::OpenShort);
        }
        assert_eq!(pattern_emoji(PatternType::DojiDragonfly), "🐉");
        assert_eq!(pattern_display_name(PatternType::EngulfingBearish), "Bearish Engulfing");
    }

    #[test]
    fn test_level_payload() {
        let alert = LevelProximityAlert {
            symbol: "BTCUSDT".to_string(),
            level_type: LevelType::Resistance,
            level_price: 100.2,
            current_price: 100.0,
            strength: 8.5,
            touches: 3,
            distance_pct: 0.1996,
            severity: AlertSeverity::High,
        };
        let detected_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let payload = LevelAlertPayload::new(&alert, "15", detected_at, 0);

        assert_eq!(payload.icon, "🔴");
        assert_eq!(payload.title, "BTCUSDT approaching Resistance");
        assert_eq!(
            payload.description,
            "Price $100.00 is 0.20% from resistance level at $100.20\nStrength: 8.5/10 • Touches: 3x"
        );
        assert_eq!(payload.timestamp, "2024-01-01 12:00:00");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "S/R Level");
        assert_eq!(json["indicatorType"], "Support & Resistance");
        assert_eq!(json["data"]["levelType"], "resistance");
        assert_eq!(json["data"]["levelPrice"], 100.2);
    }
}
