//! 참조 레벨과 참조 컨텍스트.
//!
//! 참조 레벨은 다른 지표(볼륨 프로파일, 레인지 감지)에서 계산된 핵심 가격으로,
//! 리젝션 패턴 후보를 검증하는 데 쓰입니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::indicators::{IndicatorError, IndicatorResult};

/// 참조 레벨 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReferenceLevelType {
    /// Point of Control
    Poc,
    /// Value Area High
    Vah,
    /// Value Area Low
    Val,
    /// 레인지 상단
    Top,
    /// 레인지 하단
    Bottom,
    /// 레인지 중간
    Middle,
}

impl ReferenceLevelType {
    /// 와이어 이름 (`POC`, `VAH`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poc => "POC",
            Self::Vah => "VAH",
            Self::Val => "VAL",
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::Middle => "MIDDLE",
        }
    }

    /// 컨텍스트 메타데이터 키 (소문자 와이어 이름).
    pub fn metadata_key(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl std::fmt::Display for ReferenceLevelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 참조 레벨 출처 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceSourceType {
    /// 동적(롤링) 볼륨 프로파일
    VolumeProfileDynamic,
    /// 고정 구간 볼륨 프로파일
    VolumeProfileFixed,
    /// 레인지 감지기
    RangeDetector,
    /// 지원하지 않는 출처 (추출 시 무시)
    #[serde(other)]
    Unsupported,
}

impl ReferenceSourceType {
    /// 와이어 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VolumeProfileDynamic => "VOLUME_PROFILE_DYNAMIC",
            Self::VolumeProfileFixed => "VOLUME_PROFILE_FIXED",
            Self::RangeDetector => "RANGE_DETECTOR",
            Self::Unsupported => "UNSUPPORTED",
        }
    }
}

impl std::fmt::Display for ReferenceSourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 외부 지표가 제공하는 핵심 가격 레벨.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawReferenceLevel")]
pub struct ReferenceLevel {
    /// 가격
    pub price: f64,
    /// 레벨 종류
    #[serde(rename = "type")]
    pub level_type: ReferenceLevelType,
    /// 출처 종류
    pub source_type: ReferenceSourceType,
    /// 출처 ID
    pub source_id: String,
    /// 신뢰도 가중치 (0.0 - 1.0)
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReferenceLevel {
    price: f64,
    #[serde(rename = "type")]
    level_type: ReferenceLevelType,
    source_type: ReferenceSourceType,
    source_id: String,
    weight: f64,
}

impl TryFrom<RawReferenceLevel> for ReferenceLevel {
    type Error = IndicatorError;

    fn try_from(raw: RawReferenceLevel) -> Result<Self, Self::Error> {
        ReferenceLevel::new(
            raw.price,
            raw.level_type,
            raw.source_id,
            raw.source_type,
            raw.weight,
        )
    }
}

impl ReferenceLevel {
    /// 새 참조 레벨 생성. 가격은 양의 유한값, 가중치는 `[0, 1]`이어야 합니다.
    pub fn new(
        price: f64,
        level_type: ReferenceLevelType,
        source_id: impl Into<String>,
        source_type: ReferenceSourceType,
        weight: f64,
    ) -> IndicatorResult<Self> {
        if !(price.is_finite() && price > 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "참조 레벨 가격은 양수여야 합니다: {}",
                price
            )));
        }
        if !(0.0..=1.0).contains(&weight) {
            return Err(IndicatorError::InvalidParameter(format!(
                "참조 레벨 가중치는 0과 1 사이여야 합니다: {}",
                weight
            )));
        }

        Ok(Self {
            price,
            level_type,
            source_type,
            source_id: source_id.into(),
            weight,
        })
    }

    /// 출처별 점수 집계 키 (`{sourceType}_{sourceId}`).
    pub fn source_key(&self) -> String {
        format!("{}_{}", self.source_type, self.source_id)
    }

    /// 가격 대비 거리 비율 (`|price - level| / price`).
    pub fn distance_ratio(&self, price: f64) -> f64 {
        (price - self.price).abs() / price
    }
}

fn default_weight() -> f64 {
    0.5
}

fn default_vp_levels() -> Vec<ReferenceLevelType> {
    vec![
        ReferenceLevelType::Poc,
        ReferenceLevelType::Vah,
        ReferenceLevelType::Val,
    ]
}

/// 사용자가 선택한 참조 컨텍스트 (활성 지표 하나).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceContext {
    /// 컨텍스트 ID
    pub id: String,
    /// 출처 종류
    #[serde(rename = "type")]
    pub source_type: ReferenceSourceType,
    /// 활성화 여부
    #[serde(default)]
    pub enabled: bool,
    /// 가중치
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// 볼륨 프로파일에서 사용할 레벨 종류
    #[serde(default = "default_vp_levels")]
    pub levels: Vec<ReferenceLevelType>,
    /// 레벨 값 (`poc`, `vah`, `val`, `top`, `bottom`)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ReferenceContext {
    /// 볼륨 프로파일 값으로 컨텍스트를 생성합니다.
    pub fn volume_profile(
        id: impl Into<String>,
        source_type: ReferenceSourceType,
        weight: f64,
        poc: f64,
        vah: f64,
        val: f64,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert("poc".to_string(), Value::from(poc));
        metadata.insert("vah".to_string(), Value::from(vah));
        metadata.insert("val".to_string(), Value::from(val));

        Self {
            id: id.into(),
            source_type,
            enabled: true,
            weight,
            levels: default_vp_levels(),
            metadata,
        }
    }

    /// 레인지 상/하단으로 컨텍스트를 생성합니다.
    pub fn range(id: impl Into<String>, weight: f64, top: f64, bottom: f64) -> Self {
        let mut metadata = Map::new();
        metadata.insert("top".to_string(), Value::from(top));
        metadata.insert("bottom".to_string(), Value::from(bottom));

        Self {
            id: id.into(),
            source_type: ReferenceSourceType::RangeDetector,
            enabled: true,
            weight,
            levels: Vec::new(),
            metadata,
        }
    }

    fn metadata_f64(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn push_level(
        &self,
        out: &mut Vec<ReferenceLevel>,
        price: f64,
        level_type: ReferenceLevelType,
        weight: f64,
    ) {
        match ReferenceLevel::new(price, level_type, self.id.clone(), self.source_type, weight) {
            Ok(level) => out.push(level),
            Err(e) => warn!(context = %self.id, level = %level_type, error = %e, "Skipping invalid reference level"),
        }
    }

    /// 이 컨텍스트의 참조 레벨을 추출합니다. 비활성 컨텍스트는 빈 목록입니다.
    pub fn reference_levels(&self) -> Vec<ReferenceLevel> {
        let mut levels = Vec::new();
        if !self.enabled {
            return levels;
        }

        match self.source_type {
            ReferenceSourceType::VolumeProfileDynamic | ReferenceSourceType::VolumeProfileFixed => {
                for &level_type in &self.levels {
                    if let Some(price) = self.metadata_f64(&level_type.metadata_key()) {
                        self.push_level(&mut levels, price, level_type, self.weight);
                    }
                }
            }
            ReferenceSourceType::RangeDetector => {
                if let (Some(top), Some(bottom)) =
                    (self.metadata_f64("top"), self.metadata_f64("bottom"))
                {
                    self.push_level(&mut levels, top, ReferenceLevelType::Top, self.weight);
                    self.push_level(&mut levels, bottom, ReferenceLevelType::Bottom, self.weight);
                    // 중간선은 가중치를 낮춤
                    self.push_level(
                        &mut levels,
                        (top + bottom) / 2.0,
                        ReferenceLevelType::Middle,
                        self.weight * 0.7,
                    );
                }
            }
            ReferenceSourceType::Unsupported => {
                debug!(context = %self.id, "Ignoring unsupported reference context type");
            }
        }

        levels
    }
}

/// 활성 컨텍스트들에서 참조 레벨을 모두 추출합니다.
pub fn extract_reference_levels(contexts: &[ReferenceContext]) -> Vec<ReferenceLevel> {
    let levels: Vec<ReferenceLevel> = contexts
        .iter()
        .flat_map(ReferenceContext::reference_levels)
        .collect();

    debug!(
        contexts = contexts.len(),
        active = contexts.iter().filter(|c| c.enabled).count(),
        levels = levels.len(),
        "Reference levels extracted"
    );

    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_level_validation() {
        assert!(ReferenceLevel::new(100.0, ReferenceLevelType::Poc, "a", ReferenceSourceType::VolumeProfileFixed, 0.5).is_ok());
        assert!(ReferenceLevel::new(-1.0, ReferenceLevelType::Poc, "a", ReferenceSourceType::VolumeProfileFixed, 0.5).is_err());
        assert!(ReferenceLevel::new(100.0, ReferenceLevelType::Poc, "a", ReferenceSourceType::VolumeProfileFixed, 1.5).is_err());
        assert!(ReferenceLevel::new(f64::NAN, ReferenceLevelType::Poc, "a", ReferenceSourceType::VolumeProfileFixed, 0.5).is_err());
    }

    #[test]
    fn test_volume_profile_extraction_uses_requested_levels() {
        let json = r#"{
            "id": "vp-1",
            "type": "VOLUME_PROFILE_DYNAMIC",
            "enabled": true,
            "weight": 0.8,
            "levels": ["POC", "VAL"],
            "metadata": {"poc": 100.0, "vah": "110.5", "val": "95"}
        }"#;
        let context: ReferenceContext = serde_json::from_str(json).unwrap();
        let levels = context.reference_levels();

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].level_type, ReferenceLevelType::Poc);
        assert_eq!(levels[1].level_type, ReferenceLevelType::Val);
        assert_eq!(levels[1].price, 95.0);
        assert_eq!(levels[0].weight, 0.8);
        assert_eq!(levels[0].source_key(), "VOLUME_PROFILE_DYNAMIC_vp-1");
    }

    #[test]
    fn test_range_extraction_adds_weighted_middle() {
        let context = ReferenceContext::range("r1", 1.0, 120.0, 100.0);
        let levels = context.reference_levels();

        assert_eq!(levels.len(), 3);
        let middle = &levels[2];
        assert_eq!(middle.level_type, ReferenceLevelType::Middle);
        assert_eq!(middle.price, 110.0);
        assert!((middle.weight - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_disabled_and_incomplete_contexts() {
        let mut context = ReferenceContext::range("r1", 0.5, 120.0, 100.0);
        context.enabled = false;
        assert!(context.reference_levels().is_empty());

        let json = r#"{"id":"r2","type":"RANGE_DETECTOR","enabled":true,"metadata":{"top":120}}"#;
        let partial: ReferenceContext = serde_json::from_str(json).unwrap();
        assert_eq!(partial.weight, 0.5);
        assert!(partial.reference_levels().is_empty());
    }

    #[test]
    fn test_unknown_context_type_is_ignored() {
        let json = r#"[
            {"id":"x","type":"FIBONACCI","enabled":true,"metadata":{"top":1}},
            {"id":"vp","type":"VOLUME_PROFILE_FIXED","enabled":true,"metadata":{"poc":50}}
        ]"#;
        let contexts: Vec<ReferenceContext> = serde_json::from_str(json).unwrap();
        let levels = extract_reference_levels(&contexts);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].price, 50.0);
    }

    #[test]
    fn test_invalid_levels_are_skipped() {
        let context = ReferenceContext::volume_profile(
            "vp",
            ReferenceSourceType::VolumeProfileFixed,
            0.5,
            0.0,
            110.0,
            90.0,
        );
        let levels = context.reference_levels();
        assert_eq!(levels.len(), 2);
        assert!(levels.iter().all(|l| l.level_type != ReferenceLevelType::Poc));
    }

    #[test]
    fn test_reference_level_wire_format() {
        let level = ReferenceLevel::new(
            100.0,
            ReferenceLevelType::Vah,
            "vp",
            ReferenceSourceType::VolumeProfileFixed,
            0.5,
        )
        .unwrap();
        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json["type"], "VAH");
        assert_eq!(json["sourceType"], "VOLUME_PROFILE_FIXED");
        assert_eq!(json["sourceId"], "vp");

        let bad = r#"{"price":100,"type":"POC","sourceType":"RANGE_DETECTOR","sourceId":"r","weight":2}"#;
        assert!(serde_json::from_str::<ReferenceLevel>(bad).is_err());
    }
}
