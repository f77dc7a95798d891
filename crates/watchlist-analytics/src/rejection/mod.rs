//! 리젝션 캔들 패턴 감지.
//!
//! 캔들마다 여섯 가지 형태(망치형, 유성형, 강세/약세 장악형, 잠자리/비석 도지)를
//! 판정하고, 외부 지표가 제공한 참조 레벨(POC/VAH/VAL, 레인지 상/하단)에 근접한
//! 후보만 다요소 신뢰도와 함께 내보냅니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use watchlist_analytics::rejection::{
//!     extract_reference_levels, RejectionConfig, RejectionPatternDetector,
//! };
//!
//! let levels = extract_reference_levels(&contexts);
//! let detector = RejectionPatternDetector::new(RejectionConfig::default())?;
//! for pattern in detector.detect(&candles, &levels)? {
//!     println!("{} @ {} ({:.1}%)", pattern.pattern_type, pattern.price, pattern.confidence);
//! }
//! ```

pub mod confidence;
pub mod config;
pub mod detector;
pub mod patterns;
pub mod reference;

pub use confidence::{step_score, ConfidenceInputs, PatternMetrics};
pub use config::{
    PatternToggles, RejectionConfig, RejectionFilters, TogglePatternConfig, VolumeZScoreFilter,
    WickPatternConfig,
};
pub use detector::{detect_rejection_patterns, RejectionPattern, RejectionPatternDetector};
pub use patterns::{PatternDirection, PatternType};
pub use reference::{
    extract_reference_levels, ReferenceContext, ReferenceLevel, ReferenceLevelType,
    ReferenceSourceType,
};
