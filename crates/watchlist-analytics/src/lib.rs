//! 마켓 워치리스트 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 롤링 통계와 거래량 델타/CVD
//! - 거래량 기반 지지/저항 레벨 및 횡보 구간
//! - 참조 레벨로 검증하는 리젝션 캔들 패턴
//! - 볼륨 프로파일 (POC, Value Area)
//! - 레벨 근접 알림 판정
//!
//! 모든 계산은 입력 캔들 시계열에 대한 순수 함수이며 호출 간 상태를 갖지 않습니다.
//!
//! # Re-exports
//!
//! - [`indicators`]: StatisticsWindow, VolumeDeltaIndicator
//! - [`support_resistance`]: SupportResistanceAnalyzer 및 파이프라인 구성 요소
//! - [`rejection`]: RejectionPatternDetector, 참조 레벨
//! - [`volume_profile`]: VolumeProfileCalculator
//! - [`proximity`]: LevelProximityScanner

pub mod indicators;
pub mod proximity;
pub mod rejection;
pub mod support_resistance;
pub mod volume_profile;

// Indicators 모듈 re-exports
pub use indicators::{
    IndicatorError, IndicatorResult, StatisticsWindow, VolumeDeltaIndicator, VolumeDeltaPoint,
};

// 지지/저항 re-exports
pub use support_resistance::{
    compute_support_resistance, ConsolidationZone, Level, LevelClusterer, LevelScorer, LevelStatus,
    LevelType, Pivot, PivotDetector, SupportResistanceAnalyzer, SupportResistanceConfig,
    SupportResistanceReport, VolumeMethod, VolumeStats, ZoneDetector,
};

// 리젝션 패턴 re-exports
pub use rejection::{
    detect_rejection_patterns, extract_reference_levels, PatternDirection, PatternMetrics,
    PatternType, ReferenceContext, ReferenceLevel, ReferenceLevelType, ReferenceSourceType,
    RejectionConfig, RejectionPattern, RejectionPatternDetector,
};

// 볼륨 프로파일 re-exports
pub use volume_profile::{calculate_volume_profile, PriceBucket, VolumeProfile, VolumeProfileCalculator};

// 근접 알림 re-exports
pub use proximity::{LevelProximityAlert, LevelProximityScanner};
