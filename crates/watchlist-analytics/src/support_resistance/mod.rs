//! 거래량 기반 지지/저항 분석.
//!
//! 파이프라인:
//! 1. 거래량 유의성 계산 (`zscore`: 롤링 Z-점수, `simple`: 롤링 평균 대비 비율)
//! 2. 피봇 감지 (`zscore` 방식은 임계값 미만 캔들 제외)
//! 3. 방향별 피봇 클러스터링 → 최소 터치 수 필터
//! 4. 강도/상태 산정 → 방향별 상위 `maxLevels`개 유지
//! 5. 유지된 레벨 전체에서 횡보 구간 감지
//!
//! # 사용 예시
//!
//! ```ignore
//! use watchlist_analytics::support_resistance::{SupportResistanceAnalyzer, SupportResistanceConfig};
//!
//! let analyzer = SupportResistanceAnalyzer::new(SupportResistanceConfig::default())?;
//! let report = analyzer.analyze(&candles)?;
//! println!("저항 {}개, 지지 {}개", report.resistances.len(), report.supports.len());
//! ```

pub mod clustering;
pub mod pivots;
pub mod scoring;
pub mod zones;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use watchlist_core::{validate_series, Candle};

use crate::indicators::{IndicatorError, IndicatorResult, StatisticsWindow};

pub use clustering::{Level, LevelClusterer, LevelStatus};
pub use pivots::{LevelType, Pivot, PivotDetector};
pub use scoring::LevelScorer;
pub use zones::{ConsolidationZone, ZoneDetector};

/// 거래량 유의성 계산 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeMethod {
    /// 롤링 Z-점수, 임계값 미만 캔들은 피봇 후보에서 제외
    #[default]
    Zscore,
    /// 롤링 평균 대비 비율, 필터 없음
    Simple,
}

impl std::str::FromStr for VolumeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zscore" => Ok(Self::Zscore),
            "simple" => Ok(Self::Simple),
            _ => Err(format!("Unknown volume method: {}", s)),
        }
    }
}

/// 지지/저항 분석 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupportResistanceConfig {
    /// 거래량 유의성 방식
    pub volume_method: VolumeMethod,
    /// 피봇 후보 Z-점수 임계값
    pub z_score_threshold: f64,
    /// 롤링 통계 기간
    pub z_score_period: usize,
    /// 피봇 왼쪽 비교 캔들 수
    pub left_bars: usize,
    /// 피봇 오른쪽 비교 캔들 수
    pub right_bars: usize,
    /// 레벨 최소 터치 수
    pub min_touches: usize,
    /// 클러스터 허용 거리 (%)
    pub cluster_distance_pct: f64,
    /// 방향별 최대 레벨 수
    pub max_levels: usize,
    /// 횡보 구간 최소 레벨 수
    pub zone_min_levels: usize,
    /// 횡보 구간 최대 폭 (%)
    pub zone_max_distance_pct: f64,
}

impl Default for SupportResistanceConfig {
    fn default() -> Self {
        Self {
            volume_method: VolumeMethod::Zscore,
            z_score_threshold: 1.5,
            z_score_period: 50,
            left_bars: 15,
            right_bars: 15,
            min_touches: 2,
            cluster_distance_pct: 0.5,
            max_levels: 20,
            zone_min_levels: 3,
            zone_max_distance_pct: 2.0,
        }
    }
}

impl SupportResistanceConfig {
    /// 설정 값 검증.
    pub fn validate(&self) -> IndicatorResult<()> {
        if self.z_score_period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "zScorePeriod는 1 이상이어야 합니다".to_string(),
            ));
        }
        if !self.z_score_threshold.is_finite() {
            return Err(IndicatorError::InvalidParameter(
                "zScoreThreshold는 유한한 값이어야 합니다".to_string(),
            ));
        }
        if !(self.cluster_distance_pct.is_finite() && self.cluster_distance_pct >= 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "clusterDistancePct는 0 이상이어야 합니다: {}",
                self.cluster_distance_pct
            )));
        }
        if !(self.zone_max_distance_pct.is_finite() && self.zone_max_distance_pct >= 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "zoneMaxDistancePct는 0 이상이어야 합니다: {}",
                self.zone_max_distance_pct
            )));
        }
        Ok(())
    }
}

/// 거래량 통계 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeStats {
    /// 사용된 방식
    pub method: VolumeMethod,
    /// 롤링 기간
    pub period: usize,
    /// 마지막 윈도우의 평균 거래량
    pub average_volume: f64,
    /// 마지막 캔들 거래량
    pub current_volume: f64,
    /// 마지막 캔들 거래량 Z-점수
    pub current_z_score: f64,
    /// Z-점수가 임계값 이상인 캔들 수
    pub significant_candles: usize,
}

/// 지지/저항 분석 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResistanceReport {
    /// 저항 레벨 (가격 오름차순)
    pub resistances: Vec<Level>,
    /// 지지 레벨 (가격 오름차순)
    pub supports: Vec<Level>,
    /// 횡보 구간 (중심 가격 오름차순)
    pub consolidation_zones: Vec<ConsolidationZone>,
    /// 마지막 종가 (빈 입력이면 없음)
    pub current_price: Option<f64>,
    /// 거래량 통계
    pub volume_stats: VolumeStats,
}

/// 지지/저항 분석기.
///
/// 호출 간 상태를 갖지 않으므로 여러 요청에서 공유해도 안전합니다.
#[derive(Debug, Clone)]
pub struct SupportResistanceAnalyzer {
    config: SupportResistanceConfig,
    window: StatisticsWindow,
}

impl SupportResistanceAnalyzer {
    /// 검증된 설정으로 분석기를 생성합니다.
    pub fn new(config: SupportResistanceConfig) -> IndicatorResult<Self> {
        config.validate()?;
        let window = StatisticsWindow::new(config.z_score_period)?;
        Ok(Self { config, window })
    }

    /// 설정.
    pub fn config(&self) -> &SupportResistanceConfig {
        &self.config
    }

    /// 마지막 캔들 시각을 기준으로 분석합니다.
    pub fn analyze(&self, candles: &[Candle]) -> IndicatorResult<SupportResistanceReport> {
        let now_ms = candles.last().map(|c| c.timestamp).unwrap_or_default();
        self.analyze_at(candles, now_ms)
    }

    /// 지정한 기준 시각(ms)으로 강도를 계산하여 분석합니다.
    pub fn analyze_at(
        &self,
        candles: &[Candle],
        now_ms: i64,
    ) -> IndicatorResult<SupportResistanceReport> {
        let mut report = SupportResistanceReport {
            volume_stats: VolumeStats {
                method: self.config.volume_method,
                period: self.config.z_score_period,
                ..Default::default()
            },
            ..Default::default()
        };

        let Some(last) = candles.last() else {
            return Ok(report);
        };
        validate_series(candles)?;

        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        let zscores = self.window.zscores(&volumes);
        let (significance, gate) = match self.config.volume_method {
            VolumeMethod::Zscore => (zscores.clone(), Some(self.config.z_score_threshold)),
            VolumeMethod::Simple => (self.window.ratios_to_mean(&volumes), None),
        };

        report.volume_stats = self.volume_stats(&volumes, &zscores);
        report.current_price = Some(last.close);

        let pivots = PivotDetector::new(self.config.left_bars, self.config.right_bars)
            .detect(candles, &significance, gate);

        let mut levels = LevelClusterer::new(self.config.cluster_distance_pct).cluster(&pivots);
        levels.retain(|l| l.touches >= self.config.min_touches);

        let scorer = LevelScorer::new();
        for level in &mut levels {
            scorer.score(level, now_ms, last.close, candles);
        }

        let (resistances, supports): (Vec<Level>, Vec<Level>) = levels
            .into_iter()
            .partition(|l| l.level_type == LevelType::Resistance);
        report.resistances = self.strongest(resistances);
        report.supports = self.strongest(supports);

        let kept: Vec<Level> = report
            .resistances
            .iter()
            .chain(&report.supports)
            .cloned()
            .collect();
        report.consolidation_zones =
            ZoneDetector::new(self.config.zone_min_levels, self.config.zone_max_distance_pct)
                .detect(&kept);

        info!(
            candles = candles.len(),
            pivots = pivots.len(),
            resistances = report.resistances.len(),
            supports = report.supports.len(),
            zones = report.consolidation_zones.len(),
            "Support/resistance analysis complete"
        );

        Ok(report)
    }

    /// 강도 상위 `max_levels`개를 남기고 가격 오름차순으로 정렬합니다.
    fn strongest(&self, mut levels: Vec<Level>) -> Vec<Level> {
        levels.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        if levels.len() > self.config.max_levels {
            debug!(
                dropped = levels.len() - self.config.max_levels,
                "Truncating weaker levels"
            );
        }
        levels.truncate(self.config.max_levels);
        levels.sort_by(|a, b| a.price.total_cmp(&b.price));
        levels
    }

    fn volume_stats(&self, volumes: &[f64], zscores: &[f64]) -> VolumeStats {
        VolumeStats {
            method: self.config.volume_method,
            period: self.config.z_score_period,
            average_volume: self.window.means(volumes).last().copied().unwrap_or_default(),
            current_volume: volumes.last().copied().unwrap_or_default(),
            current_z_score: zscores.last().copied().unwrap_or_default(),
            significant_candles: zscores
                .iter()
                .filter(|&&z| z >= self.config.z_score_threshold)
                .count(),
        }
    }
}

/// 간편 함수: 설정으로 지지/저항 분석을 수행합니다.
pub fn compute_support_resistance(
    candles: &[Candle],
    config: &SupportResistanceConfig,
) -> IndicatorResult<SupportResistanceReport> {
    SupportResistanceAnalyzer::new(config.clone())?.analyze(candles)
}
