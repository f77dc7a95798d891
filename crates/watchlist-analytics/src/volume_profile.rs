//! 볼륨 프로파일 (매물대) 계산.
//!
//! 캔들 고가-저가 범위에 거래량을 균등 분배하여 가격 구간별 거래량을 집계합니다.
//!
//! # 주요 지표
//!
//! - **POC (Point of Control)**: 최대 거래량이 집중된 가격 구간
//! - **Value Area**: 전체 거래량의 70%가 모인 가격 범위 (VAH/VAL)
//!
//! 계산된 POC/VAH/VAL은 리젝션 패턴 검증용 참조 레벨로 바로 쓸 수 있습니다.
//!
//! # 예시
//!
//! ```rust,ignore
//! use watchlist_analytics::volume_profile::VolumeProfileCalculator;
//! use watchlist_analytics::rejection::ReferenceSourceType;
//!
//! let profile = VolumeProfileCalculator::new(24).calculate(&candles)?;
//! let levels = profile.reference_levels("vp-24", ReferenceSourceType::VolumeProfileDynamic, 0.8);
//! ```

use serde::{Deserialize, Serialize};
use watchlist_core::Candle;

use crate::rejection::{ReferenceContext, ReferenceLevel, ReferenceSourceType};

/// 가격 구간별 거래량.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBucket {
    /// 구간 중심 가격
    pub price: f64,
    /// 구간 거래량
    pub volume: f64,
    /// 전체 거래량 대비 비율 (%)
    pub volume_pct: f64,
}

/// 볼륨 프로파일 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProfile {
    /// 가격 구간 (가격 오름차순)
    pub buckets: Vec<PriceBucket>,
    /// POC 가격
    pub poc: f64,
    /// POC 구간 인덱스
    pub poc_index: usize,
    /// Value Area High
    pub value_area_high: f64,
    /// Value Area Low
    pub value_area_low: f64,
    /// 전체 거래량
    pub total_volume: f64,
    /// 최저가
    pub price_low: f64,
    /// 최고가
    pub price_high: f64,
    /// 분석 캔들 수
    pub period: usize,
}

impl VolumeProfile {
    /// 이 프로파일을 볼륨 프로파일 참조 컨텍스트로 변환합니다.
    pub fn to_context(
        &self,
        id: impl Into<String>,
        source_type: ReferenceSourceType,
        weight: f64,
    ) -> ReferenceContext {
        ReferenceContext::volume_profile(
            id,
            source_type,
            weight,
            self.poc,
            self.value_area_high,
            self.value_area_low,
        )
    }

    /// POC/VAH/VAL 참조 레벨.
    pub fn reference_levels(
        &self,
        id: impl Into<String>,
        source_type: ReferenceSourceType,
        weight: f64,
    ) -> Vec<ReferenceLevel> {
        self.to_context(id, source_type, weight).reference_levels()
    }
}

/// 볼륨 프로파일 계산기.
#[derive(Debug, Clone, Copy)]
pub struct VolumeProfileCalculator {
    num_buckets: usize,
    value_area_ratio: f64,
}

impl Default for VolumeProfileCalculator {
    fn default() -> Self {
        Self::new(24)
    }
}

impl VolumeProfileCalculator {
    /// 새 계산기 생성. 구간 수는 5 - 200으로 보정됩니다.
    pub fn new(num_buckets: usize) -> Self {
        Self {
            num_buckets: num_buckets.clamp(5, 200),
            value_area_ratio: 0.7,
        }
    }

    /// Value Area 비율 설정 (0.5 - 0.9).
    pub fn with_value_area_ratio(mut self, ratio: f64) -> Self {
        self.value_area_ratio = ratio.clamp(0.5, 0.9);
        self
    }

    /// 볼륨 프로파일 계산. 캔들이 2개 미만이거나 가격/거래량 범위가 없으면 `None`.
    pub fn calculate(&self, candles: &[Candle]) -> Option<VolumeProfile> {
        if candles.len() < 2 {
            return None;
        }

        let price_low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let price_high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        if price_high <= price_low {
            return None;
        }

        let bucket_size = (price_high - price_low) / self.num_buckets as f64;
        let mut volumes = vec![0.0; self.num_buckets];
        let mut total_volume = 0.0;

        for candle in candles {
            if candle.range() <= 0.0 || candle.volume <= 0.0 {
                continue;
            }
            let start = self.bucket_index(candle.low, price_low, bucket_size);
            let end = self.bucket_index(candle.high, price_low, bucket_size);
            let share = candle.volume / (end - start + 1) as f64;
            for slot in &mut volumes[start..=end] {
                *slot += share;
            }
            total_volume += candle.volume;
        }

        if total_volume <= 0.0 {
            return None;
        }

        let buckets: Vec<PriceBucket> = volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| PriceBucket {
                price: price_low + bucket_size * (i as f64 + 0.5),
                volume,
                volume_pct: volume / total_volume * 100.0,
            })
            .collect();

        // 동률이면 낮은 가격 구간 우선
        let poc_index = buckets
            .iter()
            .enumerate()
            .fold(0, |best, (i, b)| if b.volume > buckets[best].volume { i } else { best });
        let (low_index, high_index) = self.value_area(&buckets, poc_index, total_volume);

        Some(VolumeProfile {
            poc: buckets[poc_index].price,
            poc_index,
            value_area_high: buckets[high_index].price,
            value_area_low: buckets[low_index].price,
            total_volume,
            price_low,
            price_high,
            period: candles.len(),
            buckets,
        })
    }

    fn bucket_index(&self, price: f64, price_low: f64, bucket_size: f64) -> usize {
        let index = ((price - price_low) / bucket_size).floor().max(0.0) as usize;
        index.min(self.num_buckets - 1)
    }

    /// POC에서 거래량이 큰 쪽으로 한 구간씩 넓혀 목표 비율에 도달하는 범위.
    fn value_area(&self, buckets: &[PriceBucket], poc_index: usize, total_volume: f64) -> (usize, usize) {
        let target = total_volume * self.value_area_ratio;
        let last = buckets.len() - 1;
        let mut included = buckets[poc_index].volume;
        let (mut low, mut high) = (poc_index, poc_index);

        while included < target && (low > 0 || high < last) {
            let below = if low > 0 { buckets[low - 1].volume } else { f64::NEG_INFINITY };
            let above = if high < last { buckets[high + 1].volume } else { f64::NEG_INFINITY };

            if below >= above {
                low -= 1;
                included += buckets[low].volume;
            } else {
                high += 1;
                included += buckets[high].volume;
            }
        }

        (low, high)
    }
}

/// 간편 함수: 캔들에서 볼륨 프로파일 계산.
pub fn calculate_volume_profile(candles: &[Candle], num_buckets: usize) -> Option<VolumeProfile> {
    VolumeProfileCalculator::new(num_buckets).calculate(candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rejection::ReferenceLevelType;

    fn sample_candles() -> Vec<Candle> {
        let rows = [
            (100.0, 110.0, 95.0, 105.0, 1000.0),
            (105.0, 115.0, 100.0, 112.0, 1500.0),
            (112.0, 120.0, 108.0, 118.0, 2000.0),
            (118.0, 122.0, 110.0, 115.0, 1800.0),
        ];
        rows.iter()
            .enumerate()
            .map(|(i, &(o, h, l, c, v))| Candle::new(i as i64 * 86_400_000, o, h, l, c, v).unwrap())
            .collect()
    }

    #[test]
    fn test_profile_basic() {
        let profile = VolumeProfileCalculator::new(10).calculate(&sample_candles()).unwrap();

        assert_eq!(profile.period, 4);
        assert_eq!(profile.buckets.len(), 10);
        assert_eq!(profile.price_low, 95.0);
        assert_eq!(profile.price_high, 122.0);
        assert_eq!(profile.total_volume, 6300.0);
        assert!(profile.poc >= profile.price_low && profile.poc <= profile.price_high);

        let pct: f64 = profile.buckets.iter().map(|b| b.volume_pct).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_poc_is_max_volume_and_inside_value_area() {
        let profile = calculate_volume_profile(&sample_candles(), 10).unwrap();
        let poc_volume = profile.buckets[profile.poc_index].volume;
        assert!(profile.buckets.iter().all(|b| b.volume <= poc_volume));
        assert!(profile.value_area_low <= profile.poc);
        assert!(profile.value_area_high >= profile.poc);
    }

    #[test]
    fn test_wider_value_area_ratio() {
        let candles = sample_candles();
        let narrow = VolumeProfileCalculator::new(10).calculate(&candles).unwrap();
        let wide = VolumeProfileCalculator::new(10)
            .with_value_area_ratio(0.9)
            .calculate(&candles)
            .unwrap();
        assert!(
            wide.value_area_high - wide.value_area_low
                >= narrow.value_area_high - narrow.value_area_low
        );
    }

    #[test]
    fn test_insufficient_data() {
        assert!(calculate_volume_profile(&[], 10).is_none());
        assert!(calculate_volume_profile(&sample_candles()[..1], 10).is_none());
    }

    #[test]
    fn test_reference_levels_from_profile() {
        let profile = calculate_volume_profile(&sample_candles(), 10).unwrap();
        let levels =
            profile.reference_levels("vp", ReferenceSourceType::VolumeProfileFixed, 0.8);

        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].level_type, ReferenceLevelType::Poc);
        assert_eq!(levels[0].price, profile.poc);
        assert_eq!(levels[1].price, profile.value_area_high);
        assert_eq!(levels[2].price, profile.value_area_low);
        assert!(levels.iter().all(|l| l.weight == 0.8));
    }
}
