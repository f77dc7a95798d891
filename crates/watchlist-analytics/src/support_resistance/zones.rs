//! 횡보(consolidation) 구간 감지.
//!
//! 가격 정렬된 레벨의 모든 연속 윈도우(길이 ≥ `min_levels`) 중 가격 폭이
//! `max_distance_pct` 이내인 것을 후보로 만들고, 평균 강도 내림차순으로
//! 겹치지 않는 후보만 남깁니다. 결과는 중심 가격 오름차순입니다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clustering::Level;

/// 횡보 구간.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationZone {
    /// 중심 가격 (최소/최대의 중간)
    pub center_price: f64,
    /// 최소 가격
    pub min_price: f64,
    /// 최대 가격
    pub max_price: f64,
    /// 가격 폭 (최소 가격 대비 %)
    pub range_pct: f64,
    /// 구성 레벨 수
    pub num_levels: usize,
    /// 총 터치 횟수
    pub total_touches: usize,
    /// 평균 강도
    pub avg_strength: f64,
    /// 구성 레벨
    pub levels: Vec<Level>,
}

impl ConsolidationZone {
    fn from_window(window: &[Level], range_pct: f64) -> Self {
        let min_price = window[0].price;
        let max_price = window[window.len() - 1].price;

        Self {
            center_price: (min_price + max_price) / 2.0,
            min_price,
            max_price,
            range_pct,
            num_levels: window.len(),
            total_touches: window.iter().map(|l| l.touches).sum(),
            avg_strength: window.iter().map(|l| l.strength).sum::<f64>() / window.len() as f64,
            levels: window.to_vec(),
        }
    }

    /// 두 구간의 가격 범위가 겹치는지 확인합니다 (경계 공유 포함).
    pub fn overlaps(&self, other: &ConsolidationZone) -> bool {
        self.min_price <= other.max_price && other.min_price <= self.max_price
    }
}

/// 횡보 구간 감지기.
#[derive(Debug, Clone, Copy)]
pub struct ZoneDetector {
    min_levels: usize,
    max_distance_pct: f64,
}

impl Default for ZoneDetector {
    fn default() -> Self {
        Self::new(3, 2.0)
    }
}

impl ZoneDetector {
    /// 새 감지기 생성. `min_levels`는 최소 1로 보정됩니다.
    pub fn new(min_levels: usize, max_distance_pct: f64) -> Self {
        Self {
            min_levels: min_levels.max(1),
            max_distance_pct,
        }
    }

    /// 레벨 목록에서 겹치지 않는 횡보 구간을 찾습니다.
    pub fn detect(&self, levels: &[Level]) -> Vec<ConsolidationZone> {
        let mut sorted = levels.to_vec();
        sorted.sort_by(|a, b| a.price.total_cmp(&b.price));

        let mut candidates = Vec::new();
        for start in 0..sorted.len() {
            let min_price = sorted[start].price;
            if min_price <= 0.0 {
                continue;
            }
            for end in (start + self.min_levels)..=sorted.len() {
                let max_price = sorted[end - 1].price;
                let range_pct = (max_price - min_price) / min_price * 100.0;
                // 정렬되어 있으므로 더 긴 윈도우는 폭이 줄지 않음
                if range_pct > self.max_distance_pct {
                    break;
                }
                candidates.push(ConsolidationZone::from_window(&sorted[start..end], range_pct));
            }
        }

        let candidate_count = candidates.len();
        candidates.sort_by(|a, b| b.avg_strength.total_cmp(&a.avg_strength));

        let mut kept: Vec<ConsolidationZone> = Vec::new();
        for zone in candidates {
            if kept.iter().all(|k| !k.overlaps(&zone)) {
                kept.push(zone);
            }
        }
        kept.sort_by(|a, b| a.center_price.total_cmp(&b.center_price));

        debug!(
            levels = levels.len(),
            candidates = candidate_count,
            zones = kept.len(),
            "Consolidation zone detection complete"
        );

        kept
    }
}
