//! 피봇 클러스터링.
//!
//! 방향별로 피봇을 가격 오름차순 정렬한 뒤 한 번의 왼쪽→오른쪽 탐욕 패스로
//! 묶습니다. 현재 클러스터의 누적 평균과의 거리가 `distance_pct` 이하이면
//! 클러스터를 확장하고, 아니면 새 클러스터를 시작합니다. 결과는 입력 순서에
//! 의존하며 전역 최적을 보장하지 않습니다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pivots::{LevelType, Pivot};

/// 레벨 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    /// 돌파되지 않았고 재시험 전
    #[default]
    Active,
    /// 이후 종가가 반대 방향으로 돌파
    Broken,
    /// 현재가가 레벨로 되돌아옴
    Tested,
}

/// 지지/저항 레벨.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// 레벨 방향
    #[serde(rename = "type")]
    pub level_type: LevelType,
    /// 클러스터 평균 가격
    pub price: f64,
    /// 터치 횟수 (클러스터 구성 피봇 수)
    pub touches: usize,
    /// 터치 타임스탬프 (오름차순)
    pub touch_timestamps: Vec<i64>,
    /// 첫 터치 (ms)
    pub first_touch: i64,
    /// 마지막 터치 (ms)
    pub last_touch: i64,
    /// 평균 거래량
    pub avg_volume: f64,
    /// 평균 거래량 유의성
    pub avg_z_score: f64,
    /// 강도 (0-10)
    pub strength: f64,
    /// 상태
    pub status: LevelStatus,
    /// 돌파 거래량. 현재는 항상 비어 있음.
    pub break_volume: Option<f64>,
}

impl Level {
    /// 피봇 묶음에서 레벨을 생성합니다. 빈 묶음이면 `None`입니다.
    pub fn from_pivots(members: &[Pivot]) -> Option<Self> {
        let first = members.first()?;
        let n = members.len() as f64;

        let mut touch_timestamps: Vec<i64> = members.iter().map(|p| p.timestamp).collect();
        touch_timestamps.sort_unstable();

        Some(Self {
            level_type: first.level_type,
            price: members.iter().map(|p| p.price).sum::<f64>() / n,
            touches: members.len(),
            first_touch: touch_timestamps[0],
            last_touch: touch_timestamps[touch_timestamps.len() - 1],
            touch_timestamps,
            avg_volume: members.iter().map(|p| p.volume).sum::<f64>() / n,
            avg_z_score: members.iter().map(|p| p.z_score).sum::<f64>() / n,
            strength: 0.0,
            status: LevelStatus::Active,
            break_volume: None,
        })
    }
}

/// 레벨 클러스터러.
#[derive(Debug, Clone, Copy)]
pub struct LevelClusterer {
    distance_pct: f64,
}

impl Default for LevelClusterer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl LevelClusterer {
    /// 새 클러스터러 생성.
    pub fn new(distance_pct: f64) -> Self {
        Self { distance_pct }
    }

    /// 피봇을 방향별로 클러스터링하여 레벨 목록을 반환합니다.
    ///
    /// 결과는 저항 레벨(가격 오름차순) 다음에 지지 레벨(가격 오름차순)입니다.
    pub fn cluster(&self, pivots: &[Pivot]) -> Vec<Level> {
        let mut levels = Vec::new();
        for level_type in [LevelType::Resistance, LevelType::Support] {
            let side: Vec<Pivot> = pivots
                .iter()
                .filter(|p| p.level_type == level_type)
                .copied()
                .collect();
            levels.extend(self.cluster_side(side));
        }

        debug!(
            pivots = pivots.len(),
            levels = levels.len(),
            distance_pct = self.distance_pct,
            "Pivot clustering complete"
        );

        levels
    }

    fn cluster_side(&self, mut pivots: Vec<Pivot>) -> Vec<Level> {
        pivots.sort_by(|a, b| a.price.total_cmp(&b.price));

        let mut levels = Vec::new();
        let mut current: Vec<Pivot> = Vec::new();
        let mut sum = 0.0;

        for pivot in pivots {
            if !current.is_empty() {
                let mean = sum / current.len() as f64;
                let distance = (pivot.price - mean).abs() / mean * 100.0;
                if distance > self.distance_pct {
                    levels.extend(Level::from_pivots(&current));
                    current.clear();
                    sum = 0.0;
                }
            }
            sum += pivot.price;
            current.push(pivot);
        }
        levels.extend(Level::from_pivots(&current));

        levels
    }
}
