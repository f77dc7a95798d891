//! 캔들스틱 인터벌 정의.
//!
//! 거래소(Bybit v5) 인터벌 코드를 타임프레임 타입으로 다룹니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 캔들스틱 타임프레임 (Bybit v5 인터벌 코드).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1분봉
    #[serde(rename = "1")]
    M1,
    /// 3분봉
    #[serde(rename = "3")]
    M3,
    /// 5분봉
    #[serde(rename = "5")]
    M5,
    /// 15분봉
    #[default]
    #[serde(rename = "15")]
    M15,
    /// 30분봉
    #[serde(rename = "30")]
    M30,
    /// 1시간봉
    #[serde(rename = "60")]
    H1,
    /// 2시간봉
    #[serde(rename = "120")]
    H2,
    /// 4시간봉
    #[serde(rename = "240")]
    H4,
    /// 일봉
    #[serde(rename = "D")]
    D1,
    /// 주봉
    #[serde(rename = "W")]
    W1,
}

impl Timeframe {
    /// 지원하는 모든 타임프레임.
    pub const ALL: [Timeframe; 10] = [
        Timeframe::M1,
        Timeframe::M3,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H2,
        Timeframe::H4,
        Timeframe::D1,
        Timeframe::W1,
    ];

    /// 이 타임프레임의 분 단위 값을 반환합니다.
    pub fn as_minutes(&self) -> u64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M3 => 3,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H2 => 120,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
            Timeframe::W1 => 10080,
        }
    }

    /// 이 타임프레임의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.as_minutes() * 60)
    }

    /// 이 타임프레임의 밀리초 단위 값을 반환합니다.
    pub fn as_millis(&self) -> i64 {
        (self.as_minutes() * 60_000) as i64
    }

    /// 거래소 인터벌 코드를 반환합니다.
    pub fn code(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1",
            Timeframe::M3 => "3",
            Timeframe::M5 => "5",
            Timeframe::M15 => "15",
            Timeframe::M30 => "30",
            Timeframe::H1 => "60",
            Timeframe::H2 => "120",
            Timeframe::H4 => "240",
            Timeframe::D1 => "D",
            Timeframe::W1 => "W",
        }
    }

    /// 과거 데이터 요청 시 허용하는 최대 일수.
    pub fn max_history_days(&self) -> u32 {
        match self {
            Timeframe::M1 => 5,
            Timeframe::M3 => 10,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 120,
            Timeframe::H2 => 180,
            Timeframe::H4 => 300,
            Timeframe::D1 | Timeframe::W1 => 730,
        }
    }

    /// 요청 일수를 최대 허용 일수로 제한합니다.
    pub fn clamp_days(&self, days: u32) -> u32 {
        days.min(self.max_history_days())
    }

    /// 주어진 일수(최대 허용 일수로 제한)를 덮는 캔들 개수를 반환합니다.
    pub fn candles_for_days(&self, days: u32) -> usize {
        let minutes = u64::from(self.clamp_days(days)) * 24 * 60;
        (minutes / self.as_minutes()) as usize
    }

    /// 관대한 파싱. 인식하지 못한 입력은 15분봉으로 대체합니다.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    /// 거래소 코드(`15`, `60`, `D`)와 사람이 쓰는 형식(`15m`, `1h`, `4h`, `1d`, `1w`)을 모두 받습니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let tf = match normalized.as_str() {
            "1" | "1m" => Timeframe::M1,
            "3" | "3m" => Timeframe::M3,
            "5" | "5m" => Timeframe::M5,
            "15" | "15m" => Timeframe::M15,
            "30" | "30m" => Timeframe::M30,
            "60" | "60m" | "1h" => Timeframe::H1,
            "120" | "120m" | "2h" => Timeframe::H2,
            "240" | "240m" | "4h" => Timeframe::H4,
            "d" | "1d" => Timeframe::D1,
            "w" | "1w" => Timeframe::W1,
            _ => return Err(format!("Invalid timeframe: {}", s)),
        };
        Ok(tf)
    }
}
