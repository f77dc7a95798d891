//! 인과적 롤링 통계.
//!
//! 인덱스 `i`의 윈도우는 `values[max(0, i-period+1) ..= i]`입니다.
//! 윈도우는 `period` 길이에 도달할 때까지 늘어나고 이후에는 미끄러집니다.
//! 미래 값은 절대 포함하지 않습니다.

use super::{IndicatorError, IndicatorResult};

/// 롤링 평균/Z-점수 계산기.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsWindow {
    period: usize,
}

impl StatisticsWindow {
    /// 새 윈도우 생성. `period`는 1 이상이어야 합니다.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "통계 윈도우 기간은 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(Self { period })
    }

    /// 윈도우 기간.
    pub fn period(&self) -> usize {
        self.period
    }

    fn window<'a>(&self, values: &'a [f64], i: usize) -> &'a [f64] {
        let start = (i + 1).saturating_sub(self.period);
        &values[start..=i]
    }

    /// 인덱스별 롤링 Z-점수.
    ///
    /// 표본이 2개 미만이거나 표본 표준편차(n-1)가 0이면 0.0을 반환합니다.
    pub fn zscores(&self, values: &[f64]) -> Vec<f64> {
        self.zscores_with(values, 1)
    }

    /// 모표준편차(n)로 나누는 롤링 Z-점수. 거래량 게이트용입니다.
    pub fn population_zscores(&self, values: &[f64]) -> Vec<f64> {
        self.zscores_with(values, 0)
    }

    fn zscores_with(&self, values: &[f64], ddof: usize) -> Vec<f64> {
        (0..values.len())
            .map(|i| {
                let window = self.window(values, i);
                let n = window.len();
                if n < 2 {
                    return 0.0;
                }

                let mean = window.iter().sum::<f64>() / n as f64;
                let variance =
                    window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - ddof) as f64;
                let stdev = variance.sqrt();

                if stdev == 0.0 {
                    0.0
                } else {
                    (values[i] - mean) / stdev
                }
            })
            .collect()
    }

    /// 인덱스별 롤링 평균.
    pub fn means(&self, values: &[f64]) -> Vec<f64> {
        (0..values.len())
            .map(|i| {
                let window = self.window(values, i);
                window.iter().sum::<f64>() / window.len() as f64
            })
            .collect()
    }

    /// 값과 롤링 평균의 비율. 평균이 0이면 0.0입니다.
    pub fn ratios_to_mean(&self, values: &[f64]) -> Vec<f64> {
        self.means(values)
            .into_iter()
            .zip(values)
            .map(|(mean, v)| if mean == 0.0 { 0.0 } else { v / mean })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_rejected() {
        assert!(StatisticsWindow::new(0).is_err());
    }

    #[test]
    fn test_first_value_is_zero() {
        let z = StatisticsWindow::new(5).unwrap().zscores(&[10.0, 20.0, 30.0]);
        assert_eq!(z.len(), 3);
        assert_eq!(z[0], 0.0);
    }

    #[test]
    fn test_bessel_corrected_zscore() {
        // 윈도우 [1, 3]: 평균 2, 표본 표준편차 sqrt(2)
        let z = StatisticsWindow::new(2).unwrap().zscores(&[1.0, 3.0]);
        assert!((z[1] - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_population_zscore() {
        // 윈도우 [1, 3]: 평균 2, 모표준편차 1
        let window = StatisticsWindow::new(2).unwrap();
        let z = window.population_zscores(&[1.0, 3.0]);
        assert_eq!(z[0], 0.0);
        assert!((z[1] - 1.0).abs() < 1e-12);
        assert!(window.population_zscores(&[4.0; 5]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sliding_window_excludes_old_values() {
        // period 3에서 인덱스 3의 윈도우는 [2, 2, 8]
        let z = StatisticsWindow::new(3)
            .unwrap()
            .zscores(&[1000.0, 2.0, 2.0, 8.0]);
        let mean = 4.0;
        let stdev = (((2.0f64 - mean).powi(2) * 2.0 + (8.0f64 - mean).powi(2)) / 2.0).sqrt();
        assert!((z[3] - (8.0 - mean) / stdev).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_is_zero() {
        let z = StatisticsWindow::new(4).unwrap().zscores(&[5.0; 10]);
        assert!(z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_no_look_ahead() {
        let window = StatisticsWindow::new(3).unwrap();
        let base = window.zscores(&[1.0, 2.0, 4.0]);
        let extended = window.zscores(&[1.0, 2.0, 4.0, 100.0, -50.0]);
        assert_eq!(base[..], extended[..3]);
    }

    #[test]
    fn test_means_and_ratios() {
        let window = StatisticsWindow::new(2).unwrap();
        assert_eq!(window.means(&[2.0, 4.0, 6.0]), vec![2.0, 3.0, 5.0]);
        assert_eq!(window.ratios_to_mean(&[0.0, 4.0]), vec![0.0, 2.0]);
    }
}
