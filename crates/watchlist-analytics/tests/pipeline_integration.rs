//! 지지/저항, 볼륨 프로파일, 리젝션 패턴 파이프라인 통합 테스트

use watchlist_analytics::{
    compute_support_resistance, detect_rejection_patterns, extract_reference_levels,
    LevelProximityScanner, PatternType, ReferenceContext, ReferenceSourceType, RejectionConfig,
    SupportResistanceConfig, VolumeDeltaIndicator, VolumeMethod, VolumeProfileCalculator,
};
use watchlist_core::Candle;

const MIN15: i64 = 15 * 60_000;

/// 저가 100, 고가 112를 오가는 톱니 시계열. 마지막은 100 부근의 망치형.
fn sawtooth() -> Vec<Candle> {
    let mut candles = Vec::new();
    for cycle in 0..6 {
        for step in 0..10 {
            let i = (cycle * 10 + step) as i64;
            let base = 101.0 + 2.0 * step.min(10 - step) as f64;
            candles.push(Candle::new(i * MIN15, base, base + 1.0, base - 1.0, base + 0.5, 100.0).unwrap());
        }
    }
    let last = candles.len() as i64;
    candles.push(Candle::new(last * MIN15, 101.0, 101.0, 95.0, 100.6, 300.0).unwrap());
    candles
}

#[test]
fn test_support_resistance_then_proximity() {
    let candles = sawtooth();
    let config = SupportResistanceConfig {
        volume_method: VolumeMethod::Simple,
        left_bars: 3,
        right_bars: 3,
        z_score_period: 20,
        ..Default::default()
    };
    let report = compute_support_resistance(&candles, &config).unwrap();

    assert_eq!(report.resistances.len(), 1);
    assert_eq!(report.resistances[0].price, 112.0);
    assert_eq!(report.resistances[0].touches, 6);
    assert_eq!(report.supports.len(), 1);
    assert_eq!(report.supports[0].price, 100.0);
    assert_eq!(report.supports[0].touches, 5);
    assert_eq!(report.current_price, Some(100.6));

    let scanner = LevelProximityScanner::new(100.0, 0.0).unwrap();
    let alerts = scanner.scan("TESTUSDT", &report);
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a.symbol == "TESTUSDT"));

    // 기본 0.3% 기준으로는 0.6% 떨어진 지지선도 알림 대상이 아님
    assert!(LevelProximityScanner::default().scan("TESTUSDT", &report).is_empty());
}

#[test]
fn test_volume_profile_levels_validate_hammer() {
    let candles = sawtooth();
    let profile = VolumeProfileCalculator::new(20).calculate(&candles).unwrap();

    let contexts = vec![
        profile.to_context("vp", ReferenceSourceType::VolumeProfileDynamic, 0.6),
        ReferenceContext::range("range", 1.0, 110.0, 100.0),
    ];
    let levels = extract_reference_levels(&contexts);
    assert_eq!(levels.len(), 6);

    let patterns = detect_rejection_patterns(&candles, &RejectionConfig::default(), &levels).unwrap();
    let hammer = patterns
        .iter()
        .find(|p| p.pattern_type == PatternType::Hammer)
        .expect("hammer near range bottom");
    assert_eq!(hammer.price, 100.6);
    assert!(hammer.confidence >= 60.0 && hammer.confidence <= 100.0);
    assert!(hammer.context_scores.contains_key("RANGE_DETECTOR_range"));
}

#[test]
fn test_cvd_matches_signed_volume_sum() {
    let candles = sawtooth();
    let points = VolumeDeltaIndicator::new().calculate(&candles);
    let expected: f64 = candles
        .iter()
        .map(|c| if c.close >= c.open { c.volume } else { -c.volume })
        .sum();
    assert_eq!(points.len(), candles.len());
    assert_eq!(points.last().map(|p| p.cvd), Some(expected));
}
