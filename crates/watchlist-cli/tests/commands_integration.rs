//! 캔들 파일에서 명령 결과까지의 통합 테스트

use std::path::{Path, PathBuf};

use serde_json::json;
use watchlist_analytics::PatternType;
use watchlist_cli::commands::levels::{analyze_levels, scan_levels, LevelsArgs};
use watchlist_cli::commands::patterns::{analyze_patterns, PatternsArgs};
use watchlist_cli::commands::volume_delta::{compute_volume_delta, VolumeDeltaArgs};
use watchlist_core::{AppConfig, CooldownTracker};

const MIN15: i64 = 15 * 60_000;

struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("watchlist-cli-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn write(&self, file: &str, value: &serde_json::Value) -> PathBuf {
        let path = self.dir.join(file);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

/// 저가 100, 고가 112를 오가는 톱니 시계열. 마지막은 100 부근의 망치형.
fn sawtooth_json() -> serde_json::Value {
    let mut rows = Vec::new();
    for i in 0..60i64 {
        let step = i % 10;
        let base = 101.0 + 2.0 * step.min(10 - step) as f64;
        rows.push(json!({
            "timestamp": i * MIN15,
            "open": base,
            "high": base + 1.0,
            "low": base - 1.0,
            "close": base + 0.5,
            "volume": 100.0
        }));
    }
    rows.push(json!({
        "timestamp": 60 * MIN15,
        "open": 101.0,
        "high": 101.0,
        "low": 95.0,
        "close": 100.6,
        "volume": 300.0
    }));
    serde_json::Value::Array(rows)
}

fn levels_args(fixture: &Fixture, input: &Path) -> LevelsArgs {
    let sr_config = fixture.write(
        "sr.json",
        &json!({"volumeMethod": "simple", "leftBars": 3, "rightBars": 3, "zScorePeriod": 20}),
    );
    LevelsArgs {
        input: input.to_path_buf(),
        symbol: "TESTUSDT".to_string(),
        interval: "15m".to_string(),
        days: None,
        sr_config: Some(sr_config),
        send: false,
    }
}

#[test]
fn test_levels_report_and_cooldown() {
    let fixture = Fixture::new("levels");
    let input = fixture.write("candles.json", &sawtooth_json());
    let args = levels_args(&fixture, &input);

    let mut settings = AppConfig::default();
    settings.alerts.level_proximity_percent = 100.0;
    settings.alerts.level_min_strength = 0.0;
    let mut cooldown = CooldownTracker::new(settings.alerts.cooldown_secs);

    let output = analyze_levels(&args, &settings, &mut cooldown).unwrap();
    assert_eq!(output.interval, "15");
    assert_eq!(output.report.resistances[0].price, 112.0);
    assert_eq!(output.report.supports[0].price, 100.0);
    assert_eq!(output.alerts.len(), 2);

    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["symbol"], "TESTUSDT");
    assert!(value["resistances"].is_array());
    assert!(value["volumeStats"].is_object());

    // 같은 추적기로 다시 실행하면 쿨다운에 걸림
    let again = analyze_levels(&args, &settings, &mut cooldown).unwrap();
    assert!(again.alerts.is_empty());
}

#[test]
fn test_levels_cooldown_survives_between_runs() {
    let fixture = Fixture::new("levels-state");
    let input = fixture.write("candles.json", &sawtooth_json());
    let args = levels_args(&fixture, &input);
    let state_file = fixture.dir.join("state").join("cooldown.json");

    let mut settings = AppConfig::default();
    settings.alerts.level_proximity_percent = 100.0;
    settings.alerts.level_min_strength = 0.0;
    settings.alerts.cooldown_file = state_file.to_string_lossy().into_owned();

    let first = scan_levels(&args, &settings).unwrap();
    assert_eq!(first.alerts.len(), 2);
    assert!(state_file.exists());

    // 새 프로세스처럼 파일에서 기록을 다시 읽음
    let second = scan_levels(&args, &settings).unwrap();
    assert!(second.alerts.is_empty());
    assert_eq!(second.report.supports[0].price, 100.0);
}

#[test]
fn test_levels_without_cooldown_file_repeats_alerts() {
    let fixture = Fixture::new("levels-nostate");
    let input = fixture.write("candles.json", &sawtooth_json());
    let args = levels_args(&fixture, &input);

    let mut settings = AppConfig::default();
    settings.alerts.level_proximity_percent = 100.0;
    settings.alerts.level_min_strength = 0.0;
    settings.alerts.cooldown_file = String::new();

    assert_eq!(scan_levels(&args, &settings).unwrap().alerts.len(), 2);
    assert_eq!(scan_levels(&args, &settings).unwrap().alerts.len(), 2);
}

#[test]
fn test_levels_from_kline_response() {
    let fixture = Fixture::new("kline");
    let candles = sawtooth_json();
    let mut list: Vec<serde_json::Value> = candles
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            json!([
                c["timestamp"].to_string(),
                c["open"].to_string(),
                c["high"].to_string(),
                c["low"].to_string(),
                c["close"].to_string(),
                c["volume"].to_string(),
                "0"
            ])
        })
        .collect();
    list.reverse();
    let input = fixture.write(
        "kline.json",
        &json!({"retCode": 0, "retMsg": "OK", "result": {"symbol": "TESTUSDT", "list": list}}),
    );

    let args = levels_args(&fixture, &input);
    let mut cooldown = CooldownTracker::new(3600);
    let output = analyze_levels(&args, &AppConfig::default(), &mut cooldown).unwrap();
    assert_eq!(output.report.current_price, Some(100.6));
    assert_eq!(output.report.resistances.len(), 1);
}

#[test]
fn test_patterns_with_range_context() {
    let fixture = Fixture::new("patterns");
    let input = fixture.write("candles.json", &sawtooth_json());
    let contexts = fixture.write(
        "contexts.json",
        &json!([{
            "id": "range",
            "type": "RANGE_DETECTOR",
            "enabled": true,
            "weight": 1.0,
            "metadata": {"top": 110.0, "bottom": "100"}
        }]),
    );

    let args = PatternsArgs {
        input,
        contexts: Some(contexts),
        symbol: "TESTUSDT".to_string(),
        interval: "15".to_string(),
        days: None,
        rejection_config: None,
        profile_buckets: None,
        send: false,
    };

    let output = analyze_patterns(&args).unwrap();
    assert_eq!(output.reference_levels.len(), 3);
    assert!(output
        .patterns
        .iter()
        .any(|p| p.pattern_type == PatternType::Hammer && p.price == 100.6));
    assert!(!output.alerts_enabled);
    assert_eq!(output.user_config["filters"]["minConfidence"], 60.0);
}

#[test]
fn test_patterns_without_references_is_empty() {
    let fixture = Fixture::new("norefs");
    let input = fixture.write("candles.json", &sawtooth_json());

    let args = PatternsArgs {
        input,
        contexts: None,
        symbol: "TESTUSDT".to_string(),
        interval: "15".to_string(),
        days: None,
        rejection_config: None,
        profile_buckets: None,
        send: false,
    };

    let output = analyze_patterns(&args).unwrap();
    assert!(output.reference_levels.is_empty());
    assert!(output.patterns.is_empty());
}

#[test]
fn test_volume_delta_with_days_limit() {
    let fixture = Fixture::new("cvd");
    let input = fixture.write("candles.json", &sawtooth_json());

    let all = compute_volume_delta(&VolumeDeltaArgs {
        input: input.clone(),
        interval: "15".to_string(),
        days: None,
    })
    .unwrap();
    assert_eq!(all.len(), 61);
    // 모든 캔들이 종가 ≥ 시가, 마지막 망치형만 음봉
    assert_eq!(all.last().unwrap().cvd, 60.0 * 100.0 - 300.0);

    // 15분봉 1일 = 96개 > 61개이므로 그대로
    let limited = compute_volume_delta(&VolumeDeltaArgs {
        input,
        interval: "15".to_string(),
        days: Some(1),
    })
    .unwrap();
    assert_eq!(limited.len(), 61);
}
