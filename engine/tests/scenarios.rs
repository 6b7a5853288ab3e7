// End-to-end checks of the calculator + scorer through the public API.
use chrono::{Duration, NaiveDate};
use engine::config::{EngineSettings, IndicatorSettings, ScoringPolicy};
use engine::indicators::{compute, ema::ema, rsi::rsi, IndicatorCalculator, Sma};
use engine::scoring::{ladder::map_score, score};
use engine::services::AnalysisService;
use shared::models::{
    Action, Candle, IndicatorSnapshot, MacdCross, RsiStatus, Trend, VolumeTrend,
};

fn series(closes: &[f64], volumes: &[f64]) -> Vec<Candle> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| Candle {
            date: start + Duration::days(i as i64),
            open: close - 0.1,
            high: close + 0.05,
            low: close - 0.15,
            close,
            volume,
        })
        .collect()
}

/// Deterministic zig-zag walk so the tests do not need a RNG crate.
fn walk(n: usize, seed: u64, drift: f64) -> Vec<Candle> {
    let mut state = seed;
    let mut close = 20.0;
    let mut closes = Vec::with_capacity(n);
    let mut volumes = Vec::with_capacity(n);
    for _ in 0..n {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let step = ((state >> 33) % 1000) as f64 / 1000.0 - 0.5 + drift;
        close = (close + step).max(1.0);
        closes.push(close);
        volumes.push(1000.0 + ((state >> 20) % 2000) as f64);
    }
    series(&closes, &volumes)
}

fn assert_no_indicators(snap: &IndicatorSnapshot) {
    assert_eq!(snap.trend, None);
    assert_eq!(snap.ma5, None);
    assert_eq!(snap.ma10, None);
    assert_eq!(snap.ma20, None);
    assert_eq!(snap.macd_hist, None);
    assert_eq!(snap.rsi6, None);
    assert_eq!(snap.kdj_k, None);
    assert_eq!(snap.boll_upper, None);
    assert_eq!(snap.volume_ratio, None);
    assert_eq!(snap.support, None);
    assert_eq!(snap.resistance, None);
}

#[test]
fn short_series_score_zero_with_no_evidence() {
    let settings = IndicatorSettings::default();
    let policy = ScoringPolicy::default();
    for n in 0..5 {
        let data = walk(n, 7, 0.0);
        let snap = compute(&data, &settings);
        assert_no_indicators(&snap);
        for holding in [false, true] {
            let suggestion = score(&snap, holding, &policy);
            assert_eq!(suggestion.score, 0, "n = {}", n);
            assert!(suggestion.evidence.is_empty());
            assert_eq!(suggestion.action, Action::Watch);
        }
    }
}

#[test]
fn single_candle_is_neutral() {
    let data = series(&[12.3], &[5000.0]);
    let analysis = AnalysisService::default().analyze(&data, false);
    assert_no_indicators(&analysis.snapshot);
    assert_eq!(analysis.snapshot.amplitude, None);
    assert_eq!(analysis.snapshot.kline_pattern, None);
    assert_eq!(analysis.suggestion.action, Action::Watch);
    assert_eq!(analysis.suggestion.score, 0);
    assert!(analysis.suggestion.evidence.is_empty());
}

#[test]
fn moving_average_first_value_is_plain_mean() {
    let closes = [3.7, 9.1, 4.4, 8.8, 1.2, 6.5, 7.3, 2.9, 5.5, 10.1, 4.0];
    let data = series(&closes, &[1.0; 11]);
    for period in [1usize, 3, 5, 10] {
        let values = Sma::new(period).calculate(&data);
        let expected = closes[..period].iter().sum::<f64>() / period as f64;
        assert!((values[period - 1].unwrap() - expected).abs() < 1e-9);
        assert!(values[..period - 1].iter().all(Option::is_none));
    }
}

#[test]
fn ema_is_seeded_with_first_value() {
    let closes = [3.7, 9.1, 4.4, 8.8, 1.2];
    for period in [1usize, 2, 5, 12, 26] {
        assert_eq!(ema(&closes, period)[0], closes[0]);
    }
}

#[test]
fn rsi_stays_in_range() {
    for seed in 1..20 {
        let data = walk(80, seed, 0.0);
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        for value in rsi(&closes, 6).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
    let rising: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
    assert!(rsi(&rising, 6).into_iter().flatten().all(|v| v == 100.0));
}

#[test]
fn score_to_action_is_monotonic() {
    let mut settings = EngineSettings::default();
    for (buy_high, buy_low, sell_high, sell_low) in [(6, 3, -3, -6), (4, 1, -1, -4), (10, 5, -5, -10)] {
        settings.scoring.ladder.buy_high = buy_high;
        settings.scoring.ladder.buy_low = buy_low;
        settings.scoring.ladder.sell_high = sell_high;
        settings.scoring.ladder.sell_low = sell_low;
        settings.scoring.ladder.validate().unwrap();
        for holding in [false, true] {
            let ranks: Vec<u8> =
                (-20..=20).map(|t| map_score(t, holding, &settings.scoring.ladder).rank()).collect();
            assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

#[test]
fn holding_flag_partitions_vocabulary() {
    let settings = IndicatorSettings::default();
    let policy = ScoringPolicy::default();
    for seed in 1..30 {
        for drift in [-0.3, 0.0, 0.3] {
            let snap = compute(&walk(90, seed, drift), &settings);
            let held = score(&snap, true, &policy).action;
            let free = score(&snap, false, &policy).action;
            assert!(!matches!(held, Action::Buy | Action::Avoid), "holder got {:?}", held);
            assert!(!matches!(free, Action::Add | Action::Reduce), "non-holder got {:?}", free);
        }
    }
}

#[test]
fn strongly_negative_holder_reduces_or_sells() {
    let policy = ScoringPolicy::default();
    let mut snap = IndicatorSnapshot {
        ma5: Some(8.0),
        trend: Some(Trend::BearishAligned),
        macd_hist: Some(-0.4),
        macd_cross: MacdCross::Dead,
        rsi6: Some(35.0),
        rsi_status: Some(RsiStatus::Weak),
        volume_trend: Some(VolumeTrend::Heavy),
        change_pct: Some(1.2),
        ..Default::default()
    };
    let suggestion = score(&snap, true, &policy);
    assert!(suggestion.score <= -6);
    assert_eq!(suggestion.action, Action::Reduce);
    assert_eq!(score(&snap, false, &policy).action, Action::Sell);

    snap.change_pct = Some(-2.5);
    assert_eq!(score(&snap, true, &policy).action, Action::Sell);
    assert_eq!(score(&snap, false, &policy).action, Action::Avoid);
}

#[test]
fn analysis_is_idempotent() {
    let service = AnalysisService::default();
    let data = walk(120, 42, 0.05);
    for holding in [false, true] {
        let first = serde_json::to_string(&service.analyze(&data, holding)).unwrap();
        let second = serde_json::to_string(&service.analyze(&data, holding)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn ascending_series_with_rising_volume() {
    let closes: Vec<f64> = (0..25).map(|i| 10.0 + 0.2 * i as f64).collect();
    let mut volumes = vec![1000.0; 25];
    volumes[22] = 1500.0;
    volumes[23] = 2000.0;
    volumes[24] = 2600.0;
    let data = series(&closes, &volumes);
    let service = AnalysisService::default();

    for holding in [false, true] {
        let analysis = service.analyze(&data, holding);
        let snap = &analysis.snapshot;
        assert_eq!(snap.trend, Some(Trend::BullishAligned));
        match snap.macd_cross {
            MacdCross::Golden => {}
            MacdCross::None => assert!(snap.macd_hist.unwrap() > 0.0),
            MacdCross::Dead => panic!("dead cross on a rising series"),
        }
        assert!(matches!(snap.rsi_status, Some(RsiStatus::Strong | RsiStatus::Overbought)));
        assert_eq!(snap.volume_trend, Some(VolumeTrend::Heavy));
        assert!((snap.volume_ratio.unwrap() - 2.0).abs() < 1e-9);

        let suggestion = &analysis.suggestion;
        assert!(matches!(suggestion.action, Action::Buy | Action::Add | Action::Hold));
        // trend +3, MACD bar +1, RSI overbought -2, KDJ overbought -1,
        // heavy volume +2, broken short resistance +1
        assert_eq!(suggestion.score, 4);
        assert_eq!(suggestion.action, Action::Hold);
        let total: i32 = suggestion.evidence.iter().map(|e| e.delta).sum();
        assert_eq!(total, suggestion.score);
        assert!(suggestion.evidence.windows(2).all(|w| w[0].delta.abs() >= w[1].delta.abs()));
    }
}

#[test]
fn flat_series_is_watch() {
    let data = series(&[15.0; 30], &[1000.0; 30]);
    for holding in [false, true] {
        let analysis = AnalysisService::default().analyze(&data, holding);
        let snap = &analysis.snapshot;
        assert!(snap.macd.unwrap().abs() < 1e-9);
        assert!(snap.macd_hist.unwrap().abs() < 1e-9);
        assert_eq!(snap.macd_cross, MacdCross::None);
        // no losses at all: the zero-loss rule applies, but no band without movement
        assert_eq!(snap.rsi6, Some(100.0));
        assert_eq!(snap.rsi_status, None);
        assert!(snap.boll_width.unwrap().abs() < 1e-9);
        assert_eq!(snap.trend, Some(Trend::Tangled));
        assert_eq!(snap.volume_trend, Some(VolumeTrend::Normal));

        let suggestion = &analysis.suggestion;
        assert!(suggestion.evidence.iter().all(|e| e.tag != "rsi"), "{:?}", suggestion.evidence);
        assert_eq!(suggestion.action, Action::Watch, "holding={}", holding);
    }
}

#[test]
fn flat_closes_with_wicks_is_watch_for_holders() {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let data: Vec<Candle> = (0..30)
        .map(|i| Candle {
            date: start + Duration::days(i),
            open: 15.0,
            high: 15.05,
            low: 14.85,
            close: 15.0,
            volume: 1000.0,
        })
        .collect();
    let analysis = AnalysisService::default().analyze(&data, true);
    assert_eq!(analysis.snapshot.rsi_status, None);
    assert!(analysis.suggestion.evidence.iter().all(|e| e.tag != "rsi"));
    assert_eq!(analysis.suggestion.action, Action::Watch);
}
