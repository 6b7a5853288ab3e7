// Assembles the IndicatorSnapshot for the latest candle of a series.
use super::{bollinger, closes, kdj, levels::key_levels, macd, pattern, rsi, sma::last_sma, volume};
use crate::config::IndicatorSettings;
use shared::models::{Candle, IndicatorSnapshot, Trend};
use shared::utils::{mean, pct_change};

/// Pure function of its input: no state survives between calls. Indicators
/// whose window cannot be filled stay `None`; an empty series gives the default
/// (all-empty) snapshot.
pub fn compute(data: &[Candle], settings: &IndicatorSettings) -> IndicatorSnapshot {
    let Some(latest) = data.last() else {
        return IndicatorSnapshot::default();
    };
    let closes = closes(data);
    let n = closes.len();
    let close_back = |back: usize| if n > back { Some(closes[n - 1 - back]) } else { None };

    let mut snap = IndicatorSnapshot {
        as_of: Some(latest.date),
        close: Some(latest.close),
        change_pct: pct_change(Some(latest.close), close_back(1)),
        change_5d: pct_change(Some(latest.close), close_back(5)),
        change_20d: pct_change(Some(latest.close), close_back(20)),
        recent_5_up: recent_up_days(&closes, 5),
        ..IndicatorSnapshot::default()
    };

    let [p5, p10, p20, p60] = settings.ma_periods;
    snap.ma5 = last_sma(&closes, p5);
    snap.ma10 = last_sma(&closes, p10);
    snap.ma20 = last_sma(&closes, p20);
    snap.ma60 = last_sma(&closes, p60);
    snap.trend = classify_trend(snap.ma5, snap.ma10, snap.ma20);

    if let Some(reading) = macd::latest(&closes, &settings.macd) {
        snap.macd = Some(reading.macd);
        snap.macd_signal = Some(reading.signal);
        snap.macd_hist = Some(reading.hist);
        snap.macd_cross = reading.cross;
        snap.macd_cross_days = reading.cross_days;
    }

    if let Some((value, status)) = rsi::latest(&closes, &settings.rsi) {
        snap.rsi6 = Some(value);
        snap.rsi_status = status;
    }

    if let Some(reading) = kdj::latest(data, &settings.kdj) {
        snap.kdj_k = Some(reading.k);
        snap.kdj_d = Some(reading.d);
        snap.kdj_j = Some(reading.j);
        snap.kdj_status = Some(reading.status);
    }

    if let Some(reading) = bollinger::latest(&closes, &settings.boll) {
        snap.boll_upper = Some(reading.upper);
        snap.boll_mid = Some(reading.mid);
        snap.boll_lower = Some(reading.lower);
        snap.boll_width = reading.width;
        snap.boll_status = Some(reading.status);
    }

    if let Some(reading) = volume::latest(data, &settings.volume) {
        snap.volume_ratio = Some(reading.ratio);
        snap.volume_trend = Some(reading.trend);
    }

    let amplitudes = amplitudes(data);
    snap.amplitude = if n >= 2 { amplitudes.last().copied() } else { None };
    snap.amplitude_avg5 = if amplitudes.len() >= 5 { mean(&amplitudes[amplitudes.len() - 5..]) } else { None };

    if let Some(levels) = key_levels(data, settings.levels.short_window) {
        snap.support = Some(levels.support);
        snap.resistance = Some(levels.resistance);
    }
    if let Some(levels) = key_levels(data, settings.levels.medium_window) {
        snap.support_m = Some(levels.support);
        snap.resistance_m = Some(levels.resistance);
    }

    snap.kline_pattern = pattern::detect(data, &settings.pattern);
    snap
}

/// MA alignment. Needs MA5, MA10 and MA20; comparisons ignore float noise so
/// a perfectly flat series reads as tangled.
pub fn classify_trend(ma5: Option<f64>, ma10: Option<f64>, ma20: Option<f64>) -> Option<Trend> {
    let (ma5, ma10, ma20) = (ma5?, ma10?, ma20?);
    let above = |a: f64, b: f64| a - b > 1e-9 * b.abs().max(1.0);
    Some(if above(ma5, ma10) && above(ma10, ma20) {
        Trend::BullishAligned
    } else if above(ma10, ma5) && above(ma20, ma10) {
        Trend::BearishAligned
    } else {
        Trend::Tangled
    })
}

/// `(high - low) / previous close * 100` for every candle that has a previous close.
fn amplitudes(data: &[Candle]) -> Vec<f64> {
    data.windows(2)
        .filter(|pair| pair[0].close > 0.0)
        .map(|pair| (pair[1].high - pair[1].low) / pair[0].close * 100.0)
        .collect()
}

fn recent_up_days(closes: &[f64], count: usize) -> u32 {
    let start = closes.len().saturating_sub(count).max(1);
    let ups = (start..closes.len()).filter(|&i| closes[i] > closes[i - 1]).count();
    u32::try_from(ups).unwrap_or(u32::MAX)
}
