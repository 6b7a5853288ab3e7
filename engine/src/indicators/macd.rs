// Moving Average Convergence/Divergence (MACD) indicator implementation
use super::{ema::ema, find_cross, IndicatorCalculator};
use crate::config::MacdParams;
use shared::models::{Candle, MacdCross};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

/// Both EMAs are seeded at index 0, so the MACD line exists for every candle;
/// the signal line is the EMA of that line.
pub fn macd(values: &[f64], params: &MacdParams) -> MacdSeries {
    let fast = ema(values, params.fast);
    let slow = ema(values, params.slow);
    let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = ema(&macd, params.signal);
    let hist = macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect();
    MacdSeries { macd, signal, hist }
}

/// Number of candles needed before MACD values are published.
pub fn warmup(params: &MacdParams) -> usize {
    params.signal + 1
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub hist: f64,
    pub cross: MacdCross,
    pub cross_days: u32,
}

/// Latest MACD values plus the most recent cross inside the look-back window.
pub fn latest(values: &[f64], params: &MacdParams) -> Option<MacdReading> {
    if values.is_empty() || values.len() < warmup(params) {
        return None;
    }
    let series = macd(values, params);
    let last = values.len() - 1;
    let (cross, cross_days) = find_cross(&series.macd, &series.signal, warmup(params) - 1, params.cross_lookback);
    Some(MacdReading {
        macd: series.macd[last],
        signal: series.signal[last],
        hist: series.hist[last],
        cross,
        cross_days,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

/// One MACD line as a chart series, `None` before the warm-up completes.
pub struct Macd {
    name: String,
    params: MacdParams,
    line: MacdLine,
}

impl Macd {
    pub fn new(params: MacdParams, line: MacdLine) -> Self {
        let label = match line {
            MacdLine::Macd => "DIF",
            MacdLine::Signal => "DEA",
            MacdLine::Histogram => "MACD",
        };
        Self {
            name: format!("{}({},{},{})", label, params.fast, params.slow, params.signal),
            params,
            line,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.params.fast, "slow": self.params.slow, "signal": self.params.signal })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let series = macd(&super::closes(data), &self.params);
        let line = match self.line {
            MacdLine::Macd => series.macd,
            MacdLine::Signal => series.signal,
            MacdLine::Histogram => series.hist,
        };
        let first_valid = warmup(&self.params) - 1;
        line.into_iter()
            .enumerate()
            .map(|(i, v)| if i >= first_valid { Some(v) } else { None })
            .collect()
    }
}
