// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use crate::config::RsiParams;
use shared::models::{Candle, RsiStatus};
use serde_json::Value;

/// Wilder RSI. Averages are seeded over the first `period` changes, so the
/// first value sits at index `period`. A zero average loss yields exactly 100.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    wilder_averages(values, period)
        .into_iter()
        .map(|avg| avg.map(|(gain, loss)| rsi_value(gain, loss)))
        .collect()
}

/// Latest RSI and its band. When both averages are zero the price never
/// moved: the value is still 100 but it carries no band.
pub fn latest(values: &[f64], params: &RsiParams) -> Option<(f64, Option<RsiStatus>)> {
    let (avg_gain, avg_loss) = wilder_averages(values, params.period).last().copied().flatten()?;
    let value = rsi_value(avg_gain, avg_loss);
    let status = if avg_gain == 0.0 && avg_loss == 0.0 { None } else { Some(classify(value, params)) };
    Some((value, status))
}

/// `(avg_gain, avg_loss)` per index, `None` until `period` changes exist.
fn wilder_averages(values: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    if period == 0 || values.len() <= period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period]; // RSI needs 'period' initial changes

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change; // losses are positive values
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    results.push(Some((avg_gain, avg_loss)));

    for i in (period + 1)..values.len() {
        let change = values[i] - values[i - 1];
        let (current_gain, current_loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };

        avg_gain = (avg_gain * (period - 1) as f64 + current_gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + current_loss) / period as f64;
        results.push(Some((avg_gain, avg_loss)));
    }
    results
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

pub fn classify(value: f64, params: &RsiParams) -> RsiStatus {
    if value >= params.overbought {
        RsiStatus::Overbought
    } else if value >= params.strong {
        RsiStatus::Strong
    } else if value <= params.oversold {
        RsiStatus::Oversold
    } else if value <= params.weak {
        RsiStatus::Weak
    } else {
        RsiStatus::Neutral
    }
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI{}", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        rsi(&super::closes(data), self.period)
    }
}
