// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;
use serde_json::Value;

/// EMA seeded with the first value itself (`ema[0] == values[0]`), then
/// `ema[i] = v[i] * k + ema[i-1] * (1 - k)` with `k = 2 / (period + 1)`.
/// Evaluated as `prev + k * (v - prev)` so a constant input stays exactly constant.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut results = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return results;
    };
    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut previous_ema = first;
    results.push(previous_ema);
    for value in values.iter().skip(1) {
        let ema = previous_ema + multiplier * (value - previous_ema);
        results.push(ema);
        previous_ema = ema;
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA{}", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        if self.period == 0 {
            return vec![None; data.len()];
        }
        ema(&super::closes(data), self.period).into_iter().map(Some).collect()
    }
}
