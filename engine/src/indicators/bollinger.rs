// Bollinger Bands indicator implementation
use super::{sma::sma, IndicatorCalculator};
use crate::config::BollParams;
use shared::models::{BollStatus, Candle};
use shared::utils::population_stdev;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct BollReading {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
    /// Band width in % of the middle band.
    pub width: Option<f64>,
    pub status: BollStatus,
}

/// (upper, mid, lower) per candle; mid is the SMA, bands are `k` population
/// standard deviations of the same window away.
pub fn bands(values: &[f64], params: &BollParams) -> Vec<Option<(f64, f64, f64)>> {
    sma(values, params.period)
        .into_iter()
        .enumerate()
        .map(|(i, mid)| {
            let mid = mid?;
            let window = &values[i + 1 - params.period..=i];
            let sd = population_stdev(window)?;
            Some((mid + params.k * sd, mid, mid - params.k * sd))
        })
        .collect()
}

pub fn latest(values: &[f64], params: &BollParams) -> Option<BollReading> {
    let (upper, mid, lower) = (*bands(values, params).last()?)?;
    let close = *values.last()?;
    let width = if mid != 0.0 { Some((upper - lower) / mid * 100.0) } else { None };
    let status = if close > upper {
        BollStatus::BrokeUpper
    } else if close < lower {
        BollStatus::BrokeLower
    } else {
        BollStatus::Inside
    };
    Some(BollReading { upper, mid, lower, width, status })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollLine {
    Upper,
    Mid,
    Lower,
}

pub struct Bollinger {
    name: String,
    params: BollParams,
    line: BollLine,
}

impl Bollinger {
    pub fn new(params: BollParams, line: BollLine) -> Self {
        let label = match line {
            BollLine::Upper => "BOLL_UPPER",
            BollLine::Mid => "BOLL_MID",
            BollLine::Lower => "BOLL_LOWER",
        };
        Self {
            name: format!("{}({},{})", label, params.period, params.k),
            params,
            line,
        }
    }
}

impl IndicatorCalculator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.params.period, "k": self.params.k })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        bands(&super::closes(data), &self.params)
            .into_iter()
            .map(|b| {
                b.map(|(upper, mid, lower)| match self.line {
                    BollLine::Upper => upper,
                    BollLine::Mid => mid,
                    BollLine::Lower => lower,
                })
            })
            .collect()
    }
}
