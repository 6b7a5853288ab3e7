// Technical indicators module
pub mod bollinger;
pub mod context;
pub mod ema;
pub mod kdj;
pub mod levels;
pub mod macd;
pub mod pattern;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod volume;

pub use bollinger::{BollLine, Bollinger};
pub use context::history_context;
pub use ema::Ema;
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use sma::Sma;
pub use snapshot::compute;

use shared::models::{Candle, MacdCross};
use serde_json::Value;

// Common trait for all single-line indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>; // None until the window is satisfiable
}

pub(crate) fn closes(data: &[Candle]) -> Vec<f64> {
    data.iter().map(|c| c.close).collect()
}

/// Most recent crossing of `fast` over `slow` among the last `lookback` candles,
/// ignoring anything before `first_valid`. Returns the direction and how many
/// candles ago it happened (0 = on the latest candle).
pub(crate) fn find_cross(fast: &[f64], slow: &[f64], first_valid: usize, lookback: usize) -> (MacdCross, u32) {
    let n = fast.len().min(slow.len());
    if n < 2 || lookback == 0 {
        return (MacdCross::None, 0);
    }
    let lo = (first_valid + 1).max(n.saturating_sub(lookback));
    for i in (lo..n).rev() {
        let prev = fast[i - 1] - slow[i - 1];
        let cur = fast[i] - slow[i];
        let days = u32::try_from(n - 1 - i).unwrap_or(u32::MAX);
        if prev <= 0.0 && cur > 0.0 {
            return (MacdCross::Golden, days);
        }
        if prev >= 0.0 && cur < 0.0 {
            return (MacdCross::Dead, days);
        }
    }
    (MacdCross::None, 0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate};
    use shared::models::Candle;

    fn day(offset: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset as i64)
    }

    pub fn candle(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle { date: day(0), open, high, low, close, volume }
    }

    pub fn flat_candle(close: f64) -> Candle {
        candle(close, close, close, close, 0.0)
    }

    /// Candles with consecutive dates built from (open, high, low, close, volume) tuples.
    pub fn dated(rows: &[(f64, f64, f64, f64, f64)]) -> Vec<Candle> {
        rows.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close, volume))| Candle { date: day(i), open, high, low, close, volume })
            .collect()
    }

    pub fn assert_opt_vec_eq(a: &[Option<f64>], b: &[Option<f64>]) {
        assert_eq!(a.len(), b.len(), "Vectors differ in length");
        for (i, (val_a, val_b)) in a.iter().zip(b.iter()).enumerate() {
            match (val_a, val_b) {
                (None, None) => {}
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9, "Mismatch at index {}: {} != {}", i, x, y),
                _ => panic!("Mismatch at index {}: {:?} != {:?}", i, val_a, val_b),
            }
        }
    }
}
