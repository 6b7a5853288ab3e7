// Support / resistance from recent swing lows and highs

use shared::models::Candle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyLevels {
    pub support: f64,
    pub resistance: f64,
}

/// Lowest low and highest high of the `window` candles *before* the latest one.
/// The latest candle is left out so a fresh breakout does not become its own
/// resistance: a close above `resistance` means the level has already been taken.
pub fn key_levels(data: &[Candle], window: usize) -> Option<KeyLevels> {
    if window == 0 || data.len() < window + 1 {
        return None;
    }
    let last = data.len() - 1;
    let prior = &data[last - window..last];
    let support = prior.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let resistance = prior.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    Some(KeyLevels { support, resistance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::candle;

    #[test]
    fn test_levels_skip_latest_candle() {
        let mut data: Vec<Candle> = (0..5).map(|i| candle(10.0, 11.0 + i as f64, 9.0 - i as f64, 10.0, 1.0)).collect();
        data.push(candle(15.0, 30.0, 1.0, 29.0, 1.0));
        let levels = key_levels(&data, 5).unwrap();
        assert_eq!(levels.resistance, 15.0);
        assert_eq!(levels.support, 5.0);
    }

    #[test]
    fn test_levels_need_window_plus_one() {
        let data: Vec<Candle> = (0..20).map(|_| candle(10.0, 11.0, 9.0, 10.0, 1.0)).collect();
        assert!(key_levels(&data, 20).is_none());
        assert!(key_levels(&data, 19).is_some());
    }
}
