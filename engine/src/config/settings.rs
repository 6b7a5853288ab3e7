// Engine settings: indicator parameters and the scoring policy table.
// Every field has a default, so a settings file only needs the keys it overrides.
use serde::Deserialize;
use std::path::Path;

use crate::error::EngineError;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub indicators: IndicatorSettings,
    pub scoring: ScoringPolicy,
}

impl EngineSettings {
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.indicators.validate()?;
        self.scoring.ladder.validate()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub ma_periods: [usize; 4],
    pub macd: MacdParams,
    pub rsi: RsiParams,
    pub kdj: KdjParams,
    pub boll: BollParams,
    pub volume: VolumeParams,
    pub levels: LevelParams,
    pub pattern: PatternParams,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            ma_periods: [5, 10, 20, 60],
            macd: MacdParams::default(),
            rsi: RsiParams::default(),
            kdj: KdjParams::default(),
            boll: BollParams::default(),
            volume: VolumeParams::default(),
            levels: LevelParams::default(),
            pattern: PatternParams::default(),
        }
    }
}

impl IndicatorSettings {
    /// Band thresholds must be ordered, otherwise statuses contradict each other.
    pub fn validate(&self) -> Result<(), EngineError> {
        let rsi = &self.rsi;
        if !(rsi.oversold <= rsi.weak && rsi.weak < rsi.strong && rsi.strong <= rsi.overbought) {
            return Err(EngineError::ConfigError(format!(
                "RSI bands are not ordered: oversold={} weak={} strong={} overbought={}",
                rsi.oversold, rsi.weak, rsi.strong, rsi.overbought
            )));
        }
        if self.kdj.oversold >= self.kdj.overbought {
            return Err(EngineError::ConfigError(format!(
                "KDJ bands are not ordered: oversold={} overbought={}",
                self.kdj.oversold, self.kdj.overbought
            )));
        }
        if self.volume.light_ratio >= self.volume.heavy_ratio {
            return Err(EngineError::ConfigError(format!(
                "Volume ratios are not ordered: light_ratio={} heavy_ratio={}",
                self.volume.light_ratio, self.volume.heavy_ratio
            )));
        }
        if self.macd.fast >= self.macd.slow {
            return Err(EngineError::ConfigError(format!(
                "MACD fast period must be shorter than slow: fast={} slow={}",
                self.macd.fast, self.macd.slow
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
    /// How many candles back a cross still counts as "recent".
    pub cross_lookback: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams { fast: 12, slow: 26, signal: 9, cross_lookback: 10 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RsiParams {
    pub period: usize,
    pub overbought: f64,
    pub strong: f64,
    pub weak: f64,
    pub oversold: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams { period: 6, overbought: 80.0, strong: 60.0, weak: 40.0, oversold: 20.0 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct KdjParams {
    pub period: usize,
    pub k_smooth: usize,
    pub d_smooth: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for KdjParams {
    fn default() -> Self {
        KdjParams { period: 9, k_smooth: 3, d_smooth: 3, overbought: 80.0, oversold: 20.0 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BollParams {
    pub period: usize,
    pub k: f64,
}

impl Default for BollParams {
    fn default() -> Self {
        BollParams { period: 20, k: 2.0 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct VolumeParams {
    /// Number of candles before the latest one averaged as the baseline.
    pub baseline: usize,
    pub heavy_ratio: f64,
    pub light_ratio: f64,
}

impl Default for VolumeParams {
    fn default() -> Self {
        VolumeParams { baseline: 5, heavy_ratio: 1.5, light_ratio: 0.7 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LevelParams {
    pub short_window: usize,
    pub medium_window: usize,
}

impl Default for LevelParams {
    fn default() -> Self {
        LevelParams { short_window: 20, medium_window: 60 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PatternParams {
    /// Body size, in % of the previous close, that makes a big candle.
    pub big_body_pct: f64,
    /// Body size, as a fraction of the day's range, below which a candle is a doji.
    pub doji_body_ratio: f64,
    /// Wick length, as a multiple of the body, for hammer / shooting star shapes.
    pub wick_ratio: f64,
}

impl Default for PatternParams {
    fn default() -> Self {
        PatternParams { big_body_pct: 5.0, doji_body_ratio: 0.1, wick_ratio: 2.0 }
    }
}

/// Integer deltas and ladder cut points used by the scorer.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringPolicy {
    pub trend: i32,
    pub macd_cross: i32,
    pub macd_cross_confirmed: i32,
    pub macd_hist: i32,
    pub rsi_overbought: i32,
    pub rsi_strong: i32,
    pub rsi_weak: i32,
    pub rsi_oversold: i32,
    pub kdj_cross: i32,
    pub kdj_extreme: i32,
    pub boll_confirmed: i32,
    pub boll_unconfirmed: i32,
    pub volume_heavy: i32,
    pub volume_light: i32,
    /// Distance to a key level, in % of the close, inside which proximity counts.
    pub level_proximity_pct: f64,
    pub level_max: i32,
    pub level_broken: i32,
    pub ladder: ActionLadder,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            trend: 3,
            macd_cross: 2,
            macd_cross_confirmed: 3,
            macd_hist: 1,
            rsi_overbought: -2,
            rsi_strong: 1,
            rsi_weak: -1,
            rsi_oversold: 2,
            kdj_cross: 1,
            kdj_extreme: 1,
            boll_confirmed: 2,
            boll_unconfirmed: 1,
            volume_heavy: 2,
            volume_light: -1,
            level_proximity_pct: 3.0,
            level_max: 2,
            level_broken: 1,
            ladder: ActionLadder::default(),
        }
    }
}

/// Score cut points. Must satisfy `sell_low < sell_high < buy_low <= buy_high`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ActionLadder {
    pub buy_high: i32,
    pub buy_low: i32,
    pub sell_high: i32,
    pub sell_low: i32,
    /// Holders hit `reduce` this many points earlier than non-holders hit the negative band.
    pub holder_reduce_offset: i32,
}

impl Default for ActionLadder {
    fn default() -> Self {
        ActionLadder { buy_high: 6, buy_low: 3, sell_high: -3, sell_low: -6, holder_reduce_offset: 1 }
    }
}

impl ActionLadder {
    pub fn validate(&self) -> Result<(), EngineError> {
        let ordered = self.sell_low < self.sell_high && self.sell_high < self.buy_low && self.buy_low <= self.buy_high;
        let offset_ok = self.holder_reduce_offset >= 0 && self.sell_high + self.holder_reduce_offset < self.buy_low;
        if ordered && offset_ok {
            Ok(())
        } else {
            Err(EngineError::ConfigError(format!(
                "Action ladder cut points are not ordered: sell_low={} sell_high={} buy_low={} buy_high={} holder_reduce_offset={}",
                self.sell_low, self.sell_high, self.buy_low, self.buy_high, self.holder_reduce_offset
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let raw = r#"{ "indicators": { "rsi": { "period": 14 } }, "scoring": { "ladder": { "buy_high": 8 } } }"#;
        let settings = EngineSettings::from_json_str(raw).unwrap();
        assert_eq!(settings.indicators.rsi.period, 14);
        assert_eq!(settings.indicators.rsi.overbought, 80.0);
        assert_eq!(settings.indicators.macd, MacdParams::default());
        assert_eq!(settings.scoring.ladder.buy_high, 8);
        assert_eq!(settings.scoring.ladder.buy_low, 3);
        assert_eq!(settings.scoring.trend, 3);
    }

    #[test]
    fn test_invalid_settings_json() {
        let err = EngineSettings::from_json_str("{ not json").unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_ladder_validation() {
        assert!(ActionLadder::default().validate().is_ok());
        let broken = ActionLadder { sell_high: 4, ..ActionLadder::default() };
        assert!(broken.validate().is_err());
        let overlapping = ActionLadder { holder_reduce_offset: 6, ..ActionLadder::default() };
        assert!(overlapping.validate().is_err());
    }

    #[test]
    fn test_indicator_band_validation() {
        assert!(EngineSettings::default().validate().is_ok());

        let mut settings = IndicatorSettings::default();
        settings.rsi.oversold = 50.0;
        assert!(settings.validate().unwrap_err().to_string().contains("RSI bands"));

        let mut settings = IndicatorSettings::default();
        settings.kdj.oversold = 85.0;
        assert!(settings.validate().unwrap_err().to_string().contains("KDJ bands"));

        let mut settings = IndicatorSettings::default();
        settings.volume.light_ratio = 1.5;
        assert!(settings.validate().unwrap_err().to_string().contains("Volume ratios"));

        let mut settings = IndicatorSettings::default();
        settings.macd.fast = 30;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "indicators": {{ "volume": {{ "heavy_ratio": 2.0 }} }} }}"#).unwrap();
        let settings = EngineSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.indicators.volume.heavy_ratio, 2.0);
        assert_eq!(settings.indicators.volume.light_ratio, 0.7);
    }
}
