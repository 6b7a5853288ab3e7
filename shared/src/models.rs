use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading period. Sequences are ascending by `date`; the engine does
/// not re-sort, de-duplicate or gap-fill them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub timeframe: TimeFrame,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TimeFrame {
    #[default]
    Day1,
    Week1,
    Month1,
}

impl TimeFrame {
    /// Accepts the interval spellings used by the dashboard (`1d`, `w`, `month`, ...).
    pub fn parse(interval: &str) -> Option<Self> {
        match interval.trim().to_lowercase().as_str() {
            "1d" | "d" | "day" => Some(TimeFrame::Day1),
            "1w" | "w" | "week" => Some(TimeFrame::Week1),
            "1m" | "m" | "month" => Some(TimeFrame::Month1),
            _ => None,
        }
    }
}

/// A named indicator line, one value per input candle (`None` until the window fills).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    BullishAligned,
    BearishAligned,
    Tangled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MacdCross {
    Golden,
    Dead,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiStatus {
    Overbought,
    Strong,
    Neutral,
    Weak,
    Oversold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdjStatus {
    GoldenCross,
    DeadCross,
    Overbought,
    Oversold,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BollStatus {
    BrokeUpper,
    BrokeLower,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTrend {
    Heavy,
    Light,
    Normal,
}

/// Everything the scorer and the UI read about the latest candle.
/// Recomputed from scratch on every call; `None` means "not enough history".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub as_of: Option<NaiveDate>,
    pub close: Option<f64>,
    pub change_pct: Option<f64>,

    pub trend: Option<Trend>,
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,

    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub macd_cross: MacdCross,
    pub macd_cross_days: u32,

    pub rsi6: Option<f64>,
    pub rsi_status: Option<RsiStatus>,

    pub kdj_k: Option<f64>,
    pub kdj_d: Option<f64>,
    pub kdj_j: Option<f64>,
    pub kdj_status: Option<KdjStatus>,

    pub boll_upper: Option<f64>,
    pub boll_mid: Option<f64>,
    pub boll_lower: Option<f64>,
    pub boll_width: Option<f64>,
    pub boll_status: Option<BollStatus>,

    pub volume_ratio: Option<f64>,
    pub volume_trend: Option<VolumeTrend>,

    pub amplitude: Option<f64>,
    pub amplitude_avg5: Option<f64>,

    /// Short tier (20 candles).
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    /// Medium tier (60 candles).
    pub support_m: Option<f64>,
    pub resistance_m: Option<f64>,

    pub kline_pattern: Option<String>,
    pub change_5d: Option<f64>,
    pub change_20d: Option<f64>,
    pub recent_5_up: u32,
}

impl IndicatorSnapshot {
    /// True when no indicator the scorer reads could be computed.
    pub fn is_empty(&self) -> bool {
        self.trend.is_none()
            && self.ma5.is_none()
            && self.macd_hist.is_none()
            && self.rsi6.is_none()
            && self.rsi_status.is_none()
            && self.kdj_status.is_none()
            && self.boll_status.is_none()
            && self.volume_trend.is_none()
            && self.support.is_none()
            && self.resistance.is_none()
            && self.support_m.is_none()
            && self.resistance_m.is_none()
    }
}

/// One scored contribution to a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub text: String,
    pub tag: String,
    pub delta: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Buy,
    Add,
    Reduce,
    Sell,
    Hold,
    Watch,
    Avoid,
}

impl Action {
    /// Label shown by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Action::Buy => "买入",
            Action::Add => "加仓",
            Action::Reduce => "减仓",
            Action::Sell => "卖出",
            Action::Hold => "持有",
            Action::Watch => "观望",
            Action::Avoid => "回避",
        }
    }

    /// Bearish-to-bullish rank: avoid/sell < reduce < watch < hold < add < buy.
    pub fn rank(self) -> u8 {
        match self {
            Action::Avoid | Action::Sell => 0,
            Action::Reduce => 1,
            Action::Watch => 2,
            Action::Hold => 3,
            Action::Add => 4,
            Action::Buy => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub action: Action,
    pub action_label: String,
    pub score: i32,
    pub signal: String,
    pub evidence: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrendState {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreakoutState {
    NearHighBreakout,
    NearLowBreakdown,
    #[default]
    None,
}

/// Multi-horizon K-line summary handed to the agents alongside the snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryContext {
    pub available: bool,
    pub as_of: Option<NaiveDate>,
    pub trend_state: TrendState,
    pub ret_5d: Option<f64>,
    pub ret_20d: Option<f64>,
    pub ret_60d: Option<f64>,
    /// Sample standard deviation of daily % returns.
    pub volatility_20d: Option<f64>,
    pub high_20d: Option<f64>,
    pub low_20d: Option<f64>,
    pub breakout_state: BreakoutState,
    pub support_m: Option<f64>,
    pub resistance_m: Option<f64>,
}
