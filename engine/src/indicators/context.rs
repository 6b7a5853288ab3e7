// K-line history context: multi-horizon returns, volatility and range position.
use shared::models::{BreakoutState, Candle, HistoryContext, IndicatorSnapshot, Trend, TrendState};
use shared::utils::{pct_change, sample_stdev};

const RANGE_WINDOW: usize = 20;
const NEAR_HIGH: f64 = 0.998;
const NEAR_LOW: f64 = 1.002;

/// Built from the same candles as `snapshot`; trend and medium-tier levels are
/// taken from the snapshot instead of being recomputed.
pub fn history_context(data: &[Candle], snapshot: &IndicatorSnapshot) -> HistoryContext {
    let Some(latest) = data.last() else {
        return HistoryContext::default();
    };
    let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
    let n = closes.len();
    let current = latest.close;
    let ret = |days: usize| if n > days { pct_change(Some(current), Some(closes[n - 1 - days])) } else { None };

    let daily_returns: Vec<f64> = closes
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect();
    let volatility_20d = sample_stdev(&daily_returns[daily_returns.len().saturating_sub(RANGE_WINDOW)..]);

    let recent = &data[n.saturating_sub(RANGE_WINDOW)..];
    let high_20d = recent.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low_20d = recent.iter().map(|c| c.low).fold(f64::MAX, f64::min);

    let breakout_state = if current >= high_20d * NEAR_HIGH {
        BreakoutState::NearHighBreakout
    } else if current <= low_20d * NEAR_LOW {
        BreakoutState::NearLowBreakdown
    } else {
        BreakoutState::None
    };

    let trend_state = match snapshot.trend {
        Some(Trend::BullishAligned) => TrendState::Bullish,
        Some(Trend::BearishAligned) => TrendState::Bearish,
        _ => TrendState::Neutral,
    };

    HistoryContext {
        available: true,
        as_of: Some(latest.date),
        trend_state,
        ret_5d: ret(5),
        ret_20d: ret(20),
        ret_60d: ret(60),
        volatility_20d,
        high_20d: Some(high_20d),
        low_20d: Some(low_20d),
        breakout_state,
        support_m: snapshot.support_m,
        resistance_m: snapshot.resistance_m,
    }
}
