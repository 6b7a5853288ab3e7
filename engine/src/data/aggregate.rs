// Rolls daily candles up into weekly / monthly candles.
use chrono::Datelike;
use shared::models::{Candle, TimeFrame};

fn bucket_key(candle: &Candle, timeframe: TimeFrame) -> (i32, u32) {
    match timeframe {
        TimeFrame::Day1 => (candle.date.year(), candle.date.ordinal()),
        TimeFrame::Week1 => {
            let week = candle.date.iso_week();
            (week.year(), week.week())
        }
        TimeFrame::Month1 => (candle.date.year(), candle.date.month()),
    }
}

/// Input must be ascending by date. Each bucket takes the first open, last
/// close, max high, min low and summed volume, and is dated by its last day.
pub fn aggregate(candles: &[Candle], timeframe: TimeFrame) -> Vec<Candle> {
    if timeframe == TimeFrame::Day1 {
        return candles.to_vec();
    }

    let mut out: Vec<Candle> = Vec::new();
    let mut current_key = None;
    for candle in candles {
        let key = bucket_key(candle, timeframe);
        match out.last_mut() {
            Some(bar) if current_key == Some(key) => {
                bar.date = candle.date;
                bar.high = bar.high.max(candle.high);
                bar.low = bar.low.min(candle.low);
                bar.close = candle.close;
                bar.volume += candle.volume;
            }
            _ => {
                out.push(candle.clone());
                current_key = Some(key);
            }
        }
    }
    tracing::debug!(?timeframe, input = candles.len(), output = out.len(), "Aggregated candles");
    out
}
