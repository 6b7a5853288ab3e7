// Candlestick shape tags for the latest candle. Best effort: no match means no tag.
use crate::config::PatternParams;
use shared::models::Candle;

pub fn detect(data: &[Candle], params: &PatternParams) -> Option<String> {
    let [.., prev, cur] = data else {
        return None;
    };
    let range = cur.high - cur.low;
    if range <= 0.0 || prev.close <= 0.0 {
        return None;
    }

    let body = (cur.close - cur.open).abs();
    let upper_wick = cur.high - cur.open.max(cur.close);
    let lower_wick = cur.open.min(cur.close) - cur.low;
    let is_up = cur.close > cur.open;

    let tag = if prev.close < prev.open && is_up && cur.open <= prev.close && cur.close >= prev.open {
        "阳包阴"
    } else if prev.close > prev.open && cur.close < cur.open && cur.open >= prev.close && cur.close <= prev.open {
        "阴包阳"
    } else if body / prev.close * 100.0 >= params.big_body_pct {
        if is_up { "大阳线" } else { "大阴线" }
    } else if body <= params.doji_body_ratio * range {
        "十字星"
    } else if lower_wick >= params.wick_ratio * body && upper_wick <= body {
        "锤子线"
    } else if upper_wick >= params.wick_ratio * body && lower_wick <= body {
        "射击之星"
    } else if range / prev.close * 100.0 >= 2.0 * params.big_body_pct {
        "大幅震荡"
    } else {
        return None;
    };
    Some(tag.to_string())
}
