// Scoring rules, one function per indicator category. Each matching rule adds
// one evidence item; a rule that does not match adds nothing.
use crate::config::ScoringPolicy;
use shared::models::{
    BollStatus, EvidenceItem, IndicatorSnapshot, KdjStatus, MacdCross, RsiStatus, Trend, VolumeTrend,
};

#[derive(Debug, Default)]
struct Ledger {
    items: Vec<EvidenceItem>,
}

impl Ledger {
    fn push(&mut self, tag: &str, text: impl Into<String>, delta: i32, details: Option<String>) {
        if delta == 0 {
            return;
        }
        self.items.push(EvidenceItem { text: text.into(), tag: tag.to_string(), delta, details });
    }

    fn sum_of(&self, tags: &[&str]) -> i32 {
        self.items.iter().filter(|e| tags.contains(&e.tag.as_str())).map(|e| e.delta).sum()
    }
}

/// Evidence in evaluation order: trend, MACD, RSI, KDJ, Bollinger, volume, key levels.
pub fn evaluate(snap: &IndicatorSnapshot, policy: &ScoringPolicy) -> Vec<EvidenceItem> {
    let mut ledger = Ledger::default();
    trend(snap, policy, &mut ledger);
    macd(snap, policy, &mut ledger);
    rsi(snap, policy, &mut ledger);
    kdj(snap, policy, &mut ledger);
    boll(snap, policy, &mut ledger);
    volume(snap, policy, &mut ledger);
    key_levels(snap, policy, &mut ledger);
    ledger.items
}

/// Bearish alignment, a recent dead cross and a heavy-volume down day together.
pub fn is_high_risk(snap: &IndicatorSnapshot) -> bool {
    snap.trend == Some(Trend::BearishAligned)
        && snap.macd_cross == MacdCross::Dead
        && snap.volume_trend == Some(VolumeTrend::Heavy)
        && snap.change_pct.is_some_and(|c| c < 0.0)
}

fn trend(snap: &IndicatorSnapshot, policy: &ScoringPolicy, ledger: &mut Ledger) {
    let details = match (snap.ma5, snap.ma10, snap.ma20) {
        (Some(a), Some(b), Some(c)) => Some(format!("MA5 {:.2} / MA10 {:.2} / MA20 {:.2}", a, b, c)),
        _ => None,
    };
    match snap.trend {
        Some(Trend::BullishAligned) => ledger.push("trend", "均线多头排列", policy.trend, details),
        Some(Trend::BearishAligned) => ledger.push("trend", "均线空头排列", -policy.trend, details),
        Some(Trend::Tangled) | None => {}
    }
}

fn macd(snap: &IndicatorSnapshot, policy: &ScoringPolicy, ledger: &mut Ledger) {
    let Some(hist) = snap.macd_hist else {
        return;
    };
    let details = match (snap.macd, snap.macd_signal) {
        (Some(dif), Some(dea)) => Some(format!("DIF {:.3} / DEA {:.3} / 柱 {:.3}", dif, dea, hist)),
        _ => None,
    };
    let days = snap.macd_cross_days;
    match snap.macd_cross {
        MacdCross::Golden => {
            let delta = if hist > 0.0 { policy.macd_cross_confirmed } else { policy.macd_cross };
            ledger.push("macd", format!("MACD金叉（{}日内）", days + 1), delta, details);
        }
        MacdCross::Dead => {
            let delta = if hist < 0.0 { policy.macd_cross_confirmed } else { policy.macd_cross };
            ledger.push("macd", format!("MACD死叉（{}日内）", days + 1), -delta, details);
        }
        MacdCross::None if hist > 0.0 => ledger.push("macd", "MACD红柱", policy.macd_hist, details),
        MacdCross::None if hist < 0.0 => ledger.push("macd", "MACD绿柱", -policy.macd_hist, details),
        MacdCross::None => {}
    }
}

fn rsi(snap: &IndicatorSnapshot, policy: &ScoringPolicy, ledger: &mut Ledger) {
    let (Some(value), Some(status)) = (snap.rsi6, snap.rsi_status) else {
        return;
    };
    let details = Some(format!("RSI6 {:.1}", value));
    match status {
        RsiStatus::Overbought => ledger.push("rsi", "RSI超买，追高风险", policy.rsi_overbought, details),
        RsiStatus::Strong => ledger.push("rsi", "RSI强势区", policy.rsi_strong, details),
        RsiStatus::Weak => ledger.push("rsi", "RSI弱势区", policy.rsi_weak, details),
        RsiStatus::Oversold => ledger.push("rsi", "RSI超卖，存在反弹机会", policy.rsi_oversold, details),
        RsiStatus::Neutral => {}
    }
}

fn kdj(snap: &IndicatorSnapshot, policy: &ScoringPolicy, ledger: &mut Ledger) {
    let Some(status) = snap.kdj_status else {
        return;
    };
    let details = match (snap.kdj_k, snap.kdj_d, snap.kdj_j) {
        (Some(k), Some(d), Some(j)) => Some(format!("K {:.1} / D {:.1} / J {:.1}", k, d, j)),
        _ => None,
    };
    match status {
        KdjStatus::GoldenCross => ledger.push("kdj", "KDJ金叉", policy.kdj_cross, details),
        KdjStatus::DeadCross => ledger.push("kdj", "KDJ死叉", -policy.kdj_cross, details),
        KdjStatus::Overbought => ledger.push("kdj", "KDJ超买", -policy.kdj_extreme, details),
        KdjStatus::Oversold => ledger.push("kdj", "KDJ超卖", policy.kdj_extreme, details),
        KdjStatus::Neutral => {}
    }
}

fn boll(snap: &IndicatorSnapshot, policy: &ScoringPolicy, ledger: &mut Ledger) {
    let heavy = snap.volume_trend == Some(VolumeTrend::Heavy);
    match snap.boll_status {
        Some(BollStatus::BrokeUpper) => {
            let details = snap.boll_upper.map(|u| format!("上轨 {:.2}", u));
            if heavy {
                ledger.push("boll", "放量突破布林上轨", policy.boll_confirmed, details);
            } else {
                ledger.push("boll", "突破布林上轨（量能未确认）", policy.boll_unconfirmed, details);
            }
        }
        Some(BollStatus::BrokeLower) => {
            let details = snap.boll_lower.map(|l| format!("下轨 {:.2}", l));
            if heavy {
                ledger.push("boll", "放量跌破布林下轨", -policy.boll_confirmed, details);
            } else {
                ledger.push("boll", "跌破布林下轨（量能未确认）", -policy.boll_unconfirmed, details);
            }
        }
        Some(BollStatus::Inside) | None => {}
    }
}

/// Heavy volume is booked as its own item in the direction of trend + MACD,
/// so the total stays a plain sum.
fn volume(snap: &IndicatorSnapshot, policy: &ScoringPolicy, ledger: &mut Ledger) {
    let Some(trend) = snap.volume_trend else {
        return;
    };
    let details = snap.volume_ratio.map(|r| format!("量比 {:.2}", r));
    match trend {
        VolumeTrend::Heavy => {
            let prevailing = ledger.sum_of(&["trend", "macd"]);
            if prevailing > 0 {
                ledger.push("volume", "放量配合上攻", policy.volume_heavy, details);
            } else if prevailing < 0 {
                ledger.push("volume", "放量下跌", -policy.volume_heavy, details);
            }
        }
        VolumeTrend::Light => ledger.push("volume", "缩量，信号可靠性下降", policy.volume_light, details),
        VolumeTrend::Normal => {}
    }
}

fn key_levels(snap: &IndicatorSnapshot, policy: &ScoringPolicy, ledger: &mut Ledger) {
    let Some(close) = snap.close else {
        return;
    };
    if close <= 0.0 {
        return;
    }
    let (support, resistance, tier) = match (snap.support_m, snap.resistance_m, snap.support, snap.resistance) {
        (Some(s), Some(r), _, _) => (s, r, "中期"),
        (_, _, Some(s), Some(r)) => (s, r, "短期"),
        _ => return,
    };
    if resistance <= support {
        return;
    }

    if close > resistance {
        let details = Some(format!("压力 {:.2}", resistance));
        ledger.push("level", format!("突破{}压力位", tier), policy.level_broken, details);
        return;
    }
    if close < support {
        let details = Some(format!("支撑 {:.2}", support));
        ledger.push("level", format!("跌破{}支撑位", tier), -policy.level_broken, details);
        return;
    }

    let to_support = (close - support) / close * 100.0;
    if let Some(delta) = proximity_delta(to_support, policy) {
        let details = Some(format!("支撑 {:.2}，距离 {:.1}%", support, to_support));
        ledger.push("level", format!("接近{}支撑位", tier), delta, details);
    }
    let to_resistance = (resistance - close) / close * 100.0;
    if let Some(delta) = proximity_delta(to_resistance, policy) {
        let details = Some(format!("压力 {:.2}，距离 {:.1}%", resistance, to_resistance));
        ledger.push("level", format!("接近{}压力位", tier), -delta, details);
    }
}

/// Magnitude grows as the distance shrinks, from 1 at the edge of the window up to `level_max`.
fn proximity_delta(distance_pct: f64, policy: &ScoringPolicy) -> Option<i32> {
    if policy.level_max <= 0 || policy.level_proximity_pct <= 0.0 || distance_pct >= policy.level_proximity_pct {
        return None;
    }
    let closeness = 1.0 - distance_pct / policy.level_proximity_pct;
    let delta = (closeness * f64::from(policy.level_max)).ceil() as i32;
    Some(delta.clamp(1, policy.level_max))
}
