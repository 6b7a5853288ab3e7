// Presentation adapter: the compact badge and the text lines both views read
// from the same Suggestion / IndicatorSnapshot values.
use serde::Serialize;
use shared::models::{
    Action, BollStatus, IndicatorSnapshot, KdjStatus, MacdCross, RsiStatus, Suggestion, Trend, VolumeTrend,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Warning,
}

impl Tone {
    pub fn for_action(action: Action) -> Self {
        match action {
            Action::Buy | Action::Add => Tone::Positive,
            Action::Sell | Action::Reduce => Tone::Negative,
            Action::Avoid => Tone::Warning,
            Action::Hold | Action::Watch => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub action: Action,
    pub label: String,
    pub tone: Tone,
    pub score: i32,
}

impl Badge {
    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        Badge {
            action: suggestion.action,
            label: suggestion.action_label.clone(),
            tone: Tone::for_action(suggestion.action),
            score: suggestion.score,
        }
    }
}

fn trend_label(trend: Option<Trend>) -> &'static str {
    match trend {
        Some(Trend::BullishAligned) => "多头排列",
        Some(Trend::BearishAligned) => "空头排列",
        Some(Trend::Tangled) => "均线缠绕",
        None => "未知",
    }
}

fn macd_label(snap: &IndicatorSnapshot) -> String {
    match (snap.macd_cross, snap.macd_hist) {
        (MacdCross::Golden, _) => format!("金叉（{}日前）", snap.macd_cross_days),
        (MacdCross::Dead, _) => format!("死叉（{}日前）", snap.macd_cross_days),
        (MacdCross::None, Some(h)) if h > 0.0 => "红柱".to_string(),
        (MacdCross::None, Some(h)) if h < 0.0 => "绿柱".to_string(),
        (MacdCross::None, Some(_)) => "零轴".to_string(),
        (MacdCross::None, None) => "未知".to_string(),
    }
}

fn rsi_label(status: RsiStatus) -> &'static str {
    match status {
        RsiStatus::Overbought => "超买",
        RsiStatus::Strong => "强势",
        RsiStatus::Neutral => "中性",
        RsiStatus::Weak => "弱势",
        RsiStatus::Oversold => "超卖",
    }
}

fn kdj_label(status: KdjStatus) -> &'static str {
    match status {
        KdjStatus::GoldenCross => "金叉",
        KdjStatus::DeadCross => "死叉",
        KdjStatus::Overbought => "超买",
        KdjStatus::Oversold => "超卖",
        KdjStatus::Neutral => "中性",
    }
}

fn boll_label(status: BollStatus) -> &'static str {
    match status {
        BollStatus::BrokeUpper => "突破上轨",
        BollStatus::BrokeLower => "跌破下轨",
        BollStatus::Inside => "轨道内运行",
    }
}

fn volume_label(trend: VolumeTrend) -> &'static str {
    match trend {
        VolumeTrend::Heavy => "放量",
        VolumeTrend::Light => "缩量",
        VolumeTrend::Normal => "量能平稳",
    }
}

/// Report lines for one symbol; a line is left out when its inputs are missing.
pub fn technical_lines(snap: &IndicatorSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    if let (Some(ma5), Some(ma10), Some(ma20)) = (snap.ma5, snap.ma10, snap.ma20) {
        lines.push(format!("- 均线：MA5={:.2} MA10={:.2} MA20={:.2}", ma5, ma10, ma20));
    }
    if snap.trend.is_some() || snap.macd_hist.is_some() {
        lines.push(format!("- 趋势：{}，MACD {}", trend_label(snap.trend), macd_label(snap)));
    }
    if let Some(change_5d) = snap.change_5d {
        match snap.change_20d {
            Some(change_20d) => lines.push(format!("- 近期：5日{:+.1}% 20日{:+.1}%", change_5d, change_20d)),
            None => lines.push(format!("- 近期：5日{:+.1}%", change_5d)),
        }
    }
    if let Some(volume) = snap.volume_trend {
        let ratio = snap.volume_ratio.map(|r| format!("（量比{:.2}）", r)).unwrap_or_default();
        lines.push(format!("- 量能：{}{}", volume_label(volume), ratio));
    }
    match (snap.rsi6, snap.rsi_status) {
        (Some(rsi), Some(status)) => lines.push(format!("- RSI：{:.1}（{}）", rsi, rsi_label(status))),
        (Some(rsi), None) => lines.push(format!("- RSI：{:.1}", rsi)),
        _ => {}
    }
    if let Some(status) = snap.kdj_status {
        match (snap.kdj_k, snap.kdj_d, snap.kdj_j) {
            (Some(k), Some(d), Some(j)) => {
                lines.push(format!("- KDJ：{}（K={:.1} D={:.1} J={:.1}）", kdj_label(status), k, d, j))
            }
            _ => lines.push(format!("- KDJ：{}", kdj_label(status))),
        }
    }
    if let Some(status) = snap.boll_status {
        match (snap.boll_upper, snap.boll_lower) {
            (Some(upper), Some(lower)) => {
                lines.push(format!("- 布林：{}（上轨{:.2} 下轨{:.2}）", boll_label(status), upper, lower))
            }
            _ => lines.push(format!("- 布林：{}", boll_label(status))),
        }
    }
    if let Some(pattern) = &snap.kline_pattern {
        lines.push(format!("- 形态：{}", pattern));
    }
    if let Some(amplitude) = snap.amplitude {
        match snap.amplitude_avg5 {
            Some(avg) => lines.push(format!("- 振幅：{:.1}%（5日均{:.1}%）", amplitude, avg)),
            None => lines.push(format!("- 振幅：{:.1}%", amplitude)),
        }
    }
    match (snap.support_m, snap.resistance_m, snap.support, snap.resistance) {
        (Some(s), Some(r), _, _) => lines.push(format!("- 支撑压力：中期支撑{:.2} 中期压力{:.2}", s, r)),
        (_, _, Some(s), Some(r)) => lines.push(format!("- 支撑压力：支撑{:.2} 压力{:.2}", s, r)),
        _ => {}
    }
    lines
}

/// Headline followed by one line per evidence item, strongest first.
pub fn suggestion_lines(suggestion: &Suggestion) -> Vec<String> {
    let mut lines = vec![format!(
        "【{}】评分 {:+}：{}",
        suggestion.action_label, suggestion.score, suggestion.signal
    )];
    for item in &suggestion.evidence {
        match &item.details {
            Some(details) => lines.push(format!("  {:+} {}（{}）", item.delta, item.text, details)),
            None => lines.push(format!("  {:+} {}", item.delta, item.text)),
        }
    }
    lines
}
