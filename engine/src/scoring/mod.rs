// Scoring engine: turns an IndicatorSnapshot into a Suggestion.
pub mod ladder;
pub mod rules;

use crate::config::ScoringPolicy;
use shared::models::{Action, EvidenceItem, IndicatorSnapshot, Suggestion};
use std::cmp::Reverse;

const NO_DATA_SIGNAL: &str = "数据不足，暂无建议";
const NO_SIGNAL: &str = "暂无明显信号";
const HIGH_RISK_SIGNAL: &str = "空头排列、死叉叠加放量下跌，风险较高";

/// Pure function of `(snapshot, has_position, policy)`.
///
/// The score is the plain sum of evidence deltas. The high-risk combination
/// overrides the ladder; otherwise the action comes from the ladder. Evidence
/// is returned sorted by |delta| (stable, so ties keep evaluation order).
pub fn score(snapshot: &IndicatorSnapshot, has_position: bool, policy: &ScoringPolicy) -> Suggestion {
    if snapshot.is_empty() {
        return neutral(NO_DATA_SIGNAL);
    }

    let mut evidence = rules::evaluate(snapshot, policy);
    let total: i32 = evidence.iter().map(|e| e.delta).sum();

    let high_risk = rules::is_high_risk(snapshot);
    let action = if high_risk {
        ladder::high_risk_action(has_position)
    } else {
        ladder::map_score(total, has_position, &policy.ladder)
    };

    evidence.sort_by_key(|e| Reverse(e.delta.abs()));
    let signal = signal_text(&evidence, high_risk);

    Suggestion {
        action,
        action_label: action.label().to_string(),
        score: total,
        signal,
        evidence,
    }
}

fn neutral(signal: &str) -> Suggestion {
    Suggestion {
        action: Action::Watch,
        action_label: Action::Watch.label().to_string(),
        score: 0,
        signal: signal.to_string(),
        evidence: Vec::new(),
    }
}

/// Top two evidence texts; the high-risk reason goes first when it applies.
fn signal_text(evidence: &[EvidenceItem], high_risk: bool) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if high_risk {
        parts.push(HIGH_RISK_SIGNAL);
    }
    parts.extend(evidence.iter().take(2).map(|e| e.text.as_str()));
    if parts.is_empty() {
        NO_SIGNAL.to_string()
    } else {
        parts.join("；")
    }
}
