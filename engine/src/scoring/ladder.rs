// Score-to-action ladder.
use crate::config::ActionLadder;
use shared::models::Action;

/// Monotonic in `total` for a fixed holding state. Holders use add / hold /
/// watch / reduce, non-holders buy / hold / watch / sell. Holders reach
/// `reduce` `holder_reduce_offset` points earlier than the leaning-negative cut.
pub fn map_score(total: i32, has_position: bool, ladder: &ActionLadder) -> Action {
    if total >= ladder.buy_high {
        if has_position { Action::Add } else { Action::Buy }
    } else if total >= ladder.buy_low {
        Action::Hold
    } else if has_position && total <= ladder.sell_high + ladder.holder_reduce_offset {
        Action::Reduce
    } else if !has_position && total <= ladder.sell_low {
        Action::Sell
    } else {
        Action::Watch
    }
}

/// Categorical override for the high-risk combination; holders are told to exit.
pub fn high_risk_action(has_position: bool) -> Action {
    if has_position { Action::Sell } else { Action::Avoid }
}
