//! Time management: turns the UCI `go` clock parameters into a soft/hard
//! millisecond budget for iterative deepening.

/// Assumed number of moves remaining when the controller doesn't send
/// `movestogo`.
const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Reserved for communication latency; never spent on thinking.
const MOVE_OVERHEAD_MS: u64 = 50;

/// Fraction of remaining time the soft limit may use.
const SOFT_TIME_PERCENT: u64 = 70;

/// Fraction of remaining time the hard limit may use.
const HARD_TIME_PERCENT: u64 = 90;

/// Compute `(soft_ms, hard_ms)` for an incremental time control.
///
/// `soft_ms` gates starting a new iterative-deepening depth; `hard_ms` is
/// the absolute ceiling a search unwinds at mid-iteration. Divides the
/// remaining clock by an assumed horizon (`moves_to_go`, or a default of
/// 30 plies), adds the increment, and caps both limits as percentages of
/// the clock so a single move can never exhaust it.
#[must_use]
pub fn budget_ms(time_left_ms: u64, increment_ms: u64, moves_to_go: Option<u32>) -> (u64, u64) {
    let safe_ms = time_left_ms.saturating_sub(MOVE_OVERHEAD_MS);
    if safe_ms == 0 {
        let fallback = (time_left_ms / 2).max(1);
        return (fallback, fallback);
    }

    let horizon = moves_to_go.map_or(DEFAULT_MOVES_TO_GO, u64::from).max(1);
    let base_ms = safe_ms / horizon + increment_ms;

    let soft_cap = safe_ms * SOFT_TIME_PERCENT / 100;
    let hard_cap = safe_ms * HARD_TIME_PERCENT / 100;

    let soft_ms = base_ms.min(soft_cap).max(1);
    let hard_ms = hard_cap.max(soft_ms).max(1);
    (soft_ms, hard_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movetime_is_handled_by_the_caller_not_here() {
        // budget_ms only models the incremental case; a fixed movetime
        // bypasses this function entirely in the go handler.
        let (soft, hard) = budget_ms(5000, 0, None);
        assert!(soft > 0);
        assert!(hard >= soft);
    }

    #[test]
    fn low_time_still_returns_a_positive_budget() {
        let (soft, hard) = budget_ms(10, 0, None);
        assert!(soft >= 1);
        assert!(hard >= 1);
    }

    #[test]
    fn movestogo_one_uses_most_of_the_clock() {
        let (soft, _hard) = budget_ms(60_000, 0, Some(1));
        assert!(soft > 10_000);
    }

    #[test]
    fn hard_never_less_than_soft() {
        for time_left in [100, 1_000, 10_000, 300_000, 600_000] {
            let (soft, hard) = budget_ms(time_left, 0, None);
            assert!(hard >= soft);
        }
    }

    #[test]
    fn more_time_yields_a_larger_budget() {
        let (soft_short, _) = budget_ms(10_000, 0, None);
        let (soft_long, _) = budget_ms(300_000, 0, None);
        assert!(soft_long > soft_short);
    }
}
