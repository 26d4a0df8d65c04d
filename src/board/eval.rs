//! Position evaluation.
//!
//! Score is incremental material + piece-square, maintained by
//! `eval_update` as moves are made and unmade. No tapering, no
//! additional positional terms.

use super::Board;

/// Tempo bonus (side to move advantage).
const TEMPO_BONUS: i32 = 10;

impl Board {
    /// Evaluate the position from the side-to-move's perspective, in centipawns.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        let stm_idx = self.current_color().index();
        let opp_idx = self.current_color().opponent().index();
        self.eval[stm_idx] - self.eval[opp_idx] + TEMPO_BONUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_near_symmetric() {
        let board = Board::new();
        assert_eq!(board.evaluate(), TEMPO_BONUS);
    }

    #[test]
    fn missing_queen_is_a_large_penalty() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K2Q w - - 0 1");
        let with_queen = board.evaluate();
        let mut board2 = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let without_queen = board2.evaluate();
        assert!(with_queen - without_queen > 800);
        let _ = (&mut board, &mut board2);
    }
}
