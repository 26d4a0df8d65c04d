use super::super::{Board, Color, Move, MoveList, Square, PROMOTION_PIECES};

impl Board {
    pub(crate) fn generate_pawn_moves(&self, from: Square) -> MoveList {
        let color = self.current_color();
        let mut moves = MoveList::new();
        let dir: isize = if color == Color::White { 1 } else { -1 };
        let start_rank = if color == Color::White { 1 } else { 6 };
        let promotion_rank = if color == Color::White { 7 } else { 0 };

        let r = from.rank() as isize;
        let f = from.file() as isize;

        let forward_r = r + dir;
        if (0..8).contains(&forward_r) {
            let forward_sq = Square::new(forward_r as usize, f as usize);
            if self.is_empty(forward_sq) {
                if forward_sq.rank() == promotion_rank {
                    for promo in PROMOTION_PIECES {
                        moves.push(Move::new_promotion(from, forward_sq, promo));
                    }
                } else {
                    moves.push(Move::quiet(from, forward_sq));
                    if r == start_rank as isize {
                        let double_forward_r = r + 2 * dir;
                        let double_forward_sq = Square::new(double_forward_r as usize, f as usize);
                        if self.is_empty(double_forward_sq) {
                            moves.push(Move::double_pawn_push(from, double_forward_sq));
                        }
                    }
                }
            }
        }

        if (0..8).contains(&forward_r) {
            for df in [-1, 1] {
                let capture_f = f + df;
                if (0..8).contains(&capture_f) {
                    let target_sq = Square::new(forward_r as usize, capture_f as usize);
                    if let Some((target_color, _)) = self.piece_at(target_sq) {
                        if target_color != color {
                            if target_sq.rank() == promotion_rank {
                                for promo in PROMOTION_PIECES {
                                    moves.push(Move::new_promotion_capture(from, target_sq, promo));
                                }
                            } else {
                                moves.push(Move::capture(from, target_sq));
                            }
                        }
                    } else if Some(target_sq) == self.en_passant_target {
                        moves.push(Move::en_passant(from, target_sq));
                    }
                }
            }
        }

        moves
    }

    pub(crate) fn generate_pawn_tactical_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.current_color();
        let dir: isize = if color == Color::White { 1 } else { -1 };
        let promotion_rank = if color == Color::White { 7 } else { 0 };

        let r = from.rank() as isize;
        let f = from.file() as isize;

        let forward_r = r + dir;

        if (0..8).contains(&forward_r) {
            let forward_sq = Square::new(forward_r as usize, f as usize);
            if forward_sq.rank() == promotion_rank && self.is_empty(forward_sq) {
                for promo in PROMOTION_PIECES {
                    moves.push(Move::new_promotion(from, forward_sq, promo));
                }
            }
        }

        if (0..8).contains(&forward_r) {
            for df in [-1, 1] {
                let capture_f = f + df;
                if (0..8).contains(&capture_f) {
                    let target_sq = Square::new(forward_r as usize, capture_f as usize);

                    if let Some((target_color, _)) = self.piece_at(target_sq) {
                        if target_color != color {
                            if target_sq.rank() == promotion_rank {
                                for promo in PROMOTION_PIECES {
                                    moves.push(Move::new_promotion_capture(from, target_sq, promo));
                                }
                            } else {
                                moves.push(Move::capture(from, target_sq));
                            }
                        }
                    } else if Some(target_sq) == self.en_passant_target {
                        moves.push(Move::en_passant(from, target_sq));
                    }
                }
            }
        }
    }
}
