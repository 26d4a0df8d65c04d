//! Negamax alpha-beta search with quiescence, a transposition table, and
//! hash-move-first + MVV-LVA move ordering. Iterative deepening drives the
//! whole thing from the root.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::tt::BoundType;

use super::super::{Board, Move, MoveList, ScoredMoveList, MAX_PLY};
use super::constants::{CAPTURE_BASE_SCORE, MATE_THRESHOLD, MAX_QSEARCH_DEPTH, SCORE_INFINITE, TT_MOVE_SCORE};
use super::{SearchIterationInfo, SearchInfoCallback, SearchState, MATE_SCORE};

/// Per-search context threaded through every recursive call. Doesn't carry
/// heuristics beyond the hash table — no killers, history, or counter
/// moves, matching this engine's deliberately small move-ordering scheme.
struct Search<'a> {
    state: &'a mut SearchState,
    stop: &'a AtomicBool,
    start: Instant,
    hard_deadline_ms: u64,
    node_limit: u64,
    aborted: bool,
}

impl Search<'_> {
    fn time_up(&self) -> bool {
        if self.hard_deadline_ms == 0 {
            return false;
        }
        self.start.elapsed().as_millis() as u64 >= self.hard_deadline_ms
    }

    /// Polled at every recursive entry. Once tripped, stays tripped for the
    /// rest of this iteration so a partially-searched depth is discarded.
    fn should_abort(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.aborted = true;
            return true;
        }
        if self.node_limit != 0 && self.state.stats.total_nodes >= self.node_limit {
            self.aborted = true;
            return true;
        }
        // Node-count sampled clock check: cheap enough to do every node.
        if self.state.stats.total_nodes % 2048 == 0 && self.time_up() {
            self.aborted = true;
            return true;
        }
        false
    }
}

fn order_moves(board: &mut Board, state: &SearchState, moves: &MoveList, tt_move: Option<Move>) -> ScoredMoveList {
    let mut scored = ScoredMoveList::new();
    for mv in moves {
        let mv = *mv;
        let score = if Some(mv) == tt_move {
            TT_MOVE_SCORE
        } else if mv.is_capture() {
            CAPTURE_BASE_SCORE + state.tables.mvv_lva_score(board, &mv)
        } else {
            0
        };
        scored.push(mv, score);
    }
    scored.sort_by_score_desc();
    scored
}

fn mate_score_to_tt(score: i32, ply: u32) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn mate_score_from_tt(score: i32, ply: u32) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

fn quiesce(search: &mut Search, board: &mut Board, mut alpha: i32, beta: i32, qdepth: i32) -> i32 {
    search.state.stats.nodes += 1;
    search.state.stats.total_nodes += 1;

    let stand_pat = board.evaluate();
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }
    if qdepth >= MAX_QSEARCH_DEPTH {
        return alpha;
    }

    let captures = board.generate_tactical_moves();
    let ordered = order_moves(board, search.state, &captures, None);
    let mut best = alpha;

    for scored in ordered.iter() {
        if search.should_abort() {
            return best;
        }
        let (legal, info) = board.make_move(scored.mv);
        if !legal {
            board.unmake_move(scored.mv, info);
            continue;
        }
        let score = -quiesce(search, board, -beta, -best, qdepth + 1);
        board.unmake_move(scored.mv, info);

        if score >= beta {
            return beta;
        }
        if score > best {
            best = score;
        }
    }

    best
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    search: &mut Search,
    board: &mut Board,
    depth: u32,
    ply: u32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    if search.should_abort() {
        return alpha;
    }

    if ply > 0 && board.is_draw() {
        return 0;
    }

    let alpha_orig = alpha;
    let hash = board.hash();
    let mut tt_move = None;

    if let Some(entry) = search.state.tables.tt.probe(hash) {
        tt_move = entry.best_move();
        if entry.depth() >= depth {
            let score = mate_score_from_tt(entry.score(), ply);
            match entry.bound_type() {
                BoundType::Exact => return score,
                BoundType::LowerBound if score >= beta => return score,
                BoundType::UpperBound if score <= alpha => return score,
                _ => {}
            }
        }
    }

    if depth == 0 {
        return quiesce(search, board, alpha, beta, 0);
    }

    search.state.stats.nodes += 1;
    search.state.stats.total_nodes += 1;
    search.state.stats.seldepth = search.state.stats.seldepth.max(ply);

    let moves = board.generate_moves();
    if moves.is_empty() {
        return if board.is_in_check(board.current_color()) {
            -MATE_SCORE + ply as i32
        } else {
            0
        };
    }

    let ordered = order_moves(board, search.state, &moves, tt_move);
    let mut best_score = -SCORE_INFINITE;
    let mut best_move = None;

    for scored in ordered.iter() {
        if search.should_abort() {
            break;
        }
        let (legal, info) = board.make_move(scored.mv);
        if !legal {
            board.unmake_move(scored.mv, info);
            continue;
        }
        let score = -negamax(search, board, depth - 1, ply + 1, -beta, -alpha);
        board.unmake_move(scored.mv, info);

        if score > best_score {
            best_score = score;
            best_move = Some(scored.mv);
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    if !search.aborted {
        let bound_type = if best_score <= alpha_orig {
            BoundType::UpperBound
        } else if best_score >= beta {
            BoundType::LowerBound
        } else {
            BoundType::Exact
        };
        search.state.tables.tt.store(
            hash,
            depth,
            mate_score_to_tt(best_score, ply),
            bound_type,
            best_move,
            search.state.generation,
        );
    }

    best_score
}

/// Walk the transposition table from the root, following each position's
/// stored best move, to reconstruct the principal variation as a UCI move
/// string. Stops on a missing entry, a non-matching move, or a repeated
/// hash (to avoid looping on a draw-by-repetition PV).
fn extract_pv(board: &mut Board, state: &SearchState, first_move: Move) -> String {
    let mut pv = Vec::new();
    let mut undo = Vec::new();

    let (legal, info) = board.make_move(first_move);
    if !legal {
        board.unmake_move(first_move, info);
        return first_move.to_string();
    }
    pv.push(first_move);
    undo.push((first_move, info));

    for _ in 0..MAX_PLY {
        let Some(entry) = state.tables.tt.probe(board.hash()) else {
            break;
        };
        let Some(mv) = entry.best_move() else {
            break;
        };
        let legal_moves = board.generate_moves();
        if !legal_moves.iter().any(|m| m == &mv) {
            break;
        }
        let (legal, info) = board.make_move(mv);
        if !legal {
            board.unmake_move(mv, info);
            break;
        }
        pv.push(mv);
        undo.push((mv, info));
    }

    for (mv, info) in undo.into_iter().rev() {
        board.unmake_move(mv, info);
    }

    pv.iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run iterative deepening from depth 1 to `max_depth`, reporting each
/// completed iteration through `info_callback`. The first iteration always
/// runs to completion regardless of the time budget so a move is always
/// available; later iterations respect `time_limit_ms` (checked between
/// iterations) and `stop`/node limit (checked within a search via
/// `should_abort`).
pub(crate) fn iterative_deepening(
    board: &mut Board,
    state: &mut SearchState,
    max_depth: u32,
    time_limit_ms: u64,
    node_limit: u64,
    stop: &AtomicBool,
    info_callback: Option<SearchInfoCallback>,
) -> Option<Move> {
    state.new_search();
    let start = Instant::now();
    let mut best_move = None;

    for depth in 1..=max_depth.max(1) {
        let mut search = Search {
            state,
            stop,
            start,
            hard_deadline_ms: time_limit_ms,
            node_limit,
            aborted: false,
        };

        state.stats.reset_iteration();
        let score = negamax(&mut search, board, depth, 0, -SCORE_INFINITE, SCORE_INFINITE);
        let iteration_aborted = search.aborted;

        // A fully-aborted non-first iteration contributes nothing usable;
        // the previous iteration's move stands.
        if iteration_aborted && depth > 1 {
            break;
        }

        let moves = board.generate_moves();
        let iter_best = state
            .tables
            .tt
            .probe(board.hash())
            .and_then(|e| e.best_move())
            .filter(|mv| moves.iter().any(|m| m == mv))
            .or_else(|| moves.first());

        if let Some(mv) = iter_best {
            best_move = Some(mv);
        }

        if let Some(callback) = &info_callback {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            let nodes = state.stats.total_nodes;
            let nps = if elapsed_ms > 0 {
                nodes * 1000 / elapsed_ms
            } else {
                nodes
            };
            let mate_in = if score.abs() > MATE_THRESHOLD {
                let plies = MATE_SCORE - score.abs();
                Some(if score > 0 { (plies + 1) / 2 } else { -((plies + 1) / 2) })
            } else {
                None
            };
            let pv = best_move.map_or_else(String::new, |mv| extract_pv(board, state, mv));
            callback(&SearchIterationInfo {
                depth,
                nodes,
                nps,
                time_ms: elapsed_ms,
                score,
                mate_in,
                pv,
                seldepth: state.stats.seldepth,
                tt_hits: state.stats.tt_hits,
                hashfull: state.hashfull_per_mille(),
            });
        }

        if iteration_aborted {
            break;
        }
        if time_limit_ms != 0 && start.elapsed().as_millis() as u64 >= time_limit_ms {
            break;
        }
        if stop.load(Ordering::Relaxed) {
            break;
        }
    }

    best_move
}
