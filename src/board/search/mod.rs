//! Search module implementing iterative-deepening alpha-beta negamax.
//!
//! Move ordering is hash-move-first, then MVV-LVA on captures — no killers,
//! history, or counter-move heuristics. Quiescence extends the horizon with
//! captures only, using stand-pat as a lower bound.

mod constants;
pub mod log;
mod move_order;
mod negamax;

use parking_lot::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::tt::TranspositionTable;

use super::{Board, Move, Piece, MAX_PLY};

/// Result of a search containing best move and ponder move
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// The best move found
    pub best_move: Option<Move>,
    /// The expected opponent reply (for pondering)
    pub ponder_move: Option<Move>,
}

/// Default transposition table size in MB
pub const DEFAULT_TT_MB: usize = 64;

/// Mate score constant
pub(crate) const MATE_SCORE: i32 = constants::MATE_THRESHOLD + MAX_PLY as i32;

/// Statistics tracked during search
pub struct SearchStats {
    pub nodes: u64,
    pub seldepth: u32,
    pub total_nodes: u64,
    pub max_nodes: u64,
    pub tt_hits: u64,
}

impl SearchStats {
    pub fn reset_search(&mut self) {
        self.nodes = 0;
        self.seldepth = 0;
        self.total_nodes = 0;
        self.tt_hits = 0;
    }

    pub fn reset_iteration(&mut self) {
        self.nodes = 0;
        self.seldepth = 0;
    }
}

/// Tables used during search — just the transposition table and the
/// static MVV-LVA scorer. No killers, history, or counter moves.
pub struct SearchTables {
    pub tt: TranspositionTable,
}

impl SearchTables {
    /// MVV-LVA score for a capture move: value of the captured piece times
    /// ten, looked up from the board at the target square. En passant
    /// captures always take a pawn.
    #[must_use]
    pub fn mvv_lva_score(&self, board: &Board, mv: &Move) -> i32 {
        if !mv.is_capture() {
            return 0;
        }
        if mv.is_en_passant() {
            return move_order::piece_value(Piece::Pawn) * 10;
        }
        match board.piece_at(mv.to()) {
            Some((_, piece)) => move_order::piece_value(piece) * 10,
            None => 0,
        }
    }
}

/// Search state persisted across searches (the transposition table and
/// node/seldepth counters survive from one `go` to the next; only the
/// per-search stats are reset at the start of each search).
pub struct SearchState {
    pub stats: SearchStats,
    pub tables: SearchTables,
    pub generation: u16,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            stats: SearchStats {
                nodes: 0,
                seldepth: 0,
                total_nodes: 0,
                max_nodes: 0,
                tt_hits: 0,
            },
            tables: SearchTables {
                tt: TranspositionTable::new(tt_mb),
            },
            generation: 0,
        }
    }

    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.stats.reset_search();
    }

    pub fn set_max_nodes(&mut self, max_nodes: u64) {
        self.stats.max_nodes = max_nodes;
    }

    pub fn reset_tables(&mut self, tt_mb: usize) {
        self.tables.tt = TranspositionTable::new(tt_mb);
        self.stats.reset_search();
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tables.tt.hashfull_per_mille()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}

/// Time limits for a search
pub struct SearchLimits {
    pub clock: std::sync::Arc<SearchClock>,
    pub stop: std::sync::Arc<AtomicBool>,
}

/// Clock for tracking search time limits
pub struct SearchClock {
    start_time: Mutex<Instant>,
    soft_deadline: Mutex<Option<Instant>>,
    hard_deadline: Mutex<Option<Instant>>,
}

impl SearchClock {
    #[must_use]
    pub fn new(
        start_time: Instant,
        soft_deadline: Option<Instant>,
        hard_deadline: Option<Instant>,
    ) -> Self {
        SearchClock {
            start_time: Mutex::new(start_time),
            soft_deadline: Mutex::new(soft_deadline),
            hard_deadline: Mutex::new(hard_deadline),
        }
    }

    pub fn reset(
        &self,
        start_time: Instant,
        soft_deadline: Option<Instant>,
        hard_deadline: Option<Instant>,
    ) {
        let mut start = self.start_time.lock();
        *start = start_time;
        let mut soft = self.soft_deadline.lock();
        *soft = soft_deadline;
        let mut hard = self.hard_deadline.lock();
        *hard = hard_deadline;
    }

    #[must_use]
    pub fn snapshot(&self) -> (Instant, Option<Instant>, Option<Instant>) {
        let start_time = *self.start_time.lock();
        let soft_deadline = *self.soft_deadline.lock();
        let hard_deadline = *self.hard_deadline.lock();
        (start_time, soft_deadline, hard_deadline)
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub score: i32,
    pub mate_in: Option<i32>,
    pub pv: String,
    pub seldepth: u32,
    pub tt_hits: u64,
    pub hashfull: u32,
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Extract a ponder move by making the best move and probing the TT for the
/// opponent's expected reply, verified against that position's legal moves.
fn extract_ponder_move(board: &mut Board, state: &SearchState, best_move: Move) -> Option<Move> {
    let (_, info) = board.make_move(best_move);

    let ponder = state.tables.tt.probe(board.hash()).and_then(|entry| {
        entry.best_move().filter(|mv| {
            let moves = board.generate_moves();
            moves.iter().any(|m| m == mv)
        })
    });

    board.unmake_move(best_move, info);
    ponder
}

/// Run iterative deepening to a fixed depth, ignoring the clock.
pub fn find_best_move(
    board: &mut Board,
    state: &mut SearchState,
    max_depth: u32,
    stop: &AtomicBool,
) -> Option<Move> {
    negamax::iterative_deepening(board, state, max_depth, 0, 0, stop, None)
}

/// Run iterative deepening to a fixed depth, also extracting a ponder move.
pub fn find_best_move_with_ponder(
    board: &mut Board,
    state: &mut SearchState,
    max_depth: u32,
    stop: &AtomicBool,
) -> SearchResult {
    let best_move = find_best_move(board, state, max_depth, stop);
    let ponder_move = best_move.and_then(|mv| extract_ponder_move(board, state, mv));
    SearchResult { best_move, ponder_move }
}

/// Run iterative deepening under a soft time limit, honoring `limits.stop`
/// for external cancellation. The search always completes depth 1.
pub fn find_best_move_with_time(
    board: &mut Board,
    state: &mut SearchState,
    limits: &SearchLimits,
) -> Option<Move> {
    find_best_move_with_time_info(board, state, limits, 64, 0, None)
}

/// Like [`find_best_move_with_time`], but also extracts a ponder move.
pub fn find_best_move_with_time_and_ponder(
    board: &mut Board,
    state: &mut SearchState,
    limits: &SearchLimits,
) -> SearchResult {
    let best_move = find_best_move_with_time_info(board, state, limits, 64, 0, None);
    let ponder_move = best_move.and_then(|mv| extract_ponder_move(board, state, mv));
    SearchResult { best_move, ponder_move }
}

/// Run iterative deepening under a soft time limit, a max depth, a node
/// limit, and an optional per-iteration info callback. This is the entry
/// point the UCI `go` handler drives.
pub fn find_best_move_with_time_info(
    board: &mut Board,
    state: &mut SearchState,
    limits: &SearchLimits,
    max_depth: u32,
    node_limit: u64,
    info_callback: Option<SearchInfoCallback>,
) -> Option<Move> {
    let (_, soft_deadline, _) = limits.clock.snapshot();
    let time_limit_ms = soft_deadline.map_or(0, |d| {
        d.saturating_duration_since(Instant::now()).as_millis() as u64
    });
    negamax::iterative_deepening(
        board,
        state,
        max_depth,
        time_limit_ms,
        node_limit,
        &limits.stop,
        info_callback,
    )
}
