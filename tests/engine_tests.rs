//! Integration tests for the search entry points exposed to the UCI layer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess_engine::board::{
    find_best_move, find_best_move_with_ponder, find_best_move_with_time, Board, SearchClock,
    SearchLimits, SearchState,
};

#[test]
fn engine_depth_search_returns_move() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);

    let best = find_best_move(&mut board, &mut state, 1, &stop);
    // At depth 1 we should always have at least one legal move from the starting position.
    assert!(best.is_some());
}

#[test]
fn engine_ponder_search_returns_legal_ponder_move() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);

    let result = find_best_move_with_ponder(&mut board, &mut state, 3, &stop);
    assert!(result.best_move.is_some());
    // The ponder move is a reply to best_move; it may be absent if the TT
    // entry for that position was never populated, but when present it must
    // actually be legal there.
    if let Some(ponder) = result.ponder_move {
        let fen_before = board.to_fen();
        board.make_move_uci(&result.best_move.unwrap().to_string()).unwrap();
        let legal = board.generate_moves().iter().any(|m| *m == ponder);
        board = Board::from_fen(&fen_before);
        assert!(legal, "ponder move should be legal in the position after best_move");
    }
}

#[test]
fn engine_time_limited_search_returns_move_within_time() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);

    let now = Instant::now();
    let clock = Arc::new(SearchClock::new(
        now,
        Some(now + Duration::from_millis(50)),
        Some(now + Duration::from_millis(200)),
    ));
    let limits = SearchLimits {
        clock,
        stop: Arc::new(AtomicBool::new(false)),
    };

    let start = Instant::now();
    let best = find_best_move_with_time(&mut board, &mut state, &limits);
    let elapsed = start.elapsed();

    assert!(best.is_some(), "time-limited search should still return a move");
    assert!(elapsed < Duration::from_secs(2), "search overran its deadline: {elapsed:?}");
}

#[test]
fn stop_flag_aborts_search_promptly() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(true);

    // A search that starts with `stop` already set should bail out after the
    // mandatory depth-1 iteration rather than deepening further.
    let best = find_best_move(&mut board, &mut state, 64, &stop);
    assert!(best.is_some());

    stop.store(false, Ordering::Relaxed);
}
