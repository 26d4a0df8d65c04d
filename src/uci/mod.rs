//! Universal Chess Interface (UCI) protocol implementation.
//!
//! Handles communication with chess GUIs following the UCI specification.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::board::{
    Board, FenError, Move, MoveParseError, SearchClock, SearchLimits, SearchState,
};

pub mod command;
pub mod options;
pub mod print;
pub mod report;
pub mod time;

use command::{parse_go_params, parse_uci_command, GoParams, UciCommand};
use options::{parse_setoption, UciOptions};

/// Error type for UCI position command parsing
#[derive(Debug, Clone)]
pub enum UciError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Invalid move in the move list
    InvalidMove { move_str: String, error: MoveParseError },
    /// Missing required parts in the command
    MissingParts,
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "Missing required parts in position command"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Parse a move in UCI format (e.g., "e2e4", "e7e8q").
///
/// Delegates to `Board::parse_move`. Returns `None` if the move is invalid.
#[must_use]
pub fn parse_uci_move(board: &mut Board, uci_string: &str) -> Option<Move> {
    board.parse_move(uci_string).ok()
}

/// Parse a UCI position command, returning an error on failure.
///
/// Supports both "position startpos" and "position fen <fen>" formats,
/// optionally followed by "moves <move1> <move2> ...".
pub fn try_parse_position_command(board: &mut Board, parts: &[&str]) -> Result<(), UciError> {
    let mut i = 1;

    if i >= parts.len() {
        return Err(UciError::MissingParts);
    }

    if parts[i] == "startpos" {
        *board = Board::new();
        i += 1;
    } else if parts[i] == "fen" {
        if i + 6 >= parts.len() {
            return Err(UciError::MissingParts);
        }
        let fen = parts[i + 1..i + 7].join(" ");
        *board = Board::try_from_fen(&fen)?;
        i += 7;
    } else {
        return Err(UciError::MissingParts);
    }

    if i < parts.len() && parts[i] == "moves" {
        i += 1;
        while i < parts.len() {
            let mv = board.parse_move(parts[i]).map_err(|e| UciError::InvalidMove {
                move_str: parts[i].to_string(),
                error: e,
            })?;
            let (_, _info) = board.make_move(mv);
            i += 1;
        }
    }

    Ok(())
}

/// Parse a UCI position command, printing errors to stderr on failure.
///
/// This is a convenience wrapper around `try_parse_position_command` for
/// use in the main UCI loop where errors should be logged but not propagated.
pub fn parse_position_command(board: &mut Board, parts: &[&str]) {
    if let Err(e) = try_parse_position_command(board, parts) {
        eprintln!("Error: {e}");
    }
}

#[must_use]
pub fn format_uci_move(mv: &Move) -> String {
    mv.to_string()
}

/// Maximum depth iterative deepening is allowed to reach when the
/// controller doesn't impose its own `depth` limit.
const MAX_SEARCH_DEPTH: u32 = 64;

/// Owns the position, the persistent search state, and the in-flight
/// search thread (if any). `stop`/`clock` are shared with that thread so
/// `stop` can interrupt it and `go` can compute fresh deadlines before
/// every search.
struct Engine {
    board: Board,
    state: Arc<Mutex<SearchState>>,
    options: UciOptions,
    debug: bool,
    stop: Arc<AtomicBool>,
    clock: Arc<SearchClock>,
    search_thread: Option<JoinHandle<()>>,
}

impl Engine {
    fn new() -> Self {
        let options = UciOptions::new();
        Engine {
            board: Board::new(),
            state: Arc::new(Mutex::new(SearchState::new(options.hash_mb))),
            options,
            debug: false,
            stop: Arc::new(AtomicBool::new(false)),
            clock: Arc::new(SearchClock::new(Instant::now(), None, None)),
            search_thread: None,
        }
    }

    /// Block until any in-flight search has returned. A search always
    /// prints its own `bestmove` line when it finishes, so no result is
    /// lost here — this only serializes the start/stop transition per the
    /// concurrency model's mutex requirement.
    fn join_search(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.search_thread.take() {
            let _ = handle.join();
        }
    }

    fn handle_uci(&self) {
        self.options.print();
    }

    fn handle_isready(&self) {
        report::print_ready();
    }

    fn handle_ucinewgame(&mut self) {
        self.join_search();
        self.board = Board::new();
        self.state.lock().reset_tables(self.options.hash_mb);
    }

    fn handle_position(&mut self, parts: &[String]) {
        self.join_search();
        let borrowed: Vec<&str> = parts.iter().map(String::as_str).collect();
        parse_position_command(&mut self.board, &borrowed);
    }

    fn handle_setoption(&mut self, parts: &[String]) {
        let borrowed: Vec<&str> = parts.iter().map(String::as_str).collect();
        let Some((name, value)) = parse_setoption(&borrowed) else {
            return;
        };
        let mut state = self.state.lock();
        if self.options.apply_setoption(&name, value.as_deref(), &mut state) {
            state.reset_tables(self.options.hash_mb);
        }
    }

    fn handle_debug(&mut self, arg: Option<&str>) {
        self.debug = matches!(arg, Some("on"));
    }

    fn run_perft(&mut self, depth: usize) {
        let start = Instant::now();
        let nodes = self.board.perft(depth);
        print::print_perft_info(depth, nodes, start.elapsed());
    }

    fn handle_go(&mut self, parts: &[String]) {
        self.join_search();
        let borrowed: Vec<&str> = parts.iter().map(String::as_str).collect();
        let params = parse_go_params(&borrowed);

        if let Some(depth) = params.perft {
            self.run_perft(depth);
            return;
        }

        let (soft_ms, hard_ms) = time_budget(&self.board, &params);
        let now = Instant::now();
        let soft_deadline = if soft_ms == 0 { None } else { Some(now + Duration::from_millis(soft_ms)) };
        let hard_deadline = if hard_ms == 0 { None } else { Some(now + Duration::from_millis(hard_ms)) };
        self.clock.reset(now, soft_deadline, hard_deadline);
        self.stop.store(false, Ordering::Relaxed);

        let max_depth = params.depth.unwrap_or(MAX_SEARCH_DEPTH);
        let node_limit = params.nodes.unwrap_or(0);
        let debug = self.debug;

        let mut board_clone = self.board.clone();
        let state = Arc::clone(&self.state);
        let limits = SearchLimits {
            clock: Arc::clone(&self.clock),
            stop: Arc::clone(&self.stop),
        };

        let handle = std::thread::spawn(move || {
            let info_callback: Option<crate::board::SearchInfoCallback> =
                Some(Arc::new(move |info: &crate::board::SearchIterationInfo| {
                    print::print_iteration_info(info);
                    if debug {
                        println!("info string depth {} nodes {}", info.depth, info.nodes);
                    }
                }));

            let mut guard = state.lock();
            let best_move = crate::board::find_best_move_with_time_info(
                &mut board_clone,
                &mut guard,
                &limits,
                max_depth,
                node_limit,
                info_callback,
            );
            drop(guard);
            report::print_bestmove(best_move);
        });

        self.search_thread = Some(handle);
    }

    fn handle_stop(&mut self) {
        self.join_search();
    }
}

/// Compute `(soft_ms, hard_ms)`, or `(0, 0)` for "no time limit" (depth- or
/// node-limited / infinite search runs until `stop`). `movetime` bypasses
/// the incremental formula entirely.
fn time_budget(board: &Board, params: &GoParams) -> (u64, u64) {
    if let Some(movetime) = params.movetime {
        return (movetime.max(1), movetime.max(1));
    }

    let (time_left, inc) = if board.white_to_move() {
        (params.wtime, params.winc)
    } else {
        (params.btime, params.binc)
    };

    match time_left {
        Some(time_left_ms) => {
            let movestogo = params.movestogo.and_then(|v| u32::try_from(v).ok());
            time::budget_ms(time_left_ms, inc.unwrap_or(0), movestogo)
        }
        None => (0, 0),
    }
}

/// Run the UCI command loop over stdin/stdout until `quit` or EOF.
///
/// Reads one line at a time, dispatches it to the engine, and exits with
/// code 0 on a clean `quit` (spec.md §6.1's stated exit contract) — errors
/// while handling a line are logged to stderr and otherwise swallowed,
/// never propagated as a process failure.
pub fn run_uci_loop() {
    let mut engine = Engine::new();
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading stdin: {e}");
                break;
            }
        };

        let Some(command) = parse_uci_command(&line) else {
            continue;
        };

        match command {
            UciCommand::Uci => engine.handle_uci(),
            UciCommand::IsReady => engine.handle_isready(),
            UciCommand::UciNewGame => engine.handle_ucinewgame(),
            UciCommand::Position(parts) => engine.handle_position(&parts),
            UciCommand::SetOption(parts) => engine.handle_setoption(&parts),
            UciCommand::Debug(arg) => engine.handle_debug(arg.as_deref()),
            UciCommand::Go(parts) => engine.handle_go(&parts),
            UciCommand::Stop => engine.handle_stop(),
            UciCommand::Quit => {
                engine.join_search();
                let _ = io::stdout().flush();
                std::process::exit(0);
            }
            UciCommand::Unknown(cmd) => {
                eprintln!("Unknown command: {cmd}");
            }
        }
        let _ = io::stdout().flush();
    }

    engine.join_search();
}
