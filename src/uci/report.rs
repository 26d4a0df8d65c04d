//! Terminal-response printers: the one-line answers the protocol requires
//! regardless of search outcome.

use crate::board::Move;

use super::format_uci_move;

pub fn print_ready() {
    println!("readyok");
}

pub fn print_bestmove(best_move: Option<Move>) {
    match best_move {
        Some(mv) => println!("bestmove {}", format_uci_move(&mv)),
        None => println!("bestmove 0000"),
    }
}
