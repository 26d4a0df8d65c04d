//! UCI option registration and `setoption` handling.

use crate::board::{SearchState, DEFAULT_TT_MB};

fn print_spin(name: &str, default: impl std::fmt::Display, min: impl std::fmt::Display, max: impl std::fmt::Display) {
    println!("option name {name} type spin default {default} min {min} max {max}");
}

fn print_button(name: &str) {
    println!("option name {name} type button");
}

/// Engine-level options this crate actually honors: hash size, a pinned
/// thread count accepted for GUI compatibility, and clear-hash.
pub struct UciOptions {
    pub hash_mb: usize,
    pub threads: usize,
}

impl UciOptions {
    #[must_use]
    pub fn new() -> Self {
        UciOptions {
            hash_mb: DEFAULT_TT_MB,
            threads: 1,
        }
    }

    pub fn print(&self) {
        println!("id name chess_engine");
        println!("id author the chess_engine contributors");
        print_spin("Hash", self.hash_mb, 1, 65536);
        print_spin("Threads", self.threads, 1, 256);
        print_button("Clear Hash");
        println!("uciok");
    }

    /// Apply a parsed `name`/`value` pair. Returns `true` if the
    /// transposition table needs to be reinitialized at `self.hash_mb`.
    pub fn apply_setoption(&mut self, name: &str, value: Option<&str>, state: &mut SearchState) -> bool {
        match name.trim().to_ascii_lowercase().as_str() {
            "hash" => {
                let mb = value.and_then(|v| v.parse::<usize>().ok()).unwrap_or(DEFAULT_TT_MB).max(1);
                if mb != self.hash_mb {
                    self.hash_mb = mb;
                    return true;
                }
                false
            }
            "threads" => {
                let threads = value.and_then(|v| v.parse::<usize>().ok()).unwrap_or(1).max(1);
                if threads > 1 {
                    #[cfg(feature = "logging")]
                    log::warn!("Threads={threads} requested, but this engine is single-threaded; ignoring");
                }
                self.threads = threads;
                false
            }
            "clear hash" => {
                state.reset_tables(self.hash_mb);
                false
            }
            _ => false,
        }
    }
}

impl Default for UciOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `setoption name <n> [value <v>]` token stream (the leading
/// `setoption` token already stripped by the caller).
#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.is_empty() || parts[0] != "setoption" {
        return None;
    }

    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() { None } else { Some(value_parts.join(" ")) };
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_value() {
        let parts: Vec<&str> = "setoption name Hash value 256".split_whitespace().collect();
        let (name, value) = parse_setoption(&parts).unwrap();
        assert_eq!(name, "Hash");
        assert_eq!(value.as_deref(), Some("256"));
    }

    #[test]
    fn parses_multi_word_name_without_value() {
        let parts: Vec<&str> = "setoption name Clear Hash".split_whitespace().collect();
        let (name, value) = parse_setoption(&parts).unwrap();
        assert_eq!(name, "Clear Hash");
        assert_eq!(value, None);
    }

    #[test]
    fn hash_setoption_requests_reinit_on_change() {
        let mut opts = UciOptions::new();
        let mut state = SearchState::new(1);
        assert!(opts.apply_setoption("Hash", Some("32"), &mut state));
        assert_eq!(opts.hash_mb, 32);
        assert!(!opts.apply_setoption("Hash", Some("32"), &mut state));
    }
}
