fn main() {
    chess_engine::uci::run_uci_loop();
}
