//! Integration tests for board state: perft correctness and draw detection.

use chess_engine::board::Board;

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(usize, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Initial Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depths: &[(1, 20), (2, 400), (3, 8902), (4, 197_281)],
    },
    TestPosition {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2039), (3, 97_862)],
    },
    TestPosition {
        name: "Endgame rook and pawns",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(1, 14), (2, 191), (3, 2812), (4, 43_238)],
    },
    TestPosition {
        name: "Promotions and castling",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        depths: &[(1, 6), (2, 264), (3, 9467)],
    },
    TestPosition {
        name: "Mixed tactics",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        depths: &[(1, 44), (2, 1486), (3, 62_379)],
    },
    TestPosition {
        name: "Discover promotion bugs",
        fen: "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        depths: &[(1, 24), (2, 496), (3, 9483)],
    },
];

#[test]
fn perft_positions() {
    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            let nodes = board.perft(depth);
            assert_eq!(
                nodes, expected,
                "Perft failed for {} at depth {}",
                position.name, depth
            );
        }
    }
}

#[test]
fn test_draw_detection_50_move() {
    // Halfmove clock already at 99; one more quiet move should push it to 100.
    let mut board = Board::from_fen("8/8/8/8/8/8/8/K6k w - - 99 1");
    assert!(!board.is_draw(), "Should not be a draw before the 50th move completes");

    board.make_move_uci("a1a2").expect("a1-a2 should be a legal quiet move");
    assert!(board.is_draw(), "Halfmove clock reaching 100 should be a draw");
}

#[test]
fn test_draw_detection_threefold_repetition() {
    let mut board = Board::new();
    for _ in 0..2 {
        board.make_move_uci("g1f3").unwrap();
        board.make_move_uci("g8f6").unwrap();
        board.make_move_uci("f3g1").unwrap();
        board.make_move_uci("f6g8").unwrap();
    }
    assert!(board.is_draw(), "Position repeated three times should be a draw");
}

#[test]
fn fen_round_trips_through_every_legal_move() {
    // Applying each legal move from a FEN, re-parsing the resulting FEN, and
    // replaying the same move from scratch should land on the same position —
    // make/unmake's derived quantities (hash, castling rights, clocks) are a
    // pure function of the move and the position it's applied to.
    let start_fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut board = Board::from_fen(start_fen);
    let moves = board.generate_moves();
    assert_eq!(moves.len(), 48, "Kiwipete has 48 legal moves for White");

    for m in &moves {
        let uci = m.to_string();

        let mut applied = Board::from_fen(start_fen);
        applied.make_move_uci(&uci).unwrap();
        let fen_after = applied.to_fen();

        let mut replayed = Board::from_fen(start_fen);
        replayed.make_move_uci(&uci).unwrap();
        assert_eq!(replayed.to_fen(), fen_after, "move {uci} should be deterministic");
    }
}
