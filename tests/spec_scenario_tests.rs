//! Literal search scenarios lifted from the reference test suite: fixed FEN,
//! fixed depth, required best move and/or score condition. These are narrower
//! than the tactical smoke tests in `tactical_tests.rs` — each row pins down
//! an exact move or exact score, not just a sign or rough magnitude.

use std::time::Duration;
use vantage::board::Board;
use vantage::moves::magic::loader::load_magic_tables;
use vantage::search::search::search;

const MATE_SCORE: i32 = 32000;
const ROOK_SCORE: i32 = 500;

#[test]
fn mate_in_one_rook_on_back_rank() {
    let fen = "7R/8/8/8/8/1K6/8/1k6 w - -";
    let mut board = Board::new();
    board.set_fen(fen).unwrap();
    let tables = load_magic_tables();

    let (score, best_move) = search(&mut board, &tables, 1, Some(Duration::from_secs(5)));

    let mv = best_move.expect("mate in one must be found");
    assert_eq!(mv.to_uci(), "h8h1");
    assert_eq!(score, MATE_SCORE - 1);
}

#[test]
fn mate_in_three_queen_sacrifice() {
    let fen = "5rk1/pb2npp1/1pq4p/5p2/5B2/1B6/P2RQ1PP/2r1R2K b - -";
    let mut board = Board::new();
    board.set_fen(fen).unwrap();
    let tables = load_magic_tables();

    let (score, best_move) = search(&mut board, &tables, 3, Some(Duration::from_secs(15)));

    let mv = best_move.expect("mate in three must be found");
    assert_eq!(mv.to_uci(), "c6g2");
    assert_eq!(score, MATE_SCORE - 3);
}

#[test]
fn queen_and_king_vs_king_and_rook_wins_material() {
    let fen = "k7/8/4r3/8/8/3Q4/4p3/K7 w - -";
    let mut board = Board::new();
    board.set_fen(fen).unwrap();
    let tables = load_magic_tables();

    let (score, best_move) = search(&mut board, &tables, 4, Some(Duration::from_secs(15)));

    let mv = best_move.expect("a winning move must be found");
    assert_eq!(mv.to_uci(), "d3d5");
    assert!(
        score > ROOK_SCORE,
        "expected score above a rook's value, got {score}"
    );
}

#[test]
fn avoids_stalemate_when_a_mating_move_exists() {
    let fen = "R1R5/7R/1k6/7R/8/P1P5/PKP5/1RP5 w - -";
    let mut board = Board::new();
    board.set_fen(fen).unwrap();
    let tables = load_magic_tables();

    let (score, best_move) = search(&mut board, &tables, 1, Some(Duration::from_secs(5)));

    let mv = best_move.expect("a legal mating move must be found");
    assert_eq!(mv.to_uci(), "b2a1");
    assert_eq!(score, MATE_SCORE - 1);
}

#[test]
fn does_not_throw_away_a_holdable_draw() {
    // Black to move; b6b5 walks into a line that's worse than just holding
    // the draw with any other legal move. The search must not prefer it.
    let fen = "R1R5/7R/1k6/7R/8/8/8/1K6 b - -";
    let mut board = Board::new();
    board.set_fen(fen).unwrap();
    let tables = load_magic_tables();

    let (_score, best_move) = search(&mut board, &tables, 1, Some(Duration::from_secs(5)));

    let mv = best_move.expect("legal moves exist in this position");
    assert_ne!(
        mv.to_uci(),
        "b6b5",
        "must not choose the move that throws away the draw"
    );
}
