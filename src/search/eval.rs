//! Static evaluation: material, and, behind the `psqt` feature, tapered
//! piece-square tables interpolated between opening and endgame.

use crate::board::{Board, Color, Piece};
use crate::moves::magic::MagicTables;
#[cfg(feature = "psqt")]
use crate::search::pesto;
use crate::utils::pop_lsb;

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

// Phase weights: the remaining non-pawn material defines where on the
// opening-to-endgame spectrum the position sits.
const KNIGHT_PHASE: i32 = 1;
const BISHOP_PHASE: i32 = 1;
const ROOK_PHASE: i32 = 2;
const QUEEN_PHASE: i32 = 4;
const TOTAL_PHASE: i32 = 24;

fn calculate_phase(board: &Board) -> i32 {
    let knights = board.pieces(Piece::Knight, Color::White).count_ones()
        + board.pieces(Piece::Knight, Color::Black).count_ones();
    let bishops = board.pieces(Piece::Bishop, Color::White).count_ones()
        + board.pieces(Piece::Bishop, Color::Black).count_ones();
    let rooks = board.pieces(Piece::Rook, Color::White).count_ones()
        + board.pieces(Piece::Rook, Color::Black).count_ones();
    let queens = board.pieces(Piece::Queen, Color::White).count_ones()
        + board.pieces(Piece::Queen, Color::Black).count_ones();

    let current_phase_material = (knights as i32 * KNIGHT_PHASE)
        + (bishops as i32 * BISHOP_PHASE)
        + (rooks as i32 * ROOK_PHASE)
        + (queens as i32 * QUEEN_PHASE);

    current_phase_material.clamp(0, TOTAL_PHASE)
}

/// Flips a white-relative square index to read a table laid out a8..h1.
#[inline(always)]
pub fn mirror_vert(sq: u8) -> usize {
    (sq ^ 56) as usize
}

fn material_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

/// Flat, untapered material balance (white minus black), independent of the
/// `psqt` feature. This is the crate's evaluation floor.
pub fn eval_material(board: &Board) -> i32 {
    let mut score = 0;
    for piece_type in [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ] {
        let val = material_value(piece_type);
        let w = board.pieces(piece_type, Color::White).count_ones() as i32;
        let b = board.pieces(piece_type, Color::Black).count_ones() as i32;
        score += val * (w - b);
    }
    score
}

#[cfg(feature = "psqt")]
fn get_psqt(kind: Piece) -> (&'static [i32; 64], &'static [i32; 64]) {
    match kind {
        Piece::Pawn => (&pesto::PAWN_TABLE.0, &pesto::PAWN_TABLE.1),
        Piece::Knight => (&pesto::KNIGHT_TABLE.0, &pesto::KNIGHT_TABLE.1),
        Piece::Bishop => (&pesto::BISHOP_TABLE.0, &pesto::BISHOP_TABLE.1),
        Piece::Rook => (&pesto::ROOK_TABLE.0, &pesto::ROOK_TABLE.1),
        Piece::Queen => (&pesto::QUEEN_TABLE.0, &pesto::QUEEN_TABLE.1),
        Piece::King => (&pesto::KING_TABLE.0, &pesto::KING_TABLE.1),
    }
}

#[cfg(feature = "psqt")]
fn get_piece_value(kind: Piece) -> (i32, i32) {
    match kind {
        Piece::Pawn => pesto::PAWN_VAL,
        Piece::Knight => pesto::KNIGHT_VAL,
        Piece::Bishop => pesto::BISHOP_VAL,
        Piece::Rook => pesto::ROOK_VAL,
        Piece::Queen => pesto::QUEEN_VAL,
        Piece::King => pesto::KING_VAL,
    }
}

/// Debug helper: the PSQT-only component of [`pesto_eval`], tapered by phase.
#[cfg(feature = "psqt")]
pub fn eval_psqt(board: &Board) -> i32 {
    let mut mg_score = 0;
    let mut eg_score = 0;
    let phase = calculate_phase(board);

    for piece_type in [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        let (mg_table, eg_table) = get_psqt(piece_type);

        let mut w_bb = board.pieces(piece_type, Color::White);
        while w_bb != 0 {
            let sq = pop_lsb(&mut w_bb);
            let table_sq = mirror_vert(sq);
            mg_score += mg_table[table_sq];
            eg_score += eg_table[table_sq];
        }

        let mut b_bb = board.pieces(piece_type, Color::Black);
        while b_bb != 0 {
            let sq = pop_lsb(&mut b_bb);
            mg_score -= mg_table[sq as usize];
            eg_score -= eg_table[sq as usize];
        }
    }

    (mg_score * phase + eg_score * (TOTAL_PHASE - phase)) / TOTAL_PHASE
}

/// Tapered material + piece-square evaluation (PeSTO-style), white-relative.
#[cfg(feature = "psqt")]
pub fn pesto_eval(board: &Board) -> i32 {
    let mut mg_score = 0;
    let mut eg_score = 0;
    let phase = calculate_phase(board);

    for piece_type in [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        let (mg_val, eg_val) = get_piece_value(piece_type);
        let (mg_table, eg_table) = get_psqt(piece_type);

        let mut w_bb = board.pieces(piece_type, Color::White);
        while w_bb != 0 {
            let sq = pop_lsb(&mut w_bb);
            let table_sq = mirror_vert(sq);
            mg_score += mg_val + mg_table[table_sq];
            eg_score += eg_val + eg_table[table_sq];
        }

        let mut b_bb = board.pieces(piece_type, Color::Black);
        while b_bb != 0 {
            let sq = pop_lsb(&mut b_bb);
            mg_score -= mg_val + mg_table[sq as usize];
            eg_score -= eg_val + eg_table[sq as usize];
        }
    }

    (mg_score * phase + eg_score * (TOTAL_PHASE - phase)) / TOTAL_PHASE
}

/// Side-to-move-relative static evaluation. `tables`, `alpha` and `beta` are
/// accepted so callers in `search.rs` don't need a feature-gated call site;
/// a richer evaluator could use them for a lazy cutoff, but material+phase
/// alone is cheap enough that one doesn't pay for itself here.
pub fn static_eval(board: &Board, _tables: &MagicTables, _alpha: i32, _beta: i32) -> i32 {
    let side = board.side_to_move;
    let color_multiplier = if side == Color::White { 1 } else { -1 };

    #[cfg(feature = "psqt")]
    let score = pesto_eval(board);
    #[cfg(not(feature = "psqt"))]
    let score = eval_material(board);

    score * color_multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::loader::load_magic_tables;
    use std::str::FromStr;

    #[test]
    fn test_perspective_flip() {
        let board = Board::from_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("Invalid FEN");
        let tables = load_magic_tables();

        let white_eval = static_eval(&board, &tables, -i32::MAX, i32::MAX);

        let mut black_board = board.clone();
        black_board.side_to_move = Color::Black;
        let black_eval = static_eval(&black_board, &tables, -i32::MAX, i32::MAX);

        assert_eq!(white_eval, -black_eval, "Eval should be symmetric");
    }

    #[test]
    fn startpos_material_is_balanced() {
        let board = Board::new();
        assert_eq!(eval_material(&board), 0);
    }

    #[test]
    fn white_up_a_pawn_is_positive() {
        let board = Board::from_str("7k/8/8/8/8/8/P7/7K w - - 0 1").expect("Invalid FEN");
        assert_eq!(eval_material(&board), PAWN_VALUE);
    }
}
