use super::*;

#[test]
fn new_board_has_32_pieces() {
    let board = Board::new();
    assert_eq!(board.occupied().count_ones(), 32);
    assert_eq!(board.occupancy(Color::White).count_ones(), 16);
    assert_eq!(board.occupancy(Color::Black).count_ones(), 16);
}

#[test]
fn new_board_side_to_move_is_white() {
    let board = Board::new();
    assert_eq!(board.side_to_move, Color::White);
}

#[test]
fn new_board_has_all_castling_rights() {
    let board = Board::new();
    assert!(board.has_kingside_castle(Color::White));
    assert!(board.has_queenside_castle(Color::White));
    assert!(board.has_kingside_castle(Color::Black));
    assert!(board.has_queenside_castle(Color::Black));
}

#[test]
fn piece_at_finds_starting_rooks() {
    let board = Board::new();
    assert_eq!(
        board.piece_at(Square::from_file_rank(0, 0)),
        Some((Color::White, Piece::Rook))
    );
    assert_eq!(
        board.piece_at(Square::from_file_rank(7, 7)),
        Some((Color::Black, Piece::Rook))
    );
}

#[test]
fn piece_at_is_none_on_empty_square() {
    let board = Board::new();
    assert_eq!(board.piece_at(Square::from_file_rank(3, 3)), None);
}

#[test]
fn king_square_matches_starting_position() {
    let board = Board::new();
    assert_eq!(board.king_square(Color::White), Square::from_file_rank(4, 0));
    assert_eq!(board.king_square(Color::Black), Square::from_file_rank(4, 7));
}

#[test]
fn set_bb_keeps_zobrist_in_sync() {
    let mut board = Board::new();
    let pawns = board.bb(Color::White, Piece::Pawn) & !(1u64 << 8);
    board.set_bb(Color::White, Piece::Pawn, pawns);
    board.assert_hash();
}

#[test]
fn has_major_pieces_false_for_bare_kings() {
    let mut board = Board::new_empty();
    board.set_bb(Color::White, Piece::King, 1u64 << 4);
    board.set_bb(Color::Black, Piece::King, 1u64 << 60);
    assert!(!board.has_major_pieces(Color::White));
    assert!(!board.has_major_pieces(Color::Black));
}

#[test]
fn repetition_count_starts_at_one() {
    let board = Board::new();
    assert_eq!(board.repetition_count(), 1);
    assert!(!board.is_threefold());
}

#[test]
fn validate_rejects_overlapping_bitboards() {
    let mut board = Board::new_empty();
    board.set_bb(Color::White, Piece::Pawn, 1);
    board.set_bb(Color::White, Piece::Knight, 1);
    assert!(board.validate().is_err());
}

#[test]
fn display_matches_to_fen() {
    let board = Board::new();
    assert_eq!(board.to_string(), board.to_fen());
}
