//! FEN parsing and serialization.

use super::{Board, Color, Piece};
use crate::board::fen_tables::CHAR_TO_PC;
use crate::square::Square;

impl Board {
    /// Reset `self` from a FEN string, replacing all prior state.
    pub fn set_fen(&mut self, s: &str) -> Result<(), String> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(format!("FEN needs at least 4 fields, got {}", fields.len()));
        }

        let mut board = Board::new_empty();

        // 1. Piece placement
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(format!("FEN board needs 8 ranks, got {}", ranks.len()));
        }
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top;
            let mut file = 0usize;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                if file >= 8 {
                    return Err(format!("rank {} overflows 8 files", rank_from_top + 1));
                }
                if !ch.is_ascii() {
                    return Err(format!("invalid FEN piece char '{}'", ch));
                }
                let (piece, color) = CHAR_TO_PC[ch as usize]
                    .ok_or_else(|| format!("invalid FEN piece char '{}'", ch))?;
                let sq = Square::from_file_rank(file as u8, rank as u8);
                let bb = board.bb(color, piece) | (1u64 << sq.index());
                board.set_bb(color, piece, bb);
                file += 1;
            }
            if file != 8 {
                return Err(format!("rank {} does not sum to 8 files", rank_from_top + 1));
            }
        }

        // 2. Side to move
        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("invalid side to move '{}'", other)),
        };

        // 3. Castling rights
        let mut rights = 0u8;
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                rights |= match ch {
                    'K' => super::CASTLE_WK,
                    'Q' => super::CASTLE_WQ,
                    'k' => super::CASTLE_BK,
                    'q' => super::CASTLE_BQ,
                    other => return Err(format!("invalid castling char '{}'", other)),
                };
            }
        }
        board.castling_rights = rights;

        // 4. En passant target
        board.en_passant = match fields[3] {
            "-" => None,
            sq_str => Some(
                sq_str
                    .parse::<Square>()
                    .map_err(|_| format!("invalid en passant square '{}'", sq_str))?,
            ),
        };

        // 5/6. Halfmove clock / fullmove number (optional per the spec, default 0/1)
        board.halfmove_clock = fields
            .get(4)
            .map(|f| f.parse::<u32>())
            .transpose()
            .map_err(|_| "invalid halfmove clock".to_string())?
            .unwrap_or(0);
        board.fullmove_number = fields
            .get(5)
            .map(|f| f.parse::<u32>())
            .transpose()
            .map_err(|_| "invalid fullmove number".to_string())?
            .unwrap_or(1);

        board.validate()?;
        board.refresh_zobrist();
        board.history.clear();

        *self = board;
        Ok(())
    }

    /// Serialize the current position to FEN.
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut rank_str = String::new();
            let mut empty_run = 0u8;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            rank_str.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        rank_str.push(piece_char(color, piece));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                rank_str.push_str(&empty_run.to_string());
            }
            ranks.push(rank_str);
        }
        let placement = ranks.join("/");

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.has_kingside_castle(Color::White) {
            castling.push('K');
        }
        if self.has_queenside_castle(Color::White) {
            castling.push('Q');
        }
        if self.has_kingside_castle(Color::Black) {
            castling.push('k');
        }
        if self.has_queenside_castle(Color::Black) {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .en_passant
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            placement, side, castling, ep, self.halfmove_clock, self.fullmove_number
        )
    }
}

fn piece_char(color: Color, piece: Piece) -> char {
    let upper = match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    };
    match color {
        Color::White => upper,
        Color::Black => upper.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn start_position_round_trips() {
        let board = Board::new();
        assert_eq!(board.to_fen(), START_FEN);
    }

    #[test]
    fn parse_then_serialize_matches_input() {
        let mut board = Board::new_empty();
        board.set_fen(START_FEN).unwrap();
        assert_eq!(board.to_fen(), START_FEN);
    }

    #[test]
    fn en_passant_field_round_trips() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let mut board = Board::new_empty();
        board.set_fen(fen).unwrap();
        assert_eq!(board.en_passant.map(|s| s.to_string()), Some("d6".into()));
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn rejects_malformed_fen() {
        let mut board = Board::new_empty();
        assert!(board.set_fen("not a fen").is_err());
        assert!(board.set_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn castling_rights_subset_round_trips() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 4 10";
        let mut board = Board::new_empty();
        board.set_fen(fen).unwrap();
        assert!(board.has_kingside_castle(Color::White));
        assert!(!board.has_queenside_castle(Color::White));
        assert!(!board.has_kingside_castle(Color::Black));
        assert!(board.has_queenside_castle(Color::Black));
        assert_eq!(board.to_fen(), fen);
    }
}
