//! A small stateful facade over the free `search`/`alpha_beta` functions so
//! embedding code never has to construct a `SearchContext`/`TranspositionTable`
//! pair, or a `MagicTables` singleton, itself.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::board::Board;
use crate::error::EngineError;
use crate::moves::execute::{generate_legal, make_move_basic, undo_move_basic};
use crate::moves::magic::MagicTables;
use crate::moves::magic::loader::load_magic_tables;
use crate::moves::types::Move;
use crate::search::context::SearchContext;
use crate::search::search::{TimeManager, iterative_deepening};
use crate::search::tt::TranspositionTable;
use tracing::instrument;

const DEFAULT_TT_SIZE_MB: usize = 512;
/// Bound on how many plies the principal variation is walked out of the
/// transposition table; long enough for any reported line to be useful,
/// short enough that a pathological TT cycle can't loop forever.
const MAX_PV_LENGTH: usize = 64;

/// The narrow `think`/`setPosition`/`applyMove`/`clearTT`/`stop` surface that
/// embedding code (a UCI loop, a WASM binding, a test harness) drives without
/// touching search internals directly.
pub struct Engine {
    board: Board,
    tables: Arc<MagicTables>,
    tt: TranspositionTable,
    ctx: SearchContext,
    stop_flag: Arc<AtomicBool>,
}

impl Engine {
    /// A fresh engine at the starting position with an empty transposition table.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            tables: load_magic_tables(),
            tt: TranspositionTable::new(DEFAULT_TT_SIZE_MB),
            ctx: SearchContext::new(),
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the current position with the one described by `fen`.
    pub fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        let board = Board::from_str(fen).map_err(EngineError::ParseError)?;
        self.board = board;
        Ok(())
    }

    /// Reset to the standard starting position.
    pub fn set_start_position(&mut self) {
        self.board = Board::new();
    }

    /// Read access to the current position, e.g. to print its FEN.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play `mv` against the current position if it is in the legal move
    /// set; otherwise leave the board untouched and report `IllegalMove`.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), EngineError> {
        if !self.legal_moves().contains(&mv) {
            return Err(EngineError::IllegalMove(mv.to_uci()));
        }
        make_move_basic(&mut self.board, mv);
        Ok(())
    }

    /// Discard all transposition table entries, e.g. between unrelated games.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Arm the cooperative stop flag; a search already in progress notices it
    /// the next time it polls `TimeManager::check_time` and unwinds without
    /// corrupting the board (every make is paired with an unmake).
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Search the current position to `depth` plies, optionally bounded by
    /// `time_limit`, and return the best move, its score, and the principal
    /// variation reconstructed from the transposition table.
    #[instrument(skip(self), fields(depth))]
    pub fn think(
        &mut self,
        depth: i32,
        time_limit: Option<Duration>,
    ) -> (Option<Move>, i32, Vec<Move>) {
        self.stop_flag.store(false, Ordering::Relaxed);
        let mut time = TimeManager::with_stop_flag(time_limit, self.stop_flag.clone());

        let (score, best_move) = iterative_deepening(
            &mut self.board,
            &self.tables,
            &mut self.ctx,
            &mut self.tt,
            &mut time,
            depth,
        );

        let pv = best_move
            .map(|mv| self.extract_pv(mv))
            .unwrap_or_default();

        (best_move, score, pv)
    }

    /// Walk the transposition table's stored best moves from the current
    /// position, starting with `first`, to reconstruct the principal
    /// variation found by the last `think` call.
    fn extract_pv(&mut self, first: Move) -> Vec<Move> {
        let mut pv = vec![first];
        let mut scratch_board = self.board.clone();
        let mut undo = make_move_basic(&mut scratch_board, first);
        let mut moves = Vec::with_capacity(64);
        let mut scratch_moves = Vec::with_capacity(256);

        while pv.len() < MAX_PV_LENGTH {
            let Some((Some(next), _, _, _)) =
                self.tt.probe(scratch_board.zobrist, 0, -i32::MAX, i32::MAX, 0)
            else {
                break;
            };
            generate_legal(&mut scratch_board, &self.tables, &mut moves, &mut scratch_moves);
            if !moves.contains(&next) {
                break;
            }
            pv.push(next);
            undo_move_basic(&mut scratch_board, undo);
            undo = make_move_basic(&mut scratch_board, next);
        }
        undo_move_basic(&mut scratch_board, undo);

        pv
    }

    /// All legal moves of the side to move in the current position.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let mut scratch = Vec::with_capacity(256);
        generate_legal(&mut self.board, &self.tables, &mut moves, &mut scratch);
        moves
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_engine_starts_at_standard_position() {
        let engine = Engine::new();
        assert_eq!(
            engine.board().to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn set_position_rejects_malformed_fen() {
        let mut engine = Engine::new();
        assert!(engine.set_position("not a fen").is_err());
    }

    #[test]
    fn apply_move_rejects_illegal_move() {
        let mut engine = Engine::new();
        let mv = Move {
            from: crate::square::Square::from_index(12), // e2
            to: crate::square::Square::from_index(36),   // e5: three squares, no pawn can do this
            piece: crate::board::Piece::Pawn,
            promotion: None,
            flags: crate::moves::types::QUIET_MOVE,
        };
        assert!(engine.apply_move(mv).is_err());
        // the board is untouched
        assert_eq!(engine.board().side_to_move, crate::board::Color::White);
    }

    #[test]
    fn think_finds_mate_in_one() {
        let mut engine = Engine::new();
        engine.set_position("7R/8/8/8/8/1K6/8/1k6 w - -").unwrap();
        let (best_move, score, pv) = engine.think(1, Some(Duration::from_secs(5)));
        assert_eq!(best_move.map(|m| m.to_uci()), Some("h8h1".to_string()));
        assert!(score >= 30000);
        assert_eq!(pv.first().map(|m| m.to_uci()), Some("h8h1".to_string()));
    }

    #[test]
    fn clear_tt_does_not_panic_on_empty_table() {
        let mut engine = Engine::new();
        engine.clear_tt();
    }

    #[test]
    fn legal_moves_from_startpos_has_twenty_moves() {
        let mut engine = Engine::new();
        assert_eq!(engine.legal_moves().len(), 20);
    }
}
