//! Applied-move history with undo checkpoints and replay.

use crate::board::{Board, FenError};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// A move as it was applied: who moved what, and what it took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub side: Side,
}

impl Move {
    pub fn text(&self) -> MoveText {
        MoveText::new(self.from, self.to)
    }
}

/// Serialized snapshot of the board taken before a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRecord(String);

impl PositionRecord {
    fn capture(board: &Board) -> Self {
        Self(board.to_fen())
    }

    fn restore(&self) -> Result<Board, FenError> {
        Board::from_fen(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("undo checkpoint could not be decoded: {0}")]
    Checkpoint(#[from] FenError),
}

#[derive(Clone, Debug)]
pub struct MoveLedger {
    initial: Board,
    board: Board,
    moves: Vec<Move>,
    checkpoints: Vec<PositionRecord>,
}

impl Default for MoveLedger {
    fn default() -> Self {
        Self::new(Board::startpos())
    }
}

impl MoveLedger {
    pub fn new(initial: Board) -> Self {
        Self {
            board: initial.clone(),
            initial,
            moves: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn initial(&self) -> &Board {
        &self.initial
    }

    /// Whether the history starts from the standard opening position.
    pub fn starts_from_startpos(&self) -> bool {
        self.initial == Board::startpos()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn checkpoints(&self) -> &[PositionRecord] {
        &self.checkpoints
    }

    /// Compact notation for every applied move, oldest first.
    pub fn moves_text(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.text().to_string()).collect()
    }

    /// Move the piece on `from` to `to` without validating the move.
    ///
    /// Returns `None` and changes nothing if `from` is empty.
    pub fn apply(&mut self, from: Square, to: Square) -> Option<Move> {
        let piece = self.board.piece_at(from)?;
        let captured = self.board.piece_at(to);
        let side = self.board.side_to_move;

        self.checkpoints.push(PositionRecord::capture(&self.board));
        self.board.set_piece(from, None);
        self.board.set_piece(to, Some(piece));
        self.board.side_to_move = side.other();

        let mv = Move {
            from,
            to,
            piece,
            captured,
            side,
        };
        self.moves.push(mv);
        Some(mv)
    }

    pub fn apply_text(&mut self, mv: MoveText) -> Option<Move> {
        self.apply(mv.from, mv.to)
    }

    /// Restore the position before the most recent move.
    ///
    /// An empty history is a no-op and yields `Ok(None)`.
    pub fn undo(&mut self) -> Result<Option<Move>, LedgerError> {
        let record = match self.checkpoints.last() {
            Some(r) => r,
            None => {
                tracing::debug!("undo requested with empty history");
                return Ok(None);
            }
        };
        self.board = record.restore()?;
        self.checkpoints.pop();
        Ok(self.moves.pop())
    }

    /// Clear the history and start over from `initial`.
    pub fn reset(&mut self, initial: Board) {
        self.board = initial.clone();
        self.initial = initial;
        self.moves.clear();
        self.checkpoints.clear();
    }

    /// Rebuild the ledger keeping only the first `ply` moves.
    ///
    /// This replays from the initial position rather than rewinding, so every
    /// checkpoint is re-derived. Returns the number of moves kept.
    pub fn jump_to(&mut self, ply: usize) -> usize {
        let keep: Vec<MoveText> = self
            .moves
            .iter()
            .take(ply)
            .map(Move::text)
            .collect();
        let initial = self.initial.clone();
        self.reset(initial);
        for mv in keep {
            self.apply_text(mv);
        }
        self.moves.len()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;
