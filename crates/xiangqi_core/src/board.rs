use crate::types::*;
use std::fmt;

pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

const CELLS: usize = ROWS as usize * COLS as usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 10 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 9 files")]
    RankWidth { rank: usize },
    #[error("invalid piece character '{0}'")]
    PieceChar(char),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("empty position string")]
    Empty,
}

/// 10x9 grid of optional pieces plus the side to move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; CELLS],
    pub side_to_move: Side,
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    pub fn empty(side_to_move: Side) -> Self {
        Self {
            cells: [None; CELLS],
            side_to_move,
        }
    }

    pub fn startpos() -> Self {
        let mut b = Board::empty(Side::Red);
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Advisor,
            PieceKind::King,
            PieceKind::Advisor,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, &kind) in back.iter().enumerate() {
            let col = col as u8;
            b.put(0, col, Piece::new(Side::Black, kind));
            b.put(9, col, Piece::new(Side::Red, kind));
        }
        for col in [1, 7] {
            b.put(2, col, Piece::new(Side::Black, PieceKind::Cannon));
            b.put(7, col, Piece::new(Side::Red, PieceKind::Cannon));
        }
        for col in (0..COLS).step_by(2) {
            b.put(3, col, Piece::new(Side::Black, PieceKind::Pawn));
            b.put(6, col, Piece::new(Side::Red, PieceKind::Pawn));
        }
        b
    }

    fn put(&mut self, row: u8, col: u8, pc: Piece) {
        self.cells[row as usize * COLS as usize + col as usize] = Some(pc);
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or(FenError::Empty)?;
        let side_to_move = match parts.next() {
            None | Some("w") | Some("r") => Side::Red,
            Some("b") => Side::Black,
            Some(other) => return Err(FenError::SideToMove(other.to_string())),
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != ROWS as usize {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut board = Board::empty(side_to_move);
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col: u32 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    col += d;
                } else {
                    let pc = Piece::from_fen_char(ch).ok_or(FenError::PieceChar(ch))?;
                    if col >= COLS as u32 {
                        return Err(FenError::RankWidth { rank: row });
                    }
                    board.put(row as u8, col as u8, pc);
                    col += 1;
                }
                if col > COLS as u32 {
                    return Err(FenError::RankWidth { rank: row });
                }
            }
            if col != COLS as u32 {
                return Err(FenError::RankWidth { rank: row });
            }
        }
        Ok(board)
    }

    /// Encode as a position string. The trailing fields are fixed placeholders.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(64);
        for row in 0..ROWS {
            let mut empty = 0;
            for col in 0..COLS {
                match self.cells[row as usize * COLS as usize + col as usize] {
                    Some(pc) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(pc.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row < ROWS - 1 {
                fen.push('/');
            }
        }
        fen.push(' ');
        fen.push(self.side_to_move.fen_char());
        fen.push_str(" - - 0 1");
        fen
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    pub fn set_piece(&mut self, sq: Square, pc: Option<Piece>) {
        self.cells[sq.index()] = pc;
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    /// Occupied squares with their pieces, top rank first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|pc| (sq, pc)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            write!(f, "{} ", ROWS - 1 - row)?;
            for col in 0..COLS {
                let ch = self.cells[row as usize * COLS as usize + col as usize]
                    .map(Piece::fen_char)
                    .unwrap_or('.');
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h i")?;
        write!(f, "{} to move", self.side_to_move.name())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
