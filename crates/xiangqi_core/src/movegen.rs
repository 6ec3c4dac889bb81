//! Pseudo-legal move rules.
//!
//! Each piece kind maps to a [`Rule`]: a movement pattern plus the zone its
//! destinations are confined to. Generation looks only at current occupancy;
//! it never asks whether the mover's own king is left in check.

use crate::{board::Board, types::*};

type Delta = (i8, i8);

const ORTHOGONAL: [Delta; 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [Delta; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Elephant jumps paired with the midpoint that blocks them.
const BISHOP_LEAPS: [(Delta, Delta); 4] = [
    ((2, 2), (1, 1)),
    ((2, -2), (1, -1)),
    ((-2, 2), (-1, 1)),
    ((-2, -2), (-1, -1)),
];

/// Horse jumps paired with the orthogonal leg next to the origin.
const KNIGHT_LEAPS: [(Delta, Delta); 8] = [
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((2, -1), (1, 0)),
    ((2, 1), (1, 0)),
    ((-1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((1, 2), (0, 1)),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// One step along each delta.
    Step(&'static [Delta]),
    /// Jump to the first delta unless the second (the leg) is occupied.
    Leap(&'static [(Delta, Delta)]),
    /// Slide until the first occupied square, capturing an enemy there.
    Slide(&'static [Delta]),
    /// Slide over empty squares; capture only by jumping exactly one screen.
    Screen(&'static [Delta]),
    /// Forward one step, sideways too once past the river.
    March,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Board,
    Palace,
    OwnHalf,
}

impl Zone {
    fn admits(self, side: Side, sq: Square) -> bool {
        match self {
            Zone::Board => true,
            Zone::Palace => {
                (3..=5).contains(&sq.col)
                    && match side {
                        Side::Red => sq.row >= 7,
                        Side::Black => sq.row <= 2,
                    }
            }
            Zone::OwnHalf => side.owns_row(sq.row),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub zone: Zone,
}

pub fn rule(kind: PieceKind) -> Rule {
    let (pattern, zone) = match kind {
        PieceKind::King => (Pattern::Step(&ORTHOGONAL), Zone::Palace),
        PieceKind::Advisor => (Pattern::Step(&DIAGONAL), Zone::Palace),
        PieceKind::Bishop => (Pattern::Leap(&BISHOP_LEAPS), Zone::OwnHalf),
        PieceKind::Knight => (Pattern::Leap(&KNIGHT_LEAPS), Zone::Board),
        PieceKind::Rook => (Pattern::Slide(&ORTHOGONAL), Zone::Board),
        PieceKind::Cannon => (Pattern::Screen(&ORTHOGONAL), Zone::Board),
        PieceKind::Pawn => (Pattern::March, Zone::Board),
    };
    Rule { pattern, zone }
}

/// Destinations reachable by the piece on `from`. Empty if there is none.
pub fn destinations(board: &Board, from: Square) -> Vec<Square> {
    let mut out = Vec::with_capacity(17);
    destinations_into(board, from, &mut out);
    out
}

/// Same as [`destinations`], reusing the provided buffer.
pub fn destinations_into(board: &Board, from: Square, out: &mut Vec<Square>) {
    out.clear();
    let pc = match board.piece_at(from) {
        Some(p) => p,
        None => return,
    };
    let side = pc.side;
    let Rule { pattern, zone } = rule(pc.kind);
    let open = |to: Square| match board.piece_at(to) {
        None => true,
        Some(other) => other.side != side,
    };

    match pattern {
        Pattern::Step(deltas) => {
            for &(dr, dc) in deltas {
                if let Some(to) = from.offset(dr, dc) {
                    if zone.admits(side, to) && open(to) {
                        out.push(to);
                    }
                }
            }
        }
        Pattern::Leap(leaps) => {
            for &((dr, dc), (lr, lc)) in leaps {
                let to = match from.offset(dr, dc) {
                    Some(s) => s,
                    None => continue,
                };
                let blocked = from.offset(lr, lc).map_or(true, |leg| !board.is_empty(leg));
                if !blocked && zone.admits(side, to) && open(to) {
                    out.push(to);
                }
            }
        }
        Pattern::Slide(dirs) => {
            for &(dr, dc) in dirs {
                let mut cur = from;
                while let Some(to) = cur.offset(dr, dc) {
                    match board.piece_at(to) {
                        None => out.push(to),
                        Some(other) => {
                            if other.side != side {
                                out.push(to);
                            }
                            break;
                        }
                    }
                    cur = to;
                }
            }
        }
        Pattern::Screen(dirs) => {
            for &(dr, dc) in dirs {
                let mut cur = from;
                let mut screened = false;
                while let Some(to) = cur.offset(dr, dc) {
                    match board.piece_at(to) {
                        None if !screened => out.push(to),
                        None => {}
                        Some(_) if !screened => screened = true,
                        Some(other) => {
                            if other.side != side {
                                out.push(to);
                            }
                            break;
                        }
                    }
                    cur = to;
                }
            }
        }
        Pattern::March => {
            if let Some(to) = from.offset(side.forward(), 0) {
                if open(to) {
                    out.push(to);
                }
            }
            if !side.owns_row(from.row) {
                for dc in [-1, 1] {
                    if let Some(to) = from.offset(0, dc) {
                        if open(to) {
                            out.push(to);
                        }
                    }
                }
            }
        }
    }
}

/// Every pseudo-legal move for the side to move.
pub fn pseudo_moves(board: &Board) -> Vec<MoveText> {
    let mut out = Vec::with_capacity(64);
    let mut buf = Vec::with_capacity(17);
    for (from, pc) in board.pieces() {
        if pc.side != board.side_to_move {
            continue;
        }
        destinations_into(board, from, &mut buf);
        out.extend(buf.iter().map(|&to| MoveText::new(from, to)));
    }
    out
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
