//! Multi-variation analysis display state.

use crate::types::Side;
use crate::uci::{Score, SearchInfo};

/// Number of variation slots tracked.
pub const MAX_LINES: usize = 3;

/// Moves shown after the first one in a line.
const CONTINUATION_LEN: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisLine {
    pub rank: u32,
    pub depth: Option<String>,
    /// Evaluation from Red's point of view.
    pub score: Option<Score>,
    pub moves: Vec<String>,
}

impl AnalysisLine {
    pub fn first_move(&self) -> Option<&str> {
        self.moves.first().map(String::as_str)
    }

    pub fn continuation(&self) -> String {
        self.moves
            .iter()
            .skip(1)
            .take(CONTINUATION_LEN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn score_text(&self) -> String {
        self.score.map(|s| s.display()).unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Analysis {
    lines: [Option<AnalysisLine>; MAX_LINES],
    depth: Option<String>,
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a search report for a position with `side_to_move` to play.
    ///
    /// Engine scores are relative to the side to move; stored scores are
    /// always from Red's side. Returns whether a slot was overwritten.
    pub fn update(&mut self, info: &SearchInfo, side_to_move: Side) -> bool {
        if info.rank == 1 && info.depth.is_some() {
            self.depth = info.depth.clone();
        }
        if info.pv.is_empty() || info.rank < 1 || info.rank as usize > MAX_LINES {
            return false;
        }

        let score = info.score.map(|s| match side_to_move {
            Side::Red => s,
            Side::Black => s.flipped(),
        });
        self.lines[info.rank as usize - 1] = Some(AnalysisLine {
            rank: info.rank,
            depth: info.depth.clone(),
            score,
            moves: info.pv.clone(),
        });
        true
    }

    pub fn line(&self, rank: usize) -> Option<&AnalysisLine> {
        rank.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .and_then(Option::as_ref)
    }

    pub fn lines(&self) -> impl Iterator<Item = &AnalysisLine> {
        self.lines.iter().flatten()
    }

    pub fn depth(&self) -> Option<&str> {
        self.depth.as_deref()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod analysis_tests;
