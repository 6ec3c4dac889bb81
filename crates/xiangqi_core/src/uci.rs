//! Line protocol spoken with the engine process.
//!
//! [`EngineCommand`] formats outgoing lines, [`EngineMessage::parse`] classifies
//! incoming ones. Both are pure; sending and receiving happen elsewhere.

use std::fmt;

/// Where a `position` command starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartPosition {
    StartPos,
    Fen(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCommand {
    Uci,
    IsReady,
    SetOption { name: String, value: String },
    Stop,
    Position {
        start: StartPosition,
        moves: Vec<String>,
    },
    GoMoveTime(u64),
    Quit,
}

impl EngineCommand {
    pub fn multipv(lines: u32) -> Self {
        EngineCommand::SetOption {
            name: "MultiPV".to_string(),
            value: lines.to_string(),
        }
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCommand::Uci => f.write_str("uci"),
            EngineCommand::IsReady => f.write_str("isready"),
            EngineCommand::SetOption { name, value } => {
                write!(f, "setoption name {name} value {value}")
            }
            EngineCommand::Stop => f.write_str("stop"),
            EngineCommand::Position { start, moves } => {
                match start {
                    StartPosition::StartPos => f.write_str("position startpos")?,
                    StartPosition::Fen(fen) => write!(f, "position fen {fen}")?,
                }
                if !moves.is_empty() {
                    write!(f, " moves {}", moves.join(" "))?;
                }
                Ok(())
            }
            EngineCommand::GoMoveTime(ms) => write!(f, "go movetime {ms}"),
            EngineCommand::Quit => f.write_str("quit"),
        }
    }
}

/// Engine evaluation, relative to whichever side the producer chose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i32),
}

impl Score {
    /// The same score seen from the other side.
    pub fn flipped(self) -> Score {
        match self {
            Score::Centipawns(cp) => Score::Centipawns(cp.saturating_neg()),
            Score::Mate(n) => Score::Mate(n.saturating_neg()),
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Score::Centipawns(cp) => cp < 0,
            Score::Mate(n) => n < 0,
        }
    }

    /// Format for display, e.g. "+0.35", "-1.20", "M3" or "-M2".
    pub fn display(&self) -> String {
        match self {
            Score::Centipawns(cp) => {
                let pawns = *cp as f64 / 100.0;
                if *cp >= 0 {
                    format!("+{:.2}", pawns)
                } else {
                    format!("{:.2}", pawns)
                }
            }
            Score::Mate(n) => {
                if *n >= 0 {
                    format!("M{}", n)
                } else {
                    format!("-M{}", n.unsigned_abs())
                }
            }
        }
    }
}

/// Fields pulled out of an `info ... pv ...` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    /// Variation slot, 1 when the engine does not say.
    pub rank: u32,
    pub depth: Option<String>,
    pub score: Option<Score>,
    pub pv: Vec<String>,
}

impl SearchInfo {
    fn parse(tokens: &[&str]) -> Self {
        let mut info = SearchInfo {
            rank: 1,
            depth: None,
            score: None,
            pv: Vec::new(),
        };

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                "multipv" => {
                    if let Some(n) = tokens.get(i + 1).and_then(|t| t.parse().ok()) {
                        info.rank = n;
                    }
                    i += 2;
                }
                "depth" => {
                    info.depth = tokens.get(i + 1).map(|t| t.to_string());
                    i += 2;
                }
                "score" => match tokens.get(i + 1) {
                    Some(&"cp") => {
                        info.score = tokens
                            .get(i + 2)
                            .and_then(|t| t.parse().ok())
                            .map(Score::Centipawns);
                        i += 3;
                    }
                    Some(&"mate") => {
                        info.score = tokens
                            .get(i + 2)
                            .and_then(|t| t.parse().ok())
                            .map(Score::Mate);
                        i += 3;
                    }
                    _ => i += 1,
                },
                "pv" => {
                    info.pv = tokens[i + 1..].iter().map(|t| t.to_string()).collect();
                    break;
                }
                _ => i += 1,
            }
        }
        info
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineMessage {
    /// `uciok`
    EngineReady,
    /// `readyok`
    SyncAck,
    SearchInfo(SearchInfo),
    BestMove { mv: String, ponder: Option<String> },
    Unrecognized(String),
}

impl EngineMessage {
    /// Classify one line of engine output. Never fails; anything unexpected
    /// comes back as [`EngineMessage::Unrecognized`].
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.first().copied() {
            Some("uciok") if tokens.len() == 1 => EngineMessage::EngineReady,
            Some("readyok") if tokens.len() == 1 => EngineMessage::SyncAck,
            Some("info") if tokens.contains(&"pv") => {
                EngineMessage::SearchInfo(SearchInfo::parse(&tokens[1..]))
            }
            Some("bestmove") if tokens.len() >= 2 => {
                let ponder = match tokens.get(2) {
                    Some(&"ponder") => tokens.get(3).map(|t| t.to_string()),
                    _ => None,
                };
                EngineMessage::BestMove {
                    mv: tokens[1].to_string(),
                    ponder,
                }
            }
            _ => EngineMessage::Unrecognized(line.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
