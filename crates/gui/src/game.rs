//! Game controller: board, selection, analysis and engine bookkeeping.
//!
//! Every operation is synchronous and returns the engine commands it wants
//! sent; the application forwards them to the engine host.

use std::collections::VecDeque;

use xiangqi_core::{
    destinations, Analysis, Board, EngineCommand, EngineMessage, FenError, MoveLedger, MoveText,
    Side, Square, StartPosition,
};

use crate::settings::Settings;

/// Engine output lines kept for display.
pub const LOG_CAPACITY: usize = 500;

/// Connection state shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Connecting,
    Ready,
    Failed(String),
    Exited(Option<i32>),
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineStatus::Connecting => write!(f, "Connecting to engine..."),
            EngineStatus::Ready => write!(f, "Engine ready"),
            EngineStatus::Failed(err) => write!(f, "Error: {}", err),
            EngineStatus::Exited(Some(code)) => write!(f, "Engine exited with code {}", code),
            EngineStatus::Exited(None) => write!(f, "Engine exited"),
        }
    }
}

/// Player-facing options, seeded from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOptions {
    pub play_vs_engine: bool,
    pub auto_analyze: bool,
    pub engine_side: Side,
    pub think_time_ms: u64,
    pub multipv: u32,
}

impl From<&Settings> for PlayOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            play_vs_engine: settings.play_vs_engine,
            auto_analyze: settings.auto_analyze,
            engine_side: settings.engine_side,
            think_time_ms: settings.think_time_ms,
            multipv: settings.multipv,
        }
    }
}

/// What the controller wants done after an engine line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EngineReaction {
    pub commands: Vec<EngineCommand>,
    /// Engine move to play after the reply delay.
    pub reply: Option<MoveText>,
}

/// Bounded engine output log, oldest lines dropped first.
#[derive(Debug, Clone, Default)]
pub struct EngineLog {
    lines: VecDeque<String>,
}

impl EngineLog {
    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Current state of the game and the engine session
#[derive(Debug, Clone)]
pub struct GameState {
    pub ledger: MoveLedger,
    /// Currently selected square (for move input)
    pub selected: Option<Square>,
    /// Pseudo-legal destinations from the selected square
    pub targets: Vec<Square>,
    pub analysis: Analysis,
    /// First move of the hovered variation
    pub hovered: Option<MoveText>,
    pub options: PlayOptions,
    pub engine_ready: bool,
    /// Board input is locked while the engine works on a move or hint
    pub thinking: bool,
    /// Transient activity note ("Engine thinking...")
    pub activity: String,
    pub engine_status: EngineStatus,
    pub log: EngineLog,
}

impl GameState {
    pub fn new(options: PlayOptions) -> Self {
        Self {
            ledger: MoveLedger::default(),
            selected: None,
            targets: Vec::new(),
            analysis: Analysis::new(),
            hovered: None,
            options,
            engine_ready: false,
            thinking: false,
            activity: String::new(),
            engine_status: EngineStatus::Connecting,
            log: EngineLog::default(),
        }
    }

    pub fn board(&self) -> &Board {
        self.ledger.board()
    }

    pub fn side_to_move(&self) -> Side {
        self.ledger.board().side_to_move
    }

    pub fn engine_to_move(&self) -> bool {
        self.options.play_vs_engine && self.side_to_move() == self.options.engine_side
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.targets.clear();
    }

    /// Handle a click on `sq`.
    ///
    /// Clicking a highlighted destination plays the move, clicking a piece of
    /// the side to move selects it, anything else clears the selection.
    /// Ignored while the engine is thinking or it is the engine's turn.
    pub fn select_square(&mut self, sq: Square) -> Vec<EngineCommand> {
        if self.thinking || self.engine_to_move() {
            return Vec::new();
        }

        if self.selected.is_some() && self.targets.contains(&sq) {
            if let Some(from) = self.selected {
                self.clear_selection();
                if self.ledger.apply(from, sq).is_some() {
                    return self.after_move();
                }
            }
            return Vec::new();
        }

        match self.board().piece_at(sq) {
            Some(piece) if piece.side == self.side_to_move() => {
                self.selected = Some(sq);
                self.targets = destinations(self.board(), sq);
            }
            _ => self.clear_selection(),
        }
        Vec::new()
    }

    /// Commands that follow any change of position: an engine reply when it
    /// is the engine's turn, otherwise analysis when enabled.
    fn after_move(&mut self) -> Vec<EngineCommand> {
        if self.engine_to_move() {
            self.request_engine_move()
        } else if self.options.auto_analyze {
            self.analyze()
        } else {
            Vec::new()
        }
    }

    fn position_command(&self) -> EngineCommand {
        let start = if self.ledger.starts_from_startpos() {
            StartPosition::StartPos
        } else {
            StartPosition::Fen(self.ledger.initial().to_fen())
        };
        EngineCommand::Position {
            start,
            moves: self.ledger.moves_text(),
        }
    }

    /// Stop any running search and search the current position.
    pub fn analyze(&mut self) -> Vec<EngineCommand> {
        if !self.engine_ready {
            return Vec::new();
        }
        vec![
            EngineCommand::Stop,
            self.position_command(),
            EngineCommand::GoMoveTime(self.options.think_time_ms),
        ]
    }

    pub fn request_engine_move(&mut self) -> Vec<EngineCommand> {
        if !self.engine_ready {
            return Vec::new();
        }
        self.thinking = true;
        self.activity = "Engine thinking...".to_string();
        self.analyze()
    }

    pub fn hint(&mut self) -> Vec<EngineCommand> {
        if !self.engine_ready {
            return Vec::new();
        }
        self.thinking = true;
        self.activity = "Calculating hint...".to_string();
        self.analyze()
    }

    /// Fold in one line of engine output.
    pub fn on_engine_line(&mut self, line: &str) -> EngineReaction {
        self.log.push(line);

        let mut reaction = EngineReaction::default();
        match EngineMessage::parse(line) {
            EngineMessage::EngineReady => {
                self.engine_ready = true;
                self.engine_status = EngineStatus::Ready;
                reaction.commands = vec![
                    EngineCommand::multipv(self.options.multipv),
                    EngineCommand::IsReady,
                ];
            }
            EngineMessage::SyncAck => {
                // A reply owed from before the handshake goes first.
                if self.engine_to_move() && !self.thinking {
                    reaction.commands = self.request_engine_move();
                } else if self.options.auto_analyze {
                    reaction.commands = self.analyze();
                }
            }
            EngineMessage::SearchInfo(info) => {
                self.analysis.update(&info, self.side_to_move());
            }
            EngineMessage::BestMove { mv, .. } => {
                self.thinking = false;
                self.activity.clear();
                // Any bestmove counts while it is the engine's turn; there is
                // no way to tell which search it answers.
                if self.engine_to_move() {
                    reaction.reply = MoveText::parse(&mv);
                    if reaction.reply.is_none() {
                        tracing::info!(%mv, "engine has no move to play");
                    }
                }
            }
            EngineMessage::Unrecognized(_) => {}
        }
        reaction
    }

    /// Play a move chosen by the engine. Ignored if its origin is empty.
    pub fn apply_engine_move(&mut self, mv: MoveText) -> Vec<EngineCommand> {
        if self.board().is_empty(mv.from) {
            tracing::debug!(%mv, "engine move origin is empty, ignoring");
            return Vec::new();
        }
        self.clear_selection();
        match self.ledger.apply_text(mv) {
            Some(_) => self.after_move(),
            None => Vec::new(),
        }
    }

    pub fn undo(&mut self) -> Vec<EngineCommand> {
        match self.ledger.undo() {
            Ok(Some(_)) => {
                self.clear_selection();
                if self.options.auto_analyze {
                    self.analyze()
                } else {
                    Vec::new()
                }
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "undo failed");
                Vec::new()
            }
        }
    }

    pub fn new_game(&mut self) -> Vec<EngineCommand> {
        self.start_from(Board::startpos())
    }

    /// Replace the game with one starting from `fen`.
    pub fn load_fen(&mut self, fen: &str) -> Result<Vec<EngineCommand>, FenError> {
        let board = Board::from_fen(fen.trim())?;
        Ok(self.start_from(board))
    }

    fn start_from(&mut self, board: Board) -> Vec<EngineCommand> {
        self.ledger.reset(board);
        self.clear_selection();
        self.analysis.clear();
        self.hovered = None;
        self.after_move()
    }

    /// Rewind or replay to the position after `ply` moves.
    pub fn jump_to(&mut self, ply: usize) -> Vec<EngineCommand> {
        self.ledger.jump_to(ply);
        self.clear_selection();
        self.after_move()
    }

    pub fn set_play_vs_engine(&mut self, on: bool) -> Vec<EngineCommand> {
        self.options.play_vs_engine = on;
        if on && self.engine_to_move() && !self.thinking {
            self.request_engine_move()
        } else {
            Vec::new()
        }
    }

    pub fn set_auto_analyze(&mut self, on: bool) -> Vec<EngineCommand> {
        self.options.auto_analyze = on;
        if on {
            self.analyze()
        } else {
            Vec::new()
        }
    }

    /// Accepts digits only; anything else leaves the think time unchanged.
    pub fn set_think_time(&mut self, input: &str) {
        if let Ok(ms) = input.trim().parse::<u64>() {
            self.options.think_time_ms = ms;
        }
    }

    /// Highlight the first move of variation `rank`, or clear with `None`.
    pub fn hover_line(&mut self, rank: Option<usize>) {
        self.hovered = rank
            .and_then(|r| self.analysis.line(r))
            .and_then(|line| line.first_move())
            .and_then(MoveText::parse);
    }

    pub fn engine_exited(&mut self, code: Option<i32>) {
        self.engine_ready = false;
        self.thinking = false;
        self.activity.clear();
        self.engine_status = EngineStatus::Exited(code);
    }

    pub fn engine_failed(&mut self, error: String) {
        self.engine_ready = false;
        self.thinking = false;
        self.activity.clear();
        self.engine_status = EngineStatus::Failed(error);
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
