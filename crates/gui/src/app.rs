//! Main application state and logic

use std::time::Duration;

use crate::board::{self, BoardMessage};
use crate::game::GameState;
use crate::settings::Settings;
use crate::styles::{self, PANEL_WIDTH};

use engine_host::{EngineConfig, EngineEvent, EngineHandle};
use iced::futures::{SinkExt, Stream};
use iced::widget::{
    button, checkbox, column, container, horizontal_rule, mouse_area, row, scrollable, text,
    text_input, vertical_space, Column,
};
use iced::{Color, Element, Font, Length, Subscription, Task, Theme};
use xiangqi_core::{EngineCommand, MoveText, Side, MAX_LINES};

/// Progress of the engine worker subscription
#[derive(Debug, Clone)]
pub enum EngineUpdate {
    Connected(EngineHandle),
    Event(EngineEvent),
    Failed(String),
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Board interaction
    Board(BoardMessage),

    // Game controls
    NewGame,
    FlipBoard,
    Undo,
    Hint,
    PlayVsEngineToggled(bool),
    AutoAnalyzeToggled(bool),
    ThinkTimeChanged(String),
    FenInputChanged(String),
    LoadFen,
    JumpTo(usize),
    LineHovered(Option<usize>),

    // Engine
    Engine(EngineUpdate),
    PlayEngineMove(MoveText),
}

/// Main application state
pub struct XiangqiApp {
    game: GameState,
    engine: Option<EngineHandle>,
    engine_config: EngineConfig,
    reply_delay: Duration,
    /// Board flipped?
    flipped: bool,
    think_time_input: String,
    fen_input: String,
    fen_error: Option<String>,
}

/// Identifies the engine worker subscription
struct EngineWorker;

impl XiangqiApp {
    pub fn new(settings: Settings) -> (Self, Task<Message>) {
        let game = GameState::new((&settings).into());
        (
            Self {
                think_time_input: settings.think_time_ms.to_string(),
                game,
                engine: None,
                engine_config: settings.engine_config(),
                reply_delay: Duration::from_millis(settings.reply_delay_ms),
                flipped: false,
                fen_input: String::new(),
                fen_error: None,
            },
            Task::none(),
        )
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::run_with_id(
            std::any::TypeId::of::<EngineWorker>(),
            engine_worker(self.engine_config.clone()),
        )
    }

    fn send(&self, commands: Vec<EngineCommand>) {
        for cmd in commands {
            match &self.engine {
                Some(engine) => {
                    engine.send(&cmd);
                }
                None => tracing::debug!(%cmd, "no engine, command dropped"),
            }
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Board(BoardMessage::SquareClicked(sq)) => {
                let commands = self.game.select_square(sq);
                self.send(commands);
            }

            Message::NewGame => {
                let commands = self.game.new_game();
                self.send(commands);
            }

            Message::FlipBoard => {
                self.flipped = !self.flipped;
            }

            Message::Undo => {
                let commands = self.game.undo();
                self.send(commands);
            }

            Message::Hint => {
                let commands = self.game.hint();
                self.send(commands);
            }

            Message::PlayVsEngineToggled(on) => {
                let commands = self.game.set_play_vs_engine(on);
                self.send(commands);
            }

            Message::AutoAnalyzeToggled(on) => {
                let commands = self.game.set_auto_analyze(on);
                self.send(commands);
            }

            Message::ThinkTimeChanged(input) => {
                if input.chars().all(|c| c.is_ascii_digit()) {
                    self.game.set_think_time(&input);
                    self.think_time_input = input;
                }
            }

            Message::FenInputChanged(input) => {
                self.fen_input = input;
                self.fen_error = None;
            }

            Message::LoadFen => match self.game.load_fen(&self.fen_input) {
                Ok(commands) => {
                    self.fen_error = None;
                    self.send(commands);
                }
                Err(e) => {
                    tracing::info!(error = %e, "rejected position");
                    self.fen_error = Some(e.to_string());
                }
            },

            Message::JumpTo(ply) => {
                let commands = self.game.jump_to(ply);
                self.send(commands);
            }

            Message::LineHovered(rank) => {
                self.game.hover_line(rank);
            }

            Message::Engine(update) => return self.handle_engine_update(update),

            Message::PlayEngineMove(mv) => {
                let commands = self.game.apply_engine_move(mv);
                self.send(commands);
            }
        }
        Task::none()
    }

    fn handle_engine_update(&mut self, update: EngineUpdate) -> Task<Message> {
        match update {
            EngineUpdate::Connected(handle) => {
                self.engine = Some(handle);
            }
            EngineUpdate::Failed(err) => {
                self.game.engine_failed(err);
            }
            EngineUpdate::Event(EngineEvent::Output(line)) => {
                let reaction = self.game.on_engine_line(&line);
                self.send(reaction.commands);
                if let Some(mv) = reaction.reply {
                    let delay = self.reply_delay;
                    return Task::perform(tokio::time::sleep(delay), move |_| {
                        Message::PlayEngineMove(mv)
                    });
                }
            }
            EngineUpdate::Event(EngineEvent::Exited { code }) => {
                self.game.engine_exited(code);
                self.engine = None;
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let canvas = container(board::board_canvas(&self.game, self.flipped)).padding(10);
        let board_view: Element<'_, Message> = Element::from(canvas).map(Message::Board);

        row![
            board_view,
            container(self.control_panel())
                .width(PANEL_WIDTH)
                .height(Length::Fill)
                .padding(15),
        ]
        .spacing(20)
        .padding(20)
        .into()
    }

    /// Render the control panel
    fn control_panel(&self) -> Element<'_, Message> {
        let game = &self.game;

        let controls = row![
            button(text("New Game"))
                .on_press(Message::NewGame)
                .style(button::primary),
            button(text("Flip"))
                .on_press(Message::FlipBoard)
                .style(button::secondary),
            button(text("Undo"))
                .on_press(Message::Undo)
                .style(button::secondary),
            button(text("Hint"))
                .on_press_maybe(
                    (game.engine_ready && !game.thinking).then_some(Message::Hint)
                )
                .style(button::secondary),
        ]
        .spacing(5);

        let toggles = column![
            checkbox("Play vs Engine", game.options.play_vs_engine)
                .on_toggle(Message::PlayVsEngineToggled),
            checkbox("Auto Analyze", game.options.auto_analyze)
                .on_toggle(Message::AutoAnalyzeToggled),
            row![
                text("Think time (ms)").size(14),
                text_input("1000", &self.think_time_input)
                    .on_input(Message::ThinkTimeChanged)
                    .width(90),
            ]
            .spacing(10),
        ]
        .spacing(8);

        let fen_row = row![
            text_input("Paste a position", &self.fen_input)
                .on_input(Message::FenInputChanged)
                .on_submit(Message::LoadFen),
            button(text("Load")).on_press(Message::LoadFen),
        ]
        .spacing(5);

        let mut fen_section = column![fen_row].spacing(4);
        if let Some(err) = &self.fen_error {
            fen_section = fen_section.push(text(err).size(12).color(styles::EVAL_NEGATIVE));
        }

        let turn = match game.side_to_move() {
            Side::Red => text("Red to move").color(styles::RED_PIECE),
            Side::Black => text("Black to move"),
        }
        .size(16);

        let status = column![
            turn,
            text(game.engine_status.to_string()).size(13),
            text(&game.activity).size(13),
        ]
        .spacing(3);

        column![
            controls,
            vertical_space().height(10),
            toggles,
            vertical_space().height(10),
            fen_section,
            horizontal_rule(1),
            status,
            horizontal_rule(1),
            self.analysis_panel(),
            horizontal_rule(1),
            text("Moves").size(16),
            self.move_list(),
            horizontal_rule(1),
            text("Engine Output").size(16),
            self.engine_log(),
        ]
        .spacing(5)
        .into()
    }

    fn analysis_panel(&self) -> Element<'_, Message> {
        let analysis = &self.game.analysis;
        let depth = analysis.depth().unwrap_or("-");
        let mut lines = column![text(format!("Depth: {}", depth)).size(14)].spacing(2);

        for rank in 1..=MAX_LINES {
            let line = analysis.line(rank);
            let first = line.and_then(|l| l.first_move()).unwrap_or("-").to_string();
            let (score, negative) = match line {
                Some(l) => (l.score_text(), l.score.is_some_and(|s| s.is_negative())),
                None => ("-".to_string(), false),
            };
            let continuation = line
                .map(|l| l.continuation())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "-".to_string());
            let score_color = if negative {
                styles::EVAL_NEGATIVE
            } else {
                styles::EVAL_POSITIVE
            };

            let entry = row![
                text(format!("{}.", rank)).size(13),
                text(first).size(13).font(Font::MONOSPACE).width(50),
                text(score).size(13).color(score_color).width(55),
                text(continuation).size(12).font(Font::MONOSPACE),
            ]
            .spacing(6);

            lines = lines.push(
                mouse_area(container(entry).width(Length::Fill))
                    .on_enter(Message::LineHovered(Some(rank)))
                    .on_exit(Message::LineHovered(None)),
            );
        }
        lines.into()
    }

    fn move_list(&self) -> Element<'_, Message> {
        let moves = self.game.ledger.moves();
        let mut list = Column::new().spacing(2);

        for (i, pair) in moves.chunks(2).enumerate() {
            let mut entry = row![text(format!("{}.", i + 1)).size(13).width(30)].spacing(4);
            for (j, mv) in pair.iter().enumerate() {
                let ply = i * 2 + j + 1;
                let color = match mv.side {
                    Side::Red => styles::RED_PIECE,
                    Side::Black => Color::WHITE,
                };
                entry = entry.push(
                    button(text(mv.text().to_string()).size(13).font(Font::MONOSPACE).color(color))
                        .on_press(Message::JumpTo(ply))
                        .style(button::text)
                        .padding([1, 4]),
                );
            }
            list = list.push(entry);
        }

        scrollable(list).height(Length::FillPortion(1)).into()
    }

    fn engine_log(&self) -> Element<'_, Message> {
        let lines = self
            .game
            .log
            .lines()
            .map(|line| text(line).size(11).font(Font::MONOSPACE).into());

        scrollable(Column::with_children(lines).spacing(1))
            .height(Length::FillPortion(1))
            .into()
    }
}

impl Drop for XiangqiApp {
    fn drop(&mut self) {
        if let Some(engine) = &self.engine {
            engine.shutdown();
        }
    }
}

/// Start the engine and forward its events for as long as it runs.
fn engine_worker(config: EngineConfig) -> impl Stream<Item = Message> {
    iced::stream::channel(100, move |mut output| async move {
        let (handle, mut events) = match EngineHandle::spawn(&config) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "engine failed to start");
                let _ = output
                    .send(Message::Engine(EngineUpdate::Failed(e.to_string())))
                    .await;
                return;
            }
        };

        if output
            .send(Message::Engine(EngineUpdate::Connected(handle)))
            .await
            .is_err()
        {
            return;
        }
        while let Some(event) = events.recv().await {
            if output
                .send(Message::Engine(EngineUpdate::Event(event)))
                .await
                .is_err()
            {
                break;
            }
        }
    })
}
