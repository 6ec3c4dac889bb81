//! Xiangqi board canvas: lines, pieces and move highlights

use crate::game::GameState;
use crate::styles::{self, BOARD_PADDING, CELL_SIZE, LABEL_MARGIN};
use iced::mouse;
use iced::widget::canvas::{self, event, Event, Frame, Geometry, Path, Program, Stroke, Text};
use iced::widget::text::Shaping;
use iced::{alignment, Color, Font, Pixels, Point, Rectangle, Renderer, Theme};
use xiangqi_core::{Piece, Side, Square, COLS, ROWS};

/// Message type for board interactions
#[derive(Debug, Clone)]
pub enum BoardMessage {
    SquareClicked(Square),
}

/// Renders the board for the current game state
pub struct BoardView<'a> {
    game: &'a GameState,
    flipped: bool,
}

impl<'a> BoardView<'a> {
    pub fn new(game: &'a GameState, flipped: bool) -> Self {
        Self { game, flipped }
    }
}

/// Canvas position of the intersection `sq` sits on.
pub fn point_of(sq: Square, flipped: bool) -> Point {
    let (row, col) = if flipped {
        (ROWS - 1 - sq.row, COLS - 1 - sq.col)
    } else {
        (sq.row, sq.col)
    };
    Point::new(
        BOARD_PADDING + col as f32 * CELL_SIZE,
        BOARD_PADDING + row as f32 * CELL_SIZE,
    )
}

/// The intersection nearest to `p`, if it lies on the board.
pub fn square_at(p: Point, flipped: bool) -> Option<Square> {
    let col = ((p.x - BOARD_PADDING) / CELL_SIZE).round();
    let row = ((p.y - BOARD_PADDING) / CELL_SIZE).round();
    if col < 0.0 || row < 0.0 || col >= COLS as f32 || row >= ROWS as f32 {
        return None;
    }
    let (row, col) = (row as u8, col as u8);
    if flipped {
        Square::new(ROWS - 1 - row, COLS - 1 - col)
    } else {
        Square::new(row, col)
    }
}

fn label(content: impl Into<String>, position: Point, size: f32, color: Color) -> Text {
    Text {
        content: content.into(),
        position,
        color,
        size: Pixels(size),
        font: Font::DEFAULT,
        horizontal_alignment: alignment::Horizontal::Center,
        vertical_alignment: alignment::Vertical::Center,
        shaping: Shaping::Advanced,
        ..Text::default()
    }
}

impl BoardView<'_> {
    fn draw_grid(&self, frame: &mut Frame) {
        let thin = Stroke::default().with_width(1.0).with_color(styles::GRID_LINE);
        let at = |row: f32, col: f32| {
            Point::new(BOARD_PADDING + col * CELL_SIZE, BOARD_PADDING + row * CELL_SIZE)
        };

        // Files stop at the river except on the edges
        for col in 0..COLS {
            let c = col as f32;
            if col == 0 || col == COLS - 1 {
                frame.stroke(&Path::line(at(0.0, c), at(9.0, c)), thin);
            } else {
                frame.stroke(&Path::line(at(0.0, c), at(4.0, c)), thin);
                frame.stroke(&Path::line(at(5.0, c), at(9.0, c)), thin);
            }
        }
        for row in 0..ROWS {
            let r = row as f32;
            frame.stroke(&Path::line(at(r, 0.0), at(r, 8.0)), thin);
        }

        let border = Path::rectangle(at(0.0, 0.0), iced::Size::new(8.0 * CELL_SIZE, 9.0 * CELL_SIZE));
        frame.stroke(&border, thin.with_width(2.0));

        // Palace diagonals
        for top in [0.0, 7.0] {
            frame.stroke(&Path::line(at(top, 3.0), at(top + 2.0, 5.0)), thin);
            frame.stroke(&Path::line(at(top, 5.0), at(top + 2.0, 3.0)), thin);
        }

        let river_y = 4.5;
        frame.fill_text(label("楚 河", at(river_y, 2.0), 20.0, styles::GRID_LINE));
        frame.fill_text(label("漢 界", at(river_y, 6.0), 20.0, styles::GRID_LINE));

        for col in 0..COLS {
            let file = if self.flipped { COLS - 1 - col } else { col };
            let ch = (b'a' + file) as char;
            let pos = Point::new(
                BOARD_PADDING + col as f32 * CELL_SIZE,
                BOARD_PADDING + 9.0 * CELL_SIZE + LABEL_MARGIN,
            );
            frame.fill_text(label(ch.to_string(), pos, 14.0, styles::GRID_LINE));
        }
        for row in 0..ROWS {
            let rank = if self.flipped { row } else { ROWS - 1 - row };
            let pos = Point::new(
                BOARD_PADDING + 8.0 * CELL_SIZE + LABEL_MARGIN,
                BOARD_PADDING + row as f32 * CELL_SIZE,
            );
            frame.fill_text(label(rank.to_string(), pos, 14.0, styles::GRID_LINE));
        }
    }

    fn draw_piece(&self, frame: &mut Frame, sq: Square, piece: Piece, selected: bool) {
        let center = point_of(sq, self.flipped);
        let radius = CELL_SIZE * 0.42;
        let disc = Path::circle(center, radius);

        frame.fill(&Path::circle(center, radius + 1.5), styles::PIECE_RIM);
        frame.fill(&disc, styles::PIECE_FACE);
        let rim = if selected {
            Stroke::default().with_width(3.0).with_color(styles::SELECTED_RING)
        } else {
            Stroke::default().with_width(2.0).with_color(styles::GRID_LINE)
        };
        frame.stroke(&disc, rim);

        let color = match piece.side {
            Side::Red => styles::RED_PIECE,
            Side::Black => styles::BLACK_PIECE,
        };
        let glyph = Point::new(center.x, center.y + 1.0);
        frame.fill_text(label(piece.glyph().to_string(), glyph, 24.0, color));
    }

    fn draw_arrow(&self, frame: &mut Frame, from: Point, to: Point) {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return;
        }
        let ratio = (length - CELL_SIZE * 0.35) / length;
        let end = Point::new(from.x + dx * ratio, from.y + dy * ratio);
        let start = Point::new(
            from.x + dx * (1.0 - ratio) * 0.5,
            from.y + dy * (1.0 - ratio) * 0.5,
        );

        frame.stroke(
            &Path::line(start, end),
            Stroke::default().with_width(4.0).with_color(styles::HOVER_ARROW),
        );

        let head = 15.0;
        let angle = dy.atan2(dx);
        let spread = std::f32::consts::PI / 6.0;
        let tip = Path::new(|b| {
            b.move_to(end);
            b.line_to(Point::new(
                end.x - head * (angle - spread).cos(),
                end.y - head * (angle - spread).sin(),
            ));
            b.line_to(Point::new(
                end.x - head * (angle + spread).cos(),
                end.y - head * (angle + spread).sin(),
            ));
            b.close();
        });
        frame.fill(&tip, styles::HOVER_ARROW);
    }
}

impl Program<BoardMessage> for BoardView<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<BoardMessage>) {
        if let Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if let Some(p) = cursor.position_in(bounds) {
                if let Some(sq) = square_at(p, self.flipped) {
                    return (event::Status::Captured, Some(BoardMessage::SquareClicked(sq)));
                }
            }
        }
        (event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), styles::BOARD_BACKGROUND);
        self.draw_grid(&mut frame);

        if let Some(last) = self.game.ledger.last_move() {
            for sq in [last.from, last.to] {
                frame.fill(
                    &Path::circle(point_of(sq, self.flipped), CELL_SIZE * 0.48),
                    styles::LAST_MOVE,
                );
            }
        }

        for (sq, piece) in self.game.board().pieces() {
            self.draw_piece(&mut frame, sq, piece, self.game.selected == Some(sq));
        }

        for &sq in &self.game.targets {
            frame.fill(&Path::circle(point_of(sq, self.flipped), 8.0), styles::TARGET_DOT);
        }

        if let Some(mv) = self.game.hovered {
            let from = point_of(mv.from, self.flipped);
            let to = point_of(mv.to, self.flipped);
            let ring = |color| Stroke::default().with_width(3.0).with_color(color);
            frame.stroke(&Path::circle(from, CELL_SIZE * 0.45), ring(styles::HOVER_FROM));
            frame.stroke(&Path::circle(to, CELL_SIZE * 0.45), ring(styles::HOVER_TO));
            self.draw_arrow(&mut frame, from, to);
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match cursor.position_in(bounds).and_then(|p| square_at(p, self.flipped)) {
            Some(_) if !self.game.thinking && !self.game.engine_to_move() => {
                mouse::Interaction::Pointer
            }
            _ => mouse::Interaction::default(),
        }
    }
}

/// Build the canvas element for the board
pub fn board_canvas(game: &GameState, flipped: bool) -> canvas::Canvas<BoardView<'_>, BoardMessage> {
    canvas::Canvas::new(BoardView::new(game, flipped))
        .width(styles::BOARD_WIDTH)
        .height(styles::BOARD_HEIGHT)
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
