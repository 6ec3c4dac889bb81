//! Styling constants and board geometry

use iced::Color;

// Board colors
pub const BOARD_BACKGROUND: Color = Color::from_rgb(0.831, 0.647, 0.349); // #d4a559
pub const GRID_LINE: Color = Color::from_rgb(0.353, 0.227, 0.102); // #5a3a1a
pub const PIECE_FACE: Color = Color::from_rgb(0.961, 0.902, 0.784); // #f5e6c8
pub const PIECE_RIM: Color = Color::from_rgb(0.831, 0.722, 0.588); // #d4b896
pub const RED_PIECE: Color = Color::from_rgb(0.769, 0.118, 0.227); // #c41e3a
pub const BLACK_PIECE: Color = Color::from_rgb(0.1, 0.1, 0.1);
pub const SELECTED_RING: Color = Color::from_rgb(0.0, 0.667, 0.0);
pub const TARGET_DOT: Color = Color::from_rgba(0.0, 0.5, 0.0, 0.5);
pub const LAST_MOVE: Color = Color::from_rgba(0.9, 0.9, 0.0, 0.35);
pub const HOVER_FROM: Color = Color::from_rgba(0.0, 0.588, 1.0, 0.8);
pub const HOVER_TO: Color = Color::from_rgba(0.0, 1.0, 0.392, 0.8);
pub const HOVER_ARROW: Color = Color::from_rgba(0.0, 0.784, 1.0, 0.7);

// Evaluation colors
pub const EVAL_POSITIVE: Color = Color::from_rgb(0.4, 0.8, 0.4);
pub const EVAL_NEGATIVE: Color = Color::from_rgb(0.9, 0.4, 0.4);

// Dimensions
pub const CELL_SIZE: f32 = 50.0;
pub const BOARD_PADDING: f32 = 30.0;
pub const LABEL_MARGIN: f32 = 20.0;
pub const BOARD_WIDTH: f32 = BOARD_PADDING * 2.0 + 8.0 * CELL_SIZE + LABEL_MARGIN + 10.0;
pub const BOARD_HEIGHT: f32 = BOARD_PADDING * 2.0 + 9.0 * CELL_SIZE + LABEL_MARGIN + 10.0;
pub const PANEL_WIDTH: f32 = 340.0;
