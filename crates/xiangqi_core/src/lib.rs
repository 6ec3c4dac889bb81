//! Core game logic for the xiangqi front end: board model, pseudo-legal move
//! rules, the move ledger, and the engine line protocol.
//!
//! Nothing here searches or evaluates; that is the external engine's job.

pub mod analysis;
pub mod board;
pub mod ledger;
pub mod movegen;
pub mod types;
pub mod uci;

pub use analysis::*;
pub use board::*;
pub use ledger::*;
pub use movegen::{destinations, destinations_into, pseudo_moves};
pub use types::*;
pub use uci::*;
