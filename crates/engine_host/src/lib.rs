//! Hosts the external engine as a child process.
//!
//! The GUI never blocks on the engine: commands are queued on an
//! [`EngineHandle`] and output arrives as [`EngineEvent`]s on a channel.

mod process;

pub use process::*;
