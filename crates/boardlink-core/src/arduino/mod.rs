//! Pass-throughs to the external `arduino-cli` tool.

pub mod board;
pub mod cli;

pub use board::{BoardListReport, FqbnCache};
pub use cli::ArduinoCli;
