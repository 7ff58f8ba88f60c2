pub mod arduino;
pub mod error;
pub mod mcp;
pub mod paths;
pub mod serial;
pub mod validate;

pub use arduino::{ArduinoCli, FqbnCache};
pub use error::{CoreError, Result};
