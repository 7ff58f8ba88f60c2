use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by board, CLI, and serial operations.
///
/// External tool output is carried verbatim; there is no classification
/// or recovery beyond what the message says.
#[derive(Debug, Error)]
pub enum CoreError {
    /// arduino-cli binary could not be located on PATH.
    #[error("arduino-cli not found on PATH: {0}")]
    CliNotFound(#[from] which::Error),

    /// arduino-cli exited with a non-zero status.
    #[error("{command} failed:\n{stderr}")]
    CliFailed { command: String, stderr: String },

    /// arduino-cli did not finish within the allotted time.
    #[error("{command} timed out after {seconds}s")]
    CliTimeout { command: String, seconds: u64 },

    /// arduino-cli produced output we could not parse.
    #[error("Failed to parse arduino-cli output: {0}")]
    CliOutput(#[from] serde_json::Error),

    /// FQBN string does not look like vendor:arch:board.
    #[error("Invalid FQBN: {0}")]
    InvalidFqbn(String),

    /// Port string does not look like a serial device path.
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// Sketch path does not exist on disk.
    #[error("Sketch {} does not exist.", .0.display())]
    SketchMissing(PathBuf),

    /// No board with a known FQBN was detected on the port.
    #[error("Could not auto-detect FQBN for port {0}. Please specify fqbn explicitly.")]
    FqbnDetection(String),

    /// Failed to open serial port.
    #[error("Failed to open serial port '{port}': {reason}")]
    PortOpen { port: String, reason: String },

    /// Failed to read from serial port.
    #[error("Failed to read from serial port: {0}")]
    PortRead(String),

    /// Failed to write to serial port.
    #[error("Failed to write to serial port: {0}")]
    PortWrite(String),

    /// Serial port enumeration failed.
    #[error("Failed to enumerate serial ports: {0}")]
    PortList(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_failed_carries_stderr_verbatim() {
        let err = CoreError::CliFailed {
            command: "arduino-cli compile --fqbn arduino:avr:uno sketch".to_string(),
            stderr: "Error: board not found\n".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("arduino-cli compile"));
        assert!(message.contains("Error: board not found"));
    }

    #[test]
    fn sketch_missing_names_the_path() {
        let err = CoreError::SketchMissing(PathBuf::from("sketches/missing"));
        assert_eq!(err.to_string(), "Sketch sketches/missing does not exist.");
    }
}
