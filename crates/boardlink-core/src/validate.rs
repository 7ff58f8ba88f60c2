//! Input validation for tool parameters.
//!
//! FQBN and port strings are passed unmodified to arduino-cli and the OS
//! serial driver, so they are shape-checked here before anything runs.

use crate::error::{CoreError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static FQBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+:\w+:\w+$").expect("FQBN regex is valid"));

static PORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(COM\d+|/dev/(tty|cu)[\w\d.-]+)$").expect("port regex is valid"));

/// Check that an FQBN looks like vendor:arch:board.
pub fn ensure_fqbn(fqbn: &str) -> Result<()> {
    if FQBN_RE.is_match(fqbn) {
        Ok(())
    } else {
        Err(CoreError::InvalidFqbn(fqbn.to_string()))
    }
}

/// Check that a port looks like a serial device path (COMn or /dev/tty*, /dev/cu*).
pub fn ensure_port(port: &str) -> Result<()> {
    if PORT_RE.is_match(port) {
        Ok(())
    } else {
        Err(CoreError::InvalidPort(port.to_string()))
    }
}

/// Check that a sketch path exists on disk.
pub fn ensure_sketch_exists(sketch: &str) -> Result<()> {
    let path = Path::new(sketch);
    if path.exists() {
        Ok(())
    } else {
        Err(CoreError::SketchMissing(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_fqbn() {
        assert!(ensure_fqbn("arduino:avr:uno").is_ok());
        assert!(ensure_fqbn("esp32:esp32:esp32dev").is_ok());
    }

    #[test]
    fn rejects_malformed_fqbn() {
        assert!(ensure_fqbn("arduino:avr").is_err());
        assert!(ensure_fqbn("arduino:avr:uno:extra").is_err());
        assert!(ensure_fqbn("arduino avr uno").is_err());
        assert!(ensure_fqbn("").is_err());
    }

    #[test]
    fn accepts_serial_device_paths() {
        assert!(ensure_port("/dev/ttyACM0").is_ok());
        assert!(ensure_port("/dev/ttyUSB1").is_ok());
        assert!(ensure_port("/dev/cu.usbmodem1234").is_ok());
        assert!(ensure_port("COM3").is_ok());
    }

    #[test]
    fn rejects_non_device_paths() {
        assert!(ensure_port("/etc/passwd").is_err());
        assert!(ensure_port("ttyACM0").is_err());
        assert!(ensure_port("COM").is_err());
        assert!(ensure_port("").is_err());
    }

    #[test]
    fn sketch_existence_check() {
        let dir = tempfile::tempdir().unwrap();
        let sketch = dir.path().join("blink");
        std::fs::create_dir(&sketch).unwrap();

        assert!(ensure_sketch_exists(sketch.to_str().unwrap()).is_ok());
        assert!(ensure_sketch_exists(dir.path().join("missing").to_str().unwrap()).is_err());
    }
}
