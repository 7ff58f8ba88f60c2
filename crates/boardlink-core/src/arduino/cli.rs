//! Async wrapper around the `arduino-cli` binary.
//!
//! Every invocation runs in the sketch workspace directory and surfaces the
//! tool's stdout on success or its stderr verbatim on failure.

use crate::arduino::board::BoardListReport;
use crate::error::{CoreError, Result};
use crate::paths;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const ARDUINO_CLI: &str = "arduino-cli";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Maximum total bytes kept from a command's stdout.
const MAX_OUTPUT_BYTES: usize = 1_000_000;

/// Handle to the external arduino-cli binary.
#[derive(Debug, Clone)]
pub struct ArduinoCli {
    binary: PathBuf,
    workspace: PathBuf,
    timeout: Duration,
}

impl ArduinoCli {
    /// Locate arduino-cli on PATH and resolve the sketch workspace.
    pub fn from_env() -> anyhow::Result<Self> {
        let binary = which::which(ARDUINO_CLI).map_err(CoreError::CliNotFound)?;
        let workspace = paths::resolve_workspace_dir()?;
        Ok(Self::new(binary, workspace))
    }

    pub fn new(binary: PathBuf, workspace: PathBuf) -> Self {
        Self {
            binary,
            workspace,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run arduino-cli with the given arguments and return its stdout.
    pub async fn run(&self, args: &[&str]) -> Result<String> {
        let command_line = format!("{} {}", ARDUINO_CLI, args.join(" "));
        tracing::debug!(command = %command_line, "running arduino-cli");

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .current_dir(&self.workspace)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| CoreError::CliTimeout {
                command: command_line.clone(),
                seconds: self.timeout.as_secs(),
            })??;

        if !output.status.success() {
            return Err(CoreError::CliFailed {
                command: command_line,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(truncate_to_limit(&String::from_utf8_lossy(&output.stdout)))
    }

    /// `arduino-cli board list --format json`, parsed.
    pub async fn board_list(&self) -> Result<BoardListReport> {
        let stdout = self.run(&["board", "list", "--format", "json"]).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// `arduino-cli compile --fqbn <fqbn> <sketch>`
    pub async fn compile(&self, fqbn: &str, sketch: &str) -> Result<String> {
        self.run(&["compile", "--fqbn", fqbn, sketch]).await
    }

    /// `arduino-cli upload -p <port> --fqbn <fqbn> <sketch>`
    pub async fn upload(&self, sketch: &str, port: &str, fqbn: &str) -> Result<String> {
        self.run(&["upload", "-p", port, "--fqbn", fqbn, sketch])
            .await
    }
}

fn truncate_to_limit(value: &str) -> String {
    if value.len() <= MAX_OUTPUT_BYTES {
        return value.to_string();
    }
    let mut end = MAX_OUTPUT_BYTES;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n[Output truncated]", &value[..end])
}
