use anyhow::Result;
use std::path::PathBuf;

const BOARDLINK_DIR: &str = ".boardlink";
const LOGS_DIR: &str = "logs";

/// Environment variable pointing at the sketch workspace.
/// All arduino-cli invocations run with this as their working directory.
const WORKSPACE_ENV: &str = "WORKSPACE";

/// Resolve the working directory for arduino-cli invocations.
/// Priority: WORKSPACE env var > current directory.
pub fn resolve_workspace_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(WORKSPACE_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    Ok(std::env::current_dir()?)
}

/// Resolve the Boardlink configuration directory: ~/.boardlink/
pub fn resolve_boardlink_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(BOARDLINK_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Logs directory, created on demand: ~/.boardlink/logs/
pub fn logs_dir() -> Result<PathBuf> {
    let dir = resolve_boardlink_dir()?.join(LOGS_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
