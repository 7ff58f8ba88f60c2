use anyhow::Result;
use boardlink_core::{serial, validate};
use std::time::Duration;

pub async fn run(port: &str, message: &str, baud: u32, timeout: f64) -> Result<()> {
    validate::ensure_port(port)?;

    let timeout = Duration::try_from_secs_f64(timeout.max(0.0))
        .map_err(|_| anyhow::anyhow!("Invalid timeout: {timeout}"))?;
    let reply = serial::send(port, baud, message, timeout).await?;
    println!("{reply}");
    Ok(())
}
