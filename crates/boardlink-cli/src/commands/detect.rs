use crate::output::{OutputFormat, json::print_json};
use anyhow::Result;
use boardlink_core::{ArduinoCli, FqbnCache, validate};
use serde_json::json;

pub async fn run(port: &str, format: OutputFormat) -> Result<()> {
    validate::ensure_port(port)?;

    let cli = ArduinoCli::from_env()?;
    let fqbn = FqbnCache::new().detect(&cli, port).await?;

    if format.is_json() {
        return print_json(&json!({ "port": port, "fqbn": fqbn }));
    }

    println!("{fqbn}");
    Ok(())
}
