use anyhow::Result;
use boardlink_core::{ArduinoCli, FqbnCache, validate};

pub async fn run(sketch: &str, port: &str, fqbn: Option<String>) -> Result<()> {
    validate::ensure_port(port)?;

    let cli = ArduinoCli::from_env()?;
    let fqbn = match fqbn {
        Some(fqbn) => fqbn,
        None => FqbnCache::new().detect(&cli, port).await?,
    };

    validate::ensure_fqbn(&fqbn)?;
    validate::ensure_sketch_exists(sketch)?;

    let output = cli.upload(sketch, port, &fqbn).await?;
    print!("{output}");
    Ok(())
}
