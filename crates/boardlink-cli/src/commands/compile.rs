use anyhow::{Result, bail};
use boardlink_core::{ArduinoCli, FqbnCache, validate};

pub async fn run(sketch: &str, fqbn: Option<String>, port: Option<String>) -> Result<()> {
    let cli = ArduinoCli::from_env()?;

    let fqbn = match fqbn {
        Some(fqbn) => fqbn,
        None => {
            let Some(port) = port else {
                bail!("Either --fqbn or --port must be provided for compile.");
            };
            validate::ensure_port(&port)?;
            FqbnCache::new().detect(&cli, &port).await?
        }
    };

    validate::ensure_fqbn(&fqbn)?;
    validate::ensure_sketch_exists(sketch)?;

    let output = cli.compile(&fqbn, sketch).await?;
    print!("{output}");
    Ok(())
}
