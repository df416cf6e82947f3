use anyhow::Context;
use fantasia_core::RunConfig;
use std::path::PathBuf;
use tracing::info;

pub fn execute(config: PathBuf) -> anyhow::Result<()> {
    let params = RunConfig::from_path(&config)?
        .resolve()
        .with_context(|| format!("invalid run configuration {}", config.display()))?;
    info!(
        "prefix {} / mode {} / models {:?}",
        params.prefix, params.mode, params.models
    );

    let written = fantasia_core::run(&params)?;
    for artifact in &written {
        println!("{}", artifact.path.display());
    }
    Ok(())
}
