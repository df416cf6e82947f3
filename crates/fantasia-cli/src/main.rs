use clap::Parser;
mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    cli.init_logging();
    cli.execute()?;
    Ok(())
}
