use anyhow::Result;
use clap::Parser;
use rxnorm_boss_server::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    run(cli).await
}
