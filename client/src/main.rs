use clap::Parser;

use qkart_client::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    qkart_client::start(Cli::parse()).await?;

    Ok(())
}
