use anyhow::Result;
use clap::Parser;
use transtat::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
