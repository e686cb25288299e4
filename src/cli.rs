use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "transtat")]
#[command(about = "Translation contribution analysis for labeled GitHub pull requests")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, default_value = "config.yaml", help = "Path to YAML configuration file")]
    pub config: PathBuf,

    #[arg(long, help = "Path to SQLite database (default: data/db.sqlite)")]
    pub db: Option<PathBuf>,

    #[arg(long, help = "Directory for rendered charts (default: output)")]
    pub out: Option<PathBuf>,
}

impl CommonArgs {
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| PathBuf::from("data/db.sqlite"))
    }

    pub fn out_dir(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(|| PathBuf::from("output"))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Ingest merged labeled pull requests into the database")]
    Sync,
    #[command(about = "Render the contribution pie chart from recorded data")]
    Report,
    #[command(about = "Sync, then report")]
    Run,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Sync => crate::sync::exec(&self.common),
            Commands::Report => crate::report::exec(&self.common),
            Commands::Run => {
                crate::sync::exec(&self.common)?;
                crate::report::exec(&self.common)
            }
        }
    }
}
