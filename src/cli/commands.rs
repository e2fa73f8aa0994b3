use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "carve", about = concat!("carve v", env!("CARGO_PKG_VERSION"), " - split one generated file into per-region files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Config file to use instead of discovering carve.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter carve.toml in the current directory
    Init(InitArgs),
    /// Extract, write and validate every region
    Run(RunArgs),
    /// Lint the region table against the source without writing anything
    Check(CheckArgs),
    /// Show line counts per region from the region table
    Report,
    /// Move region boundaries after lines were added or removed in the source
    Shift(ShiftArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing carve.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Source file (default: `source` from carve.toml)
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// Output directory (default: `output_dir` from carve.toml)
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Extract and validate without writing any file
    #[arg(long)]
    pub dry_run: bool,
    /// Exit non-zero when any region has validation issues
    #[arg(long)]
    pub strict: bool,
    /// Copy outputs about to be replaced into DIR first
    /// (default: `backup_dir` from carve.toml, else <out>-backup)
    #[arg(long, value_name = "DIR")]
    pub backup: Option<Option<PathBuf>>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Source file (default: `source` from carve.toml)
    #[arg(long)]
    pub source: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShiftArgs {
    /// First source line affected by the edit
    #[arg(long, value_name = "LINE", value_parser = clap::value_parser!(i64).range(1..))]
    pub at: i64,
    /// Lines added (positive) or removed (negative)
    #[arg(long, value_name = "DELTA", allow_negative_numbers = true)]
    pub by: i64,
}
