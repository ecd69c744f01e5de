use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mirage")]
#[command(about = "Copy a Go package and its in-module dependencies into another module")]
pub struct CliConfig {
    /// Source package directory
    #[arg(value_name = "SRCDIR")]
    pub src_dir: PathBuf,

    /// Destination directory
    #[arg(value_name = "DSTDIR")]
    pub dst_dir: PathBuf,

    /// The destination module name (autodetected via destination go.mod if unset)
    #[arg(long, value_name = "DSTMODULE")]
    pub dst_module: Option<String>,

    /// Fix up imports to treat the destination module as local imports
    #[arg(long, value_name = "true|false", action = ArgAction::Set)]
    pub local_imports: Option<bool>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep existing Go files in the destination
    #[arg(long)]
    pub no_clean: bool,

    /// Skip `go mod tidy` after copying
    #[arg(long)]
    pub no_tidy: bool,

    /// Print the copy plan without touching the destination
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub plan_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}
