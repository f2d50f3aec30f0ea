pub mod output;
pub mod switch_port;
pub mod target;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "omada",
    version,
    about = "TP-Link Omada CLI - enable and disable switch ports without losing their settings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(short = 't', long = "table", global = true)]
    pub table: bool,

    /// Verbose output (log controller requests/responses)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Controller target to use (defaults to the stored default)
    #[arg(short = 'T', long, global = true, env = "OMADA_TARGET")]
    pub target: Option<String>,

    /// Path of the targets file
    #[arg(long, global = true, env = "OMADA_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Control switch port enable/disable state
    #[command(alias = "switch_port")]
    SwitchPort(switch_port::SwitchPortArgs),

    /// Manage controller targets
    #[command(subcommand)]
    Target(target::TargetCommand),
}
