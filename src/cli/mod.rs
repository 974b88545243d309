//! CLI module for the gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Authenticating reverse proxy gateway with per-key daily call quotas
#[derive(Parser)]
#[command(name = "keygate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the gateway server
    Serve,
}
