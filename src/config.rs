//! Command-line and environment configuration.

use clap::{Parser, Subcommand};

use crate::constants::{DEFAULT_BIND_ADDR, DEFAULT_FEED_URL};

#[derive(Parser, Debug, Clone)]
#[command(name = "covid-dashboard", version, about = "Pandemic update feed dashboard")]
pub struct Args {
    /// URL of the JSON update feed (`{ "data": [{ "update": "..." }] }`)
    #[arg(long, env = "FEED_URL", default_value = DEFAULT_FEED_URL, global = true)]
    pub feed_url: String,

    /// Address to listen on when serving
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR, global = true)]
    pub bind: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load the feed once and serve the dashboard over HTTP (default)
    Serve,
    /// Load the feed once and print totals and the state-wise table
    Report {
        /// Print the dashboard as JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
