use super::commands::FunctionCommands;
use clap::{Parser, Subcommand};

use crate::config::DEFAULT_HTTP_TIMEOUT;

#[derive(Parser)]
#[command(name = "openfx-cli")]
#[command(about = "A CLI tool for the OpenFx function gateway")]
pub struct Cli {
    /// Upper bound in seconds for every HTTP request
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_HTTP_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication against the OpenFx OAuth2 server
    Function(FunctionCommands),
    /// Show the gateway URL commands will talk to
    Gateway {
        /// Gateway URL, overrides $OPENFX_URL
        #[arg(short, long, default_value = "")]
        gateway: String,
    },
}
