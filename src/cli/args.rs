use clap::{Parser, Subcommand};

use crate::backend::DEFAULT_TFC_ENDPOINT;
use crate::config::{ConfigError, SupplierConfig, parse_header};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the supported remotes.
    Remotes,
    /// List the supported state backends.
    Backends,
    /// Read and normalize declared state.
    State(StateArgs),
}

#[derive(clap::Args, Debug)]
pub struct StateArgs {
    /// State source, e.g. tfstate+s3://bucket/**/*.tfstate
    #[arg(long = "from", required = true, value_parser = parse_source)]
    pub from: Vec<SupplierConfig>,

    /// Extra HTTP header sent to HTTP(S) backends, as KEY=VALUE
    #[arg(long = "headers", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(long, env = "TFC_TOKEN", hide_env_values = true)]
    pub tfc_token: Option<String>,

    #[arg(long, env = "TFC_ENDPOINT", default_value = DEFAULT_TFC_ENDPOINT)]
    pub tfc_endpoint: String,

    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub gcs_token: Option<String>,
}

fn parse_source(raw: &str) -> Result<SupplierConfig, ConfigError> {
    raw.parse()
}
