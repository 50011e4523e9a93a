use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_REDIS_URL: &str = "redis-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_REDIS_URL)
            .long(ARG_REDIS_URL)
            .help("Redis URL for session and presence records")
            .env("SESSIONGATE_REDIS_URL")
            .default_value("redis://127.0.0.1:6379"),
    )
}

#[derive(Debug)]
pub struct Options {
    pub redis_url: String,
}

impl Options {
    /// # Errors
    /// Returns an error if the Redis URL is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let redis_url = matches
            .get_one::<String>(ARG_REDIS_URL)
            .cloned()
            .context("missing required argument: --redis-url")?;
        Ok(Self { redis_url })
    }
}
