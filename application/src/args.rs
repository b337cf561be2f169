//! [`Args`] definitions.

use clap::Parser;

/// Server of the land plot investment catalog.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses [`Args`] out of the command line.
    ///
    /// # Errors
    ///
    /// If the command line doesn't parse.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
