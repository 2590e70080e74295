// cli_app/src/main.rs

#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use clap::Parser;
use cli_app::cli::Cli;

fn main() -> Result<()> {
    Cli::parse().run()
}
