// src/bin/cli.rs
use episode_corpus::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run()
}
