use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use dirwatcher::config::{Config, DEFAULT_EXTENSION};
use dirwatcher::daemon;
use dirwatcher::shutdown::Shutdown;

/// Watch a directory for text files that gain lines containing a magic string
#[derive(Parser, Debug)]
#[command(name = "dirwatcher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory that will be watched
    pub dir: PathBuf,

    /// Magic text string to look for
    pub text: String,

    /// Seconds between polling (fractions allowed)
    #[arg(short, long, visible_alias = "int", default_value = "1")]
    pub interval: f64,

    /// Extension (filename suffix) to be watched
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    pub ext: String,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "dirwatcher=debug"
        } else if self.quiet {
            "dirwatcher=warn"
        } else {
            "dirwatcher=info"
        }
    }

    pub fn to_config(&self) -> Result<Config> {
        let config = Config::new(&self.dir, &self.text)
            .with_extension(&self.ext)
            .with_poll_interval(Config::poll_interval_from_secs(self.interval)?);
        config.validate()?;
        Ok(config)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config()?;

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    daemon::run(&config, &shutdown).await?;
    Ok(())
}
