use std::path::PathBuf;

use clap::Parser;

/// Tandem: chat with an OpenAI assistant that can call local tools.
#[derive(Parser, Debug)]
#[command(name = "tandem", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive (e.g. `tandem=debug`). RUST_LOG wins if set.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use an existing assistant instead of creating one.
    #[arg(long)]
    pub assistant_id: Option<String>,

    /// Continue an existing thread instead of starting a new one.
    #[arg(long)]
    pub thread_id: Option<String>,

    /// Send this message, print the reply and exit. Omit for interactive mode.
    pub message: Vec<String>,
}

impl Args {
    /// The one-shot message, if any words were given.
    pub fn one_shot(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(self.message.join(" "))
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
