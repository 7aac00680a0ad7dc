pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(about = "Book review service and its command line client")]
pub struct Args {
    /// API server to talk to (defaults to the configured local port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the shelf config directory (defaults to ~/.shelf)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
