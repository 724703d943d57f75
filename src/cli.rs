//! Command-line interface for Marquee.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Marquee - movie search with a trending list
/// Type to search; results refresh once you pause.
#[derive(Debug, Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to load instead of the default search paths
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "marquee=trace"
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive session: each input line is the current search text
    #[command(alias = "i")]
    Interactive,

    /// Run a single search and print the results
    #[command(alias = "s")]
    Search {
        /// Search query; omit to list popular movies
        query: Vec<String>,
    },

    /// Print the trending list
    #[command(alias = "t")]
    Trending {
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Write a default config file
    Init {
        /// Where to write it
        #[arg(default_value = "marquee.toml")]
        path: PathBuf,
    },
}
