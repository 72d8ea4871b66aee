//! CLI commands and argument parsing

use crate::fetcher::BoundaryStrategy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cursor pagination demo service and client
#[derive(Parser, Debug)]
#[command(name = "cursor-pagination")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed the store and start the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep records in a DuckDB file instead of the configured store
        #[arg(long)]
        duckdb: Option<PathBuf>,

        /// Number of demo records to seed (overrides config)
        #[arg(long)]
        seed: Option<usize>,
    },

    /// Fetch one page from a running server
    Fetch {
        /// Server base URL (overrides config)
        #[arg(long)]
        url: Option<String>,

        /// Endpoint to call
        #[arg(short, long, value_enum, default_value = "better")]
        endpoint: Endpoint,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Token returned with the previous page
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Fetch pages until the collection is exhausted
    Browse {
        /// Server base URL (overrides config)
        #[arg(long)]
        url: Option<String>,

        /// Endpoint to call
        #[arg(short, long, value_enum, default_value = "better")]
        endpoint: Endpoint,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Prefetch the following page on every request
        #[arg(long)]
        prefetch: bool,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },
}

/// Pagination endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Endpoint {
    /// `/default-pagination`, store continuation key
    Default,
    /// `/better-pagination`, lookahead sentinel
    Better,
}

impl From<Endpoint> for BoundaryStrategy {
    fn from(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Default => BoundaryStrategy::StoreNative,
            Endpoint::Better => BoundaryStrategy::Lookahead,
        }
    }
}
