//! CLI module
//!
//! Command-line interface for the pagination service.
//!
//! # Commands
//!
//! - `serve` - Seed a store and serve both pagination endpoints
//! - `fetch` - Fetch a single page from a running server
//! - `browse` - Walk every page through the pagination client

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{open_store, router, serve, AppContext};
