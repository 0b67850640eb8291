//! CLI module
//!
//! Command-line interface over [`CachingClient`](crate::client::CachingClient).
//!
//! # Commands
//!
//! - `fetch` - Read every record of a table
//! - `create` - Create records from JSON input
//! - `update` - Update records from JSON input
//! - `delete` - Delete records by id
//! - `match` - Copy record ids onto rows by key fields
//! - `webhooks` - Manage webhooks for a base

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, WebhookCommands};
pub use runner::Runner;
