//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Airtable client with optional read caching
#[derive(Parser, Debug)]
#[command(name = "airtable-cache-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); AIRTABLE_* variables override it
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base id, overriding the configured default
    #[arg(short, long, global = true)]
    pub base: Option<String>,

    /// Convert to and from flat rows
    #[arg(long, global = true, conflicts_with = "raw")]
    pub process: bool,

    /// Send and return records exactly as Airtable does
    #[arg(long, global = true)]
    pub raw: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read every record of a table
    Fetch {
        /// Table name or id
        table: String,

        /// Only records in this view
        #[arg(long)]
        view: Option<String>,

        /// Only these fields (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Airtable formula records must satisfy
        #[arg(long)]
        formula: Option<String>,

        /// Maximum number of records
        #[arg(long)]
        max_records: Option<u32>,

        /// Records per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Read through the cache when one is configured
        #[arg(long)]
        via_cache: bool,
    },

    /// Create records from JSON input
    Create {
        /// Table name or id
        table: String,

        /// JSON file with the records, or - for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Update records from JSON input
    Update {
        /// Table name or id
        table: String,

        /// JSON file with the records, or - for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Send null values so Airtable clears those fields
        #[arg(long)]
        keep_none: bool,
    },

    /// Delete records by id
    Delete {
        /// Table name or id
        table: String,

        /// Record ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Copy record ids onto rows that lack them, matching on key fields
    Match {
        /// JSON rows without record ids
        #[arg(long)]
        without_ids: PathBuf,

        /// JSON rows carrying at_record_id
        #[arg(long)]
        with_ids: PathBuf,

        /// Key field (repeatable)
        #[arg(short, long = "key", required = true)]
        keys: Vec<String>,
    },

    /// Manage webhooks
    Webhooks {
        #[command(subcommand)]
        command: WebhookCommands,
    },
}

/// Webhook subcommands
#[derive(Subcommand, Debug)]
pub enum WebhookCommands {
    /// List webhooks of the base
    List,

    /// Register a webhook
    Create {
        /// JSON file with the webhook specification, or - for stdin
        #[arg(short, long, default_value = "-")]
        spec: String,

        /// URL pinged when payloads are available
        #[arg(long)]
        notification_url: Option<String>,
    },

    /// Delete a webhook
    Delete { id: String },

    /// Poll payloads
    Payloads {
        id: String,

        /// Payload cursor to start from
        #[arg(long)]
        cursor: Option<u64>,

        /// Payloads per page (at most 50)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Extend a webhook's expiration
    Refresh { id: String },

    /// Enable or disable notification pings
    Notifications {
        id: String,

        /// Disable instead of enable
        #[arg(long)]
        disable: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
