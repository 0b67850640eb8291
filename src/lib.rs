// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Airtable Cache Client
//!
//! An Airtable client that can route reads through a caching middleware and
//! converts between Airtable's nested records and flat rows.
//!
//! ## Features
//!
//! - **Flat Rows**: `{id, fields}` records become one map per row with an
//!   `at_record_id` pseudo-field
//! - **Non-finite Floats**: `Infinity`, `-Infinity` and `NaN` travel as
//!   `{"specialValue": ...}` objects
//! - **Batching**: writes are split into requests of at most ten records
//! - **Pagination**: reads follow `offset` cursors lazily
//! - **Cache Routing**: reads can go through a middleware using `X-Mw-Bearer`
//! - **Webhooks**: create, list, poll, refresh and toggle
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use airtable_cache_client::{CachingClient, ClientConfig, FetchOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env();
//!     let client = CachingClient::new(&config)?;
//!
//!     let rows = client.fetch_rows("Tasks", &FetchOptions::new().via_cache()).await?;
//!     for row in &rows {
//!         println!("{:?}", row.get("at_record_id"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        CachingClient                            │
//! │  fetch() → Records   create() / update() → [WireRecord]         │
//! │  delete() → [DeletedRecord]   webhooks() → WebhookClient        │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │   Batch   │   Records   │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ API Key  │ Transport │ offset cursor │ ≤10/chunk │ from_wire   │
//! │ Cache    │ Rate Limit│ lazy stream   │ sequential│ to_wire     │
//! │ PAT      │ No retry  │               │           │ codec       │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Special-value codec and field values
pub mod codec;

/// Wire records and flat rows
pub mod records;

/// Write chunking
pub mod batch;

/// Offset pagination
pub mod pagination;

/// Credentials and header assembly
pub mod auth;

/// HTTP transport with rate limiting
pub mod http;

/// Client configuration
pub mod config;

/// Request orchestration
pub mod client;

/// Record id matching
pub mod matcher;

/// Webhook management
pub mod webhooks;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{CachingClient, FetchOptions, Records, WriteOptions};
pub use codec::FieldValue;
pub use config::ClientConfig;
pub use matcher::{match_record_ids, MatchOutcome};
pub use records::{FlatRow, WireRecord, RECORD_ID_FIELD};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
