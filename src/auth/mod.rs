//! Authentication module
//!
//! Airtable takes a bearer token on every request. Reads routed through the
//! caching middleware carry the same bearer token plus the middleware's own
//! `X-Mw-Bearer` header. The webhook endpoints require a personal access
//! token, which may differ from the key used for record operations.

mod credentials;

pub use credentials::{Credentials, CACHE_AUTH_HEADER};
