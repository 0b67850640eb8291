//! HTTP client module
//!
//! Provides the transport seam used by every record and webhook operation.
//!
//! # Features
//!
//! - **Transport trait**: one `send` call per request, status and parsed body back
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Status classification**: non-2xx responses become errors after the
//!   service's error payload is logged
//!
//! Requests are never retried.

mod client;
mod rate_limit;
mod response;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Transport};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use response::{HttpRequest, HttpResponse};
