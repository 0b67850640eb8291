//! Pagination module
//!
//! Airtable list endpoints return at most one page of records plus an opaque
//! `offset` token while more remain. The first request carries no token and
//! the sequence ends on the first response without one.
//!
//! # Overview
//!
//! [`paginate`] turns a page-fetching closure into a lazy [`Stream`] of items.
//! Each poll that needs a new page performs one request; pages are never
//! fetched ahead or out of order.
//!
//! [`Stream`]: futures::Stream

mod stream;
mod types;

pub use stream::{paginate, paginate_pages};
pub use types::{Page, PaginationState};
