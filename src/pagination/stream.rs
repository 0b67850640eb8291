//! Lazy page streams

use super::types::{Page, PaginationState};
use crate::error::{Error, Result};
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;
use tracing::debug;

/// Stream whole pages from `fetch_page`
///
/// `fetch_page` is called with `None` first and then with each returned
/// cursor until a page comes back without one. An error is yielded once and
/// ends the stream.
pub fn paginate_pages<T, F, Fut>(fetch_page: F) -> impl Stream<Item = Result<Page<T>>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    stream::try_unfold(
        (fetch_page, PaginationState::new()),
        |(mut fetch_page, mut state)| async move {
            if state.done {
                return Ok::<_, Error>(None);
            }

            let page = fetch_page(state.cursor.take()).await?;
            state.advance(page.items.len(), page.next.clone());
            debug!(
                "Fetched page {} ({} items, {} total, more: {})",
                state.pages,
                page.items.len(),
                state.total_fetched,
                !state.done
            );

            Ok::<_, Error>(Some((page, (fetch_page, state))))
        },
    )
}

/// Stream individual items across all pages
pub fn paginate<T, F, Fut>(fetch_page: F) -> impl Stream<Item = Result<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    paginate_pages(fetch_page)
        .map_ok(|page| stream::iter(page.items.into_iter().map(Ok)))
        .try_flatten()
}
