//! Search with continuation-token pagination.

use tracing::debug;

use super::{quote, take_payload, PlayApi};
use crate::error::{ApiResult, ProtocolError};
use crate::proto::SearchResponse;
use crate::transport::Transport;

/// Most continuation pages a single search follows.
pub const MAX_SEARCH_PAGES: usize = 100;

impl<T: Transport> PlayApi<T> {
    /// Searches apps, following continuation pages until at least
    /// `desired_count` hits are collected.
    ///
    /// Pages are merged by appending their result containers, so
    /// [`SearchResponse::items`] yields hits in server order. Fewer hits
    /// than requested come back when the server runs out of pages. A server
    /// that keeps issuing continuation tokens past [`MAX_SEARCH_PAGES`]
    /// fails with [`ProtocolError::PaginationLimit`].
    pub fn search(
        &mut self,
        query: &str,
        desired_count: usize,
        offset: Option<u32>,
    ) -> ApiResult<SearchResponse> {
        let mut path = format!("search?c=3&q={}", quote(query));
        if let Some(o) = offset {
            path.push_str(&format!("&o={}", o));
        }

        let mut merged = self.search_page(&path)?;
        let mut collected = page_hits(&merged);
        let mut next = merged.next_page_url().map(str::to_string);
        let mut pages_followed = 0;

        while collected < desired_count {
            let Some(next_path) = next.take() else {
                break;
            };
            if pages_followed == MAX_SEARCH_PAGES {
                return Err(ProtocolError::PaginationLimit {
                    pages: pages_followed + 1,
                }
                .into());
            }

            let page = self.search_page(&next_path)?;
            pages_followed += 1;
            if page.doc.is_empty() {
                debug!(path = %next_path, "Empty search page, stopping");
                break;
            }

            collected += page_hits(&page);
            next = page.next_page_url().map(str::to_string);
            debug!(collected, desired_count, "Merged search page");
            merge_page(&mut merged, page);
        }

        Ok(merged)
    }

    fn search_page(&mut self, path: &str) -> ApiResult<SearchResponse> {
        let message = self.executor.execute(path, None)?;
        take_payload(message, "search", "searchResponse", |p| p.search_response)
    }
}

/// Hits counted toward `desired_count`: the children of the page's first
/// result container. Further containers on the same page are kept in the
/// merged result but do not advance the count.
fn page_hits(page: &SearchResponse) -> usize {
    page.doc.first().map_or(0, |container| container.child.len())
}

/// Appends a later page to the merged result. Scalar fields keep the
/// first page's values.
fn merge_page(merged: &mut SearchResponse, page: SearchResponse) {
    merged.doc.extend(page.doc);
    merged.bucket.extend(page.bucket);
}
