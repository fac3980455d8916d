//! Pagination primitives: page tokens, pages, and generic collectors
//!
//! Two pagination disciplines coexist in the GitHub API surface: GraphQL
//! connections continue via an opaque cursor, REST collections via an
//! incrementing page number signalled by the `Link` response header. An
//! endpoint fixes one discipline for its lifetime; the token variants are
//! deliberately not interchangeable.

use std::future::Future;

use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Items requested per page (GitHub's maximum)
pub const PAGE_SIZE: u32 = 100;

/// Continuation token for the next page of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// Opaque GraphQL cursor (`after`)
    Cursor(String),

    /// REST page number, starting at 1
    Number(u32),
}

/// One page of a collection plus the token for the next page, if any
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageToken>,
}

/// GraphQL connection pagination metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,

    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Token for the next page, or `None` when the connection is exhausted.
    pub fn next_token(&self) -> Option<PageToken> {
        if self.has_next_page {
            self.end_cursor.clone().map(PageToken::Cursor)
        } else {
            None
        }
    }
}

/// Whether a `Link` header value advertises a next page.
pub fn link_has_next(link_header: &str) -> bool {
    link_header
        .split(',')
        .any(|segment| segment.contains("rel=\"next\""))
}

/// Drain a page fetcher to exhaustion, concatenating pages in order.
///
/// The fetcher receives `None` for the first page and the previous page's
/// `next` token afterwards. Any fetch error aborts the whole collection; no
/// partial result is returned.
pub async fn collect_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<PageToken>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token: Option<PageToken> = None;

    loop {
        let page = fetch(token).await?;
        items.extend(page.items);
        token = match page.next {
            Some(next) => Some(next),
            None => break,
        };
    }

    Ok(items)
}

/// Like [`collect_all`], but verifies the collected length against an
/// independently reported total. A mismatch means the remote returned an
/// inconsistent page set mid-enumeration and the data cannot be trusted.
pub async fn collect_all_counted<T, F, Fut>(expected: usize, fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<PageToken>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let items = collect_all(fetch).await?;

    if items.len() != expected {
        return Err(ApiError::CountMismatch {
            expected,
            actual: items.len(),
        }
        .into());
    }

    Ok(items)
}
