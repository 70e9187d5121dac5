//! Keyset (seek) pagination primitives.
//!
//! A page is fetched by asking the store for `limit + 1` rows strictly after
//! the cursor. The extra row only signals that more data exists; it is never
//! returned. The cursor handed back is the key of the last returned row, so
//! the next request resumes right after it.

use rolegate_core::{AppError, AppResult};

/// One keyset page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeysetQuery<K> {
    /// Exclusive lower bound. `None` starts from the beginning.
    pub after: Option<K>,
    /// Maximum number of items to return.
    pub limit: usize,
}

impl<K> KeysetQuery<K> {
    /// Creates a page request. A zero limit is rejected.
    pub fn new(after: Option<K>, limit: usize) -> AppResult<Self> {
        if limit == 0 {
            return Err(AppError::Validation(
                "page limit must be greater than zero".to_owned(),
            ));
        }

        Ok(Self { after, limit })
    }

    /// Number of rows to request from the store.
    #[must_use]
    pub fn fetch_limit(&self) -> usize {
        self.limit.saturating_add(1)
    }
}

/// One page of keyset results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetPage<T, K> {
    /// Page items in ascending key order.
    pub items: Vec<T>,
    /// Cursor for the following page, present only when more rows exist.
    pub next_cursor: Option<K>,
}

impl<T, K> KeysetPage<T, K> {
    /// Builds a page from rows fetched with [`KeysetQuery::fetch_limit`].
    #[must_use]
    pub fn from_overfetched(mut rows: Vec<T>, limit: usize, key_of: impl Fn(&T) -> K) -> Self {
        if rows.len() <= limit {
            return Self {
                items: rows,
                next_cursor: None,
            };
        }

        rows.truncate(limit);
        let next_cursor = rows.last().map(key_of);
        Self {
            items: rows,
            next_cursor,
        }
    }

    /// Returns whether a following page exists.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
