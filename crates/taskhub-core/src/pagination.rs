//! Cursor-based pagination over an already-fetched, already-sorted set.
//!
//! `paginate` is a pure function: cursor, limit, and the full result set
//! arrive as arguments on every call, and nothing is remembered between
//! calls. Position state must never live on a service object — a shared
//! cursor field would be mutated by every concurrent request and corrupt
//! unrelated callers' pages.
//!
//! The cursor is the ID of the last item the caller has already seen.
//! Reusing the final item's ID as a cursor is an `OutOfRange` error rather
//! than an empty page; callers should stop on `has_next_page = false`
//! instead of probing past the end.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskhubError};

/// Continuation metadata for one returned page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One page of an ordered result set. `total_count` counts the full set,
/// not the slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_info: PageInfo,
}

/// Slice `items` according to an optional cursor and page size.
///
/// * no cursor, no limit — the whole set as a single page;
/// * cursor without limit — everything after the cursor;
/// * unknown cursor — `NotFound`;
/// * cursor at the last index — `OutOfRange` (nothing lies beyond it).
pub fn paginate<T, F>(
    items: &[T],
    id_of: F,
    after: Option<&str>,
    first: Option<usize>,
) -> Result<Page<T>>
where
    T: Clone,
    F: Fn(&T) -> String,
{
    let total = items.len();

    if after.is_none() && first.is_none() {
        return Ok(Page {
            items: items.to_vec(),
            total_count: total,
            page_info: PageInfo {
                start_cursor: items.first().map(&id_of),
                end_cursor: items.last().map(&id_of),
                has_next_page: false,
            },
        });
    }

    let start = match after {
        Some(cursor) => {
            let pos = items
                .iter()
                .position(|item| id_of(item) == cursor)
                .ok_or_else(|| TaskhubError::NotFound(format!("cursor {cursor}")))?;
            if pos == total - 1 {
                return Err(TaskhubError::OutOfRange(format!(
                    "cursor {cursor} is the last element"
                )));
            }
            pos + 1
        }
        None => 0,
    };

    let end = total.min(start + first.unwrap_or(total));
    let slice = &items[start..end];

    Ok(Page {
        items: slice.to_vec(),
        total_count: total,
        page_info: PageInfo {
            start_cursor: slice.first().map(&id_of),
            end_cursor: slice.last().map(&id_of),
            has_next_page: end < total,
        },
    })
}
