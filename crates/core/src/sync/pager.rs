//! Page-window arithmetic for resuming mid-corpus.
//!
//! Given a half-open logical record range `[start, end)` over the remote
//! corpus, compute the minimal set of 1-based remote pages covering it and
//! where the requested records sit inside the concatenated page results.
//! This avoids refetching the whole corpus when a run resumes from a
//! persisted cursor.

use std::ops::RangeInclusive;

/// Fetch plan for one batch: which pages to pull and how to slice them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    first_page: u32,
    last_page: u32,
    offset: usize,
    len: usize,
}

impl BatchPlan {
    /// Plan the fetch for logical records `[start, end)` with the given page
    /// size. Returns `None` for an empty range.
    pub fn for_range(start: u64, end: u64, page_size: u32) -> Option<Self> {
        if end <= start || page_size == 0 {
            return None;
        }

        let page_size = u64::from(page_size);
        let first_page = start / page_size + 1;
        let last_page = end.div_ceil(page_size);

        Some(Self {
            first_page: first_page as u32,
            last_page: last_page as u32,
            offset: (start % page_size) as usize,
            len: (end - start) as usize,
        })
    }

    /// The 1-based remote pages this plan fetches, in order.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.first_page..=self.last_page
    }

    /// Number of remote calls the plan requires.
    pub fn page_count(&self) -> u32 {
        self.last_page - self.first_page + 1
    }

    /// Offset of the first requested record within the concatenated pages.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of logical records requested.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the plan covers no records (never produced by
    /// [`BatchPlan::for_range`], which returns `None` instead).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slice the concatenated page results down to exactly the requested
    /// records. Clamps when fewer items were fetched than planned (budget
    /// cut the page loop short, or the remote corpus shrank).
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = self.offset.min(items.len());
        let end = (self.offset + self.len).min(items.len());
        items[start..end].to_vec()
    }
}
