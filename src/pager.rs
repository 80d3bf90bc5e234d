use std::ops::Range;

/// Items per grid page.
pub const PAGE_SIZE: usize = 20;

/// Current page over a filtered list of `total_items` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    total_items: usize,
}

impl Pager {
    /// Pager positioned on the first page.
    pub fn new(total_items: usize) -> Self {
        Self {
            page: 1,
            total_items,
        }
    }

    /// Pager positioned on `requested`, clamped into range.
    pub fn with_requested(total_items: usize, requested: i64) -> Self {
        let total_pages = total_pages_for(total_items);
        let page = requested.clamp(1, total_pages as i64) as usize;
        Self { page, total_items }
    }

    /// Track a new list length, keeping the page unless it no longer exists.
    pub fn resize(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.page = self.page.min(self.total_pages());
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages_for(self.total_items)
    }

    /// Index range of the current page, end-exclusive.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * PAGE_SIZE).min(self.total_items);
        let end = (start + PAGE_SIZE).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Jump to page `n`; out-of-range requests are ignored.
    pub fn goto(&mut self, n: usize) -> bool {
        if (1..=self.total_pages()).contains(&n) {
            self.page = n;
            true
        } else {
            false
        }
    }

    pub fn first(&mut self) -> bool {
        self.goto(1)
    }

    pub fn last(&mut self) -> bool {
        self.goto(self.total_pages())
    }

    /// e.g. " 21-40 of 57 ".
    pub fn range_label(&self) -> String {
        let range = self.range();
        format!(
            " {}-{} of {} ",
            if self.total_items == 0 { 0 } else { range.start + 1 },
            range.end,
            self.total_items
        )
    }
}

pub fn total_pages_for(total_items: usize) -> usize {
    total_items.div_ceil(PAGE_SIZE).max(1)
}
