//! Fixed-size pagination with graceful degradation.
//!
//! Page tokens come from untrusted query strings: anything that is not a
//! positive integer selects page 1, and anything past the end selects the
//! last page. Out-of-range input is never an error.

/// Page size of the public post listings.
pub const POSTS_PER_PAGE: u64 = 3;

/// A requested page number parsed from a raw query-string token.
///
/// Missing or non-integer tokens (including negatives) resolve to page 1;
/// `0` is clamped up to 1. Clamping against the actual page count happens in
/// [`Paginator::clamp`], once the total is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageToken(u64);

impl PageToken {
    pub fn parse(raw: Option<&str>) -> Self {
        let number = raw
            .and_then(|token| token.parse::<u64>().ok())
            .unwrap_or(1)
            .max(1);
        Self(number)
    }

    pub fn number(&self) -> u64 {
        self.0
    }
}

/// Page math over a known total. An empty collection still has one (empty)
/// page, so `clamp` always returns a valid page number.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total_items: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(total_items: u64, per_page: u64) -> Self {
        Self {
            total_items,
            per_page: per_page.max(1),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.total_items == 0 {
            1
        } else {
            self.total_items.div_ceil(self.per_page)
        }
    }

    /// Clamp a requested page number to the nearest valid page.
    pub fn clamp(&self, requested: u64) -> u64 {
        requested.max(1).min(self.total_pages())
    }

    /// Item offset of a (clamped) page number.
    pub fn offset(&self, page: u64) -> u64 {
        page.saturating_sub(1) * self.per_page
    }

    /// Assemble a page from already-fetched items.
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages(),
        }
    }
}

/// One page of an ordered sequence, with enough metadata for navigation.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Convert the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
