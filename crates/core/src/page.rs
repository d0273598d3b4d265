//! Pagination of the document listing.
//!
//! Query parameters arrive as untrusted strings. Anything that does not parse
//! as a non-negative integer falls back to a default: page 1, and
//! [`DEFAULT_LIMIT`] documents per page. A limit of zero is honored and
//! means an empty page.

/// Page size when the request does not give a usable one.
pub const DEFAULT_LIMIT: u64 = 20;

/// One window of the document listing. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u64,
    limit: u64,
}

impl Page {
    /// Page 0 is treated as page 1. `limit` is used as given.
    #[must_use]
    pub fn new(number: u64, limit: u64) -> Self {
        Self {
            number: number.max(1),
            limit,
        }
    }

    /// Build a page from raw `page` and `limit` query values.
    #[must_use]
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let number = page.and_then(parse).unwrap_or(1);
        let limit = limit.and_then(parse).unwrap_or(DEFAULT_LIMIT);
        Self::new(number, limit)
    }

    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Documents before this page: `limit * (number - 1)`, saturating.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.limit.saturating_mul(self.number.saturating_sub(1))
    }

    /// A zero-sized page; there is nothing to fetch.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_LIMIT)
    }
}

fn parse(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
