//! Page-based pagination for script listings.
//!
//! Pages are 1-based. Row ranges are 0-based and inclusive on both ends, the
//! way the management UI requests them.

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default number of scripts per page (a 3x3 card grid).
pub const DEFAULT_PAGE_SIZE: i64 = 9;

/// Maximum number of scripts per page.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Normalize raw query values.
    ///
    /// Missing or non-positive pages become page 1; the page size falls back
    /// to [`DEFAULT_PAGE_SIZE`] and is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            page_size: clamp_page_size(page_size),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Inclusive `(first, last)` row indices covered by this page.
    ///
    /// ```
    /// use abinject_core::pagination::PageRequest;
    /// assert_eq!(PageRequest::new(Some(2), Some(9)).row_range(), (9, 17));
    /// ```
    pub fn row_range(&self) -> (i64, i64) {
        let first = self.offset();
        (first, first.saturating_add(self.page_size - 1))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Clamp a requested page size to `1..=MAX_PAGE_SIZE`, defaulting when absent.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// Number of pages needed to show `total` rows: `ceil(total / page_size)`.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

// ---------------------------------------------------------------------------
// Search input
// ---------------------------------------------------------------------------

/// Escape `%`, `_`, and `\` so user input matches literally inside `LIKE`.
///
/// The pattern must be used with `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring test used by in-memory search.
///
/// The needle is matched verbatim; surrounding whitespace is significant.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
