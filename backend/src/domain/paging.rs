//! Page requests and page envelopes shared by listing operations.

use std::fmt;

/// Default page size when the client does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Rejected paging parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    PageOutOfRange,
    LimitOutOfRange { max: u32 },
}

impl fmt::Display for PageRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageOutOfRange => write!(f, "page must be at least 1"),
            Self::LimitOutOfRange { max } => write!(f, "limit must be between 1 and {max}"),
        }
    }
}

impl std::error::Error for PageRequestError {}

/// One-based page number and page size.
///
/// # Examples
/// ```
/// use experience_backend::domain::PageRequest;
///
/// let page = PageRequest::new(Some(3), Some(10)).expect("valid paging");
/// assert_eq!(page.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    pub fn page(self) -> u32 {
        self.page
    }

    pub fn limit(self) -> u32 {
        self.limit
    }

    /// Number of items skipped before this page.
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            results,
            page: request.page(),
            limit: request.limit(),
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit.max(1)))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            results: self.results.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}
