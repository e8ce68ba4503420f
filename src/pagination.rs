use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
pub const MAX_ITEMS_PER_PAGE: usize = 50;
/// Highest page whose offset still fits an SQL `OFFSET`.
pub const MAX_PAGE: usize = (i64::MAX / MAX_ITEMS_PER_PAGE as i64) as usize;

/// Page window requested from a repository. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Clamps raw caller input: 1 <= page <= [`MAX_PAGE`] and
    /// 1 <= per_page <= [`MAX_ITEMS_PER_PAGE`].
    pub fn clamped(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, MAX_PAGE as i64) as usize;
        let per_page = per_page
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE as i64)
            .clamp(1, MAX_ITEMS_PER_PAGE as i64) as usize;
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        let offset = (self.page.max(1) - 1).saturating_mul(self.per_page);
        i64::try_from(offset).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Pagination block returned next to a page of results.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total_items: usize) -> Self {
        Self {
            page: pagination.page,
            page_size: pagination.per_page,
            total_items,
            total_pages: total_items.div_ceil(pagination.per_page),
        }
    }
}
