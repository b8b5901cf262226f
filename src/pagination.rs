use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination metadata attached to every paginated listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// The `{data, meta}` envelope shared by the paginated listings.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        Self {
            data,
            meta: PageMeta {
                page,
                page_size,
                total,
                total_pages: total_pages(total, page_size),
            },
        }
    }
}

pub fn clamp_page(page: Option<i64>) -> i64 {
    match page {
        Some(page) if page >= 1 => page,
        _ => 1,
    }
}

/// Out-of-range sizes fall back to the default rather than erroring, so
/// `page_size` can never reach the offset/limit math as zero.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    match page_size {
        Some(size) if size > 0 && size <= MAX_PAGE_SIZE => size,
        _ => DEFAULT_PAGE_SIZE,
    }
}

pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

fn total_pages(total: i64, page_size: i64) -> i64 {
    (total + page_size - 1) / page_size
}
