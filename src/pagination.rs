use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Page-number pagination settings for one kind of listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

pub const FEED_PAGINATION: Pagination = Pagination {
    default_page_size: 10,
    max_page_size: 50,
};

pub const COMMON_PAGINATION: Pagination = Pagination {
    default_page_size: 20,
    max_page_size: 100,
};

impl Pagination {
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(0) | None => self.default_page_size,
            Some(n) => n.min(self.max_page_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Swap the rows of this page for their rendered form.
    pub fn with_results<U>(self, results: Vec<U>) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results,
        }
    }
}

/// Number of pages needed for `count` items; an empty listing still has page 1.
fn num_pages(count: u64, page_size: u64) -> u64 {
    count.div_ceil(page_size).max(1)
}

/// Requested page number. Absent means the first page; anything that is not a
/// positive integer has no page to show.
fn page_number(raw: Option<&str>) -> ApiResult<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(raw) => match raw.parse::<u64>() {
            Ok(0) | Err(_) => Err(ApiError::NotFound),
            Ok(n) => Ok(n),
        },
    }
}

/// Fetch one page of `select`. Pages are 1-based; anything past the last page is a 404.
pub async fn paginate<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: Option<&str>,
    page_size: Option<&str>,
    pagination: Pagination,
) -> ApiResult<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let page = page_number(page)?;
    let page_size = pagination.page_size(page_size.and_then(|s| s.trim().parse().ok()));

    let paginator = select.paginate(db, page_size);
    let count = paginator.num_items().await?;
    let pages = num_pages(count, page_size);
    if page > pages {
        return Err(ApiError::NotFound);
    }

    let results = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        count,
        next: (page < pages).then_some(page + 1),
        previous: (page > 1).then_some(page - 1),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(FEED_PAGINATION.page_size(None), 10);
        assert_eq!(FEED_PAGINATION.page_size(Some(0)), 10);
        assert_eq!(FEED_PAGINATION.page_size(Some(5)), 5);
        assert_eq!(FEED_PAGINATION.page_size(Some(500)), 50);
        assert_eq!(COMMON_PAGINATION.page_size(Some(500)), 100);
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(None).unwrap(), 1);
        assert_eq!(page_number(Some("")).unwrap(), 1);
        assert_eq!(page_number(Some("3")).unwrap(), 3);
        assert!(matches!(page_number(Some("0")), Err(ApiError::NotFound)));
        assert!(matches!(page_number(Some("-1")), Err(ApiError::NotFound)));
        assert!(matches!(page_number(Some("abc")), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_num_pages() {
        assert_eq!(num_pages(0, 10), 1);
        assert_eq!(num_pages(10, 10), 1);
        assert_eq!(num_pages(11, 10), 2);
    }
}
