use crate::types::{error::AppError, response::Page};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 1-based page request, validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 {
            return Err(AppError::Validation("page starts at 1".into()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "pageSize must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        // the row offset has to fit a signed 64-bit OFFSET
        let in_range = (page - 1)
            .checked_mul(page_size)
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !in_range {
            return Err(AppError::Validation(format!("page {page} is out of range")));
        }
        Ok(Self { page, page_size })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Runs `select` (already ordered) through sea-orm's paginator and reports totals.
pub async fn fetch_page<'db, C, E>(
    conn: &'db C,
    select: Select<E>,
    request: PageRequest,
) -> Result<Page<E::Model>, AppError>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'db,
{
    let paginator = select.paginate(conn, request.page_size);
    let totals = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(request.page - 1).await?;
    Ok(Page {
        items,
        page: request.page,
        page_size: request.page_size,
        total_items: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}
