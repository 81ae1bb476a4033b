//! Page requests and paginated results

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{equipment::Equipment, loan::LoanDetails};
use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Resolved pagination: 0-based page, bounded size, whitelisted sort column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort_field: &'static str,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Page sorted by id, newest first
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            sort_field: "id",
            direction: SortDirection::Desc,
        }
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// `ORDER BY` clause body. The column always comes from a static whitelist.
    pub fn order_by(&self, table_alias: &str) -> String {
        format!("{}.{} {}", table_alias, self.sort_field, self.direction.as_sql())
    }
}

/// Pagination query parameters (`?page=0&size=5&sort=id,desc`)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 0
    pub page: Option<i64>,
    /// Page size
    pub size: Option<i64>,
    /// Sort as `field` or `field,asc|desc`
    pub sort: Option<String>,
}

impl PageQuery {
    pub fn resolve(
        &self,
        config: &PaginationConfig,
        sortable: &[&'static str],
    ) -> AppResult<PageRequest> {
        let page = self.page.unwrap_or(0);
        if page < 0 {
            return Err(AppError::InvalidArgument(format!("Invalid page number: {}", page)));
        }

        let size = self.size.unwrap_or(config.default_page_size);
        if size < 1 {
            return Err(AppError::InvalidArgument(format!("Invalid page size: {}", size)));
        }
        let size = size.min(config.max_page_size);
        if page.checked_mul(size).is_none() {
            return Err(AppError::InvalidArgument(format!("Page number out of range: {}", page)));
        }

        let mut request = PageRequest::new(page, size);

        if let Some(sort) = self.sort.as_deref() {
            let mut parts = sort.split(',').map(str::trim);
            let field = parts.next().unwrap_or_default();
            request.sort_field = sortable
                .iter()
                .copied()
                .find(|candidate| candidate.eq_ignore_ascii_case(field))
                .ok_or_else(|| AppError::InvalidArgument(format!("Cannot sort by '{}'", field)))?;

            request.direction = match parts.next() {
                None => SortDirection::Asc,
                Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(d) => {
                    return Err(AppError::InvalidArgument(format!("Invalid sort direction: {}", d)))
                }
            };
        }

        Ok(request)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(EquipmentPage = Page<Equipment>, LoanPage = Page<LoanDetails>)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Items of the current page
    pub items: Vec<T>,
    /// Total number of matching items
    pub total: i64,
    /// Current page number (0-based)
    pub page: i64,
    /// Requested page size
    pub size: i64,
    pub total_pages: i64,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, request: &PageRequest) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + request.size - 1) / request.size
        };
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
            total_pages,
        }
    }

    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }
}
