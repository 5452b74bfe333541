//! Paging contract shared by every listing endpoint.
//!
//! Query strings follow the `page`/`size`/`sort` convention
//! (`GET /medicos?page=1&size=5&sort=crm,desc`). Pages are zero based.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: Direction::Desc,
        }
    }

    /// Parses `property` or `property,direction`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut parts = raw.splitn(2, ',').map(str::trim);

        let property = parts.next().unwrap_or_default();
        if property.is_empty() {
            return Err(AppError::BadRequest("Sort property must not be empty".to_string()));
        }

        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(dir) => {
                return Err(AppError::BadRequest(format!("Invalid sort direction: {}", dir)));
            }
        };

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// Raw query parameters as sent by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page: usize, size: usize, sort: Sort) -> Self {
        let size = match size {
            0 => DEFAULT_PAGE_SIZE,
            s => s.min(MAX_PAGE_SIZE),
        };

        Self { page, size, sort }
    }

    /// Applies the endpoint defaults (size 10, `default_sort`) to whatever the
    /// caller left out.
    pub fn from_query(query: &PageQuery, default_sort: Sort) -> Result<Self, AppError> {
        let sort = match query.sort.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Sort::parse(raw)?,
            _ => default_sort,
        };

        Ok(Self::new(
            query.page.unwrap_or(0),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort,
        ))
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: usize,
    pub size: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size.max(1) as u64;
        let total_pages = total_elements.div_ceil(size);
        let number_of_elements = content.len();

        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
            number_of_elements,
            first: request.page == 0,
            last: request.page as u64 >= total_pages.saturating_sub(1),
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
