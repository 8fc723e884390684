/// Shared view models and query parameter types
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validate a store identifier and return it as an owned string
pub fn parse_id(raw: &str, what: &str) -> AppResult<String> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("Invalid {} id: {}", what, raw)))?;
    Ok(raw.to_string())
}

/// Parse an RFC3339 timestamp stored as text
pub fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(format!("Invalid timestamp: {}", e)))
}

/// Owner/channel summary joined into denormalized views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// Sort direction supplied by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

    pub fn from_str(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::Validation(format!("Invalid sort direction: {}", s))),
        }
    }
}

/// Page request, 1-indexed
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageParams {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let defaults = Self::default();
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(defaults.page),
            limit: limit.filter(|l| *l >= 1).unwrap_or(defaults.limit),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

/// One page of a listing, with totals for the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, params: PageParams, total_items: i64) -> Self {
        let total_pages = (total_items + params.limit as i64 - 1) / params.limit as i64;
        Self {
            items,
            page: params.page,
            limit: params.limit,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_uuid() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(parse_id(&id, "video").unwrap(), id);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(matches!(
            parse_id("not-an-id", "video"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!(SortDirection::from_str("asc").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::from_str("DESC").unwrap(), SortDirection::Desc);
        assert!(SortDirection::from_str("sideways").is_err());
    }

    #[test]
    fn test_page_params_defaults_and_offset() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset(), 0);

        let params = PageParams::new(Some(3), Some(20));
        assert_eq!(params.offset(), 40);

        // Zero values fall back to defaults
        let params = PageParams::new(Some(0), Some(0));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
    }

    #[test]
    fn test_page_totals() {
        let page = Page::new(vec![1, 2, 3], PageParams::new(Some(1), Some(3)), 7);
        assert_eq!(page.total_pages, 3);

        let page: Page<i32> = Page::new(vec![], PageParams::new(Some(5), Some(10)), 12);
        assert_eq!(page.total_pages, 2);
        assert!(page.items.is_empty());
    }
}
