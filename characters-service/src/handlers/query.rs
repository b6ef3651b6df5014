//! Query parameters for list operations
//!
//! # Example
//!
//! ```rust
//! use characters_service::handlers::PaginationQuery;
//! use characters_service::repository::Pagination;
//!
//! let query = PaginationQuery { limit: Some(10), offset: Some(0) };
//! assert_eq!(query.into_pagination().unwrap(), Pagination::new(Some(10), Some(0)));
//! ```

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use super::error::{ApiError, ApiOperation};
use crate::repository::Pagination;

/// Raw `?limit=&offset=` query string
///
/// Parsed as signed integers so that negative values reach the range
/// rules instead of failing deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Maximum number of items to return; must be positive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(minimum = 1)]
    pub limit: Option<i64>,

    /// Number of items to skip; must not be negative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(minimum = 0)]
    pub offset: Option<i64>,
}

impl PaginationQuery {
    /// Check the range rules, collecting every violation
    pub fn violations(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if matches!(self.limit, Some(limit) if limit < 1) {
            messages.push("limit must be a positive number".to_string());
        }
        if matches!(self.offset, Some(offset) if offset < 0) {
            messages.push("offset must not be less than 0".to_string());
        }
        messages
    }

    /// Convert into repository bounds
    ///
    /// # Errors
    ///
    /// Returns a `ValidationFailed` error listing every violated rule.
    pub fn into_pagination(self) -> Result<Pagination, ApiError> {
        let messages = self.violations();
        if !messages.is_empty() {
            return Err(ApiError::validation_failed(messages).with_operation(ApiOperation::List));
        }

        Ok(Pagination::new(
            self.limit.map(|limit| limit.unsigned_abs()),
            self.offset.map(|offset| offset.unsigned_abs()),
        ))
    }
}
