//! API error types for handler operations
//!
//! [`ApiError`] carries the operation, a kind that fixes the HTTP status,
//! and entity context. It renders as a JSON body via `IntoResponse`.
//!
//! # Example
//!
//! ```rust
//! use characters_service::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Character", "6175ae9112e7cde1912e5b40");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.message, "Character #6175ae9112e7cde1912e5b40 not found");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, RepositoryOperation};

/// Message returned for malformed identifiers
pub const INVALID_ID_MESSAGE: &str = "Invalid id format";

/// Message returned for every store failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned alongside the list of violated rules
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing entities
    List,
    /// Getting a single entity by ID
    Get,
    /// Creating a new entity
    Create,
    /// Partially updating an entity
    Update,
    /// Removing an entity
    Remove,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Path identifier is not in the store's identifier format
    InvalidIdentifier,
    /// One or more field rules were violated
    ValidationFailed,
    /// Malformed request body or query string
    BadRequest,
    /// Store failure; details are logged, never returned
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::InvalidIdentifier => write!(f, "invalid_identifier"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidIdentifier | Self::ValidationFailed | Self::BadRequest => {
                StatusCode::BAD_REQUEST
            }
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// One message per violated rule (validation failures only)
    pub messages: Vec<String>,
    /// The type of entity involved (e.g., "Character")
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            messages: Vec::new(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error: `<Entity> #<id> not found`
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self::new(
            ApiOperation::Get,
            ApiErrorKind::NotFound,
            format!("{} #{} not found", entity_type, entity_id),
        )
        .with_entity(entity_type, entity_id)
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(entity_type: impl Into<String>, raw_id: impl Into<String>) -> Self {
        Self::new(
            ApiOperation::Get,
            ApiErrorKind::InvalidIdentifier,
            INVALID_ID_MESSAGE,
        )
        .with_entity(entity_type, raw_id)
    }

    /// Create a validation failed error listing every violated rule
    pub fn validation_failed(messages: Vec<String>) -> Self {
        Self {
            messages,
            ..Self::new(
                ApiOperation::Create,
                ApiErrorKind::ValidationFailed,
                VALIDATION_FAILED_MESSAGE,
            )
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::BadRequest, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(ref entity_type), Some(ref entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        if !self.messages.is_empty() {
            write!(f, " ({})", self.messages.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Upper-case error code, e.g. `NOT_FOUND`
    pub code: String,
    /// Human-readable message
    pub error: String,
    /// Violated rules, present for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// Operation name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Entity type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Entity identifier as supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        // Server errors were logged with their cause when they were built.
        if !status.is_server_error() {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                violations = ?self.messages,
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            status: status.as_u16(),
            code,
            error: self.message,
            messages: self.messages,
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindPage => ApiOperation::List,
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::Insert => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Remove,
        RepositoryOperation::DefineSchema => ApiOperation::Get,
    }
}

/// Every repository error is a store failure and becomes a 500.
///
/// The underlying message is logged here and replaced with
/// [`INTERNAL_ERROR_MESSAGE`] in the response.
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        tracing::error!(
            operation = %err.operation,
            kind = %err.kind,
            entity_type = ?err.entity_type,
            entity_id = ?err.entity_id,
            retriable = err.is_retriable(),
            "Store failure: {}", err.message
        );

        Self {
            operation: repository_operation_to_api_operation(err.operation),
            kind: ApiErrorKind::InternalError,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            messages: Vec::new(),
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}
