//! Handler traits for REST CRUD patterns
//!
//! Builds on the repository traits to provide HTTP-aware error handling.
//!
//! - [`CollectionHandler`]: list, get, create, update, remove
//! - [`PaginationQuery`]: `?limit=&offset=` with range rules
//! - [`ApiError`]: automatic HTTP status code mapping
//!
//! # Integration with Axum
//!
//! ```rust,ignore
//! use axum::extract::{Path, State};
//! use characters_service::handlers::{ApiError, CollectionHandler};
//!
//! async fn get_character(
//!     State(gateway): State<CharacterGateway<R>>,
//!     Path(id): Path<String>,
//! ) -> Result<Json<Character>, ApiError> {
//!     gateway.get(id).await.map(Json)
//! }
//! ```

mod error;
mod query;
mod traits;

pub use error::{
    ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation, INTERNAL_ERROR_MESSAGE,
    INVALID_ID_MESSAGE, VALIDATION_FAILED_MESSAGE,
};
pub use query::PaginationQuery;
pub use traits::CollectionHandler;
