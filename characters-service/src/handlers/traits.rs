//! Handler trait definitions for REST CRUD patterns
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) like the repository
//! traits, so implementors write plain `async fn`.

use std::future::Future;

use super::error::ApiError;
use crate::repository::Pagination;

/// Standard REST collection handler
///
/// Sits between the transport and a [`crate::repository::Repository`]:
/// validates identifiers, delegates, and maps outcomes onto [`ApiError`].
/// Request bodies arrive already validated.
///
/// # Type Parameters
///
/// - `Id`: The identifier as received from the transport (e.g. a raw path segment)
/// - `Entity`: The entity type returned to clients
/// - `CreateDto`: Validated fields for a new entity
/// - `UpdateDto`: Validated partial update
pub trait CollectionHandler<Id, Entity, CreateDto, UpdateDto>: Send + Sync {
    /// List entities within the given bounds
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = Result<Vec<Entity>, ApiError>> + Send;

    /// Get a single entity
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier` for a malformed id (the store is not contacted),
    /// `NotFound` when nothing matches.
    fn get(&self, id: Id) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    /// Create a new entity and return it as persisted
    fn create(&self, dto: CreateDto) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    /// Apply a partial update and return the merged entity
    ///
    /// # Errors
    ///
    /// Same identifier and absence handling as [`CollectionHandler::get`].
    fn update(
        &self,
        id: Id,
        dto: UpdateDto,
    ) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    /// Remove an entity and return its last known state
    fn remove(&self, id: Id) -> impl Future<Output = Result<Entity, ApiError>> + Send;
}
