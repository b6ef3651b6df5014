//! Repository trait definitions
//!
//! Uses RPITIT (Return Position Impl Trait In Traits), available since
//! Rust 1.75, so implementors can write plain `async fn` without `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use characters_service::repository::{Pagination, Repository, RepositoryResult};
//!
//! impl Repository<CharacterId, Character, NewCharacter, CharacterPatch> for SurrealCharacterRepository {
//!     async fn find_by_id(&self, id: &CharacterId) -> RepositoryResult<Option<Character>> {
//!         // SELECT * FROM type::thing($tb, $id)
//!     }
//!     // ... other methods
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::Pagination;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Persistence access for one entity type
///
/// Every operation is a single store round trip with no retries.
/// "No matching document" is reported as `Ok(None)`, never as an error.
///
/// # Type Parameters
///
/// - `Id`: The identifier type for the entity
/// - `Entity`: The full entity type returned from queries
/// - `Create`: Validated fields for a new entity
/// - `Update`: Validated partial update; only supplied fields are applied
pub trait Repository<Id, Entity, Create, Update>: Send + Sync {
    /// Scan entities in the store's native order with optional skip/limit
    ///
    /// An empty collection yields an empty `Vec`.
    fn find_page(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Find an entity by its unique identifier
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Persist a new entity built from the validated fields
    ///
    /// The repository assigns the identifier and the initial version.
    fn insert(&self, data: Create) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Apply a partial update and return the post-update entity
    fn update_by_id(
        &self,
        id: &Id,
        data: Update,
    ) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Atomically find and delete an entity, returning its last state
    fn delete_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;
}
