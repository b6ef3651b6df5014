//! SurrealDB-backed character repository
//!
//! Each operation is a single statement. Absence comes back as an empty
//! result set and is surfaced as `Ok(None)`.

use std::sync::Arc;

use super::mapping::{
    episodes_to_storage, patch_assignments, CharacterContent, CharacterDocument, PROJECTION,
    SCHEMA, TABLE,
};
use super::model::{Character, CharacterPatch, NewCharacter, ENTITY};
use crate::error::DatabaseError;
use crate::ids::CharacterId;
use crate::repository::{
    Pagination, Repository, RepositoryError, RepositoryOperation, RepositoryResult,
};
use crate::surrealdb_backend::SurrealClient;

/// Character repository over a shared SurrealDB client
#[derive(Clone)]
pub struct SurrealCharacterRepository {
    client: Arc<SurrealClient>,
}

impl SurrealCharacterRepository {
    /// Create a repository over an already connected client
    pub fn new(client: Arc<SurrealClient>) -> Self {
        Self { client }
    }

    /// Define the `character` table and its fields (idempotent)
    pub async fn define_schema(&self) -> RepositoryResult<()> {
        self.client
            .query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| store_error(e, RepositoryOperation::DefineSchema))?;

        tracing::debug!(table = TABLE, "Character schema defined");
        Ok(())
    }
}

/// Classify a driver error and tag it with the repository operation
fn store_error(err: surrealdb::Error, operation: RepositoryOperation) -> RepositoryError {
    RepositoryError::from(DatabaseError::from(err).with_operation(operation.into()))
        .with_operation(operation)
        .with_entity_type(ENTITY)
}

fn select_page_sql(pagination: &Pagination) -> String {
    let mut sql = format!("SELECT {} FROM type::table($tb)", PROJECTION);
    if pagination.effective_limit().is_some() {
        sql.push_str(" LIMIT $limit");
    }
    if pagination.effective_offset().is_some() {
        sql.push_str(" START $start");
    }
    sql
}

impl Repository<CharacterId, Character, NewCharacter, CharacterPatch>
    for SurrealCharacterRepository
{
    async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<Character>> {
        let operation = RepositoryOperation::FindPage;
        tracing::debug!(
            limit = ?pagination.limit,
            offset = ?pagination.offset,
            "Listing characters"
        );

        let mut query = self
            .client
            .query(select_page_sql(&pagination))
            .bind(("tb", TABLE));
        if let Some(limit) = pagination.effective_limit() {
            query = query.bind(("limit", limit));
        }
        if let Some(offset) = pagination.effective_offset() {
            query = query.bind(("start", offset));
        }

        let mut response = query.await.map_err(|e| store_error(e, operation))?;
        let documents: Vec<CharacterDocument> =
            response.take(0).map_err(|e| store_error(e, operation))?;

        documents
            .into_iter()
            .map(|doc| doc.into_character(operation))
            .collect()
    }

    async fn find_by_id(&self, id: &CharacterId) -> RepositoryResult<Option<Character>> {
        let operation = RepositoryOperation::FindById;
        tracing::debug!(id = %id, "Finding character");

        let mut response = self
            .client
            .query("SELECT * FROM type::thing($tb, $id)")
            .bind(("tb", TABLE))
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        let document: Option<CharacterDocument> = response
            .take(0)
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        document
            .map(|doc| doc.into_character_with_id(id.clone(), operation))
            .transpose()
    }

    async fn insert(&self, data: NewCharacter) -> RepositoryResult<Character> {
        let operation = RepositoryOperation::Insert;
        let id = CharacterId::generate();
        tracing::debug!(id = %id, name = %data.name, "Inserting character");

        let mut response = self
            .client
            .query("CREATE type::thing($tb, $id) CONTENT $content RETURN AFTER")
            .bind(("tb", TABLE))
            .bind(("id", id.to_string()))
            .bind(("content", CharacterContent::from(data)))
            .await
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        let document: Option<CharacterDocument> = response
            .take(0)
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        let document = document.ok_or_else(|| {
            RepositoryError::database_error(operation, "create returned no record")
                .with_entity(ENTITY, id.as_str())
        })?;

        let character = document.into_character_with_id(id, operation)?;
        tracing::info!(id = %character.id, "Character created");
        Ok(character)
    }

    async fn update_by_id(
        &self,
        id: &CharacterId,
        data: CharacterPatch,
    ) -> RepositoryResult<Option<Character>> {
        let operation = RepositoryOperation::Update;
        tracing::debug!(id = %id, "Updating character");

        let sql = format!(
            "UPDATE type::thing($tb, $id) SET {} RETURN AFTER",
            patch_assignments(&data).join(", ")
        );

        let mut query = self
            .client
            .query(sql)
            .bind(("tb", TABLE))
            .bind(("id", id.to_string()));
        if let Some(name) = data.name {
            query = query.bind(("name", name));
        }
        if let Some(episodes) = data.episodes {
            query = query.bind(("episodes", episodes_to_storage(&episodes)));
        }
        if let Some(Some(planet)) = data.planet {
            query = query.bind(("planet", planet.as_str()));
        }

        let mut response = query
            .await
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        let document: Option<CharacterDocument> = response
            .take(0)
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        document
            .map(|doc| doc.into_character_with_id(id.clone(), operation))
            .transpose()
    }

    async fn delete_by_id(&self, id: &CharacterId) -> RepositoryResult<Option<Character>> {
        let operation = RepositoryOperation::Delete;
        tracing::debug!(id = %id, "Deleting character");

        let mut response = self
            .client
            .query("DELETE type::thing($tb, $id) RETURN BEFORE")
            .bind(("tb", TABLE))
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        let document: Option<CharacterDocument> = response
            .take(0)
            .map_err(|e| store_error(e, operation).with_entity(ENTITY, id.as_str()))?;

        let removed = document
            .map(|doc| doc.into_character_with_id(id.clone(), operation))
            .transpose()?;
        if removed.is_some() {
            tracing::info!(id = %id, "Character deleted");
        }
        Ok(removed)
    }
}
