//! Character gateway
//!
//! Turns raw path ids into [`CharacterId`]s, delegates to a repository and
//! maps absence onto `404`. A malformed id is rejected before the store is
//! contacted.

use std::sync::Arc;

use super::model::{Character, CharacterPatch, NewCharacter, ENTITY};
use crate::handlers::{ApiError, ApiOperation, CollectionHandler};
use crate::ids::CharacterId;
use crate::repository::{Pagination, Repository};

/// Gateway over any character repository
pub struct CharacterGateway<R> {
    repository: Arc<R>,
}

impl<R> Clone for CharacterGateway<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> CharacterGateway<R>
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch>,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

fn parse_id(raw: &str, operation: ApiOperation) -> Result<CharacterId, ApiError> {
    CharacterId::parse(raw).map_err(|e| {
        tracing::debug!(id = %raw, error = %e, "Rejected character id");
        ApiError::invalid_identifier(ENTITY, raw).with_operation(operation)
    })
}

/// Built from the id as requested, not its normalized form
fn not_found(requested: &str, operation: ApiOperation) -> ApiError {
    ApiError::not_found(ENTITY, requested).with_operation(operation)
}

impl<R> CollectionHandler<String, Character, NewCharacter, CharacterPatch> for CharacterGateway<R>
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch>,
{
    async fn list(&self, pagination: Pagination) -> Result<Vec<Character>, ApiError> {
        let characters = self.repository.find_page(pagination).await?;
        tracing::debug!(count = characters.len(), "Listed characters");
        Ok(characters)
    }

    async fn get(&self, id: String) -> Result<Character, ApiError> {
        let operation = ApiOperation::Get;
        let key = parse_id(&id, operation)?;
        self.repository
            .find_by_id(&key)
            .await?
            .ok_or_else(|| not_found(&id, operation))
    }

    async fn create(&self, dto: NewCharacter) -> Result<Character, ApiError> {
        Ok(self.repository.insert(dto).await?)
    }

    async fn update(&self, id: String, dto: CharacterPatch) -> Result<Character, ApiError> {
        let operation = ApiOperation::Update;
        let key = parse_id(&id, operation)?;
        if dto.is_empty() {
            tracing::debug!(id = %key, "Empty patch, bumping version only");
        }
        self.repository
            .update_by_id(&key, dto)
            .await?
            .ok_or_else(|| not_found(&id, operation))
    }

    async fn remove(&self, id: String) -> Result<Character, ApiError> {
        let operation = ApiOperation::Remove;
        let key = parse_id(&id, operation)?;
        self.repository
            .delete_by_id(&key)
            .await?
            .ok_or_else(|| not_found(&id, operation))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::characters::model::Episode;
    use crate::handlers::ApiErrorKind;
    use crate::repository::{RepositoryError, RepositoryOperation, RepositoryResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory repository that counts every call
    #[derive(Default)]
    pub(crate) struct MemoryRepository {
        pub records: Mutex<Vec<Character>>,
        pub calls: AtomicUsize,
        pub last_pagination: Mutex<Option<Pagination>>,
        pub fail: bool,
    }

    impl MemoryRepository {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn enter(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RepositoryError::database_error(operation, "store offline"));
            }
            Ok(())
        }
    }

    impl Repository<CharacterId, Character, NewCharacter, CharacterPatch> for MemoryRepository {
        async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<Character>> {
            self.enter(RepositoryOperation::FindPage)?;
            *self.last_pagination.lock().unwrap() = Some(pagination);
            let records = self.records.lock().unwrap();
            let start = pagination.effective_offset().unwrap_or(0) as usize;
            let take = pagination.effective_limit().map_or(usize::MAX, |l| l as usize);
            Ok(records.iter().skip(start).take(take).cloned().collect())
        }

        async fn find_by_id(&self, id: &CharacterId) -> RepositoryResult<Option<Character>> {
            self.enter(RepositoryOperation::FindById)?;
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|c| &c.id == id).cloned())
        }

        async fn insert(&self, data: NewCharacter) -> RepositoryResult<Character> {
            self.enter(RepositoryOperation::Insert)?;
            let character = Character {
                id: CharacterId::generate(),
                name: data.name,
                episodes: data.episodes,
                planet: data.planet,
                version: 0,
            };
            self.records.lock().unwrap().push(character.clone());
            Ok(character)
        }

        async fn update_by_id(
            &self,
            id: &CharacterId,
            data: CharacterPatch,
        ) -> RepositoryResult<Option<Character>> {
            self.enter(RepositoryOperation::Update)?;
            let mut records = self.records.lock().unwrap();
            Ok(records.iter_mut().find(|c| &c.id == id).map(|slot| {
                *slot = data.apply(slot.clone());
                slot.clone()
            }))
        }

        async fn delete_by_id(&self, id: &CharacterId) -> RepositoryResult<Option<Character>> {
            self.enter(RepositoryOperation::Delete)?;
            let mut records = self.records.lock().unwrap();
            let position = records.iter().position(|c| &c.id == id);
            Ok(position.map(|index| records.remove(index)))
        }
    }

    fn new_character(name: &str) -> NewCharacter {
        NewCharacter {
            name: name.to_string(),
            episodes: vec![Episode::Jedi],
            planet: None,
        }
    }

    fn calls(gateway: &CharacterGateway<MemoryRepository>) -> usize {
        gateway.repository().calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let gateway = CharacterGateway::new(MemoryRepository::default());
        let created = gateway.create(new_character("Test 1")).await.unwrap();
        assert_eq!(created.version, 0);

        let fetched = gateway.get(created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_accepts_uppercase_id() {
        let gateway = CharacterGateway::new(MemoryRepository::default());
        let created = gateway.create(new_character("Test 1")).await.unwrap();

        let fetched = gateway
            .get(created.id.as_str().to_ascii_uppercase())
            .await
            .unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_malformed_id_never_reaches_store() {
        let gateway = CharacterGateway::new(MemoryRepository::default());

        let err = gateway.get("123".to_string()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidIdentifier);
        assert_eq!(err.operation, ApiOperation::Get);

        let err = gateway
            .update("123".to_string(), CharacterPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidIdentifier);
        assert_eq!(err.operation, ApiOperation::Update);

        let err = gateway.remove("zz".to_string()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidIdentifier);
        assert_eq!(err.operation, ApiOperation::Remove);

        assert_eq!(calls(&gateway), 0);
    }

    #[tokio::test]
    async fn test_missing_character_is_not_found() {
        let gateway = CharacterGateway::new(MemoryRepository::default());
        let id = "6175ae9112e7cde1912e5b40".to_string();

        let err = gateway.get(id.clone()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.message, "Character #6175ae9112e7cde1912e5b40 not found");

        let err = gateway
            .update(id.clone(), CharacterPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Update);

        let err = gateway.remove(id).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Remove);
    }

    #[tokio::test]
    async fn test_not_found_echoes_requested_id() {
        let gateway = CharacterGateway::new(MemoryRepository::default());
        let requested = "6175AE9112E7CDE1912E5B40";

        for err in [
            gateway.get(requested.to_string()).await.unwrap_err(),
            gateway
                .update(requested.to_string(), CharacterPatch::default())
                .await
                .unwrap_err(),
            gateway.remove(requested.to_string()).await.unwrap_err(),
        ] {
            assert_eq!(err.kind, ApiErrorKind::NotFound);
            assert_eq!(err.message, "Character #6175AE9112E7CDE1912E5B40 not found");
            assert_eq!(err.entity_id.as_deref(), Some(requested));
        }
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let gateway = CharacterGateway::new(MemoryRepository::default());
        let created = gateway.create(new_character("Test 1")).await.unwrap();

        let patch = CharacterPatch {
            name: Some("Test 2".to_string()),
            ..CharacterPatch::default()
        };
        let updated = gateway.update(created.id.to_string(), patch).await.unwrap();
        assert_eq!(updated.name, "Test 2");
        assert_eq!(updated.episodes, created.episodes);
        assert_eq!(updated.version, 1);

        let updated = gateway
            .update(created.id.to_string(), CharacterPatch::default())
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn test_remove_returns_last_state() {
        let gateway = CharacterGateway::new(MemoryRepository::default());
        let created = gateway.create(new_character("Test 1")).await.unwrap();

        let removed = gateway.remove(created.id.to_string()).await.unwrap();
        assert_eq!(removed, created);

        let err = gateway.get(created.id.to_string()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_passes_pagination_through() {
        let gateway = CharacterGateway::new(MemoryRepository::default());
        for name in ["A", "B", "C"] {
            gateway.create(new_character(name)).await.unwrap();
        }

        let page = gateway
            .list(Pagination::new(Some(1), Some(1)))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "B");
        assert_eq!(
            *gateway.repository().last_pagination.lock().unwrap(),
            Some(Pagination::new(Some(1), Some(1)))
        );

        let all = gateway.list(Pagination::unbounded()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let gateway = CharacterGateway::new(MemoryRepository::failing());

        let err = gateway.list(Pagination::unbounded()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InternalError);
        assert_eq!(err.message, crate::handlers::INTERNAL_ERROR_MESSAGE);

        let err = gateway
            .get("6175ae9112e7cde1912e5b40".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InternalError);
        assert_eq!(err.operation, ApiOperation::Get);
    }
}
