//! Persistence mapping for characters
//!
//! Kept apart from the request rules in [`super::validation`]: this module
//! only knows how a character is laid out in the `character` table.
//!
//! Records are keyed by the [`CharacterId`] string. `version` is owned by
//! the store: it defaults to 0 on create and is incremented by every update.

use serde::{Deserialize, Serialize};

use super::model::{Character, CharacterPatch, Episode, NewCharacter, Planet};
use crate::ids::CharacterId;
use crate::repository::{RepositoryError, RepositoryOperation, RepositoryResult};

/// Table holding character records
pub const TABLE: &str = "character";

/// Idempotent table and field definitions
pub const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS character SCHEMALESS;
    DEFINE FIELD IF NOT EXISTS name ON character TYPE string;
    DEFINE FIELD IF NOT EXISTS episodes ON character TYPE array<string>;
    DEFINE FIELD IF NOT EXISTS planet ON character TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS version ON character TYPE int DEFAULT 0;
";

/// Columns read back for a character, with the record key projected as `key`
pub const PROJECTION: &str = "record::id(id) AS key, version, name, episodes, planet";

/// Fields written on create
#[derive(Debug, Clone, Serialize)]
pub struct CharacterContent {
    pub name: String,
    pub episodes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
}

impl From<NewCharacter> for CharacterContent {
    fn from(character: NewCharacter) -> Self {
        Self {
            name: character.name,
            episodes: episodes_to_storage(&character.episodes),
            planet: character.planet.map(|p| p.as_str().to_string()),
        }
    }
}

/// A character record as read from the store
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterDocument {
    /// Record key, present only when the query projects it
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub version: i64,
    pub name: String,
    pub episodes: Vec<String>,
    #[serde(default)]
    pub planet: Option<String>,
}

impl CharacterDocument {
    /// Convert into a domain character using the projected record key
    pub fn into_character(self, operation: RepositoryOperation) -> RepositoryResult<Character> {
        let raw_key = self.key.clone().ok_or_else(|| {
            RepositoryError::serialization_error(operation, "record key missing from projection")
        })?;
        let id = CharacterId::parse(&raw_key).map_err(|e| {
            RepositoryError::serialization_error(operation, format!("invalid record key: {}", e))
                .with_entity(super::model::ENTITY, raw_key.clone())
        })?;
        self.into_character_with_id(id, operation)
    }

    /// Convert into a domain character whose id is already known
    pub fn into_character_with_id(
        self,
        id: CharacterId,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Character> {
        let invalid = |message: String| {
            RepositoryError::serialization_error(operation, message)
                .with_entity(super::model::ENTITY, id.to_string())
        };

        let episodes = self
            .episodes
            .iter()
            .map(|raw| raw.parse::<Episode>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(e.to_string()))?;

        let planet = self
            .planet
            .as_deref()
            .map(str::parse::<Planet>)
            .transpose()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Character {
            id,
            name: self.name,
            episodes,
            planet,
            version: self.version,
        })
    }
}

/// SET clause assignments for a patch, always ending with the version bump
///
/// Bind names match the assignments: `$name`, `$episodes`, `$planet`.
pub fn patch_assignments(patch: &CharacterPatch) -> Vec<&'static str> {
    let mut assignments = Vec::with_capacity(4);
    if patch.name.is_some() {
        assignments.push("name = $name");
    }
    if patch.episodes.is_some() {
        assignments.push("episodes = $episodes");
    }
    match patch.planet {
        Some(Some(_)) => assignments.push("planet = $planet"),
        Some(None) => assignments.push("planet = NONE"),
        None => {}
    }
    assignments.push("version += 1");
    assignments
}

pub fn episodes_to_storage(episodes: &[Episode]) -> Vec<String> {
    episodes.iter().map(|e| e.as_str().to_string()).collect()
}
