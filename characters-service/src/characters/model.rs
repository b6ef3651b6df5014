//! Character domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use std::str::FromStr;

use crate::ids::CharacterId;

/// Entity name used in errors and logs
pub const ENTITY: &str = "Character";

/// Film a character appears in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Episode {
    /// A New Hope
    NewHope,
    /// The Empire Strikes Back
    Empire,
    /// Return of the Jedi
    Jedi,
}

impl Episode {
    /// Every episode, in release order
    pub const ALL: [Episode; 3] = [Episode::NewHope, Episode::Empire, Episode::Jedi];

    /// Wire and storage representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewHope => "NEWHOPE",
            Self::Empire => "EMPIRE",
            Self::Jedi => "JEDI",
        }
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Episode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|episode| episode.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("episode", s))
    }
}

/// Home planet of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Planet {
    Alderaan,
    Tatooine,
    Naboo,
    Coruscant,
    Hoth,
    Dagobah,
    Endor,
    Bespin,
    Kashyyyk,
    Corellia,
}

impl Planet {
    /// Every known planet
    pub const ALL: [Planet; 10] = [
        Planet::Alderaan,
        Planet::Tatooine,
        Planet::Naboo,
        Planet::Coruscant,
        Planet::Hoth,
        Planet::Dagobah,
        Planet::Endor,
        Planet::Bespin,
        Planet::Kashyyyk,
        Planet::Corellia,
    ];

    /// Wire and storage representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alderaan => "Alderaan",
            Self::Tatooine => "Tatooine",
            Self::Naboo => "Naboo",
            Self::Coruscant => "Coruscant",
            Self::Hoth => "Hoth",
            Self::Dagobah => "Dagobah",
            Self::Endor => "Endor",
            Self::Bespin => "Bespin",
            Self::Kashyyyk => "Kashyyyk",
            Self::Corellia => "Corellia",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Planet {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|planet| planet.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("planet", s))
    }
}

/// A value outside one of the fixed enumerations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    /// Which enumeration was being parsed
    pub kind: &'static str,
    /// The rejected value
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A persisted character
///
/// `episodes` is never empty and never repeats a value. `planet` is
/// omitted from JSON when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Character {
    /// Store-assigned identifier
    #[schema(value_type = String, read_only, example = "6175ae9112e7cde1912e5b40")]
    pub id: CharacterId,
    /// Display name
    #[schema(example = "Luke Skywalker")]
    pub name: String,
    /// Films the character appears in, in the order supplied
    pub episodes: Vec<Episode>,
    /// Home planet, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<Planet>,
    /// Starts at 0 and increases by one on every update
    #[schema(read_only)]
    pub version: i64,
}

/// Validated fields for a new character
#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct NewCharacter {
    /// Name of a character
    #[schema(min_length = 1, example = "Luke Skywalker")]
    pub name: String,
    /// Episodes where a character played, without repeats
    #[schema(min_items = 1)]
    pub episodes: Vec<Episode>,
    /// The motherland of a character
    pub planet: Option<Planet>,
}

/// Validated partial update
///
/// `None` leaves a field untouched. For `planet`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct CharacterPatch {
    /// New name
    #[schema(min_length = 1)]
    pub name: Option<String>,
    /// Replacement episode list
    #[schema(min_items = 1)]
    pub episodes: Option<Vec<Episode>>,
    /// New home planet; `null` clears it
    #[schema(value_type = Option<Planet>)]
    pub planet: Option<Option<Planet>>,
}

impl CharacterPatch {
    /// True when no field is supplied (only the version is bumped)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.episodes.is_none() && self.planet.is_none()
    }

    /// Merge this patch into an existing character, bumping the version
    #[must_use]
    pub fn apply(self, mut character: Character) -> Character {
        if let Some(name) = self.name {
            character.name = name;
        }
        if let Some(episodes) = self.episodes {
            character.episodes = episodes;
        }
        if let Some(planet) = self.planet {
            character.planet = planet;
        }
        character.version += 1;
        character
    }
}
