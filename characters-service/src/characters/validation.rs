//! Request body rules for characters
//!
//! Bodies are checked as raw JSON so that every violation can be reported
//! at once, in a stable order: unknown properties, then `name`, `episodes`
//! and `planet`. Rules per field are listed in the order their messages appear.
//!
//! | Field    | Rule                                  | Message                                             |
//! |----------|---------------------------------------|-----------------------------------------------------|
//! | *        | not a character property              | `property <name> should not exist`                  |
//! | name     | present and non-empty                 | `name should not be empty`                          |
//! | name     | string                                | `name must be a string`                             |
//! | episodes | array without repeated elements       | `All episodes's elements must be unique`            |
//! | episodes | every element is a known episode      | `each value in episodes must be a valid enum value` |
//! | episodes | present, non-empty array              | `episodes should not be empty`                      |
//! | planet   | a known planet                        | `planet must be a valid enum value`                 |
//! | planet   | string                                | `planet must be a string`                           |
//!
//! On create, `name` and `episodes` are required and a `null` planet is the
//! same as no planet. On update every field is optional, `null` for `name`
//! or `episodes` means "not supplied", and a `null` planet clears it.
//! Read-only properties (`id`, `_id`, `version`, `__v`) are ignored.

use serde_json::{Map, Value};
use std::fmt;

use super::model::{CharacterPatch, Episode, NewCharacter, Planet};
use crate::handlers::{ApiError, ApiOperation};

/// Properties a client may send but never set
pub const READ_ONLY_PROPERTIES: [&str; 4] = ["id", "_id", "version", "__v"];

const NAME: &str = "name";
const EPISODES: &str = "episodes";
const PLANET: &str = "planet";

const NAME_EMPTY: &str = "name should not be empty";
const NAME_NOT_STRING: &str = "name must be a string";
const EPISODES_NOT_UNIQUE: &str = "All episodes's elements must be unique";
const EPISODES_NOT_ENUM: &str = "each value in episodes must be a valid enum value";
const EPISODES_EMPTY: &str = "episodes should not be empty";
const PLANET_NOT_STRING: &str = "planet must be a string";
const PLANET_NOT_ENUM: &str = "planet must be a valid enum value";

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offending property, or `body` when the payload is not an object
    pub property: String,
    /// Client-facing message
    pub message: String,
}

/// Every rule violated by one request body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    fn push(&mut self, property: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            property: property.to_string(),
            message: message.into(),
        });
    }

    /// True when no rule was violated
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations, in reporting order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Client-facing messages, in reporting order
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation_failed(errors.messages())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

/// Validate a create body
///
/// # Errors
///
/// Returns every violated rule when the body is not a valid new character.
pub fn validate_create(body: &Value) -> Result<NewCharacter, ValidationErrors> {
    let fields = as_object(body)?;
    let mut errors = ValidationErrors::default();

    check_unknown_properties(fields, &mut errors);
    let name = check_name(fields.get(NAME), Mode::Create, &mut errors);
    let episodes = check_episodes(fields.get(EPISODES), Mode::Create, &mut errors);
    let planet = check_planet(fields.get(PLANET), &mut errors);

    match (errors.is_empty(), name, episodes) {
        (true, Some(name), Some(episodes)) => Ok(NewCharacter {
            name,
            episodes,
            planet: planet.flatten(),
        }),
        _ => Err(errors),
    }
}

/// Validate a partial update body
///
/// # Errors
///
/// Returns every violated rule when a supplied field is invalid.
pub fn validate_update(body: &Value) -> Result<CharacterPatch, ValidationErrors> {
    let fields = as_object(body)?;
    let mut errors = ValidationErrors::default();

    check_unknown_properties(fields, &mut errors);
    let name = check_name(fields.get(NAME), Mode::Update, &mut errors);
    let episodes = check_episodes(fields.get(EPISODES), Mode::Update, &mut errors);
    let planet = check_planet(fields.get(PLANET), &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CharacterPatch {
        name,
        episodes,
        planet,
    })
}

/// Validate a create body, mapping failures onto an [`ApiError`]
pub fn parse_create(body: &Value) -> Result<NewCharacter, ApiError> {
    validate_create(body)
        .map_err(|errors| ApiError::from(errors).with_operation(ApiOperation::Create))
}

/// Validate an update body, mapping failures onto an [`ApiError`]
pub fn parse_update(body: &Value) -> Result<CharacterPatch, ApiError> {
    validate_update(body)
        .map_err(|errors| ApiError::from(errors).with_operation(ApiOperation::Update))
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object().ok_or_else(|| {
        let mut errors = ValidationErrors::default();
        errors.push("body", "request body must be a JSON object");
        errors
    })
}

/// Treats `null` the same as a missing property
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn check_name(value: Option<&Value>, mode: Mode, errors: &mut ValidationErrors) -> Option<String> {
    match (present(value), mode) {
        (None, Mode::Update) => None,
        (None, Mode::Create) => {
            errors.push(NAME, NAME_EMPTY);
            errors.push(NAME, NAME_NOT_STRING);
            None
        }
        (Some(Value::String(name)), _) if name.is_empty() => {
            errors.push(NAME, NAME_EMPTY);
            None
        }
        (Some(Value::String(name)), _) => Some(name.clone()),
        (Some(_), _) => {
            errors.push(NAME, NAME_NOT_STRING);
            None
        }
    }
}

fn is_episode(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.parse::<Episode>().is_ok())
}

fn check_episodes(
    value: Option<&Value>,
    mode: Mode,
    errors: &mut ValidationErrors,
) -> Option<Vec<Episode>> {
    let items = match (present(value), mode) {
        (None, Mode::Update) => return None,
        (None, Mode::Create) => {
            errors.push(EPISODES, EPISODES_NOT_UNIQUE);
            errors.push(EPISODES, EPISODES_NOT_ENUM);
            errors.push(EPISODES, EPISODES_EMPTY);
            return None;
        }
        (Some(Value::Array(items)), _) => items,
        (Some(other), _) => {
            errors.push(EPISODES, EPISODES_NOT_UNIQUE);
            if !is_episode(other) {
                errors.push(EPISODES, EPISODES_NOT_ENUM);
            }
            errors.push(EPISODES, EPISODES_EMPTY);
            return None;
        }
    };

    let before = errors.violations.len();

    let has_duplicates = items
        .iter()
        .enumerate()
        .any(|(i, item)| items[..i].contains(item));
    if has_duplicates {
        errors.push(EPISODES, EPISODES_NOT_UNIQUE);
    }

    let episodes: Option<Vec<Episode>> = items
        .iter()
        .map(|item| item.as_str().and_then(|s| s.parse().ok()))
        .collect();
    if episodes.is_none() {
        errors.push(EPISODES, EPISODES_NOT_ENUM);
    }

    if items.is_empty() {
        errors.push(EPISODES, EPISODES_EMPTY);
    }

    if errors.violations.len() > before {
        return None;
    }
    episodes
}

/// `None`: not supplied. `Some(None)`: explicitly `null`.
fn check_planet(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<Option<Planet>> {
    match value {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(s)) => match s.parse::<Planet>() {
            Ok(planet) => Some(Some(planet)),
            Err(_) => {
                errors.push(PLANET, PLANET_NOT_ENUM);
                None
            }
        },
        Some(_) => {
            errors.push(PLANET, PLANET_NOT_ENUM);
            errors.push(PLANET, PLANET_NOT_STRING);
            None
        }
    }
}

fn check_unknown_properties(fields: &Map<String, Value>, errors: &mut ValidationErrors) {
    for key in fields.keys() {
        let known = matches!(key.as_str(), NAME | EPISODES | PLANET)
            || READ_ONLY_PROPERTIES.contains(&key.as_str());
        if !known {
            errors.push(key, format!("property {} should not exist", key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_messages(body: Value) -> Vec<String> {
        validate_create(&body).unwrap_err().messages()
    }

    fn update_messages(body: Value) -> Vec<String> {
        validate_update(&body).unwrap_err().messages()
    }

    #[test]
    fn test_valid_create_preserves_episode_order() {
        let character = validate_create(&json!({
            "name": "Leia Organa",
            "episodes": ["JEDI", "NEWHOPE", "EMPIRE"],
            "planet": "Alderaan"
        }))
        .unwrap();

        assert_eq!(character.name, "Leia Organa");
        assert_eq!(
            character.episodes,
            vec![Episode::Jedi, Episode::NewHope, Episode::Empire]
        );
        assert_eq!(character.planet, Some(Planet::Alderaan));
    }

    #[test]
    fn test_create_null_planet_is_absent() {
        let character =
            validate_create(&json!({"name": "Han", "episodes": ["EMPIRE"], "planet": null}))
                .unwrap();
        assert_eq!(character.planet, None);
    }

    #[test]
    fn test_create_empty_body_reports_every_required_rule() {
        assert_eq!(
            create_messages(json!({})),
            vec![
                NAME_EMPTY,
                NAME_NOT_STRING,
                EPISODES_NOT_UNIQUE,
                EPISODES_NOT_ENUM,
                EPISODES_EMPTY,
            ]
        );
    }

    #[test]
    fn test_create_empty_episodes() {
        assert_eq!(
            create_messages(json!({"name": "Test", "episodes": []})),
            vec![EPISODES_EMPTY]
        );
    }

    #[test]
    fn test_create_duplicate_episodes() {
        assert_eq!(
            create_messages(json!({"name": "Test", "episodes": ["JEDI", "JEDI"]})),
            vec![EPISODES_NOT_UNIQUE]
        );
    }

    #[test]
    fn test_create_unknown_episode_reported_once() {
        assert_eq!(
            create_messages(json!({"name": "Test", "episodes": ["JEDI", "PHANTOM", 7]})),
            vec![EPISODES_NOT_ENUM]
        );
    }

    #[test]
    fn test_create_episodes_not_an_array() {
        assert_eq!(
            create_messages(json!({"name": "Test", "episodes": "JEDI"})),
            vec![EPISODES_NOT_UNIQUE, EPISODES_EMPTY]
        );
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(
            create_messages(json!({"name": "", "episodes": ["JEDI"]})),
            vec![NAME_EMPTY]
        );
        assert_eq!(
            create_messages(json!({"name": 42, "episodes": ["JEDI"]})),
            vec![NAME_NOT_STRING]
        );
    }

    #[test]
    fn test_planet_rules() {
        assert_eq!(
            create_messages(json!({"name": "Test", "episodes": ["JEDI"], "planet": "Mustafar"})),
            vec![PLANET_NOT_ENUM]
        );
        assert_eq!(
            create_messages(json!({"name": "Test", "episodes": ["JEDI"], "planet": 3})),
            vec![PLANET_NOT_ENUM, PLANET_NOT_STRING]
        );
    }

    #[test]
    fn test_read_only_properties_are_ignored() {
        let character = validate_create(&json!({
            "id": "6175ae9112e7cde1912e5b40",
            "_id": "6175ae9112e7cde1912e5b40",
            "version": 12,
            "__v": 3,
            "name": "Test",
            "episodes": ["JEDI"]
        }))
        .unwrap();
        assert_eq!(character.name, "Test");
    }

    #[test]
    fn test_unknown_properties_rejected() {
        assert_eq!(
            create_messages(json!({"name": "Test", "episodes": ["JEDI"], "rank": "General"})),
            vec!["property rank should not exist"]
        );
    }

    #[test]
    fn test_unknown_properties_reported_before_field_rules() {
        assert_eq!(
            create_messages(json!({"rank": "General", "name": "", "episodes": ["JEDI"]})),
            vec!["property rank should not exist", NAME_EMPTY]
        );
        assert_eq!(
            update_messages(json!({"planet": true, "side": "dark"})),
            vec!["property side should not exist", PLANET_NOT_ENUM, PLANET_NOT_STRING]
        );
    }

    #[test]
    fn test_body_must_be_object() {
        let errors = validate_create(&json!(["JEDI"])).unwrap_err();
        assert_eq!(errors.violations()[0].property, "body");
        assert!(validate_update(&json!("x")).is_err());
    }

    #[test]
    fn test_update_accepts_empty_body() {
        let patch = validate_update(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_update_partial_fields() {
        let patch = validate_update(&json!({
            "episodes": ["NEWHOPE", "EMPIRE"],
            "planet": "Alderaan"
        }))
        .unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.episodes, Some(vec![Episode::NewHope, Episode::Empire]));
        assert_eq!(patch.planet, Some(Some(Planet::Alderaan)));
    }

    #[test]
    fn test_update_null_semantics() {
        let patch =
            validate_update(&json!({"name": null, "episodes": null, "planet": null})).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.episodes, None);
        assert_eq!(patch.planet, Some(None));
    }

    #[test]
    fn test_update_rules_apply_to_supplied_fields() {
        assert_eq!(
            update_messages(json!({"name": "", "episodes": ["JEDI", "JEDI"]})),
            vec![NAME_EMPTY, EPISODES_NOT_UNIQUE]
        );
        assert_eq!(update_messages(json!({"episodes": []})), vec![EPISODES_EMPTY]);
    }

    #[test]
    fn test_parse_create_maps_to_api_error() {
        let err = parse_create(&json!({"name": "Test"})).unwrap_err();
        assert_eq!(err.operation, ApiOperation::Create);
        assert_eq!(err.messages.len(), 3);

        let err = parse_update(&json!({"planet": "Mustafar"})).unwrap_err();
        assert_eq!(err.operation, ApiOperation::Update);
        assert_eq!(err.messages, vec![PLANET_NOT_ENUM.to_string()]);
    }
}
