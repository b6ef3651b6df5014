//! The `characters` resource
//!
//! - [`model`]: domain types ([`Character`], [`Episode`], [`Planet`])
//! - [`validation`]: request body rules
//! - [`mapping`]: table layout and record conversion
//! - [`store`]: [`SurrealCharacterRepository`]
//! - [`gateway`]: [`CharacterGateway`], id checks and absence mapping
//! - [`routes`]: the axum router for `/characters`
//!
//! Wiring is explicit:
//!
//! ```rust,ignore
//! let repository = SurrealCharacterRepository::new(client);
//! repository.define_schema().await?;
//! let app = characters::routes::router(CharacterGateway::new(repository));
//! ```

pub mod gateway;
pub mod mapping;
pub mod model;
pub mod routes;
pub mod store;
pub mod validation;

pub use gateway::CharacterGateway;
pub use model::{Character, CharacterPatch, Episode, NewCharacter, Planet, UnknownVariant};
pub use store::SurrealCharacterRepository;
pub use validation::{ValidationErrors, Violation};
