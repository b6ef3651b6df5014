//! # characters-service
//!
//! CRUD HTTP service for Star Wars characters, stored in SurrealDB.
//!
//! ## Features
//!
//! - **Resource**: list, get, create, partial update and remove on `/characters`
//! - **Validation**: every violated field rule is reported at once
//! - **Store**: SurrealDB over `ws://`, `http://` or embedded `mem://`, with
//!   connection retries and exponential backoff
//! - **Middleware stack**: request ids, sensitive header masking, panic
//!   recovery, body size limits, timeouts, compression, CORS
//! - **Health checks**: liveness and readiness probes
//! - **API docs**: OpenAPI document and Swagger UI
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Layout
//!
//! A request flows from [`characters::routes`] (extraction and body rules)
//! through [`characters::CharacterGateway`] (id checks, absence mapping) to a
//! [`repository::Repository`] implementation, by default
//! [`characters::SurrealCharacterRepository`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use characters_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::connect(config).await?;
//!     ServiceBuilder::new(state).build().serve().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod characters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod openapi;
pub mod repository;
pub mod responses;
pub mod server;
pub mod service_builder;
pub mod state;
pub mod surrealdb_backend;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::characters::{
        Character, CharacterGateway, CharacterPatch, Episode, NewCharacter, Planet,
        SurrealCharacterRepository,
    };
    pub use crate::config::Config;
    pub use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, ApiOperation, CollectionHandler};
    pub use crate::health::{health, readiness};
    pub use crate::ids::{CharacterId, MakeTypedRequestId, RequestId};
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
    };
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        Pagination, Repository, RepositoryError, RepositoryErrorKind, RepositoryOperation,
        RepositoryResult,
    };
    pub use crate::responses::Created;
    pub use crate::server::Server;
    pub use crate::service_builder::{CharactersService, ServiceBuilder};
    pub use crate::state::AppState;
    pub use crate::surrealdb_backend::SurrealClient;

    pub use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Json, Response},
        Router,
    };

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, instrument, warn};
}
