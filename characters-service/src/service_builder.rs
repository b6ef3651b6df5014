//! Service assembly
//!
//! [`ServiceBuilder`] wires the character routes to the store held in
//! [`AppState`] and always adds the `/health` and `/ready` probes. Swagger UI
//! and the OpenAPI document are mounted unless `service.docs_enabled` is off.
//! The result is a [`CharactersService`] that can be served or, in tests,
//! driven directly through its router.
//!
//! ```rust,ignore
//! use characters_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let state = AppState::connect(config).await?;
//!     ServiceBuilder::new(state).build().serve().await?;
//!     Ok(())
//! }
//! ```

use axum::{routing::get, Router};

use crate::characters::{routes, CharacterGateway};
use crate::config::Config;
use crate::openapi::{api_doc, SwaggerUI, DOCS_PATH};
use crate::server::{apply_middleware, Server};
use crate::state::AppState;

/// Builds the service router from a connected [`AppState`]
pub struct ServiceBuilder {
    state: AppState,
}

impl ServiceBuilder {
    /// Start from a connected state
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Assemble the routes
    pub fn build(self) -> CharactersService {
        let probes: Router = Router::new()
            .route("/health", get(crate::health::health))
            .route("/ready", get(crate::health::readiness))
            .with_state(self.state.clone());

        let gateway = CharacterGateway::new(self.state.character_repository());
        let mut router = probes.merge(routes::router(gateway));

        let config = self.state.config().clone();
        if config.service.docs_enabled {
            router = router.merge(SwaggerUI::with_spec(
                DOCS_PATH,
                api_doc(&config.service.name),
            ));
        }

        CharactersService { config, router }
    }
}

/// An assembled service, ready to serve
pub struct CharactersService {
    config: Config,
    router: Router,
}

impl CharactersService {
    /// The router with the middleware stack applied
    pub fn router(&self) -> Router {
        apply_middleware(self.router.clone(), &self.config)
    }

    /// Consume the service, returning the router without middleware
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Serve until SIGINT/SIGTERM
    pub async fn serve(self) -> crate::error::Result<()> {
        Server::new(self.config).serve(self.router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn service() -> CharactersService {
        let state = AppState::connect(Config::default()).await.unwrap();
        ServiceBuilder::new(state).build()
    }

    #[tokio::test]
    async fn test_probes_are_mounted() {
        let service = service().await;
        for uri in ["/health", "/ready"] {
            let response = service
                .router()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_characters_are_mounted() {
        let response = service()
            .await
            .into_router()
            .oneshot(
                Request::builder()
                    .uri("/characters")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_router_applies_middleware() {
        let response = service()
            .await
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_openapi_document_is_mounted() {
        let response = service()
            .await
            .router()
            .oneshot(
                Request::builder()
                    .uri(crate::openapi::OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_docs_can_be_disabled() {
        let mut config = Config::default();
        config.service.docs_enabled = false;
        let state = AppState::connect(config).await.unwrap();

        let response = ServiceBuilder::new(state)
            .build()
            .router()
            .oneshot(
                Request::builder()
                    .uri(crate::openapi::OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = service()
            .await
            .router()
            .oneshot(Request::builder().uri("/planets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
