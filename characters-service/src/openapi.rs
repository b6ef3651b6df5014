//! OpenAPI documentation
//!
//! [`ApiDoc`] collects the `/characters` operations and their schemas.
//! Server-assigned properties (`id`, `version`) are marked read-only. The
//! document is served as JSON at [`OPENAPI_JSON_PATH`] next to a Swagger UI
//! at [`DOCS_PATH`].

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::characters::{routes, Character, CharacterPatch, Episode, NewCharacter, Planet};
use crate::handlers::ApiErrorResponse;

/// Where Swagger UI is mounted
pub const DOCS_PATH: &str = "/docs";

/// Where the OpenAPI JSON document is served
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::list,
        routes::fetch,
        routes::create,
        routes::update,
        routes::remove,
    ),
    components(schemas(
        Character,
        NewCharacter,
        CharacterPatch,
        Episode,
        Planet,
        ApiErrorResponse,
    )),
    tags((name = "characters", description = "Star Wars characters"))
)]
pub struct ApiDoc;

/// Builder for adjusting the generated document's metadata
pub struct OpenApiBuilder {
    openapi: utoipa::openapi::OpenApi,
}

impl OpenApiBuilder {
    /// Start from an existing document
    pub fn new(openapi: utoipa::openapi::OpenApi) -> Self {
        Self { openapi }
    }

    /// Set the API title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.openapi.info.title = title.into();
        self
    }

    /// Set the API version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.openapi.info.version = version.into();
        self
    }

    /// Set the API description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.openapi.info.description = Some(description.into());
        self
    }

    /// Build the final document
    pub fn build(self) -> utoipa::openapi::OpenApi {
        self.openapi
    }
}

/// The service's OpenAPI document
pub fn api_doc(service_name: &str) -> utoipa::openapi::OpenApi {
    OpenApiBuilder::new(ApiDoc::openapi())
        .title(service_name)
        .version(env!("CARGO_PKG_VERSION"))
        .description("Create, read, update and remove Star Wars characters")
        .build()
}

/// Swagger UI integration
pub struct SwaggerUI;

impl SwaggerUI {
    /// Swagger UI at `path`, backed by `openapi` at [`OPENAPI_JSON_PATH`]
    pub fn with_spec(path: &'static str, openapi: utoipa::openapi::OpenApi) -> Router {
        SwaggerUi::new(path).url(OPENAPI_JSON_PATH, openapi).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn document() -> Value {
        serde_json::to_value(api_doc("characters-service")).unwrap()
    }

    #[test]
    fn test_builder_sets_info() {
        let doc = OpenApiBuilder::new(ApiDoc::openapi())
            .title("My API")
            .version("2.0.0")
            .description("Test API")
            .build();
        assert_eq!(doc.info.title, "My API");
        assert_eq!(doc.info.version, "2.0.0");
        assert_eq!(doc.info.description, Some("Test API".to_string()));
    }

    #[test]
    fn test_document_lists_character_operations() {
        let doc = document();
        let paths = &doc["paths"];

        assert!(paths["/characters"]["get"].is_object());
        assert!(paths["/characters"]["post"].is_object());
        assert!(paths["/characters/{id}"]["get"].is_object());
        assert!(paths["/characters/{id}"]["patch"].is_object());
        assert!(paths["/characters/{id}"]["delete"].is_object());
        assert!(paths["/characters"]["post"]["responses"]["201"].is_object());
        assert!(paths["/characters/{id}"]["delete"]["responses"]["404"].is_object());
    }

    #[test]
    fn test_server_assigned_properties_are_read_only() {
        let doc = document();
        let character = &doc["components"]["schemas"]["Character"]["properties"];

        assert_eq!(character["id"]["readOnly"], true);
        assert_eq!(character["version"]["readOnly"], true);
        assert!(character["name"].get("readOnly").is_none());
    }

    #[test]
    fn test_enums_use_wire_names() {
        let doc = document();
        let schemas = &doc["components"]["schemas"];

        assert_eq!(schemas["Episode"]["enum"], json!(["NEWHOPE", "EMPIRE", "JEDI"]));
        assert_eq!(schemas["Planet"]["enum"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_swagger_serves_document() {
        let response = SwaggerUI::with_spec(DOCS_PATH, api_doc("characters-service"))
            .oneshot(
                Request::builder()
                    .uri(OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["info"]["title"], "characters-service");
        assert!(body["paths"]["/characters"].is_object());
    }
}
