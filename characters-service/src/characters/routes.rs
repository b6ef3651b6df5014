//! HTTP routes for `/characters`
//!
//! Extractor rejections are mapped onto [`ApiError`] so that every failure
//! shares the same JSON error body.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::gateway::CharacterGateway;
use super::model::{Character, CharacterPatch, NewCharacter};
use super::validation::{parse_create, parse_update};
use crate::handlers::{
    ApiError, ApiErrorResponse, ApiOperation, CollectionHandler, PaginationQuery,
};
use crate::ids::CharacterId;
use crate::repository::Repository;
use crate::responses::Created;

/// Build the character router over a gateway
pub fn router<R>(gateway: CharacterGateway<R>) -> Router
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch> + 'static,
{
    Router::new()
        .route("/characters", get(list::<R>).post(create::<R>))
        .route(
            "/characters/{id}",
            get(fetch::<R>).patch(update::<R>).delete(remove::<R>),
        )
        .with_state(gateway)
}

fn json_body(
    body: Result<Json<Value>, JsonRejection>,
    operation: ApiOperation,
) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()).with_operation(operation))
}

/// List characters in creation order
#[utoipa::path(
    get,
    path = "/characters",
    tag = "characters",
    params(PaginationQuery),
    responses(
        (status = 200, description = "A page of characters", body = Vec<Character>),
        (status = 400, description = "Invalid limit or offset", body = ApiErrorResponse),
    )
)]
pub(crate) async fn list<R>(
    State(gateway): State<CharacterGateway<R>>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<Vec<Character>>, ApiError>
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch>,
{
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let pagination = query.into_pagination()?;
    gateway.list(pagination).await.map(Json)
}

/// Fetch one character
#[utoipa::path(
    get,
    path = "/characters/{id}",
    tag = "characters",
    params(("id" = String, Path, description = "24 hexadecimal characters, any case")),
    responses(
        (status = 200, description = "The character", body = Character),
        (status = 400, description = "Malformed id", body = ApiErrorResponse),
        (status = 404, description = "No such character", body = ApiErrorResponse),
    )
)]
pub(crate) async fn fetch<R>(
    State(gateway): State<CharacterGateway<R>>,
    Path(id): Path<String>,
) -> Result<Json<Character>, ApiError>
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch>,
{
    gateway.get(id).await.map(Json)
}

/// Create a character
#[utoipa::path(
    post,
    path = "/characters",
    tag = "characters",
    request_body = NewCharacter,
    responses(
        (status = 201, description = "Created; `Location` names the new resource", body = Character),
        (status = 400, description = "Every violated field rule", body = ApiErrorResponse),
    )
)]
pub(crate) async fn create<R>(
    State(gateway): State<CharacterGateway<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Created<Character>, ApiError>
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch>,
{
    let body = json_body(body, ApiOperation::Create)?;
    let character = gateway.create(parse_create(&body)?).await?;
    let location = format!("/characters/{}", character.id);
    Ok(Created::new(character).with_location(location))
}

/// Apply a partial update
#[utoipa::path(
    patch,
    path = "/characters/{id}",
    tag = "characters",
    params(("id" = String, Path, description = "24 hexadecimal characters, any case")),
    request_body = CharacterPatch,
    responses(
        (status = 200, description = "The updated character", body = Character),
        (status = 400, description = "Malformed id or violated field rules", body = ApiErrorResponse),
        (status = 404, description = "No such character", body = ApiErrorResponse),
    )
)]
pub(crate) async fn update<R>(
    State(gateway): State<CharacterGateway<R>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Character>, ApiError>
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch>,
{
    let body = json_body(body, ApiOperation::Update)?;
    let patch = parse_update(&body)?;
    gateway.update(id, patch).await.map(Json)
}

/// Remove a character, returning its last state
#[utoipa::path(
    delete,
    path = "/characters/{id}",
    tag = "characters",
    params(("id" = String, Path, description = "24 hexadecimal characters, any case")),
    responses(
        (status = 200, description = "The removed character", body = Character),
        (status = 400, description = "Malformed id", body = ApiErrorResponse),
        (status = 404, description = "No such character", body = ApiErrorResponse),
    )
)]
pub(crate) async fn remove<R>(
    State(gateway): State<CharacterGateway<R>>,
    Path(id): Path<String>,
) -> Result<Json<Character>, ApiError>
where
    R: Repository<CharacterId, Character, NewCharacter, CharacterPatch>,
{
    gateway.remove(id).await.map(Json)
}
