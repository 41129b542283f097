//! Route handlers
//!
//! Each handler validates its input, delegates to the store or the upstream
//! gateway, and lets `ApiError` translate failures into status codes. Proxy
//! handlers pass upstream bodies through verbatim.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::{error::ApiError, AppState};
use crate::store::{NewRecipe, Recipe, RecipePatch};
use crate::upstream::SearchFilters;

pub async fn root() -> &'static str {
    "Cookstash recipe API"
}

pub async fn list_recipes(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.store.list())
}

pub async fn create_recipe(
    State(state): State<AppState>,
    Json(new): Json<NewRecipe>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = state.store.create(new)?;
    info!(id = recipe.id, "created recipe");
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Recipe>, ApiError> {
    Ok(Json(state.store.get(id)?))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<RecipePatch>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state.store.update(id, patch)?;
    info!(id, "updated recipe");
    Ok(Json(recipe))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(id)?;
    info!(id, "deleted recipe");
    Ok(StatusCode::NO_CONTENT)
}

/// Body of the favorites-resolution request
#[derive(Debug, Deserialize)]
pub struct FavoritesRequest {
    #[serde(default)]
    pub ids: Vec<u64>,
}

/// Resolves a client-held favorites id list to full records
///
/// Ids that no longer exist are silently dropped; pruning them from the
/// client's list is the client's job.
pub async fn resolve_favorites(
    State(state): State<AppState>,
    Json(request): Json<FavoritesRequest>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(state.store.get_many(&request.ids)?))
}

pub async fn search_recipes(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Result<Response, ApiError> {
    let body = state.upstream.search_recipes(&filters).await?;
    Ok(json_passthrough(body))
}

pub async fn recipe_information(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let body = state.upstream.recipe_information(id).await?;
    Ok(json_passthrough(body))
}

pub async fn recipe_nutrition(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let body = state.upstream.recipe_nutrition(id).await?;
    Ok(json_passthrough(body))
}

/// Query of the ingredient-substitutes proxy
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutesQuery {
    pub ingredient_name: Option<String>,
}

pub async fn ingredient_substitutes(
    State(state): State<AppState>,
    Query(query): Query<SubstitutesQuery>,
) -> Result<Response, ApiError> {
    let name = query
        .ingredient_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("ingredientName query parameter is required".to_string())
        })?;

    let body = state.upstream.ingredient_substitutes(name).await?;
    Ok(json_passthrough(body))
}

/// Wraps a raw upstream body in a JSON response without reparsing it
fn json_passthrough(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
