use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::AppResult,
    recipes::{
        dto::{CreateRecipeRequest, RecipeView, UpdateRecipeRequest},
        services,
    },
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> AppResult<Json<Vec<RecipeView>>> {
    Ok(Json(services::list_recipes(state.store.as_ref()).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<RecipeView>)> {
    let view = services::create_recipe(state.store.as_ref(), user_id, payload).await?;

    let mut headers = HeaderMap::new();
    match format!("/recipes/{}", view.id).parse::<HeaderValue>() {
        Ok(location) => {
            headers.insert(axum::http::header::LOCATION, location);
        }
        Err(e) => error!(error = %e, recipe_id = view.id, "location header"),
    }
    Ok((StatusCode::CREATED, headers, Json(view)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RecipeView>> {
    Ok(Json(services::get_recipe(state.store.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> AppResult<Json<RecipeView>> {
    let view = services::update_recipe(state.store.as_ref(), user_id, id, payload).await?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    services::delete_recipe(state.store.as_ref(), user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
