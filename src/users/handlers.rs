use axum::{extract::State, http::StatusCode, routing::patch, Json, Router};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppResult,
    state::AppState,
    users::{
        dto::{UpdateProfileRequest, UserView},
        services,
    },
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", patch(update_me).delete(delete_me))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserView>> {
    let view = services::update_profile(state.store.as_ref(), user_id, payload).await?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<StatusCode> {
    services::delete_account(state.store.as_ref(), user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
