use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest, SignupRequest},
        jwt::{AuthUser, JwtKeys},
    },
    error::{AppError, AppResult},
    recipes::repo_types::Recipe,
    state::AppState,
    users::{
        dto::UserView,
        repo_types::User,
        services::{self as user_services, load_user},
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/check_session", get(check_session))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = user_services::register(state.store.as_ref(), payload).await?;
    let response = issue_tokens(&state, &user, Vec::new())?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let store = state.store.as_ref();
    let user = user_services::authenticate(store, &payload.username, &payload.password).await?;
    let recipes = store.list_recipes_by_user(user.id()).await?;
    Ok(Json(issue_tokens(&state, &user, recipes)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token".into())
    })?;

    let store = state.store.as_ref();
    let user = load_user(store, claims.sub)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized("User not found".into()),
            other => other,
        })?;
    let recipes = store.list_recipes_by_user(user.id()).await?;
    Ok(Json(issue_tokens(&state, &user, recipes)?))
}

#[instrument(skip(state))]
pub async fn check_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserView>> {
    let view = user_services::profile(state.store.as_ref(), user_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized("User not found".into()),
            other => other,
        })?;
    Ok(Json(view))
}

fn issue_tokens(
    state: &AppState,
    user: &User,
    recipes: Vec<Recipe>,
) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    Ok(AuthResponse {
        access_token: keys.sign_access(user.id())?,
        refresh_token: keys.sign_refresh(user.id())?,
        user: UserView::from_parts(user, &recipes),
    })
}
