use tracing::{info, warn};

use crate::{
    auth::dto::SignupRequest,
    error::{AppError, AppResult},
    store::Store,
    users::{
        dto::{UpdateProfileRequest, UserView},
        repo_types::{NewUser, User},
    },
    validation::{validate_username, ValidationError},
};

/// Shape check, then the uniqueness pre-check, then hashing and insert. The
/// store's unique constraint still decides races between concurrent signups.
pub async fn register(store: &dyn Store, req: SignupRequest) -> AppResult<User> {
    validate_username(&req.username)?;
    if store.username_taken(&req.username, None).await? {
        warn!(username = %req.username, "username already taken");
        return Err(ValidationError::UsernameTaken.into());
    }

    let new = NewUser::new(req.username, &req.password)?
        .with_image_url(non_empty(req.image_url))
        .with_bio(non_empty(req.bio));
    let user = store.create_user(new).await?;

    info!(user_id = user.id(), username = %user.username(), "user registered");
    Ok(user)
}

pub async fn authenticate(store: &dyn Store, username: &str, password: &str) -> AppResult<User> {
    let Some(user) = store.find_user_by_username(username).await? else {
        warn!(%username, "login unknown username");
        return Err(invalid_credentials());
    };
    if !user.verify_password(password) {
        warn!(user_id = user.id(), "login invalid password");
        return Err(invalid_credentials());
    }
    info!(user_id = user.id(), "user logged in");
    Ok(user)
}

pub async fn load_user(store: &dyn Store, user_id: i64) -> AppResult<User> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))
}

pub async fn profile(store: &dyn Store, user_id: i64) -> AppResult<UserView> {
    let user = load_user(store, user_id).await?;
    let recipes = store.list_recipes_by_user(user_id).await?;
    Ok(UserView::from_parts(&user, &recipes))
}

pub async fn update_profile(
    store: &dyn Store,
    user_id: i64,
    req: UpdateProfileRequest,
) -> AppResult<UserView> {
    let mut user = load_user(store, user_id).await?;

    if let Some(username) = req.username {
        user.set_username(username)?;
        if store.username_taken(user.username(), Some(user_id)).await? {
            return Err(ValidationError::UsernameTaken.into());
        }
    }
    if let Some(password) = req.password {
        user.set_password(&password)?;
    }
    if req.image_url.is_some() {
        user.set_image_url(non_empty(req.image_url));
    }
    if req.bio.is_some() {
        user.set_bio(non_empty(req.bio));
    }

    let user = store.update_user(&user).await?;
    info!(user_id, "profile updated");
    let recipes = store.list_recipes_by_user(user_id).await?;
    Ok(UserView::from_parts(&user, &recipes))
}

pub async fn delete_account(store: &dyn Store, user_id: i64) -> AppResult<()> {
    store.delete_user(user_id).await?;
    info!(user_id, "user deleted with their recipes");
    Ok(())
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        recipes::repo_types::NewRecipe,
        store::{MemoryStore, RecipeStore},
    };

    const INSTRUCTIONS: &str =
        "Knead the dough for ten minutes, let it rise for an hour, shape and bake.";

    fn signup(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            password: password.into(),
            image_url: None,
            bio: Some("home baker".into()),
        }
    }

    #[tokio::test]
    async fn register_then_duplicate_fails_with_uniqueness_error() {
        let store = MemoryStore::new();
        let user = register(&store, signup("paul", "sourdough")).await.unwrap();
        assert_eq!(user.username(), "paul");
        assert_eq!(user.bio(), Some("home baker"));

        let err = register(&store, signup("paul", "other")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn register_rejects_empty_username() {
        let store = MemoryStore::new();
        let err = register(&store, signup("", "pw")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::UsernameMissing)
        ));
    }

    #[tokio::test]
    async fn username_is_stored_and_matched_verbatim() {
        let store = MemoryStore::new();
        let user = register(&store, signup(" paul", "pw")).await.unwrap();
        assert_eq!(user.username(), " paul");

        assert_eq!(authenticate(&store, " paul", "pw").await.unwrap().id(), user.id());
        assert!(matches!(
            authenticate(&store, "paul", "pw").await.unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let store = MemoryStore::new();
        register(&store, signup("paul", "sourdough")).await.unwrap();

        let user = authenticate(&store, "paul", "sourdough").await.unwrap();
        assert_eq!(user.username(), "paul");
        assert!(matches!(
            authenticate(&store, "paul", "sourdoughx").await.unwrap_err(),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            authenticate(&store, "prue", "sourdough").await.unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn update_profile_allows_keeping_own_username() {
        let store = MemoryStore::new();
        let user = register(&store, signup("paul", "pw")).await.unwrap();
        register(&store, signup("prue", "pw")).await.unwrap();

        let view = update_profile(
            &store,
            user.id(),
            UpdateProfileRequest {
                username: Some("paul".into()),
                bio: Some("".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(view.username, "paul");
        assert_eq!(view.bio, None);

        let err = update_profile(
            &store,
            user.id(),
            UpdateProfileRequest {
                username: Some("prue".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn delete_account_removes_owned_recipes() {
        let store = MemoryStore::new();
        let user = register(&store, signup("paul", "pw")).await.unwrap();
        for title in ["Bloomer", "Focaccia"] {
            store
                .create_recipe(NewRecipe::new(title, INSTRUCTIONS, 90, user.id()).unwrap())
                .await
                .unwrap();
        }
        assert_eq!(profile(&store, user.id()).await.unwrap().recipes.len(), 2);

        delete_account(&store, user.id()).await.unwrap();

        assert!(store.list_recipes().await.unwrap().is_empty());
        assert!(matches!(
            profile(&store, user.id()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
