use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    recipes::{dto::RecipeSummary, repo_types::Recipe},
    users::repo_types::User,
};

/// A user as seen from one of their recipes: no recipe list.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id(),
            username: u.username().to_string(),
            image_url: u.image_url().map(str::to_string),
            bio: u.bio().map(str::to_string),
            created_at: u.created_at(),
        }
    }
}

/// A user with their recipes; each recipe carries `user_id` but no nested user.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub recipes: Vec<RecipeSummary>,
}

impl UserView {
    pub fn from_parts(user: &User, recipes: &[Recipe]) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            image_url: user.image_url().map(str::to_string),
            bio: user.bio().map(str::to_string),
            created_at: user.created_at(),
            recipes: recipes.iter().map(RecipeSummary::from).collect(),
        }
    }
}

/// PATCH /me. Absent fields stay as they are; an empty `image_url` or `bio`
/// clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}
