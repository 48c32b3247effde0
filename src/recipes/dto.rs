use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    recipes::repo_types::Recipe,
    users::{dto::UserSummary, repo_types::User},
};

/// A recipe as listed under its owner: no nested user.
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Recipe> for RecipeSummary {
    fn from(r: &Recipe) -> Self {
        Self {
            id: r.id(),
            title: r.title().to_string(),
            instructions: r.instructions().to_string(),
            minutes_to_complete: r.minutes_to_complete(),
            user_id: r.user_id(),
            created_at: r.created_at(),
        }
    }
}

/// A recipe with its owner; the owner carries no recipe list.
#[derive(Debug, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: UserSummary,
}

impl RecipeView {
    pub fn from_parts(recipe: &Recipe, owner: &User) -> Self {
        Self {
            id: recipe.id(),
            title: recipe.title().to_string(),
            instructions: recipe.instructions().to_string(),
            minutes_to_complete: recipe.minutes_to_complete(),
            user_id: recipe.user_id(),
            created_at: recipe.created_at(),
            user: UserSummary::from(owner),
        }
    }
}

/// `minutes_to_complete` stays raw JSON so that floats and strings get the
/// same validation message as non-positive numbers.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub minutes_to_complete: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub minutes_to_complete: Option<Value>,
}
