use std::collections::HashMap;

use tracing::info;

use crate::{
    error::{AppError, AppResult},
    recipes::{
        dto::{CreateRecipeRequest, RecipeView, UpdateRecipeRequest},
        repo_types::{NewRecipe, Recipe},
    },
    store::Store,
    users::{repo_types::User, services::load_user},
    validation::{minutes_from_json, validate_instructions, validate_title},
};

pub async fn create_recipe(
    store: &dyn Store,
    user_id: i64,
    req: CreateRecipeRequest,
) -> AppResult<RecipeView> {
    // same order as NewRecipe::new, so the first bad field is reported
    validate_title(&req.title)?;
    validate_instructions(&req.instructions)?;
    let minutes = minutes_from_json(&req.minutes_to_complete)?;

    let owner = load_user(store, user_id).await?;
    let new = NewRecipe::new(req.title, req.instructions, minutes, owner.id())?;
    let recipe = store.create_recipe(new).await?;

    info!(recipe_id = recipe.id(), user_id, "recipe created");
    Ok(RecipeView::from_parts(&recipe, &owner))
}

pub async fn get_recipe(store: &dyn Store, id: i64) -> AppResult<RecipeView> {
    let recipe = store.find_recipe(id).await?.ok_or_else(|| recipe_not_found(id))?;
    let owner = load_user(store, recipe.user_id()).await?;
    Ok(RecipeView::from_parts(&recipe, &owner))
}

pub async fn list_recipes(store: &dyn Store) -> AppResult<Vec<RecipeView>> {
    let recipes = store.list_recipes().await?;
    let mut owners: HashMap<i64, User> = HashMap::new();
    let mut views = Vec::with_capacity(recipes.len());
    for recipe in &recipes {
        if !owners.contains_key(&recipe.user_id()) {
            let owner = load_user(store, recipe.user_id()).await?;
            owners.insert(owner.id(), owner);
        }
        if let Some(owner) = owners.get(&recipe.user_id()) {
            views.push(RecipeView::from_parts(recipe, owner));
        }
    }
    Ok(views)
}

pub async fn update_recipe(
    store: &dyn Store,
    user_id: i64,
    id: i64,
    req: UpdateRecipeRequest,
) -> AppResult<RecipeView> {
    let mut recipe = owned_recipe(store, user_id, id).await?;

    if let Some(title) = req.title {
        recipe.set_title(title)?;
    }
    if let Some(instructions) = req.instructions {
        recipe.set_instructions(instructions)?;
    }
    if let Some(minutes) = req.minutes_to_complete {
        recipe.set_minutes_to_complete(minutes_from_json(&minutes)?)?;
    }

    let recipe = store.update_recipe(&recipe).await?;
    let owner = load_user(store, user_id).await?;
    info!(recipe_id = id, user_id, "recipe updated");
    Ok(RecipeView::from_parts(&recipe, &owner))
}

pub async fn delete_recipe(store: &dyn Store, user_id: i64, id: i64) -> AppResult<()> {
    owned_recipe(store, user_id, id).await?;
    store.delete_recipe(id).await?;
    info!(recipe_id = id, user_id, "recipe deleted");
    Ok(())
}

/// Someone else's recipe looks the same as a missing one.
async fn owned_recipe(store: &dyn Store, user_id: i64, id: i64) -> AppResult<Recipe> {
    match store.find_recipe(id).await? {
        Some(r) if r.user_id() == user_id => Ok(r),
        _ => Err(recipe_not_found(id)),
    }
}

fn recipe_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("recipe {} not found", id))
}
