use async_trait::async_trait;

use crate::{
    recipes::repo_types::{NewRecipe, Recipe},
    store::{map_db_error, PgStore, StoreError, StoreResult},
};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Fails with [`StoreError::MissingOwner`] when `new.user_id()` is unknown.
    async fn create_recipe(&self, new: NewRecipe) -> StoreResult<Recipe>;

    async fn find_recipe(&self, id: i64) -> StoreResult<Option<Recipe>>;

    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>>;

    async fn list_recipes_by_user(&self, user_id: i64) -> StoreResult<Vec<Recipe>>;

    async fn update_recipe(&self, recipe: &Recipe) -> StoreResult<Recipe>;

    async fn delete_recipe(&self, id: i64) -> StoreResult<()>;
}

const RECIPE_COLUMNS: &str = "id, title, instructions, minutes_to_complete, user_id, created_at";

#[async_trait]
impl RecipeStore for PgStore {
    async fn create_recipe(&self, new: NewRecipe) -> StoreResult<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(new.title())
        .bind(new.instructions())
        .bind(new.minutes_to_complete())
        .bind(new.user_id())
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, Some(new.user_id())))?;
        Ok(recipe)
    }

    async fn find_recipe(&self, id: i64) -> StoreResult<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(recipe)
    }

    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY id ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_recipes_by_user(&self, user_id: i64) -> StoreResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
              FROM recipes
             WHERE user_id = $1
             ORDER BY id ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update_recipe(&self, recipe: &Recipe) -> StoreResult<Recipe> {
        let updated = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            UPDATE recipes
               SET title = $2, instructions = $3, minutes_to_complete = $4
             WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(recipe.id())
        .bind(recipe.title())
        .bind(recipe.instructions())
        .bind(recipe.minutes_to_complete())
        .fetch_optional(&self.db)
        .await?;
        updated.ok_or(StoreError::NotFound("recipe"))
    }

    async fn delete_recipe(&self, id: i64) -> StoreResult<()> {
        let res = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("recipe"));
        }
        Ok(())
    }
}
