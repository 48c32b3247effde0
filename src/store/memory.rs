use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    recipes::{
        repo::RecipeStore,
        repo_types::{NewRecipe, Recipe},
    },
    store::{StoreError, StoreResult},
    users::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
};

#[derive(Default)]
struct Tables {
    last_user_id: i64,
    last_recipe_id: i64,
    users: BTreeMap<i64, User>,
    recipes: BTreeMap<i64, Recipe>,
}

impl Tables {
    fn holder_of(&self, username: &str) -> Option<i64> {
        self.users
            .values()
            .find(|u| u.username() == username)
            .map(User::id)
    }
}

/// Process-local store with the same constraints as the Postgres schema:
/// unique usernames, recipes need an existing owner, deleting a user deletes
/// their recipes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.tables();
        if t.holder_of(new.username()).is_some() {
            return Err(StoreError::UniqueViolation("users_username_key".into()));
        }
        t.last_user_id += 1;
        let user = User::from_new(t.last_user_id, new, OffsetDateTime::now_utc());
        t.users.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.tables();
        Ok(t.holder_of(username).and_then(|id| t.users.get(&id).cloned()))
    }

    async fn username_taken(&self, username: &str, except: Option<i64>) -> StoreResult<bool> {
        let holder = self.tables().holder_of(username);
        Ok(matches!(holder, Some(id) if Some(id) != except))
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let mut t = self.tables();
        if !t.users.contains_key(&user.id()) {
            return Err(StoreError::NotFound("user"));
        }
        if matches!(t.holder_of(user.username()), Some(id) if id != user.id()) {
            return Err(StoreError::UniqueViolation("users_username_key".into()));
        }
        t.users.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let mut t = self.tables();
        if t.users.remove(&id).is_none() {
            return Err(StoreError::NotFound("user"));
        }
        t.recipes.retain(|_, r| r.user_id() != id);
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn create_recipe(&self, new: NewRecipe) -> StoreResult<Recipe> {
        let mut t = self.tables();
        if !t.users.contains_key(&new.user_id()) {
            return Err(StoreError::MissingOwner(new.user_id()));
        }
        t.last_recipe_id += 1;
        let recipe = Recipe::from_new(t.last_recipe_id, new, OffsetDateTime::now_utc());
        t.recipes.insert(recipe.id(), recipe.clone());
        Ok(recipe)
    }

    async fn find_recipe(&self, id: i64) -> StoreResult<Option<Recipe>> {
        Ok(self.tables().recipes.get(&id).cloned())
    }

    async fn list_recipes(&self) -> StoreResult<Vec<Recipe>> {
        Ok(self.tables().recipes.values().cloned().collect())
    }

    async fn list_recipes_by_user(&self, user_id: i64) -> StoreResult<Vec<Recipe>> {
        Ok(self
            .tables()
            .recipes
            .values()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn update_recipe(&self, recipe: &Recipe) -> StoreResult<Recipe> {
        let mut t = self.tables();
        match t.recipes.get_mut(&recipe.id()) {
            Some(slot) => {
                *slot = recipe.clone();
                Ok(recipe.clone())
            }
            None => Err(StoreError::NotFound("recipe")),
        }
    }

    async fn delete_recipe(&self, id: i64) -> StoreResult<()> {
        match self.tables().recipes.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("recipe")),
        }
    }
}
