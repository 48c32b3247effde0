use async_trait::async_trait;

use crate::{
    store::{map_db_error, PgStore, StoreError, StoreResult},
    users::repo_types::{NewUser, User},
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// True when a user other than `except` already holds `username`.
    async fn username_taken(&self, username: &str, except: Option<i64>) -> StoreResult<bool>;

    async fn update_user(&self, user: &User) -> StoreResult<User>;

    /// Removes the user together with every recipe they own.
    async fn delete_user(&self, id: i64) -> StoreResult<()>;
}

const USER_COLUMNS: &str = "id, username, password_hash, image_url, bio, created_at";

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, password_hash, image_url, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.username())
        .bind(new.stored_hash())
        .bind(new.image_url())
        .bind(new.bio())
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, None))?;
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn username_taken(&self, username: &str, except: Option<i64>) -> StoreResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                  FROM users
                 WHERE username = $1
                   AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username)
        .bind(except)
        .fetch_one(&self.db)
        .await?;
        Ok(taken)
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let updated = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET username = $2, password_hash = $3, image_url = $4, bio = $5
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id())
        .bind(user.username())
        .bind(user.stored_hash())
        .bind(user.image_url())
        .bind(user.bio())
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_db_error(e, None))?;
        updated.ok_or(StoreError::NotFound("user"))
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        // recipes go with it through ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }
}
