use std::fmt;

use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    auth::password,
    error::AppResult,
    validation::{validate_username, ValidationError},
};

/// A persisted account.
///
/// Fields are only reachable through methods so that every assignment goes
/// through validation. The password hash has no reader: it can be replaced
/// with [`User::set_password`] and checked with [`User::verify_password`].
#[derive(Clone, FromRow)]
pub struct User {
    id: i64,
    username: String,
    password_hash: String,
    image_url: Option<String>,
    bio: Option<String>,
    created_at: OffsetDateTime,
}

impl User {
    pub(crate) fn from_new(id: i64, new: NewUser, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            username: new.username,
            password_hash: new.password_hash,
            image_url: new.image_url,
            bio: new.bio,
            created_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Shape check only; uniqueness is the store's job.
    pub fn set_username(&mut self, username: impl Into<String>) -> Result<(), ValidationError> {
        let username = username.into();
        validate_username(&username)?;
        self.username = username;
        Ok(())
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
    }

    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
    }

    /// Replaces the stored hash irreversibly.
    pub fn set_password(&mut self, plain: &str) -> anyhow::Result<()> {
        self.password_hash = password::hash_password(plain)?;
        Ok(())
    }

    pub fn verify_password(&self, plain: &str) -> bool {
        password::verify_password(plain, &self.password_hash)
    }

    // persistence only
    pub(crate) fn stored_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("image_url", &self.image_url)
            .field("bio", &self.bio)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A validated, hashed account that has not been inserted yet.
#[derive(Clone)]
pub struct NewUser {
    username: String,
    password_hash: String,
    image_url: Option<String>,
    bio: Option<String>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: &str) -> AppResult<Self> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self {
            username,
            password_hash: password::hash_password(password)?,
            image_url: None,
            bio: None,
        })
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_bio(mut self, bio: Option<String>) -> Self {
        self.bio = bio;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub(crate) fn stored_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish_non_exhaustive()
    }
}
