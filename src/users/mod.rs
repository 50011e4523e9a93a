//! User records consumed by the session core.
//!
//! The session core only reads users (lookup by email). Sign-up is the single
//! writer and goes through [`UserStore::create_user`].

mod memory;
mod postgres;

pub use self::memory::MemoryUserStore;
pub use self::postgres::PgUserStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string, never a plaintext password.
    pub password_hash: String,
    pub name: String,
}

/// Fields required to create a user; the id is assigned by the store.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

#[derive(Debug)]
pub enum CreateOutcome {
    Created(User),
    Conflict,
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("user store query failed: {0}")]
    Query(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    /// Insert a user, reporting a duplicate email as [`CreateOutcome::Conflict`].
    async fn create_user(&self, user: NewUser) -> Result<CreateOutcome, UserStoreError>;

    async fn ping(&self) -> Result<(), UserStoreError>;
}
