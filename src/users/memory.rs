use super::{CreateOutcome, NewUser, User, UserStore, UserStoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process user table keyed by email.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, replacing any user with the same email.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.email.clone(), user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<CreateOutcome, UserStoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Ok(CreateOutcome::Conflict);
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
        };
        users.insert(created.email.clone(), created.clone());
        Ok(CreateOutcome::Created(created))
    }

    async fn ping(&self) -> Result<(), UserStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find() -> Result<(), UserStoreError> {
        let store = MemoryUserStore::new();
        let CreateOutcome::Created(created) = store.create_user(new_user("a@example.com")).await?
        else {
            panic!("expected user to be created");
        };
        let found = store.find_user_by_email("a@example.com").await?;
        assert_eq!(found.map(|user| user.id), Some(created.id));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() -> Result<(), UserStoreError> {
        let store = MemoryUserStore::new();
        store.create_user(new_user("a@example.com")).await?;
        let outcome = store.create_user(new_user("a@example.com")).await?;
        assert!(matches!(outcome, CreateOutcome::Conflict));
        Ok(())
    }
}
