use async_trait::async_trait;
use shared::User;
use tracing::info;

use super::connection::{CsvConnection, USER_HEADERS};
use crate::storage::error::StoreError;
use crate::storage::traits::UserStorage;

/// CSV-based user repository backed by `users.csv`
#[derive(Clone)]
pub struct CsvUserRepository {
    connection: CsvConnection,
}

impl CsvUserRepository {
    /// Create a new CSV user repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_users(&self) -> Result<Vec<User>, StoreError> {
        self.connection.read_records(&self.connection.users_file_path())
    }

    fn write_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.connection
            .write_records(&self.connection.users_file_path(), &USER_HEADERS, users)
    }
}

#[async_trait]
impl UserStorage for CsvUserRepository {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users = self.read_users()?;
        // case-insensitive, like the hosted store's collation
        users.sort_by_cached_key(|u| u.name.to_lowercase());
        Ok(users)
    }

    async fn store_user(&self, user: &User) -> Result<(), StoreError> {
        let _guard = self.connection.lock().await;

        let mut users = self.read_users()?;
        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Query(format!("User {} already exists", user.id)));
        }
        users.push(user.clone());
        self.write_users(&users)?;

        info!("Stored user {} ({})", user.name, user.id);
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let _guard = self.connection.lock().await;

        let mut users = self.read_users()?;
        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| StoreError::NotFound(format!("User {}", user.id)))?;
        *existing = user.clone();
        self.write_users(&users)?;

        info!("Updated user {} ({})", user.name, user.id);
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        let _guard = self.connection.lock().await;

        let mut users = self.read_users()?;
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(StoreError::NotFound(format!("User {}", user_id)));
        }
        self.write_users(&users)?;

        info!("Deleted user {}", user_id);
        Ok(())
    }
}
