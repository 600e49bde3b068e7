use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::constants::ADMIN_USER_ID;
use crate::id::next_id;
use crate::models::User;

/// In-memory user collection, seeded with the admin account.
///
/// Users are only ever appended: no deletion, no updates after creation.
#[derive(Clone)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserStore {
    /// Create a store seeded with the admin user (ID 1).
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(vec![User {
                id: ADMIN_USER_ID,
                username: "Admin".to_string(),
                is_online: false,
            }])),
        }
    }

    /// All users except the caller, in insertion order.
    ///
    /// A `caller_id` of 0 (absent or unparsable parameter) excludes nobody,
    /// since no user is ever numbered 0.
    pub async fn list_others(&self, caller_id: i64) -> Vec<User> {
        let users = self.users.read().await;
        users
            .iter()
            .filter(|user| user.id != caller_id)
            .cloned()
            .collect()
    }

    /// Look up a user by exact username, creating it on first sight.
    ///
    /// Returns the existing record unchanged when the name is already taken
    /// (`is_online` is not touched).  An empty username is accepted as a
    /// valid, if degenerate, user.
    pub async fn get_or_create(&self, username: &str) -> User {
        let mut users = self.users.write().await;

        if let Some(existing) = users.iter().find(|user| user.username == username) {
            return existing.clone();
        }

        let user = User {
            id: next_id(users.iter().map(|user| user.id)),
            username: username.to_string(),
            is_online: false,
        };
        debug!(id = user.id, username = %user.username, "Created user");
        users.push(user.clone());

        user
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
