//! The fixed user directory.
//!
//! Authentication is out of scope; the deployment assumes a pre-known set
//! of users. Member IDs that fail to resolve here are dropped from enriched
//! views, never surfaced as errors.

use serde::{Deserialize, Serialize};

use swarmcart_core::UserId;

/// A known user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Single-character avatar badge.
    pub avatar: String,
    /// Display color, hex.
    pub color: String,
}

/// Lookup over the fixed set of known users.
#[derive(Debug)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    /// Build a directory from a user list.
    #[must_use]
    pub const fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The default pre-known users.
    #[must_use]
    pub fn seeded() -> Self {
        let user = |id: &str, name: &str, avatar: &str, color: &str| User {
            id: UserId::new(id),
            name: name.to_owned(),
            avatar: avatar.to_owned(),
            color: color.to_owned(),
        };

        Self::new(vec![
            user("user1", "Sanjay", "S", "#10B981"),
            user("user2", "Priya", "P", "#8B5CF6"),
            user("user3", "Rahul", "R", "#F59E0B"),
            user("user4", "Anita", "A", "#EF4444"),
        ])
    }

    /// Look up a user by ID.
    #[must_use]
    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    /// All known users.
    #[must_use]
    pub fn all(&self) -> &[User] {
        &self.users
    }
}
