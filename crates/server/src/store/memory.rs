//! In-memory cart store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use swarmcart_core::{CartId, UserId};

use crate::models::Cart;

use super::{CartStore, StoreError};

/// Cart store backed by an in-process map. State is lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    carts: RwLock<HashMap<CartId, Cart>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing carts (used by the file backend's load).
    #[must_use]
    pub fn with_carts(carts: Vec<Cart>) -> Self {
        Self {
            carts: RwLock::new(
                carts
                    .into_iter()
                    .map(|cart| (cart.id.clone(), cart))
                    .collect(),
            ),
        }
    }

    /// Snapshot every cart, oldest first. Used for file persistence.
    pub async fn snapshot(&self) -> Vec<Cart> {
        let carts = self.carts.read().await;
        let mut all: Vec<Cart> = carts.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn get(&self, id: &CartId) -> Result<Option<Cart>, StoreError> {
        Ok(self.carts.read().await.get(id).cloned())
    }

    async fn put(&self, cart: Cart) -> Result<(), StoreError> {
        self.carts.write().await.insert(cart.id.clone(), cart);
        Ok(())
    }

    async fn get_by_invite_code(&self, code: &str) -> Result<Option<Cart>, StoreError> {
        Ok(self
            .carts
            .read()
            .await
            .values()
            .find(|cart| cart.invite_code == code)
            .cloned())
    }

    async fn list_by_member(&self, user_id: &UserId) -> Result<Vec<Cart>, StoreError> {
        let carts = self.carts.read().await;
        let mut mine: Vec<Cart> = carts
            .values()
            .filter(|cart| cart.is_member(user_id))
            .cloned()
            .collect();
        mine.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(mine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cart(id: &str, code: &str, members: &[&str]) -> Cart {
        Cart {
            id: CartId::new(id),
            name: format!("Cart {id}"),
            owner_id: UserId::new(members[0]),
            members: members.iter().map(|m| UserId::new(*m)).collect(),
            items: Vec::new(),
            invite_code: code.to_owned(),
            created_at: Utc::now(),
            activity: Vec::new(),
            suggestions: Vec::new(),
            optimization_score: 100,
        }
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        let cart = cart("c1", "AAAAAA", &["user1"]);
        store.put(cart.clone()).await.expect("put");

        let fetched = store.get(&CartId::new("c1")).await.expect("get");
        assert_eq!(fetched, Some(cart));
        assert!(store.get(&CartId::new("c2")).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_invite_code_lookup() {
        let store = MemoryStore::new();
        store.put(cart("c1", "AAAAAA", &["user1"])).await.expect("put");
        store.put(cart("c2", "BBBBBB", &["user2"])).await.expect("put");

        let found = store.get_by_invite_code("BBBBBB").await.expect("lookup");
        assert_eq!(found.expect("cart").id.as_str(), "c2");
        assert!(store.get_by_invite_code("ZZZZZZ").await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn test_list_by_member() {
        let store = MemoryStore::new();
        store.put(cart("c1", "AAAAAA", &["user1", "user2"])).await.expect("put");
        store.put(cart("c2", "BBBBBB", &["user2"])).await.expect("put");
        store.put(cart("c3", "CCCCCC", &["user3"])).await.expect("put");

        let mine = store.list_by_member(&UserId::new("user2")).await.expect("list");
        assert_eq!(mine.len(), 2);
        assert!(store
            .list_by_member(&UserId::new("nobody"))
            .await
            .expect("list")
            .is_empty());
    }
}
