//! Cart domain types.
//!
//! These are the persisted shapes: a `Cart` embeds its items, activity log,
//! and current suggestions, all order-preserving `Vec`s so the embedded
//! arrays round-trip losslessly through the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use swarmcart_core::{CartId, ItemId, ProductId, UserId};

use super::suggestion::Suggestion;

/// A single line in a cart.
///
/// Owned exclusively by its parent cart; destroyed when removed or absorbed
/// into a merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique within the cart.
    pub id: ItemId,
    /// The catalog product this line references.
    pub product_id: ProductId,
    /// Positive count.
    pub quantity: u32,
    /// Who added the item.
    pub added_by: UserId,
    /// When the item was added.
    pub added_at: DateTime<Utc>,
    /// True if this line was created by a merge operation.
    #[serde(default)]
    pub merged: bool,
}

/// The kind of a recent-activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    CartCreated,
    MemberJoined,
    ItemAdded,
    ItemRemoved,
    ItemsMerged,
}

/// One entry in the cart's recent-activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub user_id: UserId,
    /// Pre-rendered human text ("added 2× Greek Yogurt Plain").
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_emoji: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The shared, multi-member cart entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub name: String,
    /// Permanent member, always first in `members`.
    pub owner_id: UserId,
    /// Membership only grows; no leave operation.
    pub members: Vec<UserId>,
    /// Insertion order, relevant for display.
    pub items: Vec<CartItem>,
    /// 6-character unique join token.
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    /// Newest first.
    pub activity: Vec<ActivityEntry>,
    /// Fully recomputed after every structural change, never patched.
    pub suggestions: Vec<Suggestion>,
    /// 0-100 cart health.
    pub optimization_score: u8,
}

impl Cart {
    /// Whether a user belongs to this cart.
    #[must_use]
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.contains(user_id)
    }

    /// Find an item referencing a given product.
    #[must_use]
    pub fn find_item_by_product(&mut self, product_id: &ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
    }

    /// Prepend an activity entry (the log is newest-first).
    pub fn push_activity(&mut self, entry: ActivityEntry) {
        self.activity.insert(0, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        Cart {
            id: CartId::new("c1"),
            name: "Groceries".to_owned(),
            owner_id: UserId::new("user1"),
            members: vec![UserId::new("user1")],
            items: Vec::new(),
            invite_code: "ABC123".to_owned(),
            created_at: Utc::now(),
            activity: Vec::new(),
            suggestions: Vec::new(),
            optimization_score: 100,
        }
    }

    fn entry(message: &str) -> ActivityEntry {
        ActivityEntry {
            kind: ActivityKind::ItemAdded,
            user_id: UserId::new("user1"),
            message: message.to_owned(),
            product_name: None,
            product_emoji: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_activity_is_newest_first() {
        let mut cart = cart();
        cart.push_activity(entry("first"));
        cart.push_activity(entry("second"));
        assert_eq!(cart.activity[0].message, "second");
        assert_eq!(cart.activity[1].message, "first");
    }

    #[test]
    fn test_cart_round_trips_through_json() {
        let mut cart = cart();
        cart.items.push(CartItem {
            id: ItemId::new("i1"),
            product_id: ProductId::new("d1"),
            quantity: 2,
            added_by: UserId::new("user2"),
            added_at: Utc::now(),
            merged: true,
        });
        cart.push_activity(entry("added something"));

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }

    #[test]
    fn test_activity_kind_wire_names() {
        let json = serde_json::to_value(entry("x")).expect("serialize");
        assert_eq!(json["type"], "item_added");
        assert_eq!(json["userId"], "user1");
        assert!(json.get("productName").is_none());
    }
}
