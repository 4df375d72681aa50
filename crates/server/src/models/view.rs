//! Enriched response views.
//!
//! Before every response and broadcast, the raw cart is joined with the
//! catalog (per item) and the user directory (per member). Unresolved
//! references are dropped from the view - never an error - and the enriched
//! form is never written back to the store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use swarmcart_core::{CartId, ItemId, Product, UserId};

use crate::catalog::Catalog;
use crate::directory::{User, UserDirectory};

use super::cart::{ActivityEntry, Cart, CartItem};
use super::suggestion::Suggestion;

/// Most recent activity entries shown to clients; the store retains more.
const ACTIVITY_DISPLAY_CAP: usize = 20;

/// A cart item joined with its catalog product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: ItemId,
    pub quantity: u32,
    pub added_by: UserId,
    pub added_at: DateTime<Utc>,
    pub merged: bool,
    pub product: Product,
}

/// A member joined with the user directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    pub color: String,
}

impl From<&User> for MemberView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            color: user.color.clone(),
        }
    }
}

/// The enriched cart sent to callers and broadcast to subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: CartId,
    pub name: String,
    pub owner_id: UserId,
    pub members: Vec<MemberView>,
    pub items: Vec<CartItemView>,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    /// Newest first, capped for display.
    pub activity: Vec<ActivityEntry>,
    pub suggestions: Vec<Suggestion>,
    pub optimization_score: u8,
}

impl CartView {
    /// Join a raw cart with the catalog and user directory.
    #[must_use]
    pub fn enrich(cart: &Cart, catalog: &Catalog, directory: &UserDirectory) -> Self {
        let items = cart
            .items
            .iter()
            .filter_map(|item| enrich_item(item, catalog))
            .collect();

        let members = cart
            .members
            .iter()
            .filter_map(|member_id| directory.get(member_id).map(MemberView::from))
            .collect();

        Self {
            id: cart.id.clone(),
            name: cart.name.clone(),
            owner_id: cart.owner_id.clone(),
            members,
            items,
            invite_code: cart.invite_code.clone(),
            created_at: cart.created_at,
            activity: cart
                .activity
                .iter()
                .take(ACTIVITY_DISPLAY_CAP)
                .cloned()
                .collect(),
            suggestions: cart.suggestions.clone(),
            optimization_score: cart.optimization_score,
        }
    }
}

fn enrich_item(item: &CartItem, catalog: &Catalog) -> Option<CartItemView> {
    let product = catalog.get(&item.product_id)?;
    Some(CartItemView {
        id: item.id.clone(),
        quantity: item.quantity,
        added_by: item.added_by.clone(),
        added_at: item.added_at,
        merged: item.merged,
        product: product.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cart::ActivityKind;
    use swarmcart_core::ProductId;

    fn cart_with(items: Vec<CartItem>, members: Vec<UserId>) -> Cart {
        Cart {
            id: CartId::new("c1"),
            name: "Groceries".to_owned(),
            owner_id: UserId::new("user1"),
            members,
            items,
            invite_code: "ABC123".to_owned(),
            created_at: Utc::now(),
            activity: Vec::new(),
            suggestions: Vec::new(),
            optimization_score: 100,
        }
    }

    fn item(id: &str, product_id: &str) -> CartItem {
        CartItem {
            id: ItemId::new(id),
            product_id: ProductId::new(product_id),
            quantity: 1,
            added_by: UserId::new("user1"),
            added_at: Utc::now(),
            merged: false,
        }
    }

    #[test]
    fn test_unresolved_item_dropped_from_view() {
        let catalog = Catalog::seeded();
        let directory = UserDirectory::seeded();
        let cart = cart_with(
            vec![item("i1", "d1"), item("i2", "discontinued")],
            vec![UserId::new("user1")],
        );

        let view = CartView::enrich(&cart, &catalog, &directory);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].product.id.as_str(), "d1");
    }

    #[test]
    fn test_unresolved_member_dropped_from_view() {
        let catalog = Catalog::seeded();
        let directory = UserDirectory::seeded();
        let cart = cart_with(
            Vec::new(),
            vec![UserId::new("user1"), UserId::new("ghost")],
        );

        let view = CartView::enrich(&cart, &catalog, &directory);
        assert_eq!(view.members.len(), 1);
        assert_eq!(view.members[0].name, "Sanjay");
    }

    #[test]
    fn test_activity_capped_at_twenty() {
        let catalog = Catalog::seeded();
        let directory = UserDirectory::seeded();
        let mut cart = cart_with(Vec::new(), vec![UserId::new("user1")]);
        for n in 0..30 {
            cart.push_activity(ActivityEntry {
                kind: ActivityKind::ItemAdded,
                user_id: UserId::new("user1"),
                message: format!("entry {n}"),
                product_name: None,
                product_emoji: None,
                timestamp: Utc::now(),
            });
        }

        let view = CartView::enrich(&cart, &catalog, &directory);
        assert_eq!(view.activity.len(), 20);
        // Newest first survives the cap.
        assert_eq!(view.activity[0].message, "entry 29");
        assert_eq!(cart.activity.len(), 30, "store retains the full log");
    }
}
