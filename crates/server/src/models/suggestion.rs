//! The suggestion sum type.
//!
//! Each of the four suggestion kinds carries only its own fields, so a
//! handler can never reach for a field the kind does not have. Suggestions
//! are ephemeral: the whole list is recomputed after every mutation that
//! changes cart composition, and a stale suggestion never survives a
//! recompute.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use swarmcart_core::{ItemId, Product, SuggestionId};

/// A system-generated recommendation derived from current cart state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Suggestion {
    /// Consolidate a category with two or more distinct items into its
    /// best-value product.
    MergeSuggestion {
        id: SuggestionId,
        category: String,
        /// The lines that would be absorbed.
        items: Vec<ItemId>,
        /// Combined cost of those lines today.
        total_current_cost: f64,
        /// Mean health rating across the group, one decimal.
        avg_health: f64,
        suggested_product: Product,
        /// `max(0, current cost - suggested price × total quantity)`.
        potential_savings: f64,
        /// Suggested health minus the group average, one decimal.
        health_delta: f64,
        message: String,
        created_at: DateTime<Utc>,
    },

    /// Instant feedback when a second product of an already-present
    /// category is added. Pushed directly, not part of the recomputed list.
    DuplicateDetected {
        id: SuggestionId,
        category: String,
        existing_product: Product,
        new_product: Product,
        message: String,
        created_at: DateTime<Utc>,
    },

    /// A low-health item has a healthier same-category alternative.
    HealthUpgrade {
        id: SuggestionId,
        item_id: ItemId,
        current_product: Product,
        better_option: Product,
        message: String,
        created_at: DateTime<Utc>,
    },

    /// One or more essential categories are entirely absent from the cart.
    SwarmSuggestion {
        id: SuggestionId,
        missing_categories: Vec<String>,
        message: String,
        created_at: DateTime<Utc>,
    },
}

impl Suggestion {
    /// The suggestion's ID, regardless of kind.
    #[must_use]
    pub const fn id(&self) -> &SuggestionId {
        match self {
            Self::MergeSuggestion { id, .. }
            | Self::DuplicateDetected { id, .. }
            | Self::HealthUpgrade { id, .. }
            | Self::SwarmSuggestion { id, .. } => id,
        }
    }

    /// Generate a fresh suggestion ID.
    #[must_use]
    pub fn fresh_id() -> SuggestionId {
        SuggestionId::new(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_wire_format() {
        let suggestion = Suggestion::SwarmSuggestion {
            id: SuggestionId::new("s1"),
            missing_categories: vec!["Dairy".to_owned(), "Fruits".to_owned()],
            message: "Your cart is missing essentials: Dairy, Fruits".to_owned(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&suggestion).expect("serialize");
        assert_eq!(json["type"], "swarm_suggestion");
        assert_eq!(json["missingCategories"][0], "Dairy");
        assert_eq!(json["id"], "s1");
    }

    #[test]
    fn test_id_accessor_covers_all_kinds() {
        let suggestion = Suggestion::SwarmSuggestion {
            id: SuggestionId::new("abc"),
            missing_categories: Vec::new(),
            message: String::new(),
            created_at: Utc::now(),
        };
        assert_eq!(suggestion.id().as_str(), "abc");
    }
}
