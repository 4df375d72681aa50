//! The product record served by the catalog.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// A catalog product.
///
/// Products are read-only reference data owned by the catalog; the cart
/// service never mutates them. The health rating is serialized as
/// `vestoScore` on the wire, matching what clients already consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID (a short catalog token, e.g. `g1`).
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Country or region of origin.
    pub origin: String,
    /// Category used for grouping, merging, and essentials tracking.
    pub category: String,
    /// Unit price. Always positive in the seeded catalog.
    pub price: f64,
    /// Community star rating, 0-5.
    pub rating: f64,
    /// Health rating, 0-10.
    #[serde(rename = "vestoScore")]
    pub health_score: f64,
    /// Display emoji.
    pub emoji: String,
    /// How many times the community has selected this product. Feeds the
    /// community-trend term of the composite score.
    pub selection_count: u32,
    /// Recent price observations, newest last.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_history: Vec<f64>,
}
