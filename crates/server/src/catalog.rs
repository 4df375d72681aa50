//! Catalog lookup: read-only product reference data.
//!
//! The catalog is an external collaborator in the architecture; this module
//! ships a curated in-process table so the service runs self-contained. The
//! cart engine only ever reads it - lookups that fail at enrichment time
//! drop the item from the view rather than erroring.

use std::collections::HashMap;

use serde::Serialize;

use swarmcart_core::scoring::{self, ScoreWeights};
use swarmcart_core::{Product, ProductId};

/// Read-only product lookup keyed by product ID.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

/// A catalog product enriched with its computed composite score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Composite quality/value score, one decimal, standard weights.
    pub composite_score: f64,
}

impl Catalog {
    /// Build a catalog from a product list. Later duplicates of an ID win.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let by_id = products
            .iter()
            .enumerate()
            .map(|(index, product)| (product.id.clone(), index))
            .collect();
        Self { products, by_id }
    }

    /// The curated seed catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_products())
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).map(|&index| &self.products[index])
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// All products in a category, in catalog order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| product.category == category)
    }

    /// Case-insensitive substring search on product name.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// All products with their composite score under the standard weights.
    ///
    /// Category statistics (average price, max selections) are computed over
    /// the whole catalog first so every product in a category is scored
    /// against the same baseline.
    #[must_use]
    pub fn scored(&self) -> Vec<ScoredProduct> {
        let stats = scoring::category_stats(&self.products);
        self.products
            .iter()
            .map(|product| {
                let stat = stats.get(&product.category).copied().unwrap_or(
                    scoring::CategoryStats {
                        avg_price: product.price,
                        max_selections: product.selection_count,
                    },
                );
                ScoredProduct {
                    product: product.clone(),
                    composite_score: scoring::composite_score(
                        product,
                        stat.avg_price,
                        stat.max_selections,
                        ScoreWeights::STANDARD,
                    ),
                }
            })
            .collect()
    }
}

#[allow(clippy::too_many_lines)]
fn seed_products() -> Vec<Product> {
    let entry = |id: &str,
                 name: &str,
                 brand: &str,
                 origin: &str,
                 category: &str,
                 price: f64,
                 rating: f64,
                 health: f64,
                 emoji: &str,
                 selections: u32,
                 history: &[f64]| Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        brand: brand.to_owned(),
        origin: origin.to_owned(),
        category: category.to_owned(),
        price,
        rating,
        health_score: health,
        emoji: emoji.to_owned(),
        selection_count: selections,
        price_history: history.to_vec(),
    };

    vec![
        // Grains & Pulses
        entry("g1", "Premium Aged Basmati Rice", "India Gate", "India", "Grains", 185.0, 4.8, 9.0, "🍚", 850, &[195.0, 185.0]),
        entry("g2", "Organic White Quinoa", "Bob's Red Mill", "USA", "Grains", 450.0, 4.9, 10.0, "🌾", 1200, &[470.0, 450.0]),
        entry("g3", "Steel Cut Oats", "Quaker", "UK", "Grains", 299.0, 4.7, 9.0, "🥣", 650, &[310.0, 299.0]),
        entry("g4", "Peshawari Chole", "Tata Sampann", "India", "Pulses", 95.0, 4.6, 8.0, "🫘", 1400, &[105.0, 95.0]),
        // Beverages
        entry("b1", "Attikan Estate Coffee", "Blue Tokai", "India", "Beverages", 540.0, 4.9, 8.0, "☕", 2200, &[540.0, 540.0]),
        entry("b2", "Classic Energy Drink", "Red Bull", "Austria", "Beverages", 125.0, 4.4, 4.0, "🥤", 5000, &[125.0, 125.0]),
        entry("b3", "Earl Grey Tea", "Twinings", "UK", "Beverages", 350.0, 4.8, 9.0, "🫖", 1800, &[360.0, 350.0]),
        entry("b4", "Sparkling Water", "Perrier", "France", "Beverages", 110.0, 4.5, 10.0, "💧", 950, &[120.0, 110.0]),
        // Snacks & Confectionery
        entry("s1", "Sea Salt Kettle Chips", "Lay's Gourmet", "USA", "Snacks", 60.0, 4.6, 3.0, "🥔", 3500, &[60.0, 60.0]),
        entry("s2", "Excellence 85% Dark", "Lindt", "Switzerland", "Confectionery", 250.0, 4.9, 7.0, "🍫", 2800, &[275.0, 250.0]),
        entry("s3", "Rocher Premium Box", "Ferrero", "Italy", "Confectionery", 899.0, 5.0, 2.0, "🎁", 4200, &[950.0, 899.0]),
        entry("s4", "Digestive Biscuits", "McVitie's", "UK", "Snacks", 85.0, 4.5, 6.0, "🍪", 1200, &[85.0, 85.0]),
        entry("s5", "Baked Multigrain Crackers", "RW Garcia", "USA", "Snacks", 220.0, 4.4, 8.0, "🫓", 600, &[230.0, 220.0]),
        // Dairy & Healthy
        entry("d1", "Greek Yogurt Plain", "Epigamia", "India", "Dairy", 70.0, 4.8, 10.0, "🥛", 1600, &[70.0, 70.0]),
        entry("d2", "Cream Cheese Spread", "Philadelphia", "USA", "Dairy", 399.0, 4.7, 5.0, "🧀", 1100, &[420.0, 399.0]),
        entry("d3", "Unsweetened Almond Milk", "Alpro", "Belgium", "Dairy Alternatives", 299.0, 4.7, 9.0, "🌰", 850, &[310.0, 299.0]),
        entry("d4", "Chia Seeds Organic", "True Elements", "India", "Healthy", 240.0, 4.9, 10.0, "🌱", 1900, &[260.0, 240.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_lookup() {
        let catalog = Catalog::seeded();
        let yogurt = catalog.get(&ProductId::new("d1")).expect("d1 exists");
        assert_eq!(yogurt.name, "Greek Yogurt Plain");
        assert_eq!(yogurt.category, "Dairy");
        assert!(catalog.get(&ProductId::new("nope")).is_none());
    }

    #[test]
    fn test_seeded_ids_unique() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.all().len(), catalog.by_id.len());
    }

    #[test]
    fn test_category_listing() {
        let catalog = Catalog::seeded();
        let snacks: Vec<_> = catalog.in_category("Snacks").collect();
        assert_eq!(snacks.len(), 3);
        assert!(snacks.iter().all(|p| p.category == "Snacks"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::seeded();
        let hits = catalog.search("yogurt");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "d1");
        assert!(catalog.search("zzzz").is_empty());
    }

    #[test]
    fn test_scored_listing_in_range() {
        let catalog = Catalog::seeded();
        let scored = catalog.scored();
        assert_eq!(scored.len(), catalog.all().len());
        for entry in &scored {
            assert!(
                (0.0..=10.0).contains(&entry.composite_score),
                "{} scored {}",
                entry.product.id,
                entry.composite_score
            );
        }
    }

    #[test]
    fn test_every_low_health_snack_has_an_upgrade_path() {
        // The health-upgrade suggestion needs at least one product above the
        // 7.0 bar in any category that also has a product below 5.0.
        let catalog = Catalog::seeded();
        for product in catalog.all() {
            if product.health_score < 5.0 && product.category == "Snacks" {
                assert!(
                    catalog
                        .in_category(&product.category)
                        .any(|p| p.health_score > 7.0),
                    "no upgrade path for {}",
                    product.id
                );
            }
        }
    }
}
