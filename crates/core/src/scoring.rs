//! The scoring engine.
//!
//! Pure functions computing a composite quality/value score per product and
//! the aggregate cart health percentage. No state of its own.
//!
//! All rounding happens here, once, at the public boundary (`round1`);
//! intermediate factors stay at full precision so callers composing scores
//! never accumulate rounding error.

use std::collections::HashMap;

use crate::types::Product;

/// Health rating at or above which a product counts as healthy.
pub const HEALTHY_THRESHOLD: f64 = 7.0;

/// Weight triple for the composite score.
///
/// The same three-factor shape is used everywhere a product is scored; only
/// the weights differ between the marketplace listing and the merge
/// best-value comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight of the price-efficiency factor.
    pub price_efficiency: f64,
    /// Weight of the quality factor (rating + health).
    pub quality: f64,
    /// Weight of the community-trend factor.
    pub community: f64,
}

impl ScoreWeights {
    /// Standard weighting used for the scored catalog listing.
    pub const STANDARD: Self = Self {
        price_efficiency: 0.4,
        quality: 0.3,
        community: 0.3,
    };

    /// Weighting used when comparing merge candidates within a category.
    pub const MERGE: Self = Self {
        price_efficiency: 0.5,
        quality: 0.3,
        community: 0.2,
    };
}

/// Per-category price and popularity statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryStats {
    /// Average price across the category.
    pub avg_price: f64,
    /// Highest selection count in the category.
    pub max_selections: u32,
}

/// Round to one decimal place. The single rounding boundary of the engine.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute the composite score for a product, in `[0, 10]`.
///
/// Three factors:
/// - price efficiency: `min(10, (category_avg_price / price) * 5)`, so a
///   product much cheaper than its category average cannot exceed the
///   10-point ceiling; 0 when the price is non-positive
/// - quality: `((rating / 5) * 10 + health) / 2`
/// - community trend: `(selections / category_max_selections) * 10`, 0 when
///   the category has no selections at all
///
/// The result is rounded to one decimal.
#[must_use]
pub fn composite_score(
    product: &Product,
    category_avg_price: f64,
    category_max_selections: u32,
    weights: ScoreWeights,
) -> f64 {
    let price_efficiency = if product.price > 0.0 {
        (category_avg_price / product.price * 5.0).min(10.0)
    } else {
        0.0
    };
    let quality = ((product.rating / 5.0) * 10.0 + product.health_score) / 2.0;
    let community = if category_max_selections > 0 {
        f64::from(product.selection_count) / f64::from(category_max_selections) * 10.0
    } else {
        0.0
    };

    round1(
        price_efficiency * weights.price_efficiency
            + quality * weights.quality
            + community * weights.community,
    )
}

/// Raw value score used for best-value comparison within a category.
///
/// Unlike [`composite_score`] this needs no category statistics: it weighs
/// the product's own health, rating, and price reciprocal.
#[must_use]
pub fn value_score(product: &Product, weights: ScoreWeights) -> f64 {
    let price_value = if product.price > 0.0 {
        (1.0 / product.price) * 100.0
    } else {
        0.0
    };
    product.health_score * weights.price_efficiency
        + product.rating * weights.quality
        + price_value * weights.community
}

/// Pick the best-value product among the candidates.
///
/// Ties are broken deterministically: lowest price first, then lexicographic
/// product ID.
#[must_use]
pub fn best_value<'a, I>(candidates: I, weights: ScoreWeights) -> Option<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    candidates.into_iter().reduce(|best, candidate| {
        let b = value_score(best, weights);
        let c = value_score(candidate, weights);
        if c > b {
            candidate
        } else if c < b {
            best
        } else if candidate.price < best.price {
            candidate
        } else if candidate.price > best.price {
            best
        } else if candidate.id < best.id {
            candidate
        } else {
            best
        }
    })
}

/// Aggregate cart health: `round(100 * healthy / total)`, where healthy
/// means a health rating of at least [`HEALTHY_THRESHOLD`].
///
/// An empty cart scores 100 (vacuously healthy).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn optimization_score(health_scores: &[f64]) -> u8 {
    if health_scores.is_empty() {
        return 100;
    }
    let healthy = health_scores
        .iter()
        .filter(|&&h| h >= HEALTHY_THRESHOLD)
        .count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = healthy as f64 / health_scores.len() as f64;
    (ratio * 100.0).round() as u8
}

/// Compute per-category average price and max selection count.
///
/// These feed the price-efficiency and community-trend factors of
/// [`composite_score`].
#[must_use]
pub fn category_stats(products: &[Product]) -> HashMap<String, CategoryStats> {
    let mut sums: HashMap<&str, (f64, usize, u32)> = HashMap::new();
    for product in products {
        let entry = sums.entry(&product.category).or_insert((0.0, 0, 0));
        entry.0 += product.price;
        entry.1 += 1;
        entry.2 = entry.2.max(product.selection_count);
    }

    sums.into_iter()
        .map(|(category, (total, count, max_selections))| {
            #[allow(clippy::cast_precision_loss)]
            let avg_price = total / count as f64;
            (
                category.to_owned(),
                CategoryStats {
                    avg_price,
                    max_selections,
                },
            )
        })
        .collect()
}
