//! The recommendation engine.
//!
//! Runs after every mutation that changes cart composition and derives the
//! full suggestion list from scratch - merge candidates per category,
//! health upgrades per item, and a missing-essentials nudge. The output
//! replaces the cart's previous list wholesale, so no suggestion can
//! outlive the items it references.
//!
//! The one exception to "full recompute" is [`detect_duplicate`], a
//! narrower synchronous check fired on item-add to give instant feedback
//! before the broader pass lands. Its result is pushed to subscribers
//! directly and never stored.

use chrono::Utc;

use swarmcart_core::scoring::{self, ScoreWeights, round1};
use swarmcart_core::Product;

use crate::catalog::Catalog;
use crate::models::cart::CartItem;
use crate::models::suggestion::Suggestion;

/// Categories every cart is nudged to include.
pub const ESSENTIAL_CATEGORIES: &[&str] = &["Dairy", "Vegetables", "Fruits"];

/// Health rating below which an item is a candidate for an upgrade.
const UPGRADE_CANDIDATE_BELOW: f64 = 5.0;

/// Health rating an alternative must exceed to be suggested.
const UPGRADE_ALTERNATIVE_ABOVE: f64 = 7.0;

/// Derive the full suggestion list for the current items.
///
/// Items whose product no longer resolves in the catalog are ignored, the
/// same way enrichment drops them from views.
#[must_use]
pub fn recompute(items: &[CartItem], catalog: &Catalog) -> Vec<Suggestion> {
    let resolved: Vec<(&CartItem, &Product)> = items
        .iter()
        .filter_map(|item| catalog.get(&item.product_id).map(|product| (item, product)))
        .collect();

    let mut suggestions = Vec::new();
    suggestions.extend(merge_suggestions(&resolved, catalog));
    suggestions.extend(health_upgrades(&resolved, catalog));
    if let Some(swarm) = missing_essentials(&resolved) {
        suggestions.push(swarm);
    }
    suggestions
}

/// Immediate same-category-different-product check on item add.
///
/// Fires only for a *different* product sharing a category with an existing
/// item; repeat adds of the same product increment quantity upstream and
/// never reach this check.
#[must_use]
pub fn detect_duplicate(
    existing: &[CartItem],
    new_product: &Product,
    catalog: &Catalog,
) -> Option<Suggestion> {
    let clash = existing.iter().find_map(|item| {
        let product = catalog.get(&item.product_id)?;
        (product.category == new_product.category && product.id != new_product.id)
            .then_some(product)
    })?;

    Some(Suggestion::DuplicateDetected {
        id: Suggestion::fresh_id(),
        category: new_product.category.clone(),
        existing_product: clash.clone(),
        new_product: new_product.clone(),
        message: format!(
            "{} is already in the cart. {} is from the same category - merge for better value?",
            clash.name, new_product.name
        ),
        created_at: Utc::now(),
    })
}

/// Group resolved items by category, preserving first-appearance order so
/// recomputes over the same cart yield the same suggestion order.
fn group_by_category<'a>(
    resolved: &[(&'a CartItem, &'a Product)],
) -> Vec<(String, Vec<(&'a CartItem, &'a Product)>)> {
    let mut groups: Vec<(String, Vec<(&CartItem, &Product)>)> = Vec::new();
    for &(item, product) in resolved {
        match groups.iter_mut().find(|(cat, _)| cat == &product.category) {
            Some((_, members)) => members.push((item, product)),
            None => groups.push((product.category.clone(), vec![(item, product)])),
        }
    }
    groups
}

fn merge_suggestions(
    resolved: &[(&CartItem, &Product)],
    catalog: &Catalog,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (category, group) in group_by_category(resolved) {
        if group.len() < 2 {
            continue;
        }

        let total_cost: f64 = group
            .iter()
            .map(|(item, product)| product.price * f64::from(item.quantity))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let avg_health: f64 = group
            .iter()
            .map(|(_, product)| product.health_score)
            .sum::<f64>()
            / group.len() as f64;
        let total_quantity: u32 = group.iter().map(|(item, _)| item.quantity).sum();

        let Some(best) = scoring::best_value(catalog.in_category(&category), ScoreWeights::MERGE)
        else {
            continue;
        };

        let potential_savings =
            (total_cost - best.price * f64::from(total_quantity)).max(0.0);

        suggestions.push(Suggestion::MergeSuggestion {
            id: Suggestion::fresh_id(),
            items: group.iter().map(|(item, _)| item.id.clone()).collect(),
            total_current_cost: total_cost,
            avg_health: round1(avg_health),
            potential_savings,
            health_delta: round1(best.health_score - avg_health),
            message: format!(
                "We found {} {category} items. Should we merge them into the best value option?",
                group.len()
            ),
            suggested_product: best.clone(),
            category,
            created_at: Utc::now(),
        });
    }

    suggestions
}

fn health_upgrades(resolved: &[(&CartItem, &Product)], catalog: &Catalog) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for &(item, product) in resolved {
        if product.health_score >= UPGRADE_CANDIDATE_BELOW {
            continue;
        }

        // Lowest product ID among qualifying alternatives, for determinism.
        let alternative = catalog
            .in_category(&product.category)
            .filter(|candidate| candidate.health_score > UPGRADE_ALTERNATIVE_ABOVE)
            .min_by(|a, b| a.id.cmp(&b.id));

        if let Some(better) = alternative {
            suggestions.push(Suggestion::HealthUpgrade {
                id: Suggestion::fresh_id(),
                item_id: item.id.clone(),
                message: format!(
                    "Swap {} for {} to lift your cart's health score",
                    product.name, better.name
                ),
                current_product: product.clone(),
                better_option: better.clone(),
                created_at: Utc::now(),
            });
        }
    }

    suggestions
}

fn missing_essentials(resolved: &[(&CartItem, &Product)]) -> Option<Suggestion> {
    let missing: Vec<String> = ESSENTIAL_CATEGORIES
        .iter()
        .filter(|&&essential| {
            !resolved
                .iter()
                .any(|(_, product)| product.category == essential)
        })
        .map(|&essential| essential.to_owned())
        .collect();

    if missing.is_empty() {
        return None;
    }

    Some(Suggestion::SwarmSuggestion {
        id: Suggestion::fresh_id(),
        message: format!("Your cart is missing essentials: {}", missing.join(", ")),
        missing_categories: missing,
        created_at: Utc::now(),
    })
}

/// Cart health over the resolvable items.
#[must_use]
pub fn optimization_score(items: &[CartItem], catalog: &Catalog) -> u8 {
    let healths: Vec<f64> = items
        .iter()
        .filter_map(|item| catalog.get(&item.product_id))
        .map(|product| product.health_score)
        .collect();
    scoring::optimization_score(&healths)
}
