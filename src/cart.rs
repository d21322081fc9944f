//! # Cart
//!
//! Joins the sparse cart held by the store against the current catalog snapshot.
//!
//! ## Rules
//! - Output follows cart order, not catalog order
//! - Entries whose product is missing from the snapshot are dropped silently, the product was
//!   removed or renamed since the cart was fetched
//! - If the catalog repeats an id, the first item wins
//! - Nothing here mutates its inputs, so every function is safe to call from any thread
use std::collections::{HashMap, hash_map::Entry};

use serde::Serialize;

use crate::catalog::{CartEntry, CatalogItem};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LineItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl LineItem {
    pub fn cost(&self) -> f64 {
        f64::from(self.quantity) * self.item.unit_cost
    }
}

/// Prices every cart entry found in `catalog`.
///
/// An absent cart or catalog is just an empty slice, and either one being empty gives an empty
/// result.
pub fn materialize(cart: &[CartEntry], catalog: &[CatalogItem]) -> Vec<LineItem> {
    if cart.is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    let mut by_id: HashMap<&str, &CatalogItem> = HashMap::with_capacity(catalog.len());
    for item in catalog {
        if let Entry::Vacant(entry) = by_id.entry(item.id.as_str()) {
            entry.insert(item);
        }
    }

    cart.iter()
        .filter_map(|entry| {
            by_id.get(entry.product_id.as_str()).map(|item| LineItem {
                item: (*item).clone(),
                quantity: entry.quantity,
            })
        })
        .collect()
}

pub fn total_value(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::cost).sum()
}

pub fn is_in_cart(cart: &[CartEntry], product_id: &str) -> bool {
    cart.iter().any(|entry| entry.product_id == product_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Add,
    Remove,
}

/// Quantity to propose to the store for a product already in the cart.
///
/// Returns `None` when the product is not in the cart. A result of zero is still returned, the
/// store decides whether that deletes the line or is rejected.
pub fn adjusted_quantity(
    cart: &[CartEntry],
    product_id: &str,
    adjustment: Adjustment,
) -> Option<u32> {
    let current = cart.iter().find(|entry| entry.product_id == product_id)?.quantity;

    match adjustment {
        Adjustment::Add => current.checked_add(1),
        Adjustment::Remove => current.checked_sub(1),
    }
}

/// Read-only checkout view of a materialized cart.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub products: usize,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl OrderSummary {
    pub fn from_items(items: &[LineItem]) -> Self {
        let subtotal = total_value(items);
        let shipping = 0.0;

        Self {
            products: items.len(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cost: f64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("product {id}"),
            category: "Test".to_string(),
            unit_cost: cost,
            rating: 4,
            image_ref: format!("https://img/{id}.jpg"),
        }
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![product("A", 100.0), product("B", 50.0)]
    }

    #[test]
    fn test_basic() {
        let cart = vec![CartEntry::new("A", 2), CartEntry::new("C", 5)];

        let items = materialize(&cart, &catalog());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.id, "A");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].item.unit_cost, 100.0);
        assert_eq!(total_value(&items), 200.0);
    }

    #[test]
    fn test_empty_inputs() {
        let cart = vec![CartEntry::new("A", 1)];

        assert!(materialize(&[], &catalog()).is_empty());
        assert!(materialize(&cart, &[]).is_empty());
        assert_eq!(total_value(&materialize(&cart, &[])), 0.0);
        assert_eq!(total_value(&[]), 0.0);
    }

    #[test]
    fn test_keeps_cart_order() {
        let cart = vec![
            CartEntry::new("B", 1),
            CartEntry::new("missing", 3),
            CartEntry::new("A", 4),
        ];

        let items = materialize(&cart, &catalog());
        let ids: Vec<&str> = items.iter().map(|line| line.item.id.as_str()).collect();

        assert_eq!(ids, ["B", "A"]);
    }

    #[test]
    fn test_all_matched_keeps_length() {
        let cart = vec![CartEntry::new("A", 1), CartEntry::new("B", 3)];

        let items = materialize(&cart, &catalog());

        assert_eq!(items.len(), cart.len());
        assert_eq!(total_value(&items), 100.0 + 150.0);
    }

    #[test]
    fn test_duplicate_catalog_ids_first_wins() {
        let catalog = vec![product("A", 10.0), product("A", 99.0)];

        let items = materialize(&[CartEntry::new("A", 1)], &catalog);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.unit_cost, 10.0);
    }

    #[test]
    fn test_inputs_untouched() {
        let cart = vec![CartEntry::new("A", 2)];
        let catalog = catalog();

        let _ = materialize(&cart, &catalog);

        assert_eq!(cart, vec![CartEntry::new("A", 2)]);
        assert_eq!(catalog, self::catalog());
    }

    #[test]
    fn test_is_in_cart() {
        let cart = vec![CartEntry::new("P1", 1)];

        assert!(is_in_cart(&cart, "P1"));
        assert!(!is_in_cart(&cart, "p1"));
        assert!(!is_in_cart(&[], "P1"));
    }

    #[test]
    fn test_adjusted_quantity() {
        let cart = vec![CartEntry::new("A", 1), CartEntry::new("B", 3)];

        assert_eq!(adjusted_quantity(&cart, "B", Adjustment::Add), Some(4));
        assert_eq!(adjusted_quantity(&cart, "B", Adjustment::Remove), Some(2));
        assert_eq!(adjusted_quantity(&cart, "A", Adjustment::Remove), Some(0));
        assert_eq!(adjusted_quantity(&cart, "C", Adjustment::Add), None);
    }

    #[test]
    fn test_order_summary() {
        let cart = vec![CartEntry::new("A", 2), CartEntry::new("B", 1)];

        let summary = OrderSummary::from_items(&materialize(&cart, &catalog()));

        assert_eq!(summary.products, 2);
        assert_eq!(summary.subtotal, 250.0);
        assert_eq!(summary.shipping, 0.0);
        assert_eq!(summary.total, 250.0);
    }

    #[test]
    fn test_line_item_flattens_product() {
        let items = materialize(&[CartEntry::new("B", 3)], &catalog());

        let json = serde_json::to_value(&items[0]).unwrap();

        assert_eq!(json["_id"], "B");
        assert_eq!(json["cost"], 50.0);
        assert_eq!(json["qty"], 3);
    }
}
