//! Inventory analysis: totals, category rollup, low-stock report

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::InventoryItem;

/// Items below this quantity are reported as low stock
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Aggregated view of the inventory
#[derive(Debug, Clone, Serialize)]
pub struct InventorySummary {
    pub generated_at: DateTime<Utc>,
    pub total_products: usize,
    pub total_units: i64,
    pub low_stock_count: usize,
    pub low_stock_threshold: i64,
    pub by_category: Vec<CategorySummary>,
    pub low_stock_items: Vec<LowStockItem>,
    pub status_breakdown: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub product_count: usize,
    pub total_units: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub quantity: i64,
}

impl InventorySummary {
    pub fn from_items(items: &[InventoryItem], low_stock_threshold: i64) -> Self {
        let mut categories: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
        let mut status_breakdown: BTreeMap<String, usize> = BTreeMap::new();

        for item in items {
            let entry = categories.entry(item.category.as_str()).or_default();
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(item.quantity);

            *status_breakdown.entry(item.status.clone()).or_default() += 1;
        }

        let by_category = categories
            .into_iter()
            .map(|(category, (product_count, total_units))| CategorySummary {
                category: category.to_string(),
                product_count,
                total_units,
            })
            .collect();

        let low_stock_items: Vec<LowStockItem> = items
            .iter()
            .filter(|item| item.quantity < low_stock_threshold)
            .map(|item| LowStockItem {
                id: item.id,
                name: item.name.clone(),
                category: item.category.clone(),
                quantity: item.quantity,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            total_products: items.len(),
            total_units: items
                .iter()
                .fold(0i64, |sum, item| sum.saturating_add(item.quantity)),
            low_stock_count: low_stock_items.len(),
            low_stock_threshold,
            by_category,
            low_stock_items,
            status_breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::inventory::seed_items;

    #[test]
    fn summarizes_seed_data() {
        let summary = InventorySummary::from_items(&seed_items(), LOW_STOCK_THRESHOLD);

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_units, 50);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.low_stock_items[0].name, "Arduino Kit");

        let categories: Vec<&str> = summary
            .by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Electronics", "Hardware", "Software"]);
        assert_eq!(summary.status_breakdown.get("Available"), Some(&3));
    }

    #[test]
    fn groups_items_sharing_a_category() {
        let mut items = seed_items();
        items.push(InventoryItem {
            id: 4,
            name: "USB Cable".into(),
            quantity: 3,
            category: "Hardware".into(),
            status: "Unavailable".into(),
        });

        let summary = InventorySummary::from_items(&items, LOW_STOCK_THRESHOLD);
        let hardware = summary
            .by_category
            .iter()
            .find(|c| c.category == "Hardware")
            .unwrap();

        assert_eq!(hardware.product_count, 2);
        assert_eq!(hardware.total_units, 8);
        assert_eq!(summary.low_stock_count, 2);
        assert_eq!(summary.status_breakdown.get("Unavailable"), Some(&1));
    }

    #[test]
    fn empty_inventory() {
        let summary = InventorySummary::from_items(&[], LOW_STOCK_THRESHOLD);
        assert_eq!(summary.total_products, 0);
        assert_eq!(summary.total_units, 0);
        assert!(summary.by_category.is_empty());
        assert!(summary.status_breakdown.is_empty());
    }
}
