//! Comparison Tools
//!
//! Turns raw form rows into products, ranks them and shapes the result for
//! display. Also rebuilds products handed back by a client for saving.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::models::{normalize_store, Category, Product, ProductCreate};
use crate::pricing::{rank, PricingError, Quantity, Unit, MIN_CANDIDATES};

use super::ToolError;

/// One product row as typed in by the user
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub store: Option<String>,
    pub price: Option<f64>,
    pub amount: Option<f64>,
    pub unit: String,
}

/// A previously built product sent back by the client
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub store: Option<String>,
    pub price: f64,
    pub amount: f64,
    pub unit: String,
    pub category: Option<String>,
    pub added_at: Option<String>,
}

/// A product's place in the ranking
#[derive(Debug, Serialize)]
pub struct RankedProduct {
    /// 1-based position, cheapest first
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub brand: String,
    pub store: Option<String>,
    pub unit_price: f64,
    pub price_label: String,
    /// Unit price relative to the most expensive product, 0-100
    pub bar_width_percent: f64,
    pub is_winner: bool,
    pub is_most_expensive: bool,
}

/// Response for compare_products
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub category: Category,
    /// Products in the order they were entered
    pub products: Vec<Product>,
    pub ranking: Vec<RankedProduct>,
    pub winner_id: String,
    /// Winner vs most expensive, per base unit
    pub savings_amount: f64,
    pub savings_percent: f64,
    /// 1-based form rows left out for lacking a positive price or amount
    pub skipped_rows: Vec<usize>,
}

/// Parse a category name, defaulting to `other` when none is given
pub fn parse_category(category: Option<&str>) -> Result<Category, ToolError> {
    match category.map(str::trim) {
        None | Some("") => Ok(Category::default()),
        Some(name) => {
            Category::from_str(name).ok_or_else(|| ToolError::InvalidCategory(name.to_string()))
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Compare the submitted rows.
///
/// Rows without a positive price and amount are skipped, like blank form
/// rows; at least two must remain.
pub fn compare_products(
    settings: &Settings,
    rows: Vec<ProductInput>,
    category: Category,
) -> Result<CompareResponse, ToolError> {
    if rows.len() > settings.max_candidates {
        return Err(PricingError::TooManyCandidates {
            max: settings.max_candidates,
        }
        .into());
    }

    let mut products = Vec::with_capacity(rows.len());
    let mut skipped_rows = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let unit: Unit = row.unit.parse()?;

        let (price, amount) = match (positive(row.price), positive(row.amount)) {
            (Some(price), Some(amount)) => (price, amount),
            _ => {
                warn!(
                    "Skipping row {}: price {:?}, amount {:?}",
                    index + 1,
                    row.price,
                    row.amount
                );
                skipped_rows.push(index + 1);
                continue;
            }
        };

        let name = row
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Product {}", index + 1));

        products.push(Product::build(ProductCreate {
            name,
            brand: row.brand.map(|b| b.trim().to_string()).unwrap_or_default(),
            store: normalize_store(row.store.as_deref()),
            quantity: Quantity::new(price, amount, unit)?,
            category,
        }));
    }

    if products.len() < MIN_CANDIDATES {
        return Err(PricingError::InsufficientCandidates {
            valid: products.len(),
        }
        .into());
    }

    let ranked = rank(&products)?;
    let last = ranked.ordered.len() - 1;

    let ranking = ranked
        .ordered
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let product = &products[entry.input_index];
            let is_winner = ranked.is_winner(&entry.id);
            let bar_width_percent = if ranked.worst_unit_price > 0.0 {
                entry.unit_price / ranked.worst_unit_price * 100.0
            } else {
                100.0
            };

            RankedProduct {
                rank: position + 1,
                id: product.id.clone(),
                name: product.name.clone(),
                brand: product.brand.clone(),
                store: product.store.clone(),
                unit_price: entry.unit_price,
                price_label: product.unit.price_label(&settings.currency),
                bar_width_percent,
                is_winner,
                is_most_expensive: position == last && !is_winner,
            }
        })
        .collect();

    debug!(
        "Compared {} products, winner {} saves {:.2} ({:.1}%)",
        products.len(),
        ranked.winner_id,
        ranked.savings_amount,
        ranked.savings_percent
    );

    Ok(CompareResponse {
        category,
        winner_id: ranked.winner_id,
        savings_amount: ranked.savings_amount,
        savings_percent: ranked.savings_percent,
        products,
        ranking,
        skipped_rows,
    })
}

/// Rebuild a product sent back by a client.
///
/// The unit price is recomputed rather than trusted.
pub fn restore_product(record: ProductRecord, default_category: Category) -> Result<Product, ToolError> {
    let id = record.id.trim().to_string();
    if id.is_empty() {
        return Err(ToolError::EmptyId);
    }

    let unit: Unit = record.unit.parse()?;
    let quantity = Quantity::new(record.price, record.amount, unit)?;
    let category = match record.category.as_deref() {
        Some(name) => parse_category(Some(name))?,
        None => default_category,
    };

    let mut product = Product::build(ProductCreate {
        name: record.name.trim().to_string(),
        brand: record.brand.map(|b| b.trim().to_string()).unwrap_or_default(),
        store: normalize_store(record.store.as_deref()),
        quantity,
        category,
    });
    product.id = id;
    if let Some(added_at) = record.added_at.filter(|s| !s.trim().is_empty()) {
        product.added_at = added_at;
    }

    Ok(product)
}

/// Rebuild a whole comparison, rejecting repeated ids
pub fn restore_products(
    records: Vec<ProductRecord>,
    default_category: Category,
) -> Result<Vec<Product>, ToolError> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(|record| {
            let product = restore_product(record, default_category)?;
            if !seen.insert(product.id.clone()) {
                return Err(ToolError::DuplicateProduct(product.id));
            }
            Ok(product)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price: Option<f64>, amount: Option<f64>, unit: &str) -> ProductInput {
        ProductInput {
            price,
            amount,
            unit: unit.to_string(),
            ..Default::default()
        }
    }

    fn record(id: &str, price: f64, amount: f64, unit: &str) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            name: "Масло".to_string(),
            brand: None,
            store: None,
            price,
            amount,
            unit: unit.to_string(),
            category: None,
            added_at: None,
        }
    }

    #[test]
    fn test_compare_ranks_and_labels() {
        let settings = Settings::default();
        let result = compare_products(
            &settings,
            vec![
                row(Some(100.0), Some(1.0), "кг"),
                row(Some(60.0), Some(0.5), "kg"),
            ],
            Category::Sugar,
        )
        .unwrap();

        assert_eq!(result.winner_id, result.products[0].id);
        assert!((result.savings_amount - 20.0).abs() < 1e-9);
        assert!((result.savings_percent - 16.67).abs() < 0.01);

        assert_eq!(result.ranking[0].rank, 1);
        assert!(result.ranking[0].is_winner);
        assert!(result.ranking[1].is_most_expensive);
        assert_eq!(result.ranking[1].bar_width_percent, 100.0);
        assert!((result.ranking[0].bar_width_percent - 83.333).abs() < 0.001);
        assert_eq!(result.ranking[0].price_label, "₽/kg");
        assert_eq!(result.ranking[0].name, "Product 1");
        assert_eq!(result.products[0].category, Category::Sugar);
    }

    #[test]
    fn test_compare_mixed_volume_units() {
        let result = compare_products(
            &Settings::default(),
            vec![
                row(Some(89.0), Some(1.0), "л"),
                row(Some(50.0), Some(1000.0), "мл"),
            ],
            Category::Dairy,
        )
        .unwrap();

        assert_eq!(result.winner_id, result.products[1].id);
        assert_eq!(result.ranking[0].price_label, "₽/l");
    }

    #[test]
    fn test_compare_skips_blank_rows() {
        let result = compare_products(
            &Settings::default(),
            vec![
                row(Some(10.0), Some(1.0), "piece"),
                row(None, Some(1.0), "piece"),
                row(Some(0.0), Some(2.0), "piece"),
                row(Some(18.0), Some(2.0), "piece"),
            ],
            Category::Other,
        )
        .unwrap();

        assert_eq!(result.products.len(), 2);
        assert_eq!(result.skipped_rows, vec![2, 3]);
        assert_eq!(result.winner_id, result.products[1].id);
    }

    #[test]
    fn test_compare_requires_two_valid_rows() {
        let err = compare_products(
            &Settings::default(),
            vec![row(Some(10.0), Some(1.0), "kg"), row(Some(f64::NAN), Some(1.0), "kg")],
            Category::Other,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ToolError::Pricing(PricingError::InsufficientCandidates { valid: 1 })
        ));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_compare_rejects_too_many_rows() {
        let settings = Settings {
            max_candidates: 2,
            ..Settings::default()
        };
        let rows = vec![row(Some(1.0), Some(1.0), "kg"); 3];
        let err = compare_products(&settings, rows, Category::Other).unwrap_err();
        assert!(matches!(
            err,
            ToolError::Pricing(PricingError::TooManyCandidates { max: 2 })
        ));
    }

    #[test]
    fn test_compare_rejects_unknown_unit() {
        let err = compare_products(
            &Settings::default(),
            vec![row(Some(1.0), Some(1.0), "kg"), row(Some(1.0), Some(1.0), "bushel")],
            Category::Other,
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Pricing(PricingError::InvalidUnit(u)) if u == "bushel"));
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(None).unwrap(), Category::Other);
        assert_eq!(parse_category(Some("bread")).unwrap(), Category::Bread);
        assert!(matches!(
            parse_category(Some("all")),
            Err(ToolError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_restore_product_recomputes_unit_price() {
        let product = restore_product(record("p-1", 150.0, 500.0, "ml"), Category::Oil).unwrap();
        assert_eq!(product.id, "p-1");
        assert_eq!(product.unit_price, 300.0);
        assert_eq!(product.category, Category::Oil);
    }

    #[test]
    fn test_restore_product_validates() {
        assert!(restore_product(record("p", 0.0, 1.0, "kg"), Category::Other).is_err());
        assert!(restore_product(record("p", 1.0, 1.0, "bag"), Category::Other).is_err());
        assert!(restore_product(record("  ", 1.0, 1.0, "kg"), Category::Other).is_err());
    }

    #[test]
    fn test_restore_products_rejects_duplicates() {
        let err = restore_products(
            vec![record("same", 1.0, 1.0, "kg"), record("same", 2.0, 1.0, "kg")],
            Category::Other,
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::DuplicateProduct(id) if id == "same"));
    }
}
