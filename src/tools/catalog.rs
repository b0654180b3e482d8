//! Reference data and single-product unit pricing

use serde::Serialize;

use crate::models::{Category, KnownStore, KNOWN_STORES};
use crate::pricing::{round_cents, Quantity, Unit, UnitFamily};

use super::ToolError;

/// A unit the user can pick
#[derive(Debug, Serialize)]
pub struct UnitInfo {
    pub code: &'static str,
    pub shelf_label: &'static str,
    pub family: UnitFamily,
    pub base_unit: &'static str,
    /// Factor that converts an amount in this unit to the base unit
    pub base_multiplier: f64,
    pub price_label: String,
}

#[derive(Debug, Serialize)]
pub struct ListUnitsResponse {
    pub units: Vec<UnitInfo>,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Serialize)]
pub struct ListStoresResponse {
    pub stores: &'static [KnownStore],
}

/// Response for unit_price
#[derive(Debug, Serialize)]
pub struct UnitPriceResponse {
    pub price: f64,
    pub amount: f64,
    pub unit: Unit,
    pub unit_price: f64,
    /// Unit price rounded to kopecks for display
    pub unit_price_rounded: f64,
    pub price_label: String,
}

pub fn list_units(currency: &str) -> ListUnitsResponse {
    let units = Unit::ALL
        .iter()
        .map(|unit| UnitInfo {
            code: unit.code(),
            shelf_label: unit.shelf_label(),
            family: unit.family(),
            base_unit: unit.family().base_unit().code(),
            base_multiplier: unit.base_multiplier(),
            price_label: unit.price_label(currency),
        })
        .collect();

    ListUnitsResponse { units }
}

pub fn list_categories() -> ListCategoriesResponse {
    let categories = Category::ALL
        .iter()
        .map(|c| CategoryInfo {
            id: c.as_str(),
            label: c.label(),
            emoji: c.emoji(),
        })
        .collect();

    ListCategoriesResponse { categories }
}

pub fn list_stores() -> ListStoresResponse {
    ListStoresResponse {
        stores: KNOWN_STORES,
    }
}

/// Price of one base unit of a single product
pub fn unit_price(
    price: f64,
    amount: f64,
    unit: &str,
    currency: &str,
) -> Result<UnitPriceResponse, ToolError> {
    let unit: Unit = unit.parse()?;
    let quantity = Quantity::new(price, amount, unit)?;
    let value = quantity.unit_price();

    Ok(UnitPriceResponse {
        price,
        amount,
        unit,
        unit_price: value,
        unit_price_rounded: round_cents(value),
        price_label: unit.price_label(currency),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingError;

    #[test]
    fn test_list_units_covers_every_unit() {
        let units = list_units("₽").units;
        assert_eq!(units.len(), Unit::ALL.len());

        let grams = units.iter().find(|u| u.code == "g").unwrap();
        assert_eq!(grams.base_unit, "kg");
        assert_eq!(grams.base_multiplier, 0.001);
        assert_eq!(grams.price_label, "₽/kg");
    }

    #[test]
    fn test_list_categories_and_stores() {
        let categories = list_categories().categories;
        assert_eq!(categories.len(), 8);
        assert_eq!(categories.last().unwrap().id, "other");

        assert!(list_stores().stores.iter().any(|s| s.id == "lenta"));
    }

    #[test]
    fn test_unit_price() {
        let result = unit_price(45.0, 400.0, "г", "₽").unwrap();
        assert_eq!(result.unit, Unit::G);
        assert!((result.unit_price - 112.5).abs() < 1e-9);
        assert_eq!(result.unit_price_rounded, 112.5);
        assert_eq!(result.price_label, "₽/kg");

        let pack = unit_price(120.0, 3.0, "pack", "$").unwrap();
        assert_eq!(pack.unit_price, 40.0);
        assert_eq!(pack.price_label, "$/pack");
    }

    #[test]
    fn test_unit_price_rejects_bad_input() {
        assert!(matches!(
            unit_price(10.0, 0.0, "kg", "₽"),
            Err(ToolError::Pricing(PricingError::InvalidAmount(_)))
        ));
        assert!(matches!(
            unit_price(-1.0, 1.0, "kg", "₽"),
            Err(ToolError::Pricing(PricingError::InvalidPrice(_)))
        ));
        assert!(matches!(
            unit_price(1.0, 1.0, "ounce", "₽"),
            Err(ToolError::Pricing(PricingError::InvalidUnit(_)))
        ));
    }
}
