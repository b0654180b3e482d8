//! Profile MCP Tool
//!
//! Lifetime savings plus how much the user has stored.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Favorite, HistoryEntry, Profile};

use super::ToolError;

/// Response for get_profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub total_saved: f64,
    pub currency: String,
    pub history_count: i64,
    pub favorites_count: i64,
}

pub fn get_profile(db: &Database, currency: &str) -> Result<ProfileResponse, ToolError> {
    let conn = db.get_conn()?;

    Ok(ProfileResponse {
        total_saved: Profile::total_saved(&conn)?,
        currency: currency.to_string(),
        history_count: HistoryEntry::count(&conn)?,
        favorites_count: Favorite::count(&conn)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Product, ProductCreate};
    use crate::pricing::{Quantity, Unit};
    use crate::tools::{favorites, history};

    fn product(price: f64) -> Product {
        Product::build(ProductCreate {
            name: "Гречка".to_string(),
            brand: String::new(),
            store: None,
            quantity: Quantity {
                price,
                amount: 1.0,
                unit: Unit::Kg,
            },
            category: Category::Cereal,
        })
    }

    #[test]
    fn test_profile_counts_and_total() {
        let db = Database::in_memory().unwrap();

        let empty = get_profile(&db, "₽").unwrap();
        assert_eq!(empty.total_saved, 0.0);
        assert_eq!(empty.history_count, 0);
        assert_eq!(empty.favorites_count, 0);

        let products = vec![product(90.0), product(120.0), product(100.0)];
        let winner = products[0].clone();
        history::save_comparison(&db, products, &winner.id, Category::Cereal).unwrap();
        favorites::add_favorite(&db, winner).unwrap();

        let profile = get_profile(&db, "₽").unwrap();
        // average of others (120 + 100) / 2 = 110, minus 90
        assert_eq!(profile.total_saved, 20.0);
        assert_eq!(profile.history_count, 1);
        assert_eq!(profile.favorites_count, 1);
        assert_eq!(profile.currency, "₽");
    }
}
