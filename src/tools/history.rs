//! History MCP Tools
//!
//! Saving comparisons, browsing them later and the lifetime savings total
//! that every save feeds.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{Category, CategoryFilter, HistoryEntry, HistoryEntryCreate, Product, Profile};
use crate::pricing::{aggregate_savings, PricingError, MIN_CANDIDATES};

use super::ToolError;

/// Response for save_comparison
#[derive(Debug, Serialize)]
pub struct SaveComparisonResponse {
    pub id: String,
    pub date: String,
    pub winner_id: String,
    /// Added to the lifetime total by this save
    pub saved_amount: f64,
    pub total_saved: f64,
}

/// One product line of a history entry
#[derive(Debug, Serialize)]
pub struct HistoryProductLine {
    pub id: String,
    pub display_name: String,
    pub unit_price: f64,
    pub price_label: String,
    pub is_winner: bool,
}

/// History entry as shown in a list
#[derive(Debug, Serialize)]
pub struct HistorySummary {
    pub id: String,
    pub date: String,
    pub date_label: String,
    pub category: Category,
    pub category_label: &'static str,
    pub category_emoji: &'static str,
    pub winner_id: String,
    pub winner_name: Option<String>,
    /// Winner vs the most expensive other product
    pub savings: f64,
    pub products: Vec<HistoryProductLine>,
}

/// Response for list_history
#[derive(Debug, Serialize)]
pub struct ListHistoryResponse {
    pub entries: Vec<HistorySummary>,
    pub count: usize,
    pub total: i64,
}

/// Response for delete_history_entry
#[derive(Debug, Serialize)]
pub struct DeleteHistoryEntryResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// Savings shown next to a saved entry: the most expensive non-winner
/// minus the winner, or 0 when there is nothing to beat.
pub fn entry_savings(entry: &HistoryEntry) -> f64 {
    let worst = entry
        .others()
        .map(|p| p.unit_price)
        .fold(0.0_f64, f64::max);
    if worst > 0.0 {
        worst - entry.winner().map(|w| w.unit_price).unwrap_or(0.0)
    } else {
        0.0
    }
}

/// "today", "yesterday" or the calendar date
pub fn relative_date_label(date: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(date) else {
        return date.to_string();
    };
    let parsed = parsed.with_timezone(&Utc);

    match (now - parsed).num_days() {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        _ => parsed.format("%Y-%m-%d").to_string(),
    }
}

fn summarize(entry: HistoryEntry, currency: &str, now: DateTime<Utc>) -> HistorySummary {
    let savings = entry_savings(&entry);
    let winner_name = entry.winner().map(|w| w.display_name().to_string());
    let products = entry
        .products
        .iter()
        .map(|p| HistoryProductLine {
            id: p.id.clone(),
            display_name: p.display_name().to_string(),
            unit_price: p.unit_price,
            price_label: p.unit.price_label(currency),
            is_winner: p.id == entry.winner_id,
        })
        .collect();

    HistorySummary {
        date_label: relative_date_label(&entry.date, now),
        category_label: entry.category.label(),
        category_emoji: entry.category.emoji(),
        id: entry.id,
        date: entry.date,
        category: entry.category,
        winner_id: entry.winner_id,
        winner_name,
        savings,
        products,
    }
}

/// Save a finished comparison and credit its savings to the lifetime total
pub fn save_comparison(
    db: &Database,
    products: Vec<Product>,
    winner_id: &str,
    category: Category,
) -> Result<SaveComparisonResponse, ToolError> {
    if products.len() < MIN_CANDIDATES {
        return Err(PricingError::InsufficientCandidates {
            valid: products.len(),
        }
        .into());
    }

    let Some(winner) = products.iter().find(|p| p.id == winner_id) else {
        return Err(PricingError::UnknownWinner(winner_id.to_string()).into());
    };

    let others: Vec<f64> = products
        .iter()
        .filter(|p| p.id != winner_id)
        .map(|p| p.unit_price)
        .collect();
    let saved_amount = aggregate_savings(winner.unit_price, &others);

    let data = HistoryEntryCreate {
        category,
        winner_id: winner_id.to_string(),
        products,
    };

    let (entry, total_saved) = db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        let entry = HistoryEntry::create(&tx, &data)?;
        let total_saved = Profile::add_savings(&tx, saved_amount)?;
        tx.commit()?;
        Ok((entry, total_saved))
    })?;

    info!(
        "Saved comparison {} ({} products), +{:.2} lifetime savings",
        entry.id,
        entry.products.len(),
        saved_amount
    );

    Ok(SaveComparisonResponse {
        id: entry.id,
        date: entry.date,
        winner_id: entry.winner_id,
        saved_amount,
        total_saved,
    })
}

/// List saved comparisons, newest first
pub fn list_history(
    db: &Database,
    filter: CategoryFilter,
    limit: i64,
    currency: &str,
) -> Result<ListHistoryResponse, ToolError> {
    let limit = limit.clamp(1, 200);
    let conn = db.get_conn()?;

    let entries = HistoryEntry::list(&conn, filter.category(), limit)?;
    let total = HistoryEntry::count(&conn)?;

    let now = Utc::now();
    let entries: Vec<HistorySummary> = entries
        .into_iter()
        .map(|e| summarize(e, currency, now))
        .collect();

    Ok(ListHistoryResponse {
        count: entries.len(),
        entries,
        total,
    })
}

/// Get one saved comparison with its full products
pub fn get_history_entry(db: &Database, id: &str) -> Result<Option<HistoryEntry>, ToolError> {
    let conn = db.get_conn()?;
    Ok(HistoryEntry::get_by_id(&conn, id)?)
}

/// Delete a saved comparison. The lifetime total is left as is.
pub fn delete_history_entry(db: &Database, id: &str) -> Result<DeleteHistoryEntryResponse, ToolError> {
    let conn = db.get_conn()?;

    if !HistoryEntry::delete(&conn, id)? {
        return Err(ToolError::NotFound {
            what: "History entry",
            id: id.to_string(),
        });
    }

    info!("Deleted history entry {}", id);

    Ok(DeleteHistoryEntryResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::ProductCreate;
    use crate::pricing::{Quantity, Unit};

    fn product(price: f64, amount: f64, unit: Unit) -> Product {
        Product::build(ProductCreate {
            name: "Молоко 2.5%".to_string(),
            brand: String::new(),
            store: None,
            quantity: Quantity { price, amount, unit },
            category: Category::Dairy,
        })
    }

    fn dairy_pair() -> (Vec<Product>, String) {
        // 95/l vs 79/0.9l = 87.78/l
        let products = vec![product(95.0, 1.0, Unit::L), product(79.0, 0.9, Unit::L)];
        let winner = products[1].id.clone();
        (products, winner)
    }

    #[test]
    fn test_save_credits_average_of_others() {
        let db = Database::in_memory().unwrap();
        let (products, winner) = dairy_pair();

        let saved = save_comparison(&db, products, &winner, Category::Dairy).unwrap();
        assert!((saved.saved_amount - 7.2222).abs() < 1e-3);
        assert_eq!(saved.total_saved, 7.22);

        let (products, winner) = dairy_pair();
        let saved = save_comparison(&db, products, &winner, Category::Dairy).unwrap();
        assert_eq!(saved.total_saved, 14.44);
    }

    #[test]
    fn test_save_with_losing_winner_adds_nothing() {
        let db = Database::in_memory().unwrap();
        let (products, _) = dairy_pair();
        let expensive = products[0].id.clone();

        let saved = save_comparison(&db, products, &expensive, Category::Dairy).unwrap();
        assert_eq!(saved.saved_amount, 0.0);
        assert_eq!(saved.total_saved, 0.0);
    }

    #[test]
    fn test_save_rejects_unknown_winner_and_single_product() {
        let db = Database::in_memory().unwrap();
        let (products, _) = dairy_pair();

        let err = save_comparison(&db, products, "nobody", Category::Dairy).unwrap_err();
        assert!(matches!(err, ToolError::Pricing(PricingError::UnknownWinner(_))));

        let single = vec![product(1.0, 1.0, Unit::Kg)];
        let id = single[0].id.clone();
        assert!(save_comparison(&db, single, &id, Category::Other).is_err());

        let listed = list_history(&db, CategoryFilter::All, 50, "₽").unwrap();
        assert_eq!(listed.total, 0);
    }

    #[test]
    fn test_list_history_summaries() {
        let db = Database::in_memory().unwrap();
        let (products, winner) = dairy_pair();
        save_comparison(&db, products, &winner, Category::Dairy).unwrap();

        let sugar = vec![product(50.0, 1.0, Unit::Kg), product(50.0, 900.0, Unit::G)];
        let sugar_winner = sugar[0].id.clone();
        save_comparison(&db, sugar, &sugar_winner, Category::Sugar).unwrap();

        let all = list_history(&db, CategoryFilter::All, 50, "₽").unwrap();
        assert_eq!(all.count, 2);
        assert_eq!(all.entries[0].category, Category::Sugar);
        assert_eq!(all.entries[0].date_label, "today");
        assert!((all.entries[0].savings - 5.5556).abs() < 1e-3);
        assert_eq!(all.entries[0].products[1].price_label, "₽/kg");
        assert!(all.entries[0].products[0].is_winner);

        let dairy = list_history(&db, CategoryFilter::Only(Category::Dairy), 50, "₽").unwrap();
        assert_eq!(dairy.count, 1);
        assert_eq!(dairy.total, 2);
        assert!((dairy.entries[0].savings - 7.2222).abs() < 1e-3);
    }

    #[test]
    fn test_delete_history_keeps_total() {
        let db = Database::in_memory().unwrap();
        let (products, winner) = dairy_pair();
        let saved = save_comparison(&db, products, &winner, Category::Dairy).unwrap();

        assert!(get_history_entry(&db, &saved.id).unwrap().is_some());
        delete_history_entry(&db, &saved.id).unwrap();
        assert!(get_history_entry(&db, &saved.id).unwrap().is_none());

        let err = delete_history_entry(&db, &saved.id).unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));

        let conn = db.get_conn().unwrap();
        assert_eq!(Profile::total_saved(&conn).unwrap(), 7.22);
    }

    #[test]
    fn test_entry_savings_uses_worst_other() {
        let products = vec![
            product(100.0, 1.0, Unit::Kg),
            product(80.0, 1.0, Unit::Kg),
            product(120.0, 1.0, Unit::Kg),
        ];
        let entry = HistoryEntry {
            id: "h".to_string(),
            date: "2026-01-01T00:00:00.000Z".to_string(),
            category: Category::Meat,
            winner_id: products[1].id.clone(),
            products,
        };
        assert_eq!(entry_savings(&entry), 40.0);
    }

    #[test]
    fn test_relative_date_label() {
        let now = DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let fmt = |d: DateTime<Utc>| d.to_rfc3339();
        assert_eq!(relative_date_label(&fmt(now - Duration::hours(3)), now), "today");
        assert_eq!(relative_date_label(&fmt(now - Duration::hours(30)), now), "yesterday");
        assert_eq!(relative_date_label(&fmt(now - Duration::days(5)), now), "2026-03-05");
        assert_eq!(relative_date_label("not a date", now), "not a date");
    }
}
