//! History model
//!
//! A saved comparison: the products as they were entered and which one won.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::timestamp_now;
use super::{Category, Product};
use crate::db::{DbError, DbResult};

/// A saved comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    pub category: Category,
    pub winner_id: String,
    /// Products in the order they were entered
    pub products: Vec<Product>,
}

/// Data for saving a comparison
#[derive(Debug, Clone)]
pub struct HistoryEntryCreate {
    pub category: Category,
    pub winner_id: String,
    pub products: Vec<Product>,
}

/// Entry header without its products
struct EntryHeader {
    id: String,
    date: String,
    category: Category,
    winner_id: String,
}

impl EntryHeader {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            category: row.get("category")?,
            winner_id: row.get("winner_id")?,
        })
    }
}

const PRODUCTS_SQL: &str = r#"
    SELECT hp.*,
           EXISTS(SELECT 1 FROM favorites f WHERE f.id = hp.id) AS is_favorite
    FROM history_products hp
    WHERE hp.entry_id = ?1
    ORDER BY hp.position ASC
"#;

impl HistoryEntry {
    /// The winning product, if it is still part of the entry
    pub fn winner(&self) -> Option<&Product> {
        self.products.iter().find(|p| p.id == self.winner_id)
    }

    /// Every product except the winner
    pub fn others(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.id != self.winner_id)
    }

    fn load(conn: &Connection, header: EntryHeader) -> DbResult<Self> {
        let mut stmt = conn.prepare_cached(PRODUCTS_SQL)?;
        let products = stmt
            .query_map([&header.id], Product::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: header.id,
            date: header.date,
            category: header.category,
            winner_id: header.winner_id,
            products,
        })
    }

    /// Insert an entry and its products.
    ///
    /// Run inside a transaction when other writes must land with it.
    pub fn create(conn: &Connection, data: &HistoryEntryCreate) -> DbResult<Self> {
        let id = Uuid::new_v4().to_string();
        let date = timestamp_now();

        conn.execute(
            "INSERT INTO history_entries (id, date, category, winner_id) VALUES (?1, ?2, ?3, ?4)",
            params![id, date, data.category, data.winner_id],
        )?;

        {
            let mut stmt = conn.prepare(
                r#"
                INSERT INTO history_products (
                    entry_id, position, id, name, brand, store,
                    price, amount, unit, category, unit_price, added_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )?;
            for (position, p) in data.products.iter().enumerate() {
                stmt.execute(params![
                    id,
                    position as i64,
                    p.id,
                    p.name,
                    p.brand,
                    p.store,
                    p.price,
                    p.amount,
                    p.unit,
                    p.category,
                    p.unit_price,
                    p.added_at,
                ])?;
            }
        }

        Self::get_by_id(conn, &id)?
            .ok_or_else(|| DbError::Corrupt(format!("history entry {} missing after insert", id)))
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let header = conn.query_row(
            "SELECT * FROM history_entries WHERE id = ?1",
            [id],
            EntryHeader::from_row,
        );

        match header {
            Ok(header) => Ok(Some(Self::load(conn, header)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List entries newest first, optionally restricted to one category
    pub fn list(conn: &Connection, category: Option<Category>, limit: i64) -> DbResult<Vec<Self>> {
        let headers = if let Some(category) = category {
            let mut stmt = conn.prepare(
                "SELECT * FROM history_entries WHERE category = ?1
                 ORDER BY date DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![category, limit], EntryHeader::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        } else {
            let mut stmt = conn.prepare(
                "SELECT * FROM history_entries ORDER BY date DESC, rowid DESC LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], EntryHeader::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        headers
            .into_iter()
            .map(|header| Self::load(conn, header))
            .collect()
    }

    /// Count saved entries
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM history_entries", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete an entry and its products.
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM history_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCreate;
    use crate::pricing::{Quantity, Unit};

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn product(name: &str, price: f64, amount: f64, unit: Unit) -> Product {
        Product::build(ProductCreate {
            name: name.to_string(),
            brand: String::new(),
            store: Some("Магнит".to_string()),
            quantity: Quantity { price, amount, unit },
            category: Category::Sugar,
        })
    }

    fn save(conn: &Connection, category: Category) -> HistoryEntry {
        let products = vec![
            product("Сахар", 50.0, 1.0, Unit::Kg),
            product("Сахар", 50.0, 0.9, Unit::Kg),
        ];
        let winner_id = products[0].id.clone();
        HistoryEntry::create(
            conn,
            &HistoryEntryCreate {
                category,
                winner_id,
                products,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_get_keeps_product_order() {
        let conn = open();
        let entry = save(&conn, Category::Sugar);

        let loaded = HistoryEntry::get_by_id(&conn, &entry.id).unwrap().unwrap();
        assert_eq!(loaded.products.len(), 2);
        assert_eq!(loaded.products[0].id, entry.winner_id);
        assert_eq!(loaded.products[1].amount, 0.9);
        assert_eq!(loaded.products[1].store.as_deref(), Some("Магнит"));
        assert_eq!(loaded.winner().map(|p| p.id.as_str()), Some(entry.winner_id.as_str()));
        assert_eq!(loaded.others().count(), 1);
    }

    #[test]
    fn test_list_newest_first_with_filter() {
        let conn = open();
        let first = save(&conn, Category::Sugar);
        let second = save(&conn, Category::Dairy);

        let all = HistoryEntry::list(&conn, None, 50).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let sugar = HistoryEntry::list(&conn, Some(Category::Sugar), 50).unwrap();
        assert_eq!(sugar.len(), 1);
        assert_eq!(sugar[0].id, first.id);

        assert_eq!(HistoryEntry::list(&conn, None, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_cascades_products() {
        let conn = open();
        let entry = save(&conn, Category::Other);

        assert!(HistoryEntry::delete(&conn, &entry.id).unwrap());
        assert!(!HistoryEntry::delete(&conn, &entry.id).unwrap());
        assert_eq!(HistoryEntry::count(&conn).unwrap(), 0);

        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM history_products", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }
}
