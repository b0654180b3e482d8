//! Favorite model
//!
//! Products the user starred, keyed by the product's identity token.

use rusqlite::{params, Connection};

use super::{Category, Product};
use crate::db::DbResult;

pub struct Favorite;

impl Favorite {
    /// Star a product. Returns Ok(false) if it was already a favorite.
    pub fn add(conn: &Connection, product: &Product) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            INSERT INTO favorites (
                id, name, brand, store, price, amount, unit, category, unit_price, added_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO NOTHING
            "#,
            params![
                product.id,
                product.name,
                product.brand,
                product.store,
                product.price,
                product.amount,
                product.unit,
                product.category,
                product.unit_price,
                product.added_at,
            ],
        )?;
        Ok(rows > 0)
    }

    /// Get a favorite by product ID
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Product>> {
        let result = conn.query_row(
            "SELECT *, 1 AS is_favorite FROM favorites WHERE id = ?1",
            [id],
            Product::from_row,
        );
        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List favorites in the order they were starred
    pub fn list(conn: &Connection, category: Option<Category>) -> DbResult<Vec<Product>> {
        let items = if let Some(category) = category {
            let mut stmt = conn.prepare(
                "SELECT *, 1 AS is_favorite FROM favorites WHERE category = ?1 ORDER BY rowid ASC",
            )?;
            let rows = stmt
                .query_map([category], Product::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        } else {
            let mut stmt =
                conn.prepare("SELECT *, 1 AS is_favorite FROM favorites ORDER BY rowid ASC")?;
            let rows = stmt
                .query_map([], Product::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        Ok(items)
    }

    /// Count favorites
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Unstar a product.
    /// Returns Ok(true) if removed, Ok(false) if not found
    pub fn remove(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM favorites WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
