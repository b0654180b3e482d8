//! Product model
//!
//! A product entered for comparison: what it costs, how much of it there is,
//! and the descriptive fields carried along unchanged.

use chrono::{SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;
use crate::pricing::{Priced, Quantity, Unit};

/// A product with its computed unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub store: Option<String>,
    pub price: f64,
    pub amount: f64,
    pub unit: Unit,
    pub category: Category,
    /// Price per base unit (kg, l, piece or pack)
    pub unit_price: f64,
    pub is_favorite: bool,
    pub added_at: String,
}

/// Data for building a new product
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub brand: String,
    pub store: Option<String>,
    pub quantity: Quantity,
    pub category: Category,
}

impl Product {
    /// Build a product with a fresh identity token and its unit price
    pub fn build(data: ProductCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            brand: data.brand,
            store: data.store,
            price: data.quantity.price,
            amount: data.quantity.amount,
            unit: data.quantity.unit,
            category: data.category,
            unit_price: data.quantity.unit_price(),
            is_favorite: false,
            added_at: timestamp_now(),
        }
    }

    /// Name to show when the brand is blank
    pub fn display_name(&self) -> &str {
        if self.brand.trim().is_empty() {
            &self.name
        } else {
            &self.brand
        }
    }

    /// Create a Product from a row of `favorites` or `history_products`.
    ///
    /// The query must also select an `is_favorite` column.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            brand: row.get("brand")?,
            store: row.get("store")?,
            price: row.get("price")?,
            amount: row.get("amount")?,
            unit: row.get("unit")?,
            category: row.get("category")?,
            unit_price: row.get("unit_price")?,
            is_favorite: row.get("is_favorite")?,
            added_at: row.get("added_at")?,
        })
    }
}

impl Priced for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn quantity(&self) -> Quantity {
        Quantity {
            price: self.price,
            amount: self.amount,
            unit: self.unit,
        }
    }
}

/// Current UTC time as stored in the database
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ToSql for Unit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Unit {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Category::from_str(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown category '{}'", text).into()))
    }
}
