//! Profile model
//!
//! Single-row table holding the lifetime savings total.

use rusqlite::{params, Connection};

use crate::db::DbResult;
use crate::pricing::round_cents;

pub struct Profile;

impl Profile {
    /// Lifetime savings accumulated so far
    pub fn total_saved(conn: &Connection) -> DbResult<f64> {
        let total: f64 =
            conn.query_row("SELECT total_saved FROM profile WHERE id = 1", [], |row| {
                row.get(0)
            })?;
        Ok(total)
    }

    /// Add to the lifetime total, rounding the new total to cents.
    /// Returns the new total.
    pub fn add_savings(conn: &Connection, amount: f64) -> DbResult<f64> {
        let total = round_cents(Self::total_saved(conn)? + amount);
        conn.execute(
            "UPDATE profile SET total_saved = ?1, updated_at = datetime('now') WHERE id = 1",
            params![total],
        )?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_savings_rounds_total() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();

        assert_eq!(Profile::total_saved(&conn).unwrap(), 0.0);
        assert_eq!(Profile::add_savings(&conn, 5.6666).unwrap(), 5.67);
        assert_eq!(Profile::add_savings(&conn, 0.0).unwrap(), 5.67);
        assert_eq!(Profile::add_savings(&conn, 2.33).unwrap(), 8.0);
        assert_eq!(Profile::total_saved(&conn).unwrap(), 8.0);
    }
}
