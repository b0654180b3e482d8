//! UPM Status Tool
//!
//! Provides runtime status information about the UPM service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};
use crate::models::{Favorite, HistoryEntry};

use super::ToolError;

/// Price comparison instructions for AI assistants
pub const PRICE_INSTRUCTIONS: &str = r#"
# UPM Price Comparison Instructions

This guide explains how to compare shelf prices using the Unit Price Manager (UPM) tools.

## Overview

Shelf prices are quoted for different package sizes. UPM converts every price to a
price per **base unit** so products can be compared fairly:

| Family | Units | Base unit |
|--------|-------|-----------|
| Weight | kg, g | kg |
| Volume | l, ml | l |
| Count  | piece | piece |
| Pack   | pack  | pack |

**Formula:** `unit_price = price / (amount × multiplier)`

### Example
- 900 g of sugar for 50 ₽ → 50 / (900 × 0.001) = **55.56 ₽/kg**
- 1 kg of sugar for 50 ₽ → **50.00 ₽/kg** (cheaper)

---

## Comparing Products

**Tool:** `compare_products`

1. Collect 2 to 5 products (the limit is configurable)
2. For each product send `price`, `amount`, `unit` and optionally `name`, `brand`, `store`
3. Units may be codes (`kg`, `g`, `l`, `ml`, `piece`, `pack`) or shelf labels (`кг`, `г`, `л`, `мл`, `шт`, `уп`)
4. Rows with a missing or non-positive price or amount are skipped and reported in `skipped_rows`

The response lists products cheapest first. The first one is the **winner**.
`savings_amount` is the winner's advantage over the most expensive product per base unit.

**Do not mix families.** Grams and liters are never converted into each other;
comparing them ranks raw numbers that mean nothing.

---

## Saving and History

**Tool:** `save_comparison`
- Pass the `products` exactly as `compare_products` returned them, plus `winner_id`
- The lifetime total grows by the winner's advantage over the **average** of the other products
- Picking a product that is not the cheapest adds nothing

**Tools:** `list_history`, `get_history_entry`, `delete_history_entry`
- History is newest first and can be filtered by category
- Deleting an entry does not reduce the lifetime total

---

## Favorites

**Tools:** `add_favorite`, `list_favorites`, `remove_favorite`
- Starring a product twice keeps one copy

---

## Important Notes

- All data lives in memory and is lost when the server stops
- Categories (`sugar`, `dairy`, `meat`, `oil`, `cereal`, `bread`, `drinks`, `other`) are labels only
- Use `unit_price` to check a single product without saving anything
"#;

/// Runtime status of the UPM service
#[derive(Debug, Clone, Serialize)]
pub struct UpmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Storage information
    pub storage: &'static str,
    pub schema_version: i32,
    pub schema_current: bool,
    pub history_count: i64,
    pub favorites_count: i64,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> Result<UpmStatus, ToolError> {
        let build_info = BuildInfo::current();

        let conn = db.get_conn()?;
        let schema_version = migrations::get_schema_version(&conn)?;
        let schema_current = !migrations::needs_migration(&conn)?;
        let history_count = HistoryEntry::count(&conn)?;
        let favorites_count = Favorite::count(&conn)?;

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        Ok(UpmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            storage: "in-memory",
            schema_version,
            schema_current,
            history_count,
            favorites_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        })
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
