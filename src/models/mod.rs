//! Data models
//!
//! Rust structs representing database entities.

mod category;
mod favorite;
mod history;
mod product;
mod profile;
mod store;

pub use category::{Category, CategoryFilter};
pub use favorite::Favorite;
pub use history::{HistoryEntry, HistoryEntryCreate};
pub use product::{Product, ProductCreate};
pub use profile::Profile;
pub use store::{normalize_store, KnownStore, KNOWN_STORES};
