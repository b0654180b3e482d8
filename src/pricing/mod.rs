//! Price comparison module
//!
//! Pure unit-price normalization and ranking. Nothing in here touches the
//! database.

pub mod comparator;
pub mod error;
pub mod units;

pub use comparator::{
    aggregate_savings, normalize, rank, round_cents, Candidate, Priced, Quantity, RankedEntry,
    RankedResult, MIN_CANDIDATES,
};
pub use error::PricingError;
pub use units::{Unit, UnitFamily};
