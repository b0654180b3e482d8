//! Unit price comparison
//!
//! Normalizes prices to a per-base-unit figure, ranks competing products
//! and computes how much the cheapest one saves.

use serde::{Deserialize, Serialize};

use super::error::PricingError;
use super::units::Unit;

/// Minimum number of products a comparison needs
pub const MIN_CANDIDATES: usize = 2;

/// Price of a product for a given amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub price: f64,
    pub amount: f64,
    pub unit: Unit,
}

impl Quantity {
    /// Build a quantity, rejecting non-finite or non-positive inputs
    pub fn new(price: f64, amount: f64, unit: Unit) -> Result<Self, PricingError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(PricingError::InvalidPrice(price));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PricingError::InvalidAmount(amount));
        }
        Ok(Self { price, amount, unit })
    }

    /// Price per one base unit of this quantity
    pub fn unit_price(&self) -> f64 {
        normalize(self.price, self.amount, self.unit)
    }
}

/// Anything that can take part in a ranking
pub trait Priced {
    /// Identity token, unique within one comparison
    fn id(&self) -> &str;
    fn quantity(&self) -> Quantity;
}

/// A product entered for comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub quantity: Quantity,
}

impl Priced for Candidate {
    fn id(&self) -> &str {
        &self.id
    }

    fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// One position in a ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// Index of the candidate in the input slice
    pub input_index: usize,
    pub id: String,
    pub unit_price: f64,
}

/// Outcome of ranking a set of candidates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    /// Candidates by ascending unit price; ties keep input order
    pub ordered: Vec<RankedEntry>,
    pub winner_id: String,
    pub best_unit_price: f64,
    pub worst_unit_price: f64,
    /// Winner's unit price subtracted from the most expensive one
    pub savings_amount: f64,
    /// `savings_amount` as a percentage of the most expensive unit price
    pub savings_percent: f64,
}

impl RankedResult {
    pub fn winner(&self) -> &RankedEntry {
        &self.ordered[0]
    }

    pub fn is_winner(&self, id: &str) -> bool {
        self.winner_id == id
    }
}

/// Convert a price for `amount` of `unit` into a price per base unit.
///
/// A zero amount yields 0 rather than an infinite price.
pub fn normalize(price: f64, amount: f64, unit: Unit) -> f64 {
    let base_amount = amount * unit.base_multiplier();
    if base_amount == 0.0 {
        return 0.0;
    }
    price / base_amount
}

/// Rank candidates by unit price and work out the display savings.
///
/// Callers are expected to filter out rows without a positive price and
/// amount first; fewer than two candidates is reported as an error.
pub fn rank<T: Priced>(candidates: &[T]) -> Result<RankedResult, PricingError> {
    if candidates.len() < MIN_CANDIDATES {
        return Err(PricingError::InsufficientCandidates {
            valid: candidates.len(),
        });
    }

    let mut ordered: Vec<RankedEntry> = candidates
        .iter()
        .enumerate()
        .map(|(input_index, candidate)| RankedEntry {
            input_index,
            id: candidate.id().to_string(),
            unit_price: candidate.quantity().unit_price(),
        })
        .collect();

    // sort_by is stable, so equal unit prices stay in input order
    ordered.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price));

    let best = ordered[0].unit_price;
    let worst = ordered
        .iter()
        .map(|e| e.unit_price)
        .fold(f64::NEG_INFINITY, f64::max);
    let diff = worst - best;
    let percent = if worst > 0.0 { diff / worst * 100.0 } else { 0.0 };

    Ok(RankedResult {
        winner_id: ordered[0].id.clone(),
        ordered,
        best_unit_price: best,
        worst_unit_price: worst,
        savings_amount: diff,
        savings_percent: percent,
    })
}

/// Savings credited to the lifetime total for one saved comparison:
/// the average unit price of the other products minus the winner's,
/// never below zero.
pub fn aggregate_savings(winner_unit_price: f64, others_unit_prices: &[f64]) -> f64 {
    if others_unit_prices.is_empty() {
        return 0.0;
    }

    let average = others_unit_prices.iter().sum::<f64>() / others_unit_prices.len() as f64;
    let saved = average - winner_unit_price;

    if saved.is_finite() && saved > 0.0 {
        saved
    } else {
        0.0
    }
}

/// Round a money amount to whole cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
