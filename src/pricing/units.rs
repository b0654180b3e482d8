//! Unit types and conversion constants
//!
//! The fixed set of units a product price can be quoted in, and the factor
//! that takes each of them to its family's base unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Family a unit belongs to; prices are only comparable inside a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    /// Normalized per kilogram
    Weight,
    /// Normalized per liter
    Volume,
    /// Normalized per piece
    Count,
    /// Normalized per pack
    Pack,
}

impl UnitFamily {
    /// The unit every member of this family normalizes to
    pub fn base_unit(&self) -> Unit {
        match self {
            UnitFamily::Weight => Unit::Kg,
            UnitFamily::Volume => Unit::L,
            UnitFamily::Count => Unit::Piece,
            UnitFamily::Pack => Unit::Pack,
        }
    }
}

/// A unit a product amount can be entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    G,
    L,
    Ml,
    Piece,
    Pack,
}

// ============================================================================
// Conversion Constants (to base unit)
// ============================================================================

/// Kilograms per gram
pub const KG_PER_G: f64 = 0.001;
/// Liters per milliliter
pub const L_PER_ML: f64 = 0.001;

impl Unit {
    /// Every unit, in the order they are offered to the user
    pub const ALL: [Unit; 6] = [Unit::Kg, Unit::G, Unit::L, Unit::Ml, Unit::Piece, Unit::Pack];

    /// Multiplier taking an amount in this unit to the family's base unit
    pub fn base_multiplier(&self) -> f64 {
        match self {
            Unit::Kg | Unit::L | Unit::Piece | Unit::Pack => 1.0,
            Unit::G => KG_PER_G,
            Unit::Ml => L_PER_ML,
        }
    }

    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Kg | Unit::G => UnitFamily::Weight,
            Unit::L | Unit::Ml => UnitFamily::Volume,
            Unit::Piece => UnitFamily::Count,
            Unit::Pack => UnitFamily::Pack,
        }
    }

    /// Canonical short code, also the serde representation
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::L => "l",
            Unit::Ml => "ml",
            Unit::Piece => "piece",
            Unit::Pack => "pack",
        }
    }

    /// Cyrillic shelf-tag abbreviation
    pub fn shelf_label(&self) -> &'static str {
        match self {
            Unit::Kg => "кг",
            Unit::G => "г",
            Unit::L => "л",
            Unit::Ml => "мл",
            Unit::Piece => "шт",
            Unit::Pack => "уп",
        }
    }

    /// Label for a normalized price, e.g. "₽/kg" for both kg and g
    pub fn price_label(&self, currency: &str) -> String {
        format!("{}/{}", currency, self.family().base_unit().code())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Unit {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();

        match lower.as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" | "kilo" | "кг" => Ok(Unit::Kg),
            "g" | "gr" | "gram" | "grams" | "г" | "гр" => Ok(Unit::G),
            "l" | "liter" | "liters" | "litre" | "litres" | "л" => Ok(Unit::L),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" | "мл" => {
                Ok(Unit::Ml)
            }
            "piece" | "pieces" | "pc" | "pcs" | "each" | "item" | "items" | "шт" => {
                Ok(Unit::Piece)
            }
            "pack" | "packs" | "pk" | "package" | "уп" => Ok(Unit::Pack),
            _ => Err(PricingError::InvalidUnit(s.trim().to_string())),
        }
    }
}
