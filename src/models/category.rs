//! Product categories
//!
//! Cosmetic tags attached to a comparison. They never affect prices.

use serde::{Deserialize, Serialize};

/// Category a comparison is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sugar,
    Dairy,
    Meat,
    Oil,
    Cereal,
    Bread,
    Drinks,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Sugar,
        Category::Dairy,
        Category::Meat,
        Category::Oil,
        Category::Cereal,
        Category::Bread,
        Category::Drinks,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sugar => "sugar",
            Category::Dairy => "dairy",
            Category::Meat => "meat",
            Category::Oil => "oil",
            Category::Cereal => "cereal",
            Category::Bread => "bread",
            Category::Drinks => "drinks",
            Category::Other => "other",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Category::ALL.into_iter().find(|c| c.as_str() == lower)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Sugar => "Сахар",
            Category::Dairy => "Молочное",
            Category::Meat => "Мясо",
            Category::Oil => "Масло",
            Category::Cereal => "Крупы",
            Category::Bread => "Хлеб",
            Category::Drinks => "Напитки",
            Category::Other => "Прочее",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Sugar => "🍬",
            Category::Dairy => "🥛",
            Category::Meat => "🥩",
            Category::Oil => "🫙",
            Category::Cereal => "🌾",
            Category::Bread => "🍞",
            Category::Drinks => "🥤",
            Category::Other => "📦",
        }
    }
}

/// List filter: either every category or a single one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// "all" (or nothing) selects everything; otherwise a category name
    pub fn parse(s: Option<&str>) -> Option<Self> {
        match s.map(str::trim) {
            None | Some("") => Some(CategoryFilter::All),
            Some(v) if v.eq_ignore_ascii_case("all") => Some(CategoryFilter::All),
            Some(v) => Category::from_str(v).map(CategoryFilter::Only),
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(*c),
        }
    }
}
