//! Well-known stores offered as suggestions for a product's store field

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct KnownStore {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

pub const KNOWN_STORES: &[KnownStore] = &[
    KnownStore { id: "pyaterochka", label: "Пятёрочка", emoji: "5️⃣" },
    KnownStore { id: "magnit", label: "Магнит", emoji: "🧲" },
    KnownStore { id: "dixy", label: "Дикси", emoji: "🔵" },
    KnownStore { id: "perekrestok", label: "Перекрёсток", emoji: "✖️" },
    KnownStore { id: "vkusvill", label: "ВкусВилл", emoji: "🌿" },
    KnownStore { id: "lenta", label: "Лента", emoji: "🎀" },
    KnownStore { id: "auchan", label: "Ашан", emoji: "🛒" },
    KnownStore { id: "other", label: "Другой", emoji: "📍" },
];

/// Trim a free-form store name, treating blank input as "no store"
pub fn normalize_store(store: Option<&str>) -> Option<String> {
    store
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_store() {
        assert_eq!(normalize_store(None), None);
        assert_eq!(normalize_store(Some("   ")), None);
        assert_eq!(normalize_store(Some(" Лента ")), Some("Лента".to_string()));
    }

    #[test]
    fn test_known_store_ids_unique() {
        let mut ids: Vec<&str> = KNOWN_STORES.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), KNOWN_STORES.len());
    }
}
