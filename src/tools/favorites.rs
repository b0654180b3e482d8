//! Favorites MCP Tools

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{CategoryFilter, Favorite, Product};

use super::ToolError;

/// Response for add_favorite
#[derive(Debug, Serialize)]
pub struct AddFavoriteResponse {
    pub id: String,
    /// False when the product was already a favorite
    pub added: bool,
    pub favorites_count: i64,
}

/// Favorite as shown in a list
#[derive(Debug, Serialize)]
pub struct FavoriteSummary {
    #[serde(flatten)]
    pub product: Product,
    pub display_name: String,
    pub price_label: String,
}

/// Response for list_favorites
#[derive(Debug, Serialize)]
pub struct ListFavoritesResponse {
    pub items: Vec<FavoriteSummary>,
    pub count: usize,
}

/// Response for remove_favorite
#[derive(Debug, Serialize)]
pub struct RemoveFavoriteResponse {
    pub success: bool,
    pub removed_id: String,
}

/// Star a product; starring it again is a no-op
pub fn add_favorite(db: &Database, mut product: Product) -> Result<AddFavoriteResponse, ToolError> {
    product.is_favorite = true;

    let conn = db.get_conn()?;
    let added = Favorite::add(&conn, &product)?;
    let favorites_count = Favorite::count(&conn)?;

    if added {
        info!("Added favorite {} ({})", product.id, product.display_name());
    }

    Ok(AddFavoriteResponse {
        id: product.id,
        added,
        favorites_count,
    })
}

/// List favorites in the order they were starred
pub fn list_favorites(
    db: &Database,
    filter: CategoryFilter,
    currency: &str,
) -> Result<ListFavoritesResponse, ToolError> {
    let conn = db.get_conn()?;

    let items: Vec<FavoriteSummary> = Favorite::list(&conn, filter.category())?
        .into_iter()
        .map(|product| FavoriteSummary {
            display_name: product.display_name().to_string(),
            price_label: product.unit.price_label(currency),
            product,
        })
        .collect();

    Ok(ListFavoritesResponse {
        count: items.len(),
        items,
    })
}

/// Unstar a product
pub fn remove_favorite(db: &Database, id: &str) -> Result<RemoveFavoriteResponse, ToolError> {
    let conn = db.get_conn()?;

    if !Favorite::remove(&conn, id)? {
        return Err(ToolError::NotFound {
            what: "Favorite",
            id: id.to_string(),
        });
    }

    info!("Removed favorite {}", id);

    Ok(RemoveFavoriteResponse {
        success: true,
        removed_id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ProductCreate};
    use crate::pricing::{Quantity, Unit};

    fn sugar() -> Product {
        Product::build(ProductCreate {
            name: "Сахар белый".to_string(),
            brand: "Свекла".to_string(),
            store: Some("Лента".to_string()),
            quantity: Quantity {
                price: 50.0,
                amount: 1.0,
                unit: Unit::Kg,
            },
            category: Category::Sugar,
        })
    }

    #[test]
    fn test_add_twice_keeps_one() {
        let db = Database::in_memory().unwrap();
        let product = sugar();

        let first = add_favorite(&db, product.clone()).unwrap();
        assert!(first.added);
        assert_eq!(first.favorites_count, 1);

        let second = add_favorite(&db, product).unwrap();
        assert!(!second.added);
        assert_eq!(second.favorites_count, 1);
    }

    #[test]
    fn test_list_and_remove() {
        let db = Database::in_memory().unwrap();
        let product = sugar();
        add_favorite(&db, product.clone()).unwrap();

        let listed = list_favorites(&db, CategoryFilter::All, "₽").unwrap();
        assert_eq!(listed.count, 1);
        assert_eq!(listed.items[0].display_name, "Свекла");
        assert_eq!(listed.items[0].price_label, "₽/kg");
        assert!(listed.items[0].product.is_favorite);

        let dairy = list_favorites(&db, CategoryFilter::Only(Category::Dairy), "₽").unwrap();
        assert_eq!(dairy.count, 0);

        remove_favorite(&db, &product.id).unwrap();
        assert!(matches!(
            remove_favorite(&db, &product.id),
            Err(ToolError::NotFound { .. })
        ));
        assert_eq!(list_favorites(&db, CategoryFilter::All, "₽").unwrap().count, 0);
    }
}
