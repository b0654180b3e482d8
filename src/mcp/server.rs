//! UPM MCP Server Implementation
//!
//! Implements the MCP server with all UPM tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::db::Database;
use crate::models::{Category, CategoryFilter};
use crate::tools::catalog;
use crate::tools::compare::{self, ProductInput, ProductRecord};
use crate::tools::favorites;
use crate::tools::history;
use crate::tools::profile;
use crate::tools::status::StatusTracker;
use crate::tools::ToolError;

/// UPM MCP Service
#[derive(Clone)]
pub struct UpmService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    settings: Arc<Settings>,
    tool_router: ToolRouter<UpmService>,
}

impl UpmService {
    pub fn new(database: Database, settings: Settings) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new())),
            database,
            settings: Arc::new(settings),
            tool_router: Self::tool_router(),
        }
    }
}

/// Bad input becomes invalid_params, storage failures internal_error
fn tool_error(err: ToolError) -> McpError {
    if err.is_invalid_input() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn parse_filter(category: Option<&str>) -> Result<CategoryFilter, McpError> {
    CategoryFilter::parse(category).ok_or_else(|| {
        tool_error(ToolError::InvalidCategory(
            category.unwrap_or_default().to_string(),
        ))
    })
}

// ============================================================================
// Comparison Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductInputParams {
    /// Product name (defaults to "Product N")
    pub name: Option<String>,
    pub brand: Option<String>,
    pub store: Option<String>,
    /// Shelf price; rows without a positive price are skipped
    pub price: Option<f64>,
    /// Package amount in `unit`; rows without a positive amount are skipped
    pub amount: Option<f64>,
    /// kg, g, l, ml, piece, pack (or кг, г, л, мл, шт, уп)
    pub unit: String,
}

impl From<ProductInputParams> for ProductInput {
    fn from(p: ProductInputParams) -> Self {
        Self {
            name: p.name,
            brand: p.brand,
            store: p.store,
            price: p.price,
            amount: p.amount,
            unit: p.unit,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareProductsParams {
    /// Products to compare, as entered
    pub products: Vec<ProductInputParams>,
    /// sugar, dairy, meat, oil, cereal, bread, drinks or other (default)
    pub category: Option<String>,
}

/// A product as returned by compare_products
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductRecordParams {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub brand: Option<String>,
    pub store: Option<String>,
    pub price: f64,
    pub amount: f64,
    pub unit: String,
    pub category: Option<String>,
    pub added_at: Option<String>,
}

impl From<ProductRecordParams> for ProductRecord {
    fn from(p: ProductRecordParams) -> Self {
        Self {
            id: p.id,
            name: p.name,
            brand: p.brand,
            store: p.store,
            price: p.price,
            amount: p.amount,
            unit: p.unit,
            category: p.category,
            added_at: p.added_at,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveComparisonParams {
    /// Every product of the comparison
    pub products: Vec<ProductRecordParams>,
    /// ID of the product the user picked
    pub winner_id: String,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UnitPriceParams {
    pub price: f64,
    pub amount: f64,
    pub unit: String,
}

// ============================================================================
// History / Favorites Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListHistoryParams {
    /// Category name, or "all" (default)
    pub category: Option<String>,
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HistoryEntryIdParams {
    /// History entry ID
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFavoriteParams {
    pub product: ProductRecordParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFavoritesParams {
    /// Category name, or "all" (default)
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveFavoriteParams {
    /// Product ID
    pub id: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl UpmService {
    // --- Status ---

    #[tool(description = "Get the current status of the UPM service including build info, storage status, and process information")]
    async fn upm_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database).map_err(tool_error)?;
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for comparing prices. Call this when starting a comparison session or when unsure how to use the price tools.")]
    fn price_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PRICE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PRICE_INSTRUCTIONS)]))
    }

    // --- Catalog ---

    #[tool(description = "List supported units with their base unit and conversion multiplier")]
    fn list_units(&self) -> Result<CallToolResult, McpError> {
        json_result(&catalog::list_units(&self.settings.currency))
    }

    #[tool(description = "List product categories")]
    fn list_categories(&self) -> Result<CallToolResult, McpError> {
        json_result(&catalog::list_categories())
    }

    #[tool(description = "List well-known stores to suggest for the store field")]
    fn list_stores(&self) -> Result<CallToolResult, McpError> {
        json_result(&catalog::list_stores())
    }

    #[tool(description = "Compute the price per base unit (kg, l, piece or pack) of a single product")]
    fn unit_price(&self, Parameters(p): Parameters<UnitPriceParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::unit_price(p.price, p.amount, &p.unit, &self.settings.currency)
            .map_err(tool_error)?;
        json_result(&result)
    }

    // --- Comparison ---

    #[tool(description = "Compare 2-5 products by price per base unit. Returns products cheapest first, the winner and how much it saves versus the most expensive.")]
    fn compare_products(&self, Parameters(p): Parameters<CompareProductsParams>) -> Result<CallToolResult, McpError> {
        let category = compare::parse_category(p.category.as_deref()).map_err(tool_error)?;
        let rows = p.products.into_iter().map(ProductInput::from).collect();
        let result = compare::compare_products(&self.settings, rows, category).map_err(tool_error)?;
        json_result(&result)
    }

    // --- History ---

    #[tool(description = "Save a comparison to history and add the winner's savings versus the average of the others to the lifetime total")]
    fn save_comparison(&self, Parameters(p): Parameters<SaveComparisonParams>) -> Result<CallToolResult, McpError> {
        let category = compare::parse_category(p.category.as_deref()).map_err(tool_error)?;
        let records = p.products.into_iter().map(ProductRecord::from).collect();
        let products = compare::restore_products(records, category).map_err(tool_error)?;
        let result = history::save_comparison(&self.database, products, &p.winner_id, category)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List saved comparisons, newest first, optionally filtered by category")]
    fn list_history(&self, Parameters(p): Parameters<ListHistoryParams>) -> Result<CallToolResult, McpError> {
        let filter = parse_filter(p.category.as_deref())?;
        let result = history::list_history(&self.database, filter, p.limit, &self.settings.currency)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a saved comparison with all of its products")]
    fn get_history_entry(&self, Parameters(p): Parameters<HistoryEntryIdParams>) -> Result<CallToolResult, McpError> {
        match history::get_history_entry(&self.database, &p.id).map_err(tool_error)? {
            Some(entry) => json_result(&entry),
            None => json_result(&serde_json::json!({"error": "History entry not found", "id": p.id})),
        }
    }

    #[tool(description = "Delete a saved comparison. The lifetime savings total is not reduced.")]
    fn delete_history_entry(&self, Parameters(p): Parameters<HistoryEntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = history::delete_history_entry(&self.database, &p.id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Favorites ---

    #[tool(description = "Star a product returned by compare_products. Starring it again does nothing.")]
    fn add_favorite(&self, Parameters(p): Parameters<AddFavoriteParams>) -> Result<CallToolResult, McpError> {
        let product = compare::restore_product(p.product.into(), Category::default()).map_err(tool_error)?;
        let result = favorites::add_favorite(&self.database, product).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List starred products, optionally filtered by category")]
    fn list_favorites(&self, Parameters(p): Parameters<ListFavoritesParams>) -> Result<CallToolResult, McpError> {
        let filter = parse_filter(p.category.as_deref())?;
        let result = favorites::list_favorites(&self.database, filter, &self.settings.currency)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Unstar a product")]
    fn remove_favorite(&self, Parameters(p): Parameters<RemoveFavoriteParams>) -> Result<CallToolResult, McpError> {
        let result = favorites::remove_favorite(&self.database, &p.id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Profile ---

    #[tool(description = "Get the lifetime savings total and how many comparisons and favorites are stored")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &self.settings.currency).map_err(tool_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for UpmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "upm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Unit Price Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Unit Price Manager (UPM) - Compare shelf prices per kg, liter, piece or pack. \
                 IMPORTANT: Call price_instructions before the first comparison. \
                 Reference: list_units, list_categories, list_stores, unit_price. \
                 Compare: compare_products, then save_comparison with the returned products and the chosen winner_id. \
                 History: list_history, get_history_entry, delete_history_entry. \
                 Favorites: add_favorite, list_favorites, remove_favorite. \
                 Profile: get_profile for lifetime savings. \
                 All data is kept in memory only."
                    .into(),
            ),
        }
    }
}
