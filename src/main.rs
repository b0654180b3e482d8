//! Unit Price Manager (UPM)
//!
//! An MCP server for comparing product prices per unit.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use upm::build_info;
use upm::config::Settings;
use upm::db::{self, Database};
use upm::mcp::UpmService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("upm=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let settings = Settings::from_env();
    eprintln!(
        "Max products per comparison: {}, currency: {}",
        settings.max_candidates, settings.currency
    );

    // Everything lives in memory for the lifetime of the process
    eprintln!("Initializing in-memory store...");
    let database = Database::in_memory()?;

    database.with_conn(|conn| {
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    // Create the UPM service
    let service = UpmService::new(database, settings);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
