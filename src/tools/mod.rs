//! UPM Tools module
//!
//! MCP tool implementations for the Unit Price Manager.

pub mod catalog;
pub mod compare;
pub mod error;
pub mod favorites;
pub mod history;
pub mod profile;
pub mod status;

pub use error::ToolError;
