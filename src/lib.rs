//! Unit Price Manager (UPM) Library
//!
//! Core functionality for comparing product prices per unit.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod pricing;
pub mod tools;
