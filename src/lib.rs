// Library interface for testing

// Declare all modules
pub mod analyzer;
pub mod config;
pub mod constants;
pub mod db;
pub mod models;
pub mod queries;
pub mod retry;
pub mod schema;
pub mod storage;
pub mod store;
pub mod worker;

/// Boxed error type shared across the crate
pub type DynError = Box<dyn std::error::Error + Send + Sync>;
