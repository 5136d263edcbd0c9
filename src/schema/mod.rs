//! Schema Loader (C3, §4.3).

pub mod cleanup;
pub mod loader;

pub use cleanup::CleanupGuard;
pub use loader::load_schema;
