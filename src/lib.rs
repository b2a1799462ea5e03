// Clippy allows for reasonable defaults
// These suppress warnings where the suggested change doesn't improve
// readability
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::collapsible_if)] // Separate ifs can be more readable
#![allow(clippy::redundant_closure)] // |x| f(x) can be clearer than f

// Module declarations
pub mod analytics;
pub mod config;
pub mod file_storage;
pub mod funnel;
pub mod models;
pub mod notify;
pub mod shutdown;

// Server module (HTTP API)
pub mod server;
