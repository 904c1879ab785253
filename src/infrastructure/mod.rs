//! Infrastructure layer - Cache, debounce, provider and service implementations

pub mod cache;
pub mod debounce;
pub mod logging;
pub mod observability;
pub mod search;
pub mod services;
