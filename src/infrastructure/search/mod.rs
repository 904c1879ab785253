//! Search provider infrastructure - Provider implementations

mod catalog;
mod factory;
mod http;

pub use catalog::CatalogSearchProvider;
pub use factory::{ProviderConfig, ProviderFactory, ProviderKind};
pub use http::{HttpSearchConfig, HttpSearchProvider};
