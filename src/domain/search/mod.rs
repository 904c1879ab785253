//! Search domain - results, filters and the provider abstraction

mod error;
mod filter;
mod provider;
mod result;

pub use error::SearchError;
pub use filter::FilterSet;
pub use provider::SearchProvider;
pub use result::{ResultItem, ResultKind, ResultSet};

#[cfg(test)]
pub use provider::mock::MockSearchProvider;
