//! Debounce infrastructure - Coalescing of rapid input events

mod debouncer;

pub use debouncer::{DebounceConfig, Debouncer};
