//! Cache infrastructure - Result cache implementations

mod in_memory;

pub use in_memory::InMemoryResultCache;
