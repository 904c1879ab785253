//! Infrastructure services

mod search_dispatcher;
mod search_session;

pub use search_dispatcher::{
    DispatcherConfig, Generation, PendingSearch, Resolution, ResultSource, SearchDispatcher,
    SearchOutcome, SearchPhase,
};
pub use search_session::{SearchSession, SearchState};
