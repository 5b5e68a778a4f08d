//! Suggestion scheduling: runs the recommendation rules for every active
//! user session and reports the outcome to a [`SuggestionSink`](crate::ports::SuggestionSink).

mod hub;
mod scheduler;
mod sink;

pub use hub::{DEFAULT_SESSION_IDLE_TIMEOUT, SessionLease, SuggestionHub};
pub use scheduler::{
    DEFAULT_DISPLAY_DURATION, DEFAULT_EVALUATION_INTERVAL, EngineSettings, EngineState,
    SchedulerHandle, SuggestionState, spawn,
};
pub use sink::{BroadcastSuggestionSink, SuggestionUpdate, SuggestionUpdateKind};
