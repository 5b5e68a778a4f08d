//! Recommendation rules: turn a snapshot of one user's devices into at most
//! one actionable [`Suggestion`].
//!
//! The pieces are pure and deterministic:
//!
//! 1. [`ActivationTracker`] remembers since when each device has been on.
//! 2. [`RoomStatus`] groups the snapshot by room.
//! 3. [`evaluate`] walks the prioritised rules and returns the first match.
//!
//! Scheduling, timers and delivery live in the `app` crate.

mod activation;
mod rooms;
mod rules;
mod suggestion;

pub use activation::ActivationTracker;
pub use rooms::RoomStatus;
pub use rules::evaluate;
pub use suggestion::Suggestion;
