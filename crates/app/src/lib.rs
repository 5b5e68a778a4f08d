//! # homewise-app
//!
//! Application layer: use-cases, **port definitions** (traits) and the
//! suggestion scheduler.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository`, `DeviceRepository`, `ActivityLogRepository`: persistence
//!   - `EventPublisher`: fan-out of device events
//!   - `DeviceSnapshotSource`: read-only device snapshot for one user
//!   - `SuggestionSink`: where suggestions and banner signals go
//! - Define **driving/inbound ports** as use-case structs:
//!   - `UserService`, `DeviceService`, `AdminService`
//!   - `SuggestionHub`: one suggestion scheduler per user session
//! - Provide **in-process infrastructure** (event bus, broadcast sink) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `homewise-domain` only (plus `tokio` for channels, tasks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
pub mod suggestion;

#[cfg(test)]
pub(crate) mod testing;
