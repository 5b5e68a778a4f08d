//! # homewise-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a JSON API for users, devices, the admin overview and the
//!   suggestion engine settings (`/api/users`, `/api/devices`, `/api/admin/…`)
//! - Stream a user's suggestion updates as Server-Sent Events
//! - Map application errors onto HTTP status codes
//!
//! ## Dependency rule
//! Depends on `homewise-app` (for port traits and services) and
//! `homewise-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
