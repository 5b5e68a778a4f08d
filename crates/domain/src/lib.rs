//! # homewise-domain
//!
//! Pure domain model for the homewise device-management system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Users** (owners of a device fleet)
//! - Define **Devices** (AC units, fans, lights, TVs, purifiers, …) grouped by room
//! - Define **Activity logs** and in-process **device events**
//! - Define the **recommendation rules**: activation tracking, room
//!   aggregation and the prioritised rule evaluator
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod activity_log;
pub mod device;
pub mod event;
pub mod recommendation;
pub mod stats;
pub mod user;
