//! # switchroom-domain
//!
//! Pure domain model for the switchroom registry.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Switchrooms** (named facility entries with a spatial footprint)
//! - Define **Photos** (image records owned by exactly one switchroom)
//! - Contain all invariant enforcement (name rules, area type tags, timestamp
//!   monotonicity)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod photo;
pub mod switchroom;
