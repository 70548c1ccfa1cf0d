//! # switchroom-app
//!
//! Application layer: use-cases, the transcoder, and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SwitchroomRepository`: CRUD for switchrooms, photo rows
//!   - `PhotoStorage`: persist and resolve photo binaries
//! - Provide the **transcoder**: inbound payload validation and the outbound
//!   JSON representation of switchrooms and photos
//! - Provide the **driving/inbound port** `SwitchroomService`, which fans
//!   uploaded photos out into photo records on creation
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `switchroom-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod transcoder;
