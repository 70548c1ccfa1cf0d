//! # switchroom-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **REST-ish JSON API** under `/api/switchrooms`
//! - Decode create/update bodies from JSON, `multipart/form-data` or
//!   urlencoded forms into one typed form, including photo files
//! - Map application results and errors into HTTP responses
//! - Serve stored photo files under the media URL prefix
//!
//! ## Dependency rule
//! Depends on `switchroom-app` (for port traits and services) and
//! `switchroom-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
