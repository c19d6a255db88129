//! Multi-tenant category management API.
//!
//! Companies own categories; categories form per-company trees through an
//! optional parent reference. See [`features::categories::validation`] for the
//! rules enforced on every create and update.

pub mod app;
pub mod core;
pub mod features;
pub mod shared;
