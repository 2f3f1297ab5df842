//! Core domain types
//!
//! These types describe state that Folio owns locally, as opposed to the
//! wire shapes in [`crate::dto`] that belong to the remote services.

pub mod session;
