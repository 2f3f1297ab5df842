//! Data Transfer Objects for the remote demo services
//!
//! Field names match the JSON produced by the services exactly, so these
//! types are used directly as request and response bodies.

pub mod chatbot;
pub mod research;
