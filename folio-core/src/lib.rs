//! Folio Core
//!
//! Core types shared by the Folio demo clients and the session poller.
//!
//! This crate contains:
//! - Domain types: the locally mirrored research session and its statuses
//! - DTOs: wire shapes of the research agent and chatbot HTTP APIs

pub mod domain;
pub mod dto;
