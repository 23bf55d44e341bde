//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and enrichment calls into use-case level APIs.
//! - Keep the transport layer decoupled from storage details.

pub mod note_service;
