//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations and repository notifications.
//! - Keep presentation layers decoupled from storage details.

pub mod catalog_service;
