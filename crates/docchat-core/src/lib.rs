//! docchat-core: domain models and state stores for the docchat client.
//!
//! This crate holds everything that is independent of the transport and
//! the rendering layer:
//!
//! - domain models ([`user`], [`document`], [`chat`])
//! - the shared error taxonomy ([`error`])
//! - the pure state stores: session lifecycle ([`session`]), selection
//!   ([`selection`]), modal stack ([`modal`]) and notifications
//!   ([`notification`])
//! - the backend seam traits ([`api`])
//!
//! The registries combining these with a concrete backend live in
//! `docchat-application`.

pub mod api;
pub mod chat;
pub mod document;
pub mod error;
pub mod modal;
pub mod notification;
pub mod selection;
pub mod session;
pub mod user;

// Re-export the common error type.
pub use error::{DocchatError, Result};
