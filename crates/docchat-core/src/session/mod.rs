//! Session domain module.
//!
//! Owns the authenticated-or-not state of the client and its lifecycle
//! across process restarts.
//!
//! - `model`: session state machine types (`SessionPhase`, `SessionState`)
//! - `manager`: session lifecycle management (`SessionManager`)

mod manager;
mod model;

pub use manager::SessionManager;
pub use model::{SessionPhase, SessionState};
