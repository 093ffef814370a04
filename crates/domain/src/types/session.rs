//! Session handle derived from the external identity service
//!
//! The core never talks to the identity service directly; it only ever sees
//! this opaque owner identifier, passed explicitly to each call instead of
//! living in ambient global state.

use serde::{Deserialize, Serialize};

/// Authenticated session handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub owner_id: String,
}

impl Session {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self { owner_id: owner_id.into() }
    }
}
