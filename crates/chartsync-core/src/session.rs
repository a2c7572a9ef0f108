//! Session generation counter.
//!
//! Every subscription and in-flight request is tagged with the `SessionId`
//! current when it was created. A callback whose id no longer matches the
//! controller's current session is dropped, which closes the stale-response
//! window around symbol switches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing session generation counter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SessionId(u64);

impl SessionId {
    pub const ZERO: Self = Self(0);

    /// The next generation.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}
