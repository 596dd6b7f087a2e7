//! Cook session state
//!
//! A cook session is a cursor over a timeline, owned by the session store
//! and addressed by an opaque [`SessionId`]. Sessions live in memory only and
//! are evicted after sitting idle longer than the configured TTL.

pub mod manager;

pub use manager::{spawn_sweeper, CookSessionStore, InMemoryCookSessionStore};

use crate::cook::{CookRequest, TimelineStep};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a cook session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID
    pub fn new() -> Self {
        Self(format!("cook-{}", Uuid::new_v4()))
    }

    /// Create from an existing string
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one cook session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookSession {
    pub session_id: SessionId,
    pub timeline: Vec<TimelineStep>,
    /// Index of the step currently shown; never past the last step
    pub cursor: usize,
    pub prompt: String,
    pub location_key: String,
    pub personality: String,
}

impl CookSession {
    pub fn new(session_id: SessionId, timeline: Vec<TimelineStep>, request: CookRequest) -> Self {
        Self {
            session_id,
            timeline,
            cursor: 0,
            prompt: request.prompt,
            location_key: request.location_key,
            personality: request.personality,
        }
    }

    pub fn first_step(&self) -> Option<&TimelineStep> {
        self.timeline.first()
    }

    /// Move to the next step.
    ///
    /// At the last step (or on an empty timeline) the cursor stays put and
    /// `NoMoreSteps` is returned, however often this is called.
    pub fn advance(&mut self) -> Advance {
        let Some(last) = self.timeline.len().checked_sub(1) else {
            self.cursor = 0;
            return Advance::NoMoreSteps;
        };

        if self.cursor >= last {
            self.cursor = last;
            return Advance::NoMoreSteps;
        }

        self.cursor += 1;
        Advance::Step(self.timeline[self.cursor].clone())
    }
}

/// Result of stepping a session forward
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Step(TimelineStep),
    NoMoreSteps,
}

#[cfg(test)]
mod tests;
