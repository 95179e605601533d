//! Per-player session cursor.

use crate::location::LocationId;
use serde::{Deserialize, Serialize};

/// Where the player is, how many turns they have taken, and whether they can
/// still act.
///
/// Only the engine moves the cursor. The turn count never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCursor {
    current_location: LocationId,
    turn_count: u64,
    alive: bool,
}

impl SessionCursor {
    pub fn new(start: LocationId) -> Self {
        Self {
            current_location: start,
            turn_count: 0,
            alive: true,
        }
    }

    pub fn current_location(&self) -> LocationId {
        self.current_location
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Count one accepted input. Returns the new turn count.
    pub(crate) fn advance_turn(&mut self) -> u64 {
        self.turn_count += 1;
        self.turn_count
    }

    pub(crate) fn move_to(&mut self, location: LocationId) {
        self.current_location = location;
    }

    pub(crate) fn mark_incapacitated(&mut self) {
        self.alive = false;
    }

    /// Let an incapacitated player act again, e.g. when a new day starts.
    pub fn revive(&mut self) {
        self.alive = true;
    }
}
