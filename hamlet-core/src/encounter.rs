//! The encounter gate: an unscheduled event that may strike as the player
//! walks into a location, before they get to do anything there.

use crate::location::LocationId;
use crate::world::Player;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeSet;

/// What happened at the door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterOutcome {
    pub occurred: bool,
    pub player_still_viable: bool,
    /// Narrative shown to the player, if anything happened.
    pub report: Option<String>,
}

impl EncounterOutcome {
    /// Nothing happened.
    pub fn quiet() -> Self {
        Self {
            occurred: false,
            player_still_viable: true,
            report: None,
        }
    }

    /// Something happened and the player is still standing.
    pub fn survived(report: impl Into<String>) -> Self {
        Self {
            occurred: true,
            player_still_viable: true,
            report: Some(report.into()),
        }
    }

    /// Something happened and the player went down.
    pub fn incapacitated(report: impl Into<String>) -> Self {
        Self {
            occurred: true,
            player_still_viable: false,
            report: Some(report.into()),
        }
    }
}

/// Decides whether an unscheduled event fires on entry.
pub trait EncounterService: Send {
    fn roll(&mut self, player: &mut Player, location: LocationId) -> EncounterOutcome;
}

/// Applies the safe-location policy in front of an [`EncounterService`].
pub struct EncounterGate {
    safe: BTreeSet<LocationId>,
    service: Box<dyn EncounterService>,
}

impl EncounterGate {
    pub fn new(
        safe: impl IntoIterator<Item = LocationId>,
        service: impl EncounterService + 'static,
    ) -> Self {
        Self {
            safe: safe.into_iter().collect(),
            service: Box::new(service),
        }
    }

    pub fn is_safe(&self, location: LocationId) -> bool {
        self.safe.contains(&location)
    }

    /// Run the check for one location entry. The outcome is never viable
    /// for a player who is already down, whatever the service reports.
    pub fn check(&mut self, player: &mut Player, location: LocationId) -> EncounterOutcome {
        if self.is_safe(location) {
            debug!("{location} is exempt from encounters");
            return EncounterOutcome {
                player_still_viable: player.is_viable(),
                ..EncounterOutcome::quiet()
            };
        }

        let mut outcome = self.service.roll(player, location);
        outcome.player_still_viable &= player.is_viable();
        if outcome.occurred {
            info!(
                "Encounter at {location}: viable={}",
                outcome.player_still_viable
            );
        }
        outcome
    }
}

// ============================================================================
// Ambushes
// ============================================================================

/// Footpads who lurk outside unsafe locations.
pub struct Ambushes {
    rng: StdRng,
    chance: u8,
}

impl Ambushes {
    /// `chance` is the percent chance of an ambush per entry.
    pub fn new(rng: StdRng, chance: u8) -> Self {
        Self { rng, chance }
    }
}

impl EncounterService for Ambushes {
    fn roll(&mut self, player: &mut Player, location: LocationId) -> EncounterOutcome {
        if self.rng.gen_range(0..100) >= u32::from(self.chance) {
            return EncounterOutcome::quiet();
        }

        let damage = self.rng.gen_range(1..=6);
        let loot = self.rng.gen_range(0..=player.gold / 10);
        player.gold -= loot;
        let dropped = player.hit_points.take_damage(damage);

        let report = format!(
            "A footpad jumps you on the way into the {}! You take {damage} damage and lose {loot} gold.",
            location.label()
        );
        if dropped {
            EncounterOutcome::incapacitated(format!("{report} You collapse in the gutter."))
        } else {
            EncounterOutcome::survived(report)
        }
    }
}
