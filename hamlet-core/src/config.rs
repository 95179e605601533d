//! Game configuration.
//!
//! The tick cadence, event chances and the list of encounter-free locations
//! are tunable; the defaults are the values the game has always played with.

use crate::location::LocationId;
use crate::registry::ConfigError;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Accepted turns between world ticks.
pub const DEFAULT_TICK_INTERVAL: u64 = 5;

/// Percent chance of an alignment event on each world tick.
pub const DEFAULT_WORLD_EVENT_CHANCE: u8 = 2;

/// Percent chance of an ambush when entering an unsafe location.
pub const DEFAULT_ENCOUNTER_CHANCE: u8 = 10;

/// World ticks per in-game day.
pub const DEFAULT_TICKS_PER_DAY: u64 = 12;

/// Configuration for a new or resumed game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Player character name.
    pub player_name: String,

    /// Where a new game starts.
    pub starting_location: LocationId,

    /// Gold carried at the start of a new game.
    pub starting_gold: u64,

    /// Accepted turns between world ticks.
    pub tick_interval: u64,

    /// Percent chance of an alignment event per world tick.
    pub world_event_chance: u8,

    /// Percent chance of an ambush on entering an unsafe location.
    pub encounter_chance: u8,

    /// Locations exempt from the encounter gate.
    pub safe_locations: Vec<LocationId>,

    /// World ticks per in-game day.
    pub ticks_per_day: u64,

    /// Seed for every random roll. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Create a config with default settings for the named player.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            starting_location: LocationId::MainStreet,
            starting_gold: 100,
            tick_interval: DEFAULT_TICK_INTERVAL,
            world_event_chance: DEFAULT_WORLD_EVENT_CHANCE,
            encounter_chance: DEFAULT_ENCOUNTER_CHANCE,
            safe_locations: vec![LocationId::Home, LocationId::Church, LocationId::Prison],
            ticks_per_day: DEFAULT_TICKS_PER_DAY,
            seed: None,
        }
    }

    pub fn with_starting_location(mut self, location: LocationId) -> Self {
        self.starting_location = location;
        self
    }

    pub fn with_starting_gold(mut self, gold: u64) -> Self {
        self.starting_gold = gold;
        self
    }

    pub fn with_tick_interval(mut self, interval: u64) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_world_event_chance(mut self, percent: u8) -> Self {
        self.world_event_chance = percent;
        self
    }

    pub fn with_encounter_chance(mut self, percent: u8) -> Self {
        self.encounter_chance = percent;
        self
    }

    pub fn with_safe_locations(mut self, locations: impl IntoIterator<Item = LocationId>) -> Self {
        self.safe_locations = locations.into_iter().collect();
        self
    }

    pub fn with_ticks_per_day(mut self, ticks: u64) -> Self {
        self.ticks_per_day = ticks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        for (name, value) in [
            ("world_event_chance", self.world_event_chance),
            ("encounter_chance", self.encounter_chance),
        ] {
            if value > 100 {
                return Err(ConfigError::InvalidPercentage { name, value });
            }
        }
        Ok(())
    }

    /// An independent random stream. With a seed, each `stream` number
    /// always yields the same sequence.
    pub fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}
