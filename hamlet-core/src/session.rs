//! GameSession - the session owner.
//!
//! Activates one [`LocationController`] at a time. When a controller hands
//! back a navigation signal the session validates the destination against
//! the registry and activates it fresh; a normal exit resumes the node's
//! parent without a new encounter roll. When play ends the session shows any
//! notices still queued and takes one closing snapshot, so the outcome of the
//! last action survives a relaunch.

use crate::config::GameConfig;
use crate::console::Terminal;
use crate::controller::{flush, EngineError, Entry, Gates, LocationController, LocationExit};
use crate::encounter::{Ambushes, EncounterGate};
use crate::location::LocationId;
use crate::navigation::Destination;
use crate::persist::{PersistError, Persistence, PersistenceGate};
use crate::registry::{ConfigError, LocationRegistry};
use crate::tick::{TickScheduler, TownSimulation};
use crate::town;
use crate::world::GameState;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use thiserror::Error;

/// Random stream numbers, one per consumer.
const LOCATION_STREAM: u64 = 0;
const ENCOUNTER_STREAM: u64 = 1;
const SIMULATION_STREAM: u64 = 2;

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The player quit, went to sleep, or input closed.
    Quit,
    /// The player can no longer act.
    Incapacitated,
}

/// Summary returned when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub turns: u64,
    pub location: LocationId,
}

/// A single player's play session.
pub struct GameSession {
    registry: LocationRegistry,
    gates: Gates,
    state: GameState,
    rng: StdRng,
    notices: Vec<String>,
}

impl GameSession {
    /// Start a new game in the standard town.
    pub fn new(
        config: GameConfig,
        persistence: impl Persistence + 'static,
    ) -> Result<Self, SessionError> {
        let state = GameState::new(&config);
        Self::resume(config, state, persistence)
    }

    /// Continue a saved game in the standard town.
    pub fn resume(
        config: GameConfig,
        state: GameState,
        persistence: impl Persistence + 'static,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let gates = Gates::new(
            EncounterGate::new(
                config.safe_locations.iter().copied(),
                Ambushes::new(config.rng(ENCOUNTER_STREAM), config.encounter_chance),
            ),
            PersistenceGate::new(persistence),
            TickScheduler::new(
                config.tick_interval,
                TownSimulation::new(
                    config.rng(SIMULATION_STREAM),
                    config.world_event_chance,
                    config.ticks_per_day,
                ),
            ),
        );

        Self::from_parts(
            town::standard_registry()?,
            gates,
            state,
            config.rng(LOCATION_STREAM),
        )
    }

    /// Assemble a session from explicit parts.
    pub fn from_parts(
        registry: LocationRegistry,
        gates: Gates,
        state: GameState,
        rng: StdRng,
    ) -> Result<Self, SessionError> {
        if gates.ticks.interval() == 0 {
            return Err(ConfigError::ZeroTickInterval.into());
        }
        registry.ensure(state.cursor.current_location())?;

        Ok(Self {
            registry,
            gates,
            state,
            rng,
            notices: Vec::new(),
        })
    }

    /// Play until the session ends.
    pub fn run(&mut self, terminal: &mut dyn Terminal) -> Result<SessionSummary, SessionError> {
        let mut entry = Entry::Fresh;

        loop {
            if !self.state.cursor.is_alive() {
                return self.close(terminal, EndReason::Incapacitated);
            }

            let here = self.state.cursor.current_location();
            let (node, graph, location) = self
                .registry
                .parts_mut(here)
                .ok_or(ConfigError::UnknownDestination(here))?;
            let returns_to = node.returns_to;

            let exit = LocationController::new(node, graph, location, &mut self.gates, &mut self.rng)
                .run(&mut self.state, terminal, &mut self.notices, entry)?;

            match exit {
                LocationExit::Navigate(Destination::Location(next)) => {
                    self.registry.ensure(next)?;
                    info!("Navigating {here} -> {next}");
                    self.state.cursor.move_to(next);
                    entry = Entry::Fresh;
                }
                LocationExit::Navigate(Destination::Terminate) => {
                    return self.close(terminal, EndReason::Quit);
                }
                LocationExit::Left => match returns_to {
                    Some(parent) => {
                        self.registry.ensure(parent)?;
                        debug!("Returning {here} -> {parent}");
                        self.state.cursor.move_to(parent);
                        entry = Entry::Resumed;
                    }
                    None => return self.close(terminal, EndReason::Quit),
                },
                LocationExit::Incapacitated => {
                    return self.close(terminal, EndReason::Incapacitated);
                }
            }
        }
    }

    /// Show leftover notices and take the closing snapshot.
    fn close(
        &mut self,
        terminal: &mut dyn Terminal,
        reason: EndReason,
    ) -> Result<SessionSummary, SessionError> {
        flush(&mut self.notices, terminal).map_err(EngineError::from)?;
        if !self.gates.persistence.snapshot(&self.state) {
            warn!("Closing snapshot failed; the last autosave is from before the final action");
        }
        Ok(self.finish(reason))
    }

    fn finish(&self, reason: EndReason) -> SessionSummary {
        let summary = SessionSummary {
            reason,
            turns: self.state.cursor.turn_count(),
            location: self.state.cursor.current_location(),
        };
        info!("Session ended: {summary:?}");
        summary
    }

    /// Get a reference to the game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Get a mutable reference to the game state.
    ///
    /// Use with caution - edits here bypass the location handlers.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    /// Failed autosaves so far.
    pub fn autosave_failures(&self) -> u32 {
        self.gates.persistence.failures()
    }
}
