//! The location controller: runs one location's interactive loop.
//!
//! ```text
//! enter -> [encounter gate] -> setup -> loop {
//!     [persistence gate] -> render -> read -> dispatch -> turn++ -> [tick?]
//! }
//! ```
//!
//! The loop ends when the handler asks to leave, a navigation signal unwinds
//! out of dispatch, or the player can no longer act.

use crate::console::Terminal;
use crate::encounter::EncounterGate;
use crate::location::{Location, LocationContext, LocationId, LocationNode};
use crate::navigation::{settle, Destination, Settled};
use crate::persist::PersistenceGate;
use crate::registry::{ConfigError, LocationGraph};
use crate::tick::TickScheduler;
use crate::world::GameState;
use log::{debug, info};
use rand::rngs::StdRng;
use thiserror::Error;

pub const INVALID_CHOICE: &str = "That is not a valid choice.";
pub const AUTOSAVE_FAILED: &str = "(Your progress could not be saved.)";

/// Failures that escape a location. Navigation is never one of these.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{location} failed: {message}")]
    Handler {
        location: LocationId,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// How a location was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Arrived by navigation or at session start: roll the encounter gate.
    Fresh,
    /// Came back from a child location's normal exit: no encounter.
    Resumed,
}

/// How a location was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationExit {
    /// The handler asked to leave normally.
    Left,
    /// A navigation signal unwound out of the location.
    Navigate(Destination),
    /// The player can no longer act.
    Incapacitated,
}

/// The gates every controller consults.
pub struct Gates {
    pub encounter: EncounterGate,
    pub persistence: PersistenceGate,
    pub ticks: TickScheduler,
}

impl Gates {
    pub fn new(encounter: EncounterGate, persistence: PersistenceGate, ticks: TickScheduler) -> Self {
        Self {
            encounter,
            persistence,
            ticks,
        }
    }
}

/// One activation of one location.
pub struct LocationController<'a> {
    node: &'a LocationNode,
    graph: &'a LocationGraph,
    location: &'a mut dyn Location,
    gates: &'a mut Gates,
    rng: &'a mut StdRng,
}

impl<'a> LocationController<'a> {
    pub fn new(
        node: &'a LocationNode,
        graph: &'a LocationGraph,
        location: &'a mut dyn Location,
        gates: &'a mut Gates,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            node,
            graph,
            location,
            gates,
            rng,
        }
    }

    /// Run the location until it is left.
    ///
    /// `notices` carries messages across activations: whatever is queued when
    /// a signal unwinds is shown under the next location's first screen.
    pub fn run(
        &mut self,
        state: &mut GameState,
        terminal: &mut dyn Terminal,
        notices: &mut Vec<String>,
        entry: Entry,
    ) -> Result<LocationExit, EngineError> {
        let id = self.node.id;
        debug!("Entering {id} ({entry:?}) on turn {}", state.cursor.turn_count());

        if entry == Entry::Fresh {
            let outcome = self.gates.encounter.check(&mut state.player, id);
            notices.extend(outcome.report);
            if !outcome.player_still_viable {
                state.cursor.mark_incapacitated();
                flush(notices, terminal)?;
                return Ok(LocationExit::Incapacitated);
            }
        }

        let setup = {
            let mut ctx = LocationContext::new(
                &mut state.player,
                &mut state.world,
                self.node,
                self.graph,
                &mut *terminal,
                &mut *self.rng,
                &mut *notices,
            );
            self.location.setup(&mut ctx)
        };
        if let Settled::Navigate(destination) = settle(setup)? {
            info!("Leaving {id} during setup: {destination:?}");
            return Ok(LocationExit::Navigate(destination));
        }

        while state.cursor.is_alive() {
            if !self.gates.persistence.snapshot(state) {
                notices.push(AUTOSAVE_FAILED.to_string());
            }

            terminal.clear()?;
            self.location
                .render(&state.player, &state.world, self.graph, &mut *terminal)?;
            flush(notices, terminal)?;
            terminal.prompt("Your choice: ")?;

            let Some(line) = terminal.read_line()? else {
                debug!("Input closed at {id}");
                return Ok(LocationExit::Navigate(Destination::Terminate));
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let flow = {
                let mut ctx = LocationContext::new(
                    &mut state.player,
                    &mut state.world,
                    self.node,
                    self.graph,
                    &mut *terminal,
                    &mut *self.rng,
                    &mut *notices,
                );
                self.location.handle_choice(input, &mut ctx)
            };
            let choice = match settle(flow)? {
                Settled::Continue(choice) => choice,
                Settled::Navigate(destination) => {
                    info!("Leaving {id}: {destination:?}");
                    return Ok(LocationExit::Navigate(destination));
                }
            };

            if !choice.handled {
                notices.push(INVALID_CHOICE.to_string());
                continue;
            }

            let turn = state.cursor.advance_turn();
            notices.extend(
                self.gates
                    .ticks
                    .after_turn(turn, &mut state.world, &mut state.player),
            );

            if !state.player.is_viable() {
                state.cursor.mark_incapacitated();
            } else if choice.exit_requested {
                return Ok(LocationExit::Left);
            }
        }

        flush(notices, terminal)?;
        Ok(LocationExit::Incapacitated)
    }
}

/// Write out and clear queued notices.
pub(crate) fn flush(notices: &mut Vec<String>, terminal: &mut dyn Terminal) -> std::io::Result<()> {
    for line in notices.drain(..) {
        terminal.write_line(&line)?;
    }
    Ok(())
}
