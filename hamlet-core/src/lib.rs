//! Turn-driven location engine for a menu-based town adventure.
//!
//! This crate provides:
//! - A validated graph of location nodes and a registry of their handlers
//! - The location controller loop (encounter gate, autosave, render, dispatch)
//! - A navigation signal that unwinds nested menus without threading flags
//! - A world tick scheduler driving the background town simulation
//! - JSON save games
//!
//! # Quick Start
//!
//! ```ignore
//! use hamlet_core::{GameConfig, GameSession, JsonSaveStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::new("Thorin").with_seed(42);
//!     let store = JsonSaveStore::new("saves/Thorin_autosave.json");
//!
//!     let mut session = GameSession::new(config, store)?;
//!     let summary = session.run(&mut my_terminal)?;
//!     println!("Played {} turns", summary.turns);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod console;
pub mod controller;
pub mod cursor;
pub mod encounter;
pub mod location;
pub mod navigation;
pub mod persist;
pub mod registry;
pub mod session;
pub mod testing;
pub mod tick;
pub mod town;
pub mod world;

// Primary public API
pub use config::GameConfig;
pub use console::Terminal;
pub use controller::{EngineError, Entry, Gates, LocationController, LocationExit};
pub use cursor::SessionCursor;
pub use encounter::{Ambushes, EncounterGate, EncounterOutcome, EncounterService};
pub use location::{Choice, Location, LocationContext, LocationId, LocationNode};
pub use navigation::{go_to, terminate, Destination, Flow, Unwind};
pub use persist::{JsonSaveStore, PersistError, Persistence, PersistenceGate, SavedGame};
pub use registry::{ConfigError, LocationGraph, LocationRegistry};
pub use session::{EndReason, GameSession, SessionError, SessionSummary};
pub use tick::{TickScheduler, TownSimulation, WorldSimulation};
pub use world::{GameState, Player, World};
