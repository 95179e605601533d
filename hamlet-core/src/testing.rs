//! Testing utilities for the engine.
//!
//! This module provides tools for integration testing:
//! - `ScriptedTerminal` feeding canned input lines and capturing the screen
//! - Recording gates (`RecordingPersistence`, `ScriptedEncounters`,
//!   `CountingSimulation`) that log every call into a shared [`Journal`]
//! - `TestHarness` for running a whole session against a registry
//! - Assertion helpers for verifying call order and session state

use crate::config::GameConfig;
use crate::console::Terminal;
use crate::controller::Gates;
use crate::encounter::{EncounterGate, EncounterOutcome, EncounterService};
use crate::location::LocationId;
use crate::persist::{PersistError, Persistence, PersistenceGate};
use crate::registry::LocationRegistry;
use crate::session::{GameSession, SessionError, SessionSummary};
use crate::tick::{TickScheduler, WorldSimulation};
use crate::world::{GameState, Player, World};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// Journal
// ============================================================================

/// One observable call made by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The screen was cleared for a redraw.
    Render,
    /// A line was read. `None` is end of input.
    Read(Option<String>),
    /// A snapshot was handed to persistence.
    Persist { location: LocationId, turn: u64 },
    /// The encounter service rolled for a location.
    Encounter(LocationId),
    /// The world simulation advanced.
    Tick,
    /// The world event roll ran.
    WorldEventCheck,
}

/// Shared, ordered log of engine calls.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(&self, event: Event) {
        self.lock().push(event);
    }

    /// Copy of every event so far.
    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.lock().iter().filter(|e| matches(e)).count()
    }

    pub fn renders(&self) -> usize {
        self.count(|e| matches!(e, Event::Render))
    }

    pub fn persists(&self) -> usize {
        self.count(|e| matches!(e, Event::Persist { .. }))
    }

    pub fn encounters(&self) -> usize {
        self.count(|e| matches!(e, Event::Encounter(_)))
    }

    pub fn ticks(&self) -> usize {
        self.count(|e| matches!(e, Event::Tick))
    }

    /// Position of the first event matching `matches`.
    pub fn first(&self, matches: impl Fn(&Event) -> bool) -> Option<usize> {
        self.lock().iter().position(|e| matches(e))
    }
}

// ============================================================================
// Scripted collaborators
// ============================================================================

/// A terminal that replays canned input and records what was drawn.
#[derive(Debug)]
pub struct ScriptedTerminal {
    inputs: VecDeque<String>,
    lines: Vec<String>,
    prompts: Vec<String>,
    journal: Journal,
}

impl ScriptedTerminal {
    pub fn new<I, S>(inputs: I, journal: Journal) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            lines: Vec::new(),
            prompts: Vec::new(),
            journal,
        }
    }

    /// Every line written, across all screens.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn shows(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line.contains(text))
    }

    /// Input lines that were never read.
    pub fn unread(&self) -> usize {
        self.inputs.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn clear(&mut self) -> io::Result<()> {
        self.journal.record(Event::Render);
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        self.prompts.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let line = self.inputs.pop_front();
        self.journal.record(Event::Read(line.clone()));
        Ok(line)
    }
}

/// Persistence that records each snapshot and optionally fails.
#[derive(Debug, Clone)]
pub struct RecordingPersistence {
    journal: Journal,
    failing: bool,
}

impl RecordingPersistence {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            failing: false,
        }
    }

    /// Every write fails with an IO error.
    pub fn failing(journal: Journal) -> Self {
        Self {
            journal,
            failing: true,
        }
    }
}

impl Persistence for RecordingPersistence {
    fn persist(&mut self, state: &GameState) -> Result<(), PersistError> {
        self.journal.record(Event::Persist {
            location: state.cursor.current_location(),
            turn: state.cursor.turn_count(),
        });
        if self.failing {
            return Err(io::Error::other("disk full").into());
        }
        Ok(())
    }
}

/// Encounters that play back queued outcomes, then stay quiet.
#[derive(Debug, Clone)]
pub struct ScriptedEncounters {
    journal: Journal,
    outcomes: VecDeque<EncounterOutcome>,
}

impl ScriptedEncounters {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            outcomes: VecDeque::new(),
        }
    }

    pub fn then(mut self, outcome: EncounterOutcome) -> Self {
        self.outcomes.push_back(outcome);
        self
    }
}

impl EncounterService for ScriptedEncounters {
    fn roll(&mut self, player: &mut Player, location: LocationId) -> EncounterOutcome {
        self.journal.record(Event::Encounter(location));
        let outcome = self.outcomes.pop_front().unwrap_or_else(EncounterOutcome::quiet);
        if !outcome.player_still_viable {
            player.hit_points.current = 0;
        }
        outcome
    }
}

/// A world simulation that only counts calls.
#[derive(Debug, Clone)]
pub struct CountingSimulation {
    journal: Journal,
}

impl CountingSimulation {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl WorldSimulation for CountingSimulation {
    fn periodic_update(&mut self, _world: &mut World, _player: &mut Player) {
        self.journal.record(Event::Tick);
    }

    fn world_event_check(&mut self, _player: &mut Player, _world: &mut World) -> Option<String> {
        self.journal.record(Event::WorldEventCheck);
        None
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Runs a scripted session against any registry.
pub struct TestHarness {
    journal: Journal,
    inputs: Vec<String>,
    state: GameState,
    safe: Vec<LocationId>,
    encounters: Vec<EncounterOutcome>,
    tick_interval: u64,
    failing_persistence: bool,
    seed: u64,
}

/// What a harness run left behind.
pub struct HarnessRun {
    pub result: Result<SessionSummary, SessionError>,
    pub terminal: ScriptedTerminal,
    /// `None` if the session could not be assembled.
    pub session: Option<GameSession>,
    pub journal: Journal,
}

impl TestHarness {
    /// A new player standing at `start`.
    pub fn new(start: LocationId) -> Self {
        let config = GameConfig::new("Tester").with_starting_location(start);
        Self::with_state(GameState::new(&config))
    }

    /// Resume from an existing state.
    pub fn with_state(state: GameState) -> Self {
        Self {
            journal: Journal::new(),
            inputs: Vec::new(),
            state,
            safe: Vec::new(),
            encounters: Vec::new(),
            tick_interval: 5,
            failing_persistence: false,
            seed: 7,
        }
    }

    pub fn inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(inputs.into_iter().map(Into::into));
        self
    }

    pub fn safe(mut self, locations: impl IntoIterator<Item = LocationId>) -> Self {
        self.safe.extend(locations);
        self
    }

    /// Queue an encounter outcome for the next unsafe entry.
    pub fn encounter(mut self, outcome: EncounterOutcome) -> Self {
        self.encounters.push(outcome);
        self
    }

    pub fn tick_interval(mut self, interval: u64) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn failing_persistence(mut self) -> Self {
        self.failing_persistence = true;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Play the script to the end against `registry`.
    pub fn run(self, registry: LocationRegistry) -> HarnessRun {
        let journal = self.journal;
        let encounters = self
            .encounters
            .into_iter()
            .fold(ScriptedEncounters::new(journal.clone()), ScriptedEncounters::then);
        let persistence = if self.failing_persistence {
            RecordingPersistence::failing(journal.clone())
        } else {
            RecordingPersistence::new(journal.clone())
        };
        let gates = Gates::new(
            EncounterGate::new(self.safe, encounters),
            PersistenceGate::new(persistence),
            TickScheduler::new(self.tick_interval, CountingSimulation::new(journal.clone())),
        );
        let rng = GameConfig::new("Tester").with_seed(self.seed).rng(0);
        let mut terminal = ScriptedTerminal::new(self.inputs, journal.clone());

        match GameSession::from_parts(registry, gates, self.state, rng) {
            Ok(mut session) => {
                let result = session.run(&mut terminal);
                HarnessRun {
                    result,
                    terminal,
                    session: Some(session),
                    journal,
                }
            }
            Err(e) => HarnessRun {
                result: Err(e),
                terminal,
                session: None,
                journal,
            },
        }
    }
}

impl HarnessRun {
    /// The session summary. Panics if the session failed.
    #[track_caller]
    pub fn summary(&self) -> &SessionSummary {
        match &self.result {
            Ok(summary) => summary,
            Err(e) => panic!("Expected the session to end cleanly, got: {e}"),
        }
    }

    /// Final game state. Panics if the session was never assembled.
    #[track_caller]
    pub fn state(&self) -> &GameState {
        match &self.session {
            Some(session) => session.state(),
            None => panic!("Session was never assembled"),
        }
    }

    pub fn turns(&self) -> u64 {
        self.state().cursor.turn_count()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the cursor counted exactly `expected` accepted turns.
#[track_caller]
pub fn assert_turns(run: &HarnessRun, expected: u64) {
    let actual = run.turns();
    assert_eq!(actual, expected, "Expected {expected} turns, got {actual}");
}

/// Assert the session stopped at `expected`.
#[track_caller]
pub fn assert_location(run: &HarnessRun, expected: LocationId) {
    let actual = run.state().cursor.current_location();
    assert_eq!(actual, expected, "Expected to end at {expected}, got {actual}");
}

/// Assert some screen showed `text`.
#[track_caller]
pub fn assert_shown(run: &HarnessRun, text: &str) {
    assert!(
        run.terminal.shows(text),
        "Expected '{text}' on screen, got:\n{}",
        run.terminal.lines().join("\n")
    );
}

/// Assert every render was immediately preceded by a persist, and that the
/// session ended with its closing snapshot.
#[track_caller]
pub fn assert_persist_before_every_render(journal: &Journal) {
    let events = journal.events();
    for (i, event) in events.iter().enumerate() {
        if *event == Event::Render {
            assert!(
                i > 0 && matches!(events[i - 1], Event::Persist { .. }),
                "Render at {i} was not preceded by a persist: {events:?}"
            );
        }
    }
    assert!(
        matches!(events.last(), Some(Event::Persist { .. })),
        "Session did not end with a closing snapshot: {events:?}"
    );
    assert_eq!(journal.persists(), journal.renders() + 1);
}
