//! Engine-level properties of the location loop, checked against probe
//! locations with scripted input and recording gates.
//!
//! Run with: `cargo test -p hamlet-core --test engine_properties`

use hamlet_core::controller::{AUTOSAVE_FAILED, INVALID_CHOICE};
use hamlet_core::location::common_choice;
use hamlet_core::testing::{
    assert_location, assert_persist_before_every_render, assert_shown, assert_turns, Event,
    TestHarness,
};
use hamlet_core::{
    go_to, terminate, Choice, ConfigError, EncounterOutcome, EndReason, EngineError, Flow, Location,
    LocationContext, LocationId, LocationNode, LocationRegistry, SessionError, Unwind,
};

// =============================================================================
// Probe location
// =============================================================================

/// A location with one behavior per input:
/// - `a`: a plain accepted action
/// - `x`: leave through the normal exit
/// - `deep`: raise a navigation signal three calls down
/// - `boom`: fail with a handler error
/// - `hurt`: take lethal damage
/// - `bye`: queue a farewell, then end the session
struct Probe {
    node: LocationNode,
    jump_to: Option<LocationId>,
    setup_to: Option<LocationId>,
}

impl Probe {
    fn new(id: LocationId) -> Self {
        Self {
            node: LocationNode::new(id, id.label()).with_action("Act"),
            jump_to: None,
            setup_to: None,
        }
    }

    fn exit(mut self, to: LocationId) -> Self {
        self.node = self.node.with_exit(to);
        self
    }

    fn returning_to(mut self, parent: LocationId) -> Self {
        self.node = self.node.returning_to(parent);
        self
    }

    fn jumping_to(mut self, target: LocationId) -> Self {
        self.jump_to = Some(target);
        self
    }

    fn leaving_on_setup(mut self, target: LocationId) -> Self {
        self.setup_to = Some(target);
        self
    }
}

fn descend(depth: u32, target: LocationId) -> Flow<u32> {
    if depth == 0 {
        return go_to(target);
    }
    let below = descend(depth - 1, target)?;
    Ok(below + 1)
}

impl Location for Probe {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn setup(&mut self, _ctx: &mut LocationContext<'_>) -> Flow<()> {
        match self.setup_to {
            Some(target) => go_to(target),
            None => Ok(()),
        }
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match input {
            "a" => Ok(Choice::stay()),
            "x" => Ok(Choice::leave()),
            "deep" => {
                let target = self.jump_to.expect("probe has no jump target");
                descend(3, target)?;
                ctx.player.gold += 1000;
                ctx.say("after the jump");
                Ok(Choice::stay())
            }
            "boom" => Err(Unwind::fault(self.node.id, "boom")),
            "hurt" => {
                ctx.player.hit_points.take_damage(1000);
                Ok(Choice::stay())
            }
            "bye" => {
                ctx.say("Farewell, traveller.");
                terminate()
            }
            _ => common_choice(input, ctx),
        }
    }
}

fn registry(probes: Vec<Probe>) -> LocationRegistry {
    probes
        .into_iter()
        .fold(LocationRegistry::builder(), |builder, probe| builder.register(probe))
        .build()
        .expect("probe registry should validate")
}

/// Main Street with exits to the Inn and the Bank, both returning to it.
fn small_town() -> LocationRegistry {
    registry(vec![
        Probe::new(LocationId::MainStreet)
            .exit(LocationId::Inn)
            .exit(LocationId::Bank)
            .jumping_to(LocationId::Bank),
        Probe::new(LocationId::Inn).returning_to(LocationId::MainStreet),
        Probe::new(LocationId::Bank).returning_to(LocationId::MainStreet),
    ])
}

// =============================================================================
// Turn counting
// =============================================================================

#[test]
fn test_turn_count_equals_accepted_inputs() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["a", " ", "a", "", "a", "\t", "a"])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Quit);
    assert_eq!(run.summary().turns, 4);
    assert_turns(&run, 4);
}

#[test]
fn test_unrecognized_input_is_reported_not_counted() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["nonsense", "a", "z"])
        .run(small_town());

    assert_turns(&run, 1);
    assert_shown(&run, INVALID_CHOICE);
    assert!(run.summary().reason == EndReason::Quit);
}

#[test]
fn test_end_of_input_ends_the_session() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Quit);
    assert_turns(&run, 0);
    assert_eq!(run.journal.renders(), 1);
}

#[test]
fn test_parting_words_are_shown_when_the_session_ends() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["bye", "a"])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Quit);
    assert_turns(&run, 0);
    assert_shown(&run, "Farewell, traveller.");
    assert_eq!(run.terminal.unread(), 1);
}

#[test]
fn test_quit_key_ends_the_session_without_a_turn() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["a", "q", "a"])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Quit);
    assert_turns(&run, 1);
    assert_eq!(run.terminal.unread(), 1);
}

// =============================================================================
// World ticks
// =============================================================================

#[test]
fn test_four_inputs_empty_then_one_ticks_once() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["a", "a", "a", "a", "", "a"])
        .run(small_town());

    assert_turns(&run, 5);
    assert_eq!(run.journal.ticks(), 1);
    assert_eq!(run.journal.count(|e| *e == Event::WorldEventCheck), 1);

    // The tick follows the sixth read, not the fifth.
    let events = run.journal.events();
    let tick = run.journal.first(|e| *e == Event::Tick).unwrap();
    let reads_before = events[..tick]
        .iter()
        .filter(|e| matches!(e, Event::Read(_)))
        .count();
    assert_eq!(reads_before, 6);
}

#[test]
fn test_ticks_only_on_multiples_of_the_interval() {
    let inputs: Vec<&str> = std::iter::repeat("a").take(14).collect();
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(inputs)
        .run(small_town());

    assert_turns(&run, 14);
    assert_eq!(run.journal.ticks(), 2);
}

#[test]
fn test_no_second_tick_for_the_same_turn() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["a", "a", "a", "a", "a", "", "nonsense", "  "])
        .run(small_town());

    assert_turns(&run, 5);
    assert_eq!(run.journal.ticks(), 1);
}

#[test]
fn test_tick_interval_is_configurable() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .tick_interval(2)
        .inputs(["a", "a", "a", "a"])
        .run(small_town());

    assert_eq!(run.journal.ticks(), 2);
}

// =============================================================================
// Persistence gate
// =============================================================================

#[test]
fn test_persist_once_per_iteration_before_render() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["a", "", "nonsense", "a"])
        .run(small_town());

    assert_persist_before_every_render(&run.journal);
    // Four inputs, the final read that hits end of input, and the closing snapshot.
    assert_eq!(run.journal.persists(), 6);

    let turns: Vec<u64> = run
        .journal
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Persist { turn, .. } => Some(turn),
            _ => None,
        })
        .collect();
    assert_eq!(turns, vec![0, 1, 1, 1, 2, 2]);
}

#[test]
fn test_persistence_failure_does_not_stop_play() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .failing_persistence()
        .inputs(["a", "a"])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Quit);
    assert_turns(&run, 2);
    assert_shown(&run, AUTOSAVE_FAILED);
    // Three screens and the closing snapshot.
    assert_eq!(run.session.as_ref().unwrap().autosave_failures(), 4);
}

// =============================================================================
// Navigation signal
// =============================================================================

#[test]
fn test_nested_signal_reaches_the_session_with_its_destination() {
    let run = TestHarness::new(LocationId::MainStreet)
        .inputs(["a", "a", "deep"])
        .run(small_town());

    assert_location(&run, LocationId::Bank);
    // The aborted third input is not counted.
    assert_turns(&run, 2);
    assert_eq!(run.state().player.gold, 100);
    assert!(!run.terminal.shows("after the jump"));

    // The Bank starts with its own encounter check, before its first render.
    let events = run.journal.events();
    let bank_roll = run
        .journal
        .first(|e| *e == Event::Encounter(LocationId::Bank))
        .expect("bank encounter should run");
    let deep_read = run
        .journal
        .first(|e| *e == Event::Read(Some("deep".to_string())))
        .unwrap();
    assert!(deep_read < bank_roll);
    assert!(events[bank_roll..]
        .iter()
        .any(|e| *e == Event::Persist { location: LocationId::Bank, turn: 2 }));
}

#[test]
fn test_exit_hotkey_navigates_and_return_resumes_without_a_roll() {
    let run = TestHarness::new(LocationId::MainStreet)
        .inputs(["i", "a", "r"])
        .run(small_town());

    assert_location(&run, LocationId::MainStreet);
    assert_turns(&run, 2);
    assert_eq!(
        run.journal.events().iter().filter_map(|e| match e {
            Event::Encounter(id) => Some(*id),
            _ => None,
        }).collect::<Vec<_>>(),
        vec![LocationId::MainStreet, LocationId::Inn]
    );
}

#[test]
fn test_hotkey_for_a_missing_exit_is_unrecognized() {
    let run = TestHarness::new(LocationId::Inn)
        .safe([LocationId::Inn])
        .inputs(["b"])
        .run(small_town());

    assert_location(&run, LocationId::Inn);
    assert_shown(&run, INVALID_CHOICE);
}

#[test]
fn test_leaving_a_root_location_ends_the_session() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["x", "a"])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Quit);
    assert_turns(&run, 1);
    assert_eq!(run.terminal.unread(), 1);
}

#[test]
fn test_setup_can_navigate_before_any_render() {
    let registry = registry(vec![
        Probe::new(LocationId::MainStreet),
        Probe::new(LocationId::Prison).leaving_on_setup(LocationId::MainStreet),
    ]);
    let run = TestHarness::new(LocationId::Prison)
        .safe([LocationId::MainStreet, LocationId::Prison])
        .run(registry);

    assert_location(&run, LocationId::MainStreet);
    assert_eq!(
        run.journal.first(|e| matches!(e, Event::Persist { .. })),
        run.journal
            .first(|e| *e == Event::Persist { location: LocationId::MainStreet, turn: 0 })
    );
    assert_eq!(run.journal.renders(), 1);
}

// =============================================================================
// Encounter gate
// =============================================================================

#[test]
fn test_encounter_runs_once_before_first_render() {
    let run = TestHarness::new(LocationId::Bank)
        .inputs(["a", "a", "", "a"])
        .run(small_town());

    assert_eq!(run.journal.encounters(), 1);
    let roll = run.journal.first(|e| matches!(e, Event::Encounter(_))).unwrap();
    let render = run.journal.first(|e| *e == Event::Render).unwrap();
    assert!(roll < render);
}

#[test]
fn test_safe_locations_skip_the_roll() {
    let run = TestHarness::new(LocationId::Bank)
        .safe([LocationId::Bank])
        .inputs(["a"])
        .run(small_town());

    assert_eq!(run.journal.encounters(), 0);
}

#[test]
fn test_incapacitating_encounter_skips_the_loop() {
    let run = TestHarness::new(LocationId::Bank)
        .encounter(EncounterOutcome::incapacitated("A footpad knocks you flat."))
        .inputs(["a", "a"])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Incapacitated);
    assert_eq!(run.journal.renders(), 0);
    assert_turns(&run, 0);
    assert!(!run.state().cursor.is_alive());
    assert_shown(&run, "A footpad knocks you flat.");
    assert_eq!(run.terminal.unread(), 2);

    // Only the session's closing snapshot, taken after the location gave up.
    assert_eq!(run.journal.persists(), 1);
    assert_eq!(
        run.journal.events().last(),
        Some(&Event::Persist { location: LocationId::Bank, turn: 0 })
    );
}

#[test]
fn test_downed_player_entering_an_unsafe_location_never_acts() {
    let mut harness = TestHarness::new(LocationId::Bank).inputs(["a"]);
    harness.state_mut().player.hit_points.current = 0;
    let run = harness.run(small_town());

    assert_eq!(run.summary().reason, EndReason::Incapacitated);
    assert_eq!(run.journal.encounters(), 1);
    assert_eq!(run.journal.renders(), 0);
    assert_turns(&run, 0);
    assert!(!run.state().cursor.is_alive());
    assert_eq!(run.terminal.unread(), 1);
}

#[test]
fn test_survived_encounter_is_shown_on_the_first_screen() {
    let run = TestHarness::new(LocationId::Bank)
        .encounter(EncounterOutcome::survived("A beggar tugs your sleeve."))
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Quit);
    assert_shown(&run, "A beggar tugs your sleeve.");
}

#[test]
fn test_handler_damage_ends_the_loop() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["hurt", "a"])
        .run(small_town());

    assert_eq!(run.summary().reason, EndReason::Incapacitated);
    assert_turns(&run, 1);
    assert_eq!(run.terminal.unread(), 1);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_dangling_exit_is_reported_when_the_registry_is_built() {
    let result = LocationRegistry::builder()
        .register(Probe::new(LocationId::MainStreet).exit(LocationId::Church))
        .build();

    assert_eq!(
        result.err(),
        Some(ConfigError::DanglingExit {
            from: LocationId::MainStreet,
            to: LocationId::Church,
        })
    );
}

#[test]
fn test_navigation_to_an_unregistered_location_is_a_config_error() {
    let registry = registry(vec![
        Probe::new(LocationId::MainStreet).jumping_to(LocationId::Prison)
    ]);
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["a", "deep", "a"])
        .run(registry);

    assert!(matches!(
        run.result,
        Err(SessionError::Config(ConfigError::UnknownDestination(
            LocationId::Prison
        )))
    ));
    assert_turns(&run, 1);
}

#[test]
fn test_unregistered_start_is_rejected() {
    let run = TestHarness::new(LocationId::Church).run(small_town());

    assert!(matches!(
        run.result,
        Err(SessionError::Config(ConfigError::UnknownDestination(
            LocationId::Church
        )))
    ));
    assert!(run.session.is_none());
}

#[test]
fn test_zero_tick_interval_is_rejected() {
    let run = TestHarness::new(LocationId::MainStreet)
        .tick_interval(0)
        .run(small_town());

    assert!(matches!(
        run.result,
        Err(SessionError::Config(ConfigError::ZeroTickInterval))
    ));
}

#[test]
fn test_handler_fault_propagates() {
    let run = TestHarness::new(LocationId::MainStreet)
        .safe([LocationId::MainStreet])
        .inputs(["a", "boom", "a"])
        .run(small_town());

    match &run.result {
        Err(SessionError::Engine(EngineError::Handler { location, message })) => {
            assert_eq!(*location, LocationId::MainStreet);
            assert_eq!(message, "boom");
        }
        other => panic!("Expected a handler error, got {other:?}"),
    }
    assert_turns(&run, 1);
    assert_eq!(run.terminal.unread(), 1);
}
