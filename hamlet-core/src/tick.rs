//! The world tick scheduler and the town simulation it drives.
//!
//! Every `interval` accepted turns the scheduler advances the background
//! simulation one step and rolls for a world event. The controller does not
//! branch on either result; event text is only shown to the player.

use crate::location::LocationId;
use crate::world::{Player, World};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Background simulation advanced on world ticks.
pub trait WorldSimulation: Send {
    /// Advance NPC activity, the economy and the calendar by one step.
    fn periodic_update(&mut self, world: &mut World, player: &mut Player);

    /// Maybe inject a world event. Returns the text to show the player.
    fn world_event_check(&mut self, player: &mut Player, world: &mut World) -> Option<String>;
}

/// Fires the world simulation on turns divisible by the interval.
pub struct TickScheduler {
    interval: u64,
    simulation: Box<dyn WorldSimulation>,
    last_fired: Option<u64>,
}

impl TickScheduler {
    /// `interval` must be non-zero; `GameConfig::validate` enforces that.
    pub fn new(interval: u64, simulation: impl WorldSimulation + 'static) -> Self {
        Self {
            interval,
            simulation: Box::new(simulation),
            last_fired: None,
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn is_due(&self, turn: u64) -> bool {
        turn > 0 && turn % self.interval == 0 && self.last_fired != Some(turn)
    }

    /// Call after the turn counter was incremented to `turn`.
    pub fn after_turn(&mut self, turn: u64, world: &mut World, player: &mut Player) -> Option<String> {
        if !self.is_due(turn) {
            return None;
        }
        self.last_fired = Some(turn);

        debug!("World tick on turn {turn}");
        self.simulation.periodic_update(world, player);
        self.simulation.world_event_check(player, world)
    }
}

// ============================================================================
// Town simulation
// ============================================================================

/// Places townsfolk wander between.
const HAUNTS: [LocationId; 5] = [
    LocationId::MainStreet,
    LocationId::Inn,
    LocationId::Bank,
    LocationId::Church,
    LocationId::DarkAlley,
];

/// The stock simulation: wandering townsfolk, a calendar, and alignment
/// events.
pub struct TownSimulation {
    rng: StdRng,
    event_chance: u8,
    ticks_per_day: u64,
}

impl TownSimulation {
    pub fn new(rng: StdRng, event_chance: u8, ticks_per_day: u64) -> Self {
        Self {
            rng,
            event_chance,
            ticks_per_day: ticks_per_day.max(1),
        }
    }
}

impl WorldSimulation for TownSimulation {
    fn periodic_update(&mut self, world: &mut World, player: &mut Player) {
        world.ticks += 1;

        let idx = match world.townsfolk.len() {
            0 => None,
            n => Some(self.rng.gen_range(0..n)),
        };
        if let (Some(idx), Some(haunt)) = (idx, HAUNTS.choose(&mut self.rng)) {
            let person = &mut world.townsfolk[idx];
            person.whereabouts = *haunt;
            let line = format!("{} was seen at the {}.", person.name, haunt.label());
            world.record_gossip(line);
        }

        if world.ticks % self.ticks_per_day == 0 {
            world.begin_new_day(player);
            info!("Day {} begins", world.day);
        }
    }

    fn world_event_check(&mut self, player: &mut Player, _world: &mut World) -> Option<String> {
        if self.rng.gen_range(0..100) >= u32::from(self.event_chance) {
            return None;
        }

        if self.rng.gen_bool(0.5) {
            player.alignment.add_chivalry(2);
            Some("A wandering pilgrim blesses you as you pass. You feel more virtuous.".to_string())
        } else {
            player.alignment.add_darkness(2);
            Some("A voice in the shadows whispers of easy gold. The thought lingers.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicU32>);

    impl WorldSimulation for Counting {
        fn periodic_update(&mut self, _world: &mut World, _player: &mut Player) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn world_event_check(&mut self, _player: &mut Player, _world: &mut World) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_fires_on_multiples_of_interval_only() {
        let count = Arc::new(AtomicU32::new(0));
        let mut scheduler = TickScheduler::new(5, Counting(count.clone()));
        let mut world = World::new();
        let mut player = Player::new("Tess", 0);

        let fired: Vec<u64> = (1..=15)
            .filter(|turn| {
                let before = count.load(Ordering::SeqCst);
                scheduler.after_turn(*turn, &mut world, &mut player);
                count.load(Ordering::SeqCst) > before
            })
            .collect();

        assert_eq!(fired, vec![5, 10, 15]);
    }

    #[test]
    fn test_never_fires_twice_for_one_turn() {
        let count = Arc::new(AtomicU32::new(0));
        let mut scheduler = TickScheduler::new(5, Counting(count.clone()));
        let mut world = World::new();
        let mut player = Player::new("Tess", 0);

        scheduler.after_turn(5, &mut world, &mut player);
        scheduler.after_turn(5, &mut world, &mut player);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_turn_zero_never_ticks() {
        let scheduler = TickScheduler::new(5, Counting(Arc::new(AtomicU32::new(0))));
        assert!(!scheduler.is_due(0));
        assert!(!scheduler.is_due(1));
    }

    #[test]
    fn test_town_simulation_moves_people_and_turns_days() {
        let mut sim = TownSimulation::new(StdRng::seed_from_u64(11), 0, 3);
        let mut world = World::new();
        let mut player = Player::new("Tess", 0);

        for _ in 0..3 {
            sim.periodic_update(&mut world, &mut player);
        }

        assert_eq!(world.ticks, 3);
        assert_eq!(world.day, 2);
        assert!(world.gossip.iter().any(|g| g.contains("was seen at the")));
    }

    #[test]
    fn test_world_events_respect_chance() {
        let mut world = World::new();
        let mut player = Player::new("Tess", 0);

        let mut never = TownSimulation::new(StdRng::seed_from_u64(5), 0, 12);
        assert!((0..100).all(|_| never.world_event_check(&mut player, &mut world).is_none()));

        let mut always = TownSimulation::new(StdRng::seed_from_u64(5), 100, 12);
        assert!(always.world_event_check(&mut player, &mut world).is_some());
        assert_eq!(player.alignment.chivalry + player.alignment.darkness, 2);
    }
}
