//! Game state: the player, the town, and the session cursor.
//!
//! All mutable game data hangs off [`GameState`], which is passed by
//! reference to whatever needs it and snapshotted whole by the persistence
//! gate. There is no process-wide state.

use crate::config::GameConfig;
use crate::cursor::SessionCursor;
use crate::location::LocationId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use uuid::Uuid;

/// How many gossip lines the town remembers.
pub const MAX_GOSSIP: usize = 12;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Player
// ============================================================================

/// Hit points tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Returns true if this blow dropped the player to zero or below.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.current -= amount;
        self.current <= 0
    }

    /// Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.current;
        self.current = (self.current + amount).min(self.maximum);
        self.current - old
    }

    pub fn restore(&mut self) {
        self.current = self.maximum;
    }

    pub fn is_down(&self) -> bool {
        self.current <= 0
    }
}

/// Good and evil deeds, tallied separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub chivalry: u32,
    pub darkness: u32,
}

impl Alignment {
    pub fn add_chivalry(&mut self, amount: u32) {
        self.chivalry = self.chivalry.saturating_add(amount);
    }

    pub fn add_darkness(&mut self, amount: u32) {
        self.darkness = self.darkness.saturating_add(amount);
    }

    pub fn describe(&self) -> &'static str {
        let balance = self.chivalry as i64 - self.darkness as i64;
        match balance {
            i64::MIN..=-50 => "villainous",
            -49..=-10 => "shady",
            -9..=9 => "neutral",
            10..=49 => "decent",
            _ => "saintly",
        }
    }
}

/// The player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hit_points: HitPoints,
    pub gold: u64,
    pub bank_gold: u64,
    pub alignment: Alignment,
    /// Standing with named townsfolk.
    #[serde(default)]
    pub relations: BTreeMap<String, i32>,
    /// Days left to serve in prison.
    #[serde(default)]
    pub sentence_days: u32,
    /// Last day the player prayed at the church.
    #[serde(default)]
    pub prayed_on_day: Option<u32>,
}

impl Player {
    pub fn new(name: impl Into<String>, gold: u64) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            hit_points: HitPoints::new(20),
            gold,
            bank_gold: 0,
            alignment: Alignment::default(),
            relations: BTreeMap::new(),
            sentence_days: 0,
            prayed_on_day: None,
        }
    }

    /// Whether the player can keep acting.
    pub fn is_viable(&self) -> bool {
        !self.hit_points.is_down()
    }

    pub fn relation(&self, npc: &str) -> i32 {
        self.relations.get(npc).copied().unwrap_or(0)
    }

    /// Shift the player's standing with `npc`. Returns the new standing.
    pub fn adjust_relation(&mut self, npc: &str, delta: i32) -> i32 {
        let standing = self.relations.entry(npc.to_string()).or_insert(0);
        *standing += delta;
        *standing
    }

    /// Take `amount` gold from the purse if there is enough.
    pub fn spend(&mut self, amount: u64) -> bool {
        match self.gold.checked_sub(amount) {
            Some(rest) => {
                self.gold = rest;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Town
// ============================================================================

/// A simulated resident of the town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Townsperson {
    pub name: String,
    pub whereabouts: LocationId,
}

impl Townsperson {
    pub fn new(name: impl Into<String>, whereabouts: LocationId) -> Self {
        Self {
            name: name.into(),
            whereabouts,
        }
    }
}

/// Background world state advanced by the world simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub day: u32,
    /// World ticks since the town was founded.
    pub ticks: u64,
    pub townsfolk: Vec<Townsperson>,
    pub gossip: VecDeque<String>,
    /// Daily interest paid on bank deposits, in percent.
    pub interest_percent: u64,
}

impl World {
    pub fn new() -> Self {
        Self {
            day: 1,
            ticks: 0,
            townsfolk: vec![
                Townsperson::new("Bertha the innkeeper", LocationId::Inn),
                Townsperson::new("Father Aldous", LocationId::Church),
                Townsperson::new("Grimsby the fence", LocationId::DarkAlley),
                Townsperson::new("Clerk Mott", LocationId::Bank),
                Townsperson::new("Old Wenna", LocationId::MainStreet),
            ],
            gossip: VecDeque::new(),
            interest_percent: 1,
        }
    }

    pub fn record_gossip(&mut self, line: impl Into<String>) {
        self.gossip.push_back(line.into());
        while self.gossip.len() > MAX_GOSSIP {
            self.gossip.pop_front();
        }
    }

    /// Roll the calendar over: pay interest and shorten prison sentences.
    pub fn begin_new_day(&mut self, player: &mut Player) {
        self.day += 1;

        let interest = player.bank_gold * self.interest_percent / 100;
        player.bank_gold = player.bank_gold.saturating_add(interest);
        player.sentence_days = player.sentence_days.saturating_sub(1);

        self.record_gossip(format!("Day {} dawns over the town.", self.day));
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Game State
// ============================================================================

/// Everything that survives between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub world: World,
    pub cursor: SessionCursor,
}

impl GameState {
    /// A fresh game for the configured player.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player: Player::new(&config.player_name, config.starting_gold),
            world: World::new(),
            cursor: SessionCursor::new(config.starting_location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_points() {
        let mut hp = HitPoints::new(10);
        assert!(!hp.take_damage(4));
        assert_eq!(hp.heal(10), 4);
        assert!(hp.take_damage(12));
        assert!(hp.is_down());
        hp.restore();
        assert_eq!(hp.current, 10);
    }

    #[test]
    fn test_player_viability() {
        let mut player = Player::new("Tess", 0);
        assert!(player.is_viable());
        player.hit_points.take_damage(25);
        assert!(!player.is_viable());
    }

    #[test]
    fn test_relations() {
        let mut player = Player::new("Tess", 0);
        assert_eq!(player.relation("Bertha"), 0);
        assert_eq!(player.adjust_relation("Bertha", 2), 2);
        assert_eq!(player.adjust_relation("Bertha", -3), -1);
    }

    #[test]
    fn test_spend() {
        let mut player = Player::new("Tess", 15);
        assert!(player.spend(10));
        assert!(!player.spend(10));
        assert_eq!(player.gold, 5);
    }

    #[test]
    fn test_alignment_description() {
        let mut alignment = Alignment::default();
        assert_eq!(alignment.describe(), "neutral");
        alignment.darkness = 60;
        assert_eq!(alignment.describe(), "villainous");
        alignment.chivalry = 80;
        assert_eq!(alignment.describe(), "decent");
    }

    #[test]
    fn test_alignment_gains_saturate() {
        let mut alignment = Alignment {
            chivalry: u32::MAX - 1,
            darkness: u32::MAX,
        };
        alignment.add_chivalry(5);
        alignment.add_darkness(1);
        assert_eq!(alignment.chivalry, u32::MAX);
        assert_eq!(alignment.darkness, u32::MAX);
    }

    #[test]
    fn test_new_day_pays_interest_and_serves_sentence() {
        let mut world = World::new();
        let mut player = Player::new("Tess", 0);
        player.bank_gold = 250;
        player.sentence_days = 1;

        world.begin_new_day(&mut player);

        assert_eq!(world.day, 2);
        assert_eq!(player.bank_gold, 252);
        assert_eq!(player.sentence_days, 0);
        assert_eq!(world.gossip.back().unwrap(), "Day 2 dawns over the town.");
    }

    #[test]
    fn test_gossip_is_capped() {
        let mut world = World::new();
        for i in 0..(MAX_GOSSIP + 5) {
            world.record_gossip(format!("rumor {i}"));
        }
        assert_eq!(world.gossip.len(), MAX_GOSSIP);
        assert_eq!(world.gossip.front().unwrap(), "rumor 5");
    }
}
