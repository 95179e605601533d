//! Location nodes and the capability interface every location implements.
//!
//! A [`LocationNode`] is the static descriptor of a place: its identity,
//! the exits reachable from it, and the labels of its numbered actions.
//! The behavior of a place lives in a [`Location`] implementation, which the
//! controller drives through `setup`, `render` and `handle_choice`.

use crate::console::Terminal;
use crate::navigation::{go_to, terminate, Flow};
use crate::registry::LocationGraph;
use crate::world::{Player, World};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

// ============================================================================
// Identity
// ============================================================================

/// Stable key for every place in the town.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationId {
    MainStreet,
    Inn,
    Bank,
    Church,
    DarkAlley,
    Prison,
    Home,
}

impl LocationId {
    pub fn all() -> [LocationId; 7] {
        [
            LocationId::MainStreet,
            LocationId::Inn,
            LocationId::Bank,
            LocationId::Church,
            LocationId::DarkAlley,
            LocationId::Prison,
            LocationId::Home,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationId::MainStreet => "Main Street",
            LocationId::Inn => "Inn",
            LocationId::Bank => "Bank",
            LocationId::Church => "Church",
            LocationId::DarkAlley => "Dark Alley",
            LocationId::Prison => "Prison",
            LocationId::Home => "Home",
        }
    }

    /// Menu key that selects this location as an exit.
    pub fn hotkey(&self) -> char {
        match self {
            LocationId::MainStreet => 'S',
            LocationId::Inn => 'I',
            LocationId::Bank => 'B',
            LocationId::Church => 'C',
            LocationId::DarkAlley => 'D',
            LocationId::Prison => 'P',
            LocationId::Home => 'H',
        }
    }

    pub fn from_hotkey(key: char) -> Option<LocationId> {
        let key = key.to_ascii_uppercase();
        LocationId::all().into_iter().find(|id| id.hotkey() == key)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Static descriptor of a place in the world graph.
///
/// Built once when the registry is assembled and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNode {
    pub id: LocationId,
    pub name: String,
    pub description: String,
    /// Reachable locations, in menu order. No duplicates.
    pub exits: Vec<LocationId>,
    /// Labels of the numbered in-place actions, in menu order.
    pub actions: Vec<String>,
    /// Where a normal exit resumes. `None` ends the session instead.
    pub returns_to: Option<LocationId>,
}

impl LocationNode {
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            exits: Vec::new(),
            actions: Vec::new(),
            returns_to: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_exit(mut self, exit: LocationId) -> Self {
        if !self.exits.contains(&exit) {
            self.exits.push(exit);
        }
        self
    }

    pub fn with_exits(self, exits: impl IntoIterator<Item = LocationId>) -> Self {
        exits.into_iter().fold(self, |node, exit| node.with_exit(exit))
    }

    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.actions.push(label.into());
        self
    }

    pub fn returning_to(mut self, parent: LocationId) -> Self {
        self.returns_to = Some(parent);
        self
    }

    pub fn has_exit(&self, id: LocationId) -> bool {
        self.exits.contains(&id)
    }

    /// Zero-based index of the numbered action selected by `input`, if any.
    pub fn action_index(&self, input: &str) -> Option<usize> {
        let number: usize = input.trim().parse().ok()?;
        (1..=self.actions.len())
            .contains(&number)
            .then(|| number - 1)
    }
}

// ============================================================================
// Choices
// ============================================================================

/// What a choice handler reports back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Choice {
    /// The input was recognized and acted on.
    pub handled: bool,
    /// The location should be left through its normal exit.
    pub exit_requested: bool,
}

impl Choice {
    pub fn stay() -> Self {
        Self {
            handled: true,
            exit_requested: false,
        }
    }

    pub fn leave() -> Self {
        Self {
            handled: true,
            exit_requested: true,
        }
    }

    pub fn unrecognized() -> Self {
        Self::default()
    }
}

// ============================================================================
// Handler context
// ============================================================================

/// Everything a choice handler may touch while it runs.
///
/// The session cursor is deliberately absent: only the controller moves it.
pub struct LocationContext<'a> {
    pub player: &'a mut Player,
    pub world: &'a mut World,
    pub node: &'a LocationNode,
    pub graph: &'a LocationGraph,
    pub terminal: &'a mut dyn Terminal,
    pub rng: &'a mut StdRng,
    notices: &'a mut Vec<String>,
}

impl<'a> LocationContext<'a> {
    pub fn new(
        player: &'a mut Player,
        world: &'a mut World,
        node: &'a LocationNode,
        graph: &'a LocationGraph,
        terminal: &'a mut dyn Terminal,
        rng: &'a mut StdRng,
        notices: &'a mut Vec<String>,
    ) -> Self {
        Self {
            player,
            world,
            node,
            graph,
            terminal,
            rng,
            notices,
        }
    }

    /// Queue a message shown under the next screen that gets drawn.
    pub fn say(&mut self, text: impl Into<String>) {
        self.notices.push(text.into());
    }

    /// Ask an inline question and read the reply.
    ///
    /// End of input ends the session from wherever the question was asked.
    pub fn ask(&mut self, question: &str) -> Flow<String> {
        self.terminal.prompt(question)?;
        match self.terminal.read_line()? {
            Some(answer) => Ok(answer.trim().to_string()),
            None => terminate(),
        }
    }

    /// Ask for a gold amount. Returns `None` (after telling the player) when
    /// the reply is not a whole number.
    pub fn ask_amount(&mut self, question: &str) -> Flow<Option<u64>> {
        let answer = self.ask(question)?;
        match answer.parse::<u64>() {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => {
                self.say(format!("'{answer}' is not an amount of gold."));
                Ok(None)
            }
        }
    }
}

// ============================================================================
// Capability interface
// ============================================================================

/// A place the player can stand in.
pub trait Location: Send {
    /// The static descriptor of this place.
    fn node(&self) -> &LocationNode;

    /// Runs once per activation, after the encounter gate and before the first
    /// render. May navigate away immediately.
    fn setup(&mut self, _ctx: &mut LocationContext<'_>) -> Flow<()> {
        Ok(())
    }

    /// Draw the screen. The controller clears the terminal first.
    fn render(
        &self,
        player: &Player,
        world: &World,
        graph: &LocationGraph,
        terminal: &mut dyn Terminal,
    ) -> io::Result<()> {
        render_menu(self.node(), player, world, graph, terminal)
    }

    /// React to one line of non-empty input.
    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice>;
}

/// Interpret `input` as a single menu key, upper-cased.
pub fn menu_key(input: &str) -> Option<char> {
    let mut chars = input.trim().chars();
    let key = chars.next()?;
    match chars.next() {
        Some(_) => None,
        None => Some(key.to_ascii_uppercase()),
    }
}

/// Keys every location understands: exit hotkeys, `R` to return, `Q` to quit.
pub fn common_choice(input: &str, ctx: &LocationContext<'_>) -> Flow<Choice> {
    let Some(key) = menu_key(input) else {
        return Ok(Choice::unrecognized());
    };

    match key {
        'Q' => terminate(),
        'R' if ctx.node.returns_to.is_some() => Ok(Choice::leave()),
        _ => match LocationId::from_hotkey(key) {
            Some(exit) if ctx.node.has_exit(exit) => go_to(exit),
            _ => Ok(Choice::unrecognized()),
        },
    }
}

/// The standard screen: title, description, status line, actions and exits.
pub fn render_menu(
    node: &LocationNode,
    player: &Player,
    world: &World,
    graph: &LocationGraph,
    terminal: &mut dyn Terminal,
) -> io::Result<()> {
    terminal.write_line(&format!("== {} ==", node.name))?;
    if !node.description.is_empty() {
        terminal.write_line(&node.description)?;
    }
    terminal.write_line(&format!(
        "Day {}  |  HP {}/{}  |  Gold {}  |  Bank {}",
        world.day,
        player.hit_points.current.max(0),
        player.hit_points.maximum,
        player.gold,
        player.bank_gold
    ))?;
    terminal.write_line("")?;

    for (i, label) in node.actions.iter().enumerate() {
        terminal.write_line(&format!("({}) {label}", i + 1))?;
    }
    for exit in &node.exits {
        terminal.write_line(&format!("[{}] {}", exit.hotkey(), graph.name_of(*exit)))?;
    }
    if let Some(parent) = node.returns_to {
        terminal.write_line(&format!("[R] Return to {}", graph.name_of(parent)))?;
    }
    terminal.write_line("[Q] Quit")?;
    Ok(())
}
