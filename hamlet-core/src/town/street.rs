use crate::location::{common_choice, Choice, Location, LocationContext, LocationId, LocationNode};
use crate::navigation::Flow;

/// How many gossip lines the street crier repeats.
const GOSSIP_SHOWN: usize = 5;

/// The hub every other location hangs off.
pub struct MainStreet {
    node: LocationNode,
}

impl MainStreet {
    pub fn new() -> Self {
        Self {
            node: LocationNode::new(LocationId::MainStreet, "Main Street")
                .with_description("Carts rattle over the cobbles. The whole town passes through here.")
                .with_action("Listen to the town gossip")
                .with_action("Look at yourself")
                .with_exits([
                    LocationId::Inn,
                    LocationId::Bank,
                    LocationId::Church,
                    LocationId::DarkAlley,
                    LocationId::Home,
                ]),
        }
    }

    fn gossip(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        if ctx.world.gossip.is_empty() {
            ctx.say("Nobody has anything interesting to say.");
            return Ok(Choice::stay());
        }

        let skip = ctx.world.gossip.len().saturating_sub(GOSSIP_SHOWN);
        let lines: Vec<String> = ctx.world.gossip.iter().skip(skip).cloned().collect();
        for line in lines {
            ctx.say(format!("  \"{line}\""));
        }
        Ok(Choice::stay())
    }

    fn look(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        let player = &ctx.player;
        let mut lines = vec![format!(
            "{} looks {} (chivalry {}, darkness {}).",
            player.name,
            player.alignment.describe(),
            player.alignment.chivalry,
            player.alignment.darkness,
        )];
        for (npc, standing) in &player.relations {
            lines.push(format!("  {npc}: {standing:+}"));
        }
        for line in lines {
            ctx.say(line);
        }
        Ok(Choice::stay())
    }
}

impl Default for MainStreet {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for MainStreet {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match self.node.action_index(input) {
            Some(0) => self.gossip(ctx),
            Some(1) => self.look(ctx),
            _ => common_choice(input, ctx),
        }
    }
}
