use crate::location::{common_choice, Choice, Location, LocationContext, LocationId, LocationNode};
use crate::navigation::{go_to, Flow};
use log::info;
use rand::Rng;

/// Percent chance a pickpocket attempt succeeds.
const PICKPOCKET_SUCCESS: u32 = 60;
const PICKPOCKET_SENTENCE_DAYS: u32 = 2;

pub struct DarkAlley {
    node: LocationNode,
}

impl DarkAlley {
    pub fn new() -> Self {
        Self {
            node: LocationNode::new(LocationId::DarkAlley, "The Dark Alley")
                .with_description("Something drips. Someone watches. Grimsby leans in a doorway, grinning.")
                .with_action("Pick a pocket")
                .with_action("Pick a fight")
                .with_exit(LocationId::MainStreet)
                .returning_to(LocationId::MainStreet),
        }
    }

    fn pickpocket(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        ctx.player.alignment.add_darkness(1);

        if ctx.rng.gen_range(0..100) < PICKPOCKET_SUCCESS {
            let take = ctx.rng.gen_range(5..=30);
            ctx.player.gold = ctx.player.gold.saturating_add(take);
            ctx.say(format!("Your fingers find a purse with {take} gold in it."));
            return Ok(Choice::stay());
        }

        info!("{} caught pickpocketing", ctx.player.name);
        ctx.player.sentence_days = PICKPOCKET_SENTENCE_DAYS;
        ctx.say("A hand clamps on your wrist. The watch was waiting for you.");
        go_to(LocationId::Prison)
    }

    fn brawl(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        let damage = ctx.rng.gen_range(1..=8);
        let dropped = ctx.player.hit_points.take_damage(damage);

        if dropped {
            ctx.say(format!(
                "A thug cracks you over the head for {damage} damage. The world goes dark."
            ));
        } else if ctx.rng.gen_bool(0.5) {
            let purse = ctx.rng.gen_range(1..=10);
            ctx.player.gold = ctx.player.gold.saturating_add(purse);
            ctx.say(format!(
                "You take {damage} damage but send the thug running. He drops {purse} gold."
            ));
        } else {
            ctx.say(format!("You trade blows and take {damage} damage. Nobody wins."));
        }
        Ok(Choice::stay())
    }
}

impl Default for DarkAlley {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for DarkAlley {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match self.node.action_index(input) {
            Some(0) => self.pickpocket(ctx),
            Some(1) => self.brawl(ctx),
            _ => common_choice(input, ctx),
        }
    }
}
