use super::BAIL_PER_DAY;
use crate::location::{common_choice, Choice, Location, LocationContext, LocationId, LocationNode};
use crate::navigation::{go_to, Flow};

/// No exits: the only ways out are serving the sentence or paying bail.
pub struct Prison {
    node: LocationNode,
}

impl Prison {
    pub fn new() -> Self {
        Self {
            node: LocationNode::new(LocationId::Prison, "The Town Gaol")
                .with_description("Cold stone, damp straw, and a barred window too high to reach.")
                .with_action("Wait out a day")
                .with_action("Pay your bail"),
        }
    }

    fn release(ctx: &mut LocationContext<'_>, message: &str) -> Flow<Choice> {
        ctx.player.sentence_days = 0;
        ctx.say(message);
        go_to(LocationId::MainStreet)
    }

    fn wait(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        ctx.player.sentence_days = ctx.player.sentence_days.saturating_sub(1);
        if ctx.player.sentence_days == 0 {
            return Self::release(ctx, "The jailer rattles his keys. You are free to go.");
        }
        ctx.say(format!(
            "A long, cold day passes. {} more to go.",
            ctx.player.sentence_days
        ));
        Ok(Choice::stay())
    }

    fn pay_bail(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        let bail = u64::from(ctx.player.sentence_days) * BAIL_PER_DAY;
        if !ctx.player.spend(bail) {
            ctx.say(format!("Bail is {bail} gold. You don't have it."));
            return Ok(Choice::stay());
        }
        Self::release(ctx, "Coins change hands. The cell door swings open.")
    }
}

impl Default for Prison {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for Prison {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn setup(&mut self, ctx: &mut LocationContext<'_>) -> Flow<()> {
        if ctx.player.sentence_days == 0 {
            ctx.say("Your sentence is served.");
            return go_to(LocationId::MainStreet);
        }
        Ok(())
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match self.node.action_index(input) {
            Some(0) => self.wait(ctx),
            Some(1) => self.pay_bail(ctx),
            _ => common_choice(input, ctx),
        }
    }
}
