use crate::location::{common_choice, Choice, Location, LocationContext, LocationId, LocationNode};
use crate::navigation::Flow;
use rand::Rng;

/// Gold donated per point of chivalry.
const GOLD_PER_CHIVALRY: u64 = 10;

pub struct Church {
    node: LocationNode,
}

impl Church {
    pub fn new() -> Self {
        Self {
            node: LocationNode::new(LocationId::Church, "The Church of the Dawn")
                .with_description("Candles gutter before the altar. Father Aldous nods as you enter.")
                .with_action("Donate to the poor")
                .with_action("Pray")
                .with_exit(LocationId::MainStreet)
                .returning_to(LocationId::MainStreet),
        }
    }

    fn donate(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        let Some(amount) = ctx.ask_amount("How much will you give? ")? else {
            return Ok(Choice::stay());
        };
        if amount == 0 {
            ctx.say("Father Aldous smiles thinly at your empty hand.");
            return Ok(Choice::stay());
        }
        if !ctx.player.spend(amount) {
            ctx.say("You don't carry that much.");
            return Ok(Choice::stay());
        }

        let merit = u32::try_from(amount / GOLD_PER_CHIVALRY).unwrap_or(u32::MAX);
        ctx.player.alignment.add_chivalry(merit);
        ctx.say(format!("The poor will eat tonight. You gain {merit} chivalry."));
        Ok(Choice::stay())
    }

    fn pray(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        if ctx.player.prayed_on_day == Some(ctx.world.day) {
            ctx.say("You have already prayed today. The saints are busy.");
            return Ok(Choice::stay());
        }

        ctx.player.prayed_on_day = Some(ctx.world.day);
        let amount = ctx.rng.gen_range(1..=4);
        let healed = ctx.player.hit_points.heal(amount);
        ctx.say(format!("A warmth spreads through you. You recover {healed} HP."));
        Ok(Choice::stay())
    }
}

impl Default for Church {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for Church {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match self.node.action_index(input) {
            Some(0) => self.donate(ctx),
            Some(1) => self.pray(ctx),
            _ => common_choice(input, ctx),
        }
    }
}
