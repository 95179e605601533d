use crate::location::{common_choice, Choice, Location, LocationContext, LocationId, LocationNode};
use crate::navigation::{terminate, Flow};

pub struct Home {
    node: LocationNode,
}

impl Home {
    pub fn new() -> Self {
        Self {
            node: LocationNode::new(LocationId::Home, "Your Cottage")
                .with_description("A narrow bed, a cold hearth, and a loose floorboard you hide things under.")
                .with_action("Go to sleep (ends the session)")
                .with_action("Count your savings")
                .with_exit(LocationId::MainStreet)
                .returning_to(LocationId::MainStreet),
        }
    }
}

impl Default for Home {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for Home {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match self.node.action_index(input) {
            Some(0) => {
                ctx.player.hit_points.restore();
                ctx.terminal
                    .write_line("You bar the door and sleep soundly until morning.")?;
                terminate()
            }
            Some(1) => {
                let total = ctx.player.gold + ctx.player.bank_gold;
                ctx.say(format!(
                    "{} gold in your purse, {} in the bank: {total} in all.",
                    ctx.player.gold, ctx.player.bank_gold
                ));
                Ok(Choice::stay())
            }
            _ => common_choice(input, ctx),
        }
    }
}
