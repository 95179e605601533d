use crate::location::{common_choice, Choice, Location, LocationContext, LocationId, LocationNode};
use crate::navigation::Flow;

const ROOM_PRICE: u64 = 10;
const ROUND_PRICE: u64 = 5;
const INNKEEPER: &str = "Bertha the innkeeper";

pub struct Inn {
    node: LocationNode,
}

impl Inn {
    pub fn new() -> Self {
        Self {
            node: LocationNode::new(LocationId::Inn, "The Drowsy Dragon Inn")
                .with_description("A fire crackles in the hearth. Bertha polishes the same mug she always does.")
                .with_action(format!("Rent a room and rest ({ROOM_PRICE} gold)"))
                .with_action(format!("Buy the house a round ({ROUND_PRICE} gold)"))
                .with_action("Chat with Bertha")
                .with_exit(LocationId::MainStreet)
                .returning_to(LocationId::MainStreet),
        }
    }

    fn rest(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        if !ctx.player.spend(ROOM_PRICE) {
            ctx.say("\"No coin, no bed,\" Bertha says flatly.");
            return Ok(Choice::stay());
        }
        ctx.player.hit_points.restore();
        ctx.say("You sleep off your aches. You feel fully restored.");
        Ok(Choice::stay())
    }

    fn buy_round(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        if !ctx.player.spend(ROUND_PRICE) {
            ctx.say("You pat your empty purse. The regulars look away.");
            return Ok(Choice::stay());
        }
        let standing = ctx.player.adjust_relation(INNKEEPER, 1);
        ctx.say(format!(
            "The regulars cheer! Bertha warms to you (standing {standing:+})."
        ));
        Ok(Choice::stay())
    }

    fn chat(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        let line = match ctx.player.relation(INNKEEPER) {
            i32::MIN..=-1 => "\"Drink up and get out.\"",
            0..=2 => "\"Mind the stairs, they creak.\"",
            _ => "\"For you, love, the good ale. Don't tell the others.\"",
        };
        ctx.say(format!("Bertha says: {line}"));
        Ok(Choice::stay())
    }
}

impl Default for Inn {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for Inn {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match self.node.action_index(input) {
            Some(0) => self.rest(ctx),
            Some(1) => self.buy_round(ctx),
            Some(2) => self.chat(ctx),
            _ => common_choice(input, ctx),
        }
    }
}
