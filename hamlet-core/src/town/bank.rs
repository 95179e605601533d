use crate::location::{common_choice, Choice, Location, LocationContext, LocationId, LocationNode};
use crate::navigation::{go_to, Flow, Unwind};
use log::info;
use rand::Rng;

/// Percent chance the guards catch a vault robbery.
const CATCH_CHANCE: u32 = 85;
const ROBBERY_SENTENCE_DAYS: u32 = 3;

pub struct Bank {
    node: LocationNode,
}

impl Bank {
    pub fn new() -> Self {
        Self {
            node: LocationNode::new(LocationId::Bank, "The Ironbound Bank")
                .with_description("Clerk Mott peers at you over a ledger the size of a door.")
                .with_action("Deposit gold")
                .with_action("Withdraw gold")
                .with_action("Visit the vault")
                .with_exit(LocationId::MainStreet)
                .returning_to(LocationId::MainStreet),
        }
    }

    fn deposit(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        let Some(amount) = ctx.ask_amount("How much gold will you deposit? ")? else {
            return Ok(Choice::stay());
        };
        if amount > ctx.player.gold {
            ctx.say("You don't carry that much.");
            return Ok(Choice::stay());
        }

        let balance = ctx
            .player
            .bank_gold
            .checked_add(amount)
            .ok_or_else(|| Unwind::fault(self.node.id, "account balance overflow"))?;
        ctx.player.gold -= amount;
        ctx.player.bank_gold = balance;
        ctx.say(format!("Mott records the deposit. Balance: {balance} gold."));
        Ok(Choice::stay())
    }

    fn withdraw(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        let Some(amount) = ctx.ask_amount("How much gold will you withdraw? ")? else {
            return Ok(Choice::stay());
        };
        if amount > ctx.player.bank_gold {
            ctx.say("\"Your account holds no such sum,\" Mott sniffs.");
            return Ok(Choice::stay());
        }

        ctx.player.bank_gold -= amount;
        ctx.player.gold = ctx.player.gold.saturating_add(amount);
        ctx.say(format!("Mott counts out {amount} gold."));
        Ok(Choice::stay())
    }

    /// A small sub-menu of its own, read inline.
    fn vault(&self, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        ctx.terminal
            .write_line("The vault door stands ajar. A lone guard dozes on a stool.")?;
        ctx.terminal
            .write_line("(1) Admire the gold  (2) Try to rob the vault  (3) Step away")?;

        match ctx.ask("Vault> ")?.as_str() {
            "1" => ctx.say("Stacks of coin glitter in the lamplight."),
            "2" => self.rob(ctx)?,
            _ => ctx.say("You step away from the vault."),
        }
        Ok(Choice::stay())
    }

    fn rob(&self, ctx: &mut LocationContext<'_>) -> Flow<()> {
        ctx.player.alignment.add_darkness(5);

        if ctx.rng.gen_range(0..100) < CATCH_CHANCE {
            info!("{} caught robbing the vault", ctx.player.name);
            ctx.player.sentence_days = ROBBERY_SENTENCE_DAYS;
            ctx.say("The guard was only pretending! You are dragged off in irons.");
            return go_to(LocationId::Prison);
        }

        let haul = ctx.rng.gen_range(20..=80);
        ctx.player.gold = ctx.player.gold.saturating_add(haul);
        ctx.say(format!("You slip out with {haul} gold. Nobody saw a thing."));
        Ok(())
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for Bank {
    fn node(&self) -> &LocationNode {
        &self.node
    }

    fn handle_choice(&mut self, input: &str, ctx: &mut LocationContext<'_>) -> Flow<Choice> {
        match self.node.action_index(input) {
            Some(0) => self.deposit(ctx),
            Some(1) => self.withdraw(ctx),
            Some(2) => self.vault(ctx),
            _ => common_choice(input, ctx),
        }
    }
}
