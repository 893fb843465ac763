#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns attack requests into attack and damage commands.

use road_skirmish_core::{
    CollisionGateSnapshot, Command, CreatureSnapshot, PlayerSnapshot, StatBlock,
};

/// Damage dealt by `attacker` to `defender`: attack minus defense, floored at zero.
#[must_use]
pub fn resolve_attack(attacker: &impl StatBlock, defender: &impl StatBlock) -> u32 {
    attacker.attack().saturating_sub(defender.defense())
}

/// Combat system that queues the player's melee swings.
#[derive(Debug, Default)]
pub struct Combat;

impl Combat {
    /// Creates a new combat system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits `Command::BeginAttack` for every request, followed by
    /// `Command::DamageCreature` when the swing lands on a colliding creature.
    pub fn handle(
        &mut self,
        attack_requested: bool,
        player: &PlayerSnapshot,
        creature: Option<&CreatureSnapshot>,
        gate: CollisionGateSnapshot,
        out: &mut Vec<Command>,
    ) {
        if !attack_requested {
            return;
        }

        out.push(Command::BeginAttack);

        let Some(creature) = creature else {
            return;
        };
        if !gate.is_colliding {
            return;
        }

        out.push(Command::DamageCreature {
            amount: resolve_attack(&player.stats, &creature.stats),
        });
    }
}
