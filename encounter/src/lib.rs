#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that runs one Road Skirmish encounter.
//!
//! Each call to [`Encounter::on_tick`] advances the world clock, resolves the
//! player's intent, tests for contact, resolves any attack against the
//! collision gate as it stands after that test, and finally lets the creature
//! wander. Every system only ever talks to the world through commands, so a
//! fixed seed and a fixed input sequence always replay identically.

use std::time::Duration;

use road_skirmish_core::{
    AgentKind, Axis, CollisionGateSnapshot, Command, CreatureSnapshot, DirectionalIntent,
    EncounterConfig, Event, PlayerSnapshot,
};
use road_skirmish_system_combat::Combat;
use road_skirmish_system_steering::Steering;
use road_skirmish_system_wander::{Config as WanderConfig, Wander};
use road_skirmish_world::{self as world, query, ConfigError, World};
use serde::Serialize;
use tracing::trace;

/// Presentation requests raised during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresentationEvent {
    /// Play the player's attack motion.
    PlayerAttacked,
    /// Return the player to the idle pose.
    AttackRecovered,
    /// Show a hit on the creature.
    CreatureDamaged {
        /// Hit points removed.
        amount: u32,
        /// Hit points left.
        remaining_hp: u32,
    },
    /// Remove the creature from the scene.
    CreatureDefeated,
    /// An agent ran into the road edge.
    MovementBlocked {
        /// Agent that was stopped.
        agent: AgentKind,
        /// Axis along which it was stopped.
        axis: Axis,
    },
}

impl PresentationEvent {
    fn from_world(event: &Event) -> Option<Self> {
        match *event {
            Event::PlayerAttacked => Some(Self::PlayerAttacked),
            Event::AttackRecovered => Some(Self::AttackRecovered),
            Event::CreatureDamaged {
                amount,
                remaining_hp,
            } => Some(Self::CreatureDamaged {
                amount,
                remaining_hp,
            }),
            Event::CreatureDefeated => Some(Self::CreatureDefeated),
            Event::MovementBlocked { agent, axis } => Some(Self::MovementBlocked { agent, axis }),
            _ => None,
        }
    }
}

/// Everything an adapter needs to present one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickReport {
    /// One-based index of the tick.
    pub tick: u64,
    /// Player state after the tick.
    pub player: PlayerSnapshot,
    /// Creature state after the tick, absent once it was defeated.
    pub creature: Option<CreatureSnapshot>,
    /// Collision gate after the tick.
    pub gate: CollisionGateSnapshot,
    /// Presentation requests in the order they were raised.
    pub events: Vec<PresentationEvent>,
    /// Every world event of the tick, for replay and diagnostics.
    #[serde(skip)]
    pub world_events: Vec<Event>,
}

/// Owns the world and the systems that act on it.
#[derive(Debug)]
pub struct Encounter {
    world: World,
    steering: Steering,
    combat: Combat,
    wander: Wander,
}

impl Encounter {
    /// Builds the world from `config` and seeds the creature's choices with `seed`.
    pub fn new(config: &EncounterConfig, seed: u64) -> Result<Self, ConfigError> {
        let world = World::new(config)?;
        Ok(Self {
            world,
            steering: Steering,
            combat: Combat::new(),
            wander: Wander::from_seed(WanderConfig::new(config.position_memory), seed),
        })
    }

    /// Read-only access to the underlying world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the creature's wander state.
    #[must_use]
    pub const fn wander(&self) -> &Wander {
        &self.wander
    }

    /// Reports whether the creature was defeated.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        query::creature(&self.world).is_none()
    }

    /// Advances the encounter by `dt` using the frame's input.
    pub fn on_tick(
        &mut self,
        dt: Duration,
        intent: DirectionalIntent,
        attack_requested: bool,
    ) -> TickReport {
        let tick = query::tick_index(&self.world).saturating_add(1);
        let _span = tracing::trace_span!("tick", tick).entered();

        let mut log = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut log);
        let tick_events = log.clone();

        let mut commands = Vec::new();
        self.steering.handle(
            &tick_events,
            intent,
            &query::player(&self.world),
            query::collision_gate(&self.world),
            &mut commands,
        );
        self.execute(&mut commands, &mut log);

        world::apply(&mut self.world, Command::DetectOverlap, &mut log);

        let creature = query::creature(&self.world);
        self.combat.handle(
            attack_requested,
            &query::player(&self.world),
            creature.as_ref(),
            query::collision_gate(&self.world),
            &mut commands,
        );
        self.execute(&mut commands, &mut log);

        let creature = query::creature(&self.world);
        self.wander.handle(
            &tick_events,
            creature.as_ref(),
            &query::player(&self.world),
            query::road_network(&self.world),
            &mut commands,
        );
        self.execute(&mut commands, &mut log);

        trace!(events = log.len(), "tick complete");

        TickReport {
            tick,
            player: query::player(&self.world),
            creature: query::creature(&self.world),
            gate: query::collision_gate(&self.world),
            events: log.iter().filter_map(PresentationEvent::from_world).collect(),
            world_events: log,
        }
    }

    fn execute(&mut self, commands: &mut Vec<Command>, log: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, log);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use road_skirmish_core::WorldPoint;

    #[test]
    fn only_presentation_relevant_events_are_forwarded() {
        assert_eq!(
            PresentationEvent::from_world(&Event::CreatureDamaged {
                amount: 3,
                remaining_hp: 9,
            }),
            Some(PresentationEvent::CreatureDamaged {
                amount: 3,
                remaining_hp: 9,
            })
        );
        assert_eq!(PresentationEvent::from_world(&Event::CollisionStarted), None);
        assert_eq!(
            PresentationEvent::from_world(&Event::CreatureMoved {
                from: WorldPoint::new(0.0, 0.0),
                to: WorldPoint::new(1.0, 0.0),
            }),
            None
        );
    }

    #[test]
    fn presentation_events_serialize_with_a_kind_tag() {
        let value = serde_json::to_value(PresentationEvent::MovementBlocked {
            agent: AgentKind::Player,
            axis: Axis::Vertical,
        })
        .expect("serialize");

        assert_eq!(
            value,
            serde_json::json!({
                "kind": "movement_blocked",
                "agent": "Player",
                "axis": "Vertical",
            })
        );
    }
}
