#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Road Skirmish.

mod movement;
mod road;
mod schedule;

use road_skirmish_core::{
    AgentKind, CharacterStats, CollisionGateSnapshot, Command, CreatureSnapshot, CreatureStats,
    Direction, Displacement, EncounterConfig, Event, HalfExtents, PlayerSnapshot, StatBlock,
    TimingConfig, WorldPoint, WELCOME_BANNER,
};
use schedule::{Scheduler, Timer};
use thiserror::Error;
use tracing::{debug, info};

pub use movement::{attempt_move, GateOutcome};
pub use road::RoadNetwork;

/// Reasons an encounter configuration is rejected before simulation starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Tile length was zero, negative, or not a number.
    #[error("tile length must be a positive number of world units, got {0}")]
    InvalidTileLength(f32),
    /// The road layout expanded into no tiles.
    #[error("road layout produced no tiles")]
    EmptyRoadNetwork,
    /// Some tiles cannot be reached from the first tile.
    #[error("road layout is disconnected: only {reachable} of {total} tiles are reachable")]
    DisconnectedRoadNetwork {
        /// Tiles reachable from the first generated tile.
        reachable: usize,
        /// Tiles generated by the layout.
        total: usize,
    },
    /// An agent would start somewhere it can never move from.
    #[error("{agent:?} spawn point ({x}, {y}) is off the road")]
    SpawnOffRoad {
        /// Agent whose spawn point was rejected.
        agent: AgentKind,
        /// Horizontal spawn coordinate.
        x: f32,
        /// Vertical spawn coordinate.
        y: f32,
    },
    /// The creature would remember no positions at all.
    #[error("position memory must hold at least one position")]
    ZeroPositionMemory,
}

/// Represents the authoritative Road Skirmish world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    network: RoadNetwork,
    player: Player,
    creature: Option<Creature>,
    gate: CollisionGate,
    scheduler: Scheduler,
    timings: TimingConfig,
    tick_index: u64,
}

impl World {
    /// Builds the road network and spawns both agents.
    ///
    /// Fails when the layout is empty or disconnected, when the player would
    /// spawn off-road, or when the tile length or position memory is unusable.
    /// A creature spawned off-road is accepted; the wander system snaps it
    /// back onto the network on its first evaluation.
    pub fn new(config: &EncounterConfig) -> Result<Self, ConfigError> {
        if !(config.tile_length.is_finite() && config.tile_length > 0.0) {
            return Err(ConfigError::InvalidTileLength(config.tile_length));
        }
        if config.position_memory == 0 {
            return Err(ConfigError::ZeroPositionMemory);
        }

        let network = RoadNetwork::build(&config.layout, config.tile_length, config.road_margin);
        if network.is_empty() {
            return Err(ConfigError::EmptyRoadNetwork);
        }

        let total = network.tiles().len();
        let reachable = network.reachable_tile_count();
        if reachable != total {
            return Err(ConfigError::DisconnectedRoadNetwork { reachable, total });
        }

        let spawn = config.player.spawn;
        if !network.is_on_road(spawn) {
            return Err(ConfigError::SpawnOffRoad {
                agent: AgentKind::Player,
                x: spawn.x(),
                y: spawn.y(),
            });
        }

        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(config.timings.direction_change(), Timer::DirectionChange);

        debug!(tiles = total, "road network built");

        Ok(Self {
            banner: WELCOME_BANNER,
            network,
            player: Player {
                position: spawn,
                facing: None,
                speed: config.player.speed,
                half_extents: config.player.half_extents,
                stats: config.player.stats,
                attacking: false,
            },
            creature: Some(Creature {
                position: config.creature.spawn,
                facing: None,
                speed: config.creature.speed,
                half_extents: config.creature.half_extents,
                stats: config.creature.stats,
                can_move: true,
            }),
            gate: CollisionGate::default(),
            scheduler,
            timings: config.timings,
            tick_index: 0,
        })
    }

    fn fire(&mut self, timer: Timer, out_events: &mut Vec<Event>) {
        match timer {
            Timer::AttackRecovery => {
                self.player.attacking = false;
                out_events.push(Event::AttackRecovered);
            }
            Timer::CreatureThaw => {
                if let Some(creature) = self.creature.as_mut() {
                    creature.can_move = true;
                    out_events.push(Event::CreatureThawed);
                }
            }
            Timer::DirectionChange => {
                if self.creature.is_some() {
                    out_events.push(Event::WanderIntervalElapsed);
                }
            }
        }
    }

    fn move_player(
        &mut self,
        delta: Displacement,
        heading: Option<Direction>,
        out_events: &mut Vec<Event>,
    ) {
        if heading.is_some() {
            self.player.facing = heading;
            self.gate.last_direction = heading;
        }

        if self.gate.is_colliding {
            debug!(?heading, "player move refused while the collision gate is engaged");
            return;
        }

        let outcome = attempt_move(self.player.position, delta, &self.network);
        for axis in outcome.blocked_axes() {
            out_events.push(Event::MovementBlocked {
                agent: AgentKind::Player,
                axis,
            });
        }

        if outcome.actual.is_zero() {
            return;
        }

        let from = self.player.position;
        self.player.position = from.translate(outcome.actual);
        if heading.is_none() {
            self.gate.last_direction = outcome.actual.direction();
        }
        out_events.push(Event::PlayerMoved {
            from,
            to: self.player.position,
        });
    }

    fn move_creature(&mut self, delta: Displacement, out_events: &mut Vec<Event>) {
        let Some(creature) = self.creature.as_mut() else {
            return;
        };
        if !creature.can_move {
            return;
        }

        let outcome = attempt_move(creature.position, delta, &self.network);
        for axis in outcome.blocked_axes() {
            debug!(?axis, "creature move clipped at the road edge");
            out_events.push(Event::MovementBlocked {
                agent: AgentKind::Creature,
                axis,
            });
        }

        if outcome.actual.is_zero() {
            return;
        }

        let from = creature.position;
        creature.position = from.translate(outcome.actual);
        creature.facing = outcome.actual.direction();
        out_events.push(Event::CreatureMoved {
            from,
            to: creature.position,
        });
    }

    fn damage_creature(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let Some(creature) = self.creature.as_mut() else {
            return;
        };

        let remaining_hp = creature.stats.take_damage(amount);
        out_events.push(Event::CreatureDamaged {
            amount,
            remaining_hp,
        });

        if creature.stats.is_defeated() {
            self.creature = None;
            let _ = self.scheduler.cancel(Timer::targets_creature);
            self.release_gate(out_events);
            info!(tick = self.tick_index, "creature defeated");
            out_events.push(Event::CreatureDefeated);
            return;
        }

        debug!(amount, remaining_hp, "creature damaged");
        if amount == 0 {
            return;
        }

        creature.can_move = false;
        let freeze = self.timings.damage_freeze();
        let _ = self.scheduler.cancel(|timer| timer == Timer::CreatureThaw);
        self.scheduler.schedule(freeze, Timer::CreatureThaw);
        out_events.push(Event::CreatureFrozen { duration: freeze });
    }

    fn relocate_creature(&mut self, out_events: &mut Vec<Event>) {
        let Some(creature) = self.creature.as_mut() else {
            return;
        };
        let Some(center) = self.network.snap(creature.position) else {
            return;
        };

        debug!(from = ?creature.position, to = ?center, "creature snapped back onto the road");
        creature.position = center;
        self.gate = CollisionGate::default();
        out_events.push(Event::CreatureRelocated { to: center });
    }

    fn detect_overlap(&mut self, out_events: &mut Vec<Event>) {
        let Some(creature) = self.creature.as_ref() else {
            return;
        };

        let overlapping = self.player.snapshot().bounds().overlaps(&creature.snapshot().bounds());
        if overlapping && !self.gate.is_colliding {
            self.gate.is_colliding = true;
            out_events.push(Event::CollisionStarted);
        }
    }

    fn release_gate(&mut self, out_events: &mut Vec<Event>) {
        if self.gate.is_colliding {
            self.gate.is_colliding = false;
            out_events.push(Event::CollisionReleased);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            for timer in world.scheduler.advance(dt) {
                world.fire(timer, out_events);
            }
        }
        Command::MovePlayer { delta, heading } => world.move_player(delta, heading, out_events),
        Command::ReleaseCollisionGate => world.release_gate(out_events),
        Command::DetectOverlap => world.detect_overlap(out_events),
        Command::BeginAttack => {
            world.player.attacking = true;
            let _ = world
                .scheduler
                .cancel(|timer| timer == Timer::AttackRecovery);
            world
                .scheduler
                .schedule(world.timings.attack_cooldown(), Timer::AttackRecovery);
            out_events.push(Event::PlayerAttacked);
        }
        Command::DamageCreature { amount } => world.damage_creature(amount, out_events),
        Command::RelocateCreature => world.relocate_creature(out_events),
        Command::MoveCreature { delta } => world.move_creature(delta, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{RoadNetwork, World};
    use road_skirmish_core::{CollisionGateSnapshot, CreatureSnapshot, PlayerSnapshot};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the road network.
    #[must_use]
    pub fn road_network(world: &World) -> &RoadNetwork {
        &world.network
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures the creature's current state, or `None` once it was defeated.
    #[must_use]
    pub fn creature(world: &World) -> Option<CreatureSnapshot> {
        world.creature.as_ref().map(super::Creature::snapshot)
    }

    /// Captures the collision gate.
    #[must_use]
    pub fn collision_gate(world: &World) -> CollisionGateSnapshot {
        world.gate.snapshot()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Total simulated time advanced so far.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.scheduler.now()
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: WorldPoint,
    facing: Option<Direction>,
    speed: f32,
    half_extents: HalfExtents,
    stats: CharacterStats,
    attacking: bool,
}

impl Player {
    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            facing: self.facing,
            speed: self.speed,
            half_extents: self.half_extents,
            stats: self.stats,
            attacking: self.attacking,
        }
    }
}

#[derive(Clone, Debug)]
struct Creature {
    position: WorldPoint,
    facing: Option<Direction>,
    speed: f32,
    half_extents: HalfExtents,
    stats: CreatureStats,
    can_move: bool,
}

impl Creature {
    fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            position: self.position,
            facing: self.facing,
            speed: self.speed,
            half_extents: self.half_extents,
            stats: self.stats,
            can_move: self.can_move,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct CollisionGate {
    is_colliding: bool,
    last_direction: Option<Direction>,
}

impl CollisionGate {
    const fn snapshot(&self) -> CollisionGateSnapshot {
        CollisionGateSnapshot {
            is_colliding: self.is_colliding,
            last_direction: self.last_direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use road_skirmish_core::{Axis, RoadSegment, TileKind};
    use std::time::Duration;

    fn world_with(config: &EncounterConfig) -> World {
        World::new(config).expect("valid configuration")
    }

    fn run(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, command, &mut events);
        }
        events
    }

    fn adjacent_config() -> EncounterConfig {
        let mut config = EncounterConfig::default();
        config.creature.spawn = WorldPoint::new(264.0, 336.0);
        config
    }

    #[test]
    fn rejects_empty_layouts() {
        let mut config = EncounterConfig::default();
        config.layout.clear();

        assert_eq!(World::new(&config).err(), Some(ConfigError::EmptyRoadNetwork));
    }

    #[test]
    fn rejects_disconnected_layouts() {
        let mut config = EncounterConfig::default();
        config.layout.push(RoadSegment::straight(
            WorldPoint::new(1_500.0, 1_500.0),
            TileKind::Horizontal,
            2,
        ));

        assert!(matches!(
            World::new(&config),
            Err(ConfigError::DisconnectedRoadNetwork { total, reachable }) if total == reachable + 2
        ));
    }

    #[test]
    fn rejects_player_spawned_off_road() {
        let mut config = EncounterConfig::default();
        config.player.spawn = WorldPoint::new(720.0, 480.0);

        assert_eq!(
            World::new(&config).err(),
            Some(ConfigError::SpawnOffRoad {
                agent: AgentKind::Player,
                x: 720.0,
                y: 480.0,
            })
        );
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let mut config = EncounterConfig::default();
        config.tile_length = 0.0;
        assert_eq!(
            World::new(&config).err(),
            Some(ConfigError::InvalidTileLength(0.0))
        );

        let mut config = EncounterConfig::default();
        config.position_memory = 0;
        assert_eq!(
            World::new(&config).err(),
            Some(ConfigError::ZeroPositionMemory)
        );
    }

    #[test]
    fn player_moves_along_the_road() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(
            &mut world,
            [Command::MovePlayer {
                delta: Displacement::new(5.0, 0.0),
                heading: Some(Direction::Right),
            }],
        );

        assert_eq!(
            events,
            vec![Event::PlayerMoved {
                from: WorldPoint::new(240.0, 336.0),
                to: WorldPoint::new(245.0, 336.0),
            }]
        );
        let player = query::player(&world);
        assert_eq!(player.facing, Some(Direction::Right));
        assert_eq!(
            query::collision_gate(&world).last_direction,
            Some(Direction::Right)
        );
    }

    #[test]
    fn off_road_player_moves_report_the_blocked_axis() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(
            &mut world,
            [Command::MovePlayer {
                delta: Displacement::new(0.0, -70.0),
                heading: Some(Direction::Up),
            }],
        );

        assert_eq!(
            events,
            vec![Event::MovementBlocked {
                agent: AgentKind::Player,
                axis: Axis::Vertical,
            }]
        );
        assert_eq!(query::player(&world).position, WorldPoint::new(240.0, 336.0));
        assert_eq!(query::player(&world).facing, Some(Direction::Up));
        assert_eq!(
            query::collision_gate(&world).last_direction,
            Some(Direction::Up)
        );
    }

    #[test]
    fn overlap_engages_the_gate_and_blocks_player_moves() {
        let mut world = world_with(&adjacent_config());
        let events = run(
            &mut world,
            [
                Command::DetectOverlap,
                Command::MovePlayer {
                    delta: Displacement::new(3.0, 0.0),
                    heading: Some(Direction::Right),
                },
            ],
        );

        assert_eq!(events, vec![Event::CollisionStarted]);
        assert_eq!(
            query::collision_gate(&world),
            CollisionGateSnapshot {
                is_colliding: true,
                last_direction: Some(Direction::Right),
            }
        );
        assert_eq!(query::player(&world).position, WorldPoint::new(240.0, 336.0));

        let events = run(&mut world, [Command::ReleaseCollisionGate]);
        assert_eq!(events, vec![Event::CollisionReleased]);
        assert!(!query::collision_gate(&world).is_colliding);
    }

    #[test]
    fn overlap_is_ignored_when_agents_are_apart() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(&mut world, [Command::DetectOverlap]);

        assert!(events.is_empty());
        assert!(!query::collision_gate(&world).is_colliding);
    }

    #[test]
    fn damage_subtracts_and_freezes_the_creature() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(&mut world, [Command::DamageCreature { amount: 7 }]);

        assert_eq!(
            events,
            vec![
                Event::CreatureDamaged {
                    amount: 7,
                    remaining_hp: 43,
                },
                Event::CreatureFrozen {
                    duration: Duration::from_secs(3),
                },
            ]
        );
        let creature = query::creature(&world).expect("creature alive");
        assert_eq!(creature.stats.hp, 43);
        assert!(!creature.can_move);

        let events = run(
            &mut world,
            [
                Command::Tick {
                    dt: Duration::from_millis(2_999),
                },
                Command::Tick {
                    dt: Duration::from_millis(1),
                },
            ],
        );
        assert!(events.contains(&Event::CreatureThawed));
        assert!(query::creature(&world).expect("creature alive").can_move);
    }

    #[test]
    fn zero_damage_leaves_the_creature_free_to_move() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(&mut world, [Command::DamageCreature { amount: 0 }]);

        assert_eq!(
            events,
            vec![Event::CreatureDamaged {
                amount: 0,
                remaining_hp: 50,
            }]
        );
        assert!(query::creature(&world).expect("creature alive").can_move);
    }

    #[test]
    fn frozen_creature_ignores_move_commands() {
        let mut world = world_with(&EncounterConfig::default());
        let _ = run(&mut world, [Command::DamageCreature { amount: 1 }]);

        let events = run(
            &mut world,
            [Command::MoveCreature {
                delta: Displacement::new(2.0, 0.0),
            }],
        );

        assert!(events.is_empty());
        assert_eq!(
            query::creature(&world).expect("creature alive").position,
            WorldPoint::new(624.0, 336.0)
        );
    }

    #[test]
    fn lethal_damage_removes_the_creature_and_cancels_its_timers() {
        let mut world = world_with(&adjacent_config());
        let _ = run(
            &mut world,
            [Command::DetectOverlap, Command::DamageCreature { amount: 1 }],
        );

        let events = run(&mut world, [Command::DamageCreature { amount: 49 }]);
        assert_eq!(
            events,
            vec![
                Event::CreatureDamaged {
                    amount: 49,
                    remaining_hp: 0,
                },
                Event::CollisionReleased,
                Event::CreatureDefeated,
            ]
        );
        assert!(query::creature(&world).is_none());

        let events = run(
            &mut world,
            [
                Command::Tick {
                    dt: Duration::from_secs(10),
                },
                Command::DamageCreature { amount: 5 },
                Command::DetectOverlap,
                Command::MoveCreature {
                    delta: Displacement::new(1.0, 0.0),
                },
            ],
        );
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_secs(10),
            }]
        );
    }

    #[test]
    fn attack_motion_recovers_after_the_cooldown() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(&mut world, [Command::BeginAttack]);

        assert_eq!(events, vec![Event::PlayerAttacked]);
        assert!(query::player(&world).attacking);

        let events = run(
            &mut world,
            [Command::Tick {
                dt: Duration::from_millis(1_000),
            }],
        );
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: Duration::from_millis(1_000),
                },
                Event::AttackRecovered,
            ]
        );
        assert!(!query::player(&world).attacking);
    }

    #[test]
    fn repeated_attacks_restart_the_cooldown() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(
            &mut world,
            [
                Command::BeginAttack,
                Command::Tick {
                    dt: Duration::from_millis(600),
                },
                Command::BeginAttack,
                Command::Tick {
                    dt: Duration::from_millis(600),
                },
            ],
        );

        assert!(!events.contains(&Event::AttackRecovered));
        assert!(query::player(&world).attacking);
    }

    #[test]
    fn direction_change_interval_fires_while_the_creature_lives() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(
            &mut world,
            [Command::Tick {
                dt: Duration::from_secs(4),
            }],
        );

        let fired = events
            .iter()
            .filter(|event| matches!(event, Event::WanderIntervalElapsed))
            .count();
        assert_eq!(fired, 2);
        assert_eq!(query::elapsed(&world), Duration::from_secs(4));
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn relocation_snaps_to_the_nearest_center_and_resets_the_gate() {
        let mut config = adjacent_config();
        config.creature.spawn = WorldPoint::new(255.0, 300.0);
        let mut world = world_with(&config);
        let _ = run(&mut world, [Command::DetectOverlap]);
        assert!(query::collision_gate(&world).is_colliding);

        let events = run(&mut world, [Command::RelocateCreature]);

        assert_eq!(
            events,
            vec![Event::CreatureRelocated {
                to: WorldPoint::new(240.0, 336.0),
            }]
        );
        assert_eq!(
            query::collision_gate(&world),
            CollisionGateSnapshot::default()
        );
    }

    #[test]
    fn creature_moves_record_facing() {
        let mut world = world_with(&EncounterConfig::default());
        let events = run(
            &mut world,
            [Command::MoveCreature {
                delta: Displacement::new(-2.0, 0.0),
            }],
        );

        assert_eq!(
            events,
            vec![Event::CreatureMoved {
                from: WorldPoint::new(624.0, 336.0),
                to: WorldPoint::new(622.0, 336.0),
            }]
        );
        assert_eq!(
            query::creature(&world).expect("creature alive").facing,
            Some(Direction::Left)
        );
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert!(!query::road_network(&world).is_empty());
    }
}
