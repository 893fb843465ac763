#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wander system that steers the creature along the road network.
//!
//! The creature picks a random open direction, travels until it reaches the
//! next junction or the end of the road, and then picks again. A short
//! memory of recent positions keeps it from immediately doubling back, and
//! the world's periodic wander interval forces a fresh choice even in the
//! middle of a straight run.

use std::{collections::VecDeque, time::Duration};

use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use road_skirmish_core::{
    Command, CreatureSnapshot, Direction, Displacement, Event, PlayerSnapshot, WorldPoint,
};
use road_skirmish_world::RoadNetwork;
use tracing::{debug, trace};

/// Distance on each axis within which the creature counts as having arrived.
const ARRIVAL_TOLERANCE: f32 = 5.0;

/// Longest run, in tiles, followed before a new direction is chosen.
const MAX_PATH_STEPS: usize = 20;

/// Travel time used to probe escape routes while overlapping the player.
const EVASION_PROBE: Duration = Duration::from_millis(100);

/// Configuration parameters required to construct the wander system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    position_memory: usize,
}

impl Config {
    /// Creates a configuration remembering `position_memory` recent positions.
    #[must_use]
    pub const fn new(position_memory: usize) -> Self {
        Self { position_memory }
    }
}

/// Coarse state of the wander algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WanderPhase {
    /// No open direction was found; re-evaluated every tick.
    #[default]
    Idle,
    /// Heading towards the current path end.
    Traveling,
    /// Waiting for the world to snap the creature back onto the road.
    Relocating,
}

/// Pure system that emits creature movement commands.
#[derive(Debug)]
pub struct Wander<R = ChaCha8Rng> {
    rng: R,
    memory: usize,
    recent: VecDeque<WorldPoint>,
    path_end: Option<WorldPoint>,
    travel: Option<Direction>,
    phase: WanderPhase,
}

impl Wander<ChaCha8Rng> {
    /// Creates a wander system drawing its choices from a seeded ChaCha stream.
    #[must_use]
    pub fn from_seed(config: Config, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Wander<R> {
    /// Creates a wander system that draws its choices from `rng`.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        let memory = config.position_memory.max(1);
        Self {
            rng,
            memory,
            recent: VecDeque::with_capacity(memory),
            path_end: None,
            travel: None,
            phase: WanderPhase::Idle,
        }
    }

    /// Current phase of the algorithm.
    #[must_use]
    pub const fn phase(&self) -> WanderPhase {
        self.phase
    }

    /// Point the creature is currently travelling towards.
    #[must_use]
    pub const fn path_end(&self) -> Option<WorldPoint> {
        self.path_end
    }

    /// Direction of the current run, if any.
    #[must_use]
    pub const fn travel_direction(&self) -> Option<Direction> {
        self.travel
    }

    /// Remembered positions, oldest first.
    pub fn recent_positions(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.recent.iter().copied()
    }

    /// Consumes the tick's events and immutable views to emit creature commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        creature: Option<&CreatureSnapshot>,
        player: &PlayerSnapshot,
        network: &RoadNetwork,
        out: &mut Vec<Command>,
    ) {
        let Some(creature) = creature else {
            self.reset(WanderPhase::Idle);
            return;
        };

        if !creature.can_move {
            return;
        }

        let mut dt = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt: step } => dt = dt.saturating_add(*step),
                Event::WanderIntervalElapsed => {
                    trace!("wander interval elapsed; forgetting the current path");
                    self.clear_path();
                }
                _ => {}
            }
        }

        let position = creature.position;
        if !network.is_on_road(position) {
            debug!(?position, "creature strayed off the road");
            self.reset(WanderPhase::Relocating);
            out.push(Command::RelocateCreature);
            return;
        }

        if creature.bounds().overlaps(&player.bounds()) {
            self.evade(creature, player, network, dt, out);
            return;
        }

        if self.has_arrived(position) {
            self.choose_path(position, network);
        }

        let Some(direction) = self.travel else {
            return;
        };

        let mut distance = creature.speed * dt.as_secs_f32();
        if let Some(end) = self.path_end {
            let remaining = distance_ahead(position, end, direction);
            if remaining > 0.0 {
                distance = distance.min(remaining);
            }
        }

        let delta = Displacement::along(direction, distance);
        if delta.is_zero() {
            return;
        }

        let destination = position.translate(delta);
        if network.is_on_road(destination) {
            out.push(Command::MoveCreature { delta });
            self.remember(destination);
        } else {
            trace!(?direction, "run ended off the road; forgetting the current path");
            self.clear_path();
        }
    }

    fn has_arrived(&self, position: WorldPoint) -> bool {
        self.path_end.map_or(true, |end| {
            (position.x() - end.x()).abs() < ARRIVAL_TOLERANCE
                && (position.y() - end.y()).abs() < ARRIVAL_TOLERANCE
        })
    }

    fn choose_path(&mut self, position: WorldPoint, network: &RoadNetwork) {
        let recent: Vec<WorldPoint> = self.recent.iter().copied().collect();
        let available = network.available_directions(position, &recent, None);

        if available.is_empty() {
            trace!(?position, "no open direction; idling");
            self.travel = None;
            self.path_end = None;
            self.phase = WanderPhase::Idle;
            return;
        }

        let direction = available[self.rng.gen_range(0..available.len())];
        let end = trace_path(network, position, direction);
        debug!(?direction, ?end, options = available.len(), "creature chose a new run");

        self.travel = Some(direction);
        self.path_end = Some(end);
        self.phase = WanderPhase::Traveling;
        self.remember(position);
    }

    fn evade(
        &mut self,
        creature: &CreatureSnapshot,
        player: &PlayerSnapshot,
        network: &RoadNetwork,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let probe = creature.speed * EVASION_PROBE.as_secs_f32();
        let player_bounds = player.bounds();
        let escape = Direction::ALL.into_iter().find(|direction| {
            let candidate = creature
                .position
                .translate(Displacement::along(*direction, probe));
            !creature
                .bounds()
                .recentered(candidate)
                .overlaps(&player_bounds)
        });

        let Some(direction) = escape else {
            trace!("creature is boxed in by the player");
            return;
        };

        let delta = Displacement::along(direction, creature.speed * dt.as_secs_f32());
        if delta.is_zero() || !network.is_on_road(creature.position.translate(delta)) {
            return;
        }

        trace!(?direction, "creature sidesteps the player");
        out.push(Command::MoveCreature { delta });
    }

    fn remember(&mut self, position: WorldPoint) {
        while self.recent.len() >= self.memory {
            let _ = self.recent.pop_front();
        }
        self.recent.push_back(position);
    }

    fn clear_path(&mut self) {
        self.path_end = None;
        self.recent.clear();
    }

    fn reset(&mut self, phase: WanderPhase) {
        self.clear_path();
        self.travel = None;
        self.phase = phase;
    }
}

/// Walks tile by tile from `start` towards `direction` and returns where the
/// run ends: the tile before the first junction, the last on-road tile
/// before the road stops, or the tile reached after the step limit.
fn trace_path(network: &RoadNetwork, start: WorldPoint, direction: Direction) -> WorldPoint {
    let mut end = start;
    for _ in 0..MAX_PATH_STEPS {
        let next = network.neighbor(end, direction);
        if !network.is_on_road(next) || network.has_branch(next, direction) {
            break;
        }
        end = next;
    }
    end
}

/// Signed distance from `position` to `end` measured along `direction`.
fn distance_ahead(position: WorldPoint, end: WorldPoint, direction: Direction) -> f32 {
    let gap = position.displacement_to(end);
    let (x, y) = direction.unit();
    gap.dx() * x + gap.dy() * y
}
