#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Road Skirmish encounter engine.
//!
//! This crate defines the message surface that connects the encounter loop,
//! the authoritative world, and pure systems. Systems submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{
    reference_layout, CreatureConfig, EncounterConfig, PlayerConfig, TimingConfig,
    DEFAULT_POSITION_MEMORY, DEFAULT_ROAD_MARGIN, DEFAULT_TILE_LENGTH,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Road Skirmish.";

/// Location expressed in continuous world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, increasing to the right.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, increasing downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the point shifted by the provided displacement.
    #[must_use]
    pub fn translate(self, delta: Displacement) -> Self {
        Self::new(self.x + delta.dx, self.y + delta.dy)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Displacement that carries `self` onto `other`.
    #[must_use]
    pub fn displacement_to(self, other: WorldPoint) -> Displacement {
        Displacement::new(other.x - self.x, other.y - self.y)
    }
}

/// Relative movement expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    dx: f32,
    dy: f32,
}

impl Displacement {
    /// Displacement that leaves a position unchanged.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a displacement from explicit components.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Displacement of `distance` units travelling in `direction`.
    #[must_use]
    pub fn along(direction: Direction, distance: f32) -> Self {
        let (x, y) = direction.unit();
        Self::new(x * distance, y * distance)
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }

    /// Reports whether both components are exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Keeps only the horizontal component.
    #[must_use]
    pub const fn horizontal(self) -> Self {
        Self::new(self.dx, 0.0)
    }

    /// Keeps only the vertical component.
    #[must_use]
    pub const fn vertical(self) -> Self {
        Self::new(0.0, self.dy)
    }

    /// Sums two displacements component-wise.
    #[must_use]
    pub fn plus(self, other: Displacement) -> Self {
        Self::new(self.dx + other.dx, self.dy + other.dy)
    }

    /// Dominant cardinal direction of the displacement, if it moves at all.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        if self.is_zero() {
            return None;
        }

        if self.dx.abs() >= self.dy.abs() {
            if self.dx < 0.0 {
                Some(Direction::Left)
            } else {
                Some(Direction::Right)
            }
        } else if self.dy < 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
    /// Movement toward decreasing y.
    Up,
    /// Movement toward increasing y.
    Down,
}

impl Direction {
    /// Every direction in the fixed probing order left, right, up, down.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector pointing along the direction.
    #[must_use]
    pub const fn unit(self) -> (f32, f32) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }
}

/// World axes used when reporting partially rejected movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

/// Identifies one of the two agents taking part in an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentKind {
    /// Agent steered by the player's directional intent.
    Player,
    /// Autonomous agent driven by the wander algorithm.
    Creature,
}

/// Directional tag carried by every road tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Straight road running along the x axis.
    Horizontal,
    /// Straight road running along the y axis.
    Vertical,
    /// Ninety degree bend.
    Corner,
    /// Intersection of several roads.
    Cross,
}

impl TileKind {
    /// Reports whether segments of this kind expand into straight runs.
    #[must_use]
    pub const fn is_straight(self) -> bool {
        matches!(self, Self::Horizontal | Self::Vertical)
    }
}

/// Unit cell of the walkable road network.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    origin: WorldPoint,
    center: WorldPoint,
    kind: TileKind,
}

impl Tile {
    /// Creates a tile anchored at its upper-left `origin`.
    #[must_use]
    pub fn new(origin: WorldPoint, kind: TileKind, tile_length: f32) -> Self {
        let half = tile_length / 2.0;
        Self {
            origin,
            center: WorldPoint::new(origin.x() + half, origin.y() + half),
            kind,
        }
    }

    /// Upper-left corner of the tile.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Geometric center of the tile.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        self.center
    }

    /// Directional tag of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }
}

/// Declarative road layout entry expanded into concrete tiles.
///
/// Straight segments run `length` tiles from `origin` along their axis
/// (`+x` for horizontal, `+y` for vertical). Corners and crosses always
/// produce a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Upper-left corner of the first tile.
    pub origin: WorldPoint,
    /// Directional tag applied to every generated tile.
    pub kind: TileKind,
    /// Number of tiles in a straight run; absent means one.
    #[serde(default)]
    pub length: Option<u32>,
}

impl RoadSegment {
    /// Straight run of `length` tiles.
    #[must_use]
    pub const fn straight(origin: WorldPoint, kind: TileKind, length: u32) -> Self {
        Self {
            origin,
            kind,
            length: Some(length),
        }
    }

    /// Single junction tile.
    #[must_use]
    pub const fn junction(origin: WorldPoint, kind: TileKind) -> Self {
        Self {
            origin,
            kind,
            length: None,
        }
    }

    /// Number of tiles the segment expands into.
    #[must_use]
    pub fn tile_count(&self) -> u32 {
        if self.kind.is_straight() {
            self.length.unwrap_or(1)
        } else {
            1
        }
    }
}

/// Half-size of an agent's axis-aligned collider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HalfExtents {
    /// Half of the collider width.
    pub half_width: f32,
    /// Half of the collider height.
    pub half_height: f32,
}

impl HalfExtents {
    /// Creates new half extents.
    #[must_use]
    pub const fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width,
            half_height,
        }
    }
}

/// Axis-aligned collider centered on an agent's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    center: WorldPoint,
    extents: HalfExtents,
}

impl Bounds {
    /// Creates a collider centered at `center`.
    #[must_use]
    pub const fn new(center: WorldPoint, extents: HalfExtents) -> Self {
        Self { center, extents }
    }

    /// Returns the same collider moved to `center`.
    #[must_use]
    pub const fn recentered(self, center: WorldPoint) -> Self {
        Self::new(center, self.extents)
    }

    /// Reports whether the two colliders share interior area.
    ///
    /// Colliders that merely touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let reach_x = self.extents.half_width + other.extents.half_width;
        let reach_y = self.extents.half_height + other.extents.half_height;
        (self.center.x() - other.center.x()).abs() < reach_x
            && (self.center.y() - other.center.y()).abs() < reach_y
    }
}

/// Gender recorded on the character sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male character.
    Male,
    /// Female character.
    Female,
}

/// Full stat sheet carried by the player character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Gender of the character.
    pub gender: Gender,
    /// Remaining hit points.
    pub hp: u32,
    /// Remaining mana points.
    pub mp: u32,
    /// Attack rating.
    pub atk: u32,
    /// Defense rating.
    pub def: u32,
    /// Agility rating.
    pub agi: u32,
    /// Luck rating.
    pub luc: u32,
    /// Experience level.
    pub level: u32,
}

/// Reduced stat sheet carried by the creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStats {
    /// Remaining hit points.
    pub hp: u32,
    /// Attack rating.
    pub atk: u32,
    /// Defense rating.
    pub def: u32,
}

/// Combat view over either stat sheet.
pub trait StatBlock {
    /// Remaining hit points.
    fn hp(&self) -> u32;

    /// Attack rating used when this block deals damage.
    fn attack(&self) -> u32;

    /// Defense rating used when this block receives damage.
    fn defense(&self) -> u32;

    /// Subtracts `amount` hit points, saturating at zero, and returns the remainder.
    fn take_damage(&mut self, amount: u32) -> u32;

    /// Reports whether the hit points are exhausted.
    fn is_defeated(&self) -> bool {
        self.hp() == 0
    }
}

impl StatBlock for CharacterStats {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn attack(&self) -> u32 {
        self.atk
    }

    fn defense(&self) -> u32 {
        self.def
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }
}

impl StatBlock for CreatureStats {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn attack(&self) -> u32 {
        self.atk
    }

    fn defense(&self) -> u32 {
        self.def
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }
}

/// Already-resolved directional input for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionalIntent {
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
    /// Up is held.
    pub up: bool,
    /// Down is held.
    pub down: bool,
}

impl DirectionalIntent {
    /// Intent with no direction held.
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    /// Intent holding exactly one direction.
    #[must_use]
    pub const fn toward(direction: Direction) -> Self {
        Self {
            left: matches!(direction, Direction::Left),
            right: matches!(direction, Direction::Right),
            up: matches!(direction, Direction::Up),
            down: matches!(direction, Direction::Down),
        }
    }

    /// Active horizontal direction; left wins when both are held.
    #[must_use]
    pub const fn horizontal(&self) -> Option<Direction> {
        if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Active vertical direction; up wins when both are held.
    #[must_use]
    pub const fn vertical(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Discrete heading for the frame; the vertical component takes precedence.
    #[must_use]
    pub const fn heading(&self) -> Option<Direction> {
        match self.vertical() {
            Some(direction) => Some(direction),
            None => self.horizontal(),
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation clock and fires due timers.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player move by the provided displacement.
    MovePlayer {
        /// Desired displacement before road validation.
        delta: Displacement,
        /// Discrete heading derived from the frame's intent.
        heading: Option<Direction>,
    },
    /// Disengages the collision gate so the player may back away.
    ReleaseCollisionGate,
    /// Tests the agents' colliders and engages the collision gate on overlap.
    DetectOverlap,
    /// Starts the player's attack motion and its recovery cooldown.
    BeginAttack,
    /// Subtracts hit points from the creature.
    DamageCreature {
        /// Resolved damage, already reduced by the creature's defense.
        amount: u32,
    },
    /// Snaps the creature onto the nearest road tile center.
    RelocateCreature,
    /// Requests that the creature move by the provided displacement.
    MoveCreature {
        /// Desired displacement before road validation.
        delta: Displacement,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player changed position.
    PlayerMoved {
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// Reports that one axis of a requested move left the road and was dropped.
    MovementBlocked {
        /// Agent whose movement was constrained.
        agent: AgentKind,
        /// Axis whose component was rejected.
        axis: Axis,
    },
    /// The agents' colliders overlapped and the collision gate engaged.
    CollisionStarted,
    /// The collision gate was disengaged.
    CollisionReleased,
    /// The player started an attack motion.
    PlayerAttacked,
    /// The attack cooldown elapsed and the player returned to idle.
    AttackRecovered,
    /// The creature received a resolved hit.
    CreatureDamaged {
        /// Hit points removed by the hit.
        amount: u32,
        /// Hit points left after the hit.
        remaining_hp: u32,
    },
    /// The creature's autonomous movement was suspended.
    CreatureFrozen {
        /// Length of the suspension.
        duration: Duration,
    },
    /// The creature's autonomous movement resumed.
    CreatureThawed,
    /// The creature ran out of hit points and left the simulation.
    CreatureDefeated,
    /// The creature was snapped back onto the road network.
    CreatureRelocated {
        /// Tile center the creature now occupies.
        to: WorldPoint,
    },
    /// Confirms that the creature changed position.
    CreatureMoved {
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// The periodic wander re-selection interval elapsed.
    WanderIntervalElapsed,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: WorldPoint,
    /// Most recent heading, if the player ever moved.
    pub facing: Option<Direction>,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Collider half extents.
    pub half_extents: HalfExtents,
    /// Current stat sheet.
    pub stats: CharacterStats,
    /// Whether the attack motion is still playing.
    pub attacking: bool,
}

impl PlayerSnapshot {
    /// Collider at the player's current position.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.half_extents)
    }
}

/// Immutable representation of the creature used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CreatureSnapshot {
    /// Current position.
    pub position: WorldPoint,
    /// Direction of the most recent move, if any.
    pub facing: Option<Direction>,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Collider half extents.
    pub half_extents: HalfExtents,
    /// Current stat sheet.
    pub stats: CreatureStats,
    /// Whether autonomous movement is currently permitted.
    pub can_move: bool,
}

impl CreatureSnapshot {
    /// Collider at the creature's current position.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.half_extents)
    }
}

/// Read-only view of the collision gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollisionGateSnapshot {
    /// Whether player movement is currently suppressed.
    pub is_colliding: bool,
    /// Heading of the player's most recent actual move.
    pub last_direction: Option<Direction>,
}
