//! Static configuration consumed when an encounter is constructed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CharacterStats, CreatureStats, Gender, HalfExtents, RoadSegment, TileKind, WorldPoint};

/// Side length of a road tile in the reference layout.
pub const DEFAULT_TILE_LENGTH: f32 = 96.0;

/// Distance beyond a tile's half-length still accepted as on-road.
pub const DEFAULT_ROAD_MARGIN: f32 = 10.0;

/// Number of recent creature positions remembered to suppress backtracking.
pub const DEFAULT_POSITION_MEMORY: usize = 5;

/// Complete description of an encounter: road, agents, and timings.
///
/// Every field falls back to the reference encounter so configuration files
/// only need to spell out what they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Side length of each square road tile in world units.
    pub tile_length: f32,
    /// Tolerance added to half a tile when testing whether a point is on-road.
    pub road_margin: f32,
    /// Road segments expanded into tiles at construction.
    pub layout: Vec<RoadSegment>,
    /// Player spawn, movement, and stat configuration.
    pub player: PlayerConfig,
    /// Creature spawn, movement, and stat configuration.
    pub creature: CreatureConfig,
    /// Fixed durations driving deferred events.
    pub timings: TimingConfig,
    /// Capacity of the creature's recent-position memory.
    pub position_memory: usize,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            tile_length: DEFAULT_TILE_LENGTH,
            road_margin: DEFAULT_ROAD_MARGIN,
            layout: reference_layout(),
            player: PlayerConfig::default(),
            creature: CreatureConfig::default(),
            timings: TimingConfig::default(),
            position_memory: DEFAULT_POSITION_MEMORY,
        }
    }
}

/// Player agent configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting position.
    pub spawn: WorldPoint,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Collider half extents.
    pub half_extents: HalfExtents,
    /// Starting stat sheet.
    pub stats: CharacterStats,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: WorldPoint::new(240.0, 336.0),
            speed: 200.0,
            half_extents: HalfExtents::new(20.0, 28.0),
            stats: CharacterStats {
                gender: Gender::Male,
                hp: 100,
                mp: 50,
                atk: 10,
                def: 5,
                agi: 8,
                luc: 3,
                level: 1,
            },
        }
    }
}

/// Creature agent configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    /// Starting position.
    pub spawn: WorldPoint,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Collider half extents.
    pub half_extents: HalfExtents,
    /// Starting stat sheet.
    pub stats: CreatureStats,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            spawn: WorldPoint::new(624.0, 336.0),
            speed: 100.0,
            half_extents: HalfExtents::new(18.0, 18.0),
            stats: CreatureStats {
                hp: 50,
                atk: 8,
                def: 3,
            },
        }
    }
}

/// Fixed durations, expressed in milliseconds, that drive deferred events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before the player's attack motion reverts to idle.
    pub attack_cooldown_ms: u64,
    /// Length of the creature's movement freeze after taking damage.
    pub damage_freeze_ms: u64,
    /// Interval between forced wander re-selections.
    pub direction_change_ms: u64,
}

impl TimingConfig {
    /// Delay before the attack motion reverts to idle.
    #[must_use]
    pub const fn attack_cooldown(&self) -> Duration {
        Duration::from_millis(self.attack_cooldown_ms)
    }

    /// Length of the damage freeze.
    #[must_use]
    pub const fn damage_freeze(&self) -> Duration {
        Duration::from_millis(self.damage_freeze_ms)
    }

    /// Interval between forced wander re-selections.
    #[must_use]
    pub const fn direction_change(&self) -> Duration {
        Duration::from_millis(self.direction_change_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            attack_cooldown_ms: 1_000,
            damage_freeze_ms: 3_000,
            direction_change_ms: 2_000,
        }
    }
}

/// Road layout used by the reference encounter.
///
/// Two horizontal avenues at rows 288 and 576 are joined by a crossing
/// column at x = 384 and a loop closing on the right at x = 864. Junctions
/// are listed before the runs that pass them so they keep their kind.
#[must_use]
pub fn reference_layout() -> Vec<RoadSegment> {
    let tile = DEFAULT_TILE_LENGTH;
    let at = |column: f32, row: f32| WorldPoint::new(column * tile, row * tile);

    vec![
        RoadSegment::junction(at(4.0, 3.0), TileKind::Cross),
        RoadSegment::junction(at(4.0, 6.0), TileKind::Cross),
        RoadSegment::junction(at(9.0, 3.0), TileKind::Corner),
        RoadSegment::junction(at(9.0, 6.0), TileKind::Corner),
        RoadSegment::straight(at(0.0, 3.0), TileKind::Horizontal, 4),
        RoadSegment::straight(at(5.0, 3.0), TileKind::Horizontal, 4),
        RoadSegment::straight(at(0.0, 6.0), TileKind::Horizontal, 4),
        RoadSegment::straight(at(5.0, 6.0), TileKind::Horizontal, 4),
        RoadSegment::straight(at(4.0, 0.0), TileKind::Vertical, 3),
        RoadSegment::straight(at(4.0, 4.0), TileKind::Vertical, 2),
        RoadSegment::straight(at(9.0, 4.0), TileKind::Vertical, 2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_reference_values() {
        let config: EncounterConfig = toml::from_str(
            r#"
                position_memory = 3

                [creature]
                speed = 150.0

                [creature.stats]
                hp = 20
                atk = 4
                def = 15

                [timings]
                damage_freeze_ms = 500
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.position_memory, 3);
        assert_eq!(config.creature.speed, 150.0);
        assert_eq!(config.creature.stats.def, 15);
        assert_eq!(config.creature.spawn, CreatureConfig::default().spawn);
        assert_eq!(config.timings.damage_freeze(), Duration::from_millis(500));
        assert_eq!(config.timings.attack_cooldown(), Duration::from_secs(1));
        assert_eq!(config.layout, reference_layout());
        assert_eq!(config.tile_length, DEFAULT_TILE_LENGTH);
    }

    #[test]
    fn layout_segments_parse_from_toml() {
        let config: EncounterConfig = toml::from_str(
            r#"
                [[layout]]
                origin = { x = 0.0, y = 0.0 }
                kind = "horizontal"
                length = 3

                [[layout]]
                origin = { x = 288.0, y = 0.0 }
                kind = "corner"
            "#,
        )
        .expect("layout parses");

        assert_eq!(
            config.layout,
            vec![
                RoadSegment::straight(WorldPoint::new(0.0, 0.0), TileKind::Horizontal, 3),
                RoadSegment::junction(WorldPoint::new(288.0, 0.0), TileKind::Corner),
            ]
        );
    }

    #[test]
    fn reference_spawns_sit_on_tile_centers() {
        let half = DEFAULT_TILE_LENGTH / 2.0;
        for spawn in [PlayerConfig::default().spawn, CreatureConfig::default().spawn] {
            assert_eq!((spawn.x() - half) % DEFAULT_TILE_LENGTH, 0.0);
            assert_eq!((spawn.y() - half) % DEFAULT_TILE_LENGTH, 0.0);
        }
    }
}
