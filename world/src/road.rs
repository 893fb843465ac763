//! Static road network answering proximity and adjacency queries.

use std::collections::VecDeque;

use road_skirmish_core::{Direction, Displacement, RoadSegment, Tile, TileKind, WorldPoint};

/// Walkable tiles expanded once from a declarative layout.
///
/// Agents move continuously, so every query snaps against the nearest tile
/// center rather than indexing a discrete cell. Tiles keep the order in which
/// the layout produced them; ties in proximity resolve to the earliest tile.
#[derive(Clone, Debug)]
pub struct RoadNetwork {
    tiles: Vec<Tile>,
    tile_length: f32,
    margin: f32,
}

impl RoadNetwork {
    /// Expands `layout` into concrete tiles.
    ///
    /// Straight segments produce one tile per `tile_length` along their axis,
    /// junctions a single tile. A tile whose origin is already taken is
    /// skipped so the first segment to claim an origin keeps it.
    #[must_use]
    pub fn build(layout: &[RoadSegment], tile_length: f32, margin: f32) -> Self {
        let mut tiles: Vec<Tile> = Vec::new();

        for segment in layout {
            let (step_x, step_y) = match segment.kind {
                TileKind::Horizontal => (tile_length, 0.0),
                TileKind::Vertical => (0.0, tile_length),
                TileKind::Corner | TileKind::Cross => (0.0, 0.0),
            };

            for index in 0..segment.tile_count() {
                let offset = index as f32;
                let origin = segment
                    .origin
                    .translate(Displacement::new(step_x * offset, step_y * offset));
                if tiles.iter().any(|tile| tile.origin() == origin) {
                    continue;
                }
                tiles.push(Tile::new(origin, segment.kind, tile_length));
            }
        }

        Self {
            tiles,
            tile_length,
            margin,
        }
    }

    /// Tiles in generation order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Reports whether the layout produced no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile whose center lies closest to `point`.
    #[must_use]
    pub fn nearest_tile(&self, point: WorldPoint) -> Option<&Tile> {
        self.nearest_index(point)
            .and_then(|index| self.tiles.get(index))
    }

    /// Center of the tile closest to `point`.
    #[must_use]
    pub fn snap(&self, point: WorldPoint) -> Option<WorldPoint> {
        self.nearest_tile(point).map(Tile::center)
    }

    /// Reports whether `point` lies within half a tile plus the margin of
    /// the nearest tile center.
    #[must_use]
    pub fn is_on_road(&self, point: WorldPoint) -> bool {
        self.nearest_tile(point)
            .map_or(false, |tile| point.distance(tile.center()) <= self.reach())
    }

    /// Directions whose one-tile neighbour of `point` is on-road.
    ///
    /// Directions come back in the fixed order left, right, up, down. The
    /// exact reverse of `exclude` is dropped, as is any direction whose
    /// neighbour lies closer than one tile to a remembered position.
    #[must_use]
    pub fn available_directions(
        &self,
        point: WorldPoint,
        recent: &[WorldPoint],
        exclude: Option<Direction>,
    ) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| exclude.map_or(true, |excluded| *direction != excluded.opposite()))
            .filter(|direction| {
                let neighbor = self.neighbor(point, *direction);
                self.is_on_road(neighbor)
                    && !recent
                        .iter()
                        .any(|visited| visited.distance(neighbor) < self.tile_length)
            })
            .collect()
    }

    /// Reports whether an agent arriving at `point` while travelling in
    /// `travel` could turn off somewhere other than straight ahead.
    #[must_use]
    pub fn has_branch(&self, point: WorldPoint, travel: Direction) -> bool {
        self.available_directions(point, &[], Some(travel))
            .into_iter()
            .any(|direction| direction != travel)
    }

    /// Point one tile away from `point` in `direction`.
    #[must_use]
    pub fn neighbor(&self, point: WorldPoint, direction: Direction) -> WorldPoint {
        point.translate(Displacement::along(direction, self.tile_length))
    }

    /// Number of tiles reachable from the first tile by single-tile steps.
    pub(crate) fn reachable_tile_count(&self) -> usize {
        if self.tiles.is_empty() {
            return 0;
        }

        let mut visited = vec![false; self.tiles.len()];
        let mut queue = VecDeque::new();
        visited[0] = true;
        queue.push_back(0_usize);
        let mut reached = 1;

        while let Some(current) = queue.pop_front() {
            let Some(tile) = self.tiles.get(current) else {
                continue;
            };
            let center = tile.center();

            for direction in Direction::ALL {
                let neighbor = self.neighbor(center, direction);
                if !self.is_on_road(neighbor) {
                    continue;
                }

                let Some(next) = self.nearest_index(neighbor) else {
                    continue;
                };
                if visited[next] {
                    continue;
                }

                visited[next] = true;
                reached += 1;
                queue.push_back(next);
            }
        }

        reached
    }

    fn nearest_index(&self, point: WorldPoint) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, tile) in self.tiles.iter().enumerate() {
            let distance = point.distance(tile.center());
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    fn reach(&self) -> f32 {
        self.tile_length / 2.0 + self.margin
    }
}
