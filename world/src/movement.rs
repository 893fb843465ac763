//! Movement gate that keeps agents on the road network.

use road_skirmish_core::{Axis, Displacement, WorldPoint};

use crate::RoadNetwork;

/// Result of validating a desired displacement against the road.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateOutcome {
    /// Portion of the displacement that may be applied.
    pub actual: Displacement,
    /// Whether a nonzero horizontal component was rejected.
    pub horizontal_blocked: bool,
    /// Whether a nonzero vertical component was rejected.
    pub vertical_blocked: bool,
}

impl GateOutcome {
    fn accepted(actual: Displacement) -> Self {
        Self {
            actual,
            horizontal_blocked: false,
            vertical_blocked: false,
        }
    }

    /// Axes whose components were rejected, horizontal first.
    pub fn blocked_axes(&self) -> impl Iterator<Item = Axis> {
        [
            (self.horizontal_blocked, Axis::Horizontal),
            (self.vertical_blocked, Axis::Vertical),
        ]
        .into_iter()
        .filter_map(|(blocked, axis)| blocked.then_some(axis))
    }
}

/// Decides how much of `desired` an agent at `position` may travel.
///
/// The whole displacement is accepted when it ends on-road. Otherwise each
/// axis is tested on its own, horizontal first and vertical from the
/// horizontally resolved position, and a component survives only if its
/// single-axis result stays on-road. Off-road movement is dropped rather
/// than corrected, so the returned displacement either lands on the road or
/// is zero.
#[must_use]
pub fn attempt_move(
    position: WorldPoint,
    desired: Displacement,
    network: &RoadNetwork,
) -> GateOutcome {
    if desired.is_zero() {
        return GateOutcome::accepted(Displacement::ZERO);
    }

    if network.is_on_road(position.translate(desired)) {
        return GateOutcome::accepted(desired);
    }

    let mut outcome = GateOutcome::accepted(Displacement::ZERO);

    let horizontal = desired.horizontal();
    if horizontal.dx() != 0.0 {
        if network.is_on_road(position.translate(horizontal)) {
            outcome.actual = horizontal;
        } else {
            outcome.horizontal_blocked = true;
        }
    }

    let vertical = desired.vertical();
    if vertical.dy() != 0.0 {
        let base = position.translate(outcome.actual);
        if network.is_on_road(base.translate(vertical)) {
            outcome.actual = outcome.actual.plus(vertical);
        } else {
            outcome.vertical_blocked = true;
        }
    }

    outcome
}
