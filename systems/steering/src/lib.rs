#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure steering system that converts directional intent into player moves.

use std::time::Duration;

use road_skirmish_core::{
    CollisionGateSnapshot, Command, DirectionalIntent, Displacement, Event, PlayerSnapshot,
};

/// Pure system that resolves the player's intent against the collision gate.
///
/// While the gate is engaged the player may only move in a heading other than
/// the last one recorded; doing so releases the gate and the move proceeds in
/// the same tick. Any other move is still sent so the world can record its
/// heading, and the world refuses the displacement.
#[derive(Debug, Default)]
pub struct Steering;

impl Steering {
    /// Consumes the tick's events and the frame's intent to emit player commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        intent: DirectionalIntent,
        player: &PlayerSnapshot,
        gate: CollisionGateSnapshot,
        out: &mut Vec<Command>,
    ) {
        let Some(heading) = intent.heading() else {
            return;
        };

        if gate.is_colliding && gate.last_direction.is_some_and(|last| last != heading) {
            out.push(Command::ReleaseCollisionGate);
        }

        let step = player.speed * elapsed(events).as_secs_f32();
        out.push(Command::MovePlayer {
            delta: desired_delta(intent, step),
            heading: Some(heading),
        });
    }
}

/// Both held axes scaled by `step`; conflicting keys resolve per axis first.
fn desired_delta(intent: DirectionalIntent, step: f32) -> Displacement {
    let horizontal = intent
        .horizontal()
        .map_or(Displacement::ZERO, |direction| {
            Displacement::along(direction, step)
        });
    let vertical = intent
        .vertical()
        .map_or(Displacement::ZERO, |direction| {
            Displacement::along(direction, step)
        });
    horizontal.plus(vertical)
}

fn elapsed(events: &[Event]) -> Duration {
    events.iter().fold(Duration::ZERO, |total, event| match event {
        Event::TimeAdvanced { dt } => total.saturating_add(*dt),
        _ => total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use road_skirmish_core::Direction;

    #[test]
    fn diagonal_intent_moves_both_axes() {
        let intent = DirectionalIntent {
            left: true,
            right: false,
            up: false,
            down: true,
        };

        assert_eq!(desired_delta(intent, 4.0), Displacement::new(-4.0, 4.0));
    }

    #[test]
    fn conflicting_keys_cancel_to_the_preferred_direction() {
        let intent = DirectionalIntent {
            left: true,
            right: true,
            up: false,
            down: false,
        };

        assert_eq!(desired_delta(intent, 2.0), Displacement::new(-2.0, 0.0));
        assert_eq!(
            desired_delta(DirectionalIntent::toward(Direction::Down), 2.0),
            Displacement::new(0.0, 2.0)
        );
    }

    #[test]
    fn elapsed_sums_every_time_advance() {
        let events = [
            Event::TimeAdvanced {
                dt: Duration::from_millis(10),
            },
            Event::CollisionStarted,
            Event::TimeAdvanced {
                dt: Duration::from_millis(6),
            },
        ];

        assert_eq!(elapsed(&events), Duration::from_millis(16));
        assert_eq!(elapsed(&[]), Duration::ZERO);
    }
}
