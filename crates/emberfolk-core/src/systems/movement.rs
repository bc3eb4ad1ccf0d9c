//! Movement system - walks entities toward destinations set by executors.

use hecs::World;

use crate::components::{Movement, Position};

/// Arrival tolerance in world units.
const ARRIVE_EPSILON: f32 = 0.1;

/// Advance every moving entity; remove Movement on arrival.
pub fn movement_system(world: &mut World, delta_hours: f64) {
    let mut arrived = Vec::new();

    for (entity, (position, movement)) in world.query_mut::<(&mut Position, &Movement)>() {
        let diff = movement.destination - position.pos;
        let distance = diff.length();
        let step = movement.speed * delta_hours as f32;

        if distance < ARRIVE_EPSILON || step >= distance {
            position.pos = movement.destination;
            arrived.push(entity);
        } else {
            position.pos = position.pos + diff.normalize() * step;
        }
    }

    for entity in arrived {
        let _ = world.remove_one::<Movement>(entity);
    }
}
