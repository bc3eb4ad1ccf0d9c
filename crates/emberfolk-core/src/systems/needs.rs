//! Needs and world-object upkeep - the slow clocks that make tasks appear.

use hecs::World;

use crate::components::{Agent, Bonfire, Bush, Corpse, Needs};

/// Decay agent needs over time (values creep toward 1.0).
pub fn needs_system(world: &mut World, delta_hours: f64) {
    for (_, (_, needs)) in world.query_mut::<(&Agent, &mut Needs)>() {
        needs.decay(delta_hours as f32);
    }
}

/// Advance world objects: fires burn down, bushes regrow, corpses rot.
pub fn upkeep_system(world: &mut World, delta_hours: f64) {
    let hours = delta_hours as f32;
    for (_, fire) in world.query_mut::<&mut Bonfire>() {
        fire.burn(hours);
    }
    for (_, bush) in world.query_mut::<&mut Bush>() {
        bush.regrow(hours);
    }
    for (_, corpse) in world.query_mut::<&mut Corpse>() {
        corpse.rot(hours);
    }
}
