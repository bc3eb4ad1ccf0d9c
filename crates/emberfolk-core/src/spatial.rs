//! Spatial lookup - the black-box "what is near me" collaborator.
//!
//! Producers and scorers are read-only consumers of this interface; the
//! engine rebuilds the provided [`LinearIndex`] from `Position` components
//! once per tick. Anything smarter (grids, quadtrees) can be swapped in
//! behind the same trait.

use hecs::{Entity, World};

use crate::components::{Position, Rect, Vec2};

/// Read-only spatial queries. Results come back in ascending entity-id order
/// so downstream iteration stays deterministic.
pub trait SpatialIndex {
    fn by_radius(&self, center: Vec2, radius: f32) -> Vec<Entity>;
    fn by_rect(&self, rect: Rect) -> Vec<Entity>;
    fn all(&self) -> Vec<Entity>;
}

/// Naive linear-scan index over every positioned entity.
#[derive(Debug, Default)]
pub struct LinearIndex {
    entries: Vec<(Entity, Vec2)>,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every positioned entity, sorted by id bits.
    pub fn rebuild(&mut self, world: &World) {
        self.entries.clear();
        for (entity, position) in world.query::<&Position>().iter() {
            self.entries.push((entity, position.pos));
        }
        self.entries.sort_by_key(|(entity, _)| entity.to_bits());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SpatialIndex for LinearIndex {
    fn by_radius(&self, center: Vec2, radius: f32) -> Vec<Entity> {
        let r2 = radius * radius;
        self.entries
            .iter()
            .filter(|(_, pos)| pos.distance_squared(&center) <= r2)
            .map(|(entity, _)| *entity)
            .collect()
    }

    fn by_rect(&self, rect: Rect) -> Vec<Entity> {
        self.entries
            .iter()
            .filter(|(_, pos)| rect.contains(pos))
            .map(|(entity, _)| *entity)
            .collect()
    }

    fn all(&self) -> Vec<Entity> {
        self.entries.iter().map(|(entity, _)| *entity).collect()
    }
}
