//! Spawn helpers - populate a world with tribes and their surroundings.
//!
//! Randomness lives here and in executors only; producers and scorers stay
//! deterministic.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{
    Age, Agent, AgentKind, Bonfire, Bush, Corpse, Inventory, Name, Needs, Position, Storage, Tree,
    TribeId, Vec2,
};

/// Jitter a position within `spread` of a center point.
fn scatter(rng: &mut impl Rng, center: Vec2, spread: f32) -> Position {
    Position::new(
        center.x + rng.gen_range(-spread..=spread),
        center.y + rng.gen_range(-spread..=spread),
    )
}

/// Spawn an adult human with mild random need levels.
pub fn spawn_human(world: &mut World, rng: &mut impl Rng, home: Vec2, tribe: TribeId) -> Entity {
    world.spawn((
        Agent::new(AgentKind::Human).with_tribe(tribe),
        Age::new(rng.gen_range(16.0..50.0)),
        Needs {
            hunger: rng.gen_range(0.0..0.4),
            cold: rng.gen_range(0.0..0.3),
            energy: rng.gen_range(0.0..0.2),
        },
        Inventory::new(4),
        scatter(rng, home, 4.0),
    ))
}

/// Spawn a child: bids on far fewer task kinds.
pub fn spawn_child(world: &mut World, rng: &mut impl Rng, home: Vec2, tribe: TribeId) -> Entity {
    world.spawn((
        Agent::new(AgentKind::Human).with_tribe(tribe),
        Age::new(rng.gen_range(2.0..12.0)),
        Needs::default(),
        Inventory::new(2),
        scatter(rng, home, 4.0),
    ))
}

pub fn spawn_animal(world: &mut World, rng: &mut impl Rng, home: Vec2) -> Entity {
    world.spawn((
        Agent::new(AgentKind::Animal),
        Age::new(rng.gen_range(1.0..8.0)),
        Needs {
            hunger: rng.gen_range(0.0..0.5),
            ..Default::default()
        },
        scatter(rng, home, 10.0),
    ))
}

pub fn spawn_bush(world: &mut World, rng: &mut impl Rng, near: Vec2) -> Entity {
    let stock = rng.gen_range(2..=5);
    world.spawn((Bush::new(stock, 5), scatter(rng, near, 8.0)))
}

pub fn spawn_tree(world: &mut World, rng: &mut impl Rng, near: Vec2) -> Entity {
    let wood = rng.gen_range(2..=4);
    world.spawn((Tree::new(wood), scatter(rng, near, 12.0)))
}

pub fn spawn_bonfire(world: &mut World, at: Vec2) -> Entity {
    world.spawn((Bonfire::new(12.0), Position::new(at.x, at.y)))
}

pub fn spawn_storage(world: &mut World, at: Vec2) -> Entity {
    world.spawn((Storage::new(30), Position::new(at.x, at.y)))
}

pub fn spawn_corpse(world: &mut World, at: Vec2) -> Entity {
    world.spawn((Corpse::new(), Position::new(at.x, at.y)))
}

/// A small named camp: one fire, one store, humans around them, food and
/// wood within walking distance.
pub fn spawn_camp(
    world: &mut World,
    rng: &mut impl Rng,
    center: Vec2,
    tribe: TribeId,
    adults: usize,
) -> Vec<Entity> {
    spawn_bonfire(world, center);
    spawn_storage(world, center + Vec2::new(3.0, 0.0));
    for _ in 0..3 {
        spawn_bush(world, rng, center);
        spawn_tree(world, rng, center);
    }

    let names = ["Ash", "Bryn", "Cole", "Dara", "Eyla", "Finn", "Gwen", "Hale"];
    let mut people = Vec::with_capacity(adults);
    for i in 0..adults {
        let person = spawn_human(world, rng, center, tribe);
        let _ = world.insert_one(person, Name::new(names[i % names.len()]));
        people.push(person);
    }
    people
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camp_has_the_essentials() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);

        let people = spawn_camp(&mut world, &mut rng, Vec2::ZERO, 1, 5);
        assert_eq!(people.len(), 5);

        assert_eq!(world.query::<&Bonfire>().iter().count(), 1);
        assert_eq!(world.query::<&Storage>().iter().count(), 1);
        assert_eq!(world.query::<&Bush>().iter().count(), 3);
        assert_eq!(world.query::<&Agent>().iter().count(), 5);
    }

    #[test]
    fn test_spawned_humans_are_adults() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);

        let person = spawn_human(&mut world, &mut rng, Vec2::ZERO, 1);
        assert!(world.get::<&Age>(person).unwrap().is_adult());

        let child = spawn_child(&mut world, &mut rng, Vec2::ZERO, 1);
        assert!(!world.get::<&Age>(child).unwrap().is_adult());
    }
}
