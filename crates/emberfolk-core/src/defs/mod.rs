//! The standard task catalog - one definition per task kind.

mod bonfire;
mod bury;
mod chop;
mod command;
mod eat;
mod gather;
mod stockpile;
mod wait;
mod wander;

pub use bonfire::{FuelBonfireDef, SeekWarmthDef};
pub use bury::BuryDef;
pub use chop::{ChopDef, HaulWoodDef};
pub use command::CommandDef;
pub use eat::EatDef;
pub use gather::GatherDef;
pub use stockpile::StockpileDef;
pub use wait::WaitDef;
pub use wander::WanderDef;

use hecs::{Entity, World};

use crate::components::{ActionLabel, Age, Agent, AgentKind, Movement, Position, Vec2};
use crate::tasks::{entity_bits, entity_from_bits, DefinitionTable};

/// Walking speed in world units per hour.
pub const WALK_SPEED: f32 = 3.0;

/// Close enough to a destination to count as arrived.
pub const ARRIVE_RADIUS: f32 = 0.5;

/// How far agents can see tasks and food sources.
pub const VIEW_RADIUS: f32 = 40.0;

/// Every built-in definition, registered under its kind.
pub fn standard_table() -> DefinitionTable {
    let mut table = DefinitionTable::new();
    table.register(Box::new(EatDef));
    table.register(Box::new(GatherDef));
    table.register(Box::new(ChopDef));
    table.register(Box::new(HaulWoodDef));
    table.register(Box::new(StockpileDef));
    table.register(Box::new(FuelBonfireDef));
    table.register(Box::new(SeekWarmthDef));
    table.register(Box::new(BuryDef));
    table.register(Box::new(CommandDef));
    table.register(Box::new(WaitDef));
    table.register(Box::new(WanderDef));
    table
}

/// Resolve id bits to a live entity, or nothing.
pub(crate) fn live_entity(world: &World, bits: u64) -> Option<Entity> {
    let entity = entity_from_bits(bits)?;
    world.contains(entity).then_some(entity)
}

pub(crate) fn position_of(world: &World, entity: Entity) -> Option<Vec2> {
    world.get::<&Position>(entity).ok().map(|p| p.pos)
}

/// Steer the agent toward `dest`; returns true once it stands within
/// [`ARRIVE_RADIUS`]. The movement system does the actual walking.
pub(crate) fn move_toward(world: &mut World, agent: Entity, dest: Vec2) -> bool {
    let Some(pos) = position_of(world, agent) else {
        return false;
    };
    if pos.distance(&dest) <= ARRIVE_RADIUS {
        let _ = world.remove_one::<Movement>(agent);
        return true;
    }
    let _ = world.insert_one(agent, Movement::new(dest, WALK_SPEED));
    false
}

pub(crate) fn set_activity(world: &mut World, agent: Entity, label: ActionLabel) {
    if let Ok(mut a) = world.get::<&mut Agent>(agent) {
        a.activity = label;
    }
}

/// Adults-only gate shared by work-type scorers.
pub(crate) fn is_adult(world: &World, agent: Entity) -> bool {
    world.get::<&Age>(agent).map(|a| a.is_adult()).unwrap_or(false)
}

pub(crate) fn agent_kind(world: &World, agent: Entity) -> Option<AgentKind> {
    world.get::<&Agent>(agent).ok().map(|a| a.kind)
}

/// A bid only an agent's own self-produced task should get.
pub(crate) fn is_own_task(agent: Entity, creator: u64) -> bool {
    entity_bits(agent) == creator
}

/// Closeness factor in 0.0..=1.0 - nearer targets bid a little higher.
pub(crate) fn proximity(from: Vec2, to: Vec2) -> f32 {
    let dist = from.distance(&to);
    (1.0 - dist / VIEW_RADIUS).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskKind;

    #[test]
    fn test_standard_table_covers_all_kinds() {
        let table = standard_table();
        for kind in [
            TaskKind::Eat,
            TaskKind::Gather,
            TaskKind::Chop,
            TaskKind::HaulWood,
            TaskKind::Stockpile,
            TaskKind::FuelBonfire,
            TaskKind::SeekWarmth,
            TaskKind::Bury,
            TaskKind::Command,
            TaskKind::Wait,
            TaskKind::Wander,
        ] {
            assert!(table.get(kind).is_some(), "missing definition for {kind}");
        }
    }

    #[test]
    fn test_move_toward_arrival() {
        let mut world = World::new();
        let agent = world.spawn((Position::new(0.0, 0.0),));

        // Far away: starts movement
        assert!(!move_toward(&mut world, agent, Vec2::new(10.0, 0.0)));
        assert!(world.get::<&Movement>(agent).is_ok());

        // Close by: arrived, movement cleared
        assert!(move_toward(&mut world, agent, Vec2::new(0.2, 0.0)));
        assert!(world.get::<&Movement>(agent).is_err());
    }

    #[test]
    fn test_proximity_clamps() {
        assert_eq!(proximity(Vec2::ZERO, Vec2::new(VIEW_RADIUS * 2.0, 0.0)), 0.0);
        assert!(proximity(Vec2::ZERO, Vec2::new(1.0, 0.0)) > 0.9);
    }
}
