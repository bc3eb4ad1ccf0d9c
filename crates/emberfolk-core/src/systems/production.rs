//! Production system - lets world entities synthesize candidate tasks.

use hecs::World;

use crate::tasks::{DefinitionTable, TaskBoard, TickContext};

/// Invoke every definition's producer once per (entity, definition) pair and
/// upsert the results. Claim-preserving upsert means refreshing an existing
/// task never bumps its current worker.
pub fn production_system(
    world: &World,
    board: &mut TaskBoard,
    defs: &DefinitionTable,
    ctx: &TickContext,
) {
    let mut produced = Vec::new();
    let entities = ctx.index.all();

    for def in defs.iter() {
        for &entity in &entities {
            if !def.produces_from(world, entity) {
                continue;
            }
            def.produce(world, entity, ctx, &mut produced);
        }
    }

    let count = produced.len();
    for task in produced {
        board.upsert(task);
    }
    if count > 0 {
        log::trace!("produced {count} candidate tasks, board holds {}", board.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Bush, Position};
    use crate::defs::standard_table;
    use crate::spatial::LinearIndex;
    use crate::tasks::{entity_bits, TaskId, TaskKind};

    #[test]
    fn test_production_is_idempotent_within_a_tick() {
        let mut world = World::new();
        let bush = world.spawn((Bush::new(3, 5), Position::new(0.0, 0.0)));

        let defs = standard_table();
        let mut board = TaskBoard::new();
        let mut index = LinearIndex::new();
        index.rebuild(&world);
        let ctx = TickContext {
            time: 0.0,
            tick: 0,
            dt: 1.0,
            index: &index,
        };

        production_system(&world, &mut board, &defs, &ctx);
        let first = board.len();
        production_system(&world, &mut board, &defs, &ctx);
        assert_eq!(board.len(), first, "re-production maps onto the same ids");

        let gather_id = TaskId::derived(entity_bits(bush), TaskKind::Gather);
        assert!(board.get(&gather_id).is_some());
    }

    #[test]
    fn test_production_preserves_claims() {
        let mut world = World::new();
        let bush = world.spawn((Bush::new(3, 5), Position::new(0.0, 0.0)));

        let defs = standard_table();
        let mut board = TaskBoard::new();
        let mut index = LinearIndex::new();
        index.rebuild(&world);
        let ctx = TickContext {
            time: 0.0,
            tick: 0,
            dt: 1.0,
            index: &index,
        };

        production_system(&world, &mut board, &defs, &ctx);
        let gather_id = TaskId::derived(entity_bits(bush), TaskKind::Gather);
        board.get_mut(&gather_id).unwrap().claimed_by = Some(77);

        production_system(&world, &mut board, &defs, &ctx);
        assert_eq!(board.get(&gather_id).unwrap().claimed_by, Some(77));
    }
}
