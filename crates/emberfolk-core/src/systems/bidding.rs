//! Bidding system - a greedy, per-agent auction run every tick.
//!
//! Each agent independently scans the board, scores every task it is
//! structurally eligible for, applies its tribe's strategic modifier, and
//! claims the top bid. No global assignment optimization: O(agents x tasks)
//! per tick, stable order, reproducible ties.

use hecs::{Entity, World};

use crate::components::{Agent, AgentKind, TribeId};
use crate::strategy::StrategicPlan;
use crate::tasks::{entity_bits, entity_from_bits, DefinitionTable, TaskBoard, TaskId, TickContext};

/// All agents in stable (entity id) order.
pub(crate) fn agents_in_order(world: &World) -> Vec<Entity> {
    let mut agents: Vec<Entity> = world
        .query::<&Agent>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    agents.sort_by_key(|entity| entity.to_bits());
    agents
}

/// Whether `claimant_bits` blocks other bidders: a claim held by a live
/// entity does, a dangling claim does not.
fn claim_blocks(world: &World, claimant_bits: u64) -> bool {
    entity_from_bits(claimant_bits)
        .map(|entity| world.contains(entity))
        .unwrap_or(false)
}

/// Run one bidding pass for every agent. Agents already holding a live claim
/// skip re-bidding entirely (override preemption happens at execution time).
pub fn bidding_system(
    world: &mut World,
    board: &mut TaskBoard,
    defs: &DefinitionTable,
    plan: &StrategicPlan,
    ctx: &TickContext,
) {
    for agent in agents_in_order(world) {
        let bits = entity_bits(agent);
        let (kind, tribe, current) = match world.get::<&Agent>(agent) {
            Ok(a) => (a.kind, a.tribe, a.current_task.clone()),
            Err(_) => continue,
        };

        // A held claim that is still live short-circuits the auction
        if let Some(id) = &current {
            match board.get(id) {
                Some(task) if task.claimed_by == Some(bits) => continue,
                _ => {
                    // Expired or reassigned underneath us: stale pointer
                    if let Ok(mut a) = world.get::<&mut Agent>(agent) {
                        a.current_task = None;
                    }
                }
            }
        }

        if let Some((winner, score)) = run_auction(world, board, defs, plan, ctx, agent, kind, tribe)
        {
            log::debug!("agent {bits} claims {winner} at {score:.3}");
            if let Some(task) = board.get_mut(&winner) {
                task.claimed_by = Some(bits);
            }
            if let Ok(mut a) = world.get::<&mut Agent>(agent) {
                a.current_task = Some(winner);
            }
        }
    }
}

/// Score every candidate for one agent and pick the winner. Ties go to the
/// first task encountered in ascending id order (strictly-greater compare).
#[allow(clippy::too_many_arguments)]
fn run_auction(
    world: &World,
    board: &TaskBoard,
    defs: &DefinitionTable,
    plan: &StrategicPlan,
    ctx: &TickContext,
    agent: Entity,
    kind: AgentKind,
    tribe: Option<TribeId>,
) -> Option<(TaskId, f32)> {
    let bits = entity_bits(agent);
    let objective = tribe.and_then(|t| plan.objective(t));
    let mut best: Option<(TaskId, f32)> = None;

    for task in board.all() {
        if task.is_expired(ctx.time) {
            continue;
        }
        // Claims by live entities are exclusive; dangling ones are not
        if let Some(claimant) = task.claimed_by {
            if claimant != bits && claim_blocks(world, claimant) {
                continue;
            }
        }
        let Some(def) = defs.get(task.kind) else {
            continue;
        };
        if !def.actors().contains(&kind) {
            continue;
        }
        let raw = def.score(world, agent, task, ctx);
        let Some(score) = plan.apply(raw, objective, task.kind) else {
            continue;
        };
        if best.as_ref().map(|(_, top)| score > *top).unwrap_or(true) {
            best = Some((task.id.clone(), score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Age, Bush, Inventory, Needs, Position};
    use crate::defs::standard_table;
    use crate::spatial::LinearIndex;
    use crate::strategy::Objective;
    use crate::systems::production_system;
    use crate::tasks::TaskKind;

    fn adult(world: &mut World, x: f32) -> Entity {
        world.spawn((
            Agent::new(AgentKind::Human),
            Age::new(25.0),
            Position::new(x, 0.0),
            Needs::default(),
            Inventory::new(4),
        ))
    }

    fn run_pass(world: &mut World, board: &mut TaskBoard, plan: &StrategicPlan, time: f64) {
        let defs = standard_table();
        let mut index = LinearIndex::new();
        index.rebuild(world);
        let ctx = TickContext {
            time,
            tick: 0,
            dt: 1.0,
            index: &index,
        };
        production_system(world, board, &defs, &ctx);
        bidding_system(world, board, &defs, plan, &ctx);
    }

    #[test]
    fn test_starving_agent_claims_a_meal() {
        let mut world = World::new();
        let agent = adult(&mut world, 0.0);
        world.get::<&mut Needs>(agent).unwrap().hunger = 0.9;
        let bush = world.spawn((Bush::new(3, 5), Position::new(2.0, 0.0)));

        let mut board = TaskBoard::new();
        run_pass(&mut world, &mut board, &StrategicPlan::new(), 0.0);

        let current = world.get::<&Agent>(agent).unwrap().current_task.clone();
        let id = current.expect("agent should have claimed something");
        let task = board.get(&id).unwrap();
        assert_eq!(task.claimed_by, Some(entity_bits(agent)));
        // Hunger 0.9 squared beats the gather bid
        assert_eq!(task.kind, TaskKind::Eat);
        let _ = bush;
    }

    #[test]
    fn test_claimed_task_is_skipped_by_others() {
        let mut world = World::new();
        let first = adult(&mut world, 0.0);
        let second = adult(&mut world, 0.0);
        world.spawn((Bush::new(3, 5), Position::new(2.0, 0.0)));

        let mut board = TaskBoard::new();
        run_pass(&mut world, &mut board, &StrategicPlan::new(), 0.0);

        let task_of = |agent: Entity, world: &World| {
            world.get::<&Agent>(agent).unwrap().current_task.clone()
        };
        let a = task_of(first, &world);
        let b = task_of(second, &world);
        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b, "one gather slot cannot be claimed twice");
    }

    #[test]
    fn test_holder_skips_rebidding() {
        let mut world = World::new();
        let agent = adult(&mut world, 0.0);
        world.spawn((Bush::new(3, 5), Position::new(2.0, 0.0)));

        let mut board = TaskBoard::new();
        run_pass(&mut world, &mut board, &StrategicPlan::new(), 0.0);
        let held = world.get::<&Agent>(agent).unwrap().current_task.clone();

        run_pass(&mut world, &mut board, &StrategicPlan::new(), 0.1);
        let still = world.get::<&Agent>(agent).unwrap().current_task.clone();
        assert_eq!(held, still);
    }

    #[test]
    fn test_objective_changes_the_winner() {
        let mut world = World::new();
        let agent = adult(&mut world, 0.0);
        if let Ok(mut a) = world.get::<&mut Agent>(agent) {
            a.tribe = Some(1);
        }
        world.get::<&mut Needs>(agent).unwrap().hunger = 0.65;
        world.spawn((Bush::new(5, 5), Position::new(1.0, 0.0)));

        // Unmodified: eat (0.65^2 = 0.42) loses to a close, full bush (~0.75)
        let mut board = TaskBoard::new();
        run_pass(&mut world, &mut board, &StrategicPlan::new(), 0.0);
        let id = world.get::<&Agent>(agent).unwrap().current_task.clone().unwrap();
        assert_eq!(board.get(&id).unwrap().kind, TaskKind::Gather);

        // Feast boosts Eat and dampens Gather: the meal wins
        board.clear();
        if let Ok(mut a) = world.get::<&mut Agent>(agent) {
            a.current_task = None;
        }
        let mut plan = StrategicPlan::standard();
        plan.set_objective(1, Objective::Feast);
        run_pass(&mut world, &mut board, &plan, 0.0);
        let id = world.get::<&Agent>(agent).unwrap().current_task.clone().unwrap();
        assert_eq!(board.get(&id).unwrap().kind, TaskKind::Eat);
    }

    #[test]
    fn test_dangling_claim_does_not_block() {
        let mut world = World::new();
        let ghost = adult(&mut world, 0.0);
        let ghost_bits = entity_bits(ghost);
        world.despawn(ghost).unwrap();

        let agent = adult(&mut world, 0.0);
        let bush = world.spawn((Bush::new(5, 5), Position::new(1.0, 0.0)));
        let _ = bush;

        let mut board = TaskBoard::new();
        let defs = standard_table();
        let mut index = LinearIndex::new();
        index.rebuild(&world);
        let ctx = TickContext {
            time: 0.0,
            tick: 0,
            dt: 1.0,
            index: &index,
        };
        production_system(&world, &mut board, &defs, &ctx);

        // Dead entity still "holds" the gather task
        for task in board.all().map(|t| t.id.clone()).collect::<Vec<_>>() {
            if board.get(&task).unwrap().kind == TaskKind::Gather {
                board.get_mut(&task).unwrap().claimed_by = Some(ghost_bits);
            }
        }

        bidding_system(&mut world, &mut board, &defs, &StrategicPlan::new(), &ctx);
        let id = world.get::<&Agent>(agent).unwrap().current_task.clone().unwrap();
        assert_eq!(board.get(&id).unwrap().kind, TaskKind::Gather);
        assert_eq!(board.get(&id).unwrap().claimed_by, Some(entity_bits(agent)));
    }
}
