//! Execution system - drives each claimed task one step per tick.
//!
//! Terminal results release the claim, record history, and register any
//! chained successor pre-claimed by the same agent, so follow-up work starts
//! without waiting for the next bidding round.

use hecs::{Entity, World};

use super::bidding::agents_in_order;
use crate::components::Agent;
use crate::tasks::{
    entity_bits, DefinitionTable, HistoryEntry, StepOutcome, Task, TaskBoard, TaskId, TaskStatus,
    TickContext,
};

/// Run one execution step for every agent holding a claim.
pub fn execution_system(
    world: &mut World,
    board: &mut TaskBoard,
    defs: &DefinitionTable,
    ctx: &TickContext,
) {
    for agent in agents_in_order(world) {
        step_agent(world, board, defs, ctx, agent);
    }
}

fn step_agent(
    world: &mut World,
    board: &mut TaskBoard,
    defs: &DefinitionTable,
    ctx: &TickContext,
    agent: Entity,
) {
    let bits = entity_bits(agent);
    let current = match world.get::<&Agent>(agent) {
        Ok(a) => a.current_task.clone(),
        Err(_) => return,
    };
    let Some(current_id) = current else {
        return;
    };

    // Stale pointer: the task expired or was reassigned out from under us
    let task = match board.get(&current_id) {
        Some(task) if task.claimed_by == Some(bits) => task.clone(),
        _ => {
            clear_pointer(world, agent);
            return;
        }
    };

    // Override preemption: a pending command claimed by this agent fails
    // whatever else it was doing and takes its place, within the same tick.
    if !task.kind.is_override() {
        let pending = board
            .all()
            .find(|t| {
                t.kind.is_override() && t.claimed_by == Some(bits) && !t.is_expired(ctx.time)
            })
            .map(|t| t.id.clone());
        if let Some(override_id) = pending {
            log::debug!("agent {bits}: {current_id} preempted by {override_id}");
            if let Ok(mut a) = world.get::<&mut Agent>(agent) {
                a.last_result = Some(TaskStatus::Failure);
                a.last_message = Some("preempted by command".to_string());
            }
            finish_task(
                world,
                board,
                agent,
                &task,
                StepOutcome::failure("preempted by command"),
                ctx,
            );
            if let Ok(mut a) = world.get::<&mut Agent>(agent) {
                a.current_task = Some(override_id);
            }
            return;
        }
    }

    // A definition must exist and carry an executor; anything else is an
    // automatic local failure, never a thrown error.
    let outcome = match defs.get(task.kind) {
        Some(def) => def.execute(world, agent, &task, ctx),
        None => StepOutcome::failure("no definition for task kind"),
    };

    // Diagnostics persist on every step, terminal or not
    if let Ok(mut a) = world.get::<&mut Agent>(agent) {
        a.last_result = Some(outcome.status);
        a.last_message = outcome.message.clone();
    }

    if outcome.status != TaskStatus::Running {
        finish_task(world, board, agent, &task, outcome, ctx);
    }
}

/// Terminal handling: history, board removal, pointer clear, and chaining.
fn finish_task(
    world: &mut World,
    board: &mut TaskBoard,
    agent: Entity,
    task: &Task,
    outcome: StepOutcome,
    ctx: &TickContext,
) {
    let bits = entity_bits(agent);
    log::debug!("agent {bits}: {} -> {:?}", task.id, outcome.status);

    if let Ok(mut a) = world.get::<&mut Agent>(agent) {
        a.history.push(HistoryEntry {
            kind: task.kind,
            result: outcome.status,
            completed_at: ctx.tick,
            message: outcome.message.clone(),
        });
        a.current_task = None;
    }
    board.remove(&task.id);

    if outcome.status != TaskStatus::Success {
        return;
    }
    // Dynamic chain takes precedence over the static successor
    let chained = outcome
        .chained
        .or_else(|| task.next.as_deref().cloned());
    if let Some(mut chained) = chained {
        chained.claimed_by = Some(bits);
        let chained_id = chained.id.clone();
        board.insert_claimed(chained);
        if let Ok(mut a) = world.get::<&mut Agent>(agent) {
            a.current_task = Some(chained_id);
        }
    }
}

fn clear_pointer(world: &mut World, agent: Entity) {
    if let Ok(mut a) = world.get::<&mut Agent>(agent) {
        a.current_task = None;
    }
}

/// Look up an agent's current task id, for tests and tooling.
pub fn current_task_of(world: &World, agent: Entity) -> Option<TaskId> {
    world
        .get::<&Agent>(agent)
        .ok()
        .and_then(|a| a.current_task.clone())
}
