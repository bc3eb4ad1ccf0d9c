//! Wait - blocks an entity until a deadline using the same state machine as
//! every other task. No producer; other systems inject it pre-claimed.

use hecs::{Entity, World};

use super::set_activity;
use crate::components::{ActionLabel, AgentKind};
use crate::tasks::{entity_bits, StepOutcome, Task, TaskDefinition, TaskKind, TickContext};

pub struct WaitDef;

impl TaskDefinition for WaitDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Wait
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human, AgentKind::Animal]
    }

    fn score(&self, _world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        // Only the blocked entity itself re-binds to its wait
        if task.claimed_by == Some(entity_bits(agent)) {
            Some(0.9)
        } else {
            None
        }
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        ctx: &TickContext,
    ) -> StepOutcome {
        // Succeed on the last tick before the deadline; otherwise the eager
        // expiry pass would reap the task before it ever completed.
        if ctx.time >= task.valid_until - ctx.dt {
            set_activity(world, agent, ActionLabel::Idle);
            StepOutcome::success()
        } else {
            set_activity(world, agent, ActionLabel::Waiting);
            StepOutcome::running()
        }
    }
}
