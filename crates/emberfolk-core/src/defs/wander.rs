//! Wander - the idle fallback. Scores low enough that any real work wins.
//!
//! The producer is deterministic; the random stroll destination is picked in
//! the executor, which is where randomness is allowed to live.

use hecs::{Entity, World};
use rand::Rng;

use super::{is_own_task, position_of, set_activity};
use crate::components::{ActionLabel, Agent, AgentKind, Movement, Vec2};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskId, TaskKind, TickContext,
};

/// How far an aimless stroll can go.
const WANDER_RADIUS: f32 = 6.0;
/// Strolling is slower than purposeful walking.
const STROLL_SPEED: f32 = 1.5;

pub struct WanderDef;

impl TaskDefinition for WanderDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Wander
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human, AgentKind::Animal]
    }

    fn produces_from(&self, world: &World, entity: Entity) -> bool {
        world.get::<&Agent>(entity).is_ok()
    }

    fn produce(&self, _world: &World, producer: Entity, ctx: &TickContext, out: &mut Vec<Task>) {
        let bits = entity_bits(producer);
        out.push(Task::new(
            TaskId::derived(bits, TaskKind::Wander),
            TaskKind::Wander,
            bits,
            Target::Entity(bits),
            ctx.time + 1.0,
        ));
    }

    fn score(&self, _world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        if !is_own_task(agent, task.creator) {
            return None;
        }
        Some(0.05)
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        _task: &Task,
        _ctx: &TickContext,
    ) -> StepOutcome {
        let still_walking = world.get::<&Movement>(agent).is_ok();
        if still_walking {
            return StepOutcome::running();
        }

        let was_wandering = world
            .get::<&Agent>(agent)
            .map(|a| a.activity == ActionLabel::Wandering)
            .unwrap_or(false);
        if was_wandering {
            // The movement system cleared the stroll: we got somewhere
            set_activity(world, agent, ActionLabel::Idle);
            return StepOutcome::success();
        }

        let Some(pos) = position_of(world, agent) else {
            return StepOutcome::failure("agent has no position");
        };
        let mut rng = rand::thread_rng();
        let dest = Vec2::new(
            pos.x + rng.gen_range(-WANDER_RADIUS..WANDER_RADIUS),
            pos.y + rng.gen_range(-WANDER_RADIUS..WANDER_RADIUS),
        );
        let _ = world.insert_one(agent, Movement::new(dest, STROLL_SPEED));
        set_activity(world, agent, ActionLabel::Wandering);
        StepOutcome::running()
    }
}
