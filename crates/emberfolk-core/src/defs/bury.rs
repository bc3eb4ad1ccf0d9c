//! Bury - corpses ask to be put in the ground before they rot away.

use hecs::{Entity, World};

use super::{is_adult, live_entity, move_toward, position_of, set_activity};
use crate::components::{ActionLabel, AgentKind, Corpse};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskId, TaskKind, TickContext,
};

pub struct BuryDef;

impl TaskDefinition for BuryDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Bury
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human]
    }

    fn produces_from(&self, world: &World, entity: Entity) -> bool {
        world.get::<&Corpse>(entity).is_ok()
    }

    fn produce(&self, _world: &World, producer: Entity, ctx: &TickContext, out: &mut Vec<Task>) {
        let bits = entity_bits(producer);
        out.push(Task::new(
            TaskId::derived(bits, TaskKind::Bury),
            TaskKind::Bury,
            bits,
            Target::Entity(bits),
            ctx.time + 8.0,
        ));
    }

    fn score(&self, world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        if !is_adult(world, agent) {
            return None;
        }
        let Target::Entity(bits) = task.target else {
            return None;
        };
        let corpse_entity = live_entity(world, bits)?;
        let decay = world.get::<&Corpse>(corpse_entity).ok()?.decay;
        // The riper it gets, the more pressing the grave
        Some(0.2 + 0.3 * decay)
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        _ctx: &TickContext,
    ) -> StepOutcome {
        let Target::Entity(bits) = task.target else {
            return StepOutcome::failure("bury task must target a corpse");
        };
        let Some(corpse_entity) = live_entity(world, bits) else {
            return StepOutcome::failure("corpse is gone");
        };
        let Some(corpse_pos) = position_of(world, corpse_entity) else {
            return StepOutcome::failure("corpse is gone");
        };
        if !move_toward(world, agent, corpse_pos) {
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Burying);
        // Removing the corpse entity is delegated to the world; the task
        // engine itself never destroys entities elsewhere.
        let _ = world.despawn(corpse_entity);
        set_activity(world, agent, ActionLabel::Idle);
        StepOutcome::success().with_message("laid to rest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Age, Agent, Position};
    use crate::spatial::LinearIndex;
    use crate::tasks::TaskStatus;

    #[test]
    fn test_burial_removes_the_corpse() {
        let mut world = World::new();
        let agent = world.spawn((
            Agent::new(AgentKind::Human),
            Age::new(30.0),
            Position::new(0.0, 0.0),
        ));
        let corpse = world.spawn((Corpse::new(), Position::new(0.2, 0.0)));

        let index = LinearIndex::new();
        let ctx = TickContext {
            time: 0.0,
            tick: 0,
            dt: 1.0,
            index: &index,
        };

        let mut tasks = Vec::new();
        BuryDef.produce(&world, corpse, &ctx, &mut tasks);
        assert!(BuryDef.score(&world, agent, &tasks[0], &ctx).is_some());

        let outcome = BuryDef.execute(&mut world, agent, &tasks[0], &ctx);
        assert_eq!(outcome.status, TaskStatus::Success);
        assert!(!world.contains(corpse));

        // A second attempt on the same (now stale) task fails cleanly
        let outcome = BuryDef.execute(&mut world, agent, &tasks[0], &ctx);
        assert_eq!(outcome.status, TaskStatus::Failure);
    }
}
