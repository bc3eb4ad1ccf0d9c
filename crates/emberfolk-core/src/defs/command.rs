//! Command - the direct-order override. Scored at the sentinel value for its
//! designated agent; the execution system preempts whatever else that agent
//! was doing (the one sanctioned preemption path).

use hecs::{Entity, World};

use super::{live_entity, move_toward, position_of, set_activity};
use crate::components::{ActionLabel, AgentKind, Vec2};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskKind, TickContext, OVERRIDE_SCORE,
};

pub struct CommandDef;

impl CommandDef {
    fn destination(world: &World, target: Target) -> Option<Vec2> {
        match target {
            Target::Point(point) => Some(point),
            Target::Entity(bits) => {
                let entity = live_entity(world, bits)?;
                position_of(world, entity)
            }
            Target::Rect(rect) => Some(Vec2::new(
                (rect.min.x + rect.max.x) / 2.0,
                (rect.min.y + rect.max.y) / 2.0,
            )),
            Target::Circle(circle) => Some(circle.center),
        }
    }
}

impl TaskDefinition for CommandDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Command
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human, AgentKind::Animal]
    }

    fn score(&self, _world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        // Only the commanded entity sees this task, and nothing outbids it
        if task.claimed_by == Some(entity_bits(agent)) {
            Some(OVERRIDE_SCORE)
        } else {
            None
        }
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        _ctx: &TickContext,
    ) -> StepOutcome {
        let Some(dest) = Self::destination(world, task.target) else {
            return StepOutcome::failure("command target is gone");
        };
        if move_toward(world, agent, dest) {
            set_activity(world, agent, ActionLabel::Idle);
            StepOutcome::success().with_message("as ordered")
        } else {
            set_activity(world, agent, ActionLabel::Moving);
            StepOutcome::running()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Agent, Position};
    use crate::spatial::LinearIndex;
    use crate::tasks::{TaskId, TaskStatus};

    #[test]
    fn test_only_the_commanded_agent_bids() {
        let mut world = World::new();
        let ordered = world.spawn((Agent::new(AgentKind::Human), Position::new(0.0, 0.0)));
        let bystander = world.spawn((Agent::new(AgentKind::Human), Position::new(0.0, 0.0)));

        let bits = entity_bits(ordered);
        let mut task = Task::new(
            TaskId::derived(bits, TaskKind::Command),
            TaskKind::Command,
            bits,
            Target::Point(Vec2::new(5.0, 0.0)),
            100.0,
        );
        task.claimed_by = Some(bits);

        let index = LinearIndex::new();
        let ctx = TickContext {
            time: 0.0,
            tick: 0,
            dt: 1.0,
            index: &index,
        };

        assert_eq!(CommandDef.score(&world, ordered, &task, &ctx), Some(OVERRIDE_SCORE));
        assert_eq!(CommandDef.score(&world, bystander, &task, &ctx), None);
    }

    #[test]
    fn test_command_walks_to_the_point() {
        let mut world = World::new();
        let agent = world.spawn((Agent::new(AgentKind::Human), Position::new(0.0, 0.0)));

        let bits = entity_bits(agent);
        let mut task = Task::new(
            TaskId::derived(bits, TaskKind::Command),
            TaskKind::Command,
            bits,
            Target::Point(Vec2::new(0.3, 0.0)),
            100.0,
        );
        task.claimed_by = Some(bits);

        let index = LinearIndex::new();
        let ctx = TickContext {
            time: 0.0,
            tick: 0,
            dt: 1.0,
            index: &index,
        };

        let outcome = CommandDef.execute(&mut world, agent, &task, &ctx);
        assert_eq!(outcome.status, TaskStatus::Success);
    }
}
