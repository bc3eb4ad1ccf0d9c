//! Gather - bushes with stock offer their berries to adult humans.

use hecs::{Entity, World};

use super::{is_adult, live_entity, move_toward, position_of, proximity, set_activity};
use crate::components::{ActionLabel, AgentKind, Bush, Inventory};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskId, TaskKind, TickContext,
};

pub struct GatherDef;

impl TaskDefinition for GatherDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Gather
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human]
    }

    fn produces_from(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Bush>(entity)
            .map(|b| b.has_stock())
            .unwrap_or(false)
    }

    fn produce(&self, _world: &World, producer: Entity, ctx: &TickContext, out: &mut Vec<Task>) {
        let bits = entity_bits(producer);
        out.push(Task::new(
            TaskId::derived(bits, TaskKind::Gather),
            TaskKind::Gather,
            bits,
            Target::Entity(bits),
            ctx.time + 2.0,
        ));
    }

    fn score(&self, world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        if !is_adult(world, agent) {
            return None;
        }
        let inventory = world.get::<&Inventory>(agent).ok()?;
        if inventory.is_full() {
            return None;
        }
        drop(inventory);

        let Target::Entity(bits) = task.target else {
            return None;
        };
        let bush_entity = live_entity(world, bits)?;
        let bush = world.get::<&Bush>(bush_entity).ok()?;
        if !bush.has_stock() {
            return None;
        }
        let stock_fraction = bush.stock as f32 / bush.max_stock.max(1) as f32;
        drop(bush);

        let here = position_of(world, agent)?;
        let there = position_of(world, bush_entity)?;
        Some((0.35 + 0.25 * stock_fraction + 0.15 * proximity(here, there)).min(1.0))
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        _ctx: &TickContext,
    ) -> StepOutcome {
        let Target::Entity(bits) = task.target else {
            return StepOutcome::failure("gather task must target a bush");
        };
        let Some(bush_entity) = live_entity(world, bits) else {
            return StepOutcome::failure("bush is gone");
        };

        // Stripped bare mid-execution counts as done, not as an error
        let stock = match world.get::<&Bush>(bush_entity) {
            Ok(bush) => bush.stock,
            Err(_) => return StepOutcome::failure("bush is gone"),
        };
        if stock == 0 {
            set_activity(world, agent, ActionLabel::Idle);
            return StepOutcome::success().with_message("bush picked clean");
        }

        let Some(bush_pos) = position_of(world, bush_entity) else {
            return StepOutcome::failure("bush is gone");
        };
        if !move_toward(world, agent, bush_pos) {
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Gathering);
        let has_space = world
            .get::<&Inventory>(agent)
            .map(|i| !i.is_full())
            .unwrap_or(false);
        if !has_space {
            return StepOutcome::success().with_message("hands full");
        }

        let picked = world
            .get::<&mut Bush>(bush_entity)
            .map(|mut b| b.take(1))
            .unwrap_or(0);
        if picked == 0 {
            return StepOutcome::success().with_message("bush picked clean");
        }
        if let Ok(mut inventory) = world.get::<&mut Inventory>(agent) {
            inventory.food += 1;
        }
        StepOutcome::running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Age, Agent, Position};
    use crate::spatial::LinearIndex;
    use crate::tasks::TaskStatus;

    fn ctx(index: &LinearIndex) -> TickContext<'_> {
        TickContext {
            time: 0.0,
            tick: 0,
            dt: 1.0,
            index,
        }
    }

    fn setup(stock: u32) -> (World, Entity, Entity) {
        let mut world = World::new();
        let agent = world.spawn((
            Agent::new(AgentKind::Human),
            Age::new(25.0),
            Position::new(0.0, 0.0),
            Inventory::new(4),
        ));
        let bush = world.spawn((Bush::new(stock, 5), Position::new(0.3, 0.0)));
        (world, agent, bush)
    }

    #[test]
    fn test_empty_bush_produces_nothing() {
        let (world, _, bush) = setup(0);
        assert!(!GatherDef.produces_from(&world, bush));

        let (world, _, bush) = setup(3);
        assert!(GatherDef.produces_from(&world, bush));
    }

    #[test]
    fn test_children_do_not_bid() {
        let (mut world, _, bush) = setup(3);
        let child = world.spawn((
            Agent::new(AgentKind::Human),
            Age::new(6.0),
            Position::new(0.0, 0.0),
            Inventory::new(4),
        ));

        let index = LinearIndex::new();
        let ctx = ctx(&index);
        let mut tasks = Vec::new();
        GatherDef.produce(&world, bush, &ctx, &mut tasks);

        assert_eq!(GatherDef.score(&world, child, &tasks[0], &ctx), None);
    }

    #[test]
    fn test_gathers_until_bush_is_bare() {
        let (mut world, agent, bush) = setup(2);
        let index = LinearIndex::new();
        let ctx = ctx(&index);

        let mut tasks = Vec::new();
        GatherDef.produce(&world, bush, &ctx, &mut tasks);
        let task = &tasks[0];

        assert_eq!(GatherDef.execute(&mut world, agent, task, &ctx).status, TaskStatus::Running);
        assert_eq!(GatherDef.execute(&mut world, agent, task, &ctx).status, TaskStatus::Running);
        // Stock hit zero mid-execution: that's Success, not Failure
        let done = GatherDef.execute(&mut world, agent, task, &ctx);
        assert_eq!(done.status, TaskStatus::Success);

        assert_eq!(world.get::<&Inventory>(agent).unwrap().food, 2);
        assert_eq!(world.get::<&Bush>(bush).unwrap().stock, 0);
    }

    #[test]
    fn test_despawned_bush_fails() {
        let (mut world, agent, bush) = setup(2);
        let index = LinearIndex::new();
        let ctx = ctx(&index);

        let mut tasks = Vec::new();
        GatherDef.produce(&world, bush, &ctx, &mut tasks);
        world.despawn(bush).unwrap();

        let outcome = GatherDef.execute(&mut world, agent, &tasks[0], &ctx);
        assert_eq!(outcome.status, TaskStatus::Failure);
    }
}
