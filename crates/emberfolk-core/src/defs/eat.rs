//! Eat - self-produced by every agent; the scorer does the hunger filtering.

use hecs::{Entity, World};

use super::{agent_kind, is_own_task, live_entity, move_toward, position_of, set_activity};
use crate::components::{ActionLabel, Agent, AgentKind, Bush, Inventory, Needs, Storage, Vec2};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskId, TaskKind, TickContext,
};

/// Hunger below this never bids.
const HUNGER_GATE: f32 = 0.35;
/// One swallowed berry buys this much relief.
const BITE_RELIEF: f32 = 0.4;
/// Eat until hunger drops under this.
const SATED: f32 = 0.15;

pub struct EatDef;

impl EatDef {
    /// Nearest live food source the agent can use. Animals forage bushes
    /// only; humans also raid storage huts.
    fn find_food(world: &World, agent: Entity, ctx: &TickContext) -> Option<(Entity, Vec2)> {
        let origin = position_of(world, agent)?;
        let kind = agent_kind(world, agent)?;

        let mut best: Option<(Entity, Vec2, f32)> = None;
        for candidate in ctx.index.by_radius(origin, super::VIEW_RADIUS) {
            let edible = world
                .get::<&Bush>(candidate)
                .map(|b| b.has_stock())
                .unwrap_or(false)
                || (kind == AgentKind::Human
                    && world
                        .get::<&Storage>(candidate)
                        .map(|s| s.food > 0)
                        .unwrap_or(false));
            if !edible {
                continue;
            }
            let Some(pos) = position_of(world, candidate) else {
                continue;
            };
            let dist = origin.distance_squared(&pos);
            if best.map(|(_, _, d)| dist < d).unwrap_or(true) {
                best = Some((candidate, pos, dist));
            }
        }
        best.map(|(entity, pos, _)| (entity, pos))
    }

    /// Take one unit of food off a source. Returns false when nothing came off.
    fn bite_from(world: &mut World, source: Entity) -> bool {
        if let Ok(mut bush) = world.get::<&mut Bush>(source) {
            return bush.take(1) == 1;
        }
        if let Ok(mut storage) = world.get::<&mut Storage>(source) {
            if storage.food > 0 {
                storage.food -= 1;
                return true;
            }
        }
        false
    }
}

impl TaskDefinition for EatDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Eat
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
            TaskId::derived(bits, TaskKind::Eat),
            TaskKind::Eat,
            bits,
            Target::Entity(bits),
            ctx.time + 1.5,
        ));
    }

    fn score(&self, world: &World, agent: Entity, task: &Task, ctx: &TickContext) -> Option<f32> {
        if !is_own_task(agent, task.creator) {
            return None;
        }
        let hunger = world.get::<&Needs>(agent).ok()?.hunger;
        if hunger < HUNGER_GATE {
            return None;
        }
        let carrying_food = world
            .get::<&Inventory>(agent)
            .map(|i| i.food > 0)
            .unwrap_or(false);
        if !carrying_food && Self::find_food(world, agent, ctx).is_none() {
            return None;
        }
        // Urgency curve: desperation dominates everything else at the top end
        Some(hunger * hunger)
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        ctx: &TickContext,
    ) -> StepOutcome {
        set_activity(world, agent, ActionLabel::Eating);

        // Carried food first
        let carried = {
            let inventory = world.get::<&Inventory>(agent).ok();
            inventory.map(|i| i.food).unwrap_or(0)
        };
        if carried > 0 {
            if let Ok(mut inventory) = world.get::<&mut Inventory>(agent) {
                inventory.food -= 1;
            }
            return Self::swallow(world, agent);
        }

        // Otherwise walk to the nearest source and eat off it
        let Target::Entity(_) = task.target else {
            return StepOutcome::failure("eat task must target its agent");
        };
        let Some((source, source_pos)) = Self::find_food(world, agent, ctx) else {
            return StepOutcome::failure("no food in reach");
        };
        if !move_toward(world, agent, source_pos) {
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }
        let source_bits = entity_bits(source);
        if live_entity(world, source_bits).is_none() || !Self::bite_from(world, source) {
            return StepOutcome::failure("food source ran dry");
        }
        Self::swallow(world, agent)
    }
}

impl EatDef {
    fn swallow(world: &mut World, agent: Entity) -> StepOutcome {
        let mut sated = false;
        if let Ok(mut needs) = world.get::<&mut Needs>(agent) {
            needs.satisfy_hunger(BITE_RELIEF);
            sated = needs.hunger <= SATED;
        }
        if sated {
            StepOutcome::success().with_message("sated")
        } else {
            StepOutcome::running()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Position;
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

    fn hungry_human(world: &mut World, hunger: f32) -> Entity {
        world.spawn((
            Agent::new(AgentKind::Human),
            Position::new(0.0, 0.0),
            Needs {
                hunger,
                ..Default::default()
            },
            Inventory::new(4),
        ))
    }

    #[test]
    fn test_sated_agent_is_ineligible() {
        let mut world = World::new();
        let agent = hungry_human(&mut world, 0.1);
        world.spawn((Bush::new(3, 5), Position::new(1.0, 0.0)));

        let mut index = LinearIndex::new();
        index.rebuild(&world);
        let ctx = ctx(&index);

        let mut out = Vec::new();
        EatDef.produce(&world, agent, &ctx, &mut out);
        assert_eq!(out.len(), 1);

        assert_eq!(EatDef.score(&world, agent, &out[0], &ctx), None);
    }

    #[test]
    fn test_no_food_anywhere_is_ineligible() {
        let mut world = World::new();
        let agent = hungry_human(&mut world, 0.9);

        let mut index = LinearIndex::new();
        index.rebuild(&world);
        let ctx = ctx(&index);

        let mut out = Vec::new();
        EatDef.produce(&world, agent, &ctx, &mut out);
        assert_eq!(EatDef.score(&world, agent, &out[0], &ctx), None);
    }

    #[test]
    fn test_hungrier_bids_higher() {
        let mut world = World::new();
        let peckish = hungry_human(&mut world, 0.5);
        let starving = hungry_human(&mut world, 1.0);
        world.spawn((Bush::new(3, 5), Position::new(1.0, 0.0)));

        let mut index = LinearIndex::new();
        index.rebuild(&world);
        let ctx = ctx(&index);

        let mut tasks = Vec::new();
        EatDef.produce(&world, peckish, &ctx, &mut tasks);
        EatDef.produce(&world, starving, &ctx, &mut tasks);

        let low = EatDef.score(&world, peckish, &tasks[0], &ctx).unwrap();
        let high = EatDef.score(&world, starving, &tasks[1], &ctx).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_eats_adjacent_bush_until_sated() {
        let mut world = World::new();
        let agent = hungry_human(&mut world, 0.8);
        let bush = world.spawn((Bush::new(5, 5), Position::new(0.3, 0.0)));

        let mut index = LinearIndex::new();
        index.rebuild(&world);
        let ctx = ctx(&index);

        let mut tasks = Vec::new();
        EatDef.produce(&world, agent, &ctx, &mut tasks);

        // 0.8 -> 0.4 -> 0.0: two bites, second one sates
        let first = EatDef.execute(&mut world, agent, &tasks[0], &ctx);
        assert_eq!(first.status, TaskStatus::Running);
        let second = EatDef.execute(&mut world, agent, &tasks[0], &ctx);
        assert_eq!(second.status, TaskStatus::Success);

        assert_eq!(world.get::<&Bush>(bush).unwrap().stock, 3);
    }
}
