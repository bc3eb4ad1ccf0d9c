//! FuelBonfire and SeekWarmth - a bonfire asks for wood when it burns low,
//! and offers one warmth-slot task per place around it while lit.

use hecs::{Entity, World};

use super::{is_adult, live_entity, move_toward, position_of, set_activity};
use crate::components::{ActionLabel, AgentKind, Bonfire, Circle, Inventory, Needs, Position};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskId, TaskKind, TickContext,
};

/// Cold below this never bids for a warmth slot.
const COLD_GATE: f32 = 0.45;
/// Warmth soaked up per hour at the fire.
const WARM_RATE: f32 = 0.3;

pub struct FuelBonfireDef;

impl TaskDefinition for FuelBonfireDef {
    fn kind(&self) -> TaskKind {
        TaskKind::FuelBonfire
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human]
    }

    fn produces_from(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Bonfire>(entity)
            .map(|b| b.needs_fuel())
            .unwrap_or(false)
    }

    fn produce(&self, _world: &World, producer: Entity, ctx: &TickContext, out: &mut Vec<Task>) {
        let bits = entity_bits(producer);
        out.push(Task::new(
            TaskId::derived(bits, TaskKind::FuelBonfire),
            TaskKind::FuelBonfire,
            bits,
            Target::Entity(bits),
            ctx.time + 2.0,
        ));
    }

    fn score(&self, world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        if !is_adult(world, agent) {
            return None;
        }
        let carrying_wood = world
            .get::<&Inventory>(agent)
            .map(|i| i.wood > 0)
            .unwrap_or(false);
        if !carrying_wood {
            return None;
        }
        let Target::Entity(bits) = task.target else {
            return None;
        };
        let fire_entity = live_entity(world, bits)?;
        let fire = world.get::<&Bonfire>(fire_entity).ok()?;
        // A fire about to die out is nearly a must
        let urgency = 1.0 - fire.fuel / fire.max_fuel.max(f32::EPSILON);
        Some((0.4 + 0.6 * urgency).min(1.0))
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        _ctx: &TickContext,
    ) -> StepOutcome {
        let Target::Entity(bits) = task.target else {
            return StepOutcome::failure("fuel task must target a bonfire");
        };
        let Some(fire_entity) = live_entity(world, bits) else {
            return StepOutcome::failure("bonfire is gone");
        };
        let Some(fire_pos) = position_of(world, fire_entity) else {
            return StepOutcome::failure("bonfire is gone");
        };
        if !move_toward(world, agent, fire_pos) {
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Fueling);
        let logs = match world.get::<&Inventory>(agent) {
            Ok(inventory) => inventory.wood,
            Err(_) => 0,
        };
        if logs == 0 {
            return StepOutcome::failure("no wood to burn");
        }
        if let Ok(mut fire) = world.get::<&mut Bonfire>(fire_entity) {
            fire.add_fuel(logs);
        }
        if let Ok(mut inventory) = world.get::<&mut Inventory>(agent) {
            inventory.wood = 0;
        }
        set_activity(world, agent, ActionLabel::Idle);
        StepOutcome::success().with_message(format!("fed {logs} logs to the fire"))
    }
}

pub struct SeekWarmthDef;

impl TaskDefinition for SeekWarmthDef {
    fn kind(&self) -> TaskKind {
        TaskKind::SeekWarmth
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human, AgentKind::Animal]
    }

    fn produces_from(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Bonfire>(entity)
            .map(|b| b.is_lit())
            .unwrap_or(false)
    }

    /// One identical-shape task per warmth slot, each with its own id, so
    /// several agents can each claim a distinct place at the fire.
    fn produce(&self, world: &World, producer: Entity, ctx: &TickContext, out: &mut Vec<Task>) {
        let bits = entity_bits(producer);
        let (slots, radius) = match world.get::<&Bonfire>(producer) {
            Ok(fire) => (fire.warmth_slots, fire.warmth_radius),
            Err(_) => return,
        };
        let center = match world.get::<&Position>(producer) {
            Ok(position) => position.pos,
            Err(_) => return,
        };
        for slot in 0..slots {
            out.push(Task::new(
                TaskId::slot(bits, TaskKind::SeekWarmth, slot),
                TaskKind::SeekWarmth,
                bits,
                Target::Circle(Circle::new(center, radius)),
                ctx.time + 1.5,
            ));
        }
    }

    fn score(&self, world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        let cold = world.get::<&Needs>(agent).ok()?.cold;
        if cold < COLD_GATE {
            return None;
        }
        let fire_entity = live_entity(world, task.creator)?;
        let lit = world.get::<&Bonfire>(fire_entity).ok()?.is_lit();
        if !lit {
            return None;
        }
        Some(cold * cold)
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        ctx: &TickContext,
    ) -> StepOutcome {
        let Target::Circle(circle) = task.target else {
            return StepOutcome::failure("warmth task must target a circle");
        };
        let fire_alive = live_entity(world, task.creator)
            .and_then(|fire| world.get::<&Bonfire>(fire).ok().map(|b| b.is_lit()))
            .unwrap_or(false);
        if !fire_alive {
            return StepOutcome::failure("fire went out");
        }

        let Some(pos) = position_of(world, agent) else {
            return StepOutcome::failure("agent has no position");
        };
        if !circle.contains(&pos) {
            move_toward(world, agent, circle.center);
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Warming);
        let mut warmed_through = false;
        if let Ok(mut needs) = world.get::<&mut Needs>(agent) {
            needs.warm_up(WARM_RATE * ctx.dt as f32);
            warmed_through = needs.cold <= 0.05;
        }
        if warmed_through {
            set_activity(world, agent, ActionLabel::Idle);
            StepOutcome::success().with_message("warmed through")
        } else {
            StepOutcome::running()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Age, Agent};
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

    #[test]
    fn test_one_task_per_warmth_slot() {
        let mut world = World::new();
        let fire = world.spawn((Bonfire::new(10.0), Position::new(0.0, 0.0)));

        let index = LinearIndex::new();
        let ctx = ctx(&index);
        let mut tasks = Vec::new();
        SeekWarmthDef.produce(&world, fire, &ctx, &mut tasks);

        assert_eq!(tasks.len(), 4);
        let mut ids: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4, "slot ids must be distinct");
    }

    #[test]
    fn test_low_fire_asks_for_fuel() {
        let mut world = World::new();
        let fire = world.spawn((Bonfire::new(10.0), Position::new(0.0, 0.0)));
        assert!(!FuelBonfireDef.produces_from(&world, fire));

        world.get::<&mut Bonfire>(fire).unwrap().burn(8.0);
        assert!(FuelBonfireDef.produces_from(&world, fire));
    }

    #[test]
    fn test_fueling_empties_pockets() {
        let mut world = World::new();
        let agent = world.spawn((
            Agent::new(AgentKind::Human),
            Age::new(20.0),
            Position::new(0.0, 0.0),
            Inventory {
                food: 0,
                wood: 3,
                capacity: 6,
            },
        ));
        let fire_entity = world.spawn((Bonfire::new(20.0), Position::new(0.2, 0.0)));
        world.get::<&mut Bonfire>(fire_entity).unwrap().burn(18.0);

        let index = LinearIndex::new();
        let ctx = ctx(&index);
        let mut tasks = Vec::new();
        FuelBonfireDef.produce(&world, fire_entity, &ctx, &mut tasks);

        assert!(FuelBonfireDef.score(&world, agent, &tasks[0], &ctx).unwrap() > 0.9);

        let outcome = FuelBonfireDef.execute(&mut world, agent, &tasks[0], &ctx);
        assert_eq!(outcome.status, TaskStatus::Success);
        assert_eq!(world.get::<&Inventory>(agent).unwrap().wood, 0);
        assert!((world.get::<&Bonfire>(fire_entity).unwrap().fuel - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_warming_by_the_fire() {
        let mut world = World::new();
        let agent = world.spawn((
            Agent::new(AgentKind::Human),
            Position::new(1.0, 0.0),
            Needs {
                cold: 0.9,
                ..Default::default()
            },
        ));
        let fire = world.spawn((Bonfire::new(10.0), Position::new(0.0, 0.0)));

        let index = LinearIndex::new();
        let ctx = ctx(&index);
        let mut tasks = Vec::new();
        SeekWarmthDef.produce(&world, fire, &ctx, &mut tasks);
        let task = &tasks[0];

        assert!(SeekWarmthDef.score(&world, agent, task, &ctx).is_some());

        // Inside the circle already: 0.9 -> 0.6 -> 0.3 -> 0.0
        assert_eq!(SeekWarmthDef.execute(&mut world, agent, task, &ctx).status, TaskStatus::Running);
        assert_eq!(SeekWarmthDef.execute(&mut world, agent, task, &ctx).status, TaskStatus::Running);
        let done = SeekWarmthDef.execute(&mut world, agent, task, &ctx);
        assert_eq!(done.status, TaskStatus::Success);
    }

    #[test]
    fn test_dead_fire_fails_warmth() {
        let mut world = World::new();
        let agent = world.spawn((
            Agent::new(AgentKind::Human),
            Position::new(1.0, 0.0),
            Needs {
                cold: 0.9,
                ..Default::default()
            },
        ));
        let fire = world.spawn((Bonfire::new(10.0), Position::new(0.0, 0.0)));

        let index = LinearIndex::new();
        let ctx = ctx(&index);
        let mut tasks = Vec::new();
        SeekWarmthDef.produce(&world, fire, &ctx, &mut tasks);

        world.get::<&mut Bonfire>(fire).unwrap().burn(100.0);
        assert_eq!(SeekWarmthDef.score(&world, agent, &tasks[0], &ctx), None);

        let outcome = SeekWarmthDef.execute(&mut world, agent, &tasks[0], &ctx);
        assert_eq!(outcome.status, TaskStatus::Failure);
    }
}
