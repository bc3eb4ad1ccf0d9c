//! Stockpile - storage huts with spare room ask for carried goods.

use hecs::{Entity, World};

use super::{is_adult, live_entity, move_toward, position_of, set_activity};
use crate::components::{ActionLabel, AgentKind, Inventory, Storage};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskId, TaskKind, TickContext,
};

pub struct StockpileDef;

impl TaskDefinition for StockpileDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Stockpile
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human]
    }

    fn produces_from(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Storage>(entity)
            .map(|s| s.free_space() > 0)
            .unwrap_or(false)
    }

    fn produce(&self, _world: &World, producer: Entity, ctx: &TickContext, out: &mut Vec<Task>) {
        let bits = entity_bits(producer);
        out.push(Task::new(
            TaskId::derived(bits, TaskKind::Stockpile),
            TaskKind::Stockpile,
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
        if inventory.is_empty() {
            return None;
        }
        let load = inventory.carried() as f32 / inventory.capacity.max(1) as f32;
        drop(inventory);

        let Target::Entity(bits) = task.target else {
            return None;
        };
        let storage_entity = live_entity(world, bits)?;
        let has_room = world
            .get::<&Storage>(storage_entity)
            .map(|s| s.free_space() > 0)
            .unwrap_or(false);
        if !has_room {
            return None;
        }
        // The fuller the pockets, the keener the trip
        Some((0.3 + 0.4 * load).min(1.0))
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        _ctx: &TickContext,
    ) -> StepOutcome {
        let Target::Entity(bits) = task.target else {
            return StepOutcome::failure("stockpile task must target a storage hut");
        };
        let Some(storage_entity) = live_entity(world, bits) else {
            return StepOutcome::failure("storage hut is gone");
        };
        let Some(storage_pos) = position_of(world, storage_entity) else {
            return StepOutcome::failure("storage hut is gone");
        };
        if !move_toward(world, agent, storage_pos) {
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Stockpiling);
        let (food, wood) = match world.get::<&Inventory>(agent) {
            Ok(inventory) => (inventory.food, inventory.wood),
            Err(_) => return StepOutcome::failure("nothing to deposit"),
        };
        let mut deposited = 0;
        if let Ok(mut storage) = world.get::<&mut Storage>(storage_entity) {
            let space = storage.free_space();
            if space == 0 {
                return StepOutcome::failure("store is full");
            }
            let take_food = food.min(space);
            let take_wood = wood.min(space - take_food);
            storage.food += take_food;
            storage.wood += take_wood;
            deposited = take_food + take_wood;

            if let Ok(mut inventory) = world.get::<&mut Inventory>(agent) {
                inventory.food -= take_food;
                inventory.wood -= take_wood;
            }
        }
        set_activity(world, agent, ActionLabel::Idle);
        StepOutcome::success().with_message(format!("stored {deposited}"))
    }
}
