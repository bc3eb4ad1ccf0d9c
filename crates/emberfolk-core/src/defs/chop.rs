//! Chop and HaulWood - felling a tree chains straight into carrying the
//! wood away, with no bidding round in between.

use hecs::{Entity, World};

use super::{is_adult, live_entity, move_toward, position_of, proximity, set_activity};
use crate::components::{ActionLabel, AgentKind, Inventory, Tree};
use crate::tasks::{
    entity_bits, StepOutcome, Target, Task, TaskDefinition, TaskId, TaskKind, TickContext,
};

/// Felling work per hour of chopping.
const CHOP_RATE: f32 = 0.5;

pub struct ChopDef;

impl TaskDefinition for ChopDef {
    fn kind(&self) -> TaskKind {
        TaskKind::Chop
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human]
    }

    fn produces_from(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<&Tree>(entity)
            .map(|t| t.standing)
            .unwrap_or(false)
    }

    fn produce(&self, _world: &World, producer: Entity, ctx: &TickContext, out: &mut Vec<Task>) {
        let bits = entity_bits(producer);
        out.push(Task::new(
            TaskId::derived(bits, TaskKind::Chop),
            TaskKind::Chop,
            bits,
            Target::Entity(bits),
            ctx.time + 4.0,
        ));
    }

    fn score(&self, world: &World, agent: Entity, task: &Task, _ctx: &TickContext) -> Option<f32> {
        if !is_adult(world, agent) {
            return None;
        }
        let Target::Entity(bits) = task.target else {
            return None;
        };
        let tree_entity = live_entity(world, bits)?;
        let standing = world.get::<&Tree>(tree_entity).ok()?.standing;
        if !standing {
            return None;
        }
        let here = position_of(world, agent)?;
        let there = position_of(world, tree_entity)?;
        Some(0.3 + 0.1 * proximity(here, there))
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        ctx: &TickContext,
    ) -> StepOutcome {
        let Target::Entity(bits) = task.target else {
            return StepOutcome::failure("chop task must target a tree");
        };
        let Some(tree_entity) = live_entity(world, bits) else {
            return StepOutcome::failure("tree is gone");
        };
        let Some(tree_pos) = position_of(world, tree_entity) else {
            return StepOutcome::failure("tree is gone");
        };
        if !move_toward(world, agent, tree_pos) {
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Chopping);
        let (felled, wood) = match world.get::<&mut Tree>(tree_entity) {
            Ok(mut tree) => (tree.chop(CHOP_RATE * ctx.dt as f32), tree.wood),
            Err(_) => return StepOutcome::failure("tree is gone"),
        };
        if !felled {
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Idle);
        let mut outcome = StepOutcome::success().with_message("timber");
        if wood > 0 {
            outcome = outcome.with_chain(haul_task(bits, ctx.time));
        }
        outcome
    }
}

/// The follow-up task a felled tree leaves behind. Also registered as its
/// own definition so a freed (or never-started) haul can be re-bid.
fn haul_task(tree_bits: u64, now: f64) -> Task {
    Task::new(
        TaskId::derived(tree_bits, TaskKind::HaulWood),
        TaskKind::HaulWood,
        tree_bits,
        Target::Entity(tree_bits),
        now + 6.0,
    )
}

pub struct HaulWoodDef;

impl TaskDefinition for HaulWoodDef {
    fn kind(&self) -> TaskKind {
        TaskKind::HaulWood
    }

    fn actors(&self) -> &'static [AgentKind] {
        &[AgentKind::Human]
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
        let tree_entity = live_entity(world, bits)?;
        let tree = world.get::<&Tree>(tree_entity).ok()?;
        if tree.standing || tree.wood == 0 {
            return None;
        }
        Some(0.45)
    }

    fn execute(
        &self,
        world: &mut World,
        agent: Entity,
        task: &Task,
        _ctx: &TickContext,
    ) -> StepOutcome {
        let Target::Entity(bits) = task.target else {
            return StepOutcome::failure("haul task must target a tree");
        };
        let Some(tree_entity) = live_entity(world, bits) else {
            return StepOutcome::failure("wood is gone");
        };
        let wood_left = match world.get::<&Tree>(tree_entity) {
            Ok(tree) => tree.wood,
            Err(_) => return StepOutcome::failure("wood is gone"),
        };
        if wood_left == 0 {
            set_activity(world, agent, ActionLabel::Idle);
            return StepOutcome::success().with_message("nothing left to haul");
        }

        let Some(tree_pos) = position_of(world, tree_entity) else {
            return StepOutcome::failure("wood is gone");
        };
        if !move_toward(world, agent, tree_pos) {
            set_activity(world, agent, ActionLabel::Moving);
            return StepOutcome::running();
        }

        set_activity(world, agent, ActionLabel::Hauling);
        let has_space = world
            .get::<&Inventory>(agent)
            .map(|i| !i.is_full())
            .unwrap_or(false);
        if !has_space {
            return StepOutcome::success().with_message("arms full of logs");
        }
        let taken = world
            .get::<&mut Tree>(tree_entity)
            .map(|mut t| t.take_wood(1))
            .unwrap_or(0);
        if taken == 0 {
            return StepOutcome::success().with_message("nothing left to haul");
        }
        if let Ok(mut inventory) = world.get::<&mut Inventory>(agent) {
            inventory.wood += 1;
        }
        StepOutcome::running()
    }
}
