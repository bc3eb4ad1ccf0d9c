//! Simulation engine - main entry point for running the simulation.

use hecs::{Entity, World};

use crate::components::{Agent, Vec2};
use crate::defs::standard_table;
use crate::spatial::LinearIndex;
use crate::strategy::StrategicPlan;
use crate::systems::{
    bidding_system, execution_system, movement_system, needs_system, production_system,
    upkeep_system,
};
use crate::tasks::{
    entity_bits, Target, Task, TaskBoard, TaskId, TickContext, DefinitionTable, TaskKind,
};

/// Main simulation engine. One `tick` runs the full
/// production -> bidding -> execution sequence for every entity.
pub struct Simulation {
    /// ECS world containing all entities
    pub world: World,
    /// Live tasks
    pub board: TaskBoard,
    /// Task definitions, keyed by kind
    pub defs: DefinitionTable,
    /// Leader objectives and the modifier table
    pub plan: StrategicPlan,
    /// Simulation time in hours since start
    time: f64,
    tick: u64,
    index: LinearIndex,
}

impl Simulation {
    /// Empty world with the standard task catalog and modifier table.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            board: TaskBoard::new(),
            defs: standard_table(),
            plan: StrategicPlan::standard(),
            time: 0.0,
            tick: 0,
            index: LinearIndex::new(),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Advance the world by `delta_hours`. Single-threaded and synchronous:
    /// the whole sequence completes before this returns, and iteration
    /// order is stable across runs given the same input state.
    pub fn tick(&mut self, delta_hours: f64) {
        self.time += delta_hours;
        self.tick += 1;

        // World clocks first: walking, hunger, fires, regrowth
        movement_system(&mut self.world, delta_hours);
        needs_system(&mut self.world, delta_hours);
        upkeep_system(&mut self.world, delta_hours);

        // Reap dead tasks before producing fresh ones
        self.board.expire(self.time);
        self.index.rebuild(&self.world);

        let ctx = TickContext {
            time: self.time,
            tick: self.tick,
            dt: delta_hours,
            index: &self.index,
        };
        production_system(&self.world, &mut self.board, &self.defs, &ctx);
        bidding_system(
            &mut self.world,
            &mut self.board,
            &self.defs,
            &self.plan,
            &ctx,
        );
        execution_system(&mut self.world, &mut self.board, &self.defs, &ctx);
    }

    /// Issue a direct order: walk to `dest`. Registered pre-claimed at the
    /// sentinel priority; the execution system preempts whatever the entity
    /// was doing on its next step.
    pub fn issue_command(&mut self, entity: Entity, dest: Vec2, duration_hours: f64) -> TaskId {
        let bits = entity_bits(entity);
        let mut task = Task::new(
            TaskId::derived(bits, TaskKind::Command),
            TaskKind::Command,
            bits,
            Target::Point(dest),
            self.time + duration_hours,
        );
        task.claimed_by = Some(bits);
        let id = task.id.clone();
        self.board.insert_claimed(task);
        id
    }

    /// Block an entity for a fixed duration through the ordinary task state
    /// machine - no bespoke cooldown path.
    pub fn block(&mut self, entity: Entity, duration_hours: f64) -> TaskId {
        let task = Task::wait(entity, self.time, duration_hours);
        let id = task.id.clone();
        self.board.insert_claimed(task);
        if let Ok(mut agent) = self.world.get::<&mut Agent>(entity) {
            agent.current_task = Some(id.clone());
        }
        id
    }

    pub fn agent_count(&self) -> usize {
        self.world.query::<&Agent>().iter().count()
    }

    pub fn task_count(&self) -> usize {
        self.board.len()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
