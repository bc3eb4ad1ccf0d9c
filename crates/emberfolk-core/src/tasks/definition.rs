//! Task definitions - the declarative {producer, scorer, executor} triples.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use super::{StepOutcome, Task, TaskKind};
use crate::components::AgentKind;
use crate::spatial::SpatialIndex;

/// Read-only per-tick context handed to producers, scorers, and executors.
pub struct TickContext<'a> {
    /// Monotonic simulation time (hours)
    pub time: f64,
    /// Tick counter, used for history timestamps
    pub tick: u64,
    /// Length of this tick in sim-time
    pub dt: f64,
    /// Black-box spatial lookup service
    pub index: &'a dyn SpatialIndex,
}

/// Static behavior of one task kind.
///
/// A definition is pure dispatch: it owns no state of its own. Production and
/// scoring read the world; only execution mutates it (movement targets,
/// resource transfers, activity labels on the acting entity).
pub trait TaskDefinition {
    fn kind(&self) -> TaskKind;

    /// Acting kinds that may bid on this task at all. Finer gating (e.g.
    /// adults only) lives in the scorer, which returns `None` when the agent
    /// is ineligible.
    fn actors(&self) -> &'static [AgentKind];

    /// Whether this definition synthesizes tasks from the given entity.
    /// Default: this kind has no producer (Wait, Command).
    fn produces_from(&self, _world: &World, _entity: Entity) -> bool {
        false
    }

    /// Produce zero or more candidate tasks from one entity's current state.
    /// Must be deterministic given identical inputs; never fails - "nothing
    /// to do" means producing nothing. Usefulness filtering is the scorer's
    /// job, not the producer's.
    fn produce(&self, _world: &World, _producer: Entity, _ctx: &TickContext, _out: &mut Vec<Task>) {
    }

    /// Bid on a task. `None` = ineligible; otherwise roughly 0.0..=1.0, with
    /// [`super::OVERRIDE_SCORE`] reserved for the authoritative override.
    fn score(&self, world: &World, agent: Entity, task: &Task, ctx: &TickContext) -> Option<f32>;

    /// Advance the claimed task by one tick.
    fn execute(&self, world: &mut World, agent: Entity, task: &Task, ctx: &TickContext)
        -> StepOutcome;
}

/// Lookup table from task kind to its definition.
#[derive(Default)]
pub struct DefinitionTable {
    defs: BTreeMap<TaskKind, Box<dyn TaskDefinition>>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: Box<dyn TaskDefinition>) {
        self.defs.insert(def.kind(), def);
    }

    pub fn get(&self, kind: TaskKind) -> Option<&dyn TaskDefinition> {
        self.defs.get(&kind).map(|d| d.as_ref())
    }

    /// Definitions in stable (kind) order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn TaskDefinition> {
        self.defs.values().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
