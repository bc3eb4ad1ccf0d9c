//! Task data model - ephemeral units of assignable work.
//!
//! Every tick, world objects and agents produce candidate tasks into the
//! [`TaskBoard`], agents bid on them through per-kind scoring functions, and
//! the winning claimant executes one step per tick until the task reports a
//! terminal result or its deadline passes.

mod board;
mod definition;
mod history;

pub use board::TaskBoard;
pub use definition::{DefinitionTable, TaskDefinition, TickContext};
pub use history::{HistoryEntry, TaskHistory, HISTORY_CAP};

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::components::{Circle, Rect, Vec2};

/// Sentinel bid for the authoritative override path (direct commands).
/// Ordinary scorers stay in roughly 0.0..=1.0; nothing they return can
/// outbid this.
pub const OVERRIDE_SCORE: f32 = 1000.0;

/// Stable identifier for an entity across the task boundary.
/// Tasks must not hold `hecs::Entity` handles in serialized form, so they
/// carry the raw id bits instead and resolve them back with liveness checks.
pub fn entity_bits(entity: Entity) -> u64 {
    entity.to_bits().get()
}

/// Resolve id bits back to an entity handle. The handle may still refer to a
/// despawned entity; callers check liveness with `World::contains`.
pub fn entity_from_bits(bits: u64) -> Option<Entity> {
    Entity::from_bits(bits)
}

/// Unique task identifier, derived deterministically from the creator and
/// task kind so that re-production this tick maps onto the same entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Id for a task a creator produces at most one of.
    pub fn derived(creator: u64, kind: TaskKind) -> Self {
        Self(format!("{creator}/{kind}"))
    }

    /// Id for one of several identical-shape tasks (e.g. warmth slots).
    pub fn slot(creator: u64, kind: TaskKind, slot: usize) -> Self {
        Self(format!("{creator}/{kind}/{slot}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of task kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Find food and eat it (self-produced by hungry agents)
    Eat,
    /// Pick berries from a bush
    Gather,
    /// Fell a standing tree
    Chop,
    /// Carry felled wood away (chained from Chop)
    HaulWood,
    /// Deposit carried resources into a storage hut
    Stockpile,
    /// Feed wood to a dying bonfire
    FuelBonfire,
    /// Stand near a lit bonfire to warm up (one task per slot)
    SeekWarmth,
    /// Put a corpse in the ground
    Bury,
    /// Direct player command - the one sanctioned preemption path
    Command,
    /// Block the agent until a deadline; no producer, injected externally
    Wait,
    /// Idle fallback - amble somewhere nearby
    Wander,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Eat => "eat",
            TaskKind::Gather => "gather",
            TaskKind::Chop => "chop",
            TaskKind::HaulWood => "haul-wood",
            TaskKind::Stockpile => "stockpile",
            TaskKind::FuelBonfire => "fuel-bonfire",
            TaskKind::SeekWarmth => "seek-warmth",
            TaskKind::Bury => "bury",
            TaskKind::Command => "command",
            TaskKind::Wait => "wait",
            TaskKind::Wander => "wander",
        }
    }

    /// The authoritative override kind wins bidding unconditionally and may
    /// preempt a running task (see the execution system).
    pub fn is_override(&self) -> bool {
        matches!(self, TaskKind::Command)
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a task is aimed at. Executors pattern-match exhaustively instead of
/// sniffing a loosely-typed field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Another entity, by id bits
    Entity(u64),
    /// A point in the world
    Point(Vec2),
    /// A rectangular region
    Rect(Rect),
    /// A circular region
    Circle(Circle),
}

/// Terminal/progress state reported by an executor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Running,
    Success,
    Failure,
}

/// A transient work item. Lives on the [`TaskBoard`] from production until a
/// terminal executor result or deadline expiry removes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    /// Entity that produced this task (ownership for revalidation)
    pub creator: u64,
    /// Acting entity currently executing it; `None` = unclaimed
    pub claimed_by: Option<u64>,
    pub target: Target,
    /// Absolute sim-time deadline; past it the task is garbage
    pub valid_until: f64,
    /// Static successor enqueued on success. The executor's dynamically
    /// returned chain takes precedence over this.
    pub next: Option<Box<Task>>,
}

impl Task {
    pub fn new(id: TaskId, kind: TaskKind, creator: u64, target: Target, valid_until: f64) -> Self {
        Self {
            id,
            kind,
            creator,
            claimed_by: None,
            target,
            valid_until,
            next: None,
        }
    }

    pub fn with_next(mut self, next: Task) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    /// Build the built-in Wait task: blocks the claimant until `until`, then
    /// succeeds on the last tick before the deadline. Pre-claimed so the
    /// blocked entity holds it without a bidding round.
    pub fn wait(entity: Entity, now: f64, duration: f64) -> Self {
        let bits = entity_bits(entity);
        let mut task = Self::new(
            TaskId::derived(bits, TaskKind::Wait),
            TaskKind::Wait,
            bits,
            Target::Entity(bits),
            now + duration,
        );
        task.claimed_by = Some(bits);
        task
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.valid_until < now
    }
}

/// Structured result of one executor step - no tuple-or-bare-enum ambiguity.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub status: TaskStatus,
    pub message: Option<String>,
    /// Dynamic successor; registered pre-claimed on success
    pub chained: Option<Task>,
}

impl StepOutcome {
    pub fn running() -> Self {
        Self {
            status: TaskStatus::Running,
            message: None,
            chained: None,
        }
    }

    pub fn success() -> Self {
        Self {
            status: TaskStatus::Success,
            message: None,
            chained: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failure,
            message: Some(message.into()),
            chained: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_chain(mut self, task: Task) -> Self {
        self.chained = Some(task);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_ids_are_deterministic() {
        let a = TaskId::derived(42, TaskKind::Gather);
        let b = TaskId::derived(42, TaskKind::Gather);
        assert_eq!(a, b);

        let c = TaskId::derived(42, TaskKind::Eat);
        assert_ne!(a, c);

        let s0 = TaskId::slot(7, TaskKind::SeekWarmth, 0);
        let s1 = TaskId::slot(7, TaskKind::SeekWarmth, 1);
        assert_ne!(s0, s1);
    }

    #[test]
    fn test_task_expiry() {
        let task = Task::new(
            TaskId::derived(1, TaskKind::Gather),
            TaskKind::Gather,
            1,
            Target::Point(Vec2::ZERO),
            10.0,
        );
        assert!(!task.is_expired(9.0));
        assert!(!task.is_expired(10.0));
        assert!(task.is_expired(10.5));
    }

    #[test]
    fn test_step_outcome_builders() {
        let outcome = StepOutcome::failure("target gone");
        assert_eq!(outcome.status, TaskStatus::Failure);
        assert_eq!(outcome.message.as_deref(), Some("target gone"));
        assert!(outcome.chained.is_none());

        let chained = Task::new(
            TaskId::derived(2, TaskKind::HaulWood),
            TaskKind::HaulWood,
            2,
            Target::Entity(2),
            5.0,
        );
        let outcome = StepOutcome::success().with_chain(chained);
        assert_eq!(outcome.status, TaskStatus::Success);
        assert!(outcome.chained.is_some());
    }
}
