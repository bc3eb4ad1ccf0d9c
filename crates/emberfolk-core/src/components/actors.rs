//! Acting-entity components: humans and animals that bid on and execute tasks.

use serde::{Deserialize, Serialize};

use crate::tasks::{TaskHistory, TaskId, TaskStatus};

/// Tribe identifier. Strategy objectives are keyed per tribe.
pub type TribeId = u32;

/// Which category of acting entity this is. Definition tables gate bidding
/// on it structurally (animals never bid on Stockpile, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Human,
    Animal,
}

/// Coarse activity label set by task executors, read by debug tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionLabel {
    #[default]
    Idle,
    Moving,
    Eating,
    Gathering,
    Chopping,
    Hauling,
    Stockpiling,
    Fueling,
    Warming,
    Burying,
    Waiting,
    Wandering,
}

/// Scheduler-side state of an acting entity: its claim, its diagnostics,
/// and its bounded task history. Typed fields, not a string-keyed blackboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub kind: AgentKind,
    pub tribe: Option<TribeId>,
    /// The task this agent currently holds a claim on
    pub current_task: Option<TaskId>,
    /// Last executor status, persisted every step for tooling
    pub last_result: Option<TaskStatus>,
    pub last_message: Option<String>,
    pub history: TaskHistory,
    pub activity: ActionLabel,
}

impl Agent {
    pub fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            tribe: None,
            current_task: None,
            last_result: None,
            last_message: None,
            history: TaskHistory::new(),
            activity: ActionLabel::Idle,
        }
    }

    pub fn with_tribe(mut self, tribe: TribeId) -> Self {
        self.tribe = Some(tribe);
        self
    }

    pub fn is_idle(&self) -> bool {
        self.current_task.is_none()
    }
}

/// Age in sim-years. Several task kinds are adults-only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Age {
    pub years: f32,
}

impl Age {
    pub const ADULT_YEARS: f32 = 14.0;

    pub fn new(years: f32) -> Self {
        Self { years }
    }

    pub fn is_adult(&self) -> bool {
        self.years >= Self::ADULT_YEARS
    }
}

/// Needs that drive scoring - all values 0.0 (satisfied) to 1.0 (desperate)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Needs {
    pub hunger: f32,
    /// How cold the entity is (1.0 = freezing)
    pub cold: f32,
    pub energy: f32,
}

impl Needs {
    /// Apply decay over time (needs creep toward 1.0)
    pub fn decay(&mut self, hours: f32) {
        // Rates: hours until the need reaches 1.0 from 0.0
        self.hunger = (self.hunger + hours / 10.0).clamp(0.0, 1.0); // Hungry after 10 hours
        self.cold = (self.cold + hours / 18.0).clamp(0.0, 1.0); // Freezing after 18 hours
        self.energy = (self.energy + hours / 30.0).clamp(0.0, 1.0); // Worn out after 30 hours
    }

    pub fn satisfy_hunger(&mut self, amount: f32) {
        self.hunger = (self.hunger - amount).clamp(0.0, 1.0);
    }

    pub fn warm_up(&mut self, amount: f32) {
        self.cold = (self.cold - amount).clamp(0.0, 1.0);
    }
}

/// Carried resources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Inventory {
    pub food: u32,
    pub wood: u32,
    pub capacity: u32,
}

impl Inventory {
    pub fn new(capacity: u32) -> Self {
        Self {
            food: 0,
            wood: 0,
            capacity,
        }
    }

    pub fn carried(&self) -> u32 {
        self.food + self.wood
    }

    pub fn free_space(&self) -> u32 {
        self.capacity.saturating_sub(self.carried())
    }

    pub fn is_full(&self) -> bool {
        self.free_space() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.carried() == 0
    }
}
