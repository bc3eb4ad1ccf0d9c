//! Strategic modifier layer - a leader's objective nudges the whole tribe.
//!
//! Consumed only inside the bidding wrapper, never inside raw scorers, so
//! individual task definitions stay objective-agnostic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::TribeId;
use crate::tasks::TaskKind;

/// High-level objective a tribe leader can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Objective {
    /// Eat well now - food tasks up, logistics down
    Feast,
    /// Fill the stores - gathering and hauling up
    Hoard,
    /// Keep the fires burning - fuel and warmth up
    Warm,
    /// Tidy the camp - burying and stockpiling up
    Fortify,
}

/// Objective per tribe plus the static objective x task-kind multiplier
/// table. Missing entries mean 1.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategicPlan {
    objectives: BTreeMap<TribeId, Objective>,
    modifiers: BTreeMap<(Objective, TaskKind), f32>,
}

impl StrategicPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard multiplier table. Values multiply raw scores, so they
    /// range from strong de-prioritization (0.3) to strong boost (2.5).
    pub fn standard() -> Self {
        let mut plan = Self::new();
        let table = [
            ((Objective::Feast, TaskKind::Eat), 2.0),
            ((Objective::Feast, TaskKind::Gather), 0.8),
            ((Objective::Feast, TaskKind::Stockpile), 0.5),
            ((Objective::Feast, TaskKind::Chop), 0.4),
            ((Objective::Hoard, TaskKind::Gather), 2.5),
            ((Objective::Hoard, TaskKind::Stockpile), 2.0),
            ((Objective::Hoard, TaskKind::HaulWood), 1.5),
            ((Objective::Hoard, TaskKind::Eat), 0.7),
            ((Objective::Warm, TaskKind::FuelBonfire), 2.5),
            ((Objective::Warm, TaskKind::SeekWarmth), 1.8),
            ((Objective::Warm, TaskKind::Chop), 1.5),
            ((Objective::Warm, TaskKind::Gather), 0.6),
            ((Objective::Fortify, TaskKind::Bury), 2.0),
            ((Objective::Fortify, TaskKind::Stockpile), 1.5),
            ((Objective::Fortify, TaskKind::Wander), 0.3),
        ];
        for (key, value) in table {
            plan.modifiers.insert(key, value);
        }
        plan
    }

    pub fn set_objective(&mut self, tribe: TribeId, objective: Objective) {
        self.objectives.insert(tribe, objective);
    }

    pub fn clear_objective(&mut self, tribe: TribeId) {
        self.objectives.remove(&tribe);
    }

    pub fn objective(&self, tribe: TribeId) -> Option<Objective> {
        self.objectives.get(&tribe).copied()
    }

    /// Multiplier for a (objective, kind) pair; 1.0 when absent.
    pub fn modifier(&self, objective: Objective, kind: TaskKind) -> f32 {
        self.modifiers
            .get(&(objective, kind))
            .copied()
            .unwrap_or(1.0)
    }

    /// Apply the active modifier to a raw bid. Ineligible (`None`) stays
    /// ineligible no matter the objective - multipliers are multiplicative,
    /// never resurrective.
    pub fn apply(&self, raw: Option<f32>, objective: Option<Objective>, kind: TaskKind) -> Option<f32> {
        match (raw, objective) {
            (Some(score), Some(objective)) => Some(score * self.modifier(objective, kind)),
            (raw, _) => raw,
        }
    }
}
