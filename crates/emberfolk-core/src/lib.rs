//! Emberfolk Core - Tribe Life-Simulation Engine
//!
//! A utility-based task allocation engine driving autonomous behavior for
//! simulated people, animals, and stateful world objects (bonfires, bushes,
//! trees, storage huts, corpses).
//!
//! # Architecture
//!
//! Entities live in a `hecs` ECS world. Every tick, a decentralized
//! scheduler runs three passes over it:
//! - **Production**: world objects and agents synthesize candidate tasks
//!   onto the [`tasks::TaskBoard`]
//! - **Bidding**: each agent scores every visible task and claims the top
//!   bid, nudged by its tribe's [`strategy::StrategicPlan`]
//! - **Execution**: each claimed task advances one step; terminal results
//!   free the claim, record history, and may chain a successor
//!
//! # Example
//!
//! ```rust,no_run
//! use emberfolk_core::prelude::*;
//! use emberfolk_core::components::Vec2;
//! use emberfolk_core::spawn;
//!
//! let mut sim = Simulation::new();
//! let mut rng = rand::thread_rng();
//! spawn::spawn_camp(&mut sim.world, &mut rng, Vec2::ZERO, 1, 8);
//!
//! // Run simulation at ten ticks per sim-hour
//! loop {
//!     sim.tick(0.1);
//! }
//! ```

pub mod components;
pub mod defs;
pub mod engine;
pub mod spatial;
pub mod spawn;
pub mod strategy;
pub mod systems;
pub mod tasks;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::Simulation;
    pub use crate::strategy::{Objective, StrategicPlan};
    pub use crate::tasks::{
        StepOutcome, Target, Task, TaskBoard, TaskId, TaskKind, TaskStatus,
    };
}
