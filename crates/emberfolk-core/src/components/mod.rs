//! Components - pure data attached to entities.

mod actors;
mod common;
mod objects;

pub use actors::*;
pub use common::*;
pub use objects::*;
