//! Encounter timeline planner: turns a nested encounter script into a laid
//! out event graph and tracks the skills a player plans against it.

pub mod error;
pub mod graph;
pub mod skills;
pub mod state;
pub mod util;

pub use error::PlannerError;
pub use state::PlannerState;
