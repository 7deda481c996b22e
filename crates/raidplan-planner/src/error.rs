use crate::graph::layout::LayoutError;
use crate::graph::parse::ValidationError;
use crate::skills::placement::StateError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("invalid encounter timeline: {0}")]
    Validation(#[from] ValidationError),
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    State(#[from] StateError),
}
