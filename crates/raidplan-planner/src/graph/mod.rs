pub mod layout;
pub mod links;
pub mod model;
pub mod parse;
pub mod ruler;
pub mod traverse;

pub use layout::{layout, LayoutError, LayoutParams};
pub use links::links;
pub use model::{Node, NodeIndex, TimelineGraph, ROOT};
pub use parse::{parse, parse_encounter, TimelineParser, ValidationError};
