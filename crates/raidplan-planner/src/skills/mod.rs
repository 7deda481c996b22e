pub mod placement;

pub use placement::{
    Indicators, InstanceKey, PlacedSkill, PlacementRange, SkillPlacementManager, StateError,
};
