use raidplan_core::{Bounds, Encounter, Link, SkillCatalog, SkillId};

use crate::error::PlannerError;
use crate::graph::layout::{layout, LayoutError, LayoutParams};
use crate::graph::links::links;
use crate::graph::model::{NodeIndex, TimelineGraph};
use crate::graph::parse::parse_encounter;
use crate::graph::ruler::{ruler, Tick};
use crate::skills::placement::{
    Indicators, InstanceKey, PlacementRange, SkillPlacementManager, StateError,
};
use crate::util::config::PlannerConfig;
use crate::util::time::axis_end;

#[derive(Debug, Default)]
pub struct NodeSelection {
    pub selected: Vec<NodeIndex>, // click order
    pub hovered: Option<NodeIndex>,
}

impl NodeSelection {
    pub fn is_selected(&self, idx: NodeIndex) -> bool {
        self.selected.contains(&idx)
    }
}

/// Everything one open timeline needs. Each planner view owns its own, so
/// several timelines can coexist.
#[derive(Debug)]
pub struct PlannerState {
    pub cfg: PlannerConfig,
    pub graph: TimelineGraph,
    pub bounds: Bounds,
    pub links: Vec<Link>,
    pub placement: SkillPlacementManager,
    pub selection: NodeSelection,
}

impl PlannerState {
    pub fn from_encounter(enc: &Encounter, cfg: PlannerConfig) -> Result<Self, PlannerError> {
        let graph = parse_encounter(enc)?;
        let mut st = Self {
            cfg,
            graph,
            bounds: Bounds::default(),
            links: Vec::new(),
            placement: SkillPlacementManager::new(),
            selection: NodeSelection::default(),
        };
        st.relayout()?;
        Ok(st)
    }

    /// Recomputes positions, bounds and links wholesale. On error the
    /// previous layout is kept.
    pub fn relayout(&mut self) -> Result<(), LayoutError> {
        let bounds = layout(&mut self.graph, LayoutParams::from_config(&self.cfg))?;
        self.bounds = bounds;
        self.links = links(&self.graph, self.cfg.h_scale);
        Ok(())
    }

    pub fn placement_range(&self) -> PlacementRange {
        PlacementRange::new(self.cfg.x_offset(), self.bounds.max_time, self.cfg.h_scale)
    }

    pub fn ruler(&self) -> Vec<Tick> {
        ruler(self.bounds.max_time, self.cfg.h_scale, self.cfg.x_offset())
    }

    /// Width and height of the drawing surface.
    pub fn canvas_size(&self) -> (f64, f64) {
        let width = 3.0 * self.cfg.x_offset() + axis_end(self.bounds.max_time) * self.cfg.h_scale;
        let height = self.bounds.total_height + self.cfg.top_padding + self.cfg.bottom_padding;
        (width, height)
    }

    // ----- Skill placement -----
    pub fn place_skill(
        &mut self,
        catalog: &SkillCatalog,
        skill_id: &SkillId,
        raw_x: f64,
    ) -> Result<InstanceKey, StateError> {
        let range = self.placement_range();
        self.placement
            .place_from_catalog(catalog, skill_id, raw_x, &range)
    }

    pub fn drag_skill(
        &mut self,
        key: &InstanceKey,
        raw_x: f64,
    ) -> Result<Option<Indicators>, StateError> {
        let range = self.placement_range();
        self.placement.reposition(key, raw_x, &range)
    }

    pub fn click_skill(&mut self, key: &InstanceKey) -> Result<Option<Indicators>, StateError> {
        self.placement.toggle_focus(key, self.cfg.h_scale)
    }

    // ----- Timeline events -----
    /// Returns whether the event is selected afterwards.
    pub fn toggle_node_selected(&mut self, idx: NodeIndex) -> Result<bool, StateError> {
        self.check_node(idx)?;
        if let Some(pos) = self.selection.selected.iter().position(|s| *s == idx) {
            self.selection.selected.remove(pos);
            Ok(false)
        } else {
            self.selection.selected.push(idx);
            Ok(true)
        }
    }

    pub fn hover_node(&mut self, idx: NodeIndex) -> Result<(), StateError> {
        self.check_node(idx)?;
        self.selection.hovered = Some(idx);
        Ok(())
    }

    pub fn unhover_node(&mut self) {
        self.selection.hovered = None;
    }

    fn check_node(&self, idx: NodeIndex) -> Result<(), StateError> {
        if self.graph.contains_event(idx) {
            Ok(())
        } else {
            Err(StateError::UnknownNode(idx.0))
        }
    }
}
