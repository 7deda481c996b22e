use raidplan_core::{SkillCatalog, SkillDef, SkillId, Window};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::util::time::{axis_end, clamp};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("no placed instance {instance_id} of skill `{skill_id}`")]
    UnknownInstance { skill_id: String, instance_id: u32 },
    #[error("skill `{0}` is not in the catalog")]
    UnknownSkill(String),
    #[error("no timeline event at index {0}")]
    UnknownNode(usize),
    #[error("cooldown overlap detection is not supported yet")]
    OverlapCheckUnsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillTiming {
    pub duration: f64,
    pub cooldown: f64,
}

impl From<&SkillDef> for SkillTiming {
    fn from(def: &SkillDef) -> Self {
        Self {
            duration: def.duration,
            cooldown: def.cooldown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InstanceKey {
    pub skill_id: SkillId,
    pub instance_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSkill {
    pub skill_id: SkillId,
    pub instance_id: u32,
    pub time: f64, // pixel offset, already clamped
    pub overlapping: bool,
    pub timing: SkillTiming,
    pub z_order: u64,
}

impl PlacedSkill {
    pub fn key(&self) -> InstanceKey {
        InstanceKey {
            skill_id: self.skill_id.clone(),
            instance_id: self.instance_id,
        }
    }

    pub fn indicators(&self, h_scale: f64) -> Indicators {
        let active_end = self.time + self.timing.duration * h_scale;
        Indicators {
            duration: Window {
                start: self.time,
                end: active_end,
            },
            cooldown: Window {
                start: active_end,
                end: self.time + self.timing.cooldown * h_scale,
            },
        }
    }
}

/// Duration and cooldown windows of the focused instance, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Indicators {
    pub duration: Window,
    pub cooldown: Window,
}

/// Valid horizontal span for placed skills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRange {
    pub x_offset: f64,
    pub x_max: f64,
    pub h_scale: f64,
}

impl PlacementRange {
    pub fn new(x_offset: f64, max_time: f64, h_scale: f64) -> Self {
        Self {
            x_offset,
            x_max: axis_end(max_time) * h_scale,
            h_scale,
        }
    }

    pub fn clamp(&self, raw_x: f64) -> f64 {
        clamp(self.x_offset, raw_x, self.x_max)
    }
}

/// Skill instances the user has dropped on the planning bar, plus the single
/// focused and hovered instance.
#[derive(Debug, Default)]
pub struct SkillPlacementManager {
    placed: BTreeMap<SkillId, Vec<PlacedSkill>>,
    next_instance: BTreeMap<SkillId, u32>,
    focused: Option<InstanceKey>,
    hovered: Option<InstanceKey>,
    indicators: Option<Indicators>,
    z_counter: u64,
}

impl SkillPlacementManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance ids count up per skill and are never handed out twice, even
    /// after removals.
    pub fn place(
        &mut self,
        skill_id: &SkillId,
        def: &SkillDef,
        raw_x: f64,
        range: &PlacementRange,
    ) -> InstanceKey {
        let counter = self.next_instance.entry(skill_id.clone()).or_insert(0);
        let instance_id = *counter;
        *counter += 1;

        let z_order = self.raise();
        let placed = PlacedSkill {
            skill_id: skill_id.clone(),
            instance_id,
            time: range.clamp(raw_x),
            overlapping: false,
            timing: SkillTiming::from(def),
            z_order,
        };
        let key = placed.key();
        tracing::debug!(skill = %skill_id.0, instance_id, time = placed.time, "skill placed");
        self.placed.entry(skill_id.clone()).or_default().push(placed);
        key
    }

    pub fn place_from_catalog(
        &mut self,
        catalog: &SkillCatalog,
        skill_id: &SkillId,
        raw_x: f64,
        range: &PlacementRange,
    ) -> Result<InstanceKey, StateError> {
        let def = catalog
            .get(skill_id)
            .ok_or_else(|| StateError::UnknownSkill(skill_id.0.clone()))?;
        Ok(self.place(skill_id, def, raw_x, range))
    }

    /// Moves an instance (drag). When it is the focused one, the refreshed
    /// indicator windows are returned so they can follow the drag.
    pub fn reposition(
        &mut self,
        key: &InstanceKey,
        raw_x: f64,
        range: &PlacementRange,
    ) -> Result<Option<Indicators>, StateError> {
        let placed = self.get_mut(key)?;
        placed.time = range.clamp(raw_x);
        let windows = placed.indicators(range.h_scale);

        if self.focused.as_ref() == Some(key) {
            self.indicators = Some(windows);
            Ok(Some(windows))
        } else {
            Ok(None)
        }
    }

    pub fn remove(&mut self, key: &InstanceKey) -> Result<PlacedSkill, StateError> {
        let list = self
            .placed
            .get_mut(&key.skill_id)
            .ok_or_else(|| unknown(key))?;
        let pos = list
            .iter()
            .position(|p| p.instance_id == key.instance_id)
            .ok_or_else(|| unknown(key))?;
        let removed = list.remove(pos);

        if self.focused.as_ref() == Some(key) {
            self.unfocus();
        }
        if self.hovered.as_ref() == Some(key) {
            self.hovered = None;
        }
        Ok(removed)
    }

    /// Focusing replaces any previous focus.
    pub fn focus(&mut self, key: &InstanceKey, h_scale: f64) -> Result<Indicators, StateError> {
        self.get(key).ok_or_else(|| unknown(key))?;
        let z = self.raise();
        let placed = self.get_mut(key)?;
        placed.z_order = z;
        let windows = placed.indicators(h_scale);

        self.focused = Some(key.clone());
        self.indicators = Some(windows);
        Ok(windows)
    }

    pub fn unfocus(&mut self) {
        self.focused = None;
        self.indicators = None;
    }

    /// Click behaviour: focus, or unfocus when already focused.
    pub fn toggle_focus(
        &mut self,
        key: &InstanceKey,
        h_scale: f64,
    ) -> Result<Option<Indicators>, StateError> {
        if self.focused.as_ref() == Some(key) {
            self.unfocus();
            Ok(None)
        } else {
            self.focus(key, h_scale).map(Some)
        }
    }

    pub fn hover(&mut self, key: &InstanceKey) -> Result<(), StateError> {
        self.get(key).ok_or_else(|| unknown(key))?;
        let z = self.raise();
        self.get_mut(key)?.z_order = z;
        self.hovered = Some(key.clone());
        Ok(())
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    /// Would `candidate` at `position` run into another instance's active or
    /// cooldown window? The conflict rule is still undecided, so this always
    /// reports the capability as unsupported and `overlapping` stays false.
    pub fn overlap_intersects(
        &self,
        candidate: &SkillId,
        position: f64,
    ) -> Result<bool, StateError> {
        tracing::debug!(skill = %candidate.0, position, "overlap check requested");
        Err(StateError::OverlapCheckUnsupported)
    }

    pub fn focused(&self) -> Option<&InstanceKey> {
        self.focused.as_ref()
    }

    pub fn hovered(&self) -> Option<&InstanceKey> {
        self.hovered.as_ref()
    }

    /// Visible indicator windows; `None` when nothing is focused.
    pub fn indicators(&self) -> Option<&Indicators> {
        self.indicators.as_ref()
    }

    pub fn get(&self, key: &InstanceKey) -> Option<&PlacedSkill> {
        self.placed
            .get(&key.skill_id)?
            .iter()
            .find(|p| p.instance_id == key.instance_id)
    }

    pub fn instances(&self, skill_id: &SkillId) -> &[PlacedSkill] {
        self.placed.get(skill_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedSkill> {
        self.placed.values().flatten()
    }

    pub fn placed(&self) -> &BTreeMap<SkillId, Vec<PlacedSkill>> {
        &self.placed
    }

    /// Back-to-front drawing order.
    pub fn draw_order(&self) -> Vec<InstanceKey> {
        let mut all: Vec<&PlacedSkill> = self.iter().collect();
        all.sort_by_key(|p| p.z_order);
        all.into_iter().map(PlacedSkill::key).collect()
    }

    fn get_mut(&mut self, key: &InstanceKey) -> Result<&mut PlacedSkill, StateError> {
        self.placed
            .get_mut(&key.skill_id)
            .and_then(|list| list.iter_mut().find(|p| p.instance_id == key.instance_id))
            .ok_or_else(|| unknown(key))
    }

    fn raise(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }
}

fn unknown(key: &InstanceKey) -> StateError {
    StateError::UnknownInstance {
        skill_id: key.skill_id.0.clone(),
        instance_id: key.instance_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dawn() -> SkillDef {
        SkillDef {
            duration: 21.0,
            cooldown: 60.0,
            name: "Whispering Dawn".to_string(),
            icon: String::new(),
            description: String::new(),
        }
    }

    fn range() -> PlacementRange {
        // axis ends at 30s -> 1140px
        PlacementRange::new(98.0, 20.0, 38.0)
    }

    fn skill() -> SkillId {
        SkillId::from("whispering_dawn")
    }

    #[test]
    fn place_clamps_below_offset() {
        let mut m = SkillPlacementManager::new();
        let key = m.place(&skill(), &dawn(), -50.0, &range());
        assert_eq!(m.get(&key).map(|p| p.time), Some(98.0));
    }

    #[test]
    fn place_clamps_past_axis_end() {
        let mut m = SkillPlacementManager::new();
        let key = m.place(&skill(), &dawn(), 5000.0, &range());
        assert_eq!(m.get(&key).map(|p| p.time), Some(30.0 * 38.0));
    }

    #[test]
    fn instance_ids_increase_and_survive_removal() {
        let mut m = SkillPlacementManager::new();
        let a = m.place(&skill(), &dawn(), 100.0, &range());
        let b = m.place(&skill(), &dawn(), 200.0, &range());
        let c = m.place(&skill(), &dawn(), 300.0, &range());
        assert_eq!((a.instance_id, b.instance_id, c.instance_id), (0, 1, 2));

        m.remove(&b).expect("remove");
        let d = m.place(&skill(), &dawn(), 400.0, &range());
        assert_eq!(d.instance_id, 3);

        let ids: Vec<u32> = m.instances(&skill()).iter().map(|p| p.instance_id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn ids_are_per_skill() {
        let mut m = SkillPlacementManager::new();
        m.place(&skill(), &dawn(), 100.0, &range());
        let other = m.place(&SkillId::from("fey_illumination"), &dawn(), 100.0, &range());
        assert_eq!(other.instance_id, 0);
    }

    #[test]
    fn focus_exposes_windows_and_follows_drag() {
        let mut m = SkillPlacementManager::new();
        let key = m.place(&skill(), &dawn(), 100.0, &range());

        let w = m.focus(&key, 38.0).expect("focus");
        assert_eq!(w.duration, Window { start: 100.0, end: 100.0 + 21.0 * 38.0 });
        assert_eq!(w.cooldown.end, 100.0 + 60.0 * 38.0);

        let moved = m.reposition(&key, 150.0, &range()).expect("drag");
        let moved = moved.expect("focused drag emits windows");
        assert_eq!(moved.duration.start, 150.0);
        assert_eq!(moved.cooldown.start, 150.0 + 21.0 * 38.0);
        assert_eq!(m.indicators(), Some(&moved));
    }

    #[test]
    fn dragging_an_unfocused_instance_emits_nothing() {
        let mut m = SkillPlacementManager::new();
        let a = m.place(&skill(), &dawn(), 100.0, &range());
        let b = m.place(&skill(), &dawn(), 300.0, &range());
        m.focus(&a, 38.0).expect("focus");
        assert_eq!(m.reposition(&b, 320.0, &range()).expect("drag"), None);
        assert_eq!(m.get(&b).map(|p| p.time), Some(320.0));
        assert_eq!(m.indicators().map(|w| w.duration.start), Some(100.0));
    }

    #[test]
    fn focus_is_exclusive_and_toggles() {
        let mut m = SkillPlacementManager::new();
        let a = m.place(&skill(), &dawn(), 100.0, &range());
        let b = m.place(&skill(), &dawn(), 300.0, &range());

        m.focus(&a, 38.0).expect("focus a");
        m.focus(&b, 38.0).expect("focus b");
        assert_eq!(m.focused(), Some(&b));

        assert_eq!(m.toggle_focus(&b, 38.0).expect("toggle"), None);
        assert!(m.focused().is_none());
        assert!(m.indicators().is_none());
    }

    #[test]
    fn removing_focused_and_hovered_clears_them() {
        let mut m = SkillPlacementManager::new();
        let a = m.place(&skill(), &dawn(), 100.0, &range());
        m.focus(&a, 38.0).expect("focus");
        m.hover(&a).expect("hover");

        m.remove(&a).expect("remove");
        assert!(m.focused().is_none());
        assert!(m.hovered().is_none());
        assert!(m.indicators().is_none());
    }

    #[test]
    fn stale_keys_fail_without_touching_state() {
        let mut m = SkillPlacementManager::new();
        let a = m.place(&skill(), &dawn(), 100.0, &range());
        let b = m.place(&skill(), &dawn(), 300.0, &range());
        m.focus(&b, 38.0).expect("focus");
        m.remove(&a).expect("remove");

        assert!(matches!(m.remove(&a), Err(StateError::UnknownInstance { .. })));
        assert!(m.focus(&a, 38.0).is_err());
        assert!(m.hover(&a).is_err());
        assert!(m.reposition(&a, 10.0, &range()).is_err());

        assert_eq!(m.focused(), Some(&b));
        assert_eq!(m.instances(&skill()).len(), 1);
    }

    #[test]
    fn hover_and_focus_raise_draw_order() {
        let mut m = SkillPlacementManager::new();
        let a = m.place(&skill(), &dawn(), 100.0, &range());
        let b = m.place(&skill(), &dawn(), 300.0, &range());
        assert_eq!(m.draw_order(), vec![a.clone(), b.clone()]);

        m.hover(&a).expect("hover");
        assert_eq!(m.draw_order(), vec![b.clone(), a.clone()]);
        m.unhover();
        assert!(m.hovered().is_none());

        m.focus(&b, 38.0).expect("focus");
        assert_eq!(m.draw_order(), vec![a, b]);
    }

    #[test]
    fn catalog_placement_rejects_unknown_skill() {
        let catalog = SkillCatalog::default();
        let mut m = SkillPlacementManager::new();
        let err = m
            .place_from_catalog(&catalog, &skill(), 100.0, &range())
            .unwrap_err();
        assert_eq!(err, StateError::UnknownSkill("whispering_dawn".into()));
    }

    #[test]
    fn overlap_check_is_explicitly_unsupported() {
        let mut m = SkillPlacementManager::new();
        m.place(&skill(), &dawn(), 100.0, &range());
        assert_eq!(
            m.overlap_intersects(&skill(), 120.0),
            Err(StateError::OverlapCheckUnsupported)
        );
        assert!(m.iter().all(|p| !p.overlapping));
    }

    #[test]
    fn reposition_clamps_far_drags_to_the_axis() {
        let mut m = SkillPlacementManager::new();
        let key = m.place(&skill(), &dawn(), 300.0, &range());

        m.reposition(&key, -1e6, &range()).expect("drag left");
        assert_eq!(m.get(&key).map(|p| p.time), Some(98.0));

        m.reposition(&key, 1e6, &range()).expect("drag right");
        assert_eq!(m.get(&key).map(|p| p.time), Some(1140.0));
    }

    #[test]
    fn stale_keys_leave_draw_order_untouched() {
        let mut m = SkillPlacementManager::new();
        let a = m.place(&skill(), &dawn(), 100.0, &range());
        let b = m.place(&skill(), &dawn(), 300.0, &range());
        let z_b = m.get(&b).map(|p| p.z_order).expect("b");
        m.remove(&a).expect("remove");

        assert!(m.hover(&a).is_err());
        assert!(m.focus(&a, 38.0).is_err());
        assert!(m.hovered().is_none());
        assert!(m.focused().is_none());

        m.hover(&b).expect("hover");
        assert_eq!(m.get(&b).map(|p| p.z_order), Some(z_b + 1));
    }
}
