use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkillId(pub String);

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A scripted encounter as shipped in the data directory.
///
/// `timeline` stays raw JSON: its nested-array shape is only validated when
/// the planner turns it into a graph, so errors can name the exact path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    #[serde(default)]
    pub events: BTreeMap<String, EventInfo>,
    #[serde(default)]
    pub resources: Resources,
    pub timeline: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventInfo {
    pub name: String,
    pub icon: String,
    pub description: String,
    pub info: String,
}

// presentation only; passed through untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Resources {
    pub icons: String,
    pub screenshots: String,
}

/// Per-class skill data, keyed by skill id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillCatalog {
    #[serde(default)]
    pub skills: BTreeMap<String, SkillDef>,
}

impl SkillCatalog {
    pub fn get(&self, id: &SkillId) -> Option<&SkillDef> {
        self.skills.get(&id.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillDef {
    pub duration: f64, // seconds active
    pub cooldown: f64, // seconds until reusable
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

impl Point {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Cubic control sequence `(p0, c1, c2, p3)` for one parent/child edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub points: [Point; 4],
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub max_time: f64,
    pub max_width: f64,
    pub max_height: f64,
    pub min_height: f64,
    pub total_height: f64,
}

/// Half-open pixel interval along the timeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encounter_parses_with_optional_sections_missing() {
        let raw = r#"{ "timeline": [ { "name": "cast", "time": 3 } ] }"#;
        let enc: Encounter = serde_json::from_str(raw).expect("encounter");
        assert!(enc.events.is_empty());
        assert_eq!(enc.resources, Resources::default());
        assert!(enc.timeline.is_array());
    }

    #[test]
    fn catalog_lookup_by_skill_id() {
        let raw = r#"{ "skills": { "whispering_dawn": { "duration": 21, "cooldown": 60, "name": "Whispering Dawn" } } }"#;
        let catalog: SkillCatalog = serde_json::from_str(raw).expect("catalog");
        let def = catalog.get(&SkillId::from("whispering_dawn")).expect("skill");
        assert_eq!(def.duration, 21.0);
        assert_eq!(def.cooldown, 60.0);
        assert!(def.icon.is_empty());
        assert!(catalog.get(&SkillId::from("missing")).is_none());
    }

    #[test]
    fn bounds_serialize_with_contract_field_names() {
        let b = Bounds {
            max_time: 20.0,
            total_height: 38.0,
            ..Bounds::default()
        };
        let v = serde_json::to_value(b).expect("serialize");
        assert_eq!(v["maxTime"], 20.0);
        assert_eq!(v["totalHeight"], 38.0);
    }
}
