use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub h_scale: f64, // pixels per second
    pub v_scale: f64,
    pub dot_radius: f64,
    pub top_padding: f64,
    pub bottom_padding: f64,
    pub left_margin: f64,
    pub class_dir: PathBuf,
    pub selected_class: String,
    pub default_skill: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            h_scale: 38.0,
            v_scale: 100.0,
            dot_radius: 19.0,
            top_padding: 80.0,
            bottom_padding: 120.0,
            left_margin: 10.0,
            class_dir: PathBuf::from("data/classes"),
            selected_class: "sch".to_string(),
            default_skill: "whispering_dawn".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Left edge of the time axis; also the lowest position a skill can be
    /// placed at.
    pub fn x_offset(&self) -> f64 {
        self.left_margin + self.dot_radius
    }

    /// Skill catalog used when no class file is given.
    pub fn class_file(&self) -> PathBuf {
        self.class_dir.join(format!("{}.json", self.selected_class))
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "raidplan")?;
    Some(proj.config_dir().join("planner.toml"))
}

/// Config from the user config directory. A missing file means defaults; a
/// broken one is logged and ignored.
pub fn load_or_default() -> PlannerConfig {
    let Some(path) = config_file_path() else {
        return PlannerConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> PlannerConfig {
    if !path.exists() {
        return PlannerConfig::default();
    }
    load_from_path(path).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = ?err, "ignoring unreadable planner config");
        PlannerConfig::default()
    })
}

/// Strict load for an explicitly named file.
pub fn load_from_path(path: &Path) -> anyhow::Result<PlannerConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read planner config {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse planner config {}", path.display()))
}
