use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raidplan_core::{Bounds, Encounter, Link, SkillCatalog, SkillId};
use raidplan_planner::graph::ruler::Tick;
use raidplan_planner::graph::traverse::outline;
use raidplan_planner::graph::Node;
use raidplan_planner::skills::{Indicators, PlacedSkill};
use raidplan_planner::util::config::{self, PlannerConfig};
use raidplan_planner::PlannerState;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "raidplan")]
#[command(about = "Lay out an encounter timeline and plan skill usage against it")]
#[command(version)]
struct Cli {
    /// Planner config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print positioned events, bounds, links and ruler ticks as JSON
    Layout {
        /// Encounter file
        encounter: PathBuf,
    },

    /// Print the event graph as an indented depth-first outline
    Outline {
        /// Encounter file
        encounter: PathBuf,
    },

    /// Place skills on the timeline and print their windows as JSON
    Plan {
        /// Encounter file
        encounter: PathBuf,

        /// Class file with the skill catalog (defaults to the configured class)
        #[arg(long)]
        class: Option<PathBuf>,

        /// Placement as `<skill>@<pixel x>`, or a bare `<pixel x>` for the
        /// default skill; repeatable
        #[arg(long = "place", value_name = "[SKILL@]X")]
        placements: Vec<String>,
    },
}

#[derive(Serialize)]
struct IndexedNode<'a> {
    index: usize,
    #[serde(flatten)]
    node: &'a Node,
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    nodes: Vec<IndexedNode<'a>>,
    bounds: Bounds,
    links: &'a [Link],
    ruler: Vec<Tick>,
    canvas: (f64, f64),
}

#[derive(Serialize)]
struct PlanEntry<'a> {
    #[serde(flatten)]
    placed: &'a PlacedSkill,
    windows: Indicators,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_writer(std::io::stderr).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_default(),
    };

    match cli.command {
        Commands::Layout { encounter } => {
            let st = load_state(&encounter, cfg)?;
            let report = LayoutReport {
                nodes: st
                    .graph
                    .events()
                    .map(|(idx, node)| IndexedNode { index: idx.0, node })
                    .collect(),
                bounds: st.bounds,
                links: &st.links,
                ruler: st.ruler(),
                canvas: st.canvas_size(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Outline { encounter } => {
            let st = load_state(&encounter, cfg)?;
            print!("{}", outline(&st.graph));
        }
        Commands::Plan {
            encounter,
            class,
            placements,
        } => {
            let class = class.unwrap_or_else(|| cfg.class_file());
            let default_skill = SkillId(cfg.default_skill.clone());
            let mut st = load_state(&encounter, cfg)?;
            let catalog: SkillCatalog = read_json(&class)?;
            for spec in &placements {
                let (skill, x) = parse_placement(spec, &default_skill)?;
                let key = st
                    .place_skill(&catalog, &skill, x)
                    .with_context(|| format!("cannot place {spec}"))?;
                tracing::info!(skill = %key.skill_id.0, instance = key.instance_id, "placed");
            }
            let h_scale = st.cfg.h_scale;
            let entries: Vec<PlanEntry> = st
                .placement
                .iter()
                .map(|placed| PlanEntry {
                    placed,
                    windows: placed.indicators(h_scale),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

fn load_state(path: &Path, cfg: PlannerConfig) -> Result<PlannerState> {
    let enc: Encounter = read_json(path)?;
    let st = PlannerState::from_encounter(&enc, cfg)
        .with_context(|| format!("failed to build timeline from {}", path.display()))?;
    tracing::info!(
        events = st.graph.len(),
        max_time = st.bounds.max_time,
        "encounter loaded"
    );
    Ok(st)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_placement(spec: &str, default_skill: &SkillId) -> Result<(SkillId, f64)> {
    let (skill, x) = match spec.rsplit_once('@') {
        Some((skill, x)) => (SkillId(skill.trim().to_string()), x),
        None => (default_skill.clone(), spec),
    };
    let x: f64 = x
        .trim()
        .parse()
        .with_context(|| format!("invalid x position in `{spec}`"))?;
    Ok((skill, x))
}
