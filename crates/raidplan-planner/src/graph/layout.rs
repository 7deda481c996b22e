use raidplan_core::Bounds;
use std::collections::BTreeMap;

use crate::graph::model::{NodeIndex, TimelineGraph, ROOT};
use crate::util::config::PlannerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub h_scale: f64, // pixels per second
    pub v_scale: f64,
    pub node_radius: f64,
}

impl LayoutParams {
    pub fn from_config(cfg: &PlannerConfig) -> Self {
        Self {
            h_scale: cfg.h_scale,
            v_scale: cfg.v_scale,
            node_radius: cfg.dot_radius,
        }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        for (name, value) in [
            ("h_scale", self.h_scale),
            ("v_scale", self.v_scale),
            ("node_radius", self.node_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("{name} must be finite and positive, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("event {index} (`{id}`) has no parent")]
    Orphan { index: usize, id: String },
}

/// Positions every event and returns the chart bounds.
///
/// Horizontal position is time only. Vertically, unbranched runs stay on
/// their parent's lane, branch heads fan out above/below their parent by
/// `v_scale / depth` (sign alternating with sibling order) and joins sit at
/// the mean of their parents. Nodes that still land on the same spot are
/// spread apart in a final pass.
///
/// Every coordinate is recomputed from scratch, so repeated calls on the
/// same graph give identical results. Nothing is mutated if the parameters
/// or the graph are rejected.
pub fn layout(graph: &mut TimelineGraph, params: LayoutParams) -> Result<Bounds, LayoutError> {
    params.validate()?;
    if let Some((idx, node)) = graph.events().find(|(_, n)| n.previous.is_empty()) {
        return Err(LayoutError::Orphan {
            index: idx.0,
            id: node.id.0.clone(),
        });
    }

    assign_levels(graph);

    let mut bounds = Bounds {
        total_height: 2.0 * params.node_radius,
        ..Bounds::default()
    };
    let order: Vec<NodeIndex> = graph.event_indices().collect();
    for idx in order.iter().copied() {
        let top = vertical_position(graph, idx, params.v_scale);
        let node = &mut graph[idx];
        node.left = node.time * params.h_scale;
        node.top = top;

        bounds.max_time = bounds.max_time.max(node.time);
        bounds.max_width = bounds.max_width.max(node.left);
        bounds.max_height = bounds.max_height.max(node.top);
        bounds.min_height = bounds.min_height.min(node.top);
        bounds.total_height =
            bounds.min_height.abs() + bounds.max_height.abs() + 2.0 * params.node_radius;
    }

    spread_collisions(graph, &order, params.node_radius);

    tracing::debug!(
        events = order.len(),
        max_time = bounds.max_time,
        total_height = bounds.total_height,
        "layout pass complete"
    );
    Ok(bounds)
}

// level = sibling ordinal + 1; with several parents the last one wins
fn assign_levels(graph: &mut TimelineGraph) {
    let mut levels: Vec<(NodeIndex, u32)> = Vec::new();
    for idx in std::iter::once(ROOT).chain(graph.event_indices()) {
        for (m, child) in graph[idx].next.iter().enumerate() {
            levels.push((*child, m as u32 + 1));
        }
    }
    for (child, level) in levels {
        graph[child].level = level;
    }
}

fn vertical_position(graph: &TimelineGraph, idx: NodeIndex, v_scale: f64) -> f64 {
    let node = &graph[idx];
    let first = &graph[node.previous[0]];

    if node.previous.len() > 1 {
        let sum: f64 = node.previous.iter().map(|p| graph[*p].top).sum();
        return sum / node.previous.len() as f64;
    }

    if first.next.len() == 1 {
        first.top
    } else if node.depth > 0 {
        let amplitude = v_scale / node.depth as f64;
        let sign = if node.level % 2 == 0 { 1.0 } else { -1.0 };
        first.top + sign * amplitude
    } else {
        0.0
    }
}

fn spread_collisions(graph: &mut TimelineGraph, order: &[NodeIndex], radius: f64) {
    // +0.0 folds -0.0 into the same bucket as 0.0
    let mut groups: BTreeMap<(u64, u32, u64), Vec<NodeIndex>> = BTreeMap::new();
    for idx in order {
        let n = &graph[*idx];
        groups
            .entry((n.time.to_bits(), n.depth, (n.top + 0.0).to_bits()))
            .or_default()
            .push(*idx);
    }

    for members in groups.values().filter(|m| m.len() > 1) {
        let k = members.len() as f64;
        for (i, idx) in members.iter().enumerate() {
            graph[*idx].top += i as f64 * 2.0 * radius - (k - 1.0) * radius;
        }
    }
}
