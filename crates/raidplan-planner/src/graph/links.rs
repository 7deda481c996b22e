use raidplan_core::{Link, Point};

use crate::graph::model::{Node, TimelineGraph, ROOT};

/// One S-curve per parent/child edge, in node order.
///
/// Edges out of the synthetic root are the placeholder entries of the
/// accumulation (the root has no position) and are dropped.
pub fn links(graph: &TimelineGraph, h_scale: f64) -> Vec<Link> {
    let mut out = Vec::with_capacity(graph.len());
    for (_, node) in graph.events() {
        for parent in node.previous.iter().filter(|p| **p != ROOT) {
            out.push(curve(&graph[*parent], node, h_scale));
        }
    }
    out
}

fn curve(parent: &Node, child: &Node, h_scale: f64) -> Link {
    let (first, second) = if parent.left < child.left {
        (parent, child)
    } else {
        (child, parent)
    };
    let (x1, y1) = (first.left + h_scale, first.top);
    let (x2, y2) = (second.left + h_scale, second.top);
    let mid = (x1 + x2) / 2.0;
    let quarter = (x2 - x1) / 4.0;

    Link {
        points: [
            Point::new(x1, y1),
            Point::new(mid - quarter, y1),
            Point::new(mid + quarter, y2),
            Point::new(x2, y2),
        ],
    }
}
