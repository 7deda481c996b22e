use std::collections::HashSet;
use std::fmt::Write;

use crate::graph::model::{NodeIndex, TimelineGraph, ROOT};

/// Pre-order walk from the synthetic root. Each event is reported once, at
/// the depth of the first path that reached it.
pub fn depth_first(graph: &TimelineGraph) -> Vec<(u32, NodeIndex)> {
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut out = Vec::with_capacity(graph.len());
    let mut stack: Vec<(u32, NodeIndex)> = graph.roots().iter().rev().map(|r| (0, *r)).collect();

    while let Some((depth, idx)) = stack.pop() {
        if !visited.insert(idx) {
            continue;
        }
        out.push((depth, idx));
        for child in graph[idx].next.iter().rev() {
            if !visited.contains(child) {
                stack.push((depth + 1, *child));
            }
        }
    }
    out
}

/// Indented dump of [`depth_first`], one event per line.
pub fn outline(graph: &TimelineGraph) -> String {
    let mut s = String::new();
    for (depth, idx) in depth_first(graph) {
        let node = &graph[idx];
        let tabs = "\t".repeat(depth as usize);
        let _ = write!(s, "[{depth}]\t{tabs}{}", node.id.0);
        if let Some(info) = &node.info {
            let _ = write!(s, ":{info}");
        }
        s.push('\n');
    }
    s
}

/// Events with no path from the synthetic root.
pub fn unreachable(graph: &TimelineGraph) -> Vec<NodeIndex> {
    let mut seen: HashSet<NodeIndex> = HashSet::from([ROOT]);
    seen.extend(depth_first(graph).into_iter().map(|(_, idx)| idx));
    graph.event_indices().filter(|idx| !seen.contains(idx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse::parse;
    use raidplan_core::EventId;
    use serde_json::json;

    #[test]
    fn join_is_visited_once() {
        let g = parse(&json!([
            { "name": "s", "time": 0 },
            [ { "name": "a", "time": 1 } ],
            [ { "name": "b", "time": 1 } ],
            { "name": "j", "time": 2 }
        ]))
        .expect("parse");
        let walk = depth_first(&g);
        let names: Vec<(u32, &str)> = walk.iter().map(|(d, i)| (*d, g[*i].id.0.as_str())).collect();
        assert_eq!(names, vec![(0, "s"), (1, "a"), (2, "j"), (1, "b")]);
    }

    #[test]
    fn outline_indents_by_depth() {
        let g = parse(&json!([
            { "name": "s", "time": 0, "info": "pull" },
            { "name": "t", "time": 3 }
        ]))
        .expect("parse");
        assert_eq!(outline(&g), "[0]\ts:pull\n[1]\t\tt\n");
    }

    #[test]
    fn parsed_graphs_have_no_orphans() {
        let g = parse(&json!([
            [ { "name": "a", "time": 1 }, [ { "name": "x", "time": 2 } ] ],
            [ { "name": "b", "time": 1 } ],
            { "name": "j", "time": 4 },
            { "name": "k", "time": 6 }
        ]))
        .expect("parse");
        assert!(unreachable(&g).is_empty());
    }

    #[test]
    fn detached_events_are_reported() {
        let mut g = TimelineGraph::new();
        let a = g.push_event(EventId::from("a"), None, 0.0, 0, &[ROOT]);
        let lost = g.push_event(EventId::from("lost"), None, 1.0, 0, &[]);
        g.push_event(EventId::from("b"), None, 2.0, 0, &[a]);
        assert_eq!(unreachable(&g), vec![lost]);
    }
}
