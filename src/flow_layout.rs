use std::collections::HashMap;

use crate::flow_ast::*;
use crate::trace::{ParseObserver, TraceEvent};

const LEVEL_SPACING: f64 = 150.0;
const NODE_SPACING: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Distance between consecutive levels along the diagram's main axis.
    pub level_spacing: f64,
    /// Distance between neighbouring nodes within one level.
    pub node_spacing: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            level_spacing: LEVEL_SPACING,
            node_spacing: NODE_SPACING,
        }
    }
}

/// Assign a position to every node of `flow`.
pub fn apply_layout(
    flow: &mut ParsedFlow,
    options: &LayoutOptions,
    observer: &mut dyn ParseObserver,
) {
    let levels = assign_levels(flow);
    let vertical = flow.direction.is_vertical();

    for (level, members) in levels.iter().enumerate() {
        observer.event(TraceEvent::Level {
            level,
            ids: members.iter().map(|&i| flow.nodes[i].id.clone()).collect(),
        });

        let main = level as f64 * options.level_spacing;
        let center = (members.len() as f64 - 1.0) / 2.0;
        for (slot, &i) in members.iter().enumerate() {
            let cross = (slot as f64 - center) * options.node_spacing;
            flow.nodes[i].position = if vertical {
                Position { x: cross, y: main }
            } else {
                Position { x: main, y: cross }
            };
        }
    }
}

/// Indices of nodes that are never an edge target. Once the diagram has
/// edges, only nodes that start one qualify, so standalone nodes end up in the
/// trailing level; without edges every node is a root. Falls back to the first
/// node when no node qualifies, which happens when every edge lies on a cycle.
pub fn find_roots(flow: &ParsedFlow) -> Vec<usize> {
    let index = node_index(flow);
    let mut starts_edge = vec![false; flow.nodes.len()];
    let mut is_target = vec![false; flow.nodes.len()];
    for edge in &flow.edges {
        if let Some(&i) = index.get(edge.source.as_str()) {
            starts_edge[i] = true;
        }
        if let Some(&i) = index.get(edge.target.as_str()) {
            is_target[i] = true;
        }
    }

    let edgeless = flow.edges.is_empty();
    let roots: Vec<usize> = (0..flow.nodes.len())
        .filter(|&i| !is_target[i] && (edgeless || starts_edge[i]))
        .collect();

    if roots.is_empty() && !flow.nodes.is_empty() {
        vec![0]
    } else {
        roots
    }
}

fn node_index(flow: &ParsedFlow) -> HashMap<&str, usize> {
    flow.nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect()
}

/// Breadth-first levels of node indices. A node stays at the level where it
/// is first reached; unreached nodes share one trailing level.
pub fn assign_levels(flow: &ParsedFlow) -> Vec<Vec<usize>> {
    let index = node_index(flow);

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); flow.nodes.len()];
    for edge in &flow.edges {
        let from = index.get(edge.source.as_str());
        let to = index.get(edge.target.as_str());
        if let (Some(&from), Some(&to)) = (from, to) {
            outgoing[from].push(to);
        }
    }

    let mut visited = vec![false; flow.nodes.len()];
    let mut levels: Vec<Vec<usize>> = Vec::new();

    let mut frontier = find_roots(flow);
    for &i in &frontier {
        visited[i] = true;
    }

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &from in &frontier {
            for &to in &outgoing[from] {
                if !visited[to] {
                    visited[to] = true;
                    next.push(to);
                }
            }
        }
        levels.push(frontier);
        frontier = next;
    }

    let unreached: Vec<usize> = (0..flow.nodes.len()).filter(|&i| !visited[i]).collect();
    if !unreached.is_empty() {
        levels.push(unreached);
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow_graph::build_graph;
    use crate::flow_parser::parse_flow;
    use crate::trace::NoTrace;
    use pretty_assertions::assert_eq;

    fn graph(text: &str) -> ParsedFlow {
        build_graph(&parse_flow(text, &mut NoTrace), &mut NoTrace)
    }

    fn laid_out(text: &str) -> ParsedFlow {
        let mut flow = graph(text);
        apply_layout(&mut flow, &LayoutOptions::default(), &mut NoTrace);
        flow
    }

    fn level_ids(text: &str) -> Vec<Vec<String>> {
        let flow = graph(text);
        assign_levels(&flow)
            .into_iter()
            .map(|level| level.into_iter().map(|i| flow.nodes[i].id.clone()).collect())
            .collect()
    }

    fn pos(flow: &ParsedFlow, id: &str) -> (f64, f64) {
        let p = flow.node(id).unwrap().position;
        (p.x, p.y)
    }

    #[test]
    fn roots_have_no_incoming_edges() {
        let flow = graph("graph TD\nA --> C\nB --> C\n");
        assert_eq!(find_roots(&flow), vec![0, 2]);
    }

    #[test]
    fn cycle_falls_back_to_first_node() {
        let flow = graph("graph TD\nB --> A\nA --> B\n");
        assert_eq!(find_roots(&flow), vec![0]);
        assert_eq!(level_ids("graph TD\nB --> A\nA --> B\n"), vec![vec!["B"], vec!["A"]]);
    }

    #[test]
    fn standalone_node_is_not_a_root() {
        let flow = graph("graph TD\nS\nA --> B\n");
        assert_eq!(find_roots(&flow), vec![1]);
        assert_eq!(
            level_ids("graph TD\nS\nA --> B\n"),
            vec![vec!["A"], vec!["B"], vec!["S"]]
        );
    }

    #[test]
    fn edgeless_graph_puts_every_node_on_first_level() {
        let flow = graph("graph TD\nA\nB\nC\n");
        assert_eq!(find_roots(&flow), vec![0, 1, 2]);
        assert_eq!(level_ids("graph TD\nA\nB\nC\n"), vec![vec!["A", "B", "C"]]);

        let flow = laid_out("graph TD\nA\nB\nC\n");
        assert_eq!(pos(&flow, "A"), (-200.0, 0.0));
        assert_eq!(pos(&flow, "B"), (0.0, 0.0));
        assert_eq!(pos(&flow, "C"), (200.0, 0.0));
    }

    #[test]
    fn long_chain_is_leveled_in_one_pass() {
        let n = 20_000;
        let text: String = (0..n).map(|i| format!("N{i} --> N{}\n", i + 1)).collect();
        let flow = graph(&text);
        assert_eq!(find_roots(&flow), vec![0]);
        let levels = assign_levels(&flow);
        assert_eq!(levels.len(), n + 1);
        assert_eq!(levels[n], vec![n]);
    }

    #[test]
    fn empty_graph_has_no_levels() {
        assert!(assign_levels(&ParsedFlow::default()).is_empty());
    }

    #[test]
    fn level_linear_chain() {
        assert_eq!(
            level_ids("graph TD\nA --> B\nB --> C\n"),
            vec![vec!["A"], vec!["B"], vec!["C"]]
        );
    }

    #[test]
    fn level_fan_out() {
        assert_eq!(
            level_ids("graph TD\nA --> B\nA --> C\n"),
            vec![vec!["A"], vec!["B", "C"]]
        );
    }

    #[test]
    fn first_reached_level_is_kept() {
        // C is reachable from A directly and through B.
        assert_eq!(
            level_ids("graph TD\nA --> B\nB --> C\nA --> C\n"),
            vec![vec!["A"], vec!["B", "C"]]
        );
    }

    #[test]
    fn cycle_behind_root_terminates() {
        assert_eq!(
            level_ids("graph TD\nS --> A\nA --> B\nB --> A\n"),
            vec![vec!["S"], vec!["A"], vec!["B"]]
        );
    }

    #[test]
    fn unreachable_cycle_goes_to_trailing_level() {
        assert_eq!(
            level_ids("graph TD\nA --> B\nX --> Y\nY --> X\nZ\n"),
            vec![vec!["A"], vec!["B"], vec!["X", "Y", "Z"]]
        );
        assert_eq!(
            level_ids("graph TD\nA --> B\nX --> Y\nY --> X\n"),
            vec![vec!["A"], vec!["B"], vec!["X", "Y"]]
        );
    }

    #[test]
    fn td_levels_become_rows() {
        let flow = laid_out("graph TD\nA --> B\nA --> C\n");
        assert_eq!(pos(&flow, "A"), (0.0, 0.0));
        assert_eq!(pos(&flow, "B"), (-100.0, 150.0));
        assert_eq!(pos(&flow, "C"), (100.0, 150.0));
    }

    #[test]
    fn odd_level_centres_middle_node() {
        let flow = laid_out("graph TD\nA --> B & C & D\n");
        assert_eq!(pos(&flow, "B"), (-200.0, 150.0));
        assert_eq!(pos(&flow, "C"), (0.0, 150.0));
        assert_eq!(pos(&flow, "D"), (200.0, 150.0));
    }

    #[test]
    fn lr_levels_become_columns() {
        let flow = laid_out("graph LR\nA --> B\nA --> C\n");
        assert_eq!(pos(&flow, "A"), (0.0, 0.0));
        assert_eq!(pos(&flow, "B"), (150.0, -100.0));
        assert_eq!(pos(&flow, "C"), (150.0, 100.0));
    }

    #[test]
    fn reversed_directions_keep_level_order() {
        let bt = laid_out("graph BT\nA --> B\n");
        assert_eq!(pos(&bt, "B"), (0.0, 150.0));
        let rl = laid_out("graph RL\nA --> B\n");
        assert_eq!(pos(&rl, "B"), (150.0, 0.0));
    }

    #[test]
    fn custom_spacing() {
        let mut flow = graph("graph TD\nA --> B & C\n");
        let options = LayoutOptions {
            level_spacing: 10.0,
            node_spacing: 4.0,
        };
        apply_layout(&mut flow, &options, &mut NoTrace);
        assert_eq!(pos(&flow, "B"), (-2.0, 10.0));
        assert_eq!(pos(&flow, "C"), (2.0, 10.0));
    }

    #[test]
    fn levels_are_traced() {
        let mut flow = graph("graph TD\nA --> B\n");
        let mut events = Vec::new();
        apply_layout(&mut flow, &LayoutOptions::default(), &mut events);
        assert_eq!(
            events,
            vec![
                TraceEvent::Level {
                    level: 0,
                    ids: vec!["A".to_string()],
                },
                TraceEvent::Level {
                    level: 1,
                    ids: vec!["B".to_string()],
                },
            ]
        );
    }
}
