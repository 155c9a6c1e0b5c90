use std::fmt;

use serde::Serialize;

use crate::flow_style::{EdgeStyle, NodeStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "BT")]
    BottomToTop,
    #[serde(rename = "RL")]
    RightToLeft,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopToBottom => "TB",
            Direction::LeftToRight => "LR",
            Direction::BottomToTop => "BT",
            Direction::RightToLeft => "RL",
        }
    }

    /// Levels stack along y for vertical diagrams and along x otherwise.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::TopToBottom | Direction::BottomToTop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rectangle,
    Rounded,
    Diamond,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `-->`
    Solid,
    /// `-.->`
    Dashed,
    /// `==>`
    Thick,
    /// `---`, undirected
    Line,
}

impl EdgeKind {
    pub fn is_directed(self) -> bool {
        !matches!(self, EdgeKind::Line)
    }

    /// The connector as written in source.
    pub fn token(self) -> &'static str {
        match self {
            EdgeKind::Solid => "-->",
            EdgeKind::Dashed => "-.->",
            EdgeKind::Thick => "==>",
            EdgeKind::Line => "---",
        }
    }
}

/// One appearance of a node id in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

impl NodeDecl {
    /// A reference with no bracketed label.
    pub fn bare(id: &str) -> Self {
        NodeDecl {
            id: id.to_string(),
            label: id.to_string(),
            shape: NodeShape::Rectangle,
        }
    }
}

/// A connection as written on one edge line, before ids are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub from: NodeDecl,
    pub to: NodeDecl,
    pub kind: EdgeKind,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    pub position: Position,
    pub size: Size,
    pub style: NodeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: EdgeKind,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedFlow {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub direction: Direction,
}

impl ParsedFlow {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }
}

/// One line per node and edge, for terminals and debugging.
impl fmt::Display for ParsedFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "empty diagram ({})", self.direction.as_str());
        }
        writeln!(f, "direction {}", self.direction.as_str())?;
        for node in &self.nodes {
            writeln!(
                f,
                "node {} {:?} \"{}\" at ({}, {})",
                node.id, node.shape, node.label, node.position.x, node.position.y
            )?;
        }
        for edge in &self.edges {
            write!(
                f,
                "edge {}: {} {} {}",
                edge.id,
                edge.source,
                edge.kind.token(),
                edge.target
            )?;
            if let Some(label) = &edge.label {
                write!(f, " |{label}|")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_flow_serializes_with_direction_code() {
        let json = serde_json::to_string(&ParsedFlow::default()).unwrap();
        assert_eq!(json, r#"{"nodes":[],"edges":[],"direction":"TB"}"#);
    }

    #[test]
    fn direction_axis() {
        assert!(Direction::TopToBottom.is_vertical());
        assert!(Direction::BottomToTop.is_vertical());
        assert!(!Direction::LeftToRight.is_vertical());
        assert!(!Direction::RightToLeft.is_vertical());
    }

    #[test]
    fn direction_codes_match_serde_names() {
        for dir in [
            Direction::TopToBottom,
            Direction::LeftToRight,
            Direction::BottomToTop,
            Direction::RightToLeft,
        ] {
            let json = serde_json::to_string(&dir).unwrap();
            assert_eq!(json, format!("\"{}\"", dir.as_str()));
        }
    }

    #[test]
    fn only_line_kind_is_undirected() {
        assert!(EdgeKind::Solid.is_directed());
        assert!(EdgeKind::Dashed.is_directed());
        assert!(EdgeKind::Thick.is_directed());
        assert!(!EdgeKind::Line.is_directed());
    }

    #[test]
    fn display_empty_flow() {
        assert_eq!(ParsedFlow::default().to_string(), "empty diagram (TB)\n");
    }

    #[test]
    fn display_lists_nodes_then_edges() {
        let flow = ParsedFlow {
            nodes: vec![Node {
                id: "A".to_string(),
                label: "开始".to_string(),
                shape: NodeShape::Rounded,
                position: Position { x: -100.0, y: 150.0 },
                size: Size::default(),
                style: crate::flow_style::node_style(NodeShape::Rounded),
            }],
            edges: vec![Edge {
                id: "A-A".to_string(),
                source: "A".to_string(),
                target: "A".to_string(),
                label: Some("again".to_string()),
                kind: EdgeKind::Dashed,
                style: crate::flow_style::edge_style(EdgeKind::Dashed),
            }],
            direction: Direction::LeftToRight,
        };
        let expected = "\
direction LR
node A Rounded \"开始\" at (-100, 150)
edge A-A: A -.-> A |again|
";
        assert_eq!(flow.to_string(), expected);
    }

    #[test]
    fn bare_decl_uses_id_as_label() {
        let decl = NodeDecl::bare("开始");
        assert_eq!(decl.label, "开始");
        assert_eq!(decl.shape, NodeShape::Rectangle);
    }
}
