//! Fixed visual attributes handed to the rendering widget.
//!
//! Everything here is a pure lookup on shape or edge kind. There is no theme
//! hook; the editor shell restyles on its side if it wants to.

use serde::Serialize;

use crate::display_width::{label_columns, label_line_count};
use crate::flow_ast::{EdgeKind, NodeShape, Size};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub background: &'static str,
    pub border_color: &'static str,
    pub border_width: u32,
    pub border_radius: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: &'static str,
    pub stroke_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<&'static str>,
    pub animated: bool,
    pub arrow_head: bool,
}

pub fn node_style(shape: NodeShape) -> NodeStyle {
    match shape {
        NodeShape::Rectangle => NodeStyle {
            background: "#ffffff",
            border_color: "#1a192b",
            border_width: 2,
            border_radius: "3px",
            clip_path: None,
        },
        NodeShape::Rounded => NodeStyle {
            background: "#e3f2fd",
            border_color: "#1976d2",
            border_width: 2,
            border_radius: "20px",
            clip_path: None,
        },
        NodeShape::Diamond => NodeStyle {
            background: "#fff3e0",
            border_color: "#f57c00",
            border_width: 2,
            border_radius: "0",
            clip_path: Some("polygon(50% 0%, 100% 50%, 50% 100%, 0% 50%)"),
        },
        NodeShape::Circle => NodeStyle {
            background: "#e8f5e9",
            border_color: "#388e3c",
            border_width: 2,
            border_radius: "50%",
            clip_path: None,
        },
    }
}

pub fn edge_style(kind: EdgeKind) -> EdgeStyle {
    match kind {
        EdgeKind::Solid => EdgeStyle {
            stroke: "#555555",
            stroke_width: 2,
            stroke_dasharray: None,
            animated: false,
            arrow_head: true,
        },
        EdgeKind::Dashed => EdgeStyle {
            stroke: "#555555",
            stroke_width: 2,
            stroke_dasharray: Some("5,5"),
            animated: true,
            arrow_head: true,
        },
        EdgeKind::Thick => EdgeStyle {
            stroke: "#333333",
            stroke_width: 4,
            stroke_dasharray: None,
            animated: false,
            arrow_head: true,
        },
        EdgeKind::Line => EdgeStyle {
            stroke: "#555555",
            stroke_width: 2,
            stroke_dasharray: None,
            animated: false,
            arrow_head: false,
        },
    }
}

const COLUMN_WIDTH: f64 = 8.0;
const LINE_HEIGHT: f64 = 20.0;
const PADDING_X: f64 = 32.0;
const PADDING_Y: f64 = 20.0;
const MIN_WIDTH: f64 = 80.0;
const MIN_HEIGHT: f64 = 40.0;
// A diamond's inscribed rectangle is half its area.
const DIAMOND_SCALE: f64 = std::f64::consts::SQRT_2;

/// Estimated box size for a label, in pixels.
pub fn node_size(shape: NodeShape, label: &str) -> Size {
    let width = (label_columns(label) as f64 * COLUMN_WIDTH + PADDING_X).max(MIN_WIDTH);
    let height = (label_line_count(label) as f64 * LINE_HEIGHT + PADDING_Y).max(MIN_HEIGHT);
    match shape {
        NodeShape::Rectangle | NodeShape::Rounded => Size { width, height },
        NodeShape::Diamond => Size {
            width: width * DIAMOND_SCALE,
            height: height * DIAMOND_SCALE,
        },
        NodeShape::Circle => {
            let side = width.max(height);
            Size {
                width: side,
                height: side,
            }
        }
    }
}
