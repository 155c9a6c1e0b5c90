//! Optional diagnostics for a parse.
//!
//! The engine reports what it decided about each line through a
//! [`ParseObserver`]. Nothing here affects the parse result.

use thiserror::Error;

use crate::flow_ast::Direction;

/// Why a content line produced no node or edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("line has a connector but no edge form matched")]
    MalformedEdge,
    #[error("line is not a node declaration")]
    NotANode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// `line` is 1-based in the input text.
    DirectiveFound { line: usize, direction: Direction },
    DirectiveMissing,
    EdgeLine { line: usize, edges: usize },
    NodeLine { line: usize, id: String },
    Ignored { line: usize, keyword: String },
    Skipped { line: usize, text: String, reason: SkipReason },
    DuplicateNode { id: String, label: String },
    Level { level: usize, ids: Vec<String> },
}

pub trait ParseObserver {
    fn event(&mut self, event: TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl ParseObserver for NoTrace {
    fn event(&mut self, _event: TraceEvent) {}
}

impl ParseObserver for Vec<TraceEvent> {
    fn event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl ParseObserver for LogTrace {
    fn event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::DirectiveFound { line, direction } => {
                tracing::debug!(line, direction = direction.as_str(), "flowchart directive");
            }
            TraceEvent::DirectiveMissing => {
                tracing::debug!("no flowchart directive, defaulting to TB");
            }
            TraceEvent::EdgeLine { line, edges } => {
                tracing::debug!(line, edges, "edge line");
            }
            TraceEvent::NodeLine { line, id } => {
                tracing::debug!(line, %id, "node line");
            }
            TraceEvent::Ignored { line, keyword } => {
                tracing::debug!(line, %keyword, "ignored statement");
            }
            TraceEvent::Skipped { line, text, reason } => {
                tracing::warn!(line, %text, %reason, "skipped line");
            }
            TraceEvent::DuplicateNode { id, label } => {
                tracing::debug!(%id, %label, "later declaration dropped");
            }
            TraceEvent::Level { level, ids } => {
                tracing::debug!(level, ids = ?ids, "layout level");
            }
        }
    }
}
