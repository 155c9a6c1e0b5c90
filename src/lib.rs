pub mod display_width;
pub mod flow_ast;
pub mod flow_graph;
pub mod flow_layout;
pub mod flow_parser;
pub mod flow_style;
pub mod trace;

pub use flow_ast::{Direction, Edge, EdgeKind, Node, NodeShape, ParsedFlow, Position, Size};
pub use flow_layout::LayoutOptions;
pub use trace::{LogTrace, NoTrace, ParseObserver, TraceEvent};

/// Parse flowchart text into positioned nodes and edges.
///
/// Never fails: lines that fit no known form are dropped, and text without a
/// `graph`/`flowchart` directive is laid out top to bottom.
pub fn parse_diagram(text: &str) -> ParsedFlow {
    parse_diagram_with(text, &LayoutOptions::default(), &mut NoTrace)
}

/// [`parse_diagram`] with explicit spacing and a trace observer.
pub fn parse_diagram_with(
    text: &str,
    options: &LayoutOptions,
    observer: &mut dyn ParseObserver,
) -> ParsedFlow {
    let source = flow_parser::parse_flow(text, observer);
    let mut flow = flow_graph::build_graph(&source, observer);
    flow_layout::apply_layout(&mut flow, options, observer);
    flow
}
