use std::collections::HashMap;

use crate::flow_ast::*;
use crate::flow_parser::{FlowSource, Statement};
use crate::flow_style::{edge_style, node_size, node_style};
use crate::trace::{ParseObserver, TraceEvent};

/// Turn parsed statements into an unpositioned node/edge set.
pub fn build_graph(source: &FlowSource, observer: &mut dyn ParseObserver) -> ParsedFlow {
    let decls = collect_declarations(&source.statements);
    ParsedFlow {
        nodes: build_nodes(&decls, observer),
        edges: build_edges(&source.statements),
        direction: source.direction,
    }
}

/// Every node declaration in source order. An edge contributes its source
/// then its target.
pub fn collect_declarations(statements: &[Statement]) -> Vec<&NodeDecl> {
    let mut decls = Vec::new();
    for statement in statements {
        match statement {
            Statement::Links(links) => {
                for link in links {
                    decls.push(&link.from);
                    decls.push(&link.to);
                }
            }
            Statement::Node(decl) => decls.push(decl),
        }
    }
    decls
}

/// Insert-once node set: the first declaration of an id fixes its label and
/// shape.
pub fn build_nodes(decls: &[&NodeDecl], observer: &mut dyn ParseObserver) -> Vec<Node> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut nodes: Vec<Node> = Vec::new();

    for decl in decls {
        if let Some(&i) = index.get(decl.id.as_str()) {
            let kept = &nodes[i];
            if kept.label != decl.label || kept.shape != decl.shape {
                observer.event(TraceEvent::DuplicateNode {
                    id: decl.id.clone(),
                    label: decl.label.clone(),
                });
            }
            continue;
        }
        index.insert(decl.id.as_str(), nodes.len());
        nodes.push(Node {
            id: decl.id.clone(),
            label: decl.label.clone(),
            shape: decl.shape,
            position: Position::default(),
            size: node_size(decl.shape, &decl.label),
            style: node_style(decl.shape),
        });
    }

    nodes
}

/// Edges in source order. Ids are `source-target`; a repeated pair gets
/// `-2`, `-3`, ... appended.
pub fn build_edges(statements: &[Statement]) -> Vec<Edge> {
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    let mut edges = Vec::new();

    for statement in statements {
        let Statement::Links(links) = statement else {
            continue;
        };
        for link in links {
            let count = seen
                .entry((link.from.id.as_str(), link.to.id.as_str()))
                .or_insert(0);
            *count += 1;
            let id = if *count == 1 {
                format!("{}-{}", link.from.id, link.to.id)
            } else {
                format!("{}-{}-{}", link.from.id, link.to.id, count)
            };
            edges.push(Edge {
                id,
                source: link.from.id.clone(),
                target: link.to.id.clone(),
                label: link.label.clone(),
                kind: link.kind,
                style: edge_style(link.kind),
            });
        }
    }

    edges
}
