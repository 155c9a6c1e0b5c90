use winnow::prelude::*;
use winnow::ascii::{space0, space1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat, separated};
use winnow::token::{take_till, take_until, take_while};

use crate::flow_ast::*;
use crate::trace::{ParseObserver, SkipReason, TraceEvent};

/// Text that marks a line as an edge line.
const CONNECTORS: [&str; 4] = ["-->", "---", "-.->", "==>"];

/// Statements that are valid flowchart syntax but carry no node or edge.
const IGNORED_KEYWORDS: [&str; 8] = [
    "subgraph",
    "end",
    "direction",
    "style",
    "classDef",
    "class",
    "click",
    "linkStyle",
];

#[derive(Debug, Clone, PartialEq)]
pub struct FlowSource {
    pub direction: Direction,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Links(Vec<Link>),
    Node(NodeDecl),
}

/// Recognize the directive and classify every content line. Lines that fit
/// no form are reported to `observer` and dropped.
pub fn parse_flow(text: &str, observer: &mut dyn ParseObserver) -> FlowSource {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with("%%"))
        .collect();

    let found = lines
        .iter()
        .enumerate()
        .find_map(|(idx, &(line, text))| {
            directive_line(text).map(|(direction, rest)| (idx, line, direction, rest))
        });

    let (direction, start, inline) = match found {
        Some((idx, line, direction, rest)) => {
            observer.event(TraceEvent::DirectiveFound { line, direction });
            (direction, idx + 1, rest.map(|rest| (line, rest)))
        }
        None => {
            observer.event(TraceEvent::DirectiveMissing);
            (Direction::default(), 0, None)
        }
    };

    let statements = inline
        .into_iter()
        .chain(lines[start..].iter().copied())
        .filter_map(|(line, text)| statement(line, text, observer))
        .collect();

    FlowSource {
        direction,
        statements,
    }
}

fn statement(line: usize, text: &str, observer: &mut dyn ParseObserver) -> Option<Statement> {
    if CONNECTORS.iter().any(|c| text.contains(c)) {
        return match edge_statement.parse(text) {
            Ok(links) => {
                observer.event(TraceEvent::EdgeLine {
                    line,
                    edges: links.len(),
                });
                Some(Statement::Links(links))
            }
            Err(_) => {
                skip(observer, line, text, SkipReason::MalformedEdge);
                None
            }
        };
    }

    if let Some(keyword) = ignored_keyword(text) {
        observer.event(TraceEvent::Ignored {
            line,
            keyword: keyword.to_string(),
        });
        return None;
    }

    match node_statement.parse(text) {
        Ok(decl) => {
            observer.event(TraceEvent::NodeLine {
                line,
                id: decl.id.clone(),
            });
            Some(Statement::Node(decl))
        }
        Err(_) => {
            skip(observer, line, text, SkipReason::NotANode);
            None
        }
    }
}

fn skip(observer: &mut dyn ParseObserver, line: usize, text: &str, reason: SkipReason) {
    observer.event(TraceEvent::Skipped {
        line,
        text: text.to_string(),
        reason,
    });
}

fn ignored_keyword(text: &str) -> Option<&str> {
    if directive.parse(text).is_ok() {
        // A second directive after the first one.
        return text.split_whitespace().next();
    }
    let first = text.split_whitespace().next()?;
    IGNORED_KEYWORDS.iter().copied().find(|k| *k == first)
}

/// A directive line, plus the statement that follows it after `;` on the same
/// line (`graph TD; A --> B`).
fn directive_line(text: &str) -> Option<(Direction, Option<&str>)> {
    if let Ok(direction) = directive.parse(text) {
        return Some((direction, None));
    }
    let (head, rest) = text.split_once(';')?;
    let direction = directive.parse(head).ok()?;
    let rest = rest.trim();
    Some((direction, (!rest.is_empty()).then_some(rest)))
}

fn directive(input: &mut &str) -> winnow::Result<Direction> {
    alt(("flowchart", "graph")).parse_next(input)?;
    let word = opt(preceded(
        space1,
        take_till(1.., |c: char| c.is_whitespace() || c == ';'),
    ))
    .parse_next(input)?;
    statement_end.parse_next(input)?;
    Ok(word
        .and_then(|w| direction.parse(w).ok())
        .unwrap_or_default())
}

fn direction(input: &mut &str) -> winnow::Result<Direction> {
    alt((
        "TD".value(Direction::TopToBottom),
        "TB".value(Direction::TopToBottom),
        "LR".value(Direction::LeftToRight),
        "BT".value(Direction::BottomToTop),
        "RL".value(Direction::RightToLeft),
    ))
    .parse_next(input)
}

fn statement_end(input: &mut &str) -> winnow::Result<()> {
    (space0, opt(";"), space0).void().parse_next(input)
}

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || is_cjk_ideograph(c)
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., is_ident_char).parse_next(input)
}

fn node_ref(input: &mut &str) -> winnow::Result<NodeDecl> {
    let id = identifier.parse_next(input)?;
    match opt(shape_label).parse_next(input)? {
        Some((shape, label)) => Ok(NodeDecl {
            id: id.to_string(),
            label,
            shape,
        }),
        None => Ok(NodeDecl::bare(id)),
    }
}

fn shape_label(input: &mut &str) -> winnow::Result<(NodeShape, String)> {
    alt((
        delimited("((", label_text(')'), "))").map(|l| (NodeShape::Circle, l)),
        delimited("(", label_text(')'), ")").map(|l| (NodeShape::Rounded, l)),
        delimited("{", label_text('}'), "}").map(|l| (NodeShape::Diamond, l)),
        delimited("[", label_text(']'), "]").map(|l| (NodeShape::Rectangle, l)),
    ))
    .parse_next(input)
}

/// Label text up to `closer`, or a double-quoted string that may contain it.
fn label_text(closer: char) -> impl FnMut(&mut &str) -> winnow::Result<String> {
    move |input: &mut &str| {
        let text = alt((
            delimited("\"", take_till(1.., '"'), "\""),
            take_till(1.., closer),
        ))
        .parse_next(input)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(winnow::error::ParserError::from_input(input));
        }
        Ok(text.to_string())
    }
}

fn connector(input: &mut &str) -> winnow::Result<EdgeKind> {
    alt((
        "-.->".value(EdgeKind::Dashed),
        "==>".value(EdgeKind::Thick),
        "-->".value(EdgeKind::Solid),
        "---".value(EdgeKind::Line),
    ))
    .parse_next(input)
}

fn pipe_label(input: &mut &str) -> winnow::Result<Option<String>> {
    let text = delimited("|", take_till(0.., '|'), "|").parse_next(input)?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// `-->`, `-->|text|`, and the other connector kinds.
fn arrow_link(input: &mut &str) -> winnow::Result<(EdgeKind, Option<String>)> {
    let kind = connector.parse_next(input)?;
    let label = opt(preceded(space0, pipe_label)).parse_next(input)?;
    Ok((kind, label.flatten()))
}

/// `-- text -->` and `-- text ---`.
fn text_link(input: &mut &str) -> winnow::Result<(EdgeKind, Option<String>)> {
    "--".parse_next(input)?;
    space1.parse_next(input)?;
    let (text, kind) = alt((
        (take_until(1.., " -->"), " -->".value(EdgeKind::Solid)),
        (take_until(1.., " ---"), " ---".value(EdgeKind::Line)),
    ))
    .parse_next(input)?;
    let text = text.trim();
    Ok((kind, (!text.is_empty()).then(|| text.to_string())))
}

fn link(input: &mut &str) -> winnow::Result<(EdgeKind, Option<String>)> {
    delimited(space0, alt((arrow_link, text_link)), space0).parse_next(input)
}

fn node_group(input: &mut &str) -> winnow::Result<Vec<NodeDecl>> {
    separated(1.., node_ref, (space0, "&", space0)).parse_next(input)
}

/// `A --> B`, `A[x] -->|y| B{z}`, `A --> B & C`, `A --> B --> C`.
fn edge_statement(input: &mut &str) -> winnow::Result<Vec<Link>> {
    let mut sources = node_group.parse_next(input)?;
    let hops: Vec<((EdgeKind, Option<String>), Vec<NodeDecl>)> =
        repeat(1.., (link, node_group)).parse_next(input)?;
    statement_end.parse_next(input)?;

    let mut links = Vec::new();
    for ((kind, label), targets) in hops {
        for from in &sources {
            for to in &targets {
                links.push(Link {
                    from: from.clone(),
                    to: to.clone(),
                    kind,
                    label: label.clone(),
                });
            }
        }
        sources = targets;
    }
    Ok(links)
}

fn node_statement(input: &mut &str) -> winnow::Result<NodeDecl> {
    let decl = node_ref.parse_next(input)?;
    statement_end.parse_next(input)?;
    Ok(decl)
}
