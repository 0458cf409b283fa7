//! Plain-text topology snapshots.
//!
//! A snapshot lists node records first, then link records, one per line:
//!
//! ```text
//! a [0, 0]
//! b [3, 4]
//! a <--> b
//! b --> c
//! ```
//!
//! `-->` is a directed arc, `<-->` an undirected edge. Only wired links are
//! written; wireless links come back from node positions and ranges when the
//! nodes are re-added.

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};

use crate::topology::{Link, LinkMode, LinkType, Node, NodeId, Topology, TopologyError};

/// Errors that abort a snapshot import
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SnapshotError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unknown node '{id}'")]
    UnknownNode { line: usize, id: String },

    #[error("line {line}: duplicate node '{id}'")]
    DuplicateNode { line: usize, id: String },

    #[error("line {line}: node record after link records")]
    OutOfOrder { line: usize },

    #[error("line {line}: {source}")]
    Topology { line: usize, source: TopologyError },
}

/// Token types for snapshot lines
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    LeftBracket,
    RightBracket,
    Comma,
    Arrow,
    BiArrow,
}

/// Single-line lexer
struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();
        Self {
            input: chars,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn at_arrow(&self) -> bool {
        self.current_char == Some('<') || (self.current_char == Some('-') && self.peek() == Some('-'))
    }

    fn expect_literal(&mut self, literal: &str) -> Result<(), String> {
        for expected in literal.chars() {
            match self.current_char {
                Some(ch) if ch == expected => self.advance(),
                Some(ch) => return Err(format!("Expected '{}', found '{}'", literal, ch)),
                None => return Err(format!("Expected '{}', found end of line", literal)),
            }
        }
        Ok(())
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() || matches!(ch, '[' | ']' | ',') || self.at_arrow() {
                break;
            }
            result.push(ch);
            self.advance();
        }
        result
    }

    fn next_token(&mut self) -> Result<Option<Token>, String> {
        self.skip_whitespace();

        match self.current_char {
            None => Ok(None),
            Some('[') => {
                self.advance();
                Ok(Some(Token::LeftBracket))
            }
            Some(']') => {
                self.advance();
                Ok(Some(Token::RightBracket))
            }
            Some(',') => {
                self.advance();
                Ok(Some(Token::Comma))
            }
            Some('<') => {
                self.expect_literal("<-->")?;
                Ok(Some(Token::BiArrow))
            }
            Some('-') if self.peek() == Some('-') => {
                self.expect_literal("-->")?;
                Ok(Some(Token::Arrow))
            }
            Some(_) => Ok(Some(Token::Word(self.read_word()))),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// One parsed snapshot line
#[derive(Debug, Clone, PartialEq)]
enum Record {
    Node { id: String, x: f64, y: f64 },
    Link { from: String, to: String, link_type: LinkType },
}

fn parse_coordinate(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| format!("Invalid coordinate: {}", value))?;
    if !parsed.is_finite() {
        return Err(format!("Coordinate must be finite: {}", value));
    }
    Ok(parsed)
}

fn parse_record(tokens: &[Token]) -> Result<Record, String> {
    match tokens {
        [Token::Word(id), Token::LeftBracket, Token::Word(x), Token::Comma, Token::Word(y), Token::RightBracket] => {
            Ok(Record::Node {
                id: id.clone(),
                x: parse_coordinate(x)?,
                y: parse_coordinate(y)?,
            })
        }
        [Token::Word(from), Token::Arrow, Token::Word(to)] => Ok(Record::Link {
            from: from.clone(),
            to: to.clone(),
            link_type: LinkType::Directed,
        }),
        [Token::Word(from), Token::BiArrow, Token::Word(to)] => Ok(Record::Link {
            from: from.clone(),
            to: to.clone(),
            link_type: LinkType::Undirected,
        }),
        _ => Err(format!(
            "Expected '<id> [<x>, <y>]' or '<id> --> <id>' or '<id> <--> <id>', found {:?}",
            tokens
        )),
    }
}

/// Render the nodes and wired links of `topology` as snapshot text.
///
/// Nodes come in insertion order, followed by wired undirected edges, then
/// wired arcs not already covered by a written edge. Node names are unique
/// snapshot identifiers because `Topology` only admits valid, unclaimed
/// labels and finite positions.
pub fn export(topology: &Topology) -> String {
    let name = |id: NodeId| {
        topology
            .node(id)
            .map(Node::name)
            .unwrap_or_else(|| id.to_string())
    };

    let mut res = String::new();
    for node in topology.nodes() {
        res.push_str(&format!("{} {}\n", node.name(), node.location()));
    }

    for edge in topology.links(false).iter().filter(|l| !l.is_wireless()) {
        res.push_str(&format!("{} <--> {}\n", name(edge.source()), name(edge.destination())));
    }

    for arc in topology.links(true).iter().filter(|l| !l.is_wireless()) {
        let covered = topology
            .undirected_link(arc.source(), arc.destination())
            .is_some_and(|edge| !edge.is_wireless());
        if !covered {
            res.push_str(&format!("{} --> {}\n", name(arc.source()), name(arc.destination())));
        }
    }

    res
}

/// Add the nodes and wired links described by `text` to `topology`.
///
/// Nodes are labelled with their snapshot identifiers and given the
/// topology's default communication range. Returns the identifier table.
/// On error, whatever was added before the offending line stays in place.
pub fn import(topology: &mut Topology, text: &str) -> Result<HashMap<String, NodeId>, SnapshotError> {
    let mut table: HashMap<String, NodeId> = HashMap::new();
    let mut seen_links = false;
    let mut link_count = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let record = Lexer::new(raw)
            .tokenize()
            .and_then(|tokens| parse_record(&tokens))
            .map_err(|message| SnapshotError::Syntax { line, message })?;

        match record {
            Record::Node { id, x, y } => {
                if seen_links {
                    return Err(SnapshotError::OutOfOrder { line });
                }
                if table.contains_key(&id) {
                    return Err(SnapshotError::DuplicateNode { line, id });
                }
                let node = Node::new()
                    .with_label(id.clone())
                    .with_range(topology.config().default_communication_range);
                let node_id = topology
                    .add_node_at(Some(x), Some(y), node)
                    .map_err(|source| SnapshotError::Topology { line, source })?;
                debug!("Imported node {} at [{}, {}]", id, x, y);
                table.insert(id, node_id);
            }
            Record::Link { from, to, link_type } => {
                seen_links = true;
                let resolve = |id: String| match table.get(&id) {
                    Some(node_id) => Ok(*node_id),
                    None => Err(SnapshotError::UnknownNode { line, id }),
                };
                let from_id = resolve(from)?;
                let to_id = resolve(to)?;
                topology
                    .add_link(Link::new(from_id, to_id, link_type, LinkMode::Wired))
                    .map_err(|source| SnapshotError::Topology { line, source })?;
                link_count += 1;
            }
        }
    }

    info!("Imported {} nodes and {} wired links", table.len(), link_count);
    Ok(table)
}

impl Topology {
    /// Fresh default-configured topology populated from snapshot text
    pub fn from_snapshot(text: &str) -> Result<Self, SnapshotError> {
        let mut topology = Topology::new();
        import(&mut topology, text)?;
        Ok(topology)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&export(self))
    }
}
