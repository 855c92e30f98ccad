//! Node tree parser.
//!
//! Scans the raw stream for structural markers and records, for every node,
//! its type byte, the range of its (still escaped) properties and its
//! children. Property content is not interpreted here.

use memchr::memchr3;
use otb_common::marker::{END, ESCAPE, START};

use crate::node::{NodeEntry, NodeTree};
use crate::{Error, Result};

/// A node whose property range may still be open.
struct Pending {
    kind: u8,
    props_start: usize,
    props_end: Option<usize>,
    children: Vec<usize>,
}

impl Pending {
    fn new(kind: u8, props_start: usize) -> Self {
        Self {
            kind,
            props_start,
            props_end: None,
            children: Vec::new(),
        }
    }

    /// Properties end at the first child or at the node's own end.
    fn close_props(&mut self, at: usize) {
        if self.children.is_empty() {
            self.props_end = Some(at);
        }
    }
}

/// Parse the node tree starting at `start` within `data`.
///
/// Property ranges in the result index into `data`.
pub fn parse_tree(data: &[u8], start: usize) -> Result<NodeTree> {
    match data.get(start) {
        Some(&START) => {}
        found => return Err(Error::MissingRoot { found: found.copied() }),
    }

    let root_kind = *data
        .get(start + 1)
        .ok_or(Error::TruncatedStart { offset: start })?;

    let mut nodes = vec![Pending::new(root_kind, start + 2)];
    let mut stack: Vec<usize> = vec![0];
    let mut depth = 1;
    let mut pos = start + 2;

    while let Some(found) = memchr3(START, END, ESCAPE, &data[pos..]) {
        let at = pos + found;

        match data[at] {
            START => {
                let &parent = stack.last().ok_or(Error::UnexpectedStart { offset: at })?;
                let kind = *data.get(at + 1).ok_or(Error::TruncatedStart { offset: at })?;

                nodes[parent].close_props(at);

                let index = nodes.len();
                nodes.push(Pending::new(kind, at + 2));
                nodes[parent].children.push(index);
                stack.push(index);
                depth = depth.max(stack.len());

                pos = at + 2;
            }
            END => {
                let index = stack.pop().ok_or(Error::UnexpectedEnd { offset: at })?;
                nodes[index].close_props(at);

                pos = at + 1;
            }
            _ => {
                // Escape: the next byte is data, whatever its value.
                if at + 1 >= data.len() {
                    return Err(Error::TruncatedEscape { offset: at });
                }

                pos = at + 2;
            }
        }
    }

    if !stack.is_empty() {
        return Err(Error::UnterminatedNodes { open: stack.len() });
    }

    let nodes = nodes
        .into_iter()
        .map(|node| NodeEntry {
            kind: node.kind,
            // Every closed node has its end set; fall back to an empty range.
            props: node.props_start..node.props_end.unwrap_or(node.props_start),
            children: node.children,
        })
        .collect();

    Ok(NodeTree { nodes, depth })
}
