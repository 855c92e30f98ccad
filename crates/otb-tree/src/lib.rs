//! Escaped binary node tree container parser.
//!
//! Both the item catalog (`items.otb`) and maps (`.otbm`) share one container
//! format: a 4-byte identifier followed by a tree of nodes delimited with
//! marker bytes.
//!
//! # Format
//!
//! - `0xFE` (START) opens a node; the next byte is the node's type
//! - `0xFF` (END) closes the innermost node
//! - `0xFD` (ESCAPE) marks the next byte as literal data
//!
//! A node's properties are the bytes between its type byte and its first
//! child (or its END). They stay escaped in the tree and are decoded on
//! demand with [`otb_common::NodeReader`].
//!
//! # Example
//!
//! ```no_run
//! use otb_tree::{Container, Identifier};
//!
//! let container = Container::open("items.otb", Identifier::OTBI)?;
//! let root = container.root();
//!
//! for node in root.children() {
//!     println!("node type {} with {} property bytes", node.kind(), node.props().len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod container;
mod error;
mod identifier;
mod node;
mod parser;

pub use container::Container;
pub use error::{Error, Result};
pub use identifier::Identifier;
pub use node::{Node, NodeTree};
pub use parser::parse_tree;
