//! Container loading.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::node::{Node, NodeTree};
use crate::parser::parse_tree;
use crate::{Error, Identifier, Result};

/// Bytes backing a container.
enum Backing {
    /// Memory-mapped file data
    Mapped(Mmap),
    /// Owned buffer
    Owned(Vec<u8>),
}

impl Deref for Backing {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => mmap,
            Self::Owned(data) => data,
        }
    }
}

/// A loaded OTB container: the file bytes and the node tree parsed from them.
///
/// The container exclusively owns its bytes. Every [`Node`] handed out
/// borrows the container, so property data can never outlive the mapping.
pub struct Container {
    backing: Backing,
    identifier: Identifier,
    tree: NodeTree,
}

impl Container {
    /// Open a container file (memory-mapped for zero-copy).
    pub fn open<P: AsRef<Path>>(path: P, expected: Identifier) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and owned by the container; the
        // file is not expected to be modified while it is loaded.
        let mmap = unsafe { Mmap::map(&file)? };

        Self::load(Backing::Mapped(mmap), Some(expected))
    }

    /// Open a container file whatever its identifier.
    pub fn open_any<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: as in `open`.
        let mmap = unsafe { Mmap::map(&file)? };

        Self::load(Backing::Mapped(mmap), None)
    }

    /// Load a container from an owned buffer.
    pub fn from_bytes(data: Vec<u8>, expected: Identifier) -> Result<Self> {
        Self::load(Backing::Owned(data), Some(expected))
    }

    /// Load a container from an owned buffer whatever its identifier.
    pub fn from_bytes_any(data: Vec<u8>) -> Result<Self> {
        Self::load(Backing::Owned(data), None)
    }

    fn load(backing: Backing, expected: Option<Identifier>) -> Result<Self> {
        let identifier = Self::check_identifier(&backing, expected)?;
        let tree = parse_tree(&backing, Identifier::LEN)?;

        Ok(Self {
            backing,
            identifier,
            tree,
        })
    }

    /// Without an expected identifier any 4 bytes are taken as they are.
    fn check_identifier(data: &[u8], expected: Option<Identifier>) -> Result<Identifier> {
        let actual = &data[..Identifier::LEN.min(data.len())];

        match (<[u8; 4]>::try_from(actual), expected) {
            (Ok(bytes), None) => Ok(Identifier::new(bytes)),
            (Ok(bytes), Some(expected)) if expected.accepts(&bytes) => Ok(Identifier::new(bytes)),
            (_, expected) => Err(Error::InvalidIdentifier {
                expected: expected.unwrap_or(Identifier::WILDCARD),
                actual: actual.to_vec(),
            }),
        }
    }

    /// The identifier found in the file.
    #[inline]
    pub fn identifier(&self) -> Identifier {
        self.identifier
    }

    /// The full container bytes, identifier included.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.backing
    }

    /// The parsed node arena.
    #[inline]
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// The root node.
    pub fn root(&self) -> Node<'_> {
        self.node(NodeTree::ROOT)
            .unwrap_or_else(|| unreachable!("a parsed tree always has a root"))
    }

    /// Get a node by arena index.
    pub fn node(&self, index: usize) -> Option<Node<'_>> {
        self.tree.node(&self.backing, index)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("identifier", &self.identifier)
            .field("len", &self.backing.len())
            .field("nodes", &self.tree.len())
            .finish()
    }
}
