//! Decode automaton
//!
//! The opcode set is partitioned recursively. At every level the builder picks the widest
//! run of at most 8 bits that every remaining opcode fixes, and splits the group on the value
//! of that run. A group of one opcode becomes a leaf; a value no opcode uses becomes the
//! invalid node.
//!
//! The choice is greedy and never backtracks. The resulting shape is stable for a given
//! table, which keeps generated dispatch code reviewable; it is not a minimal tree.
//!
//! A path only tests the bits its branches selected, so a leaf may still carry fixed bits
//! nobody looked at. The decoder therefore compares the whole `(mask, value)` pair of the
//! opcode it lands on before accepting it.
//!
//! All nodes live in one arena and refer to each other by index, so the automaton can be
//! walked, serialized or relocated without pointer fix-ups.

use tracing::debug;

use crate::{
    error::BuildError,
    opcode_table::{OpcodeIndex, OpcodeSpec},
    template::FieldMask,
    utils::low_mask,
};

/// Widest bit-field a single branch may test
pub const MAX_BRANCH_WIDTH: u8 = 8;

/// Flat form: a child entry with this bit set is a leaf, the low bits hold the opcode index
pub const LEAF_MARKER: u32 = 0x8000_0000;
/// Flat form: a child entry that decodes as invalid
pub const INVALID_ENTRY: u32 = u32::MAX;

/// Index of a node in the automaton arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(u32);

impl NodeRef {
    /// Every invalid placeholder points at the shared node in slot 0
    pub const INVALID: NodeRef = NodeRef(0);

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    /// Bit position of the tested field's least significant bit
    pub start: u8,
    pub width: u8,
    /// Offset of the first of `2^width` children in the edge list
    children: u32,
}

impl Branch {
    /// Mask applied after shifting the word right by `start`
    pub const fn field_mask(&self) -> u32 {
        low_mask(self.width)
    }

    pub const fn fanout(&self) -> usize {
        1 << self.width
    }

    #[inline]
    pub const fn select(&self, raw: u32) -> usize {
        ((raw >> self.start) & self.field_mask()) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Branch(Branch),
    Leaf(OpcodeIndex),
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    nodes: Vec<Node>,
    edges: Vec<NodeRef>,
    root: NodeRef,
    depth: usize,
}

impl Automaton {
    /// Build the automaton for `fields`, one entry per opcode of `specs`.
    ///
    /// Opcodes whose encodings overlap are rejected up front: the partitioning alone would
    /// silently prefer whichever of them it happened to keep.
    pub fn build(specs: &[OpcodeSpec], fields: &[FieldMask]) -> Result<Self, BuildError> {
        debug_assert_eq!(specs.len(), fields.len());
        if fields.is_empty() {
            return Err(BuildError::EmptyTable);
        }
        check_overlaps(specs, fields)?;

        let mut builder =
            Builder { specs, fields, nodes: vec![Node::Invalid], edges: Vec::new(), depth: 0 };
        let group: Vec<OpcodeIndex> = (0..fields.len()).collect();
        let root = builder.partition(&group, u32::MAX, 0)?;

        debug!(
            "Decode automaton: {} opcodes, {} nodes, {} edges, depth {}",
            fields.len(),
            builder.nodes.len(),
            builder.edges.len(),
            builder.depth
        );

        Ok(Self { nodes: builder.nodes, edges: builder.edges, root, depth: builder.depth })
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    pub fn node(&self, node: NodeRef) -> &Node {
        &self.nodes[node.index()]
    }

    /// Children of a branch, indexed by the value of its field; empty for other nodes
    pub fn children(&self, node: NodeRef) -> &[NodeRef] {
        match self.nodes[node.index()] {
            Node::Branch(branch) => {
                let first = branch.children as usize;
                &self.edges[first..first + branch.fanout()]
            }
            _ => &[],
        }
    }

    /// All nodes; slot 0 is the shared invalid node
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of branches on the longest path from the root to a leaf
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Follow the branches for `raw` down to a leaf. The caller is responsible for the final
    /// mask check.
    #[inline]
    pub fn walk(&self, raw: u32) -> Option<OpcodeIndex> {
        let mut at = self.root;
        loop {
            match self.nodes[at.index()] {
                Node::Branch(branch) => {
                    at = self.edges[branch.children as usize + branch.select(raw)];
                }
                Node::Leaf(index) => return Some(index),
                Node::Invalid => return None,
            }
        }
    }

    /// Serialize into the flat word form.
    ///
    /// Word 0 is the root entry. A branch record is `[start, field_mask, child_0 ..]`, and a
    /// child entry is the offset of another branch record, `LEAF_MARKER | opcode` or
    /// [`INVALID_ENTRY`].
    pub fn serialize(&self) -> Vec<u32> {
        let mut flat = vec![0];
        let root = self.flatten(self.root, &mut flat);
        flat[0] = root;
        flat
    }

    fn flatten(&self, node: NodeRef, flat: &mut Vec<u32>) -> u32 {
        match self.nodes[node.index()] {
            Node::Invalid => INVALID_ENTRY,
            Node::Leaf(index) => LEAF_MARKER | index as u32,
            Node::Branch(branch) => {
                let at = flat.len();
                flat.push(u32::from(branch.start));
                flat.push(branch.field_mask());
                flat.resize(at + 2 + branch.fanout(), INVALID_ENTRY);
                for (value, &child) in self.children(node).iter().enumerate() {
                    let entry = self.flatten(child, flat);
                    flat[at + 2 + value] = entry;
                }
                at as u32
            }
        }
    }
}

/// Walk the flat form produced by [`Automaton::serialize`]. Like [`Automaton::walk`] this
/// skips the final mask check. Malformed input yields `None`.
pub fn walk_flat(flat: &[u32], raw: u32) -> Option<OpcodeIndex> {
    let mut entry = *flat.first()?;
    // Every branch consumes at least one bit, so a well-formed path has at most 32 of them
    for _ in 0..=32 {
        if entry == INVALID_ENTRY {
            return None;
        }
        if entry & LEAF_MARKER != 0 {
            return Some((entry & !LEAF_MARKER) as OpcodeIndex);
        }
        let at = entry as usize;
        let start = *flat.get(at)?;
        let field_mask = *flat.get(at + 1)?;
        let value = ((raw >> (start & 31)) & field_mask) as usize;
        entry = *flat.get(at + 2 + value)?;
    }
    None
}

fn check_overlaps(specs: &[OpcodeSpec], fields: &[FieldMask]) -> Result<(), BuildError> {
    for (i, a) in fields.iter().enumerate() {
        for (j, b) in fields.iter().enumerate().skip(i + 1) {
            if a.overlaps(b) {
                return Err(BuildError::OverlappingOpcodes {
                    first: specs[i].name,
                    second: specs[j].name,
                });
            }
        }
    }
    Ok(())
}

/// Widest run of set bits in `common`, at most [`MAX_BRANCH_WIDTH`] long. Scans starts and
/// lengths in increasing order; on ties the lowest start wins.
fn widest_field(common: u32) -> Option<(u8, u8)> {
    let mut best: Option<(u8, u8)> = None;
    for start in 0..32u8 {
        for width in 1..=MAX_BRANCH_WIDTH.min(32 - start) {
            let field = low_mask(width) << start;
            if common & field != field {
                break;
            }
            if best.is_none_or(|(_, best_width)| width > best_width) {
                best = Some((start, width));
            }
        }
    }
    best
}

struct Builder<'a> {
    specs: &'a [OpcodeSpec],
    fields: &'a [FieldMask],
    nodes: Vec<Node>,
    edges: Vec<NodeRef>,
    depth: usize,
}

impl Builder<'_> {
    fn push(&mut self, node: Node) -> NodeRef {
        self.nodes.push(node);
        NodeRef((self.nodes.len() - 1) as u32)
    }

    fn partition(
        &mut self,
        group: &[OpcodeIndex],
        available: u32,
        level: usize,
    ) -> Result<NodeRef, BuildError> {
        if let [index] = group {
            self.depth = self.depth.max(level);
            return Ok(self.push(Node::Leaf(*index)));
        }

        let common = group.iter().fold(available, |common, &i| common & self.fields[i].mask);
        let Some((start, width)) = widest_field(common) else {
            return Err(BuildError::NoDiscriminatingField {
                opcodes: group.iter().map(|&i| self.specs[i].name).collect(),
                available,
            });
        };

        // Reserve the child slots first, nested branches append after them
        let field = low_mask(width);
        let fanout = 1usize << width;
        let children = self.edges.len();
        self.edges.resize(children + fanout, NodeRef::INVALID);
        let node = self.push(Node::Branch(Branch { start, width, children: children as u32 }));

        let remaining = available & !(field << start);
        for value in 0..fanout {
            let subgroup: Vec<OpcodeIndex> = group
                .iter()
                .copied()
                .filter(|&i| {
                    let f = &self.fields[i];
                    (f.value >> start) & field == value as u32 && (f.mask >> start) & field == field
                })
                .collect();
            if subgroup.is_empty() {
                continue;
            }
            self.edges[children + value] = self.partition(&subgroup, remaining, level + 1)?;
        }

        Ok(node)
    }
}
