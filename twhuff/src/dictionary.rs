//! Huffman tree and decode lookup table.
//!
//! The tree is stored as a flat arena of nodes addressed by `u16` indices.
//! Indices `0..=256` are the leaves for byte symbols and end-of-stream;
//! internal nodes are allocated from 257 upwards in merge order, and the
//! last allocated node is the root.
//!
//! # Construction
//!
//! 1. Every symbol starts as an active node; end-of-stream weighs 1.
//! 2. While more than one node is active, stable-sort the active set by
//!    weight descending and merge the last two. The lowest node becomes
//!    child 0, the runner-up child 1, and the merged node takes the
//!    runner-up's slot with the summed weight.
//! 3. Walk from the root: child 1 appends a 1 bit at the current depth,
//!    child 0 appends a 0 bit.
//! 4. For every 10-bit window, walk from the root LSB-first and record the
//!    leaf reached, or the internal node reached after all 10 bits.
//!
//! The stable sort decides tie order and therefore the exact wire format.

use crate::frequency::FrequencyTable;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// A codec symbol: byte values `0..=255` plus [`EOF_SYMBOL`].
pub type Symbol = u16;

/// The end-of-stream symbol.
pub const EOF_SYMBOL: Symbol = 256;

/// Number of symbols in the alphabet.
pub const SYMBOL_COUNT: usize = EOF_SYMBOL as usize + 1;

/// Capacity of the node arena.
pub const MAX_NODES: usize = SYMBOL_COUNT * 2 - 1;

/// Bits resolved by a single lookup table access.
pub const LUT_BITS: u32 = 10;

const LUT_SIZE: usize = 1 << LUT_BITS;

/// Longest code the encoder packs and the decoder walks.
pub const MAX_CODE_LEN: u32 = twhuff_core::bitstream::MAX_PUSH_BITS;

pub(crate) type NodeId = u16;

/// A symbol's code: `len` bits of `bits`, first bit in the LSB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    /// Code bits, LSB-first. Bits past position 31 are not representable.
    pub bits: u32,
    /// Code length in bits (tree depth of the leaf).
    pub len: u16,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    code: Code,
    /// `None` for leaves.
    children: Option<[NodeId; 2]>,
    symbol: Symbol,
}

impl Node {
    const EMPTY: Node = Node {
        code: Code { bits: 0, len: 0 },
        children: None,
        symbol: 0,
    };
}

#[derive(Debug, Clone, Copy)]
struct ConstructNode {
    id: NodeId,
    weight: u64,
}

static DEFAULT_DICTIONARY: LazyLock<Arc<Dictionary>> =
    LazyLock::new(|| Arc::new(Dictionary::new(&FrequencyTable::DEFAULT)));

/// Huffman tree plus decode lookup table.
///
/// Immutable once built; share it across codecs with [`Arc`].
#[derive(Debug, Clone)]
pub struct Dictionary {
    nodes: [Node; MAX_NODES],
    lut: [Option<NodeId>; LUT_SIZE],
    root: NodeId,
    max_code_len: u16,
}

impl Dictionary {
    /// Build a dictionary from byte weights.
    ///
    /// Any weights are accepted. Degenerate tables (e.g. all zeros) yield a
    /// maximally skewed tree whose deepest codes exceed [`MAX_CODE_LEN`].
    pub fn new(frequencies: &FrequencyTable) -> Self {
        let mut dict = Self {
            nodes: [Node::EMPTY; MAX_NODES],
            lut: [None; LUT_SIZE],
            root: 0,
            max_code_len: 0,
        };

        dict.construct_tree(frequencies);
        dict.assign_codes();
        dict.build_lut();

        debug!(
            nodes = dict.node_count(),
            max_code_len = dict.max_code_len,
            "built huffman dictionary"
        );
        dict
    }

    /// The process-wide dictionary for the default frequency table.
    ///
    /// Built on first use and never rebuilt.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&DEFAULT_DICTIONARY)
    }

    fn construct_tree(&mut self, frequencies: &FrequencyTable) {
        let mut active = Vec::with_capacity(SYMBOL_COUNT);

        for (id, node) in self.nodes.iter_mut().take(SYMBOL_COUNT).enumerate() {
            *node = Node {
                symbol: id as Symbol,
                ..Node::EMPTY
            };
            let weight = if id == EOF_SYMBOL as usize {
                1
            } else {
                frequencies.weights()[id] as u64
            };
            active.push(ConstructNode {
                id: id as NodeId,
                weight,
            });
        }

        let mut next = SYMBOL_COUNT;
        while active.len() > 1 {
            // Must be stable: ties keep their previous relative order.
            active.sort_by(|a, b| b.weight.cmp(&a.weight));

            let Some(lowest) = active.pop() else { break };
            let Some(runner_up) = active.last_mut() else {
                break;
            };

            self.nodes[next] = Node {
                children: Some([lowest.id, runner_up.id]),
                ..Node::EMPTY
            };
            runner_up.id = next as NodeId;
            runner_up.weight += lowest.weight;
            next += 1;
        }

        self.root = (next - 1) as NodeId;
    }

    fn assign_codes(&mut self) {
        let mut stack = vec![(self.root, 0u32, 0u16)];

        while let Some((id, bits, depth)) = stack.pop() {
            let node = &mut self.nodes[id as usize];
            match node.children {
                Some([zero, one]) => {
                    // Pushed last, so the 1 branch is visited first.
                    stack.push((zero, bits, depth + 1));
                    let one_bits = 1u32
                        .checked_shl(depth as u32)
                        .map_or(bits, |bit| bits | bit);
                    stack.push((one, one_bits, depth + 1));
                }
                None => {
                    node.code = Code { bits, len: depth };
                    self.max_code_len = self.max_code_len.max(depth);
                }
            }
        }
    }

    fn build_lut(&mut self) {
        for (window, slot) in self.lut.iter_mut().enumerate() {
            let mut bits = window;
            let mut id = self.root;

            for _ in 0..LUT_BITS {
                let Some(children) = self.nodes[id as usize].children else {
                    break;
                };
                id = children[bits & 1];
                bits >>= 1;

                if self.nodes[id as usize].children.is_none() {
                    break;
                }
            }

            *slot = Some(id);
        }
    }

    /// The code assigned to `symbol`, or `None` outside the alphabet.
    pub fn code(&self, symbol: Symbol) -> Option<Code> {
        if (symbol as usize) < SYMBOL_COUNT {
            Some(self.nodes[symbol as usize].code)
        } else {
            None
        }
    }

    /// Length of the longest code in the tree.
    pub fn max_code_len(&self) -> u16 {
        self.max_code_len
    }

    /// Number of nodes in the tree, leaves included.
    pub fn node_count(&self) -> usize {
        self.root as usize + 1
    }

    /// Code of a byte or end-of-stream symbol.
    #[inline]
    pub(crate) fn code_of(&self, symbol: Symbol) -> Code {
        self.nodes[symbol as usize].code
    }

    /// Node reached by the low [`LUT_BITS`] of `window`.
    #[inline]
    pub(crate) fn lookup(&self, window: u32) -> Option<NodeId> {
        self.lut
            .get(window as usize & (LUT_SIZE - 1))
            .copied()
            .flatten()
    }

    /// Child of an internal node; `None` for leaves.
    #[inline]
    pub(crate) fn child(&self, id: NodeId, bit: usize) -> Option<NodeId> {
        self.nodes[id as usize].children.map(|c| c[bit & 1])
    }

    /// Symbol and code length of a leaf; `None` for internal nodes.
    #[inline]
    pub(crate) fn leaf(&self, id: NodeId) -> Option<(Symbol, u32)> {
        let node = &self.nodes[id as usize];
        match node.children {
            Some(_) => None,
            None => Some((node.symbol, node.code.len as u32)),
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new(&FrequencyTable::DEFAULT)
    }
}
