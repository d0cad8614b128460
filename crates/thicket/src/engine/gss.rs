//! Graph-structured stack.
//!
//! GSS nodes represent "sort S has been entered at input offset O". All
//! productions that reach the same (sort, offset) share one node, which is
//! what bounds the work on ambiguous and recursive grammars. Nodes are
//! arena-allocated and addressed by integer handles, so the return-edge graph
//! can be cyclic (left recursion produces self-edges) without any ownership
//! gymnastics.

use crate::forest::NodeId;
use crate::grammar::SortId;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Handle to a GSS node, valid for the parse that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct GssId(u32);

impl GssId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A return edge: how to resume the production that entered a sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GssEdge {
    /// The GSS node of the calling production's left-hand sort.
    pub target: GssId,
    /// The calling alternative.
    pub alternative: u32,
    /// Index of the sort slot being filled in that alternative.
    pub slot: u32,
    /// Children the calling alternative had collected before the call.
    pub children: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) struct GssNode {
    pub sort: SortId,
    pub start: u32,
    pub edges: Vec<GssEdge>,
    /// Completions already performed: (end offset, shared result node).
    /// Edges added after a completion replay these instead of re-deriving.
    pub pops: SmallVec<[(u32, NodeId); 2]>,
}

/// The arena of GSS nodes for one parse.
#[derive(Debug, Default)]
pub(crate) struct Gss {
    nodes: Vec<GssNode>,
    index: HashMap<(SortId, u32), GssId, ahash::RandomState>,
}

impl Gss {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node for (sort, start), creating it if absent. Returns the handle and
    /// whether it was created by this call.
    pub fn get_or_create(&mut self, sort: SortId, start: u32) -> (GssId, bool) {
        if let Some(&id) = self.index.get(&(sort, start)) {
            return (id, false);
        }
        let id = GssId(u32::try_from(self.nodes.len()).expect("GSS node count fits in u32"));
        self.nodes.push(GssNode {
            sort,
            start,
            edges: Vec::new(),
            pops: SmallVec::new(),
        });
        self.index.insert((sort, start), id);
        (id, true)
    }

    pub fn node(&self, id: GssId) -> &GssNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: GssId) -> &mut GssNode {
        &mut self.nodes[id.index()]
    }

    /// Add a return edge, ignoring exact duplicates.
    pub fn add_edge(&mut self, id: GssId, edge: GssEdge) {
        let node = self.node_mut(id);
        if !node.edges.contains(&edge) {
            node.edges.push(edge);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
