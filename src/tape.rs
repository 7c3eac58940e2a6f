//! Operand-to-consumer tape for reverse-mode AD.
//!
//! Each recorded node keeps the list of its outgoing edges: one
//! `(local partial, consumer)` pair per operation that consumed it. A node
//! used by many operations fans out into many edges; a binary operation
//! whose operands are the same node (`x * x`) adds two edges to the same
//! consumer. Consumers are always created after their operands, so node ids
//! are a topological order of the tape.

use std::cell::Cell;
use std::collections::HashSet;

use crate::node::NodeId;
use crate::Float;

/// An outgoing tape edge: `∂consumer/∂operand` and the consumer node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<F> {
    pub partial: F,
    pub consumer: NodeId,
}

#[derive(Clone, Debug)]
struct TapeNode<F> {
    value: F,
    edges: Vec<Edge<F>>,
}

/// Reverse-mode tape.
#[derive(Clone, Debug)]
pub struct Tape<F> {
    nodes: Vec<TapeNode<F>>,
    num_edges: usize,
    outputs: HashSet<NodeId>,
}

impl<F: Float> Default for Tape<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Tape<F> {
    /// Create an empty tape.
    pub fn new() -> Self {
        Tape {
            nodes: Vec::new(),
            num_edges: 0,
            outputs: HashSet::new(),
        }
    }

    /// Create a tape with pre-allocated capacity.
    pub fn with_capacity(est_ops: usize) -> Self {
        Tape {
            nodes: Vec::with_capacity(est_ops),
            num_edges: 0,
            outputs: HashSet::new(),
        }
    }

    /// Record a leaf node (input variable or wrapped constant).
    #[inline]
    pub fn new_variable(&mut self, value: F) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(TapeNode {
            value,
            edges: Vec::new(),
        });
        id
    }

    /// Record `result = g(operand)` with `partial = ∂g/∂operand`.
    #[inline]
    pub fn push_unary(&mut self, operand: NodeId, partial: F, value: F) -> NodeId {
        let result = self.new_variable(value);
        self.link(operand, partial, result);
        result
    }

    /// Record `result = h(lhs, rhs)` with both local partials.
    #[inline]
    pub fn push_binary(
        &mut self,
        lhs: NodeId,
        lhs_partial: F,
        rhs: NodeId,
        rhs_partial: F,
        value: F,
    ) -> NodeId {
        let result = self.new_variable(value);
        self.link(lhs, lhs_partial, result);
        self.link(rhs, rhs_partial, result);
        result
    }

    #[inline]
    fn link(&mut self, operand: NodeId, partial: F, consumer: NodeId) {
        self.nodes[operand.index()].edges.push(Edge { partial, consumer });
        self.num_edges += 1;
    }

    /// Mark the nodes the user function returned.
    pub fn set_outputs(&mut self, outputs: &[NodeId]) {
        self.outputs = outputs.iter().copied().collect();
    }

    #[inline]
    pub fn is_output(&self, id: NodeId) -> bool {
        self.outputs.contains(&id)
    }

    /// A node where backward accumulation bottoms out: nothing consumes it,
    /// or it was returned as an output.
    #[inline]
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.nodes[id.index()].edges.is_empty() || self.is_output(id)
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> F {
        self.nodes[id.index()].value
    }

    /// Outgoing edges of `id`, in recording order.
    #[inline]
    pub fn edges(&self, id: NodeId) -> &[Edge<F>] {
        &self.nodes[id.index()].edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Every node reachable from `root` along outgoing edges, `root` included.
    pub fn reachable(&self, root: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        let mut order = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(self.edges(id).iter().map(|e| e.consumer));
        }
        order
    }
}

// Thread-local active tape pointer.
thread_local! {
    static TAPE_F32: Cell<*mut Tape<f32>> = const { Cell::new(std::ptr::null_mut()) };
    static TAPE_F64: Cell<*mut Tape<f64>> = const { Cell::new(std::ptr::null_mut()) };
}

/// Trait to select the correct thread-local for a given float type.
pub trait TapeThreadLocal: Float {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>>;
}

impl TapeThreadLocal for f32 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F32
    }
}

impl TapeThreadLocal for f64 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F64
    }
}

/// Access the active tape for the current thread. Panics if no tape is active.
#[inline]
pub fn with_active_tape<F: TapeThreadLocal, R>(f: impl FnOnce(&mut Tape<F>) -> R) -> R {
    F::cell().with(|cell| {
        let ptr = cell.get();
        assert!(
            !ptr.is_null(),
            "No active tape. Use jacobi::evaluate_reverse() or a TapeGuard."
        );
        // SAFETY: The TapeGuard guarantees the pointer is valid for the
        // duration of the closure-based API scope, and only one mutable
        // reference exists at a time (single-threaded access via thread-local).
        let tape = unsafe { &mut *ptr };
        f(tape)
    })
}

/// RAII guard that sets a tape as the thread-local active tape and restores
/// the previous one on drop.
pub struct TapeGuard<F: TapeThreadLocal> {
    prev: *mut Tape<F>,
}

impl<F: TapeThreadLocal> TapeGuard<F> {
    /// Activate `tape` as the thread-local tape. Returns a guard that restores
    /// the previous tape on drop.
    pub fn new(tape: &mut Tape<F>) -> Self {
        let prev = F::cell().with(|cell| {
            let prev = cell.get();
            cell.set(tape as *mut Tape<F>);
            prev
        });
        TapeGuard { prev }
    }
}

impl<F: TapeThreadLocal> Drop for TapeGuard<F> {
    fn drop(&mut self) {
        F::cell().with(|cell| {
            cell.set(self.prev);
        });
    }
}
