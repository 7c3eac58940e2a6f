//! Computation graph recorded during a forward-mode evaluation.
//!
//! Every [`Forward`](crate::Forward) handle points into a `ForwardGraph`
//! arena that stores, per node, the value, the full derivative vector with
//! respect to every seeded input, the operand nodes and the operation label.
//! Derivatives are computed eagerly when the node is pushed; the parent and
//! operation records exist only for visualization.

use std::cell::Cell;

use crate::node::NodeId;
use crate::op::Operation;
use crate::Float;

/// One recorded forward-mode node.
#[derive(Clone, Debug)]
pub struct GraphNode<F> {
    value: F,
    derivative: Vec<F>,
    parents: Vec<NodeId>,
    operation: Operation<F>,
}

impl<F: Float> GraphNode<F> {
    pub fn value(&self) -> F {
        self.value
    }

    /// Partial derivatives with respect to each seeded input, in seed order.
    pub fn derivative(&self) -> &[F] {
        &self.derivative
    }

    /// Operand nodes, in operand order.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn operation(&self) -> &Operation<F> {
        &self.operation
    }
}

/// Arena of forward-mode nodes for one evaluation.
///
/// Node labels (`v{n}`) come from a counter that starts at `1 - m` for an
/// evaluation over `m` inputs, so the seeded inputs are `v{1-m} ..= v0` and
/// the first intermediate result is `v1`. The counter lives in the graph, so
/// a fresh evaluation always restarts it.
#[derive(Clone, Debug)]
pub struct ForwardGraph<F> {
    nodes: Vec<GraphNode<F>>,
    dim: usize,
    label_offset: i64,
}

impl<F: Float> ForwardGraph<F> {
    /// Create an empty graph whose derivatives have `dim` components.
    /// Labels start at `v1`.
    pub fn new(dim: usize) -> Self {
        ForwardGraph {
            nodes: Vec::new(),
            dim,
            label_offset: 1,
        }
    }

    /// Create an empty graph for an evaluation over `num_inputs` seeds.
    pub fn for_inputs(num_inputs: usize) -> Self {
        ForwardGraph {
            nodes: Vec::with_capacity(num_inputs * 10),
            dim: num_inputs,
            label_offset: 1 - num_inputs as i64,
        }
    }

    /// Number of derivative components carried by every node.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Seed input `lane` with the `lane`-th standard basis vector.
    pub fn push_input(&mut self, value: F, lane: usize) -> NodeId {
        assert!(
            lane < self.dim,
            "seed lane {lane} out of range for {} inputs",
            self.dim
        );
        let derivative = (0..self.dim)
            .map(|k| if k == lane { F::one() } else { F::zero() })
            .collect();
        self.push(value, derivative, Vec::new(), Operation::Input)
    }

    /// Record a node. `derivative` must have [`dim`](Self::dim) components.
    pub fn push(
        &mut self,
        value: F,
        derivative: Vec<F>,
        parents: Vec<NodeId>,
        operation: Operation<F>,
    ) -> NodeId {
        assert_eq!(
            derivative.len(),
            self.dim,
            "derivative has {} components, graph expects {}",
            derivative.len(),
            self.dim
        );
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(GraphNode {
            value,
            derivative,
            parents,
            operation,
        });
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &GraphNode<F> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> F {
        self.nodes[id.index()].value
    }

    #[inline]
    pub fn derivative(&self, id: NodeId) -> &[F] {
        &self.nodes[id.index()].derivative
    }

    /// Visualization label, e.g. `v-1`, `v0`, `v3`.
    pub fn label(&self, id: NodeId) -> String {
        format!("v{}", id.index() as i64 + self.label_offset)
    }

    /// Iterate over `(id, node)` in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &GraphNode<F>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::from_index(i), n))
    }

    /// One-line description of a node, for debugging.
    pub fn describe(&self, id: NodeId) -> String {
        let node = self.node(id);
        let parents: Vec<String> = node.parents.iter().map(|&p| self.label(p)).collect();
        format!(
            "Node: vindex={}, val={}, der={:?}, parent=[{}], and op={}.",
            self.label(id),
            node.value,
            node.derivative,
            parents.join(", "),
            node.operation
        )
    }
}

// Thread-local active graph pointer.
thread_local! {
    static GRAPH_F32: Cell<*mut ForwardGraph<f32>> = const { Cell::new(std::ptr::null_mut()) };
    static GRAPH_F64: Cell<*mut ForwardGraph<f64>> = const { Cell::new(std::ptr::null_mut()) };
}

/// Trait to select the correct thread-local for a given float type.
pub trait GraphThreadLocal: Float {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut ForwardGraph<Self>>>;
}

impl GraphThreadLocal for f32 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut ForwardGraph<Self>>> {
        &GRAPH_F32
    }
}

impl GraphThreadLocal for f64 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut ForwardGraph<Self>>> {
        &GRAPH_F64
    }
}

/// Access the active graph for the current thread. Panics if none is active.
#[inline]
pub fn with_active_graph<F: GraphThreadLocal, R>(f: impl FnOnce(&mut ForwardGraph<F>) -> R) -> R {
    F::cell().with(|cell| {
        let ptr = cell.get();
        assert!(
            !ptr.is_null(),
            "No active forward graph. Use jacobi::evaluate_forward() or a GraphGuard."
        );
        // SAFETY: The GraphGuard guarantees the pointer is valid while it is
        // installed, and only one mutable reference exists at a time
        // (single-threaded access via thread-local, no re-entrant calls).
        let graph = unsafe { &mut *ptr };
        f(graph)
    })
}

/// RAII guard that installs a graph as the thread-local active graph and
/// restores the previous one on drop.
pub struct GraphGuard<F: GraphThreadLocal> {
    prev: *mut ForwardGraph<F>,
}

impl<F: GraphThreadLocal> GraphGuard<F> {
    pub fn new(graph: &mut ForwardGraph<F>) -> Self {
        let prev = F::cell().with(|cell| {
            let prev = cell.get();
            cell.set(graph as *mut ForwardGraph<F>);
            prev
        });
        GraphGuard { prev }
    }
}

impl<F: GraphThreadLocal> Drop for GraphGuard<F> {
    fn drop(&mut self) {
        F::cell().with(|cell| {
            cell.set(self.prev);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_the_seed_offset() {
        let mut g = ForwardGraph::<f64>::for_inputs(3);
        let a = g.push_input(1.0, 0);
        let b = g.push_input(2.0, 1);
        let c = g.push_input(3.0, 2);
        let d = g.push(6.0, vec![0.0; 3], vec![a, b], Operation::Leaf);
        assert_eq!(g.label(a), "v-2");
        assert_eq!(g.label(b), "v-1");
        assert_eq!(g.label(c), "v0");
        assert_eq!(g.label(d), "v1");
    }

    #[test]
    fn inputs_are_one_hot() {
        let mut g = ForwardGraph::<f64>::for_inputs(2);
        let a = g.push_input(5.0, 1);
        assert_eq!(g.derivative(a), &[0.0, 1.0]);
        assert_eq!(g.value(a), 5.0);
        assert!(g.node(a).parents().is_empty());
    }

    #[test]
    #[should_panic(expected = "graph expects")]
    fn dimension_mismatch_panics() {
        let mut g = ForwardGraph::<f64>::new(2);
        g.push(1.0, vec![1.0], Vec::new(), Operation::Leaf);
    }

    #[test]
    fn guard_restores_previous_graph() {
        let mut outer = ForwardGraph::<f64>::new(1);
        let mut inner = ForwardGraph::<f64>::new(1);
        let _g1 = GraphGuard::new(&mut outer);
        {
            let _g2 = GraphGuard::new(&mut inner);
            with_active_graph(|g: &mut ForwardGraph<f64>| {
                g.push(1.0, vec![0.0], Vec::new(), Operation::Leaf)
            });
        }
        let len = with_active_graph(|g: &mut ForwardGraph<f64>| g.len());
        assert_eq!(len, 0);
        drop(_g1);
        assert_eq!(inner.len(), 1);
    }
}
