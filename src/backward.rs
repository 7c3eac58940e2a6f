//! Backward accumulation over a reverse-mode [`Tape`].
//!
//! For one seed variable, every node reachable from the seed gets exactly one
//! accumulated derivative: the sum, over every tape path from that node to a
//! terminal, of the product of edge partials along the path. Terminals are
//! nodes nothing consumes plus the registered outputs. The sum is kept split
//! by terminal identity so that one pass yields the derivative of every
//! output at once.
//!
//! The scratch storage is owned by a [`BackwardPass`], not by the tape: the
//! tape stays immutable during accumulation, and [`BackwardPass::clear`]
//! resets the storage before the next seed.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::node::NodeId;
use crate::tape::Tape;
use crate::Float;

/// Derivative of each reachable terminal with respect to one node.
type Sensitivity<F> = Vec<(NodeId, F)>;

/// Per-output derivatives reached from one seed, deduplicated by output identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Contributions<F> {
    entries: Vec<(NodeId, F)>,
}

impl<F: Float> Contributions<F> {
    /// Derivative of `output` with respect to the seed, if the seed reaches it.
    pub fn get(&self, output: NodeId) -> Option<F> {
        self.entries
            .iter()
            .find(|(id, _)| *id == output)
            .map(|&(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, F)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scratch storage for backward passes over one tape.
#[derive(Clone, Debug, Default)]
pub struct BackwardPass<F> {
    sensitivities: HashMap<NodeId, Sensitivity<F>>,
    output_depend: Vec<NodeId>,
}

impl<F: Float> BackwardPass<F> {
    pub fn new() -> Self {
        BackwardPass {
            sensitivities: HashMap::new(),
            output_depend: Vec::new(),
        }
    }

    /// Accumulated derivative of `node`: the chain-rule sum over every path to
    /// every terminal it reaches. A terminal contributes `1` for itself.
    pub fn grad(&mut self, tape: &Tape<F>, node: NodeId) -> F {
        self.accumulate(tape, node);
        self.accumulated(node).unwrap_or_else(F::zero)
    }

    /// The cached accumulated derivative of `node`, if this pass has reached it.
    pub fn accumulated(&self, node: NodeId) -> Option<F> {
        self.sensitivities
            .get(&node)
            .map(|s| s.iter().fold(F::zero(), |acc, &(_, d)| acc + d))
    }

    /// One contribution per (outgoing edge of `seed`, terminal reached through
    /// it): `edge partial × accumulated derivative of the consumer toward that
    /// terminal`. The terminal of each entry is appended to
    /// [`output_depend`](Self::output_depend) in the same order.
    pub fn grad_vec(&mut self, tape: &Tape<F>, seed: NodeId) -> Vec<F> {
        let mut gradient = Vec::new();
        for edge in tape.edges(seed) {
            self.accumulate(tape, edge.consumer);
            for &(terminal, d) in &self.sensitivities[&edge.consumer] {
                self.output_depend.push(terminal);
                gradient.push(edge.partial * d);
            }
        }
        gradient
    }

    /// Terminals reached by [`grad_vec`](Self::grad_vec), one entry per
    /// contribution. A terminal reached along several edges appears several
    /// times.
    pub fn output_depend(&self) -> &[NodeId] {
        &self.output_depend
    }

    /// Derivatives of every terminal reached from `seed`, summed per terminal.
    pub fn derivatives(&mut self, tape: &Tape<F>, seed: NodeId) -> Contributions<F> {
        let gradient = self.grad_vec(tape, seed);
        let contributions = deduplicate(&self.output_depend, &gradient);
        trace!(
            seed = %seed,
            visited = self.sensitivities.len(),
            outputs = contributions.len(),
            "backward pass"
        );
        contributions
    }

    /// Forget everything accumulated for nodes reachable from `seed`.
    pub fn clear(&mut self, tape: &Tape<F>, seed: NodeId) {
        for id in tape.reachable(seed) {
            self.sensitivities.remove(&id);
        }
        self.output_depend.clear();
    }

    /// `true` when no node holds an accumulated derivative.
    pub fn is_clear(&self) -> bool {
        self.sensitivities.is_empty() && self.output_depend.is_empty()
    }

    /// Fill in every node reachable from `root` that has no cached value yet.
    fn accumulate(&mut self, tape: &Tape<F>, root: NodeId) {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        let mut pending = Vec::new();
        while let Some(id) = stack.pop() {
            if self.sensitivities.contains_key(&id) || !seen.insert(id) {
                continue;
            }
            pending.push(id);
            stack.extend(tape.edges(id).iter().map(|e| e.consumer));
        }

        // Consumers are recorded after their operands, so descending ids
        // finish every consumer before any node that feeds it.
        pending.sort_unstable_by(|a, b| b.cmp(a));
        for id in pending {
            let mut sensitivity: Sensitivity<F> = Vec::new();
            if tape.is_terminal(id) {
                sensitivity.push((id, F::one()));
            }
            for edge in tape.edges(id) {
                for &(terminal, d) in &self.sensitivities[&edge.consumer] {
                    add_into(&mut sensitivity, terminal, edge.partial * d);
                }
            }
            self.sensitivities.insert(id, sensitivity);
        }
    }
}

fn add_into<F: Float>(sensitivity: &mut Sensitivity<F>, terminal: NodeId, d: F) {
    match sensitivity.iter_mut().find(|(id, _)| *id == terminal) {
        Some(entry) => entry.1 = entry.1 + d,
        None => sensitivity.push((terminal, d)),
    }
}

/// Sum contributions that reached the same terminal, keyed by node identity.
/// First-seen order is kept.
fn deduplicate<F: Float>(output_depend: &[NodeId], gradient: &[F]) -> Contributions<F> {
    debug_assert_eq!(output_depend.len(), gradient.len());
    let mut index: HashMap<NodeId, usize> = HashMap::new();
    let mut entries: Vec<(NodeId, F)> = Vec::new();
    for (&terminal, &d) in output_depend.iter().zip(gradient) {
        match index.get(&terminal) {
            Some(&i) => entries[i].1 = entries[i].1 + d,
            None => {
                index.insert(terminal, entries.len());
                entries.push((terminal, d));
            }
        }
    }
    Contributions { entries }
}
