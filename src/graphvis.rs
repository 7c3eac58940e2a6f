//! Graphviz rendering of a recorded forward-mode computation.
//!
//! Reads only the parent and operation records of a [`ForwardGraph`]; never
//! the derivatives. The text can be piped to `dot -Tpng`.

use std::collections::HashSet;
use std::fmt::Write;

use crate::graph::ForwardGraph;
use crate::node::NodeId;
use crate::op::Operation;
use crate::Float;

/// Collects DOT statements, dropping repeats.
struct Dot {
    lines: Vec<String>,
    seen: HashSet<String>,
}

impl Dot {
    fn new() -> Self {
        Dot {
            lines: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, line: String) {
        if self.seen.insert(line.clone()) {
            self.lines.push(line);
        }
    }

    fn vertex(&mut self, name: &str) {
        self.push(format!("    \"{name}\";"));
    }

    fn edge(&mut self, from: &str, to: &str, label: Option<&str>) {
        match label {
            Some(label) => self.push(format!("    \"{from}\" -- \"{to}\" [label=\"{label}\"];")),
            None => self.push(format!("    \"{from}\" -- \"{to}\";")),
        }
    }
}

/// Render the subgraph feeding `outputs` as an undirected DOT graph.
///
/// Each recorded node is a vertex `v{n}`. An edge runs from each operand to
/// the result, labelled with the operation on the first operand's edge. A
/// constant operand (`x * 3`) gets its own vertex. Outputs are linked to
/// `f1, f2, ..` and seeded inputs to `x1, x2, ..`.
pub fn to_dot<F: Float>(graph: &ForwardGraph<F>, outputs: &[NodeId]) -> String {
    let mut dot = Dot::new();
    let mut visited = HashSet::new();

    for (k, &out) in outputs.iter().enumerate() {
        let mut stack = vec![out];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let node = graph.node(id);
            let label = graph.label(id);
            let op = node.operation();
            for (i, &p) in node.parents().iter().enumerate() {
                let parent = graph.label(p);
                dot.vertex(&label);
                dot.vertex(&parent);
                match op.constant() {
                    Some(c) => {
                        let constant = c.to_string();
                        dot.vertex(&constant);
                        dot.edge(&parent, &label, Some(&op.label()));
                        dot.edge(&constant, &label, None);
                    }
                    None if i == 0 => dot.edge(&parent, &label, Some(&op.label())),
                    None => dot.edge(&parent, &label, None),
                }
                stack.push(p);
            }
        }
        let f = format!("f{}", k + 1);
        dot.vertex(&f);
        dot.edge(&graph.label(out), &f, None);
    }

    let inputs = graph
        .iter()
        .filter(|(_, node)| matches!(node.operation(), Operation::Input));
    for (i, (id, _)) in inputs.enumerate() {
        let x = format!("x{}", i + 1);
        dot.vertex(&x);
        dot.edge(&x, &graph.label(id), None);
    }

    let mut text = String::from("graph computation {\n    rankdir=LR;\n    size=\"30,30\";\n");
    for line in dot.lines {
        let _ = writeln!(text, "{line}");
    }
    text.push('}');
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{BinaryOp, UnaryOp};

    #[test]
    fn operand_edges_and_constants() {
        // v0 = x, v1 = sin(v0), v2 = v1 * 3
        let mut graph = ForwardGraph::<f64>::for_inputs(1);
        let x = graph.push_input(0.5, 0);
        let s = graph.push(0.5_f64.sin(), vec![0.5_f64.cos()], vec![x], Operation::Unary(UnaryOp::Sin));
        let t = graph.push(
            3.0 * 0.5_f64.sin(),
            vec![3.0 * 0.5_f64.cos()],
            vec![s],
            Operation::WithScalar(BinaryOp::Mul, 3.0),
        );

        let dot = to_dot(&graph, &[t]);
        assert!(dot.starts_with("graph computation {"));
        assert!(dot.contains("\"v0\" -- \"v1\" [label=\"sin()\"];"));
        assert!(dot.contains("\"v1\" -- \"v2\" [label=\"*\"];"));
        assert!(dot.contains("\"3\" -- \"v2\";"));
        assert!(dot.contains("\"v2\" -- \"f1\";"));
        assert!(dot.contains("\"x1\" -- \"v0\";"));
    }

    #[test]
    fn second_operand_edge_is_unlabelled() {
        let mut graph = ForwardGraph::<f64>::for_inputs(2);
        let a = graph.push_input(1.0, 0);
        let b = graph.push_input(2.0, 1);
        let sum = graph.push(3.0, vec![1.0, 1.0], vec![a, b], Operation::Binary(BinaryOp::Add));

        let dot = to_dot(&graph, &[sum]);
        assert!(dot.contains("\"v-1\" -- \"v1\" [label=\"+\"];"));
        assert!(dot.contains("\"v0\" -- \"v1\";"));
        assert!(dot.contains("\"x1\" -- \"v-1\";"));
        assert!(dot.contains("\"x2\" -- \"v0\";"));
    }
}
