use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Node {
    Symbol(usize),
    Choice(usize),
}

/// "Must be evaluated before" relation between symbols and choices.
#[derive(Debug)]
pub(crate) struct DependencyGraph {
    graph: DiGraph<Node, ()>,
    symbols: usize,
}

impl DependencyGraph {
    pub(crate) fn new(symbols: usize, choices: usize) -> Self {
        let mut graph = DiGraph::with_capacity(symbols + choices, 0);
        for i in 0..symbols {
            graph.add_node(Node::Symbol(i));
        }
        for j in 0..choices {
            graph.add_node(Node::Choice(j));
        }
        Self { graph, symbols }
    }

    fn index(&self, node: Node) -> NodeIndex {
        match node {
            Node::Symbol(i) => NodeIndex::new(i),
            Node::Choice(j) => NodeIndex::new(self.symbols + j),
        }
    }

    pub(crate) fn add_edge(&mut self, before: Node, after: Node) {
        let (a, b) = (self.index(before), self.index(after));
        self.graph.update_edge(a, b, ());
    }

    /// Topological evaluation order, or a node on a cycle.
    pub(crate) fn evaluation_order(&self) -> Result<Vec<Node>, Node> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|ix| self.graph[ix]).collect())
            .map_err(|cycle| self.graph[cycle.node_id()])
    }
}
