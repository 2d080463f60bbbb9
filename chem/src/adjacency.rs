use std::collections::HashMap;

/// Neighbour entry: (target atom, bond order value)
pub type EdgeData = (usize, f64);

/// Undirected adjacency list that remembers insertion order: nodes in the
/// order they first appear in an edge, neighbours in the order their edge
/// was added.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    nodes: Vec<usize>,
    slots: HashMap<usize, usize>,
    adjacency: Vec<Vec<EdgeData>>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from `(begin, end, weight)` triples.
    pub fn from_edges(edges: impl IntoIterator<Item = (usize, usize, f64)>) -> Self {
        let mut graph = Self::new();
        for (a, b, weight) in edges {
            graph.add_edge(a, b, weight);
        }
        graph
    }

    fn slot(&mut self, node: usize) -> usize {
        if let Some(&slot) = self.slots.get(&node) {
            return slot;
        }
        let slot = self.nodes.len();
        self.nodes.push(node);
        self.slots.insert(node, slot);
        self.adjacency.push(Vec::new());
        slot
    }

    /// Adds an undirected edge. Re-adding an existing edge overwrites its
    /// weight in both directions.
    pub fn add_edge(&mut self, a: usize, b: usize, weight: f64) {
        let sa = self.slot(a);
        let sb = self.slot(b);
        if let Some(entry) = self.adjacency[sa].iter_mut().find(|(t, _)| *t == b) {
            entry.1 = weight;
            if let Some(back) = self.adjacency[sb].iter_mut().find(|(t, _)| *t == a) {
                back.1 = weight;
            }
            return;
        }
        self.adjacency[sa].push((b, weight));
        if sa != sb {
            self.adjacency[sb].push((a, weight));
        }
    }

    /// Every edge in both directions: for each node in first-appearance
    /// order, one `(node, neighbour, weight)` per neighbour.
    pub fn directed_edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.nodes
            .iter()
            .zip(&self.adjacency)
            .flat_map(|(&node, edges)| edges.iter().map(move |&(t, w)| (node, t, w)))
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}
