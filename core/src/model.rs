use serde::{Deserialize, Serialize};

/// How bond orders are laid out in [`MoleculeGraph::edge_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTypeLayout {
    /// `edge_type[k]` is the bond order of the directed edge in column `k`
    /// of `edge_index`.
    #[default]
    Aligned,
    /// Bond orders in bond declaration order, the whole list repeated twice,
    /// truncated to integers. Matches graphs produced by the legacy pipeline.
    Repeated,
}

impl EdgeTypeLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeTypeLayout::Aligned => "aligned",
            EdgeTypeLayout::Repeated => "repeated",
        }
    }
}

/// Graph record for a single molecule.
///
/// `node_features` is row-major with `feature_width` columns. `edge_index`
/// holds the source row and target row of every directed edge; each
/// undirected bond appears once per direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeGraph {
    /// Row of the source table this graph was built from.
    pub index: usize,
    pub atom_count: usize,
    pub feature_width: usize,
    pub node_features: Vec<f32>,
    pub edge_index: [Vec<i64>; 2],
    pub edge_type: Vec<f64>,
}

impl MoleculeGraph {
    pub fn new(index: usize, atom_count: usize, feature_width: usize) -> Self {
        Self {
            index,
            atom_count,
            feature_width,
            node_features: Vec::with_capacity(atom_count * feature_width),
            edge_index: [Vec::new(), Vec::new()],
            edge_type: Vec::new(),
        }
    }

    /// Feature row of one atom.
    pub fn node_row(&self, atom: usize) -> Option<&[f32]> {
        if atom >= self.atom_count || self.feature_width == 0 {
            return None;
        }
        let start = atom * self.feature_width;
        self.node_features.get(start..start + self.feature_width)
    }

    /// Number of directed edges (twice the bond count).
    pub fn edge_count(&self) -> usize {
        self.edge_index[0].len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.edge_index[0]
            .iter()
            .copied()
            .zip(self.edge_index[1].iter().copied())
    }

    pub fn push_edge(&mut self, source: usize, target: usize) {
        self.edge_index[0].push(source as i64);
        self.edge_index[1].push(target as i64);
    }
}
