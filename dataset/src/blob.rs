//! Collated storage for every graph of a dataset.
//!
//! All per-molecule arrays are concatenated into flat buffers; a slice table
//! remembers where each record's nodes and edges start and end. Edge indices
//! are stored as built (per-molecule, zero-based) and are handed back
//! unchanged by [`DatasetBlob::separate`].

use crate::error::DatasetError;
use rkyv::{Archive, Deserialize, Serialize};
use sider_core::model::MoleculeGraph;

/// Offsets of one record inside the blob. Node ranges count atoms, edge
/// ranges count directed edges.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[archive(check_bytes)]
pub struct SliceEntry {
    /// Row of the source table the record was built from.
    pub index: u64,
    pub node_start: u64,
    pub node_end: u64,
    pub edge_start: u64,
    pub edge_end: u64,
}

impl SliceEntry {
    pub fn atom_count(&self) -> usize {
        (self.node_end - self.node_start) as usize
    }

    pub fn edge_count(&self) -> usize {
        (self.edge_end - self.edge_start) as usize
    }
}

#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[archive(check_bytes)]
pub struct DatasetBlob {
    pub feature_width: u64,
    pub node_features: Vec<f32>,
    pub edge_source: Vec<i64>,
    pub edge_target: Vec<i64>,
    pub edge_type: Vec<f64>,
    pub atom_counts: Vec<u64>,
    pub slices: Vec<SliceEntry>,
}

impl DatasetBlob {
    fn empty(feature_width: usize) -> Self {
        Self {
            feature_width: feature_width as u64,
            node_features: Vec::new(),
            edge_source: Vec::new(),
            edge_target: Vec::new(),
            edge_type: Vec::new(),
            atom_counts: Vec::new(),
            slices: Vec::new(),
        }
    }

    /// Concatenates `graphs` in order. Every graph must use `feature_width`
    /// columns and have consistent array lengths.
    pub fn collate<I>(graphs: I, feature_width: usize) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = MoleculeGraph>,
    {
        let mut blob = Self::empty(feature_width);
        for graph in graphs {
            blob.push(graph)?;
        }
        Ok(blob)
    }

    fn push(&mut self, graph: MoleculeGraph) -> Result<(), DatasetError> {
        let expected = self.feature_width as usize;
        if graph.feature_width != expected {
            return Err(DatasetError::FeatureWidthMismatch {
                index: graph.index,
                expected,
                found: graph.feature_width,
            });
        }
        if graph.node_features.len() != graph.atom_count * expected {
            return Err(DatasetError::MalformedGraph {
                index: graph.index,
                reason: format!(
                    "{} feature values for {} atoms",
                    graph.node_features.len(),
                    graph.atom_count
                ),
            });
        }
        let [source, target] = graph.edge_index;
        if source.len() != target.len() || source.len() != graph.edge_type.len() {
            return Err(DatasetError::MalformedGraph {
                index: graph.index,
                reason: format!(
                    "edge rows {}/{} with {} edge types",
                    source.len(),
                    target.len(),
                    graph.edge_type.len()
                ),
            });
        }

        let node_start = self.slices.last().map_or(0, |s| s.node_end);
        let edge_start = self.edge_source.len() as u64;
        self.slices.push(SliceEntry {
            index: graph.index as u64,
            node_start,
            node_end: node_start + graph.atom_count as u64,
            edge_start,
            edge_end: edge_start + source.len() as u64,
        });
        self.atom_counts.push(graph.atom_count as u64);
        self.node_features.extend(graph.node_features);
        self.edge_source.extend(source);
        self.edge_target.extend(target);
        self.edge_type.extend(graph.edge_type);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn feature_width(&self) -> usize {
        self.feature_width as usize
    }

    pub fn slice(&self, pos: usize) -> Option<&SliceEntry> {
        self.slices.get(pos)
    }

    /// Copies record `pos` back out of the blob.
    pub fn separate(&self, pos: usize) -> Option<MoleculeGraph> {
        let entry = self.slices.get(pos)?;
        let width = self.feature_width();
        let nodes = entry.node_start as usize * width..entry.node_end as usize * width;
        let edges = entry.edge_start as usize..entry.edge_end as usize;

        Some(MoleculeGraph {
            index: entry.index as usize,
            atom_count: entry.atom_count(),
            feature_width: width,
            node_features: self.node_features.get(nodes)?.to_vec(),
            edge_index: [
                self.edge_source.get(edges.clone())?.to_vec(),
                self.edge_target.get(edges.clone())?.to_vec(),
            ],
            edge_type: self.edge_type.get(edges)?.to_vec(),
        })
    }

    /// Total atoms across all records.
    pub fn total_atoms(&self) -> usize {
        self.atom_counts.iter().sum::<u64>() as usize
    }

    /// Total directed edges across all records.
    pub fn total_edges(&self) -> usize {
        self.edge_source.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(index: usize, atoms: usize, edges: &[(i64, i64)]) -> MoleculeGraph {
        let mut g = MoleculeGraph::new(index, atoms, 2);
        for a in 0..atoms {
            g.node_features.extend([a as f32, index as f32]);
        }
        for &(s, t) in edges {
            g.edge_index[0].push(s);
            g.edge_index[1].push(t);
            g.edge_type.push(1.0);
        }
        g
    }

    #[test]
    fn test_collate_then_separate_keeps_local_indices() {
        let graphs = vec![
            graph(0, 2, &[(0, 1), (1, 0)]),
            graph(3, 1, &[]),
            graph(5, 3, &[(0, 2), (2, 0)]),
        ];
        let blob = DatasetBlob::collate(graphs.clone(), 2).unwrap();

        assert_eq!(blob.len(), 3);
        assert_eq!(blob.total_atoms(), 6);
        assert_eq!(blob.total_edges(), 4);
        assert_eq!(blob.slice(2).unwrap().node_start, 3);
        assert_eq!(blob.slice(2).unwrap().edge_start, 2);

        for (pos, expected) in graphs.iter().enumerate() {
            assert_eq!(blob.separate(pos).as_ref(), Some(expected));
        }
        assert_eq!(blob.separate(3), None);
    }

    #[test]
    fn test_collate_rejects_wrong_width() {
        let wide = MoleculeGraph::new(7, 0, 3);
        let err = DatasetBlob::collate(vec![wide], 2).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::FeatureWidthMismatch { index: 7, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn test_collate_rejects_ragged_edges() {
        let mut g = graph(1, 2, &[(0, 1)]);
        g.edge_type.push(2.0);
        assert!(matches!(
            DatasetBlob::collate(vec![g], 2),
            Err(DatasetError::MalformedGraph { index: 1, .. })
        ));
    }
}
