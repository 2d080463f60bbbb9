use crate::auxiliary::AuxiliaryTensors;
use crate::blob::DatasetBlob;
use crate::error::DatasetError;
use sider_core::model::MoleculeGraph;
use tracing::trace;

/// One retrieved record: the molecule graph plus its three auxiliary rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Position that was requested from the dataset.
    pub index: usize,
    pub graph: MoleculeGraph,
    pub similarity: Vec<f32>,
    pub target: Vec<f32>,
    pub side_effects: Vec<f32>,
}

impl Sample {
    /// `(index, (graph, similarity, target), side_effects)`
    pub fn into_parts(self) -> (usize, (MoleculeGraph, Vec<f32>, Vec<f32>), Vec<f32>) {
        (
            self.index,
            (self.graph, self.similarity, self.target),
            self.side_effects,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Records materialized so far.
    pub entries: usize,
}

/// Collated molecule graphs with their per-drug matrices.
///
/// Graphs are sliced out of the blob on first access and memoized; every
/// `get` hands out an owned copy, so callers can mutate what they receive
/// without touching the cache.
#[derive(Debug)]
pub struct DrugSideEffectDataset {
    blob: DatasetBlob,
    auxiliary: AuxiliaryTensors,
    cache: Vec<Option<MoleculeGraph>>,
    stats: CacheStats,
}

impl DrugSideEffectDataset {
    /// Every record's source row must address a row of each auxiliary
    /// matrix.
    pub fn new(blob: DatasetBlob, auxiliary: AuxiliaryTensors) -> Result<Self, DatasetError> {
        let rows = auxiliary
            .similarity
            .nrows()
            .min(auxiliary.target.nrows())
            .min(auxiliary.side_effects.nrows());
        if let Some(entry) = blob.slices.iter().find(|s| s.index as usize >= rows) {
            return Err(DatasetError::MalformedGraph {
                index: entry.index as usize,
                reason: format!("source row outside the {rows} auxiliary rows"),
            });
        }

        let cache = vec![None; blob.len()];
        Ok(Self {
            blob,
            auxiliary,
            cache,
            stats: CacheStats::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.blob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blob.is_empty()
    }

    /// `(node feature width, similarity width, target width)`
    pub fn len_features(&self) -> (usize, usize, usize) {
        (
            self.blob.feature_width(),
            self.auxiliary.similarity.ncols(),
            self.auxiliary.target.ncols(),
        )
    }

    /// Returns record `index` with its auxiliary rows, slicing it out of the
    /// blob on first access.
    pub fn get(&mut self, index: usize) -> Result<Sample, DatasetError> {
        let len = self.len();
        let slot = self
            .cache
            .get_mut(index)
            .ok_or(DatasetError::IndexOutOfBounds { index, len })?;

        let graph = if let Some(graph) = slot.as_ref() {
            self.stats.hits += 1;
            graph.clone()
        } else {
            let graph = self
                .blob
                .separate(index)
                .ok_or_else(|| DatasetError::MalformedGraph {
                    index,
                    reason: "slice lies outside the blob".to_string(),
                })?;
            trace!(index, row = graph.index, atoms = graph.atom_count, "materialized record");
            *slot = Some(graph.clone());
            self.stats.misses += 1;
            self.stats.entries += 1;
            graph
        };

        let row = graph.index;
        Ok(Sample {
            index,
            similarity: self.auxiliary.similarity_row(row),
            target: self.auxiliary.target_row(row),
            side_effects: self.auxiliary.side_effect_row(row),
            graph,
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    pub fn blob(&self) -> &DatasetBlob {
        &self.blob
    }

    pub fn auxiliary(&self) -> &AuxiliaryTensors {
        &self.auxiliary
    }
}
