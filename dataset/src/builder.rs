use crate::auxiliary::AuxiliaryTensors;
use crate::blob::DatasetBlob;
use crate::dataset::DrugSideEffectDataset;
use crate::error::DatasetError;
use crate::snapshot::{SnapshotStore, SNAPSHOT_VERSION};
use crate::table::{read_smiles_file, TableOptions};
use chem::{smiles_to_graph, ATOM_FEATURE_WIDTH};
use sider_core::config::{AppConfig, FeaturizeConfig};
use sider_core::digest::{combine_digests, ContentHash};
use sider_core::model::{EdgeTypeLayout, MoleculeGraph};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Decides whether a featurized record enters the dataset.
pub trait GraphFilter {
    fn keep(&self, graph: &MoleculeGraph) -> bool;
}

impl<F> GraphFilter for F
where
    F: Fn(&MoleculeGraph) -> bool,
{
    fn keep(&self, graph: &MoleculeGraph) -> bool {
        self(graph)
    }
}

/// Rewrites a featurized record before it is collated.
pub trait GraphTransform {
    fn apply(&self, graph: MoleculeGraph) -> MoleculeGraph;
}

impl<F> GraphTransform for F
where
    F: Fn(MoleculeGraph) -> MoleculeGraph,
{
    fn apply(&self, graph: MoleculeGraph) -> MoleculeGraph {
        self(graph)
    }
}

enum SmilesSource {
    Table { path: PathBuf, options: TableOptions },
    List(Vec<String>),
}

enum AuxiliarySource {
    Files {
        similarity: PathBuf,
        target: PathBuf,
        side_effects: PathBuf,
    },
    Tensors(AuxiliaryTensors),
}

/// Builds a [`DrugSideEffectDataset`] in one pass: featurize, filter,
/// transform, collate, then attach the auxiliary matrices.
pub struct DatasetBuilder {
    smiles: SmilesSource,
    auxiliary: AuxiliarySource,
    limit: usize,
    layout: EdgeTypeLayout,
    filter: Option<Box<dyn GraphFilter>>,
    transform: Option<Box<dyn GraphTransform>>,
    snapshot: Option<SnapshotStore>,
}

impl DatasetBuilder {
    /// In-memory SMILES and matrices.
    pub fn new(smiles: Vec<String>, auxiliary: AuxiliaryTensors) -> Self {
        Self {
            smiles: SmilesSource::List(smiles),
            auxiliary: AuxiliarySource::Tensors(auxiliary),
            limit: TableOptions::default().limit,
            layout: EdgeTypeLayout::default(),
            filter: None,
            transform: None,
            snapshot: None,
        }
    }

    /// Files named by the `data`, `featurize` and `snapshot` sections.
    pub fn from_config(config: &AppConfig) -> Self {
        let options = TableOptions::from_config(&config.data);
        let data = &config.data;
        Self {
            smiles: SmilesSource::Table {
                path: PathBuf::from(&data.smiles_table),
                options,
            },
            auxiliary: AuxiliarySource::Files {
                similarity: PathBuf::from(&data.similarity),
                target: PathBuf::from(&data.target_profile),
                side_effects: PathBuf::from(&data.side_effects),
            },
            limit: data.max_molecules,
            layout: config.featurize.edge_type_layout,
            filter: None,
            transform: None,
            snapshot: config
                .snapshot
                .enabled
                .then(|| SnapshotStore::new(&config.snapshot.dir)),
        }
    }

    /// Only the first `limit` molecules are used.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        if let SmilesSource::Table { options, .. } = &mut self.smiles {
            options.limit = limit;
        }
        self
    }

    pub fn with_layout(mut self, layout: EdgeTypeLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_filter(mut self, filter: impl GraphFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn with_transform(mut self, transform: impl GraphTransform + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Reuse and persist the collated blob under `dir`.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(SnapshotStore::new(dir.into()));
        self
    }

    pub fn build(self) -> Result<DrugSideEffectDataset, DatasetError> {
        let smiles = match self.smiles {
            SmilesSource::Table { path, options } => read_smiles_file(&path, &options)?,
            SmilesSource::List(mut list) => {
                list.truncate(self.limit);
                list
            }
        };

        let hooks = self.filter.is_some() || self.transform.is_some();
        let store = match self.snapshot {
            Some(_) if hooks => {
                warn!("filter/transform hooks set; blob snapshot disabled");
                None
            }
            other => other,
        };
        let digest = blob_digest(&smiles, self.layout);

        let cached = match &store {
            Some(store) => store.load(&digest)?,
            None => None,
        };
        let blob = match cached {
            Some(blob) => blob,
            None => {
                let blob = featurize_all(
                    &smiles,
                    self.layout,
                    self.filter.as_deref(),
                    self.transform.as_deref(),
                )?;
                if let Some(store) = &store {
                    store.save(&digest, &blob)?;
                }
                blob
            }
        };

        let auxiliary = match self.auxiliary {
            AuxiliarySource::Files {
                similarity,
                target,
                side_effects,
            } => AuxiliaryTensors::load(similarity, target, side_effects)?,
            AuxiliarySource::Tensors(tensors) => tensors,
        };
        auxiliary.validate(smiles.len())?;

        info!(
            molecules = smiles.len(),
            records = blob.len(),
            atoms = blob.total_atoms(),
            edges = blob.total_edges(),
            "dataset ready"
        );
        DrugSideEffectDataset::new(blob, auxiliary)
    }
}

/// Digest of everything that determines the collated blob.
pub fn blob_digest(smiles: &[String], layout: EdgeTypeLayout) -> String {
    let featurize = FeaturizeConfig {
        edge_type_layout: layout,
    };
    let width = ATOM_FEATURE_WIDTH.to_string();
    let version = SNAPSHOT_VERSION.to_string();
    combine_digests([
        smiles.content_hash().as_str(),
        featurize.content_hash().as_str(),
        width.as_str(),
        version.as_str(),
    ])
}

fn featurize_all(
    smiles: &[String],
    layout: EdgeTypeLayout,
    filter: Option<&dyn GraphFilter>,
    transform: Option<&dyn GraphTransform>,
) -> Result<DatasetBlob, DatasetError> {
    let mut graphs = Vec::with_capacity(smiles.len());
    for (row, s) in smiles.iter().enumerate() {
        let mut graph =
            smiles_to_graph(s, layout).map_err(|source| DatasetError::Molecule { row, source })?;
        graph.index = row;

        if let Some(filter) = filter {
            if !filter.keep(&graph) {
                debug!(row, "record filtered out");
                continue;
            }
        }
        if let Some(transform) = transform {
            graph = transform.apply(graph);
            graph.index = row;
        }
        graphs.push(graph);
    }

    info!(
        molecules = smiles.len(),
        kept = graphs.len(),
        layout = layout.as_str(),
        "featurized molecules"
    );
    DatasetBlob::collate(graphs, ATOM_FEATURE_WIDTH)
}
