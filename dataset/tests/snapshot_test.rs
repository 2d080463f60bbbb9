use dataset::builder::blob_digest;
use dataset::snapshot::{SnapshotError, SnapshotStore};
use dataset::{AuxiliaryTensors, DatasetBlob, DatasetBuilder, DatasetError};
use ndarray::Array2;
use sider_core::error::{ErrorCode, SiderError};
use sider_core::model::{EdgeTypeLayout, MoleculeGraph};
use tempfile::tempdir;

fn smiles() -> Vec<String> {
    vec!["CCO".to_string(), "c1ccncc1".to_string()]
}

fn aux() -> AuxiliaryTensors {
    AuxiliaryTensors::new(
        Array2::zeros((2, 2)),
        Array2::zeros((2, 3)),
        Array2::ones((2, 4)),
    )
}

#[test]
fn test_first_build_writes_snapshot() {
    let dir = tempdir().unwrap();
    let mut ds = DatasetBuilder::new(smiles(), aux())
        .with_snapshot_dir(dir.path())
        .build()
        .unwrap();

    let store = SnapshotStore::new(dir.path());
    let digest = blob_digest(&smiles(), EdgeTypeLayout::Aligned);
    assert!(store.path_for(&digest).exists());

    let saved = store.load(&digest).unwrap().unwrap();
    assert_eq!(&saved, ds.blob());
    assert_eq!(ds.get(1).unwrap().graph.atom_count, 6);
}

#[test]
fn test_matching_snapshot_is_reused() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let digest = blob_digest(&smiles(), EdgeTypeLayout::Aligned);

    // A blob that featurization could never produce for these molecules.
    let marker = (0..2).map(|i| {
        let mut g = MoleculeGraph::new(i, 1, chem::ATOM_FEATURE_WIDTH);
        g.node_features = vec![7.0; chem::ATOM_FEATURE_WIDTH];
        g
    });
    let planted = DatasetBlob::collate(marker, chem::ATOM_FEATURE_WIDTH).unwrap();
    store.save(&digest, &planted).unwrap();

    let mut ds = DatasetBuilder::new(smiles(), aux())
        .with_snapshot_dir(dir.path())
        .build()
        .unwrap();
    let graph = ds.get(0).unwrap().graph;
    assert_eq!(graph.atom_count, 1);
    assert!(graph.node_features.iter().all(|&v| v == 7.0));
}

#[test]
fn test_layout_change_misses_snapshot() {
    let dir = tempdir().unwrap();
    DatasetBuilder::new(smiles(), aux())
        .with_snapshot_dir(dir.path())
        .build()
        .unwrap();
    let mut repeated = DatasetBuilder::new(smiles(), aux())
        .with_layout(EdgeTypeLayout::Repeated)
        .with_snapshot_dir(dir.path())
        .build()
        .unwrap();

    let pyridine = repeated.get(1).unwrap().graph;
    assert!(pyridine.edge_type.iter().all(|&t| t == 1.0));

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 2);
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    let dir = tempdir().unwrap();
    DatasetBuilder::new(smiles(), aux())
        .with_snapshot_dir(dir.path())
        .build()
        .unwrap();

    let path = SnapshotStore::new(dir.path()).path_for(&blob_digest(&smiles(), EdgeTypeLayout::Aligned));
    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x5A;
    std::fs::write(&path, bytes).unwrap();

    let err = DatasetBuilder::new(smiles(), aux())
        .with_snapshot_dir(dir.path())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Snapshot(SnapshotError::CrcMismatch { .. })
    ));
    assert_eq!(err.error_code(), ErrorCode::DataLoss);
}

#[test]
fn test_hooks_skip_snapshot() {
    let dir = tempdir().unwrap();
    let ds = DatasetBuilder::new(smiles(), aux())
        .with_snapshot_dir(dir.path())
        .with_filter(|g: &MoleculeGraph| g.atom_count > 3)
        .build()
        .unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0), 0);
}
