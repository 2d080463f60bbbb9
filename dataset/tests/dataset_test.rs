use dataset::{DatasetBuilder, DatasetError, DrugSideEffectDataset};
use ndarray::Array2;
use ndarray_npy::WriteNpyExt;
use sider_core::config::AppConfig;
use sider_core::error::{ErrorCode, SiderError};
use sider_core::model::EdgeTypeLayout;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use xz2::write::XzEncoder;

const TABLE: &str = "\
DB00945,CC(=O)Oc1ccccc1C(=O)O
DB01050,CC(C)Cc1ccc(cc1)C(C)C(=O)O
DB00316,CC(=O)Nc1ccc(O)cc1
DB00201,Cn1cnc2c1c(=O)n(C)c(=O)n2C
DB01174,[Na+].[Cl-]
";
const ROWS: usize = 5;

fn write_npy(path: &Path, matrix: &Array2<f64>) {
    let mut file = File::create(path).unwrap();
    matrix.write_npy(&mut file).unwrap();
}

fn write_npy_xz(path: &Path, matrix: &Array2<f32>) {
    let mut bytes = Vec::new();
    matrix.write_npy(&mut bytes).unwrap();
    let mut encoder = XzEncoder::new(File::create(path).unwrap(), 6);
    encoder.write_all(&bytes).unwrap();
    encoder.finish().unwrap();
}

/// Drug table plus the three matrices; row `r` of every matrix is filled
/// with values derived from `r`.
fn fixture(rows: usize) -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("drug_SMILES.csv"), TABLE).unwrap();
    write_npy(
        &dir.path().join("similarity.npy"),
        &Array2::from_shape_fn((rows, 4), |(r, c)| (r * 100 + c) as f64),
    );
    write_npy_xz(
        &dir.path().join("target.npy.xz"),
        &Array2::from_shape_fn((rows, 6), |(r, _)| r as f32),
    );
    write_npy(
        &dir.path().join("side_effects.npy"),
        &Array2::from_shape_fn((rows, 8), |(r, c)| ((r + c) % 2) as f64),
    );
    dir
}

fn write_config(dir: &Path, extra: &str) {
    let config = format!(
        r#"
[data]
smiles_table = "{root}/drug_SMILES.csv"
similarity = "{root}/similarity.npy"
target_profile = "{root}/target.npy.xz"
side_effects = "{root}/side_effects.npy"
{extra}
"#,
        root = dir.display(),
        extra = extra,
    );
    std::fs::write(dir.join("default.toml"), config).unwrap();
}

fn build(dir: &Path, extra: &str) -> Result<DrugSideEffectDataset, DatasetError> {
    write_config(dir, extra);
    let config = AppConfig::load_from(dir).unwrap();
    DatasetBuilder::from_config(&config).build()
}

#[test]
fn test_build_from_files() {
    let dir = fixture(ROWS);
    let mut ds = build(dir.path(), "").unwrap();

    assert_eq!(ds.len(), ROWS);
    assert!(!ds.is_empty());
    assert_eq!(ds.len_features(), (109, 4, 6));

    for i in 0..ROWS {
        let (index, (graph, w, z), y) = ds.get(i).unwrap().into_parts();
        assert_eq!(index, i);
        assert_eq!(graph.index, i);
        assert_eq!(w, vec![(i * 100) as f32, (i * 100 + 1) as f32, (i * 100 + 2) as f32, (i * 100 + 3) as f32]);
        assert_eq!(z, vec![i as f32; 6]);
        assert_eq!(y.len(), 8);
        assert_eq!(y[0], (i % 2) as f32);
        assert_eq!(graph.node_features.len(), graph.atom_count * 109);
        assert_eq!(graph.edge_index[0].len(), graph.edge_type.len());
    }
}

#[test]
fn test_retrieved_graph_matches_direct_featurization() {
    let dir = fixture(ROWS);
    let mut ds = build(dir.path(), "").unwrap();

    let direct = chem::smiles_to_graph("CC(=O)Nc1ccc(O)cc1", EdgeTypeLayout::Aligned).unwrap();
    let sample = ds.get(2).unwrap();
    assert_eq!(sample.graph.node_features, direct.node_features);
    assert_eq!(sample.graph.edge_index, direct.edge_index);
    assert_eq!(sample.graph.edge_type, direct.edge_type);
}

#[test]
fn test_zero_bond_record_round_trips() {
    let dir = fixture(ROWS);
    let mut ds = build(dir.path(), "").unwrap();

    let salt = ds.get(4).unwrap().graph;
    assert_eq!(salt.atom_count, 2);
    assert_eq!(salt.edge_index, [Vec::<i64>::new(), Vec::new()]);
    assert!(salt.edge_type.is_empty());
}

#[test]
fn test_repeated_layout_from_config() {
    let dir = fixture(ROWS);
    let mut ds = build(dir.path(), "\n[featurize]\nedge_type_layout = \"repeated\"\n").unwrap();

    let graph = ds.get(2).unwrap().graph;
    assert!(graph.edge_type.iter().all(|t| t.fract() == 0.0));
    let half = graph.edge_type.len() / 2;
    assert_eq!(graph.edge_type[..half], graph.edge_type[half..]);
}

#[test]
fn test_limit_from_config() {
    let dir = fixture(3);
    let ds = build(dir.path(), "max_molecules = 3").unwrap();
    assert_eq!(ds.len(), 3);
}

#[test]
fn test_auxiliary_rows_must_match_molecules_read() {
    let dir = fixture(ROWS + 1);
    let err = build(dir.path(), "").unwrap_err();
    assert!(matches!(
        err,
        DatasetError::AuxiliaryShapeMismatch {
            name: "similarity",
            expected: 5,
            found: 6
        }
    ));
    assert_eq!(err.error_code(), ErrorCode::FailedPrecondition);
}

#[test]
fn test_repeated_get_returns_independent_copies() {
    let dir = fixture(ROWS);
    let mut ds = build(dir.path(), "").unwrap();

    let mut first = ds.get(0).unwrap();
    first.graph.edge_index[0].clear();
    first.similarity[0] = -1.0;

    let second = ds.get(0).unwrap();
    assert!(!second.graph.edge_index[0].is_empty());
    assert_eq!(second.similarity[0], 0.0);

    let stats = ds.cache_stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
}

#[test]
fn test_out_of_range_index_is_rejected() {
    let dir = fixture(ROWS);
    let mut ds = build(dir.path(), "").unwrap();
    let err = ds.get(ROWS).unwrap_err();
    assert!(matches!(err, DatasetError::IndexOutOfBounds { index: 5, len: 5 }));
    assert_eq!(err.error_code(), ErrorCode::OutOfRange);
}

#[test]
fn test_invalid_molecule_aborts_build() {
    let dir = fixture(ROWS);
    std::fs::write(
        dir.path().join("drug_SMILES.csv"),
        TABLE.replace("[Na+].[Cl-]", "C1CC"),
    )
    .unwrap();
    let err = build(dir.path(), "").unwrap_err();
    assert!(matches!(err, DatasetError::Molecule { row: 4, .. }));
    assert_eq!(err.error_code(), ErrorCode::InvalidArgument);
}

#[test]
fn test_missing_matrix_is_not_found() {
    let dir = fixture(ROWS);
    std::fs::remove_file(dir.path().join("side_effects.npy")).unwrap();
    let err = build(dir.path(), "").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::NotFound);
}
