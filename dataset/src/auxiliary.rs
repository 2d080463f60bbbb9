use crate::error::DatasetError;
use ndarray::Array2;
use ndarray_npy::{ReadNpyError, ReadNpyExt};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::debug;
use xz2::read::XzDecoder;

/// Per-drug matrices paired with each graph. Row `i` of every matrix
/// belongs to the drug on row `i` of the drug table.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxiliaryTensors {
    pub similarity: Array2<f32>,
    pub target: Array2<f32>,
    pub side_effects: Array2<f32>,
}

impl AuxiliaryTensors {
    pub fn new(similarity: Array2<f32>, target: Array2<f32>, side_effects: Array2<f32>) -> Self {
        Self {
            similarity,
            target,
            side_effects,
        }
    }

    pub fn load(
        similarity: impl AsRef<Path>,
        target: impl AsRef<Path>,
        side_effects: impl AsRef<Path>,
    ) -> Result<Self, DatasetError> {
        Ok(Self {
            similarity: load_matrix(similarity)?,
            target: load_matrix(target)?,
            side_effects: load_matrix(side_effects)?,
        })
    }

    /// Every matrix must have exactly `rows` rows.
    pub fn validate(&self, rows: usize) -> Result<(), DatasetError> {
        for (name, matrix) in self.named() {
            if matrix.nrows() != rows {
                return Err(DatasetError::AuxiliaryShapeMismatch {
                    name,
                    expected: rows,
                    found: matrix.nrows(),
                });
            }
        }
        Ok(())
    }

    fn named(&self) -> [(&'static str, &Array2<f32>); 3] {
        [
            ("similarity", &self.similarity),
            ("target", &self.target),
            ("side_effects", &self.side_effects),
        ]
    }

    pub fn similarity_row(&self, row: usize) -> Vec<f32> {
        self.similarity.row(row).to_vec()
    }

    pub fn target_row(&self, row: usize) -> Vec<f32> {
        self.target.row(row).to_vec()
    }

    pub fn side_effect_row(&self, row: usize) -> Vec<f32> {
        self.side_effects.row(row).to_vec()
    }
}

/// Loads a 2-D `.npy` matrix as `f32`. Paths ending in `.xz` are
/// decompressed first. `f64` and `i64` payloads are converted.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Array2<f32>, DatasetError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: label.clone(),
        source,
    })?;

    let mut bytes = Vec::new();
    let compressed = path.extension().is_some_and(|ext| ext == "xz");
    let read = if compressed {
        XzDecoder::new(BufReader::new(file)).read_to_end(&mut bytes)
    } else {
        BufReader::new(file).read_to_end(&mut bytes)
    };
    read.map_err(|source| DatasetError::Open {
        path: label.clone(),
        source,
    })?;

    let matrix = decode_matrix(&bytes).map_err(|source| DatasetError::Npy {
        path: label.clone(),
        source,
    })?;
    debug!(
        path = %label,
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        compressed,
        "loaded matrix"
    );
    Ok(matrix)
}

/// Decodes an in-memory `.npy` image, trying `f32`, then `f64`, then `i64`.
/// The first error is reported when no element type matches.
pub fn decode_matrix(bytes: &[u8]) -> Result<Array2<f32>, ReadNpyError> {
    let first = match Array2::<f32>::read_npy(Cursor::new(bytes)) {
        Ok(matrix) => return Ok(matrix),
        Err(e) => e,
    };
    if let Ok(matrix) = Array2::<f64>::read_npy(Cursor::new(bytes)) {
        return Ok(matrix.mapv(|v| v as f32));
    }
    if let Ok(matrix) = Array2::<i64>::read_npy(Cursor::new(bytes)) {
        return Ok(matrix.mapv(|v| v as f32));
    }
    Err(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ndarray_npy::WriteNpyExt;
    use std::io::Write;
    use tempfile::tempdir;
    use xz2::write::XzEncoder;

    fn npy_bytes<A: WriteNpyExt>(array: &A) -> Vec<u8> {
        let mut out = Vec::new();
        array.write_npy(&mut out).unwrap();
        out
    }

    #[test]
    fn test_decode_accepts_f32_f64_and_i64() {
        let f32s = array![[1.0f32, 2.0], [3.0, 4.0]];
        assert_eq!(decode_matrix(&npy_bytes(&f32s)).unwrap(), f32s);

        let f64s = array![[0.5f64, 1.5]];
        assert_eq!(decode_matrix(&npy_bytes(&f64s)).unwrap(), array![[0.5f32, 1.5]]);

        let ints = array![[0i64, 1, 1]];
        assert_eq!(decode_matrix(&npy_bytes(&ints)).unwrap(), array![[0.0f32, 1.0, 1.0]]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_matrix(b"not a numpy file").is_err());
    }

    #[test]
    fn test_load_xz_compressed_matrix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target.npy.xz");
        let matrix = array![[1.0f32, 0.0, 1.0], [0.0, 1.0, 0.0]];

        let mut encoder = XzEncoder::new(File::create(&path).unwrap(), 6);
        encoder.write_all(&npy_bytes(&matrix)).unwrap();
        encoder.finish().unwrap();

        assert_eq!(load_matrix(&path).unwrap(), matrix);
    }

    #[test]
    fn test_validate_names_the_short_matrix() {
        let aux = AuxiliaryTensors::new(
            Array2::zeros((3, 2)),
            Array2::zeros((3, 4)),
            Array2::zeros((2, 5)),
        );
        assert!(aux.validate(3).is_err());
        match aux.validate(3).unwrap_err() {
            DatasetError::AuxiliaryShapeMismatch {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "side_effects");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(aux.target_row(1).len(), 4);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = load_matrix("/nonexistent/sim.npy").unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
