use crate::snapshot::SnapshotError;
use chem::ChemError;
use ndarray_npy::ReadNpyError;
use sider_core::error::{ErrorCode, SiderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Molecule on row {row}: {source}")]
    Molecule {
        row: usize,
        #[source]
        source: ChemError,
    },
    #[error("Can't read {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {row} has no column {column}")]
    MissingColumn { row: usize, column: usize },
    #[error("Can't decode matrix {path}: {source}")]
    Npy {
        path: String,
        #[source]
        source: ReadNpyError,
    },
    #[error("Auxiliary matrix {name} has {found} rows, expected {expected}")]
    AuxiliaryShapeMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Graph for row {index} has feature width {found}, expected {expected}")]
    FeatureWidthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Graph for row {index} is malformed: {reason}")]
    MalformedGraph { index: usize, reason: String },
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl DatasetError {
    /// The featurization error, if this error came from a molecule.
    pub fn chem(&self) -> Option<&ChemError> {
        match self {
            DatasetError::Molecule { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl SiderError for DatasetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            DatasetError::Molecule { source, .. } => source.error_code(),
            DatasetError::Open { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorCode::NotFound
            }
            DatasetError::Open { .. } => ErrorCode::Internal,
            DatasetError::Csv(_) => ErrorCode::InvalidArgument,
            DatasetError::MissingColumn { .. } => ErrorCode::InvalidArgument,
            DatasetError::Npy { .. } => ErrorCode::InvalidArgument,
            DatasetError::AuxiliaryShapeMismatch { .. } => ErrorCode::FailedPrecondition,
            DatasetError::IndexOutOfBounds { .. } => ErrorCode::OutOfRange,
            DatasetError::FeatureWidthMismatch { .. } => ErrorCode::FailedPrecondition,
            DatasetError::MalformedGraph { .. } => ErrorCode::FailedPrecondition,
            DatasetError::Snapshot(e) => e.error_code(),
        }
    }
}
