use crate::sanitize::SanitizeError;
use crate::smiles::SmilesError;
use sider_core::error::{ErrorCode, SiderError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidReason {
    #[error(transparent)]
    Parse(#[from] SmilesError),
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChemError {
    #[error("Invalid molecule string {smiles:?}: {reason}")]
    InvalidMoleculeString {
        smiles: String,
        #[source]
        reason: InvalidReason,
    },
    #[error("Unsupported atom property: {property} = {value} on atom {atom}")]
    UnsupportedAtomProperty {
        atom: usize,
        property: &'static str,
        value: String,
    },
}

impl ChemError {
    pub(crate) fn invalid(smiles: &str, reason: impl Into<InvalidReason>) -> Self {
        ChemError::InvalidMoleculeString {
            smiles: smiles.to_string(),
            reason: reason.into(),
        }
    }
}

impl SiderError for ChemError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ChemError::InvalidMoleculeString { .. } => ErrorCode::InvalidArgument,
            ChemError::UnsupportedAtomProperty { .. } => ErrorCode::InvalidArgument,
        }
    }
}
