pub mod auxiliary;
pub mod blob;
pub mod builder;
pub mod dataset;
pub mod error;
pub mod snapshot;
pub mod table;

pub use auxiliary::AuxiliaryTensors;
pub use blob::DatasetBlob;
pub use builder::{DatasetBuilder, GraphFilter, GraphTransform};
pub use dataset::{CacheStats, DrugSideEffectDataset, Sample};
pub use error::DatasetError;
