pub mod adjacency;
pub mod element;
pub mod error;
pub mod features;
pub mod graph;
pub mod molecule;
pub mod sanitize;
pub mod smiles;

pub use error::ChemError;
pub use features::{atom_features, ATOM_FEATURE_WIDTH};
pub use graph::{molecule_to_graph, smiles_to_graph};
pub use molecule::{Atom, Bond, BondOrder, Hybridization, Molecule};
