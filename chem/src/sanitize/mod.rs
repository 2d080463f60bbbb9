//! Chemistry perception run after parsing: explicit hydrogen folding,
//! kekulization, valence and implicit hydrogens, ring detection, aromaticity
//! and hybridization.

pub mod aromaticity;
pub mod hybridization;
pub mod hydrogens;
pub mod kekulize;
pub mod rings;
pub mod valence;

pub use rings::RingInfo;

use crate::molecule::Molecule;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("can't kekulize aromatic system containing atom {atom}")]
    Kekulize { atom: usize },
    #[error("explicit valence {valence} for atom {atom} ({symbol}) is greater than permitted")]
    Valence {
        atom: usize,
        symbol: &'static str,
        valence: u32,
    },
}

/// Runs every perception step in order and returns the finished molecule.
pub fn sanitize(mol: Molecule) -> Result<Molecule, SanitizeError> {
    let mut mol = hydrogens::fold_explicit_hydrogens(mol);
    kekulize::kekulize(&mut mol)?;
    valence::assign_valences(&mut mol)?;
    let rings = rings::find_rings(&mol);
    aromaticity::perceive_aromaticity(&mut mol, &rings);
    hybridization::assign_hybridization(&mut mol);
    trace!(
        atoms = mol.atom_count(),
        bonds = mol.bond_count(),
        rings = rings.rings.len(),
        "sanitized molecule"
    );
    Ok(mol)
}
