//! One-hot atom feature encoding.
//!
//! Every atom becomes a fixed-width `f32` row made of one-hot blocks followed
//! by an aromaticity flag. Symbol, hydrogen count and both valences are
//! clamped into a trailing "unknown" slot; degree, formal charge and
//! hybridization must fall inside their domain or the molecule is rejected.

use crate::error::ChemError;
use crate::molecule::{Hybridization, Molecule};

/// Element symbols with their own slot. Anything else lands in `Unknown`.
pub const ELEMENT_SYMBOLS: [&str; 47] = [
    "C", "N", "O", "S", "F", "Si", "P", "Cl", "Br", "Mg", "Na", "Ca", "Fe", "As", "Al", "I", "B",
    "V", "K", "Tl", "Yb", "Sb", "Sn", "Ag", "Pd", "Co", "Se", "Ti", "Zn", "H", "Li", "Ge", "Cu",
    "Au", "Ni", "Cd", "In", "Mn", "Zr", "Cr", "Pt", "Hg", "Pb", "Sm", "Tc", "Gd", "Unknown",
];

const SMALL_COUNTS: [u32; 11] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
const FORMAL_CHARGES: [i32; 9] = [-4, -3, -2, -1, 0, 1, 2, 3, 4];
const HYBRIDIZATIONS: [Hybridization; 8] = [
    Hybridization::S,
    Hybridization::Sp,
    Hybridization::Sp2,
    Hybridization::Sp3,
    Hybridization::Sp3d,
    Hybridization::Sp3d2,
    Hybridization::Unspecified,
    Hybridization::Other,
];

/// Name and width of each block, in encoding order.
pub const FEATURE_BLOCKS: [(&str, usize); 8] = [
    ("symbol", ELEMENT_SYMBOLS.len()),
    ("degree", SMALL_COUNTS.len()),
    ("total_hydrogens", SMALL_COUNTS.len()),
    ("explicit_valence", SMALL_COUNTS.len()),
    ("implicit_valence", SMALL_COUNTS.len()),
    ("formal_charge", FORMAL_CHARGES.len()),
    ("hybridization", HYBRIDIZATIONS.len()),
    ("aromatic", 1),
];

pub const ATOM_FEATURE_WIDTH: usize = 47 + 4 * 11 + 9 + 8 + 1;

/// Appends the one-hot encoding of `value` over `domain`; `None` when the
/// value is not in the domain.
fn one_of_k<T: PartialEq>(out: &mut Vec<f32>, value: &T, domain: &[T]) -> Option<()> {
    let hit = domain.iter().position(|d| d == value)?;
    out.extend(domain.iter().enumerate().map(|(i, _)| f32::from(u8::from(i == hit))));
    Some(())
}

/// Like [`one_of_k`], but out-of-domain values set the last slot.
fn one_of_k_unk<T: PartialEq>(out: &mut Vec<f32>, value: &T, domain: &[T]) {
    let hit = domain
        .iter()
        .position(|d| d == value)
        .unwrap_or(domain.len() - 1);
    out.extend(domain.iter().enumerate().map(|(i, _)| f32::from(u8::from(i == hit))));
}

fn unsupported(atom: usize, property: &'static str, value: impl ToString) -> ChemError {
    ChemError::UnsupportedAtomProperty {
        atom,
        property,
        value: value.to_string(),
    }
}

/// Appends the feature row of atom `idx` to `out`.
///
/// On error nothing useful is left in `out`; callers discard the whole
/// molecule.
pub fn encode_atom(mol: &Molecule, idx: usize, out: &mut Vec<f32>) -> Result<(), ChemError> {
    let atom = mol.atom(idx);

    one_of_k_unk(out, &atom.symbol(), &ELEMENT_SYMBOLS);

    let degree = mol.degree(idx) as u32;
    one_of_k(out, &degree, &SMALL_COUNTS).ok_or_else(|| unsupported(idx, "degree", degree))?;

    one_of_k_unk(out, &atom.total_hydrogens(), &SMALL_COUNTS);
    one_of_k_unk(out, &atom.explicit_valence, &SMALL_COUNTS);
    one_of_k_unk(out, &atom.implicit_valence(), &SMALL_COUNTS);

    one_of_k(out, &atom.formal_charge, &FORMAL_CHARGES)
        .ok_or_else(|| unsupported(idx, "formal_charge", atom.formal_charge))?;
    one_of_k(out, &atom.hybridization, &HYBRIDIZATIONS)
        .ok_or_else(|| unsupported(idx, "hybridization", atom.hybridization))?;

    out.push(f32::from(u8::from(atom.is_aromatic)));
    Ok(())
}

/// Feature vector of a single atom.
pub fn atom_features(mol: &Molecule, idx: usize) -> Result<Vec<f32>, ChemError> {
    let mut row = Vec::with_capacity(ATOM_FEATURE_WIDTH);
    encode_atom(mol, idx, &mut row)?;
    Ok(row)
}
