use crate::element::Element;
use crate::molecule::{BondOrder, Hybridization, Molecule};

/// Assigns hybridization from the steric number (neighbours, hydrogens,
/// lone pairs and radicals). Four-coordinate atoms in a conjugated system
/// are flattened to SP2.
pub fn assign_hybridization(mol: &mut Molecule) {
    let states: Vec<Hybridization> = (0..mol.atom_count())
        .map(|i| hybridization_of(mol, i))
        .collect();
    for (atom, state) in mol.atoms_mut().iter_mut().zip(states) {
        atom.hybridization = state;
    }
}

fn hybridization_of(mol: &Molecule, idx: usize) -> Hybridization {
    if mol.atom(idx).element == Element::WILDCARD {
        return Hybridization::Unspecified;
    }
    match steric_number(mol, idx) {
        0 | 1 => Hybridization::S,
        2 => Hybridization::Sp,
        3 => Hybridization::Sp2,
        4 if is_conjugated(mol, idx) => Hybridization::Sp2,
        4 => Hybridization::Sp3,
        5 => Hybridization::Sp3d,
        6 => Hybridization::Sp3d2,
        _ => Hybridization::Unspecified,
    }
}

fn steric_number(mol: &Molecule, idx: usize) -> i32 {
    let atom = mol.atom(idx);
    let degree = mol.total_degree(idx) as i32;
    if atom.element == Element::HYDROGEN || atom.element.default_valences().is_none() {
        return degree;
    }

    let outer = atom.element.outer_electrons() as i32;
    let valence = atom.total_valence() as i32;
    let charge = atom.formal_charge;
    let radicals = atom.radical_electrons as i32;
    let free = outer - (valence + charge);
    if valence + outer - charge < 8 {
        degree + (free - radicals) / 2 + radicals
    } else {
        degree + free / 2
    }
}

fn free_electrons(mol: &Molecule, idx: usize) -> i32 {
    let atom = mol.atom(idx);
    atom.element.outer_electrons() as i32 - (atom.total_valence() as i32 + atom.formal_charge)
}

fn is_unsaturated(mol: &Molecule, idx: usize) -> bool {
    mol.neighbors(idx)
        .iter()
        .any(|&(_, bi)| mol.bond(bi).order != BondOrder::Single)
}

fn is_donor(mol: &Molecule, idx: usize) -> bool {
    mol.atom(idx).element.is_chalcogen_or_pnictogen() && free_electrons(mol, idx) >= 2
}

fn is_conjugated(mol: &Molecule, idx: usize) -> bool {
    if mol.atom(idx).is_aromatic {
        return true;
    }
    let unsaturated = is_unsaturated(mol, idx);
    let donor = is_donor(mol, idx);
    mol.neighbors(idx).iter().any(|&(nbr, bi)| {
        let order = mol.bond(bi).order;
        if order == BondOrder::Aromatic {
            return true;
        }
        if order != BondOrder::Single {
            return false;
        }
        let nbr_unsaturated = is_unsaturated(mol, nbr);
        (unsaturated && (nbr_unsaturated || is_donor(mol, nbr))) || (donor && nbr_unsaturated)
    })
}
