use super::RingInfo;
use crate::element::Element;
use crate::molecule::{BondOrder, Molecule};
use std::collections::BTreeSet;

/// Hückel aromaticity over single rings and pairs of fused rings.
///
/// Every candidate atom contributes 0, 1 or 2 π electrons; a ring (or the
/// union of two rings sharing a bond) whose atoms are all candidates and
/// whose electron count is 4n+2 becomes aromatic.
pub fn perceive_aromaticity(mol: &mut Molecule, rings: &RingInfo) {
    for atom in mol.atoms_mut() {
        atom.is_aromatic = false;
    }
    if rings.rings.is_empty() {
        return;
    }

    let electrons: Vec<Option<u32>> = (0..mol.atom_count())
        .map(|i| pi_electrons(mol, rings, i))
        .collect();
    let is_huckel = |atoms: &BTreeSet<usize>| -> bool {
        let mut total = 0;
        for &a in atoms {
            match electrons[a] {
                Some(e) => total += e,
                None => return false,
            }
        }
        total % 4 == 2
    };

    let mut aromatic_bonds: BTreeSet<usize> = BTreeSet::new();
    let mut aromatic_ring = vec![false; rings.rings.len()];
    for (ri, ring) in rings.rings.iter().enumerate() {
        let atoms: BTreeSet<usize> = ring.iter().copied().collect();
        if is_huckel(&atoms) {
            aromatic_ring[ri] = true;
            aromatic_bonds.extend(rings.ring_bonds[ri].iter().copied());
        }
    }

    for i in 0..rings.rings.len() {
        for j in (i + 1)..rings.rings.len() {
            if aromatic_ring[i] && aromatic_ring[j] {
                continue;
            }
            let shares_bond = rings.ring_bonds[i]
                .iter()
                .any(|b| rings.ring_bonds[j].contains(b));
            if !shares_bond {
                continue;
            }
            let union: BTreeSet<usize> = rings.rings[i]
                .iter()
                .chain(rings.rings[j].iter())
                .copied()
                .collect();
            if is_huckel(&union) {
                aromatic_bonds.extend(rings.ring_bonds[i].iter().copied());
                aromatic_bonds.extend(rings.ring_bonds[j].iter().copied());
            }
        }
    }

    for bi in aromatic_bonds {
        let (begin, end) = {
            let bond = mol.bond(bi);
            (bond.begin, bond.end)
        };
        mol.set_bond_order(bi, BondOrder::Aromatic);
        let atoms = mol.atoms_mut();
        atoms[begin].is_aromatic = true;
        atoms[end].is_aromatic = true;
    }
}

/// π electrons an atom donates to a ring, or `None` when it cannot take
/// part in an aromatic system.
fn pi_electrons(mol: &Molecule, rings: &RingInfo, idx: usize) -> Option<u32> {
    if !rings.is_ring_atom(idx) {
        return None;
    }
    let atom = mol.atom(idx);
    if atom.element == Element::WILDCARD || atom.element.default_valences().is_none() {
        return None;
    }
    if mol.total_degree(idx) > 3 {
        return None;
    }

    let mut ring_double = false;
    let mut exocyclic_double: Option<Element> = None;
    for &(nbr, bi) in mol.neighbors(idx) {
        match mol.bond(bi).order {
            BondOrder::Triple => return None,
            BondOrder::Double if rings.is_ring_bond(bi) => ring_double = true,
            BondOrder::Double => exocyclic_double = Some(mol.atom(nbr).element),
            _ => {}
        }
    }
    if ring_double {
        return Some(1);
    }
    if let Some(partner) = exocyclic_double {
        return matches!(partner, Element::NITROGEN | Element::OXYGEN | Element::SULFUR)
            .then_some(0);
    }

    let free = atom.element.outer_electrons() as i32
        - atom.total_valence() as i32
        - atom.formal_charge;
    match free {
        f if f >= 2 => Some(2),
        1 => Some(1),
        _ => Some(0),
    }
}
