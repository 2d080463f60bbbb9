use crate::element::Element;
use crate::molecule::{Bond, BondOrder, Molecule};

/// Removes plain `[H]` atoms hanging off a heavy atom and adds them to that
/// atom's explicit hydrogen count. Charged, isotopic, bridging or isolated
/// hydrogens stay in the graph.
pub fn fold_explicit_hydrogens(mol: Molecule) -> Molecule {
    let removable: Vec<bool> = (0..mol.atom_count())
        .map(|i| is_removable_hydrogen(&mol, i))
        .collect();
    if !removable.iter().any(|&r| r) {
        return mol;
    }

    let mut counts = vec![0u32; mol.atom_count()];
    for i in (0..removable.len()).filter(|&i| removable[i]) {
        let (heavy, _) = mol.neighbors(i)[0];
        counts[heavy] += 1;
    }

    let (atoms, bonds) = mol.into_parts();
    let mut remap = vec![usize::MAX; atoms.len()];
    let mut kept = Vec::with_capacity(atoms.len());
    for (i, mut atom) in atoms.into_iter().enumerate() {
        if removable[i] {
            continue;
        }
        atom.explicit_hydrogens += counts[i];
        remap[i] = kept.len();
        kept.push(atom);
    }

    let bonds = bonds
        .into_iter()
        .filter(|b| !removable[b.begin] && !removable[b.end])
        .map(|b| Bond::new(remap[b.begin], remap[b.end], b.order))
        .collect();

    Molecule::new(kept, bonds)
}

fn is_removable_hydrogen(mol: &Molecule, idx: usize) -> bool {
    let atom = mol.atom(idx);
    if atom.element != Element::HYDROGEN
        || atom.formal_charge != 0
        || atom.isotope.is_some()
        || atom.explicit_hydrogens != 0
        || mol.degree(idx) != 1
    {
        return false;
    }
    let (nbr, bond) = mol.neighbors(idx)[0];
    mol.bond(bond).order == BondOrder::Single && mol.atom(nbr).element != Element::HYDROGEN
}
