use super::SanitizeError;
use crate::molecule::Molecule;

/// Computes explicit valence for every atom and fills in implicit hydrogens
/// (organic-subset atoms) or radical electrons (bracket atoms) up to the
/// smallest allowed valence.
pub fn assign_valences(mol: &mut Molecule) -> Result<(), SanitizeError> {
    let explicit: Vec<u32> = (0..mol.atom_count())
        .map(|i| mol.bonded_valence(i))
        .collect();

    for (idx, atom) in mol.atoms_mut().iter_mut().enumerate() {
        let ev = explicit[idx];
        atom.explicit_valence = ev;
        atom.implicit_hydrogens = 0;
        atom.radical_electrons = 0;

        let Some(allowed) = atom.element.valences_with_charge(atom.formal_charge) else {
            continue;
        };
        let max = allowed.last().copied().unwrap_or(0);
        if ev > max {
            return Err(SanitizeError::Valence {
                atom: idx,
                symbol: atom.element.symbol(),
                valence: ev,
            });
        }
        let target = allowed.iter().copied().find(|&v| v >= ev).unwrap_or(ev);
        if atom.no_implicit {
            atom.radical_electrons = target - ev;
        } else {
            atom.implicit_hydrogens = target - ev;
        }
    }
    Ok(())
}
