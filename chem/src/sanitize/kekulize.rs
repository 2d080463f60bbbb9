use super::SanitizeError;
use crate::molecule::{BondOrder, Molecule};

/// Replaces aromatic bonds with an alternating single/double assignment.
///
/// Atoms on aromatic bonds that still have room for one more bond are
/// paired over aromatic bonds by a backtracking perfect matching; matched
/// bonds become double, the rest single.
pub fn kekulize(mol: &mut Molecule) -> Result<(), SanitizeError> {
    let aromatic_bonds: Vec<usize> = (0..mol.bond_count())
        .filter(|&b| mol.bond(b).order == BondOrder::Aromatic)
        .collect();
    if aromatic_bonds.is_empty() {
        return Ok(());
    }

    let n = mol.atom_count();
    let mut in_system = vec![false; n];
    for &b in &aromatic_bonds {
        in_system[mol.bond(b).begin] = true;
        in_system[mol.bond(b).end] = true;
    }

    let needs: Vec<bool> = (0..n)
        .map(|i| in_system[i] && needs_double_bond(mol, i))
        .collect();
    let order: Vec<usize> = (0..n).filter(|&i| needs[i]).collect();

    let mut matched: Vec<Option<usize>> = vec![None; n];
    if !match_from(mol, &order, 0, &needs, &mut matched) {
        let atom = order
            .iter()
            .copied()
            .find(|&i| matched[i].is_none())
            .unwrap_or(order[0]);
        return Err(SanitizeError::Kekulize { atom });
    }

    for b in aromatic_bonds {
        let bond = mol.bond(b);
        let double = matched[bond.begin] == Some(b);
        let new_order = if double {
            BondOrder::Double
        } else {
            BondOrder::Single
        };
        mol.set_bond_order(b, new_order);
    }
    Ok(())
}

/// Whether the atom's smallest allowed valence leaves room for one extra
/// bond once aromatic bonds are counted as single.
fn needs_double_bond(mol: &Molecule, idx: usize) -> bool {
    let atom = mol.atom(idx);
    let Some(valences) = atom.element.valences_with_charge(atom.formal_charge) else {
        return false;
    };
    let current = mol.bonded_valence(idx);
    match valences.iter().copied().find(|&v| v >= current) {
        Some(target) => current + 1 <= target,
        None => false,
    }
}

fn match_from(
    mol: &Molecule,
    order: &[usize],
    start: usize,
    needs: &[bool],
    matched: &mut [Option<usize>],
) -> bool {
    let Some(pos) = (start..order.len()).find(|&k| matched[order[k]].is_none()) else {
        return true;
    };
    let atom = order[pos];

    for &(nbr, bond) in mol.neighbors(atom) {
        if mol.bond(bond).order != BondOrder::Aromatic || !needs[nbr] || matched[nbr].is_some() {
            continue;
        }
        matched[atom] = Some(bond);
        matched[nbr] = Some(bond);
        if match_from(mol, order, pos + 1, needs, matched) {
            return true;
        }
        matched[atom] = None;
        matched[nbr] = None;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn double_count(mol: &Molecule) -> usize {
        mol.bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count()
    }

    #[test]
    fn test_benzene_gets_three_alternating_doubles() {
        let mut mol = parse_smiles("c1ccccc1").unwrap();
        kekulize(&mut mol).unwrap();
        assert_eq!(double_count(&mol), 3);
        for atom in 0..6 {
            let doubles = mol
                .neighbors(atom)
                .iter()
                .filter(|&&(_, b)| mol.bond(b).order == BondOrder::Double)
                .count();
            assert_eq!(doubles, 1);
        }
    }

    #[test]
    fn test_pyrrole_nitrogen_takes_no_double_bond() {
        let mut mol = parse_smiles("c1cc[nH]c1").unwrap();
        kekulize(&mut mol).unwrap();
        assert_eq!(double_count(&mol), 2);
        assert!(mol
            .neighbors(3)
            .iter()
            .all(|&(_, b)| mol.bond(b).order == BondOrder::Single));
    }

    #[test]
    fn test_fused_rings_kekulize() {
        let mut mol = parse_smiles("c1ccc2ccccc2c1").unwrap();
        kekulize(&mut mol).unwrap();
        assert_eq!(double_count(&mol), 5);
    }

    #[test]
    fn test_ambiguous_pyrrole_fails() {
        let mut mol = parse_smiles("c1ccnc1").unwrap();
        assert!(matches!(
            kekulize(&mut mol),
            Err(SanitizeError::Kekulize { .. })
        ));
    }
}
