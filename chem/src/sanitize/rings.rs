use crate::molecule::Molecule;
use std::collections::{HashSet, VecDeque};

/// Smallest rings through every ring bond.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingInfo {
    /// Atom indices of each ring, in path order.
    pub rings: Vec<Vec<usize>>,
    /// Bond indices of each ring, parallel to `rings`.
    pub ring_bonds: Vec<Vec<usize>>,
    pub bond_in_ring: Vec<bool>,
    pub atom_in_ring: Vec<bool>,
}

impl RingInfo {
    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn is_ring_bond(&self, bond: usize) -> bool {
        self.bond_in_ring.get(bond).copied().unwrap_or(false)
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.atom_in_ring.get(atom).copied().unwrap_or(false)
    }
}

/// For each bond, finds the shortest cycle containing it and keeps the
/// distinct ones.
pub fn find_rings(mol: &Molecule) -> RingInfo {
    let mut info = RingInfo {
        bond_in_ring: vec![false; mol.bond_count()],
        atom_in_ring: vec![false; mol.atom_count()],
        ..Default::default()
    };
    let mut seen: HashSet<Vec<usize>> = HashSet::new();

    for (bi, bond) in mol.bonds().iter().enumerate() {
        let Some((atoms, mut bonds)) = shortest_path(mol, bond.begin, bond.end, bi) else {
            continue;
        };
        bonds.push(bi);

        let mut key = bonds.clone();
        key.sort_unstable();
        if !seen.insert(key) {
            continue;
        }
        for &b in &bonds {
            info.bond_in_ring[b] = true;
        }
        for &a in &atoms {
            info.atom_in_ring[a] = true;
        }
        info.rings.push(atoms);
        info.ring_bonds.push(bonds);
    }
    info
}

/// Breadth-first path from `from` to `to` that never crosses `skip`.
/// Returns the atoms along the path and the bonds between them.
fn shortest_path(
    mol: &Molecule,
    from: usize,
    to: usize,
    skip: usize,
) -> Option<(Vec<usize>, Vec<usize>)> {
    let mut parent: Vec<Option<(usize, usize)>> = vec![None; mol.atom_count()];
    let mut visited = vec![false; mol.atom_count()];
    let mut queue = VecDeque::from([from]);
    visited[from] = true;

    while let Some(atom) = queue.pop_front() {
        if atom == to {
            break;
        }
        for &(nbr, bond) in mol.neighbors(atom) {
            if bond == skip || visited[nbr] {
                continue;
            }
            visited[nbr] = true;
            parent[nbr] = Some((atom, bond));
            queue.push_back(nbr);
        }
    }
    if !visited[to] {
        return None;
    }

    let mut atoms = vec![to];
    let mut bonds = Vec::new();
    let mut cur = to;
    while let Some((prev, bond)) = parent[cur] {
        bonds.push(bond);
        atoms.push(prev);
        cur = prev;
    }
    atoms.reverse();
    bonds.reverse();
    Some((atoms, bonds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn test_chain_has_no_rings() {
        let mol = parse_smiles("CCCO").unwrap();
        let info = find_rings(&mol);
        assert_eq!(info.num_rings(), 0);
        assert!(info.atom_in_ring.iter().all(|&r| !r));
    }

    #[test]
    fn test_single_ring_with_substituent() {
        let mol = parse_smiles("C1CCCCC1C").unwrap();
        let info = find_rings(&mol);
        assert_eq!(info.num_rings(), 1);
        assert_eq!(info.rings[0].len(), 6);
        assert!(!info.is_ring_atom(6));
        assert!(!info.is_ring_bond(mol.bond_between(5, 6).unwrap()));
        assert!(info.is_ring_bond(mol.bond_between(0, 5).unwrap()));
    }

    #[test]
    fn test_fused_rings_are_found_separately() {
        let mol = parse_smiles("C1CCC2CCCCC2C1").unwrap();
        let info = find_rings(&mol);
        assert_eq!(info.num_rings(), 2);
        assert!(info.rings.iter().all(|r| r.len() == 6));
    }

    #[test]
    fn test_spiro_and_small_rings() {
        let mol = parse_smiles("C1CC12CCC2").unwrap();
        let info = find_rings(&mol);
        let mut sizes: Vec<usize> = info.rings.iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 4]);
    }
}
