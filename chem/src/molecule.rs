use crate::element::Element;
use crate::error::ChemError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric bond order; aromatic bonds count 1.5.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Valence contribution in a Kekulé structure.
    pub(crate) fn valence_contribution(self) -> u32 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// Orbital hybridization states, in feature-encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hybridization {
    S,
    Sp,
    Sp2,
    Sp3,
    Sp3d,
    Sp3d2,
    #[default]
    Unspecified,
    Other,
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Hybridization::S => "S",
            Hybridization::Sp => "SP",
            Hybridization::Sp2 => "SP2",
            Hybridization::Sp3 => "SP3",
            Hybridization::Sp3d => "SP3D",
            Hybridization::Sp3d2 => "SP3D2",
            Hybridization::Unspecified => "UNSPECIFIED",
            Hybridization::Other => "OTHER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i32,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    /// Hydrogens written inside a bracket atom, or folded in from explicit
    /// `[H]` neighbours.
    pub explicit_hydrogens: u32,
    /// Bracket atoms never receive implicit hydrogens.
    pub no_implicit: bool,
    // Perceived during sanitization.
    pub implicit_hydrogens: u32,
    pub explicit_valence: u32,
    pub radical_electrons: u32,
    pub hybridization: Hybridization,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: None,
            is_aromatic: false,
            explicit_hydrogens: 0,
            no_implicit: false,
            implicit_hydrogens: 0,
            explicit_valence: 0,
            radical_electrons: 0,
            hybridization: Hybridization::Unspecified,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.element.symbol()
    }

    pub fn total_hydrogens(&self) -> u32 {
        self.explicit_hydrogens + self.implicit_hydrogens
    }

    /// Implicit valence equals the implicit hydrogen count.
    pub fn implicit_valence(&self) -> u32 {
        self.implicit_hydrogens
    }

    pub fn total_valence(&self) -> u32 {
        self.explicit_valence + self.implicit_hydrogens
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(begin: usize, end: usize, order: BondOrder) -> Self {
        Self { begin, end, order }
    }

    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

/// Molecular graph: atoms and bonds in declaration order plus an adjacency
/// list of `(neighbour, bond index)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.begin].push((bond.end, bi));
            adjacency[bond.end].push((bond.begin, bi));
        }
        Self {
            atoms,
            bonds,
            adjacency,
        }
    }

    /// Parses and sanitizes a SMILES string.
    pub fn from_smiles(smiles: &str) -> Result<Self, ChemError> {
        let raw = crate::smiles::parse_smiles(smiles).map_err(|e| ChemError::invalid(smiles, e))?;
        crate::sanitize::sanitize(raw).map_err(|e| ChemError::invalid(smiles, e))
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    pub fn bond(&self, idx: usize) -> &Bond {
        &self.bonds[idx]
    }

    pub(crate) fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub(crate) fn set_bond_order(&mut self, idx: usize, order: BondOrder) {
        self.bonds[idx].order = order;
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// `(neighbour, bond index)` pairs of an atom.
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    /// Number of explicit graph neighbours.
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Degree including attached hydrogens.
    pub fn total_degree(&self, atom: usize) -> usize {
        self.degree(atom) + self.atoms[atom].total_hydrogens() as usize
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, bi)| bi)
    }

    /// Sum of Kekulé bond contributions plus explicit hydrogens.
    pub(crate) fn bonded_valence(&self, atom: usize) -> u32 {
        let bonds: u32 = self.adjacency[atom]
            .iter()
            .map(|&(_, bi)| self.bonds[bi].order.valence_contribution())
            .sum();
        bonds + self.atoms[atom].explicit_hydrogens
    }

    pub(crate) fn into_parts(self) -> (Vec<Atom>, Vec<Bond>) {
        (self.atoms, self.bonds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethanol() -> Molecule {
        let atoms = vec![
            Atom::new(Element::CARBON),
            Atom::new(Element::CARBON),
            Atom::new(Element::OXYGEN),
        ];
        let bonds = vec![
            Bond::new(0, 1, BondOrder::Single),
            Bond::new(1, 2, BondOrder::Single),
        ];
        Molecule::new(atoms, bonds)
    }

    #[test]
    fn test_adjacency_lists_both_directions() {
        let mol = ethanol();
        assert_eq!(mol.neighbors(1), &[(0, 0), (2, 1)]);
        assert_eq!(mol.degree(0), 1);
        assert_eq!(mol.bond_between(2, 1), Some(1));
        assert_eq!(mol.bond_between(0, 2), None);
    }

    #[test]
    fn test_bond_other_end() {
        let bond = Bond::new(4, 7, BondOrder::Double);
        assert_eq!(bond.other(4), 7);
        assert_eq!(bond.other(7), 4);
        assert_eq!(bond.order.as_f64(), 2.0);
    }
}
