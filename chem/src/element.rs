//! Periodic table data needed for valence and hybridization perception.

use std::fmt;

struct ElementData {
    symbol: &'static str,
    outer_electrons: u8,
    /// Allowed valences in ascending order. Empty means any valence.
    valences: &'static [u32],
}

const ANY: &[u32] = &[];

const fn el(symbol: &'static str, outer_electrons: u8, valences: &'static [u32]) -> ElementData {
    ElementData {
        symbol,
        outer_electrons,
        valences,
    }
}

// Indexed by atomic number; slot 0 is the `*` wildcard atom.
static TABLE: [ElementData; 119] = [
    el("*", 0, ANY),
    el("H", 1, &[1]),
    el("He", 2, &[0]),
    el("Li", 1, &[1]),
    el("Be", 2, &[2]),
    el("B", 3, &[3]),
    el("C", 4, &[4]),
    el("N", 5, &[3]),
    el("O", 6, &[2]),
    el("F", 7, &[1]),
    el("Ne", 8, &[0]),
    el("Na", 1, &[1]),
    el("Mg", 2, &[2]),
    el("Al", 3, &[3]),
    el("Si", 4, &[4]),
    el("P", 5, &[3, 5, 7]),
    el("S", 6, &[2, 4, 6]),
    el("Cl", 7, &[1]),
    el("Ar", 8, &[0]),
    el("K", 1, &[1]),
    el("Ca", 2, &[2]),
    el("Sc", 3, ANY),
    el("Ti", 4, ANY),
    el("V", 5, ANY),
    el("Cr", 6, ANY),
    el("Mn", 7, ANY),
    el("Fe", 8, ANY),
    el("Co", 9, ANY),
    el("Ni", 10, ANY),
    el("Cu", 11, ANY),
    el("Zn", 2, ANY),
    el("Ga", 3, &[3]),
    el("Ge", 4, &[4]),
    el("As", 5, &[3, 5, 7]),
    el("Se", 6, &[2, 4, 6]),
    el("Br", 7, &[1]),
    el("Kr", 8, &[0]),
    el("Rb", 1, &[1]),
    el("Sr", 2, &[2]),
    el("Y", 3, ANY),
    el("Zr", 4, ANY),
    el("Nb", 5, ANY),
    el("Mo", 6, ANY),
    el("Tc", 7, ANY),
    el("Ru", 8, ANY),
    el("Rh", 9, ANY),
    el("Pd", 10, ANY),
    el("Ag", 11, ANY),
    el("Cd", 2, ANY),
    el("In", 3, &[3]),
    el("Sn", 4, &[2, 4]),
    el("Sb", 5, &[3, 5, 7]),
    el("Te", 6, &[2, 4, 6]),
    el("I", 7, &[1, 3, 5]),
    el("Xe", 8, &[0]),
    el("Cs", 1, &[1]),
    el("Ba", 2, &[2]),
    el("La", 3, ANY),
    el("Ce", 3, ANY),
    el("Pr", 3, ANY),
    el("Nd", 3, ANY),
    el("Pm", 3, ANY),
    el("Sm", 3, ANY),
    el("Eu", 3, ANY),
    el("Gd", 3, ANY),
    el("Tb", 3, ANY),
    el("Dy", 3, ANY),
    el("Ho", 3, ANY),
    el("Er", 3, ANY),
    el("Tm", 3, ANY),
    el("Yb", 3, ANY),
    el("Lu", 3, ANY),
    el("Hf", 4, ANY),
    el("Ta", 5, ANY),
    el("W", 6, ANY),
    el("Re", 7, ANY),
    el("Os", 8, ANY),
    el("Ir", 9, ANY),
    el("Pt", 10, ANY),
    el("Au", 11, ANY),
    el("Hg", 2, ANY),
    el("Tl", 3, &[1, 3]),
    el("Pb", 4, &[2, 4]),
    el("Bi", 5, &[3, 5]),
    el("Po", 6, &[2, 4, 6]),
    el("At", 7, &[1, 3, 5, 7]),
    el("Rn", 8, &[0]),
    el("Fr", 1, &[1]),
    el("Ra", 2, &[2]),
    el("Ac", 3, ANY),
    el("Th", 3, ANY),
    el("Pa", 3, ANY),
    el("U", 3, ANY),
    el("Np", 3, ANY),
    el("Pu", 3, ANY),
    el("Am", 3, ANY),
    el("Cm", 3, ANY),
    el("Bk", 3, ANY),
    el("Cf", 3, ANY),
    el("Es", 3, ANY),
    el("Fm", 3, ANY),
    el("Md", 3, ANY),
    el("No", 3, ANY),
    el("Lr", 3, ANY),
    el("Rf", 4, ANY),
    el("Db", 5, ANY),
    el("Sg", 6, ANY),
    el("Bh", 7, ANY),
    el("Hs", 8, ANY),
    el("Mt", 9, ANY),
    el("Ds", 10, ANY),
    el("Rg", 11, ANY),
    el("Cn", 2, ANY),
    el("Nh", 3, ANY),
    el("Fl", 4, ANY),
    el("Mc", 5, ANY),
    el("Lv", 6, ANY),
    el("Ts", 7, ANY),
    el("Og", 8, ANY),
];

/// A chemical element, identified by atomic number. Atomic number 0 is the
/// SMILES wildcard `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub const WILDCARD: Element = Element(0);
    pub const HYDROGEN: Element = Element(1);
    pub const BORON: Element = Element(5);
    pub const CARBON: Element = Element(6);
    pub const NITROGEN: Element = Element(7);
    pub const OXYGEN: Element = Element(8);
    pub const PHOSPHORUS: Element = Element(15);
    pub const SULFUR: Element = Element(16);

    pub fn from_atomic_number(atomic_number: u8) -> Option<Self> {
        ((atomic_number as usize) < TABLE.len()).then_some(Element(atomic_number))
    }

    /// Exact, case-sensitive symbol lookup (`"Cl"`, not `"CL"`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        TABLE
            .iter()
            .position(|data| data.symbol == symbol)
            .map(|z| Element(z as u8))
    }

    pub fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        TABLE[self.0 as usize].symbol
    }

    pub fn outer_electrons(self) -> u8 {
        TABLE[self.0 as usize].outer_electrons
    }

    /// Allowed valences, ascending. `None` when the element accepts any
    /// valence (metals and the wildcard).
    pub fn default_valences(self) -> Option<&'static [u32]> {
        let valences = TABLE[self.0 as usize].valences;
        (!valences.is_empty()).then_some(valences)
    }

    /// Valences of the isoelectronic element for an ion: N+ behaves like C,
    /// O- like F, B- like C.
    pub fn valences_with_charge(self, formal_charge: i32) -> Option<&'static [u32]> {
        if self == Element::WILDCARD {
            return None;
        }
        let effective = i32::from(self.0).checked_sub(formal_charge)?;
        if effective <= 0 {
            return Some(&[0]);
        }
        u8::try_from(effective)
            .ok()
            .and_then(Element::from_atomic_number)
            .and_then(Element::default_valences)
    }

    /// Groups 15 and 16: atoms that can donate a lone pair into a
    /// neighbouring π system.
    pub fn is_chalcogen_or_pnictogen(self) -> bool {
        matches!(self.0, 7 | 8 | 15 | 16 | 33 | 34 | 51 | 52)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
