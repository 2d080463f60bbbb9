//! SMILES reader: text -> unsanitized atoms and bonds.
//!
//! Supports the organic subset, bracket atoms (isotope, chirality markers,
//! hydrogen count, charge, atom class), bond symbols, branches, ring
//! closures (`1`, `%12`) and dot-separated components. Chirality and
//! cis/trans markers are read but not kept; `/` and `\` are single bonds.

use crate::element::Element;
use crate::molecule::{Atom, Bond, BondOrder, Molecule};
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("empty SMILES string")]
    Empty,
    #[error("unexpected character {ch:?} at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unknown element symbol {symbol:?} at position {pos}")]
    UnknownElement { symbol: String, pos: usize },
    #[error("unterminated bracket atom starting at position {pos}")]
    UnterminatedBracket { pos: usize },
    #[error("unmatched ')' at position {pos}")]
    UnmatchedBranchClose { pos: usize },
    #[error("branch at position {pos} has no atom to attach to")]
    BranchWithoutAtom { pos: usize },
    #[error("{count} branch(es) left open")]
    UnclosedBranch { count: usize },
    #[error("ring closure {label} never closed")]
    UnclosedRing { label: u32 },
    #[error("ring closure {label} at position {pos} has no atom to attach to")]
    RingWithoutAtom { label: u32, pos: usize },
    #[error("ring closure {label} joins an atom to itself or duplicates a bond")]
    InvalidRingClosure { label: u32 },
    #[error("conflicting bond symbols on ring closure {label}")]
    RingBondConflict { label: u32 },
    #[error("bond symbol at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },
    #[error("formal charge at position {pos} exceeds 15 in magnitude")]
    InvalidCharge { pos: usize },
    #[error("{field} at position {pos} is out of range")]
    NumberOutOfRange { field: &'static str, pos: usize },
}

/// Largest formal charge magnitude a bracket atom may carry.
pub const MAX_CHARGE: i32 = 15;

struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    current: Option<usize>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<Option<usize>>,
    rings: HashMap<u32, RingOpening>,
}

/// Parses a SMILES string into an unsanitized [`Molecule`]. Anything after
/// the first whitespace (a molecule title) is ignored.
pub fn parse_smiles(input: &str) -> Result<Molecule, SmilesError> {
    let body = input.split_whitespace().next().unwrap_or("");
    if body.is_empty() {
        return Err(SmilesError::Empty);
    }

    let mut parser = Parser {
        chars: body.char_indices().peekable(),
        atoms: Vec::new(),
        bonds: Vec::new(),
        current: None,
        pending_bond: None,
        branches: Vec::new(),
        rings: HashMap::new(),
    };
    parser.run()?;
    Ok(Molecule::new(parser.atoms, parser.bonds))
}

fn implicit_order(a_aromatic: bool, b_aromatic: bool) -> BondOrder {
    if a_aromatic && b_aromatic {
        BondOrder::Aromatic
    } else {
        BondOrder::Single
    }
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<(), SmilesError> {
        while let Some(&(pos, ch)) = self.chars.peek() {
            match ch {
                '-' | '/' | '\\' => self.bond_symbol(BondOrder::Single, pos, ch)?,
                '=' => self.bond_symbol(BondOrder::Double, pos, ch)?,
                '#' => self.bond_symbol(BondOrder::Triple, pos, ch)?,
                ':' => self.bond_symbol(BondOrder::Aromatic, pos, ch)?,
                '(' => {
                    if self.current.is_none() || self.pending_bond.is_some() {
                        return Err(SmilesError::BranchWithoutAtom { pos });
                    }
                    self.branches.push(self.current);
                    self.chars.next();
                }
                ')' => {
                    self.check_no_pending_bond()?;
                    let prev = self
                        .branches
                        .pop()
                        .ok_or(SmilesError::UnmatchedBranchClose { pos })?;
                    self.current = prev;
                    self.chars.next();
                }
                '.' => {
                    self.check_no_pending_bond()?;
                    self.current = None;
                    self.chars.next();
                }
                '%' => {
                    self.chars.next();
                    let d1 = self.expect_digit()?;
                    let d2 = self.expect_digit()?;
                    self.ring_closure(d1 * 10 + d2, pos)?;
                }
                '0'..='9' => {
                    self.chars.next();
                    self.ring_closure(ch as u32 - '0' as u32, pos)?;
                }
                '[' => {
                    self.chars.next();
                    let atom = self.bracket_atom(pos)?;
                    self.add_atom(atom);
                }
                _ => {
                    let atom = self.organic_atom(pos, ch)?;
                    self.add_atom(atom);
                }
            }
        }

        self.check_no_pending_bond()?;
        if !self.branches.is_empty() {
            return Err(SmilesError::UnclosedBranch {
                count: self.branches.len(),
            });
        }
        if let Some(&label) = self.rings.keys().min() {
            return Err(SmilesError::UnclosedRing { label });
        }
        if self.atoms.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok(())
    }

    fn bond_symbol(&mut self, order: BondOrder, pos: usize, ch: char) -> Result<(), SmilesError> {
        if self.pending_bond.is_some() {
            return Err(SmilesError::UnexpectedChar { ch, pos });
        }
        if self.current.is_none() {
            return Err(SmilesError::DanglingBond { pos });
        }
        self.pending_bond = Some((order, pos));
        self.chars.next();
        Ok(())
    }

    fn check_no_pending_bond(&self) -> Result<(), SmilesError> {
        match self.pending_bond {
            Some((_, pos)) => Err(SmilesError::DanglingBond { pos }),
            None => Ok(()),
        }
    }

    fn add_atom(&mut self, atom: Atom) {
        let idx = self.atoms.len();
        let aromatic = atom.is_aromatic;
        self.atoms.push(atom);

        if let Some(prev) = self.current {
            let order = match self.pending_bond.take() {
                Some((order, _)) => order,
                None => implicit_order(self.atoms[prev].is_aromatic, aromatic),
            };
            self.bonds.push(Bond::new(prev, idx, order));
        }
        self.current = Some(idx);
    }

    fn ring_closure(&mut self, label: u32, pos: usize) -> Result<(), SmilesError> {
        let atom = self
            .current
            .ok_or(SmilesError::RingWithoutAtom { label, pos })?;
        let explicit = self.pending_bond.take().map(|(order, _)| order);

        let Some(opening) = self.rings.remove(&label) else {
            self.rings.insert(label, RingOpening { atom, order: explicit });
            return Ok(());
        };

        let other = opening.atom;
        let duplicate = self.bonds.iter().any(|b| {
            (b.begin == other && b.end == atom) || (b.begin == atom && b.end == other)
        });
        if other == atom || duplicate {
            return Err(SmilesError::InvalidRingClosure { label });
        }

        let order = match (opening.order, explicit) {
            (Some(a), Some(b)) if a != b => return Err(SmilesError::RingBondConflict { label }),
            (Some(a), _) | (None, Some(a)) => a,
            (None, None) => {
                implicit_order(self.atoms[other].is_aromatic, self.atoms[atom].is_aromatic)
            }
        };
        self.bonds.push(Bond::new(other, atom, order));
        Ok(())
    }

    fn organic_atom(&mut self, pos: usize, ch: char) -> Result<Atom, SmilesError> {
        self.chars.next();
        let (symbol, aromatic) = match ch {
            'B' if self.eat('r') => ("Br", false),
            'C' if self.eat('l') => ("Cl", false),
            'B' => ("B", false),
            'C' => ("C", false),
            'N' => ("N", false),
            'O' => ("O", false),
            'P' => ("P", false),
            'S' => ("S", false),
            'F' => ("F", false),
            'I' => ("I", false),
            'b' => ("B", true),
            'c' => ("C", true),
            'n' => ("N", true),
            'o' => ("O", true),
            'p' => ("P", true),
            's' => ("S", true),
            '*' => ("*", false),
            _ => return Err(SmilesError::UnexpectedChar { ch, pos }),
        };
        let element = Element::from_symbol(symbol).ok_or(SmilesError::UnknownElement {
            symbol: symbol.to_string(),
            pos,
        })?;
        let mut atom = Atom::new(element);
        atom.is_aromatic = aromatic;
        Ok(atom)
    }

    fn bracket_atom(&mut self, start: usize) -> Result<Atom, SmilesError> {
        let isotope_pos = self.offset(start);
        let isotope = self
            .read_number()
            .map(|n| {
                u16::try_from(n).map_err(|_| SmilesError::NumberOutOfRange {
                    field: "isotope",
                    pos: isotope_pos,
                })
            })
            .transpose()?;

        let (element, aromatic) = self.bracket_symbol(start)?;

        if self.eat('@') {
            self.eat('@');
            self.skip_chiral_class();
        }

        let explicit_hydrogens = if self.eat('H') {
            let pos = self.offset(start);
            match self.read_number() {
                Some(n) => u8::try_from(n)
                    .map(u32::from)
                    .map_err(|_| SmilesError::NumberOutOfRange {
                        field: "hydrogen count",
                        pos,
                    })?,
                None => 1,
            }
        } else {
            0
        };

        let charge_pos = self.offset(start);
        let formal_charge = if self.eat('+') {
            self.read_charge('+', charge_pos)?
        } else if self.eat('-') {
            -self.read_charge('-', charge_pos)?
        } else {
            0
        };

        if self.eat(':') && self.read_number().is_none() {
            return Err(self.unexpected());
        }

        match self.chars.next() {
            Some((_, ']')) => {}
            Some((pos, ch)) => return Err(SmilesError::UnexpectedChar { ch, pos }),
            None => return Err(SmilesError::UnterminatedBracket { pos: start }),
        }

        let mut atom = Atom::new(element);
        atom.isotope = isotope;
        atom.is_aromatic = aromatic;
        atom.explicit_hydrogens = explicit_hydrogens;
        atom.formal_charge = formal_charge;
        atom.no_implicit = true;
        Ok(atom)
    }

    fn bracket_symbol(&mut self, start: usize) -> Result<(Element, bool), SmilesError> {
        let (pos, first) = self
            .chars
            .next()
            .ok_or(SmilesError::UnterminatedBracket { pos: start })?;

        if first == '*' {
            return Ok((Element::WILDCARD, false));
        }

        if first.is_ascii_lowercase() {
            // Two-letter aromatic symbols first: se, as, te.
            if let Some(&(_, second)) = self.chars.peek() {
                let pair = match (first, second) {
                    ('s', 'e') => Some("Se"),
                    ('a', 's') => Some("As"),
                    ('t', 'e') => Some("Te"),
                    _ => None,
                };
                if let Some(symbol) = pair {
                    self.chars.next();
                    let element = Element::from_symbol(symbol).ok_or(SmilesError::UnknownElement {
                        symbol: symbol.to_string(),
                        pos,
                    })?;
                    return Ok((element, true));
                }
            }
            let symbol = match first {
                'b' => "B",
                'c' => "C",
                'n' => "N",
                'o' => "O",
                'p' => "P",
                's' => "S",
                _ => {
                    return Err(SmilesError::UnknownElement {
                        symbol: first.to_string(),
                        pos,
                    })
                }
            };
            let element = Element::from_symbol(symbol).ok_or(SmilesError::UnknownElement {
                symbol: symbol.to_string(),
                pos,
            })?;
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(SmilesError::UnexpectedChar { ch: first, pos });
        }

        if let Some(&(_, second)) = self.chars.peek() {
            if second.is_ascii_lowercase() {
                let two: String = [first, second].iter().collect();
                if let Some(element) = Element::from_symbol(&two) {
                    self.chars.next();
                    return Ok((element, false));
                }
            }
        }

        let one = first.to_string();
        Element::from_symbol(&one)
            .map(|element| (element, false))
            .ok_or(SmilesError::UnknownElement { symbol: one, pos })
    }

    /// Skips `TH1`, `AL2`, `SP3`, `TB12`, `OH25` style chirality classes.
    fn skip_chiral_class(&mut self) {
        let mut look = self.chars.clone();
        let pair = match (look.next(), look.next()) {
            (Some((_, a)), Some((_, b))) => (a, b),
            _ => return,
        };
        if matches!(
            pair,
            ('T', 'H') | ('A', 'L') | ('S', 'P') | ('T', 'B') | ('O', 'H')
        ) {
            self.chars.next();
            self.chars.next();
            self.read_number();
        }
    }

    /// Magnitude of a charge whose sign was just consumed: `+2` or `++`.
    fn read_charge(&mut self, sign: char, pos: usize) -> Result<i32, SmilesError> {
        let magnitude = match self.read_number() {
            Some(n) => n,
            None => {
                let mut count = 1u32;
                while self.eat(sign) {
                    count = count.saturating_add(1);
                }
                count
            }
        };
        i32::try_from(magnitude)
            .ok()
            .filter(|&m| m <= MAX_CHARGE)
            .ok_or(SmilesError::InvalidCharge { pos })
    }

    fn offset(&mut self, fallback: usize) -> usize {
        self.chars.peek().map_or(fallback, |&(pos, _)| pos)
    }

    fn read_number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(&(_, ch)) = self.chars.peek() {
            let Some(digit) = ch.to_digit(10) else {
                break;
            };
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            self.chars.next();
        }
        value
    }

    fn expect_digit(&mut self) -> Result<u32, SmilesError> {
        match self.chars.next() {
            Some((pos, ch)) => ch
                .to_digit(10)
                .ok_or(SmilesError::UnexpectedChar { ch, pos }),
            None => Err(SmilesError::UnexpectedEnd),
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some(&(_, ch)) if ch == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn unexpected(&mut self) -> SmilesError {
        match self.chars.peek() {
            Some(&(pos, ch)) => SmilesError::UnexpectedChar { ch, pos },
            None => SmilesError::UnexpectedEnd,
        }
    }
}
