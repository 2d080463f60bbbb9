use crate::adjacency::AdjacencyGraph;
use crate::error::ChemError;
use crate::features::{encode_atom, ATOM_FEATURE_WIDTH};
use crate::molecule::Molecule;
use sider_core::model::{EdgeTypeLayout, MoleculeGraph};
use tracing::trace;

/// Parses `smiles` and builds its graph record. The record's `index` is 0;
/// dataset builders overwrite it with the source row.
pub fn smiles_to_graph(smiles: &str, layout: EdgeTypeLayout) -> Result<MoleculeGraph, ChemError> {
    let mol = Molecule::from_smiles(smiles)?;
    molecule_to_graph(&mol, layout)
}

/// Builds the graph record of a sanitized molecule.
///
/// Edges come from an insertion-ordered adjacency graph over the bond list,
/// so a bond `(a, b)` yields both `a -> b` and `b -> a`, grouped by source
/// node in order of first appearance.
pub fn molecule_to_graph(
    mol: &Molecule,
    layout: EdgeTypeLayout,
) -> Result<MoleculeGraph, ChemError> {
    let mut graph = MoleculeGraph::new(0, mol.atom_count(), ATOM_FEATURE_WIDTH);
    for idx in 0..mol.atom_count() {
        encode_atom(mol, idx, &mut graph.node_features)?;
    }

    let bond_orders: Vec<f64> = mol.bonds().iter().map(|b| b.order.as_f64()).collect();
    let adjacency = AdjacencyGraph::from_edges(
        mol.bonds()
            .iter()
            .zip(&bond_orders)
            .map(|(b, &order)| (b.begin, b.end, order)),
    );

    for (source, target, order) in adjacency.directed_edges() {
        graph.push_edge(source, target);
        if layout == EdgeTypeLayout::Aligned {
            graph.edge_type.push(order);
        }
    }
    if layout == EdgeTypeLayout::Repeated {
        let truncated = bond_orders.iter().map(|o| o.trunc());
        graph.edge_type.extend(truncated.clone().chain(truncated));
    }

    trace!(
        atoms = graph.atom_count,
        edges = graph.edge_count(),
        layout = layout.as_str(),
        "built molecule graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidReason;
    use crate::smiles::SmilesError;

    fn edges(graph: &MoleculeGraph) -> Vec<(i64, i64)> {
        graph.edges().collect()
    }

    #[test]
    fn test_two_atom_molecule() {
        let graph = smiles_to_graph("CC", EdgeTypeLayout::Aligned).unwrap();
        assert_eq!(graph.atom_count, 2);
        assert_eq!(graph.node_features.len(), 2 * ATOM_FEATURE_WIDTH);
        assert_eq!(graph.edge_index, [vec![0, 1], vec![1, 0]]);
        assert_eq!(graph.edge_type, vec![1.0, 1.0]);
    }

    #[test]
    fn test_branch_edges_group_by_source() {
        let graph = smiles_to_graph("CC(C)O", EdgeTypeLayout::Aligned).unwrap();
        assert_eq!(
            edges(&graph),
            vec![(0, 1), (1, 0), (1, 2), (1, 3), (2, 1), (3, 1)]
        );
    }

    #[test]
    fn test_edge_type_layouts() {
        let aligned = smiles_to_graph("C=CO", EdgeTypeLayout::Aligned).unwrap();
        assert_eq!(edges(&aligned), vec![(0, 1), (1, 0), (1, 2), (2, 1)]);
        assert_eq!(aligned.edge_type, vec![2.0, 2.0, 1.0, 1.0]);

        let repeated = smiles_to_graph("C=CO", EdgeTypeLayout::Repeated).unwrap();
        assert_eq!(repeated.edge_index, aligned.edge_index);
        assert_eq!(repeated.edge_type, vec![2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_aromatic_bonds_are_one_and_a_half() {
        let graph = smiles_to_graph("c1ccccc1", EdgeTypeLayout::Aligned).unwrap();
        assert_eq!(graph.edge_count(), 12);
        assert!(graph.edge_type.iter().all(|&t| t == 1.5));

        let legacy = smiles_to_graph("c1ccccc1", EdgeTypeLayout::Repeated).unwrap();
        assert!(legacy.edge_type.iter().all(|&t| t == 1.0));
    }

    #[test]
    fn test_zero_bond_molecule() {
        let graph = smiles_to_graph("[Na+]", EdgeTypeLayout::Aligned).unwrap();
        assert_eq!(graph.atom_count, 1);
        assert_eq!(graph.edge_index, [Vec::<i64>::new(), Vec::new()]);
        assert!(graph.edge_type.is_empty());
    }

    #[test]
    fn test_invalid_input_is_rejected_whole() {
        assert!(matches!(
            smiles_to_graph("C1CC", EdgeTypeLayout::Aligned),
            Err(ChemError::InvalidMoleculeString { .. })
        ));
        assert!(matches!(
            smiles_to_graph("CC[Fe+6]", EdgeTypeLayout::Aligned),
            Err(ChemError::UnsupportedAtomProperty { .. })
        ));
    }

    #[test]
    fn test_oversized_charges_are_invalid_strings() {
        for smiles in ["[C-2147483648]", "[C-2147483647]", "[C+4294967295]"] {
            let err = smiles_to_graph(smiles, EdgeTypeLayout::Aligned).unwrap_err();
            assert!(
                matches!(
                    err,
                    ChemError::InvalidMoleculeString {
                        reason: InvalidReason::Parse(SmilesError::InvalidCharge { .. }),
                        ..
                    }
                ),
                "{smiles}: {err:?}"
            );
        }
    }
}
