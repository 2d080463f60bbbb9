use crate::config::FeaturizeConfig;
use sha2::{Digest, Sha256};

pub trait ContentHash {
    fn content_hash(&self) -> String;
}

impl ContentHash for [String] {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"smiles");
        hasher.update((self.len() as u64).to_le_bytes());
        for smiles in self {
            // Length prefix keeps ["ab", "c"] and ["a", "bc"] apart.
            hasher.update((smiles.len() as u64).to_le_bytes());
            hasher.update(smiles.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

impl ContentHash for FeaturizeConfig {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"featurize");
        hasher.update(self.edge_type_layout.as_str().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Folds several digests (or any labels) into one.
pub fn combine_digests<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeTypeLayout;

    #[test]
    fn test_smiles_hash_is_order_and_boundary_sensitive() {
        let a = vec!["CC".to_string(), "O".to_string()];
        let b = vec!["O".to_string(), "CC".to_string()];
        let c = vec!["C".to_string(), "CO".to_string()];

        assert_eq!(a.content_hash(), a.clone().content_hash());
        assert_ne!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
        assert_eq!(a.content_hash().len(), 64);
    }

    #[test]
    fn test_featurize_hash_depends_on_layout() {
        let aligned = FeaturizeConfig::default();
        let repeated = FeaturizeConfig {
            edge_type_layout: EdgeTypeLayout::Repeated,
        };
        assert_ne!(aligned.content_hash(), repeated.content_hash());
    }

    #[test]
    fn test_combine_digests_is_deterministic() {
        assert_eq!(combine_digests(["a", "b"]), combine_digests(["a", "b"]));
        assert_ne!(combine_digests(["ab", ""]), combine_digests(["a", "b"]));
    }
}
