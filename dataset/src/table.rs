use crate::error::DatasetError;
use sider_core::config::DataConfig;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// How to pull SMILES strings out of a delimited drug table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub delimiter: u8,
    pub has_header: bool,
    /// Zero-based column holding the SMILES string.
    pub column: usize,
    /// Only this many leading records are read.
    pub limit: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: false,
            column: 1,
            limit: 750,
        }
    }
}

impl TableOptions {
    pub fn from_config(data: &DataConfig) -> Self {
        Self {
            delimiter: data.delimiter_byte(),
            has_header: data.has_header,
            column: data.smiles_column,
            limit: data.max_molecules,
        }
    }
}

/// Reads the SMILES column of the first `options.limit` records.
pub fn read_smiles<R: Read>(reader: R, options: &TableOptions) -> Result<Vec<String>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(reader);

    let mut smiles = Vec::new();
    for (row, record) in rdr.records().take(options.limit).enumerate() {
        let record = record?;
        let value = record
            .get(options.column)
            .ok_or(DatasetError::MissingColumn {
                row,
                column: options.column,
            })?;
        smiles.push(value.trim().to_string());
    }

    if smiles.len() < options.limit {
        warn!(
            rows = smiles.len(),
            limit = options.limit,
            "drug table has fewer rows than the molecule limit"
        );
    }
    debug!(rows = smiles.len(), column = options.column, "read SMILES column");
    Ok(smiles)
}

pub fn read_smiles_file(
    path: impl AsRef<Path>,
    options: &TableOptions,
) -> Result<Vec<String>, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_smiles(std::io::BufReader::new(file), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_second_column_without_header() {
        let data = "DB00945,CC(=O)Oc1ccccc1C(=O)O\nDB01050,CC(C)Cc1ccc(cc1)C(C)C(=O)O\n";
        let smiles = read_smiles(data.as_bytes(), &TableOptions::default()).unwrap();
        assert_eq!(
            smiles,
            vec!["CC(=O)Oc1ccccc1C(=O)O", "CC(C)Cc1ccc(cc1)C(C)C(=O)O"]
        );
    }

    #[test]
    fn test_limit_and_header() {
        let data = "id\tsmiles\na\tC\nb\tCC\nc\tCCC\n";
        let options = TableOptions {
            delimiter: b'\t',
            has_header: true,
            column: 1,
            limit: 2,
        };
        assert_eq!(read_smiles(data.as_bytes(), &options).unwrap(), vec!["C", "CC"]);
    }

    #[test]
    fn test_short_row_is_reported() {
        let data = "a,C\nb\n";
        let err = read_smiles(data.as_bytes(), &TableOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { row: 1, column: 1 }));
    }
}
