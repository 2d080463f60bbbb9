use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dataset::DatasetBuilder;
use serde_json::json;
use sider_core::config::AppConfig;
use sider_core::model::EdgeTypeLayout;
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    Aligned,
    Repeated,
}

impl From<Layout> for EdgeTypeLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Aligned => EdgeTypeLayout::Aligned,
            Layout::Repeated => EdgeTypeLayout::Repeated,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sider", about = "Molecular graphs for drug side-effect prediction")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Featurizes one SMILES string and prints the graph as JSON.
    Featurize {
        smiles: String,

        #[arg(long, value_enum, default_value = "aligned")]
        layout: Layout,
    },
    /// Builds the dataset from configuration and prints a summary.
    Inspect {
        /// Directory holding default.toml; `./config` when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also print one retrieved sample.
        #[arg(long)]
        index: Option<usize>,
    },
}

fn main() -> Result<()> {
    sider_core::init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Featurize { smiles, layout } => {
            let graph = chem::smiles_to_graph(&smiles, layout.into())
                .with_context(|| format!("featurizing {smiles:?}"))?;
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
        Command::Inspect { config, index } => {
            let cfg = match &config {
                Some(dir) => AppConfig::load_from(dir)
                    .with_context(|| format!("loading configuration from {}", dir.display()))?,
                None => AppConfig::load().context("loading configuration from ./config")?,
            };
            info!(table = %cfg.data.smiles_table, "building dataset");
            let mut ds = DatasetBuilder::from_config(&cfg).build()?;

            let (nodes, similarity, target) = ds.len_features();
            let mut summary = json!({
                "len": ds.len(),
                "len_features": [nodes, similarity, target],
                "edge_type_layout": cfg.featurize.edge_type_layout.as_str(),
            });
            if let Some(i) = index {
                let sample = ds.get(i)?;
                summary["sample"] = json!({
                    "index": sample.index,
                    "row": sample.graph.index,
                    "atom_count": sample.graph.atom_count,
                    "edge_count": sample.graph.edge_count(),
                    "edge_index": sample.graph.edge_index,
                    "edge_type": sample.graph.edge_type,
                    "side_effect_positives": sample.side_effects.iter().filter(|&&v| v > 0.0).count(),
                });
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
