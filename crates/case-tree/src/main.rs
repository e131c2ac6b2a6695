//! Command-line front end for case trees
//!
//! Reads a forest in the listing endpoint's JSON shape from a file (or `-`
//! for stdin) and searches, expands, prints or summarises it.

use anyhow::{Context, Result};
use case_tree::tree::{
    expand_all, filter_tree, forest_to_json, outline, parse_forest, traversal, TreeNode,
};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Search and expand Test Station case trees
#[derive(Parser)]
#[command(name = "case-tree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the nodes matching QUERY, with their ancestors, as JSON
    Search {
        /// Tree JSON file, or `-` for stdin
        file: PathBuf,
        /// Case-insensitive title substring; empty keeps the whole tree
        query: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print every key in pre-order, one per line
    Expand {
        /// Tree JSON file, or `-` for stdin
        file: PathBuf,
    },
    /// Print an indented outline, highlighting search hits
    Show {
        /// Tree JSON file, or `-` for stdin
        file: PathBuf,
        /// Filter and highlight by this query
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print node, leaf and depth counts
    Stats {
        /// Tree JSON file, or `-` for stdin
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Search {
            file,
            query,
            pretty,
        } => {
            let forest = load(&file)?;
            let filtered = filter_tree(&query, &forest);
            println!("{}", forest_to_json(&filtered, pretty)?);
        }
        Commands::Expand { file } => {
            let forest = load(&file)?;
            for key in expand_all(&forest) {
                println!("{}", key);
            }
        }
        Commands::Show { file, query } => {
            let forest = load(&file)?;
            let filtered = filter_tree(&query, &forest);
            let rendered = outline(&filtered, &query);
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        }
        Commands::Stats { file } => {
            let forest = load(&file)?;
            let leaves = traversal::walk(&forest, traversal::TraversalOrder::PreOrder)
                .filter(|(_, node)| node.is_leaf())
                .count();
            println!("Roots:  {}", forest.len());
            println!("Nodes:  {}", traversal::node_count(&forest));
            println!("Leaves: {}", leaves);
            println!("Depth:  {}", traversal::max_depth(&forest));
        }
    }

    Ok(())
}

/// Load a forest from a file, or stdin when the path is `-`
fn load(path: &Path) -> Result<Vec<TreeNode>> {
    let json = if path.as_os_str() == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("Failed to read tree from stdin")?;
        json
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree file {}", path.display()))?
    };

    let forest = parse_forest(&json)
        .with_context(|| format!("Failed to parse tree from {}", path.display()))?;
    traversal::validate_keys(&forest)?;
    info!("loaded {} root nodes from {}", forest.len(), path.display());
    Ok(forest)
}
