//! Example that builds a case-node tree, searches it and expands the result
//!
//! Usage:
//!   cargo run --example search_cases [query]
//!
//! If no query is provided, searches for "usb".

use anyhow::Result;
use case_tree::tree::{outline, NodeStore, SearchTree};
use std::collections::HashSet;
use std::env;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let query = args.get(1).map(String::as_str).unwrap_or("usb");

    // Folders are created from import paths, the way uploaded case files are filed
    let mut store = NodeStore::new();
    let usb2 = store.get_or_create_path("boards/usb/usb2")?;
    let usb3 = store.get_or_create_path("boards/usb/usb3")?;
    let pcie = store.get_or_create_path("boards/pcie")?;
    let boot = store.get_or_create_path("power/cold boot")?;

    store.assign_case("TC-001", usb2)?;
    store.assign_case("TC-002", usb3)?;
    store.assign_case("TC-003", usb3)?;
    store.assign_case("TC-004", pcie)?;
    store.assign_case("TC-005", boot)?;

    // Dragging a case onto another folder reassigns it
    store.assign_case("TC-004", usb2)?;

    let selected: HashSet<String> = ["TC-002", "TC-005"].iter().map(|s| s.to_string()).collect();
    let forest = store.tree(Some(&selected))?;

    println!("Full tree:");
    println!("{}", outline(&forest, ""));
    println!();

    let mut view = SearchTree::new(forest);
    view.set_query(query);
    view.toggle_expand_all();

    println!("Search {:?}:", query);
    println!("{}", view.outline());
    println!();

    let keys: Vec<String> = view.expanded().keys().iter().map(|k| k.to_string()).collect();
    println!("Expanded keys: {}", keys.join(", "));

    Ok(())
}
