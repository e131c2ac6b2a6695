use case_tree::tree::{
    expand_all, filter_tree, parse_forest, read_forest, search_data, NodeKey, NodeStore, TreeNode,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;
use std::io::Write;

fn scenario() -> Vec<TreeNode> {
    vec![TreeNode::branch(
        1,
        "Alpha",
        vec![
            TreeNode::leaf(2, "Beta"),
            TreeNode::branch(3, "Gamma", vec![TreeNode::leaf(4, "AlphaSub")]),
        ],
    )]
}

#[test]
fn test_root_match_keeps_whole_subtree() {
    let tree = scenario();
    assert_eq!(search_data("alpha", &tree), tree);
}

#[test]
fn test_inner_match_keeps_ancestor_path() {
    let tree = scenario();

    let expected = vec![TreeNode::branch(
        1,
        "Alpha",
        vec![TreeNode::branch(
            3,
            "Gamma",
            vec![TreeNode::leaf(4, "AlphaSub")],
        )],
    )];
    assert_eq!(search_data("gamma", &tree), expected);
}

#[test]
fn test_expand_all_scenario() {
    let keys: Vec<NodeKey> = [1, 2, 3, 4].into_iter().map(NodeKey::from).collect();
    assert_eq!(expand_all(&scenario()), keys);
}

#[test]
fn test_no_match_is_empty() {
    assert!(search_data("delta", &scenario()).is_empty());
    assert!(search_data("anything", &[]).is_empty());
}

#[test]
fn test_match_does_not_filter_descendants() {
    // "Gamma" matches, so its non-matching child stays
    let result = search_data("GAM", &scenario());
    let gamma = &result[0].children()[0];
    assert_eq!(gamma.title, "Gamma");
    assert_eq!(gamma.children(), &[TreeNode::leaf(4, "AlphaSub")][..]);
}

#[test]
fn test_sibling_order_preserved() {
    let tree = vec![
        TreeNode::leaf(1, "reset b"),
        TreeNode::leaf(2, "boot"),
        TreeNode::leaf(3, "reset a"),
    ];
    let titles: Vec<_> = search_data("reset", &tree)
        .into_iter()
        .map(|node| node.title)
        .collect();
    assert_eq!(titles, vec!["reset b", "reset a"]);
}

#[test]
fn test_search_input_untouched() {
    let tree = scenario();
    let before = tree.clone();
    let _ = search_data("beta", &tree);
    let _ = search_data("", &tree);
    assert_eq!(tree, before);
}

#[test]
fn test_empty_query_passes_through() {
    let tree = scenario();
    assert_eq!(filter_tree("", &tree), tree);
    assert_eq!(search_data("", &tree), tree);
}

#[test]
fn test_extra_attributes_survive_filtering() {
    let tree = parse_forest(
        r#"[{"key": "1", "title": "boards", "case_count": 5, "children": [
              {"key": "2", "title": "usb", "case_count": 3, "selected_case_count": 1},
              {"key": "3", "title": "pcie", "case_count": 2}
           ]}]"#,
    )
    .unwrap();

    let result = search_data("usb", &tree);
    assert_eq!(result[0].attr("case_count"), Some(&json!(5)));
    assert_eq!(result[0].children().len(), 1);
    assert_eq!(
        result[0].children()[0].attr("selected_case_count"),
        Some(&json!(1))
    );
}

#[test]
fn test_read_forest_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"key": 10, "title": "Smoke", "children": [{{"key": 11, "title": "Boot"}}]}}]"#
    )
    .unwrap();

    let forest = read_forest(file.path()).unwrap();
    assert_eq!(expand_all(&forest), vec![NodeKey::from(10), NodeKey::from(11)]);

    assert!(read_forest(file.path().with_extension("missing")).is_err());
}

#[test]
fn test_store_tree_search_roundtrip() {
    let mut store = NodeStore::new();
    let usb3 = store.get_or_create_path("boards/usb/usb3").unwrap();
    let pcie = store.get_or_create_path("boards/pcie").unwrap();
    store.assign_case("TC-1", usb3).unwrap();
    store.assign_case("TC-2", usb3).unwrap();
    store.assign_case("TC-3", pcie).unwrap();

    let selected: HashSet<String> = ["TC-2".to_string()].into_iter().collect();
    let forest = store.tree(Some(&selected)).unwrap();

    let expected = vec![TreeNode::branch(
        "1",
        "boards",
        vec![TreeNode::branch(
            "2",
            "usb",
            vec![TreeNode::branch("3", "usb3", vec![])
                .with_attr("case_count", 2)
                .with_attr("selected_case_count", 1)],
        )
        .with_attr("case_count", 2)
        .with_attr("selected_case_count", 1)],
    )
    .with_attr("case_count", 3)
    .with_attr("selected_case_count", 1)];

    assert_eq!(search_data("usb3", &forest), expected);
    assert_eq!(forest[0].attr("case_count"), Some(&json!(3)));
}
