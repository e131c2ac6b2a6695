//! Case-insensitive title search over a forest
//!
//! Matching folds case per `char::to_lowercase`, with final sigma folded to
//! `σ` so it meets `Σ` from either side, and looks for the query as a
//! substring of the title. No locale-aware collation is applied.

use log::{debug, trace};
use std::ops::Range;

use crate::tree::TreeNode;

/// Filter a forest down to the nodes whose title contains `query`
///
/// A matching node is kept whole, with its entire original subtree. A node
/// that does not match is kept only when some descendant matches, and then
/// as a copy whose children are the filtered children. Everything else is
/// dropped. Sibling order is preserved.
///
/// The empty query is not special-cased: every title contains it, so the
/// whole forest comes back. Use [`filter_tree`] for the "empty shows all"
/// policy stated explicitly.
pub fn search_data(query: &str, forest: &[TreeNode]) -> Vec<TreeNode> {
    let needle = fold(query);
    let result = filter_level(&needle, forest);
    debug!(
        "search {:?}: kept {} of {} root nodes",
        query,
        result.len(),
        forest.len()
    );
    result
}

/// Filter a forest, passing it through unchanged when the query is empty
pub fn filter_tree(query: &str, forest: &[TreeNode]) -> Vec<TreeNode> {
    if query.is_empty() {
        return forest.to_vec();
    }
    search_data(query, forest)
}

fn filter_level(needle: &[char], nodes: &[TreeNode]) -> Vec<TreeNode> {
    let mut result = Vec::new();
    for node in nodes {
        if find_folded(&node.title, needle).is_some() {
            trace!("title match at {}", node.key);
            result.push(node.clone());
        } else if let Some(children) = &node.children {
            let filtered = filter_level(needle, children);
            if !filtered.is_empty() {
                result.push(node.with_children(filtered));
            }
        }
    }
    result
}

/// Returns true if `title` contains `query`, ignoring case
pub fn title_matches(title: &str, query: &str) -> bool {
    find_match(title, query).is_some()
}

/// Byte range of the first case-insensitive occurrence of `query` in `title`
///
/// The range always falls on char boundaries of the original title. An
/// empty query matches at `0..0`.
pub fn find_match(title: &str, query: &str) -> Option<Range<usize>> {
    find_folded(title, &fold(query))
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(fold_char).collect()
}

fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|lower| if lower == 'ς' { 'σ' } else { lower })
}

fn find_folded(title: &str, needle: &[char]) -> Option<Range<usize>> {
    if needle.is_empty() {
        return Some(0..0);
    }
    title.char_indices().find_map(|(start, _)| {
        match_len(&title[start..], needle).map(|len| start..start + len)
    })
}

/// Length in bytes of the shortest prefix of `rest` that folds to `needle`
fn match_len(rest: &str, needle: &[char]) -> Option<usize> {
    let mut pos = 0;
    for (offset, c) in rest.char_indices() {
        for lower in fold_char(c) {
            if pos == needle.len() {
                break;
            }
            if lower != needle[pos] {
                return None;
            }
            pos += 1;
        }
        if pos == needle.len() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}

/// A title split around its first search hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<'a> {
    /// Text before the hit
    pub prefix: &'a str,
    /// The hit, in the title's original casing
    pub matched: &'a str,
    /// Text after the hit
    pub suffix: &'a str,
}

/// Split `title` around the first occurrence of `query`
///
/// Returns `None` for an empty query or when the title does not match.
pub fn highlight<'a>(title: &'a str, query: &str) -> Option<Highlight<'a>> {
    if query.is_empty() {
        return None;
    }
    let range = find_match(title, query)?;
    Some(Highlight {
        prefix: &title[..range.start],
        matched: &title[range.clone()],
        suffix: &title[range.end..],
    })
}
