//! Treeviz formatter for assembled hierarchies
//!
//! One line per node, two spaces of indentation per nesting level: the
//! node's label id, then a truncated text preview. Solutions render the
//! same way with the resolved marker per paragraph, which makes solver
//! output diffable in tests and log excerpts.

use crate::depth::derive::Solution;
use crate::tree::node::Node;

const PREVIEW_CHARS: usize = 40;

/// Render `node` and its descendants, one line per node.
pub fn format_tree(node: &Node) -> String {
    let mut out = String::new();
    push_node(&mut out, node, 0);
    out
}

/// Render a solution as an indented marker listing.
pub fn format_solution(solution: &Solution) -> String {
    let mut out = String::new();
    for par in &solution.assignment {
        out.push_str(&"  ".repeat(par.depth));
        out.push_str(par.marker());
        out.push('\n');
    }
    out
}

fn push_node(out: &mut String, node: &Node, level: usize) {
    out.push_str(&"  ".repeat(level));
    out.push_str(&node.label_id());
    if !node.text.is_empty() {
        out.push(' ');
        out.push_str(&truncate(&node.text, PREVIEW_CHARS));
    }
    out.push('\n');
    for child in &node.children {
        push_node(out, child, level + 1);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}
