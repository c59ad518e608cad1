//! Stack-based assembly of the node hierarchy
//!
//! A chosen solution gives each paragraph a depth; this module folds the
//! flat node list into a nested tree. [`derive_and_build`] is the one-call
//! entry point collaborators use per section: derive, rank, pick,
//! assemble, falling back to a flat tree when the marker sequence is
//! structurally inconsistent.

use tracing::error;

use crate::depth::derive::{self, Solution};
use crate::depth::error::DepthResult;
use crate::depth::markers;
use crate::depth::optional_rules::OptionalRule;
use crate::tree::node::Node;

/// Stack of `(depth, node)` levels used while assembling the tree.
///
/// Deeper nodes accumulate on upper levels; unwinding folds a finished
/// level into the children of the last node below it, prefixing each
/// folded label with the parent's label path.
#[derive(Debug)]
pub struct NodeStack {
    levels: Vec<Vec<(usize, Node)>>,
}

impl NodeStack {
    /// Seed the stack with the section root at depth 0.
    pub fn new(root: Node) -> NodeStack {
        NodeStack {
            levels: vec![vec![(0, root)]],
        }
    }

    fn top_depth(&self) -> usize {
        match self.levels.last().and_then(|level| level.first()) {
            Some(&(depth, _)) => depth,
            None => 0,
        }
    }

    /// Add `node` at `depth`, unwinding finished levels as needed.
    pub fn add(&mut self, depth: usize, node: Node) {
        if depth > self.top_depth() {
            self.levels.push(vec![(depth, node)]);
        } else {
            while depth < self.top_depth() {
                self.unwind();
            }
            if let Some(level) = self.levels.last_mut() {
                level.push((depth, node));
            }
        }
    }

    /// Fold the top level into the children of the node below it.
    fn unwind(&mut self) {
        if self.levels.len() < 2 {
            return;
        }
        let finished = match self.levels.pop() {
            Some(level) => level,
            None => return,
        };
        if let Some((_, parent)) = self.levels.last_mut().and_then(|level| level.last_mut()) {
            let prefix = parent.label.clone();
            parent.children = finished
                .into_iter()
                .map(|(_, child)| prepend_label(&prefix, child))
                .collect();
        }
    }

    /// Unwind everything into the root and return it.
    pub fn collapse(mut self) -> Node {
        while self.levels.len() > 1 {
            self.unwind();
        }
        match self.levels.pop().and_then(|mut level| {
            if level.is_empty() {
                None
            } else {
                Some(level.remove(0).1)
            }
        }) {
            Some(root) => root,
            None => Node::default(),
        }
    }
}

/// Recursively prepend `prefix` to the label of `node` and its children.
fn prepend_label(prefix: &[String], mut node: Node) -> Node {
    let mut label = prefix.to_vec();
    label.append(&mut node.label);
    node.label = label;
    node.children = node
        .children
        .into_iter()
        .map(|child| prepend_label(prefix, child))
        .collect();
    node
}

/// Build the nested tree for one section.
///
/// `nodes` holds one flat node per marker occurrence, labeled with its own
/// marker; `solution` supplies the matching depths. Star occurrences are
/// skipped, markerless occurrences are relabeled with synthetic sequential
/// `p1`, `p2`, ... identifiers, and emphasis tags are stripped from labels.
pub fn build_hierarchy(root: Node, nodes: Vec<Node>, solution: &Solution) -> Node {
    let mut stack = NodeStack::new(root);
    let mut unlabeled = 0;
    for (mut node, par) in nodes.into_iter().zip(solution.assignment.iter()) {
        if par.typ.is_stars() {
            continue;
        }
        let marker = node.label.first().cloned().unwrap_or_default();
        node.label = vec![clean_label(&marker, &mut unlabeled)];
        stack.add(1 + par.depth, node);
    }
    stack.collapse()
}

/// Remove parsing artifacts from a marker before it becomes a label part.
fn clean_label(marker: &str, unlabeled: &mut usize) -> String {
    if marker == markers::MARKERLESS {
        *unlabeled += 1;
        format!("p{}", unlabeled)
    } else {
        markers::deemphasize(marker)
    }
}

/// Derive depths for a section's nodes and assemble the hierarchy.
///
/// Trailing stars carry no structure and are dropped before solving. An
/// infeasible marker sequence is logged and flattened to a single level so
/// one malformed section cannot abort the surrounding document build;
/// unknown markers and malformed solutions still surface as errors.
pub fn derive_and_build(
    root: Node,
    mut nodes: Vec<Node>,
    additional: &[OptionalRule],
) -> DepthResult<Node> {
    while nodes
        .last()
        .and_then(|node| node.label.first())
        .map_or(false, |marker| {
            markers::MarkerType::Stars.index_of(marker).is_some()
        })
    {
        nodes.pop();
    }
    if nodes.is_empty() {
        return Ok(root);
    }

    let marker_list: Vec<String> = nodes
        .iter()
        .map(|node| node.label.first().cloned().unwrap_or_default())
        .collect();
    let solutions = derive::derive_depths(&marker_list, additional)?;
    let best = match derive::select_solution(solutions) {
        Some(best) => best,
        None => {
            error!(markers = ?marker_list, "could not determine paragraph depths");
            derive::fallback_solution(&marker_list)
        }
    };
    best.validate()?;
    Ok(build_hierarchy(root, nodes, &best))
}
