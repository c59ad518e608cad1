//! Content nodes for the assembled hierarchy
//!
//! Nodes arrive flat from the upstream tokenizer, one per marker
//! occurrence, each labeled with just its own marker. Assembly nests them
//! and grows each label into the full marker path from the root.

use serde::{Deserialize, Serialize};

/// A labeled unit of regulation text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Marker path from the root to this node
    pub label: Vec<String>,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(label: Vec<String>, text: &str) -> Node {
        Node {
            label,
            text: text.to_string(),
            children: Vec::new(),
        }
    }

    /// Node for one marker occurrence, before any nesting
    pub fn with_marker(marker: &str, text: &str) -> Node {
        Node::new(vec![marker.to_string()], text)
    }

    /// The label path joined for display and lookup, e.g. `a-1-i`
    pub fn label_id(&self) -> String {
        self.label.join("-")
    }
}
