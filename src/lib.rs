//! # regdepth
//!
//! Paragraph depth inference for regulatory text.
//!
//! Regulations enumerate paragraphs with markers -- (a), (1), (i), their
//! emphasized variants, star placeholders for elided text -- but the raw
//! source carries no indentation, and the marker alphabets overlap ("i" is
//! both a letter and a roman numeral). This crate recovers the implied
//! nesting: classify each marker against the alphabet registry, build a
//! constraint model over type and depth variables, enumerate every
//! satisfying assignment, rank the candidates with document-shape
//! heuristics, and fold the winner into a node tree.
//!
//! The upstream tokenizer supplies the marker strings and content nodes;
//! downstream processors consume the assembled hierarchy. Both live
//! outside this crate.

pub mod depth;
pub mod tree;

pub use depth::derive::{derive_depths, select_solution, ParAssignment, Solution};
pub use depth::error::{DepthError, DepthResult};
pub use depth::markers::MarkerType;
pub use tree::assemble::{build_hierarchy, derive_and_build};
pub use tree::node::Node;
