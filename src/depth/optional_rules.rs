//! Caller-supplied constraints layered onto the solver's variable set
//!
//! Document families carry a priori expectations the core rules don't:
//! regulation text and interpretations enumerate their levels in known
//! orders, some sources never use certain alphabets, and so on. These
//! rules are injected per derivation call and evaluated alongside the core
//! rules; they also tend to shrink the search space considerably.

use std::collections::HashMap;

use crate::depth::derive::ParAssignment;
use crate::depth::markers::MarkerType;

/// An additional constraint scoped to one derivation call.
pub enum OptionalRule {
    /// Checked as each occurrence is bound; sees the already-bound prefix
    /// and the newest binding.
    PerMarker(Box<dyn Fn(&[ParAssignment], &ParAssignment) -> bool + Send + Sync>),
    /// Checked once per complete candidate assignment.
    Whole(Box<dyn Fn(&[ParAssignment]) -> bool + Send + Sync>),
}

/// Restrict which alphabets may appear at all.
pub fn limit_paragraph_types(types: Vec<MarkerType>) -> OptionalRule {
    OptionalRule::PerMarker(Box::new(move |_, cur| types.contains(&cur.typ)))
}

/// The same alphabet may not reappear at a different depth anywhere in the
/// section. Stars and markerless paragraphs are exempt; they belong to no
/// sequence.
pub fn unique_type_per_depth() -> OptionalRule {
    OptionalRule::Whole(Box::new(|assignment| {
        let mut depth_by_type: HashMap<MarkerType, usize> = HashMap::new();
        for par in assignment {
            if !par.typ.is_enumerated() {
                continue;
            }
            match depth_by_type.insert(par.typ, par.depth) {
                Some(seen) if seen != par.depth => return false,
                _ => {}
            }
        }
        true
    }))
}

/// Bound the index gap between consecutive same-level siblings. Documents
/// that elide paragraphs mark the elision with stars, so a caller may
/// demand near-contiguous sequences.
pub fn limit_sequence_gap(size: usize) -> OptionalRule {
    let size = size.max(1);
    OptionalRule::PerMarker(Box::new(move |prefix, cur| match prefix.last() {
        Some(prev)
            if cur.typ.is_enumerated() && prev.typ == cur.typ && prev.depth == cur.depth =>
        {
            cur.idx > prev.idx && cur.idx - prev.idx <= size
        }
        _ => true,
    }))
}

/// Constrain each depth to an expected set of alphabets, e.g. regulation
/// text runs lower/arabic/roman/upper while interpretations lead with
/// arabic. Stars pass anywhere. Also caps depth at the order's length.
pub fn depth_type_order(order: Vec<Vec<MarkerType>>) -> OptionalRule {
    OptionalRule::PerMarker(Box::new(move |_, cur| {
        cur.depth < order.len() && (cur.typ.is_stars() || order[cur.depth].contains(&cur.typ))
    }))
}
