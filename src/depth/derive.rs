//! Deriving paragraph depths from a flat marker sequence
//!
//! The entry point is [`derive_depths`]: collapse repeated markerless
//! occurrences, look up each marker's candidate alphabets, hand the model to
//! the solver, and expand every satisfying assignment back to the original
//! positions. Ranking and selection live in [`select_solution`]; the
//! degenerate flat assignment used when nothing satisfies the constraints
//! is [`fallback_solution`].

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::depth::error::{DepthError, DepthResult};
use crate::depth::heuristics;
use crate::depth::markers::{self, MarkerType, MAX_DEPTH};
use crate::depth::optional_rules::OptionalRule;
use crate::depth::solver;

/// A paragraph's resolved type, index and depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ParAssignment {
    pub typ: MarkerType,
    /// Position within the alphabet of `typ`
    pub idx: usize,
    pub depth: usize,
}

impl ParAssignment {
    pub fn new(typ: MarkerType, idx: usize, depth: usize) -> ParAssignment {
        ParAssignment { typ, idx, depth }
    }

    /// The marker string this assignment resolves to.
    pub fn marker(&self) -> &'static str {
        &self.typ.alphabet()[self.idx]
    }
}

/// A full assignment for a marker sequence plus a weight for how likely it
/// is once heuristics have been applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub assignment: Vec<ParAssignment>,
    pub weight: f64,
}

impl Solution {
    pub fn new(assignment: Vec<ParAssignment>) -> Solution {
        Solution {
            assignment,
            weight: 1.0,
        }
    }

    /// Immutable copy with a discounted weight
    pub fn copy_with_penalty(&self, penalty: f64) -> Solution {
        Solution {
            assignment: self.assignment.clone(),
            weight: self.weight * (1.0 - penalty),
        }
    }

    /// The per-paragraph depths, in input order.
    pub fn depths(&self) -> Vec<usize> {
        self.assignment.iter().map(|a| a.depth).collect()
    }

    /// Check internal invariants. A failure here is a solver defect, not a
    /// property of the input.
    pub fn validate(&self) -> DepthResult<()> {
        if let Some(first) = self.assignment.first() {
            if first.depth != 0 {
                return Err(DepthError::MalformedSolution {
                    detail: format!("first paragraph at depth {}, expected 0", first.depth),
                });
            }
        }
        for (position, par) in self.assignment.iter().enumerate() {
            if par.depth >= MAX_DEPTH {
                return Err(DepthError::MalformedSolution {
                    detail: format!("depth {} at position {} out of bounds", par.depth, position),
                });
            }
            if par.idx >= par.typ.alphabet().len() {
                return Err(DepthError::MalformedSolution {
                    detail: format!(
                        "index {} at position {} outside the {:?} alphabet",
                        par.idx, position, par.typ
                    ),
                });
            }
        }
        Ok(())
    }

    fn expand(&self, mapping: &[usize]) -> Solution {
        Solution {
            assignment: mapping.iter().map(|&i| self.assignment[i]).collect(),
            weight: self.weight,
        }
    }
}

/// Collapse runs of consecutive markerless markers into a single occurrence.
///
/// Repeated unlabeled paragraphs stand for one logical slot, not a chain of
/// ever-deeper levels, so they share one variable in the model. Returns the
/// collapsed list and, per original position, the collapsed occurrence it
/// maps to.
fn collapse_markerless<S: AsRef<str>>(marker_list: &[S]) -> (Vec<String>, Vec<usize>) {
    let mut collapsed: Vec<String> = Vec::new();
    let mut mapping = Vec::with_capacity(marker_list.len());
    for marker in marker_list {
        let marker = marker.as_ref();
        let repeat = marker == markers::MARKERLESS
            && collapsed.last().map(String::as_str) == Some(markers::MARKERLESS);
        if !repeat {
            collapsed.push(marker.to_string());
        }
        mapping.push(collapsed.len() - 1);
    }
    (collapsed, mapping)
}

/// Use constraint solving to derive the paragraph depths associated with a
/// list of paragraph markers.
///
/// Every satisfying assignment is returned, weight 1.0, in enumeration
/// order; ambiguity is resolved by ranking, not here. An empty result means
/// the sequence is structurally inconsistent, which callers treat as
/// recoverable. Additional caller-supplied constraints (expected marker
/// types per document family, etc.) are injected into the same variable set
/// before solving.
pub fn derive_depths<S: AsRef<str>>(
    marker_list: &[S],
    additional: &[OptionalRule],
) -> DepthResult<Vec<Solution>> {
    if marker_list.is_empty() {
        return Ok(Vec::new());
    }
    let (collapsed, mapping) = collapse_markerless(marker_list);

    let mut domains = Vec::with_capacity(collapsed.len());
    for (collapsed_position, marker) in collapsed.iter().enumerate() {
        let cands = markers::candidates(marker);
        if cands.is_empty() {
            // Report the first original position that maps here
            let position = mapping
                .iter()
                .position(|&c| c == collapsed_position)
                .unwrap_or(collapsed_position);
            return Err(DepthError::AmbiguousMarker {
                marker: marker.clone(),
                position,
            });
        }
        domains.push(cands);
    }

    let solutions = solver::solve(&domains, additional);
    debug!(
        markers = collapsed.len(),
        solutions = solutions.len(),
        "derived depth solutions"
    );
    Ok(solutions.iter().map(|s| s.expand(&mapping)).collect())
}

/// Rank solutions with the standard heuristics and pick the best.
///
/// Ties are broken by the lexicographically smallest depth sequence, then
/// by assignment order, so selection is deterministic regardless of the
/// order the solver found them in.
pub fn select_solution(solutions: Vec<Solution>) -> Option<Solution> {
    let solutions = heuristics::prefer_same_type_same_level(solutions, 0.8);
    let solutions = heuristics::prefer_diff_types_diff_levels(solutions, 0.8);
    let mut solutions = heuristics::prefer_multiple_children(solutions, 0.4);
    solutions.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.depths().cmp(&b.depths()))
            .then_with(|| a.assignment.cmp(&b.assignment))
    });
    solutions.into_iter().next()
}

/// Degenerate single-level assignment: every paragraph at depth 0, each
/// marker resolved to its highest-priority alphabet. Used when the solver
/// finds nothing, so one malformed section flattens instead of failing the
/// whole document.
pub fn fallback_solution<S: AsRef<str>>(marker_list: &[S]) -> Solution {
    let assignment = marker_list
        .iter()
        .map(|marker| {
            let (typ, idx) = markers::candidates(marker.as_ref())
                .into_iter()
                .next()
                .unwrap_or((MarkerType::Markerless, 0));
            ParAssignment::new(typ, idx, 0)
        })
        .collect();
    Solution::new(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_solutions() {
        let solutions = derive_depths::<&str>(&[], &[]).unwrap();
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_single_marker_is_depth_zero() {
        let solutions = derive_depths(&["a"], &[]).unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(
            solutions[0].assignment,
            vec![ParAssignment::new(MarkerType::Lower, 0, 0)]
        );
        assert_eq!(solutions[0].weight, 1.0);
    }

    #[test]
    fn test_unknown_marker_is_surfaced() {
        let err = derive_depths(&["a", "(b)"], &[]).unwrap_err();
        assert_eq!(
            err,
            DepthError::AmbiguousMarker {
                marker: "(b)".to_string(),
                position: 1,
            }
        );
    }

    #[test]
    fn test_collapse_markerless_runs() {
        let (collapsed, mapping) = collapse_markerless(&[
            "a",
            markers::MARKERLESS,
            markers::MARKERLESS,
            markers::MARKERLESS,
            "b",
        ]);
        assert_eq!(collapsed, vec!["a", markers::MARKERLESS, "b"]);
        assert_eq!(mapping, vec![0, 1, 1, 1, 2]);
    }

    #[test]
    fn test_collapsed_repeats_share_one_assignment() {
        let solutions =
            derive_depths(&["a", markers::MARKERLESS, markers::MARKERLESS], &[]).unwrap();
        for solution in &solutions {
            assert_eq!(solution.assignment.len(), 3);
            assert_eq!(solution.assignment[1], solution.assignment[2]);
        }
    }

    #[test]
    fn test_separated_markerless_does_not_collapse() {
        let (collapsed, mapping) =
            collapse_markerless(&[markers::MARKERLESS, "a", markers::MARKERLESS]);
        assert_eq!(collapsed.len(), 3);
        assert_eq!(mapping, vec![0, 1, 2]);
    }

    #[test]
    fn test_validate_rejects_nonzero_root() {
        let solution = Solution::new(vec![ParAssignment::new(MarkerType::Lower, 0, 1)]);
        assert!(matches!(
            solution.validate(),
            Err(DepthError::MalformedSolution { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let solution = Solution::new(vec![
            ParAssignment::new(MarkerType::Lower, 0, 0),
            ParAssignment::new(MarkerType::Lower, 26, 0),
        ]);
        assert!(matches!(
            solution.validate(),
            Err(DepthError::MalformedSolution { .. })
        ));
    }

    #[test]
    fn test_copy_with_penalty_is_immutable() {
        let solution = Solution::new(vec![ParAssignment::new(MarkerType::Lower, 0, 0)]);
        let docked = solution.copy_with_penalty(0.25);
        assert_eq!(solution.weight, 1.0);
        assert_eq!(docked.weight, 0.75);
        assert_eq!(docked.assignment, solution.assignment);
    }

    #[test]
    fn test_fallback_is_flat() {
        let solution = fallback_solution(&["a", "??", markers::STARS_TAG]);
        assert_eq!(solution.depths(), vec![0, 0, 0]);
        assert_eq!(solution.assignment[0].typ, MarkerType::Lower);
        // Unknown strings degrade to markerless rather than guessing
        assert_eq!(solution.assignment[1].typ, MarkerType::Markerless);
        assert_eq!(solution.assignment[2].typ, MarkerType::Stars);
    }
}
