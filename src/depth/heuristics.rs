//! Heuristics for ranking depth solutions
//!
//! Constraints forbid; heuristics prefer. Genuine documents occasionally
//! use the same alphabet on two levels or leave a parent with a single
//! child, so none of these can be hard rules. Each pass multiplies the
//! weight of less-preferred solutions down in proportion to how many
//! violations they carry and leaves violation-free solutions untouched.

use crate::depth::derive::Solution;
use crate::depth::markers::MarkerType;
use std::collections::{BTreeMap, BTreeSet};

/// Dock solutions in which one alphabet appears at several depths. Sibling
/// runs of one type almost always sit at one level across a section.
pub fn prefer_same_type_same_level(solutions: Vec<Solution>, penalty: f64) -> Vec<Solution> {
    solutions
        .into_iter()
        .map(|solution| {
            let mut depths_per_type: BTreeMap<MarkerType, BTreeSet<usize>> = BTreeMap::new();
            for par in &solution.assignment {
                if par.typ.is_enumerated() {
                    depths_per_type.entry(par.typ).or_default().insert(par.depth);
                }
            }
            let flags: usize = depths_per_type.values().map(|depths| depths.len() - 1).sum();
            dock(solution, penalty, flags)
        })
        .collect()
}

/// Dock solutions in which several alphabets share one depth. Stars and
/// markerless paragraphs are transparent and justify nothing either way.
pub fn prefer_diff_types_diff_levels(solutions: Vec<Solution>, penalty: f64) -> Vec<Solution> {
    solutions
        .into_iter()
        .map(|solution| {
            let mut types_per_depth: BTreeMap<usize, BTreeSet<MarkerType>> = BTreeMap::new();
            for par in &solution.assignment {
                if par.typ.is_enumerated() {
                    types_per_depth.entry(par.depth).or_default().insert(par.typ);
                }
            }
            let flags: usize = types_per_depth.values().map(|types| types.len() - 1).sum();
            dock(solution, penalty, flags)
        })
        .collect()
}

/// Dock solutions containing parents with exactly one child. Singleton
/// chains are structurally suspicious; real nesting usually enumerates at
/// least two siblings.
pub fn prefer_multiple_children(solutions: Vec<Solution>, penalty: f64) -> Vec<Solution> {
    solutions
        .into_iter()
        .map(|solution| {
            let depths = solution.depths();
            let mut flags = 0;
            for (i, &depth) in depths.iter().enumerate() {
                let mut direct_children = 0;
                for &later in &depths[i + 1..] {
                    if later == depth {
                        break;
                    }
                    if later == depth + 1 {
                        direct_children += 1;
                    }
                }
                if direct_children == 1 {
                    flags += 1;
                }
            }
            dock(solution, penalty, flags)
        })
        .collect()
}

/// Scale `penalty` by the violation share and apply it. Zero flags leaves
/// the weight untouched.
fn dock(solution: Solution, penalty: f64, flags: usize) -> Solution {
    let total = solution.assignment.len();
    if flags == 0 || total == 0 {
        solution
    } else {
        solution.copy_with_penalty(penalty * flags as f64 / total as f64)
    }
}
