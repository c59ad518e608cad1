//! Exhaustive search over the constraint model
//!
//! The domains are tiny: a handful of candidate alphabets per occurrence
//! and depths bounded by [`MAX_DEPTH`]. Backtracking walks the occurrences
//! in order, trying every candidate `(type, index)` against every
//! reachable depth; the pairwise, triple and prefix rules prune during the
//! descent and the per-level rules filter completed assignments. Worst
//! case is exponential in the number of ambiguous occurrences, which is
//! acceptable for the bounded marker lists of a single section.
//!
//! Every satisfying assignment is returned; the solver never truncates.
//! Disambiguation is the ranker's job, and an empty result is a signal the
//! caller recovers from, not an error here.

use crate::depth::derive::{ParAssignment, Solution};
use crate::depth::markers::{MarkerType, MAX_DEPTH};
use crate::depth::optional_rules::OptionalRule;
use crate::depth::rules;

/// Every full assignment satisfying the core rules and `additional`,
/// weight 1.0, in enumeration order (candidates in registry priority
/// order, depths ascending).
pub fn solve(
    domains: &[Vec<(MarkerType, usize)>],
    additional: &[OptionalRule],
) -> Vec<Solution> {
    let mut solutions = Vec::new();
    if domains.is_empty() {
        return solutions;
    }
    let mut partial = Vec::with_capacity(domains.len());
    search(domains, additional, &mut partial, &mut solutions);
    solutions
}

fn search(
    domains: &[Vec<(MarkerType, usize)>],
    additional: &[OptionalRule],
    partial: &mut Vec<ParAssignment>,
    solutions: &mut Vec<Solution>,
) {
    let position = partial.len();
    if position == domains.len() {
        if accepts_whole(partial, additional) {
            solutions.push(Solution::new(partial.clone()));
        }
        return;
    }

    // The first paragraph anchors the tree at 0; afterwards depth can step
    // at most one level past the predecessor
    let depth_ceiling = match partial.last() {
        Some(prev) => (prev.depth + 1).min(MAX_DEPTH - 1),
        None => 0,
    };
    for &(typ, idx) in &domains[position] {
        for depth in 0..=depth_ceiling {
            let cur = ParAssignment::new(typ, idx, depth);
            if satisfies_prefix(partial, &cur, additional) {
                partial.push(cur);
                search(domains, additional, partial, solutions);
                partial.pop();
            }
        }
    }
}

fn satisfies_prefix(
    prefix: &[ParAssignment],
    cur: &ParAssignment,
    additional: &[OptionalRule],
) -> bool {
    if let Some(prev) = prefix.last() {
        if !rules::sequential_depth(prev, cur)
            || !rules::markerless_adjacency(prev, cur)
            || !rules::continue_or_open(prefix, cur)
        {
            return false;
        }
        if prefix.len() >= 2 && !rules::markerless_sandwich(&prefix[prefix.len() - 2], prev, cur)
        {
            return false;
        }
    }
    additional.iter().all(|rule| match rule {
        OptionalRule::PerMarker(check) => check(prefix, cur),
        OptionalRule::Whole(_) => true,
    })
}

fn accepts_whole(assignment: &[ParAssignment], additional: &[OptionalRule]) -> bool {
    rules::sibling_type_uniformity(assignment)
        && rules::stars_occupy_slots(assignment)
        && additional.iter().all(|rule| match rule {
            OptionalRule::PerMarker(_) => true,
            OptionalRule::Whole(check) => check(assignment),
        })
}
