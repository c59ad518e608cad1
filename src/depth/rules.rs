//! Constraints on paragraph depth discovery
//!
//! Each rule is a pure function over resolved bindings. The solver checks
//! the pairwise, triple and prefix rules while descending and the per-level
//! rules once a candidate assignment is complete. Rules forbid; preference
//! between surviving assignments belongs to the heuristics.

use crate::depth::derive::ParAssignment;
use crate::depth::markers::{MarkerType, MAX_DEPTH};

/// Depth may decrease freely, stay level for sibling continuations or star
/// neighbors, or step exactly one level deeper when the type changes or the
/// newcomer is a star.
pub fn sequential_depth(prev: &ParAssignment, cur: &ParAssignment) -> bool {
    let dec = cur.depth < prev.depth;
    let cont = cur.depth == prev.depth
        && (prev.typ == cur.typ || prev.typ.is_stars() || cur.typ.is_stars());
    let incr =
        cur.depth == prev.depth + 1 && (prev.typ != cur.typ || cur.typ.is_stars());
    dec || cont || incr
}

/// A markerless paragraph following another markerless paragraph sits at
/// exactly the same level; otherwise it may not skip levels downward.
pub fn markerless_adjacency(prev: &ParAssignment, cur: &ParAssignment) -> bool {
    if cur.typ.is_markerless() {
        if prev.typ == cur.typ {
            prev.depth == cur.depth
        } else {
            cur.depth <= prev.depth + 1
        }
    } else {
        true
    }
}

/// A markerless paragraph cannot silently occupy an intermediate level
/// between two one-level descents; it has no marker to represent that slot.
pub fn markerless_sandwich(
    pprev: &ParAssignment,
    prev: &ParAssignment,
    cur: &ParAssignment,
) -> bool {
    !(prev.typ.is_markerless()
        && pprev.depth + 1 == prev.depth
        && prev.depth + 1 == cur.depth)
}

/// Relevant ancestors of the end of `prefix`: the nearest binding at each
/// depth, with deeper slots cleared whenever a shallower level resumes.
/// E.g. the sequence 1, i, a, ii, A leaves 1, ii, A.
pub fn ancestors(prefix: &[ParAssignment]) -> Vec<ParAssignment> {
    let mut slots: [Option<ParAssignment>; MAX_DEPTH] = [None; MAX_DEPTH];
    for par in prefix {
        slots[par.depth] = Some(*par);
        for slot in slots.iter_mut().skip(par.depth + 1) {
            *slot = None;
        }
    }
    slots.into_iter().flatten().collect()
}

/// Constraints tying a marker to everything before it.
///
/// A marker either continues a sibling sequence begun by one of its
/// ancestors (same type, same depth, next index), opens a fresh level at
/// index 0 one step deeper, or falls under the star/markerless transparency
/// rules. `prefix` must be non-empty.
pub fn continue_or_open(prefix: &[ParAssignment], cur: &ParAssignment) -> bool {
    let prev = match prefix.last() {
        Some(prev) => prev,
        None => return true,
    };

    if cur.typ == prev.typ {
        if cur.typ.is_stars() {
            // Stars can't repeat at the same level; a new level may only
            // open after an inline star
            cur.depth < prev.depth || (prev.idx == 1 && cur.depth == prev.depth + 1)
        } else if cur.typ.is_markerless() {
            cur.depth == prev.depth
        } else {
            continues_ancestor(prefix, cur)
        }
    } else if cur.idx == 0 && cur.depth == prev.depth + 1 {
        // Starting a new type one level down
        true
    } else if cur.typ.is_stars() {
        // Stars can't skip levels forward
        cur.depth <= prev.depth + 1
    } else if prev.typ.is_stars() && cur.depth == prev.depth {
        // Following stars at the same level
        true
    } else if cur.typ.is_markerless() {
        cur.depth <= prev.depth + 1
    } else {
        continues_ancestor(prefix, cur)
    }
}

/// Does `cur` continue a sequence some ancestor started?
fn continues_ancestor(prefix: &[ParAssignment], cur: &ParAssignment) -> bool {
    ancestors(prefix)
        .iter()
        .any(|a| a.typ == cur.typ && a.depth == cur.depth && cur.idx == a.idx + 1)
}

/// Indices of the assignments sharing one level (the run at the depth of
/// the group's first member), with the segments nested under them.
///
/// Built once per candidate assignment; the per-level rules and the ranker
/// all walk the same grouping rather than re-partitioning ad hoc.
#[derive(Debug, PartialEq, Eq)]
pub struct LevelGroup {
    pub members: Vec<usize>,
    pub children: Vec<LevelGroup>,
}

impl LevelGroup {
    pub fn build(assignment: &[ParAssignment]) -> LevelGroup {
        Self::from_indices(assignment, (0..assignment.len()).collect())
    }

    fn from_indices(assignment: &[ParAssignment], indices: Vec<usize>) -> LevelGroup {
        let mut members = Vec::new();
        let mut children = Vec::new();
        let mut segment: Vec<usize> = Vec::new();

        let level_depth = match indices.first() {
            Some(&first) => assignment[first].depth,
            None => {
                return LevelGroup {
                    members,
                    children,
                }
            }
        };
        for i in indices {
            if assignment[i].depth == level_depth {
                if !segment.is_empty() {
                    children.push(Self::from_indices(assignment, std::mem::take(&mut segment)));
                }
                members.push(i);
            } else {
                segment.push(i);
            }
        }
        if !segment.is_empty() {
            children.push(Self::from_indices(assignment, segment));
        }
        LevelGroup { members, children }
    }
}

/// All markers in one level share a single type, with one exception: stars
/// may co-occur with exactly one other type. A level may also not reuse its
/// parent level's type.
pub fn sibling_type_uniformity(assignment: &[ParAssignment]) -> bool {
    fn per_level(
        assignment: &[ParAssignment],
        group: &LevelGroup,
        parent_type: Option<MarkerType>,
    ) -> bool {
        if group.members.is_empty() {
            return true;
        }
        let mut types: Vec<MarkerType> = group.members.iter().map(|&i| assignment[i].typ).collect();
        types.sort();
        types.dedup();
        // Stars sort last so types[0] names the level's real type
        types.sort_by_key(|t| t.is_stars());

        if types.len() > 2 {
            return false;
        }
        if types.len() == 2 && !types[1].is_stars() {
            return false;
        }
        if let Some(parent) = parent_type {
            if !parent.is_stars() && types.contains(&parent) {
                return false;
            }
        }
        group
            .children
            .iter()
            .all(|child| per_level(assignment, child, Some(types[0])))
    }

    per_level(assignment, &LevelGroup::build(assignment), None)
}

/// Block stars consume a position in a sibling sequence, so `1, STARS, 2`
/// cannot share a level: the stars already filled the slot "2" claims.
/// Inline stars read as trailing text and occupy nothing.
pub fn stars_occupy_slots(assignment: &[ParAssignment]) -> bool {
    fn per_level(assignment: &[ParAssignment], group: &LevelGroup) -> bool {
        let mut last_idx: i64 = -1;
        for &i in &group.members {
            let par = &assignment[i];
            if par.typ.is_stars() {
                if par.idx == 0 {
                    // STARS tag, not the inline variant
                    last_idx += 1;
                }
            } else if !par.typ.is_markerless() && last_idx >= par.idx as i64 {
                return false;
            } else {
                last_idx = par.idx as i64;
            }
        }
        group
            .children
            .iter()
            .all(|child| per_level(assignment, child))
    }

    per_level(assignment, &LevelGroup::build(assignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::markers::MarkerType::{Arabic, Lower, Markerless, Roman, Stars, Upper};

    fn par(typ: MarkerType, idx: usize, depth: usize) -> ParAssignment {
        ParAssignment::new(typ, idx, depth)
    }

    #[test]
    fn test_sequential_depth_steps() {
        let a = par(Lower, 0, 0);
        // Same type continues at the same depth
        assert!(sequential_depth(&a, &par(Lower, 1, 0)));
        // ... but can't open a deeper level
        assert!(!sequential_depth(&a, &par(Lower, 1, 1)));
        // A different type steps exactly one deeper
        assert!(sequential_depth(&a, &par(Arabic, 0, 1)));
        assert!(!sequential_depth(&par(Lower, 0, 1), &par(Arabic, 0, 3)));
        // Decrease is always allowed
        assert!(sequential_depth(&par(Arabic, 0, 3), &par(Lower, 1, 0)));
        // A different type can't sit level without a star involved
        assert!(!sequential_depth(&a, &par(Arabic, 0, 0)));
        assert!(sequential_depth(&par(Stars, 0, 0), &par(Arabic, 0, 0)));
    }

    #[test]
    fn test_markerless_adjacency() {
        let m = par(Markerless, 0, 1);
        assert!(markerless_adjacency(&par(Markerless, 0, 1), &m));
        assert!(!markerless_adjacency(&par(Markerless, 0, 0), &m));
        // After a marked paragraph, one level down at most
        assert!(markerless_adjacency(&par(Lower, 0, 0), &m));
        assert!(!markerless_adjacency(&par(Lower, 0, 0), &par(Markerless, 0, 2)));
        // Rule only concerns markerless paragraphs
        assert!(markerless_adjacency(&m, &par(Lower, 0, 5)));
    }

    #[test]
    fn test_markerless_sandwich() {
        assert!(!markerless_sandwich(
            &par(Lower, 0, 0),
            &par(Markerless, 0, 1),
            &par(Arabic, 0, 2),
        ));
        // Level sandwich is fine
        assert!(markerless_sandwich(
            &par(Lower, 0, 0),
            &par(Markerless, 0, 1),
            &par(Arabic, 0, 1),
        ));
        // Marked middles are not the sandwich pattern
        assert!(markerless_sandwich(
            &par(Lower, 0, 0),
            &par(Arabic, 0, 1),
            &par(Roman, 0, 2),
        ));
    }

    #[test]
    fn test_ancestors_keeps_nearest_per_depth() {
        // 1, i, a, ii, A: resuming ii at depth 1 clears a, leaving 1, ii, A
        let prefix = vec![
            par(Arabic, 0, 0),
            par(Roman, 0, 1),
            par(Lower, 0, 2),
            par(Roman, 1, 1),
            par(Upper, 0, 2),
        ];
        assert_eq!(
            ancestors(&prefix),
            vec![par(Arabic, 0, 0), par(Roman, 1, 1), par(Upper, 0, 2)]
        );
    }

    #[test]
    fn test_continue_or_open_sibling_continuation() {
        let prefix = vec![par(Lower, 0, 0), par(Arabic, 0, 1)];
        // b resumes the lower sequence at depth 0
        assert!(continue_or_open(&prefix, &par(Lower, 1, 0)));
        // c does not follow a
        assert!(!continue_or_open(&prefix, &par(Lower, 2, 0)));
        // 2 continues the arabic sequence in place
        assert!(continue_or_open(&prefix, &par(Arabic, 1, 1)));
    }

    #[test]
    fn test_continue_or_open_new_level() {
        let prefix = vec![par(Lower, 0, 0)];
        assert!(continue_or_open(&prefix, &par(Arabic, 0, 1)));
        // New levels start at index 0
        assert!(!continue_or_open(&prefix, &par(Arabic, 1, 1)));
    }

    #[test]
    fn test_continue_or_open_stars() {
        // Block stars can't repeat at one level
        let prefix = vec![par(Lower, 0, 0), par(Stars, 0, 1)];
        assert!(!continue_or_open(&prefix, &par(Stars, 0, 1)));
        assert!(continue_or_open(&prefix, &par(Stars, 0, 0)));
        // A deeper star level only opens after an inline star
        let inline = vec![par(Lower, 0, 0), par(Stars, 1, 1)];
        assert!(continue_or_open(&inline, &par(Stars, 0, 2)));
    }

    #[test]
    fn test_level_group_segments_children() {
        let assignment = vec![
            par(Lower, 0, 0),
            par(Arabic, 0, 1),
            par(Arabic, 1, 1),
            par(Lower, 1, 0),
            par(Arabic, 0, 1),
        ];
        let group = LevelGroup::build(&assignment);
        assert_eq!(group.members, vec![0, 3]);
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[0].members, vec![1, 2]);
        assert_eq!(group.children[1].members, vec![4]);
    }

    #[test]
    fn test_sibling_type_uniformity() {
        // a / 1, 2 / b
        assert!(sibling_type_uniformity(&[
            par(Lower, 0, 0),
            par(Arabic, 0, 1),
            par(Arabic, 1, 1),
            par(Lower, 1, 0),
        ]));
        // Mixed enumerated types on one level
        assert!(!sibling_type_uniformity(&[
            par(Lower, 0, 0),
            par(Arabic, 0, 1),
            par(Roman, 0, 1),
        ]));
        // Stars may share a level with one other type
        assert!(sibling_type_uniformity(&[
            par(Lower, 0, 0),
            par(Arabic, 0, 1),
            par(Stars, 0, 1),
        ]));
        // A child level may not reuse its parent's type
        assert!(!sibling_type_uniformity(&[
            par(Lower, 0, 0),
            par(Stars, 0, 1),
            par(Lower, 1, 1),
        ]));
    }

    #[test]
    fn test_stars_occupy_slots() {
        // 1, STARS, 2 on one level: the stars filled slot 1 already
        assert!(!stars_occupy_slots(&[
            par(Arabic, 0, 0),
            par(Stars, 0, 0),
            par(Arabic, 1, 0),
        ]));
        // ... leaving room for 3 works
        assert!(stars_occupy_slots(&[
            par(Arabic, 0, 0),
            par(Stars, 0, 0),
            par(Arabic, 2, 0),
        ]));
        // Inline stars occupy nothing
        assert!(stars_occupy_slots(&[
            par(Arabic, 0, 0),
            par(Stars, 1, 0),
            par(Arabic, 1, 0),
        ]));
    }
}
