//! Lexicographic-minimality ("canonical form") testing.
//!
//! Isomorph-free generation needs, at every pick, a cheap answer to "is this
//! the lexicographically smallest labeling of the triangulation built so
//! far?" so that each isomorphism class is only ever emitted once. A
//! relabeling is a permutation of the vertex set that sends the root edge
//! `(0,1)` to some other edge `(v0,v1)` of matching link-degree; the current
//! labeling is canonical only if no such relabeling produces a strictly
//! lexicographically smaller pick sequence.

use std::cmp::Ordering;

use crate::complex::ComplexState;
use crate::types::{Tetrahedron, VertexIdx};

/// Tracks how many times [`Canonicity::is_min_lex`] has run, for the
/// search's end-of-run summary.
#[derive(Debug, Default)]
pub struct Canonicity {
    ncalls_min_lex: usize,
}

impl Canonicity {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn ncalls_min_lex(&self) -> usize {
        self.ncalls_min_lex
    }

    /// Whether the picked complex `P`'s current vertex labeling is
    /// lexicographically minimal among every relabeling that sends the root
    /// edge `(0,1)` to a complete edge `(v0,v1)` of the same link-degree.
    ///
    /// The root fan occupies the first `d = deg12[0,1]` entries of the pick
    /// list identically under every such relabeling (they are, by
    /// construction, a cyclic fan around whichever edge plays the role of
    /// `(0,1)`), so comparison starts at index `d`.
    pub fn is_min_lex(&mut self, complex: &ComplexState) -> bool {
        self.ncalls_min_lex += 1;
        let picked = complex.picked();
        if picked.len() < 2 {
            return true;
        }
        let nv = complex.nv_p();
        let d = complex.degree12_p(0, 1);
        if d == 0 || picked.len() < d {
            return true;
        }

        for v0 in 0..nv {
            if !complex.is_complete_p(v0) {
                continue;
            }
            for v1 in 0..nv {
                if v1 == v0 || !complex.is_complete_p(v1) {
                    continue;
                }
                if complex.degree12_p(v0, v1) != d {
                    continue;
                }
                let Some(cycle) = edge_link_cycle(complex, v0, v1) else {
                    continue;
                };
                if cycle.len() != d {
                    continue;
                }
                for start in 0..d {
                    for &reversed in &[false, true] {
                        if seed_beats_current(picked, nv, d, v0, v1, &cycle, start, reversed) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

/// The cyclic sequence of link vertices around edge `(a,b)`, walked via the
/// face table's "other side" pointer exactly as [`crate::admissibility::admissible_edge`]
/// walks it, but collecting the whole cycle rather than stopping at a
/// target. Returns `None` if the edge's link is not (yet) a closed cycle.
fn edge_link_cycle(complex: &ComplexState, a: VertexIdx, b: VertexIdx) -> Option<Vec<VertexIdx>> {
    let first = complex.picked().iter().find(|t| t.contains(&a) && t.contains(&b))?;
    let others: Vec<VertexIdx> = first.iter().copied().filter(|&w| w != a && w != b).collect();
    if others.len() != 2 {
        return None;
    }
    let start = others[0];
    let mut prev = start;
    let mut cur = others[1];
    let mut cycle = vec![start, cur];

    loop {
        match complex.faces().get([a, b, cur]).walk_from(prev) {
            Some(next) if next == start => return Some(cycle),
            Some(next) => {
                cycle.push(next);
                prev = cur;
                cur = next;
            }
            None => return None,
        }
        if cycle.len() > complex.capacity() {
            return None;
        }
    }
}

/// Builds the relabeling seeded by `(v0,v1)` at cyclic offset `start`
/// (optionally reversed), then scans the pick list from index `d` onward
/// comparing the relabeled tetrahedra against the stored ones in pick
/// order. Returns `true` as soon as a relabeled tetrahedron is strictly
/// lexicographically smaller than the one stored at the same position,
/// meaning the current labeling is not canonical.
///
/// Vertices not yet pinned down by the root-edge-and-cycle correspondence
/// are assigned the smallest label not yet used, the first time the scan
/// reaches them — the "extend to the next available integer" rule.
fn seed_beats_current(
    picked: &[Tetrahedron],
    nv: usize,
    d: usize,
    v0: VertexIdx,
    v1: VertexIdx,
    cycle: &[VertexIdx],
    start: usize,
    reversed: bool,
) -> bool {
    if 2 + d > nv {
        return false;
    }
    let mut label: Vec<Option<VertexIdx>> = vec![None; nv];
    let mut used = vec![false; nv];
    label[0] = Some(v0);
    label[1] = Some(v1);
    used[v0] = true;
    used[v1] = true;

    for i in 0..d {
        let idx = if reversed {
            (start + d - (i % d)) % d
        } else {
            (start + i) % d
        };
        let new_v = cycle[idx];
        if used[new_v] {
            return false;
        }
        label[2 + i] = Some(new_v);
        used[new_v] = true;
    }

    for tet in &picked[d..] {
        let mut relabeled = [0usize; 4];
        for (k, &old_v) in tet.iter().enumerate() {
            relabeled[k] = match label[old_v] {
                Some(new_v) => new_v,
                None => {
                    let Some(next) = (0..nv).find(|&w| !used[w]) else {
                        return false;
                    };
                    label[old_v] = Some(next);
                    used[next] = true;
                    next
                }
            };
        }
        relabeled.sort_unstable();
        match relabeled.cmp(tet) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => continue,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tetrahedron_is_always_min_lex() {
        let mut complex = ComplexState::new(6);
        complex.add_picked([0, 1, 2, 3]).unwrap();
        let mut canon = Canonicity::new();
        assert!(canon.is_min_lex(&complex));
        assert_eq!(canon.ncalls_min_lex(), 1);
    }

    #[test]
    fn relabeling_a_symmetric_complex_does_not_beat_identity() {
        let mut complex = ComplexState::new(5);
        for tet in [[0, 1, 2, 3], [0, 1, 2, 4], [0, 1, 3, 4], [0, 2, 3, 4]] {
            complex.add_picked(tet).unwrap();
        }
        let mut canon = Canonicity::new();
        assert!(canon.is_min_lex(&complex));
    }

    #[test]
    fn edge_link_cycle_visits_every_link_vertex_once() {
        let mut complex = ComplexState::new(5);
        for tet in [[0, 1, 2, 3], [0, 1, 2, 4], [0, 1, 3, 4]] {
            complex.add_picked(tet).unwrap();
        }
        let mut cycle = edge_link_cycle(&complex, 0, 1).unwrap();
        cycle.sort_unstable();
        assert_eq!(cycle, vec![2, 3, 4]);
    }

    #[test]
    fn a_non_canonical_relabeling_of_the_root_fan_is_rejected() {
        // A root fan seeded on edge (0,1) with a later pick naming its new
        // vertex out of lex order relative to an equally valid relabeling
        // rooted at the fan's own closing edge: swapping which edge plays
        // the role of (0,1) must not find a smaller sequence here, since
        // the fan itself is already the minimal labeling the driver seeds.
        let mut complex = ComplexState::new(6);
        for tet in [[0, 1, 2, 3], [0, 1, 3, 4], [0, 1, 2, 4]] {
            complex.add_picked(tet).unwrap();
        }
        let mut canon = Canonicity::new();
        assert!(canon.is_min_lex(&complex));
    }
}
