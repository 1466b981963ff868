//! Predicates that decide whether a candidate tetrahedron, or the partial
//! complex it would produce, can still lead to a valid pseudomanifold.
//!
//! These are pure functions over a [`ComplexState`] snapshot: none of them
//! mutate anything, so the search can call them freely before committing to
//! an add and simply skip the add (no undo needed) on a `false`/`true`-bad
//! result.

use std::collections::HashSet;

use crate::complex::ComplexState;
use crate::face_table::FaceRecord;
use crate::types::VertexIdx;

/// The face `{v0,v1,va}` has exactly one established side in `A`; return it,
/// or `None` if the face is still empty or already closed (degree 2).
fn single_other_a(rec: &FaceRecord) -> Option<VertexIdx> {
    match rec.others_a() {
        [Some(w), None] | [None, Some(w)] => Some(w),
        _ => None,
    }
}

/// Whether the edge `{v0,v1}` may still admit the new tetrahedron
/// `{v0,v1,va,vb}` without prematurely closing its link into a disconnected
/// sub-cycle.
///
/// The link of an edge in a normal pseudomanifold is a path (open edge) or a
/// cycle (closed edge) of vertices, each consecutive pair bridged by a
/// tetrahedron through `{v0,v1}`. Before adding `{v0,v1,va,vb}`, walk that
/// link starting from `va` along the already-established side: if the walk
/// runs off the end (an open boundary, `va` had no established neighbor, or
/// the walk later dead-ends) the edge is still open and `vb` may extend it;
/// if the walk instead reaches `vb` directly, closing the cycle here would
/// strand the rest of the link as a disconnected component, so the add is
/// inadmissible.
pub fn admissible_edge(
    complex: &ComplexState,
    v0: VertexIdx,
    v1: VertexIdx,
    va: VertexIdx,
    vb: VertexIdx,
) -> bool {
    let Some(mut cur) = single_other_a(complex.faces().get([v0, v1, va])) else {
        return true;
    };
    let mut prev = va;
    loop {
        if cur == vb {
            return false;
        }
        match complex.faces().get([v0, v1, cur]).walk_from(prev) {
            Some(next) => {
                prev = cur;
                cur = next;
            }
            None => return true,
        }
    }
}

/// Necessary-but-not-sufficient test for whether edge `{v0,v1}` is a
/// candidate for edge contraction: true when every vertex adjacent to both
/// `v0` and `v1` in `P` is one of the (at most two) link-of-edge endpoints.
/// A `true` here does not prove the edge is contractible, only that this one
/// obstruction (an extra shared neighbor that contraction would have to
/// merge non-locally) is absent. Used only to prune `-i`/irreducible-mode
/// search branches; never strengthen this into a sufficient condition — a
/// stronger test would reject triangulations the irreducible-mode search is
/// supposed to still find.
pub fn contractible(complex: &ComplexState, nv: usize, v0: VertexIdx, v1: VertexIdx) -> bool {
    let mut shared = 0usize;
    for w in 0..nv {
        if w == v0 || w == v1 {
            continue;
        }
        if complex.degree13_p(v0, w) > 0 && complex.degree13_p(v1, w) > 0 {
            shared += 1;
        }
    }
    shared <= 2
}

/// Whether the link of `v`, as triangulated so far in `P`, can still close
/// into a topological sphere: built from the faces opposite `v` in every
/// picked tetrahedron containing it, then checked for a repeated directed
/// edge (a local orientation clash no sphere link can have).
///
/// This mirrors the original `admissable_vertex`/`nonplanar` pair, which the
/// original author disabled in the active search (their own comment notes
/// "what is admissable will have to change" once the link can be connected
/// but not yet known to be a sphere). It is kept here, correct and tested,
/// for completeness, but [`crate::search`] does not call it, matching that
/// dormant state exactly.
pub fn admissible_vertex(complex: &ComplexState, v: VertexIdx) -> bool {
    !nonplanar(complex, v)
}

fn nonplanar(complex: &ComplexState, v: VertexIdx) -> bool {
    let link_faces = link_of_vertex(complex, v);
    let mut directed: HashSet<(VertexIdx, VertexIdx)> = HashSet::new();
    for face in &link_faces {
        for i in 0..3 {
            let edge = (face[i], face[(i + 1) % 3]);
            if !directed.insert(edge) {
                return true;
            }
        }
    }
    false
}

fn link_of_vertex(complex: &ComplexState, v: VertexIdx) -> Vec<[VertexIdx; 3]> {
    complex
        .picked()
        .iter()
        .filter(|t| t.contains(&v))
        .map(|t| {
            let mut face = [0usize; 3];
            let mut i = 0;
            for &w in t {
                if w != v {
                    face[i] = w;
                    i += 1;
                }
            }
            face
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admissible_edge_open_face_is_fine() {
        let complex = ComplexState::new(6);
        assert!(admissible_edge(&complex, 0, 1, 2, 3));
    }

    #[test]
    fn admissible_edge_rejects_premature_closure() {
        let mut complex = ComplexState::new(6);
        // {0,1,2,3} establishes face {0,1,2} with other side 3.
        complex.add_picked([0, 1, 2, 3]).unwrap();
        // Trying {0,1,2,3} again would close the link of edge {0,1} back
        // onto 3 directly, stranding the rest of any larger link.
        assert!(!admissible_edge(&complex, 0, 1, 2, 3));
    }

    #[test]
    fn contractible_true_when_no_extra_shared_neighbor() {
        let mut complex = ComplexState::new(6);
        complex.add_picked([0, 1, 2, 3]).unwrap();
        assert!(contractible(&complex, 6, 2, 3));
    }

    #[test]
    fn admissible_vertex_true_with_no_link_yet() {
        let complex = ComplexState::new(6);
        assert!(admissible_vertex(&complex, 0));
    }

    #[test]
    fn admissible_vertex_false_on_repeated_directed_edge() {
        let mut complex = ComplexState::new(7);
        // Two tetrahedra through v=0 whose opposite faces share a directed
        // edge (1,2) in the same order: an orientation clash.
        complex.add_picked([0, 1, 2, 3]).unwrap();
        complex.add_picked([0, 1, 2, 4]).unwrap();
        assert!(!admissible_vertex(&complex, 0));
    }
}
