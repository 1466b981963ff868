//! Dual state of the complex under construction.
//!
//! The "added" complex `A` is everything implied so far, including
//! tetrahedra forced into existence by lookahead; the "picked" complex `P`
//! is only the tetrahedra the search actually chose. Both views share one
//! [`FaceTable`]: a face belongs to `P` exactly when its occupying side's
//! [`PickKind`] says so, so there is no `other_a`/`other_p` pair to keep in
//! sync (see the dual-state redesign note this module implements).

use anyhow::{anyhow, ensure, Result};

use crate::face_table::FaceTable;
use crate::types::{PickKind, Tetrahedron, Triple, VertexIdx};

/// One entry in the LIFO record of tetrahedra added to `A`, including those
/// added purely by forced implication rather than chosen by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedTet {
    pub vertices: Tetrahedron,
    /// Index into the pick list of the pick whose lookahead forced this
    /// tetrahedron, or `None` if it was itself picked.
    pub forced_by: Option<usize>,
}

/// Whether a vertex's link has closed into a complete (triangulated, closed)
/// surface, and whether that fact has already been folded into the
/// automorphism cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completeness {
    #[default]
    Open,
    /// Became complete on the most recent add; not yet consumed by the
    /// canonicity cache.
    Newly,
    /// Complete, and the cache has already accounted for it.
    Formerly,
}

/// Incrementally-maintained state of a partial triangulation: the added
/// complex `A` and the picked complex `P`, sharing one face table and a set
/// of per-vertex/per-edge degree counters for each view.
#[derive(Debug)]
pub struct ComplexState {
    n: usize,
    faces: FaceTable,

    added: Vec<AddedTet>,
    picked: Vec<Tetrahedron>,

    deg01_a: Vec<usize>,
    deg02_a: Vec<usize>,
    deg03_a: Vec<usize>,
    deg12_a: Vec<Vec<usize>>,
    deg13_a: Vec<Vec<usize>>,

    deg01_p: Vec<usize>,
    deg02_p: Vec<usize>,
    deg03_p: Vec<usize>,
    deg12_p: Vec<Vec<usize>>,
    deg13_p: Vec<Vec<usize>>,

    complete_a: Vec<bool>,
    complete_p: Vec<bool>,
    completeness: Vec<Completeness>,

    nv_a: usize,
    ne_a: usize,
    nf_a: usize,
    nv_p: usize,
    ne_p: usize,
    nf_p: usize,

    max_inter_nv: usize,
}

impl ComplexState {
    /// A state with room for up to `n` vertices, entirely empty.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            faces: FaceTable::new(n),
            added: Vec::new(),
            picked: Vec::new(),
            deg01_a: vec![0; n],
            deg02_a: vec![0; n],
            deg03_a: vec![0; n],
            deg12_a: vec![vec![0; n]; n],
            deg13_a: vec![vec![0; n]; n],
            deg01_p: vec![0; n],
            deg02_p: vec![0; n],
            deg03_p: vec![0; n],
            deg12_p: vec![vec![0; n]; n],
            deg13_p: vec![vec![0; n]; n],
            complete_a: vec![false; n],
            complete_p: vec![false; n],
            completeness: vec![Completeness::Open; n],
            nv_a: 0,
            ne_a: 0,
            nf_a: 0,
            nv_p: 0,
            ne_p: 0,
            nf_p: 0,
            max_inter_nv: 0,
        }
    }

    /// Reset to the empty state, keeping the allocation (mirrors `resetState`
    /// called between successive root-edge-degree runs).
    pub fn reset(&mut self) {
        *self = Self::new(self.n);
    }

    pub const fn capacity(&self) -> usize {
        self.n
    }

    pub fn faces(&self) -> &FaceTable {
        &self.faces
    }

    pub fn added(&self) -> &[AddedTet] {
        &self.added
    }

    pub fn picked(&self) -> &[Tetrahedron] {
        &self.picked
    }

    pub const fn nv_a(&self) -> usize {
        self.nv_a
    }

    pub const fn ne_a(&self) -> usize {
        self.ne_a
    }

    pub const fn nf_a(&self) -> usize {
        self.nf_a
    }

    pub fn nt_a(&self) -> usize {
        self.added.len()
    }

    pub const fn nv_p(&self) -> usize {
        self.nv_p
    }

    pub const fn ne_p(&self) -> usize {
        self.ne_p
    }

    pub const fn nf_p(&self) -> usize {
        self.nf_p
    }

    pub fn nt_p(&self) -> usize {
        self.picked.len()
    }

    pub const fn max_inter_nv(&self) -> usize {
        self.max_inter_nv
    }

    pub fn degree01_a(&self, v: VertexIdx) -> usize {
        self.deg01_a[v]
    }

    pub fn degree02_a(&self, v: VertexIdx) -> usize {
        self.deg02_a[v]
    }

    pub fn degree03_a(&self, v: VertexIdx) -> usize {
        self.deg03_a[v]
    }

    pub fn degree12_a(&self, v0: VertexIdx, v1: VertexIdx) -> usize {
        self.deg12_a[v0][v1]
    }

    pub fn degree13_a(&self, v0: VertexIdx, v1: VertexIdx) -> usize {
        self.deg13_a[v0][v1]
    }

    pub fn degree01_p(&self, v: VertexIdx) -> usize {
        self.deg01_p[v]
    }

    pub fn degree02_p(&self, v: VertexIdx) -> usize {
        self.deg02_p[v]
    }

    pub fn degree03_p(&self, v: VertexIdx) -> usize {
        self.deg03_p[v]
    }

    pub fn degree12_p(&self, v0: VertexIdx, v1: VertexIdx) -> usize {
        self.deg12_p[v0][v1]
    }

    pub fn degree13_p(&self, v0: VertexIdx, v1: VertexIdx) -> usize {
        self.deg13_p[v0][v1]
    }

    pub fn is_complete_a(&self, v: VertexIdx) -> bool {
        self.complete_a[v]
    }

    pub fn is_complete_p(&self, v: VertexIdx) -> bool {
        self.complete_p[v]
    }

    pub fn completeness(&self, v: VertexIdx) -> Completeness {
        self.completeness[v]
    }

    /// Fold a vertex's "newly complete" status into "formerly complete",
    /// once the canonicity cache has accounted for it.
    pub fn mark_formerly_complete(&mut self, v: VertexIdx) {
        if self.completeness[v] == Completeness::Newly {
            self.completeness[v] = Completeness::Formerly;
        }
    }

    fn check_tet(&self, v: Tetrahedron) -> Result<()> {
        ensure!(
            v[0] < v[1] && v[1] < v[2] && v[2] < v[3],
            "tetrahedron vertices must be strictly increasing: {v:?}"
        );
        ensure!(v[3] < self.n, "vertex {} exceeds capacity {}", v[3], self.n);
        Ok(())
    }

    /// Add `v` to `A` only, forced by the lookahead of pick `forced_by`.
    pub fn add_forced(&mut self, v: Tetrahedron, forced_by: usize) -> Result<()> {
        self.check_tet(v)?;
        for (face, vo) in faces_of(v) {
            self.touch_face(face, vo, PickKind::Forced);
        }
        self.bump_a_tet(v);
        self.added.push(AddedTet {
            vertices: v,
            forced_by: Some(forced_by),
        });
        Ok(())
    }

    /// Add `v` to `P` (and, if it is not already present in `A` as forced,
    /// to `A` as well).
    pub fn add_picked(&mut self, v: Tetrahedron) -> Result<()> {
        self.check_tet(v)?;
        let already_forced = matches!(
            self.faces
                .get([v[0], v[1], v[2]])
                .side_for(v[3])
                .map(|s| s.kind),
            Some(PickKind::Forced)
        );

        for (face, vo) in faces_of(v) {
            self.touch_face(face, vo, PickKind::Picked);
        }
        if !already_forced {
            self.bump_a_tet(v);
            self.added.push(AddedTet {
                vertices: v,
                forced_by: None,
            });
        }
        self.bump_p_tet(v);
        self.picked.push(v);
        Ok(())
    }

    /// Undo the most recent pick: any tetrahedra its lookahead forced are
    /// unwound first (LIFO), then the pick itself — either dropping back to
    /// a plain `Forced` member of `A`, or leaving `A` entirely.
    pub fn remove_last_picked(&mut self) -> Result<()> {
        let pick_index = self
            .picked
            .len()
            .checked_sub(1)
            .ok_or_else(|| anyhow!("no picked tetrahedron to remove"))?;
        let v = self.picked.pop().expect("checked above");

        while self
            .added
            .last()
            .is_some_and(|t| t.forced_by == Some(pick_index))
        {
            self.pop_a_tet()?;
        }

        for w in v {
            self.deg03_p[w] -= 1;
            self.complete_p[w] = false;
        }
        if self.deg03_p[v[3]] == 0 {
            self.nv_p -= 1;
        }
        if self.deg03_p[v[2]] == 0 {
            self.nv_p -= 1;
        }
        if self.deg03_p[v[1]] == 0 {
            self.nv_p -= 1;
        }
        for i in 0..3 {
            for j in i + 1..4 {
                self.deg13_p[v[i]][v[j]] -= 1;
                self.deg13_p[v[j]][v[i]] -= 1;
                if self.deg13_p[v[i]][v[j]] == 0 {
                    self.deg01_p[v[i]] -= 1;
                    self.deg01_p[v[j]] -= 1;
                    self.ne_p -= 1;
                }
            }
        }

        let mut stays_in_a = false;
        for (i, (face, vo)) in faces_of(v).into_iter().enumerate() {
            let rec = self.faces.get_mut(face);
            let had_picked_before = rec.degree_p();
            let was = rec.remove_picked(vo);
            if i == 0 {
                stays_in_a = was == PickKind::ForcedPicked;
            }
            if had_picked_before == 1 {
                for w in face {
                    self.deg02_p[w] -= 1;
                }
                for a in 0..3 {
                    for b in a + 1..3 {
                        self.deg12_p[face[a]][face[b]] -= 1;
                        self.deg12_p[face[b]][face[a]] -= 1;
                    }
                }
                self.nf_p -= 1;
            }
        }

        if stays_in_a {
            return Ok(());
        }

        let popped = self.pop_a_tet()?;
        debug_assert_eq!(popped, v, "A/P stacks desynchronized");
        Ok(())
    }

    /// Pop the top of `A`'s added list, undoing its whole-tetrahedron and
    /// per-face bookkeeping. Used both for a pick's own removal and for
    /// unwinding the tetrahedra its lookahead forced.
    fn pop_a_tet(&mut self) -> Result<Tetrahedron> {
        let tet = self
            .added
            .pop()
            .ok_or_else(|| anyhow!("added list underflow"))?;
        let v = tet.vertices;

        for w in v {
            self.deg03_a[w] -= 1;
            self.complete_a[w] = false;
            self.completeness[w] = Completeness::Open;
        }
        if self.deg03_a[v[3]] == 0 {
            self.nv_a -= 1;
        }
        if self.deg03_a[v[2]] == 0 {
            self.nv_a -= 1;
        }
        for i in 0..3 {
            for j in i + 1..4 {
                self.deg13_a[v[i]][v[j]] -= 1;
                self.deg13_a[v[j]][v[i]] -= 1;
                if self.deg13_a[v[i]][v[j]] == 0 {
                    self.deg01_a[v[i]] -= 1;
                    self.deg01_a[v[j]] -= 1;
                    self.ne_a -= 1;
                }
            }
        }
        for (face, vo) in faces_of(v) {
            if self.faces.get_mut(face).remove(vo) {
                for w in face {
                    self.deg02_a[w] -= 1;
                }
                for a in 0..3 {
                    for b in a + 1..3 {
                        self.deg12_a[face[a]][face[b]] -= 1;
                        self.deg12_a[face[b]][face[a]] -= 1;
                    }
                }
                self.nf_a -= 1;
            }
        }
        Ok(v)
    }

    /// Whole-tetrahedron bookkeeping shared by `add_forced` and the fresh
    /// side of `add_picked`: tetrahedron/edge degrees, vertex count, and the
    /// closed-link check.
    fn bump_a_tet(&mut self, v: Tetrahedron) {
        for i in 0..3 {
            for j in i + 1..4 {
                if self.deg13_a[v[i]][v[j]] == 0 {
                    self.deg01_a[v[i]] += 1;
                    self.deg01_a[v[j]] += 1;
                    self.ne_a += 1;
                }
                self.deg13_a[v[i]][v[j]] += 1;
                self.deg13_a[v[j]][v[i]] += 1;
            }
        }
        for w in v {
            self.deg03_a[w] += 1;
        }
        if v[1] == self.nv_a {
            self.nv_a += 1;
        }
        if v[2] == self.nv_a {
            self.nv_a += 1;
        }
        if v[3] == self.nv_a {
            self.nv_a += 1;
        }
        self.max_inter_nv = self.max_inter_nv.max(self.nv_a);
        for w in v {
            if 2 * self.deg02_a[w] == 3 * self.deg03_a[w] {
                self.complete_a[w] = true;
                self.completeness[w] = Completeness::Newly;
            }
        }
    }

    /// `P`-side counterpart of [`Self::bump_a_tet`], run unconditionally for
    /// every pick since a picked tetrahedron is always new to `P`.
    fn bump_p_tet(&mut self, v: Tetrahedron) {
        for i in 0..3 {
            for j in i + 1..4 {
                if self.deg13_p[v[i]][v[j]] == 0 {
                    self.deg01_p[v[i]] += 1;
                    self.deg01_p[v[j]] += 1;
                    self.ne_p += 1;
                }
                self.deg13_p[v[i]][v[j]] += 1;
                self.deg13_p[v[j]][v[i]] += 1;
            }
        }
        for w in v {
            self.deg03_p[w] += 1;
        }
        if v[1] == self.nv_p {
            self.nv_p += 1;
        }
        if v[2] == self.nv_p {
            self.nv_p += 1;
        }
        if v[3] == self.nv_p {
            self.nv_p += 1;
        }
        self.max_inter_nv = self.max_inter_nv.max(self.nv_p);
        for w in v {
            if 2 * self.deg02_p[w] == 3 * self.deg03_p[w] {
                self.complete_p[w] = true;
            }
        }
    }

    /// Insert or upgrade one side of one face of `v`, handling the
    /// "re-pick of an already-forced tetrahedron" case in place, and
    /// returning the per-face degree bumps the caller still owes.
    fn touch_face(&mut self, face: Triple, vo: VertexIdx, kind: PickKind) {
        let rec = self.faces.get_mut(face);
        let had_picked_before = rec.degree_p() > 0;
        let fresh_in_a = if let Some(side) = rec.side_for(vo) {
            debug_assert_eq!(side.kind, PickKind::Forced, "face side already occupied");
            debug_assert!(kind.is_picked(), "re-touch of a forced side must be a pick");
            rec.upgrade_to_picked(vo);
            false
        } else {
            rec.insert(vo, kind)
        };
        let first_pick_at_face = kind.is_picked() && !had_picked_before;

        if fresh_in_a {
            for w in face {
                self.deg02_a[w] += 1;
            }
            for i in 0..3 {
                for j in i + 1..3 {
                    self.deg12_a[face[i]][face[j]] += 1;
                    self.deg12_a[face[j]][face[i]] += 1;
                }
            }
            self.nf_a += 1;
        }
        if first_pick_at_face {
            for w in face {
                self.deg02_p[w] += 1;
            }
            for i in 0..3 {
                for j in i + 1..3 {
                    self.deg12_p[face[i]][face[j]] += 1;
                    self.deg12_p[face[j]][face[i]] += 1;
                }
            }
            self.nf_p += 1;
        }
    }
}

/// The four faces of tetrahedron `v`, each paired with its opposite vertex,
/// in the cyclic order the original's `vloc` walk visits them.
fn faces_of(v: Tetrahedron) -> [(Triple, VertexIdx); 4] {
    [
        ([v[0], v[1], v[2]], v[3]),
        ([v[1], v[2], v[3]], v[0]),
        ([v[2], v[3], v[0]], v[1]),
        ([v[3], v[0], v[1]], v[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_picked_updates_counts() {
        let mut c = ComplexState::new(6);
        c.add_picked([0, 1, 2, 3]).unwrap();
        assert_eq!(c.nt_p(), 1);
        assert_eq!(c.nt_a(), 1);
        assert_eq!(c.nv_p(), 4);
        assert_eq!(c.ne_p(), 6);
        assert_eq!(c.nf_p(), 4);
        assert_eq!(c.degree03_p(0), 1);
        assert_eq!(c.degree12_p(0, 1), 2);
    }

    #[test]
    fn remove_picked_undoes_add() {
        let mut c = ComplexState::new(6);
        c.add_picked([0, 1, 2, 3]).unwrap();
        c.remove_last_picked().unwrap();
        assert_eq!(c.nt_a(), 0);
        assert_eq!(c.nt_p(), 0);
        assert_eq!(c.nv_a(), 0);
        assert_eq!(c.ne_a(), 0);
        assert_eq!(c.nf_a(), 0);
        assert_eq!(c.degree03_a(0), 0);
        assert_eq!(c.degree12_a(0, 1), 0);
    }

    #[test]
    fn forced_then_picked_upgrades_in_place() {
        let mut c = ComplexState::new(6);
        c.add_forced([0, 1, 2, 3], 0).unwrap();
        assert_eq!(c.nt_a(), 1);
        assert_eq!(c.nt_p(), 0);

        c.add_picked([0, 1, 2, 3]).unwrap();
        assert_eq!(c.nt_a(), 1, "re-picking a forced tet must not duplicate it in A");
        assert_eq!(c.nt_p(), 1);
        assert_eq!(c.nf_p(), 4);

        c.remove_last_picked().unwrap();
        assert_eq!(c.nt_p(), 0);
        assert_eq!(c.nt_a(), 1, "downgrading a re-picked tet keeps it forced in A");
        assert_eq!(c.nf_p(), 0);
        assert_eq!(c.nf_a(), 4);
    }

    #[test]
    fn undoing_a_run_of_picks_restores_empty_state() {
        let mut c = ComplexState::new(6);
        for tet in [[0, 1, 2, 3], [0, 1, 2, 4], [0, 1, 3, 4], [0, 2, 3, 4]] {
            c.add_picked(tet).unwrap();
        }
        for _ in 0..4 {
            c.remove_last_picked().unwrap();
        }
        assert_eq!(c.nt_a(), 0);
        assert_eq!(c.nt_p(), 0);
        assert_eq!(c.nv_a(), 0);
        assert_eq!(c.nf_a(), 0);
        assert_eq!(c.ne_a(), 0);
        for v in 0..6 {
            assert_eq!(c.degree03_a(v), 0);
            assert_eq!(c.degree02_a(v), 0);
        }
    }
}
