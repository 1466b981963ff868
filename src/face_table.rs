//! The `O(n^3)`-bounded face table: one record per unordered triple
//! `{a,b,c}`, addressed in O(1) by the colex rank of the triple.
//!
//! This replaces the original C source's raw `base[MAXN][MAXN][MAXN]`
//! pointer array (and its `other_a`/`other_p` pair) with a single flat
//! `Vec<FaceRecord>` indexed by a combinatorial-number-system rank, per the
//! dual-state redesign note: a face slot belongs to `P` exactly when its
//! [`PickKind`] says so, so there is no separate `other_p` storage.

use crate::types::{PickKind, VertexIdx};

/// One side of a face: the opposite vertex completing the tetrahedron on
/// that side, plus how that tetrahedron was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceSide {
    pub other: VertexIdx,
    pub kind: PickKind,
}

/// Record for the face `{a,b,c}`, `a<b<c`. Holds up to two cofacets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceRecord {
    sides: [Option<FaceSide>; 2],
}

impl FaceRecord {
    pub const fn new() -> Self {
        Self { sides: [None, None] }
    }

    /// The opposite vertices present in the added complex `A`, in slot order.
    pub fn others_a(&self) -> [Option<VertexIdx>; 2] {
        [self.sides[0].map(|s| s.other), self.sides[1].map(|s| s.other)]
    }

    /// The opposite vertices present in the picked complex `P`.
    pub fn others_p(&self) -> [Option<VertexIdx>; 2] {
        [
            self.sides[0].filter(|s| s.kind.is_picked()).map(|s| s.other),
            self.sides[1].filter(|s| s.kind.is_picked()).map(|s| s.other),
        ]
    }

    /// Number of cofacets present in `A`.
    pub fn degree_a(&self) -> usize {
        self.sides.iter().filter(|s| s.is_some()).count()
    }

    /// Number of cofacets present in `P`.
    pub fn degree_p(&self) -> usize {
        self.sides
            .iter()
            .filter(|s| s.is_some_and(|s| s.kind.is_picked()))
            .count()
    }

    /// The other opposite vertex in `A`, given one of them; `None` if `vo`
    /// is not presently one of the sides (the link-walk primitive).
    pub fn walk_from(&self, vo: VertexIdx) -> Option<VertexIdx> {
        if self.sides[0].is_some_and(|s| s.other == vo) {
            self.sides[1].map(|s| s.other)
        } else if self.sides[1].is_some_and(|s| s.other == vo) {
            self.sides[0].map(|s| s.other)
        } else {
            None
        }
    }

    /// Insert `vo` as a new side of this face with the given kind. Returns
    /// `true` if this was the face's first side (a brand new face of `A`).
    pub fn insert(&mut self, vo: VertexIdx, kind: PickKind) -> bool {
        if self.sides[0].is_none() {
            self.sides[0] = Some(FaceSide { other: vo, kind });
            true
        } else {
            debug_assert!(self.sides[1].is_none(), "face already has two cofacets");
            self.sides[1] = Some(FaceSide { other: vo, kind });
            false
        }
    }

    /// The side holding `vo`, if any.
    pub fn side_for(&self, vo: VertexIdx) -> Option<FaceSide> {
        self.sides.iter().flatten().find(|s| s.other == vo).copied()
    }

    /// Upgrade the side holding `vo` to `Picked`/`ForcedPicked` in place of
    /// a bare `Forced` kind (the "re-pick of a forced tetrahedron" case).
    pub fn upgrade_to_picked(&mut self, vo: VertexIdx) {
        for side in self.sides.iter_mut().flatten() {
            if side.other == vo {
                side.kind = match side.kind {
                    PickKind::Forced => PickKind::ForcedPicked,
                    other => other,
                };
                return;
            }
        }
        debug_assert!(false, "upgrade_to_picked: vertex not present");
    }

    /// Reverse of [`Self::upgrade_to_picked`]: drop the `Picked` overlay,
    /// leaving the side `Forced` (still present in `A`).
    pub fn downgrade_from_picked(&mut self, vo: VertexIdx) {
        for side in self.sides.iter_mut().flatten() {
            if side.other == vo {
                side.kind = PickKind::Forced;
                return;
            }
        }
        debug_assert!(false, "downgrade_from_picked: vertex not present");
    }

    /// Undo a pick of `vo`: a `Picked` side is cleared outright (it has no
    /// life in `A` beyond the pick), a `ForcedPicked` side reverts to plain
    /// `Forced` (it stays in `A`, implied by other picks). Returns the kind
    /// it had before the undo, so the caller knows whether `A`'s own
    /// bookkeeping (tetrahedron/edge/vertex counts) must be unwound too.
    pub fn remove_picked(&mut self, vo: VertexIdx) -> PickKind {
        for side in self.sides.iter_mut().flatten() {
            if side.other == vo {
                let was = side.kind;
                debug_assert!(was.is_picked(), "remove_picked: side was not picked");
                if was == PickKind::ForcedPicked {
                    side.kind = PickKind::Forced;
                }
                return was;
            }
        }
        unreachable!("remove_picked: vertex not present")
    }

    /// Remove the side holding `vo` from `A`. Relies on the search's strict
    /// LIFO undo discipline: whichever side was added most recently is
    /// always the one being undone, so a populated second slot is always
    /// the match. Returns `true` if the face now has no sides left.
    pub fn remove(&mut self, vo: VertexIdx) -> bool {
        if self.sides[1].is_some_and(|s| s.other == vo) {
            self.sides[1] = None;
        } else {
            debug_assert!(self.sides[0].is_some_and(|s| s.other == vo));
            self.sides[0] = None;
        }
        self.sides[0].is_none() && self.sides[1].is_none()
    }
}

/// Rank of the ordered triple `a<b<c` among all 3-subsets of `0..n`, via the
/// standard combinatorial number system. O(1), bijective.
pub const fn triple_rank(a: usize, b: usize, c: usize) -> usize {
    // C(a,1) + C(b,2) + C(c,3)
    a + b * (b.wrapping_sub(1)) / 2 + c * (c.wrapping_sub(1)) * (c.wrapping_sub(2)) / 6
}

/// Number of 3-subsets of `0..n`, i.e. the size a [`FaceTable`] needs.
pub const fn num_triples(n: usize) -> usize {
    if n < 3 {
        0
    } else {
        n * (n - 1) * (n - 2) / 6
    }
}

/// Flat storage of one [`FaceRecord`] per unordered vertex triple, addressed
/// by any permutation of its three vertices.
#[derive(Debug)]
pub struct FaceTable {
    n: usize,
    records: Vec<FaceRecord>,
}

impl FaceTable {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            records: vec![FaceRecord::new(); num_triples(n)],
        }
    }

    pub const fn capacity(&self) -> usize {
        self.n
    }

    fn index(&self, v: Triple3) -> usize {
        let [a, b, c] = sorted3(v);
        debug_assert!(c < self.n);
        triple_rank(a, b, c)
    }

    pub fn get(&self, v: Triple3) -> &FaceRecord {
        &self.records[self.index(v)]
    }

    pub fn get_mut(&mut self, v: Triple3) -> &mut FaceRecord {
        let idx = self.index(v);
        &mut self.records[idx]
    }

    /// Reset every record to empty, keeping the allocation.
    pub fn clear(&mut self) {
        for r in &mut self.records {
            *r = FaceRecord::new();
        }
    }
}

type Triple3 = [VertexIdx; 3];

const fn sorted3(v: Triple3) -> Triple3 {
    let [mut a, mut b, mut c] = v;
    if a > b {
        core::mem::swap(&mut a, &mut b);
    }
    if b > c {
        core::mem::swap(&mut b, &mut c);
    }
    if a > b {
        core::mem::swap(&mut a, &mut b);
    }
    [a, b, c]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_rank_is_bijective() {
        for n in 3..12 {
            let mut seen = vec![false; num_triples(n)];
            for a in 0..n - 2 {
                for b in a + 1..n - 1 {
                    for c in b + 1..n {
                        let r = triple_rank(a, b, c);
                        assert!(r < num_triples(n), "rank {r} out of range for n={n}");
                        assert!(!seen[r], "rank collision for n={n} at ({a},{b},{c})");
                        seen[r] = true;
                    }
                }
            }
            assert!(seen.iter().all(|&s| s), "not all ranks covered for n={n}");
        }
    }

    #[test]
    fn lookup_is_permutation_invariant() {
        let mut table = FaceTable::new(8);
        table.get_mut([1, 3, 5]).insert(7, PickKind::Picked);
        for perm in [[1, 3, 5], [1, 5, 3], [3, 1, 5], [3, 5, 1], [5, 1, 3], [5, 3, 1]] {
            assert_eq!(table.get(perm).others_a(), [Some(7), None]);
        }
    }

    #[test]
    fn insert_then_remove_is_empty() {
        let mut table = FaceTable::new(6);
        let face = [0, 1, 2];
        assert!(table.get_mut(face).insert(3, PickKind::Picked));
        assert!(!table.get_mut(face).insert(4, PickKind::Forced));
        assert_eq!(table.get(face).degree_a(), 2);
        assert!(!table.get_mut(face).remove(4));
        assert_eq!(table.get(face).degree_a(), 1);
        assert!(table.get_mut(face).remove(3));
        assert_eq!(table.get(face).degree_a(), 0);
    }
}
