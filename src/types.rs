//! Core type aliases, named the way `utils/types.rs` names geometric aliases:
//! when a function accepts or returns a bare integer, the alias says what it counts.

/// Label of a vertex, always in `0..nv`.
pub type VertexIdx = usize;

/// An ordered 4-tuple of vertex labels, kept increasing (`v0 < v1 < v2 < v3`)
/// wherever it represents a pick or an add; canonicity code also builds
/// non-increasing relabeled tuples transiently for comparison.
pub type Tetrahedron = [VertexIdx; 4];

/// An ordered triple of vertex labels, the base of a [`Tetrahedron`]'s face.
pub type Triple = [VertexIdx; 3];

/// An ordered pair of vertex labels, an edge.
pub type Pair = [VertexIdx; 2];

/// How a face's slot was populated; mirrors the original `AVAILABLE | FORCED
/// | PICKED | FORCED_PICKED` state machine, with `Available` folded into
/// `Option::None` at the [`crate::face_table::FaceRecord`] level instead of
/// being a fourth enum case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKind {
    /// Present in the added complex `A` by implication, never chosen.
    Forced,
    /// Chosen by the search and present in both `A` and `P`.
    Picked,
    /// Present in `A` by implication first, later also chosen by the search.
    ForcedPicked,
}

impl PickKind {
    /// Whether this slot counts toward the picked complex `P`.
    pub const fn is_picked(self) -> bool {
        matches!(self, Self::Picked | Self::ForcedPicked)
    }
}
