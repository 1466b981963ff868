//! Compile-time bounds on the search, in place of the original's `#define
//! MAXN`/`MAXT`/`MAXF` arena sizes. Kept as `const` rather than runtime
//! configuration, matching the teacher's preference for `const fn` sizing
//! over config plumbing.

/// Smallest vertex count for which a normal pseudomanifold triangulation
/// exists (the tetrahedron boundary needs at least this many vertices once
/// the root edge and its initial fan are seeded).
pub const MIN_NV: usize = 4;

/// Largest vertex count the enumerator accepts on the command line.
/// Triangulations this large are far beyond what a full run completes in
/// practice, but nothing below this bound overflows any fixed-size table.
pub const MAX_NV: usize = 200;

/// The `lex_to_gap` translation utility only ever searches for output files
/// at vertex counts up to this ceiling; the original source hardcodes the
/// same range in its per-bucket filename search loops.
pub const MAX_NV_LEX_TO_GAP: usize = 10;

/// Vertex counts at or below this use the single-character-per-vertex
/// encoding (`write_lex`'s `nv_p <= 52` branch); above it, output falls back
/// to the bracketed-tuple encoding.
pub const MAX_NV_LETTER_ENCODING: usize = 52;
