//! Classification of a complete vertex link's topological type.
//!
//! Euler characteristic separates most cases outright (sphere, projective
//! plane, or higher genus); the one ambiguous case, Euler characteristic
//! zero, is broken by an orientability-distinguishing rank of the link's
//! signed face/edge incidence matrix, which tells a torus link from a
//! Klein-bottle link.
//!
//! That rank is *not* literal mod-2 homology: the incidence matrix carries
//! signed (+1/-1) entries derived from each link face's vertex order, and
//! its rank over the integers is what separates the torus (orientable, rank
//! one less than the face count) from the Klein bottle (non-orientable,
//! full rank). Mod-2 coefficients would erase exactly the distinction this
//! exists to make, so the reduction below is exact-integer (Bareiss-style),
//! never floating point and never mod 2.

use crate::complex::ComplexState;
use crate::types::VertexIdx;

/// The topological type of a closed, complete vertex link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    Sphere,
    ProjectivePlane,
    /// `χ=0`, orientable (E0_t) or not (E0_k).
    Genus0 { orientable: bool },
    /// `χ ∈ {-1,-2,-3}`, orientable (E9{1,2,3}_t) or not (E9{1,2,3}_k).
    /// `genus` is `1 - χ/2` rounded as the bucket numbering (`1`, `2`, `3`)
    /// tracks it, i.e. `1` for `χ=-1`, `2` for `χ=-2`, `3` for `χ=-3`.
    HigherGenus { genus: u8, orientable: bool },
}

/// `deg01 - deg02 + deg03`: vertices minus edges plus faces of the link,
/// read directly off the vertex's own incidence counters.
pub fn link_euler_characteristic(complex: &ComplexState, v: VertexIdx) -> i64 {
    complex.degree01_p(v) as i64 - complex.degree02_p(v) as i64 + complex.degree03_p(v) as i64
}

/// Classifies the (assumed complete) link of `v`. `χ_v < -3` is out of
/// range for this enumerator and is reported as an error rather than
/// silently folded into a catch-all bucket.
pub fn classify_link(complex: &ComplexState, v: VertexIdx) -> anyhow::Result<LinkClass> {
    let chi = link_euler_characteristic(complex, v);
    let class = match chi {
        2 => LinkClass::Sphere,
        1 => LinkClass::ProjectivePlane,
        0 => LinkClass::Genus0 {
            orientable: link_rank_deficient(complex, v),
        },
        -1 | -2 | -3 => LinkClass::HigherGenus {
            genus: (-chi) as u8,
            orientable: link_rank_deficient(complex, v),
        },
        other => anyhow::bail!("vertex {v} link has Euler characteristic {other} out of range (< -3)"),
    };
    Ok(class)
}

fn link_faces(complex: &ComplexState, v: VertexIdx) -> Vec<[VertexIdx; 3]> {
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

fn link_edges(faces: &[[VertexIdx; 3]]) -> Vec<(VertexIdx, VertexIdx)> {
    let mut edges = Vec::new();
    for face in faces {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            let e = if a < b { (a, b) } else { (b, a) };
            if !edges.contains(&e) {
                edges.push(e);
            }
        }
    }
    edges
}

/// Whether the link's signed face/edge incidence matrix has rank one less
/// than its face count (the orientable / torus case) rather than full rank
/// (the non-orientable / Klein-bottle case).
fn link_rank_deficient(complex: &ComplexState, v: VertexIdx) -> bool {
    let faces = link_faces(complex, v);
    if faces.is_empty() {
        return false;
    }
    let edges = link_edges(&faces);
    let mut matrix: Vec<Vec<i64>> = vec![vec![0; faces.len()]; edges.len()];
    for (fi, face) in faces.iter().enumerate() {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            let ei = edges
                .iter()
                .position(|&e| e == (lo, hi))
                .expect("every link edge was collected from a link face");
            matrix[ei][fi] += if a < b { 1 } else { -1 };
        }
    }
    let rank = integer_rank(matrix);
    rank + 1 == faces.len()
}

/// Exact-integer rank via fraction-free (Bareiss) Gaussian elimination, so
/// the result is exact regardless of how large intermediate entries get,
/// unlike the floating-point row reduction this replaces.
fn integer_rank(mut matrix: Vec<Vec<i64>>) -> usize {
    let rows = matrix.len();
    if rows == 0 {
        return 0;
    }
    let cols = matrix[0].len();
    let mut rank = 0;
    let mut prev_pivot = 1i64;
    for col in 0..cols {
        let Some(pivot_row) = (rank..rows).find(|&r| matrix[r][col] != 0) else {
            continue;
        };
        matrix.swap(rank, pivot_row);
        for r in 0..rows {
            if r == rank {
                continue;
            }
            for c in 0..cols {
                if c == col {
                    continue;
                }
                matrix[r][c] =
                    (matrix[r][c] * matrix[rank][col] - matrix[r][col] * matrix[rank][c]) / prev_pivot;
            }
        }
        for r in 0..rows {
            if r != rank {
                matrix[r][col] = 0;
            }
        }
        prev_pivot = matrix[rank][col];
        rank += 1;
        if rank == rows {
            break;
        }
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_of_tetrahedron_link_is_sphere() {
        let mut complex = ComplexState::new(5);
        for tet in [[0, 1, 2, 3], [0, 1, 2, 4], [0, 1, 3, 4], [0, 2, 3, 4]] {
            complex.add_picked(tet).unwrap();
        }
        assert_eq!(link_euler_characteristic(&complex, 0), 2);
        assert_eq!(classify_link(&complex, 0).unwrap(), LinkClass::Sphere);
    }

    #[test]
    fn open_link_is_not_misclassified_as_sphere() {
        let mut complex = ComplexState::new(6);
        complex.add_picked([0, 1, 2, 3]).unwrap();
        assert_ne!(classify_link(&complex, 0).unwrap(), LinkClass::Sphere);
    }
}
