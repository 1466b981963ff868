//! Translates classified `.lex` output files into GAP-readable bracketed
//! tetrahedron lists, printing a face-vector diagnostic line for each
//! triangulation read. A thin format-translation wrapper around the same
//! vertex encodings [`lextet::emit`] writes.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use lextet::limits::{MAX_NV_LEX_TO_GAP, MAX_NV_LETTER_ENCODING};

fn main() -> Result<()> {
    print!("number of vertices: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let nv: usize = input.trim().parse().context("expected an integer vertex count")?;

    if nv > MAX_NV_LEX_TO_GAP {
        println!("this will take too long");
        return Ok(());
    }

    let dir = Path::new(".");
    let prefix = format!("3-manifolds_{nv}v_");
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy().into_owned();
        if name.starts_with(&prefix) && name.ends_with(".lex") {
            translate_file(dir, &name, nv)?;
        }
    }
    Ok(())
}

fn translate_file(dir: &Path, name: &str, nv: usize) -> Result<()> {
    let path = dir.join(name);
    let contents = fs::read_to_string(&path).with_context(|| format!("reading {name}"))?;
    let out_path = dir.join(name.trim_end_matches(".lex"));
    let mut out = fs::File::create(&out_path).with_context(|| format!("creating {}", out_path.display()))?;

    for (i, line) in contents.lines().filter(|l| !l.is_empty()).enumerate() {
        let tets = decode(line, nv);
        print_face_vector(i + 1, &tets);
        write_bracketed(&mut out, &tets)?;
    }
    Ok(())
}

fn decode(line: &str, nv: usize) -> Vec<[usize; 4]> {
    if nv <= MAX_NV_LETTER_ENCODING {
        decode_letters(line)
    } else {
        decode_brackets(line)
    }
}

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn decode_letters(line: &str) -> Vec<[usize; 4]> {
    let indices: Vec<usize> = line.chars().filter_map(|c| LETTERS.find(c)).collect();
    indices.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]).collect()
}

fn decode_brackets(line: &str) -> Vec<[usize; 4]> {
    let trimmed = line.trim().trim_start_matches('[').trim_end_matches(']');
    trimmed
        .split("],[")
        .filter(|s| !s.is_empty())
        .filter_map(|tuple| {
            let nums: Vec<usize> = tuple
                .trim_matches(|c| c == '[' || c == ']')
                .split(',')
                .filter_map(|n| n.trim().parse::<usize>().ok())
                .map(|n| n - 1)
                .collect();
            (nums.len() == 4).then(|| [nums[0], nums[1], nums[2], nums[3]])
        })
        .collect()
}

fn write_bracketed(out: &mut fs::File, tets: &[[usize; 4]]) -> Result<()> {
    write!(out, "[")?;
    for (i, tet) in tets.iter().enumerate() {
        write!(out, "[{},{},{},{}]", tet[0] + 1, tet[1] + 1, tet[2] + 1, tet[3] + 1)?;
        if i + 1 < tets.len() {
            write!(out, ",")?;
        }
    }
    writeln!(out, "]")?;
    Ok(())
}

/// `f0`/`f1`/`f2`/`f3`: vertex, edge, face, and tetrahedron counts of the
/// decoded triangulation, followed by `g_2 = f1 - 4*f0 + 10` and the sorted
/// 1-skeleton degree sequence, printed the way the original's `##`-prefixed
/// diagnostic lines marked non-data lines in its stdout stream.
fn print_face_vector(index: usize, tets: &[[usize; 4]]) {
    let mut vertices = HashSet::new();
    let mut edges = HashSet::new();
    let mut faces = HashSet::new();
    for tet in tets {
        vertices.extend(tet.iter().copied());
        for i in 0..4 {
            for j in i + 1..4 {
                let (a, b) = (tet[i], tet[j]);
                edges.insert(if a < b { (a, b) } else { (b, a) });
            }
        }
        for i in 0..4 {
            let mut face: Vec<usize> = tet.iter().enumerate().filter(|&(k, _)| k != i).map(|(_, &v)| v).collect();
            face.sort_unstable();
            faces.insert([face[0], face[1], face[2]]);
        }
    }
    let (f0, f1, f2, f3) = (vertices.len(), edges.len(), faces.len(), tets.len());
    let g2 = f1 as i64 - 4 * f0 as i64 + 10;

    let mut degrees: Vec<usize> = vertices
        .iter()
        .map(|&v| edges.iter().filter(|&&(a, b)| a == v || b == v).count())
        .collect();
    degrees.sort_unstable();
    let maxdeg = degrees.iter().copied().max().unwrap_or(0);
    let mut histogram = vec![0usize; maxdeg + 1];
    for &d in &degrees {
        histogram[d] += 1;
    }

    println!("## {index}, f = ({f0},{f1},{f2},{f3}), g_2 = {g2}.");
    let deg_list: Vec<String> = degrees.iter().map(usize::to_string).collect();
    println!("##  deg = {}", deg_list.join(","));
    let n_list: Vec<String> = (4..=maxdeg.max(4)).map(|d| histogram.get(d).copied().unwrap_or(0).to_string()).collect();
    println!("##  n_4,... = {}", n_list.join(","));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_round_trip() {
        let tets = vec![[0, 1, 2, 3]];
        let encoded: String = tets[0].iter().map(|&v| LETTERS.as_bytes()[v] as char).collect();
        assert_eq!(decode_letters(&encoded), tets);
    }

    #[test]
    fn bracket_round_trip() {
        let decoded = decode_brackets("[[1,2,3,4],[1,2,3,5]]");
        assert_eq!(decoded, vec![[0, 1, 2, 3], [0, 1, 2, 4]]);
    }
}
