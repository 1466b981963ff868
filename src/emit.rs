//! Classification-keyed output: one append-only file per bucket (Euler
//! characteristic, plus a Klein-bottle-link marker), written in the same two
//! encodings the original `write_lex` used — one letter per vertex while the
//! vertex count fits the alphabet, bracketed comma-separated tuples once it
//! doesn't.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::complex::ComplexState;
use crate::limits::MAX_NV_LETTER_ENCODING;

/// Owns one append-only file handle per classification bucket seen so far,
/// opening a new one on first use and keeping it open (flushing after every
/// write) for the rest of the run.
pub struct Emitter {
    dir: PathBuf,
    nv: usize,
    files: HashMap<String, File>,
}

impl Emitter {
    pub fn new(dir: &Path, nv: usize) -> Self {
        Self {
            dir: dir.to_path_buf(),
            nv,
            files: HashMap::new(),
        }
    }

    pub fn write(&mut self, bucket: &str, complex: &ComplexState) -> Result<()> {
        let line = encode(complex, self.nv);
        let file = self.file_for(bucket)?;
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }

    fn file_for(&mut self, bucket: &str) -> Result<&mut File> {
        if !self.files.contains_key(bucket) {
            let path = self.dir.join(format!("3-manifolds_{}v_{bucket}.lex", self.nv));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            self.files.insert(bucket.to_string(), file);
        }
        Ok(self.files.get_mut(bucket).expect("just inserted"))
    }
}

fn encode(complex: &ComplexState, nv: usize) -> String {
    if nv <= MAX_NV_LETTER_ENCODING {
        encode_letters(complex)
    } else {
        encode_brackets(complex)
    }
}

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn encode_letters(complex: &ComplexState) -> String {
    let mut out = String::new();
    for tet in complex.picked() {
        for &v in tet {
            out.push(LETTERS[v] as char);
        }
    }
    out
}

fn encode_brackets(complex: &ComplexState) -> String {
    let tets = complex.picked();
    let mut out = String::from("[");
    for (i, tet) in tets.iter().enumerate() {
        out.push('[');
        let verts: Vec<String> = tet.iter().map(|v| (v + 1).to_string()).collect();
        out.push_str(&verts.join(","));
        out.push(']');
        if i + 1 < tets.len() {
            out.push(',');
        }
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_encode_one_char_per_vertex() {
        let mut complex = ComplexState::new(5);
        complex.add_picked([0, 1, 2, 3]).unwrap();
        assert_eq!(encode(&complex, 5), "abcd");
    }

    #[test]
    fn brackets_encode_one_based_tuples() {
        let mut complex = ComplexState::new(5);
        complex.add_picked([0, 1, 2, 3]).unwrap();
        assert_eq!(encode(&complex, 60), "[[1,2,3,4]]");
    }

    #[test]
    fn emitter_writes_and_reopens_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut complex = ComplexState::new(5);
        complex.add_picked([0, 1, 2, 3]).unwrap();

        let mut emitter = Emitter::new(dir.path(), 5);
        emitter.write("Eul2", &complex).unwrap();
        emitter.write("Eul2", &complex).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("3-manifolds_5v_Eul2.lex")).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
