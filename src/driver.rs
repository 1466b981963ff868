//! Top-level run driver: seeds each root-edge degree, runs the search,
//! classifies and emits every completed triangulation, and accumulates the
//! end-of-run summary counters the original printed via `summarize()`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::canonicity::Canonicity;
use crate::classify::{self, LinkClass};
use crate::complex::ComplexState;
use crate::emit::Emitter;
use crate::limits::{MAX_NV, MIN_NV};
use crate::search::{self, SearchConfig};

/// Counters accumulated across the whole run, for the verbose end-of-run
/// report (`-v`), mirroring the original's `ngenerated`/`ngen_all`/
/// `closed_link`/`ncalls_min_lex`/`max_inter_nv` summary fields.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Triangulations found to be isomorph-free and emitted.
    pub ngenerated: u64,
    /// Every tetrahedron pick attempted, including ones later undone.
    pub ngen_all: u64,
    pub bucket_counts: HashMap<String, u64>,
    pub max_inter_nv: usize,
    pub ncalls_min_lex: usize,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            "generated {} triangulations ({} tetrahedron picks attempted)",
            self.ngenerated, self.ngen_all
        );
        let mut buckets: Vec<_> = self.bucket_counts.iter().collect();
        buckets.sort();
        for (bucket, count) in buckets {
            info!("  {bucket}: {count}");
        }
        info!("max intermediate vertex count: {}", self.max_inter_nv);
        info!("min_lex calls: {}", self.ncalls_min_lex);
    }
}

/// Everything the CLI gathers before handing off to [`run`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub nv: usize,
    pub only_irreducible: bool,
    pub res: usize,
    pub modulus: usize,
    pub output_dir: PathBuf,
}

/// Enumerate every isomorph-free triangulation on `config.nv` vertices,
/// writing classified output via [`Emitter`] and returning the accumulated
/// [`RunSummary`].
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    anyhow::ensure!(config.nv >= MIN_NV, "nv must be at least {MIN_NV}");
    anyhow::ensure!(config.nv <= MAX_NV, "nv must be at most {MAX_NV} (compiled limit)");
    anyhow::ensure!(config.modulus > 0, "modulus must be at least 1");
    anyhow::ensure!(config.res < config.modulus, "res must be less than modulus");

    let mut summary = RunSummary::default();
    let mut emitter = Emitter::new(&config.output_dir, config.nv);

    // Every root edge degree is its own independent run: the original
    // enumerates once per possible initial valence of the seeded edge
    // `{0,1}`, from the smallest admissible fan up to one short of using
    // every other vertex.
    let top = if config.only_irreducible {
        config.nv.saturating_sub(3)
    } else {
        config.nv.saturating_sub(2)
    };
    for degree0 in 3..=top {
        let mut complex = ComplexState::new(config.nv);
        let mut canon = Canonicity::new();
        seed_initial_fan(&mut complex, degree0)?;

        let search_config = SearchConfig {
            maxnv: config.nv,
            only_irreducible: config.only_irreducible,
            res: config.res,
            modulus: config.modulus,
            splitlevel: (config.nv / 2).min(54),
        };

        search::search(&mut complex, &mut canon, &search_config, &mut summary, &mut |complex, summary| {
            on_triangulation_complete(complex, &mut emitter, summary)
        })?;

        summary.max_inter_nv = summary.max_inter_nv.max(complex.max_inter_nv());
        summary.ncalls_min_lex += canon.ncalls_min_lex();
    }

    summary.log();
    Ok(summary)
}

/// Seeds the root edge `{0,1}` with a cyclic fan of `degree0` tetrahedra
/// `{0,1,2,3}, {0,1,3,4}, …, {0,1,degree0,2}` (closed back to vertex `2`),
/// matching `initialize_first_edge`: every isomorphism class is generated
/// exactly once across the full set of root-edge degrees this is called
/// with, and edge `{0,1}`'s link is already a closed cycle the moment
/// seeding finishes.
fn seed_initial_fan(complex: &mut ComplexState, degree0: usize) -> Result<()> {
    let last = degree0 + 1;
    for i in 2..last {
        complex.add_picked([0, 1, i, i + 1])?;
    }
    let mut closing = [0, 1, last, 2];
    closing.sort_unstable();
    complex.add_picked(closing)?;
    Ok(())
}

/// Counts of each of the ten named vertex-link buckets across one finished
/// triangulation, in the order the classification key lists them.
#[derive(Debug, Default)]
struct LinkBucketCounts {
    e2: u64,
    e1: u64,
    e0_t: u64,
    e0_k: u64,
    e91_t: u64,
    e91_k: u64,
    e92_t: u64,
    e92_k: u64,
    e93_t: u64,
    e93_k: u64,
}

impl LinkBucketCounts {
    fn add(&mut self, class: LinkClass) {
        match class {
            LinkClass::Sphere => self.e2 += 1,
            LinkClass::ProjectivePlane => self.e1 += 1,
            LinkClass::Genus0 { orientable: true } => self.e0_t += 1,
            LinkClass::Genus0 { orientable: false } => self.e0_k += 1,
            LinkClass::HigherGenus { genus: 1, orientable: true } => self.e91_t += 1,
            LinkClass::HigherGenus { genus: 1, orientable: false } => self.e91_k += 1,
            LinkClass::HigherGenus { genus: 2, orientable: true } => self.e92_t += 1,
            LinkClass::HigherGenus { genus: 2, orientable: false } => self.e92_k += 1,
            LinkClass::HigherGenus { genus: 3, orientable: true } => self.e93_t += 1,
            LinkClass::HigherGenus { genus: 3, orientable: false } => self.e93_k += 1,
            LinkClass::HigherGenus { genus, .. } => {
                unreachable!("classify_link never returns genus {genus} outside 1..=3")
            }
        }
    }
}

fn on_triangulation_complete(
    complex: &ComplexState,
    emitter: &mut Emitter,
    summary: &mut RunSummary,
) -> Result<()> {
    let euler = complex.nv_p() as i64 - complex.ne_p() as i64 + complex.nf_p() as i64 - complex.nt_p() as i64;

    let mut counts = LinkBucketCounts::default();
    for v in 0..complex.nv_p() {
        counts.add(classify::classify_link(complex, v)?);
    }

    let bucket = format!(
        "{}_{}_{}_{}_{}_{}_{}_{}_{}_{}_Eul{euler}",
        counts.e2,
        counts.e1,
        counts.e0_t,
        counts.e0_k,
        counts.e91_t,
        counts.e91_k,
        counts.e92_t,
        counts.e92_k,
        counts.e93_t,
        counts.e93_k,
    );
    *summary.bucket_counts.entry(bucket.clone()).or_insert(0) += 1;
    emitter.write(&bucket, complex)
}
