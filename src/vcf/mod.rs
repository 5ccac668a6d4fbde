//! Chromosome-level variants and VCF-style normalization.
//!
//! [`normalize`] canonicalizes a raw `(chrom, pos, ref, alt)` tuple the way
//! VCF expects: no empty alleles (insertions and deletions are anchored on
//! a neighboring reference base, extending leftward when possible), shared
//! suffixes trimmed, shared prefixes trimmed down to the minimal
//! representation. Trimming and anchoring can expose each other, so the
//! two steps repeat until neither changes anything.
//!
//! The pipeline never fails: out-of-range or unresolvable inputs pass
//! through unchanged, and callers treat the result as best-effort.

use serde::{Deserialize, Serialize};

use crate::reference::genome::SequenceStore;

/// A chromosome-level variant, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChromVariant {
    pub chrom: String,
    pub pos: i64,
    #[serde(rename = "ref")]
    pub ref_allele: String,
    #[serde(rename = "alt")]
    pub alt_allele: String,
}

impl ChromVariant {
    pub fn new(
        chrom: impl Into<String>,
        pos: i64,
        ref_allele: impl Into<String>,
        alt_allele: impl Into<String>,
    ) -> Self {
        ChromVariant {
            chrom: chrom.into(),
            pos,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
        }
    }
}

impl std::fmt::Display for ChromVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} {}>{}",
            self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }
}

/// Allele buffers being trimmed/anchored. Owned byte vectors so each step
/// takes and returns the state instead of mutating shared strings.
struct TrimState {
    pos: i64,
    ref_allele: Vec<u8>,
    alt_allele: Vec<u8>,
}

/// Canonicalize a chromosome variant against the reference.
///
/// Returns the input unchanged when the position is non-positive, the
/// chromosome is unknown, or the reference allele runs past the end of
/// the chromosome.
pub fn normalize(genome: &dyn SequenceStore, var: ChromVariant) -> ChromVariant {
    if var.pos <= 0 {
        return var;
    }
    let chrom_len = match genome.chrom_len(&var.chrom) {
        Some(len) => len,
        None => return var,
    };
    if var.pos + var.ref_allele.len() as i64 - 1 >= chrom_len {
        return var;
    }

    let chrom = var.chrom;
    let state = TrimState {
        pos: var.pos,
        ref_allele: var.ref_allele.into_bytes(),
        alt_allele: var.alt_allele.into_bytes(),
    };

    let (mut state, _) = ensure_non_empty(genome, &chrom, state);
    loop {
        let (s, trimmed) = right_trim(state);
        let (s, extended) = ensure_non_empty(genome, &chrom, s);
        state = s;
        if !trimmed && !extended {
            break;
        }
    }
    let state = left_trim(state);

    ChromVariant {
        chrom,
        pos: state.pos,
        ref_allele: String::from_utf8_lossy(&state.ref_allele).into_owned(),
        alt_allele: String::from_utf8_lossy(&state.alt_allele).into_owned(),
    }
}

/// Anchor empty alleles on a reference base, preferring the base to the
/// left so insertions shift leftward. Only at the chromosome start does
/// the anchor extend to the right.
fn ensure_non_empty(
    genome: &dyn SequenceStore,
    chrom: &str,
    mut s: TrimState,
) -> (TrimState, bool) {
    if !s.ref_allele.is_empty() && !s.alt_allele.is_empty() {
        return (s, false);
    }
    if s.pos > 1 {
        let base = genome.fetch(chrom, s.pos - 2, s.pos - 1);
        let anchor = match base.bytes().next() {
            Some(b) => b,
            None => return (s, false),
        };
        s.pos -= 1;
        s.ref_allele.insert(0, anchor);
        s.alt_allele.insert(0, anchor);
    } else {
        let idx = s.pos + s.ref_allele.len() as i64 - 1;
        let base = genome.fetch(chrom, idx, idx + 1);
        let anchor = match base.bytes().next() {
            Some(b) => b,
            None => return (s, false),
        };
        s.ref_allele.push(anchor);
        s.alt_allele.push(anchor);
    }
    (s, true)
}

/// Trim a shared suffix. Skipped for 1/1 substitutions and for all-`N`
/// placeholder alleles; at the left chromosome edge an allele may not be
/// emptied since there is no base left of it to anchor on.
fn right_trim(mut s: TrimState) -> (TrimState, bool) {
    if s.ref_allele.len() == 1 && s.alt_allele.len() == 1 {
        return (s, false);
    }
    if s.ref_allele
        .iter()
        .chain(s.alt_allele.iter())
        .all(|&b| b == b'N')
    {
        return (s, false);
    }

    let mut trimmed = false;
    while !s.ref_allele.is_empty()
        && !s.alt_allele.is_empty()
        && s.ref_allele.last() == s.alt_allele.last()
        && ((s.ref_allele.len() > 1 && s.alt_allele.len() > 1) || s.pos > 1)
    {
        s.ref_allele.pop();
        s.alt_allele.pop();
        trimmed = true;
    }
    (s, trimmed)
}

/// Trim a shared prefix, advancing the position, keeping at least one base
/// in the shorter allele.
fn left_trim(mut s: TrimState) -> TrimState {
    while s.ref_allele.len().min(s.alt_allele.len()) > 1 && s.ref_allele[0] == s.alt_allele[0] {
        s.pos += 1;
        s.ref_allele.remove(0);
        s.alt_allele.remove(0);
    }
    s
}
