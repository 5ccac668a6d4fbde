//! Transcript-relative coordinate conversion.
//!
//! Positions on a transcript use HGVS cDNA numbering: coding positions
//! count from 1 at the first base of the start codon, negative positions
//! count backwards through the 5' UTR, `*N` positions count forward from
//! the stop codon into the 3' UTR, and an intron offset (`+N`/`-N`) hangs
//! off the nearest exonic base. [`Position`] carries all three parts.
//!
//! All arithmetic runs in the transcript's strand view (see
//! [`Transcript::strand_view`]) and multiplies comparisons by the strand
//! factor, so one code path handles both orientations. Chromosome
//! positions here are 1-based.

use std::fmt;

use crate::reference::transcript::{StrandView, Transcript};

/// A transcript-relative position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub pos: i64,
    /// Intron offset relative to the nearest exonic base, 0 when exonic.
    pub offset: i64,
    /// True for `*N` positions in the 3' UTR.
    pub utr3p: bool,
}

impl Position {
    pub fn new(pos: i64) -> Self {
        Position {
            pos,
            offset: 0,
            utr3p: false,
        }
    }

    pub fn with_offset(pos: i64, offset: i64) -> Self {
        Position {
            pos,
            offset,
            utr3p: false,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.utr3p {
            write!(f, "*")?;
        }
        write!(f, "{}", self.pos)?;
        if self.offset != 0 {
            write!(f, "{:+}", self.offset)?;
        }
        Ok(())
    }
}

/// Transcript-order length from the transcript start to `pos`, counting
/// exonic bases only. Used to locate the CDS boundaries in cDNA numbering.
fn utr_len(strand: i64, pos: i64, exon_starts: &[i64], exon_ends: &[i64]) -> i64 {
    let mut utr = 0;
    for (&exon_start, &exon_end) in exon_starts.iter().zip(exon_ends) {
        if strand * exon_start <= strand * pos && strand * pos < strand * exon_end {
            utr += strand * (pos - exon_start);
            break;
        }
        utr += strand * (exon_end - exon_start);
    }
    utr
}

/// 5' and 3' UTR lengths in transcript order. Non-coding transcripts have
/// no 5' UTR and the whole span counts as the 3' boundary.
fn utr_lens(tx: &Transcript, view: &StrandView) -> (i64, i64) {
    let strand = tx.strand.factor();
    if tx.is_coding() {
        (
            utr_len(strand, view.cds_start, &view.exon_starts, &view.exon_ends),
            utr_len(strand, view.cds_end, &view.exon_starts, &view.exon_ends),
        )
    } else {
        (0, strand * (view.tx_end - view.tx_start))
    }
}

/// Map a transcript-relative position to a 1-based chromosome position.
///
/// Walks the exons in transcript order, consuming exonic bases until the
/// position is spent, then applies the intron offset along the strand.
/// Positions 5' of the transcript start resolve into the upstream flank;
/// `*N` positions past the last exon resolve into the downstream flank.
/// Returns `None` when a non-UTR position runs off the end of the
/// transcript.
pub fn rna_to_chrom_pos(tx: &Transcript, position: Position) -> Option<i64> {
    let strand = tx.strand.factor();
    let view = tx.strand_view();
    if view.exon_starts.is_empty() {
        return None;
    }
    let (utr5, utr3) = utr_lens(tx, &view);

    let mut pos = position.pos;
    if position.utr3p {
        pos += utr3;
    } else if pos < 0 {
        pos += utr5 + 1;
    } else {
        pos += utr5;
    }

    let mut chrom_pos = view.tx_start;
    if pos < 0 {
        return Some(chrom_pos + (pos + position.offset) * strand);
    }

    let mut j = 0;
    while pos > 0 {
        let step = pos.min((strand * (view.exon_ends[j] + strand - chrom_pos)).max(0));
        chrom_pos += step * strand;
        pos -= step;
        while strand * chrom_pos >= strand * view.exon_ends[j] + 1 {
            j += 1;
            if j == view.exon_ends.len() {
                if !position.utr3p {
                    return None;
                }
                return Some(chrom_pos + (pos + position.offset) * strand);
            }
        }
        chrom_pos = strand * (strand * chrom_pos).max(strand * view.exon_starts[j] + 1);
    }

    Some(chrom_pos + position.offset * strand)
}

/// Distance from `pos` to the exon `[start, end]` in strand view, 0 when
/// the position falls inside the exon.
fn exon_distance(strand: i64, pos: i64, start: i64, end: i64) -> i64 {
    if strand * start < strand * pos && strand * pos <= strand * end {
        return 0;
    }
    (pos - (start + strand)).abs().min((pos - end).abs())
}

/// Map a 1-based chromosome position back to transcript numbering.
///
/// Intronic positions attach to the nearest exon boundary with a signed
/// offset; ties between exons resolve to the first exon in transcript
/// order.
pub fn chrom_to_rna_pos(tx: &Transcript, chrom_pos: i64) -> Position {
    let strand = tx.strand.factor();
    let view = tx.strand_view();
    if view.exon_starts.is_empty() {
        return Position::new(0);
    }
    let (utr5, utr3) = utr_lens(tx, &view);

    let min_exon_distance = view
        .exon_starts
        .iter()
        .zip(&view.exon_ends)
        .map(|(&s, &e)| exon_distance(strand, chrom_pos, s, e))
        .min()
        .unwrap_or(0);

    let mut pos = 0;
    let mut offset = 0;
    for (&exon_start, &exon_end) in view.exon_starts.iter().zip(&view.exon_ends) {
        if exon_distance(strand, chrom_pos, exon_start, exon_end) == min_exon_distance {
            if strand * chrom_pos > strand * exon_end {
                pos += strand * exon_end - strand * exon_start;
                offset = min_exon_distance;
            } else if strand * chrom_pos <= strand * exon_start {
                pos += 1;
                offset = -min_exon_distance;
            } else {
                pos += strand * chrom_pos - strand * exon_start;
            }
            break;
        }
        pos += strand * exon_end - strand * exon_start;
    }

    if pos > utr3 {
        Position {
            pos: pos - utr3,
            offset,
            utr3p: true,
        }
    } else if pos <= utr5 {
        Position {
            pos: pos - utr5 - 1,
            offset,
            utr3p: false,
        }
    } else {
        Position {
            pos: pos - utr5,
            offset,
            utr3p: false,
        }
    }
}

/// Advance a transcript position by `length` transcript-order bases,
/// re-expressed in transcript numbering. `None` when the starting position
/// does not resolve to a valid chromosome position.
pub fn increase_pos(position: Position, length: i64, tx: &Transcript) -> Option<Position> {
    let chrom_pos = match rna_to_chrom_pos(tx, position) {
        Some(cp) if cp > 0 => cp,
        _ => return None,
    };
    Some(chrom_to_rna_pos(tx, chrom_pos + tx.strand.factor() * length))
}

/// Resolve legacy `IVS k` notation to a transcript position.
///
/// A negative offset anchors at the acceptor side of intron `k` (the first
/// base of exon `k+1` in transcript order), a positive offset at the donor
/// side (the last base of exon `k`). A zero offset or an out-of-range
/// intron index is unresolvable.
pub fn intron_pos(k: i64, offset: i64, tx: &Transcript) -> Option<Position> {
    if k < 0 {
        return None;
    }
    let k = k as usize;
    let view = tx.strand_view();

    let chrom_pos = if offset < 0 && k < view.exon_starts.len() {
        view.exon_starts[k] + tx.strand.factor()
    } else if offset > 0 && k >= 1 && k <= view.exon_ends.len() {
        view.exon_ends[k - 1]
    } else {
        return None;
    };

    Some(chrom_to_rna_pos(tx, chrom_pos))
}

/// Whether a negative-offset position is a plausible intron position: it
/// must anchor exactly at an exon start in transcript order, and the
/// offset must not reach past the midpoint of the preceding intron.
pub fn is_neg_offset_intron(tx: &Transcript, position: Position) -> bool {
    let chrom_pos = match rna_to_chrom_pos(
        tx,
        Position {
            pos: position.pos,
            offset: -1,
            utr3p: position.utr3p,
        },
    ) {
        Some(cp) if cp > 0 => cp,
        _ => return false,
    };

    let view = tx.strand_view();
    let idx = match view.exon_starts.iter().position(|&s| s == chrom_pos) {
        Some(idx) => idx,
        None => return false,
    };

    if idx > 0 {
        let half_intron_len =
            (view.exon_starts[idx] - view.exon_starts[idx - 1] + tx.strand.factor()).abs() / 2;
        if -position.offset > half_intron_len {
            return false;
        }
    }
    true
}
