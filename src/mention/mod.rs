//! Parsing of variant mention records.
//!
//! Mentions arrive as JSON produced by an upstream entity recognizer. The
//! fields are noisy free text: positions may carry legacy `IVS` notation,
//! reference alleles may be a bare length ("5"), start/end may encode a
//! range as a fake intron offset ("123-45" meaning 123..45). This module
//! deserializes the records, classifies the mutation tag, parses position
//! strings, repairs the known bad shapes, and builds the typed variant
//! values the projectors consume.
//!
//! Everything here follows the drop-candidate policy: malformed input
//! yields `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::coords::{self, Position};
use crate::reference::transcript::Transcript;

/// Raw mention record as emitted by the entity recognizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentionRecord {
    pub mut_type: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub wild_type: String,
    #[serde(default)]
    pub mutant: String,
    #[serde(default)]
    pub seq_types: Vec<String>,
    #[serde(default)]
    pub rsid: String,
    #[serde(default)]
    pub dup: String,
    // Pre-resolved passthrough fields (mut_type == "VCF").
    #[serde(default)]
    pub chrom: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, rename = "ref")]
    pub ref_allele: String,
    #[serde(default)]
    pub alt: String,
}

impl MentionRecord {
    pub fn has_seq_type(&self, t: &str) -> bool {
        self.seq_types.iter().any(|s| s == t)
    }
}

/// Mutation kind named by a mention tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutKind {
    Sub,
    Del,
    Ins,
    Dup,
    Indel,
    Fs,
    Rsid,
    Vcf,
}

/// Parsed mutation tag: the kind plus whether an `RSID+` prefix asks for
/// intersection with the rsID's own mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutTag {
    pub intersect_rsid: bool,
    pub kind: MutKind,
}

impl MutTag {
    /// Parse a raw tag string. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<MutTag> {
        let (intersect_rsid, rest) = match tag.strip_prefix("RSID+") {
            Some(rest) => (true, rest),
            None => (false, tag),
        };
        let kind = match rest {
            "SUB" => MutKind::Sub,
            "DEL" => MutKind::Del,
            "INS" => MutKind::Ins,
            "DUP" => MutKind::Dup,
            "INDEL" => MutKind::Indel,
            "FS" => MutKind::Fs,
            "RSID" => MutKind::Rsid,
            "VCF" => MutKind::Vcf,
            _ => return None,
        };
        Some(MutTag {
            intersect_rsid,
            kind,
        })
    }
}

/// A parsed transcript-level variant.
#[derive(Debug, Clone, PartialEq)]
pub struct RnaVariant {
    pub kind: MutKind,
    pub start: Position,
    pub end: Option<Position>,
    pub ref_allele: String,
    pub alt_allele: String,
    pub dup: i64,
}

/// A parsed mitochondrial variant (plain 1-based positions, no transcript).
#[derive(Debug, Clone, PartialEq)]
pub struct MtVariant {
    pub kind: MutKind,
    pub start: i64,
    pub end: Option<i64>,
    pub ref_allele: String,
    pub alt_allele: String,
    pub dup: i64,
}

/// A parsed protein substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinVariant {
    pub pos: i64,
    pub ref_aa: String,
    pub alt_aa: String,
}

static POSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<pos>([+*-]?[0-9]+)|((IVS|Intron|ivs|intron)(-?)[0-9]+))(?P<offset>([+-][0-9]+)?)")
        .expect("position regex is valid")
});

/// Parse a raw position string into a [`Position`].
///
/// Accepts plain signed integers, `*N` 3' UTR positions, and legacy
/// `IVSk±N` / `intronk±N` notation (which needs a transcript to resolve).
/// An uncertain position (containing `?`) or anything else unparseable
/// yields `None`.
pub fn parse_position(pos_str: &str, tx: Option<&Transcript>) -> Option<Position> {
    if pos_str.contains('?') {
        return None;
    }

    let caps = POSITION_RE.captures(pos_str)?;
    let pos_text = caps.name("pos")?.as_str();
    let offset: i64 = match caps.name("offset") {
        Some(m) if !m.as_str().is_empty() => m.as_str().parse().ok()?,
        _ => 0,
    };

    let upper = pos_text.to_uppercase();
    if upper.starts_with('I') {
        let k: i64 = if upper.starts_with("IVS") {
            pos_text[3..].parse().ok()?
        } else if upper.starts_with("INTRON") {
            pos_text[6..].parse().ok()?
        } else {
            return None;
        };
        let tx = tx?;
        let resolved = coords::intron_pos(k, offset, tx)?;
        // The anchor resolves the exonic base; the written offset still
        // applies on top of it.
        return Some(Position {
            pos: resolved.pos,
            offset,
            utr3p: resolved.utr3p,
        });
    }

    let (utr3p, digits) = match pos_text.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, pos_text),
    };
    let pos: i64 = digits.trim_start_matches('+').parse().ok()?;

    Some(Position { pos, offset, utr3p })
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn has_non_acgt(s: &str) -> bool {
    s.bytes().any(|b| !matches!(b, b'A' | b'C' | b'G' | b'T'))
}

/// Repair known bad shapes in a transcript-level variant.
///
/// Two repairs, applied in order:
///
/// 1. A mention like "123-45" parses as position 123 with offset -45, but
///    when that is not a plausible intron position it usually meant the
///    range 123..45. Re-read it that way (only when start == end).
/// 2. A numeric reference allele is a length, not a sequence: derive the
///    end position from it and clear the allele. A literal reference or
///    an insertion likewise pins the end position.
///
/// Returns `None` when the end position cannot be resolved.
fn fix_rna_variant(
    tx: &Transcript,
    kind: MutKind,
    start: Position,
    end: Option<Position>,
    ref_allele: String,
) -> Option<(Position, Option<Position>, String)> {
    let mut start = start;
    let mut end = end;
    let mut ref_allele = ref_allele;

    if Some(start) == end && start.offset < 0 && !coords::is_neg_offset_intron(tx, start) {
        let range_end = -start.offset;
        start = Position::new(start.pos);
        end = Some(Position::new(range_end));
    }

    if matches!(kind, MutKind::Sub | MutKind::Del) && !ref_allele.is_empty() {
        let ref_len = if is_all_digits(&ref_allele) {
            let len = ref_allele.parse::<i64>().ok()?;
            ref_allele.clear();
            len
        } else {
            ref_allele.len() as i64
        };
        end = coords::increase_pos(start, ref_len - 1, tx);
    }

    if kind == MutKind::Ins {
        end = coords::increase_pos(start, 1, tx);
    }

    if end.is_none() {
        return None;
    }
    Some((start, end, ref_allele))
}

/// Same repairs for mitochondrial variants, over plain 1-based positions.
fn fix_mt_variant(
    kind: MutKind,
    start: i64,
    end: Option<i64>,
    ref_allele: String,
) -> Option<(i64, Option<i64>, String)> {
    let mut end = end;
    let mut ref_allele = ref_allele;

    if matches!(kind, MutKind::Sub | MutKind::Del) && !ref_allele.is_empty() {
        let ref_len = if is_all_digits(&ref_allele) {
            let len = ref_allele.parse::<i64>().ok()?;
            ref_allele.clear();
            len
        } else {
            ref_allele.len() as i64
        };
        end = Some(start + ref_len - 1);
    }

    if kind == MutKind::Ins {
        end = Some(start + 1);
    }

    if end.is_none() {
        return None;
    }
    Some((start, end, ref_allele))
}

fn parse_dup(dup: &str) -> i64 {
    if is_all_digits(dup) {
        dup.parse().unwrap_or(2)
    } else {
        2
    }
}

/// Parse a transcript-level variant mention against a transcript.
pub fn parse_rna_var(tx: &Transcript, record: &MentionRecord, fix: bool) -> Option<RnaVariant> {
    let kind = MutTag::parse(&record.mut_type)?.kind;
    let mut start = parse_position(&record.start, Some(tx))?;
    let mut end = parse_position(&record.end, Some(tx));
    let mut ref_allele = record.wild_type.clone();
    let alt_allele = record.mutant.clone();

    if fix {
        let (s, e, r) = fix_rna_variant(tx, kind, start, end, ref_allele)?;
        start = s;
        end = e;
        ref_allele = r;
    }

    if has_non_acgt(&ref_allele) {
        ref_allele = String::new();
    }
    if has_non_acgt(&alt_allele) {
        return None;
    }
    if kind == MutKind::Ins && alt_allele.is_empty() {
        return None;
    }

    Some(RnaVariant {
        kind,
        start,
        end,
        ref_allele,
        alt_allele,
        dup: parse_dup(&record.dup),
    })
}

/// Parse a mitochondrial variant mention.
pub fn parse_mt_var(record: &MentionRecord, fix: bool) -> Option<MtVariant> {
    let kind = MutTag::parse(&record.mut_type)?.kind;
    let start = parse_position(&record.start, None)?.pos;
    let mut end = parse_position(&record.end, None).map(|p| p.pos);
    let mut ref_allele = record.wild_type.clone();
    let alt_allele = record.mutant.clone();

    if fix {
        let (_, e, r) = fix_mt_variant(kind, start, end, ref_allele)?;
        end = e;
        ref_allele = r;
    }

    if has_non_acgt(&ref_allele) {
        ref_allele = String::new();
    }
    if has_non_acgt(&alt_allele) {
        return None;
    }
    if kind == MutKind::Ins && alt_allele.is_empty() {
        return None;
    }

    Some(MtVariant {
        kind,
        start,
        end,
        ref_allele,
        alt_allele,
        dup: parse_dup(&record.dup),
    })
}

/// Parse a protein substitution mention. The position must be a plain
/// residue number.
pub fn parse_protein_var(record: &MentionRecord) -> Option<ProteinVariant> {
    if !is_all_digits(&record.start) {
        return None;
    }
    let pos: i64 = record.start.parse().ok()?;
    Some(ProteinVariant {
        pos,
        ref_aa: record.wild_type.clone(),
        alt_aa: record.mutant.clone(),
    })
}
