//! Reference genome sequence stores.
//!
//! Two backing strategies behind one trait:
//!
//! - [`InMemoryGenome`] keeps every chromosome in memory, keyed by name.
//! - [`IndexedGenome`] builds a one-time byte-offset index next to the
//!   FASTA file (`<fasta>.offset`) and answers queries by seek-and-read.
//!
//! # Coordinate System
//!
//! `fetch` takes **0-based half-open** intervals and returns the upper-cased
//! bases. Empty or out-of-range intervals return an empty string — callers
//! must check the length before relying on the content.
//!
//! # Index file format
//!
//! The offset index is line-oriented: the first line is the sequence line
//! length (bases per line), each following line is
//! `name<TAB>byte_start<TAB>byte_end` for one chromosome, where the byte
//! range covers the sequence data between headers. Sequence lines must be
//! newline-terminated with a fixed width (standard FASTA output).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::MutNormError;

/// Random-access reference sequence store.
///
/// A single instance is safe to share read-only across threads; the
/// file-backed implementation opens its own handle per query.
pub trait SequenceStore: Send + Sync {
    /// Return the upper-cased bases for `[start, end)` in 0-based
    /// chromosome coordinates, or an empty string if the interval is
    /// empty, out of bounds, or the chromosome is unknown.
    fn fetch(&self, chrom: &str, start: i64, end: i64) -> String;

    /// Length of a chromosome in bases, if known.
    fn chrom_len(&self, chrom: &str) -> Option<i64>;
}

/// Whole-genome in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenome {
    chroms: HashMap<String, String>,
}

impl InMemoryGenome {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chromosome sequence.
    pub fn insert(&mut self, name: impl Into<String>, sequence: impl Into<String>) {
        self.chroms.insert(name.into(), sequence.into());
    }

    /// Load every sequence of a FASTA file into memory.
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self, MutNormError> {
        let file = File::open(path.as_ref()).map_err(|e| MutNormError::Io {
            msg: format!("failed to open FASTA file: {}", e),
        })?;
        let reader = BufReader::new(file);

        let mut chroms: HashMap<String, String> = HashMap::new();
        let mut current: Option<String> = None;

        for line in reader.lines() {
            let line = line.map_err(|e| MutNormError::Io {
                msg: format!("failed to read FASTA line: {}", e),
            })?;
            if let Some(header) = line.strip_prefix('>') {
                let name = header.split_whitespace().next().unwrap_or("").to_string();
                chroms.entry(name.clone()).or_default();
                current = Some(name);
            } else if let Some(seq) = current.as_ref().and_then(|name| chroms.get_mut(name)) {
                seq.push_str(line.trim_end());
            } else if !line.trim().is_empty() {
                return Err(MutNormError::InvalidGenome {
                    msg: "sequence data before first FASTA header".to_string(),
                });
            }
        }

        Ok(Self { chroms })
    }

    /// Names of the loaded chromosomes.
    pub fn chrom_names(&self) -> impl Iterator<Item = &String> {
        self.chroms.keys()
    }
}

impl SequenceStore for InMemoryGenome {
    fn fetch(&self, chrom: &str, start: i64, end: i64) -> String {
        let seq = match self.chroms.get(chrom) {
            Some(seq) => seq,
            None => return String::new(),
        };
        let len = seq.len() as i64;
        let start = start.max(0).min(len);
        let end = end.max(0).min(len);
        if end <= start {
            return String::new();
        }
        seq[start as usize..end as usize].to_uppercase()
    }

    fn chrom_len(&self, chrom: &str) -> Option<i64> {
        self.chroms.get(chrom).map(|s| s.len() as i64)
    }
}

/// Byte range of one chromosome's sequence data within the FASTA file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OffsetEntry {
    start: u64,
    end: u64,
}

/// Seek-based FASTA store backed by a cached byte-offset index.
#[derive(Debug, Clone)]
pub struct IndexedGenome {
    path: PathBuf,
    line_bases: u64,
    index: HashMap<String, OffsetEntry>,
}

impl IndexedGenome {
    /// Open a FASTA file, building the offset index if it is missing.
    ///
    /// The index is cached on disk next to the FASTA (`<fasta>.offset`), so
    /// repeated startups skip the scan. Construction fails on unreadable or
    /// malformed input — this is a startup precondition, not a per-query
    /// recoverable condition.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MutNormError> {
        let path = path.as_ref().to_path_buf();
        let offset_path = offset_path_for(&path);
        if !offset_path.exists() {
            build_offset_index(&path, &offset_path)?;
        }
        let (line_bases, index) = load_offset_index(&offset_path)?;
        Ok(Self {
            path,
            line_bases,
            index,
        })
    }

    /// Rebuild the offset index even if a cached one exists.
    pub fn rebuild<P: AsRef<Path>>(path: P) -> Result<Self, MutNormError> {
        let path = path.as_ref().to_path_buf();
        let offset_path = offset_path_for(&path);
        build_offset_index(&path, &offset_path)?;
        Self::open(path)
    }

    /// Path of the offset index used by this store.
    pub fn index_path(&self) -> PathBuf {
        offset_path_for(&self.path)
    }

    /// Names of the indexed chromosomes.
    pub fn chrom_names(&self) -> impl Iterator<Item = &String> {
        self.index.keys()
    }

    fn base_len(&self, entry: &OffsetEntry) -> i64 {
        let span = entry.end.saturating_sub(entry.start);
        // One newline per line_bases bases; exact for newline-terminated
        // fixed-width sequence lines.
        let newlines = (span + self.line_bases) / (self.line_bases + 1);
        (span - newlines) as i64
    }

    fn read_region(&self, byte_offset: u64, to_read: usize, bases: usize) -> std::io::Result<String> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(byte_offset))?;
        let mut buffer = Vec::with_capacity(to_read);
        file.take(to_read as u64).read_to_end(&mut buffer)?;

        let sequence: String = buffer
            .iter()
            .filter(|&&b| b != b'\n' && b != b'\r')
            .take(bases)
            .map(|&b| (b as char).to_ascii_uppercase())
            .collect();
        Ok(sequence)
    }
}

impl SequenceStore for IndexedGenome {
    fn fetch(&self, chrom: &str, start: i64, end: i64) -> String {
        let entry = match self.index.get(chrom) {
            Some(entry) => entry,
            None => return String::new(),
        };
        let len = self.base_len(entry);
        let start = start.max(0).min(len);
        let end = end.max(0).min(len);
        if end <= start {
            return String::new();
        }

        let (start, length) = (start as u64, (end - start) as u64);
        let first = start % self.line_bases;
        let byte_offset = entry.start + (start / self.line_bases) * (self.line_bases + 1) + first;
        let num_lines = (length + first).div_ceil(self.line_bases);
        let to_read = length + num_lines;

        match self.read_region(byte_offset, to_read as usize, length as usize) {
            Ok(seq) => seq,
            Err(err) => {
                warn!("failed to read {}:{}-{}: {}", chrom, start, end, err);
                String::new()
            }
        }
    }

    fn chrom_len(&self, chrom: &str) -> Option<i64> {
        self.index.get(chrom).map(|entry| self.base_len(entry))
    }
}

fn offset_path_for(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.offset", path.display()))
}

/// Scan a FASTA file and write the offset index next to it.
fn build_offset_index(path: &Path, offset_path: &Path) -> Result<(), MutNormError> {
    info!("creating offset index {} ...", offset_path.display());

    let file = File::open(path).map_err(|e| MutNormError::Io {
        msg: format!("failed to open FASTA file: {}", e),
    })?;
    let mut reader = BufReader::new(file);

    let mut entries: Vec<(String, u64, u64)> = Vec::new();
    let mut line_bases: u64 = 0;
    let mut current: Option<(String, u64)> = None;
    let mut byte_position: u64 = 0;

    let mut line = String::new();
    loop {
        let line_start = byte_position;
        line.clear();
        let bytes_read = reader.read_line(&mut line).map_err(|e| MutNormError::Io {
            msg: format!("failed to read FASTA line: {}", e),
        })? as u64;
        if bytes_read == 0 {
            break;
        }
        byte_position += bytes_read;

        if let Some(header) = line.strip_prefix('>') {
            if let Some((name, start)) = current.take() {
                entries.push((name, start, line_start));
            }
            let name = header.split_whitespace().next().unwrap_or("").to_string();
            current = Some((name, byte_position));
        } else if line_bases == 0 {
            line_bases = line.trim_end().len() as u64;
        }
    }
    if let Some((name, start)) = current {
        entries.push((name, start, byte_position));
    }

    if line_bases == 0 || entries.is_empty() {
        return Err(MutNormError::InvalidGenome {
            msg: format!("no sequence data found in {}", path.display()),
        });
    }

    let result = write_offset_index(offset_path, line_bases, &entries);
    if result.is_err() {
        // Never leave a partial index behind: the cache must be all-or-nothing.
        let _ = std::fs::remove_file(offset_path);
    }
    result
}

fn write_offset_index(
    offset_path: &Path,
    line_bases: u64,
    entries: &[(String, u64, u64)],
) -> Result<(), MutNormError> {
    let mut out = File::create(offset_path).map_err(|e| MutNormError::Io {
        msg: format!("failed to create offset index: {}", e),
    })?;
    writeln!(out, "{}", line_bases).map_err(MutNormError::from)?;
    for (name, start, end) in entries {
        writeln!(out, "{}\t{}\t{}", name, start, end).map_err(MutNormError::from)?;
    }
    Ok(())
}

fn load_offset_index(
    offset_path: &Path,
) -> Result<(u64, HashMap<String, OffsetEntry>), MutNormError> {
    let file = File::open(offset_path).map_err(|e| MutNormError::Io {
        msg: format!("failed to open offset index: {}", e),
    })?;
    let mut lines = BufReader::new(file).lines();

    let first = lines
        .next()
        .transpose()
        .map_err(MutNormError::from)?
        .ok_or_else(|| MutNormError::InvalidGenome {
            msg: "empty offset index".to_string(),
        })?;
    let line_bases: u64 = first
        .trim()
        .parse()
        .map_err(|_| MutNormError::InvalidGenome {
            msg: format!("invalid line length '{}' in offset index", first.trim()),
        })?;
    if line_bases == 0 {
        return Err(MutNormError::InvalidGenome {
            msg: "offset index line length must be > 0".to_string(),
        });
    }

    let mut index = HashMap::new();
    for line in lines {
        let line = line.map_err(MutNormError::from)?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(MutNormError::InvalidGenome {
                msg: format!("malformed offset index line: '{}'", line),
            });
        }
        let name = fields[0].to_string();
        let start: u64 = fields[1].parse().map_err(|_| MutNormError::InvalidGenome {
            msg: format!("invalid byte start '{}' for '{}'", fields[1], name),
        })?;
        let end: u64 = fields[2].parse().map_err(|_| MutNormError::InvalidGenome {
            msg: format!("invalid byte end '{}' for '{}'", fields[2], name),
        })?;
        if end < start {
            return Err(MutNormError::InvalidGenome {
                msg: format!("byte range {}..{} is inverted for '{}'", start, end, name),
            });
        }
        index.insert(name, OffsetEntry { start, end });
    }

    Ok((line_bases, index))
}
