//! Reference data: genome sequence stores, transcript models and
//! annotation lookup seams.

pub mod genome;
pub mod lookup;
pub mod transcript;

pub use genome::{IndexedGenome, InMemoryGenome, SequenceStore};
pub use lookup::{MemoryLookup, RsidLookup, RsidRecord, TranscriptLookup};
pub use transcript::{Strand, StrandView, Transcript};
