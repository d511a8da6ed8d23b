//! Table transformations applied before validation.
//!
//! - **normalization**: declarative string clean-up per column
//! - **sequence**: resolved protein sequence (accession lookup, raw fallback)
//! - **mutation**: point-mutation application and canonical ordering
//! - **molecule**: resolved stimulus identifier and structure lookup
//! - **stereo**: mono / mixture / sum-of-isomers classification
//! - **exclusion**: split of out-of-scope rows
//! - **alignment**: attachment of alignment hits per mutated sequence
//! - **lookup**: collaborator traits and caches

pub mod alignment;
pub mod error;
pub mod exclusion;
pub mod lookup;
pub mod molecule;
pub mod mutation;
pub mod normalization;
pub mod sequence;
pub mod stereo;

pub use alignment::attach_alignments;
pub use error::{LookupError, Result, TransformError};
pub use exclusion::{Exclusion, ExclusionFilter, ExclusionReason};
pub use lookup::{
    AlignmentHit, CachedSequenceLookup, CachedStructureLookup, LookupCache, MemoryCache,
    SequenceAligner, SequenceLookup, StereoisomerEnumerator, StructureLookup,
};
pub use molecule::{
    UNSPECIFIED_STEREO_TOKEN, is_stereo_unspecified, resolve_identifier, split_identifiers,
    structure_map, with_resolved_identifiers,
};
pub use mutation::{
    apply_mutation, canonicalize_mutation_order, mutate_field, mutated_subject_id,
    with_mutated_sequences, with_mutated_subject_ids,
};
pub use normalization::{NormalizeDirective, NormalizeRule, StringNormalizer, default_directives};
pub use sequence::{SequenceResolver, merge_with_priority, resolve_sequence};
pub use stereo::StereochemistryClassifier;
