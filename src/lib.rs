//! An embeddable text-similarity toolkit.
//!
//! Raw documents are turned into a vector-space corpus representation,
//! per-term weights are derived, and documents and queries are ranked by
//! cosine similarity. The core is the triad of:
//! - the term dictionary (word <-> integer-id mapping),
//! - sparse-vector algebra (merge-based operations over id-sorted vectors),
//! - the TF-IDF corpus engine (document-frequency accounting, term pruning,
//!   IDF weighting, per-document re-weighting, similarity ranking).
//!
//! Tokenization is an external concern: this crate consumes ordered token
//! sequences and performs no text normalization itself. Ranking is a
//! brute-force linear scan over all stored documents; there is no inverted
//! index and no approximate nearest-neighbor search.
//!
//! Everything is single-threaded and synchronous. Mutation of a shared
//! dictionary or corpus must be serialized externally.

pub mod corpus;
pub mod dictionary;
pub mod error;
pub mod math;
pub mod persist;

/// Term dictionary
/// Maps words to unique integer ids and back. Ids are assigned in first-seen
/// order starting at 1 and are never reused, even after removal.
/// `vectorize` converts token sequences into id-sorted term frequency
/// vectors, optionally growing the dictionary as it goes.
pub use dictionary::TermDictionary;

/// Weighting mode for vectorization
/// `Counts` emits raw occurrence counts; `Ratio` divides each count by the
/// total number of input tokens. Configured on the dictionary rather than
/// passed per call.
pub use dictionary::Weighting;

/// TF-IDF corpus engine
/// Owns the document list and the derived IDF map. `add_doc` stores term
/// frequency vectors, `train` rebuilds the global statistics (document
/// frequencies, pruning, IDF, per-document TF-IDF), and `calc_similarity` /
/// `similar_docs` answer cosine-similarity queries. Querying before training
/// is a state fault ([`error::Error::NotTrained`]).
pub use corpus::TfIdfCorpus;

/// Pruning policy
/// Decides which terms are insignificant: a rarity floor on document
/// frequency and a ubiquity ceiling on the document-frequency ratio
/// (default 0.20). Applied uniformly to the corpus statistics and to every
/// stored document during `train`.
pub use corpus::PrunePolicy;

/// Training statistics
/// Returned by `train`: document count, surviving distinct term count, and
/// the pruned terms with their document frequencies.
pub use corpus::TrainStats;

/// A stored document and a ranked search hit (document id plus score).
pub use corpus::{Document, ScoredDoc};

/// Sparse vector building blocks
/// A `Term` is an `(id, value)` pair; a `SparseVector` is a sequence of
/// terms sorted by strictly increasing id, with absent ids treated as zeros.
pub use math::{SparseVector, Term};

/// Crate error type and result alias
/// `Error::NotTrained` is a state fault (query before `train`); `Error::Io`
/// and `Error::Codec` are recoverable persistence errors.
pub use error::{Error, Result};
