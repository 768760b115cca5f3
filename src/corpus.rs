use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::math::{self, SparseVector, Term};

/// A vectorized document within a corpus.
#[derive(Debug, Clone)]
pub struct Document {
    /// Caller-supplied document id. Uniqueness is not enforced.
    pub id: u64,
    /// Term frequencies for each distinct term in this document. Fixed at
    /// insertion time, except that [`TfIdfCorpus::train`] permanently strips
    /// pruned terms.
    tf: SparseVector,
    /// TF-IDF weight of each surviving term. Empty until the corpus has been
    /// trained.
    tfidf: SparseVector,
}

impl Document {
    pub(crate) fn new(id: u64, tf: SparseVector) -> Self {
        Document {
            id,
            tf,
            tfidf: SparseVector::new(),
        }
    }

    #[inline]
    pub fn tf(&self) -> &[Term] {
        &self.tf
    }

    #[inline]
    pub fn tfidf(&self) -> &[Term] {
        &self.tfidf
    }
}

/// Decides which terms are too rare or too ubiquitous to be discriminative.
///
/// A term with document frequency `df` in a corpus of `n` documents is pruned
/// when `df <= min_doc_freq` or `df / n > max_doc_ratio`. A `min_doc_freq` of
/// 0 disables the rarity floor; a `max_doc_ratio` of 1.0 or more disables the
/// ubiquity ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrunePolicy {
    /// Rarity floor: terms in at most this many documents are pruned.
    pub min_doc_freq: u32,
    /// Ubiquity ceiling: terms present in more than this fraction of the
    /// corpus are pruned.
    pub max_doc_ratio: f64,
}

impl Default for PrunePolicy {
    fn default() -> Self {
        PrunePolicy {
            min_doc_freq: 0,
            max_doc_ratio: 0.20,
        }
    }
}

impl PrunePolicy {
    /// A policy that never prunes anything.
    pub fn keep_all() -> Self {
        PrunePolicy {
            min_doc_freq: 0,
            max_doc_ratio: 1.0,
        }
    }

    #[inline]
    fn is_insignificant(&self, doc_freq: u32, doc_count: usize) -> bool {
        doc_freq <= self.min_doc_freq
            || (doc_freq as f64 / doc_count as f64) > self.max_doc_ratio
    }
}

/// Statistics gathered by [`TfIdfCorpus::train`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainStats {
    /// The number of documents in the corpus.
    pub document_count: usize,
    /// The number of distinct terms that survived pruning.
    pub distinct_term_count: usize,
    /// The pruned terms as `(id, document frequency)` pairs, sorted by id.
    pub removed_terms: SparseVector,
}

/// A document id paired with its similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: u64,
    pub score: f64,
}

/// TF-IDF corpus engine.
///
/// Owns the document list, computes document frequencies, prunes
/// insignificant terms, derives IDF weights, and answers cosine-similarity
/// queries against the stored documents.
///
/// The corpus is *dirty* after construction and after every
/// [`add_doc`](TfIdfCorpus::add_doc); queries on a dirty corpus return
/// [`Error::NotTrained`]. [`train`](TfIdfCorpus::train) is a bulk synchronous
/// rebuild of the term universe: it wholesale-replaces the IDF map and every
/// document's TF-IDF vector, and permanently strips pruned terms from every
/// document's TF.
///
/// Not safe for concurrent mutation; callers needing concurrent ingestion
/// must serialize access externally.
///
/// ```
/// use textsim::{TermDictionary, TfIdfCorpus, PrunePolicy};
///
/// let mut dict = TermDictionary::new();
/// let mut corpus = TfIdfCorpus::with_policy(PrunePolicy::keep_all());
///
/// corpus.add_doc(1, dict.vectorize(&["rust", "fast", "safe"], true));
/// corpus.add_doc(2, dict.vectorize(&["rust", "flexible"], true));
/// corpus.train();
///
/// let query = dict.vectorize(&["rust", "safe"], false);
/// let ranked = corpus.similar_docs(&query).unwrap();
/// assert_eq!(ranked[0].doc_id, 1);
/// ```
#[derive(Debug, Clone)]
pub struct TfIdfCorpus {
    /// The documents within this corpus, in insertion order.
    docs: Vec<Document>,
    /// idf\[t\] -> the inverse document frequency of term t. Derived by train.
    idf: HashMap<u64, f64>,
    prune: PrunePolicy,
    /// Set by add_doc, cleared only by train.
    dirty: bool,
}

impl Default for TfIdfCorpus {
    fn default() -> Self {
        Self::new()
    }
}

impl TfIdfCorpus {
    /// Creates an empty corpus with the default [`PrunePolicy`].
    pub fn new() -> Self {
        Self::with_policy(PrunePolicy::default())
    }

    /// Creates an empty corpus with the given pruning policy.
    pub fn with_policy(prune: PrunePolicy) -> Self {
        TfIdfCorpus {
            docs: Vec::new(),
            idf: HashMap::new(),
            prune,
            dirty: true,
        }
    }

    pub(crate) fn from_parts(prune: PrunePolicy, docs: Vec<Document>) -> Self {
        TfIdfCorpus {
            docs,
            idf: HashMap::new(),
            prune,
            dirty: true,
        }
    }

    /// Appends a document with the given term frequency vector and marks the
    /// corpus dirty. `doc_id` uniqueness is not enforced.
    pub fn add_doc(&mut self, doc_id: u64, tf: SparseVector) {
        self.docs.push(Document::new(doc_id, tf));
        self.dirty = true;
    }

    /// The number of documents in this corpus.
    #[inline]
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Whether the corpus statistics are current (no `add_doc` since the last
    /// [`train`](TfIdfCorpus::train)).
    #[inline]
    pub fn is_trained(&self) -> bool {
        !self.dirty
    }

    /// The IDF weight of the given term, or `None` if the term was pruned or
    /// never seen.
    #[inline]
    pub fn idf(&self, term_id: u64) -> Option<f64> {
        self.idf.get(&term_id).copied()
    }

    #[inline]
    pub fn prune_policy(&self) -> PrunePolicy {
        self.prune
    }

    /// The stored documents, in insertion order.
    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    #[inline]
    fn ensure_trained(&self) -> Result<()> {
        if self.dirty {
            return Err(Error::NotTrained);
        }
        Ok(())
    }
}

/// Training.
impl TfIdfCorpus {
    /// Recomputes the global corpus statistics.
    ///
    /// Rebuilds the term universe in four passes: document frequencies,
    /// pruning, IDF weights (`1 + ln(n / df)`, so idf >= 1 even for terms
    /// present in every document), and per-document TF-IDF vectors. Pruned
    /// terms are permanently stripped from every document's TF vector; each
    /// document is re-projected onto the surviving universe as an owned
    /// filtered copy.
    ///
    /// Calling `train` twice with no intervening `add_doc` is idempotent.
    pub fn train(&mut self) -> TrainStats {
        let doc_count = self.docs.len();

        let started = Instant::now();
        let mut df: HashMap<u64, u32> = HashMap::new();
        for doc in &self.docs {
            for term in &doc.tf {
                *df.entry(term.id).or_insert(0) += 1;
            }
        }
        debug!(
            terms = df.len(),
            elapsed = ?started.elapsed(),
            "calculated document frequencies"
        );

        let started = Instant::now();
        let mut removed_terms = SparseVector::new();
        df.retain(|&term_id, &mut doc_freq| {
            if self.prune.is_insignificant(doc_freq, doc_count) {
                removed_terms.push(Term::new(term_id, doc_freq as f64));
                false
            } else {
                true
            }
        });
        removed_terms.sort_by_key(|term| term.id);
        for doc in &mut self.docs {
            doc.tf = doc
                .tf
                .iter()
                .filter(|term| df.contains_key(&term.id))
                .copied()
                .collect();
        }
        debug!(
            removed = removed_terms.len(),
            elapsed = ?started.elapsed(),
            "pruned insignificant terms"
        );

        let started = Instant::now();
        let total_docs = doc_count as f64;
        self.idf = df
            .iter()
            .map(|(&term_id, &doc_freq)| (term_id, 1.0 + (total_docs / doc_freq as f64).ln()))
            .collect();
        debug!(
            terms = self.idf.len(),
            elapsed = ?started.elapsed(),
            "calculated idf weights"
        );

        let started = Instant::now();
        for doc in &mut self.docs {
            doc.tfidf = reweight(&doc.tf, &self.idf);
        }
        debug!(elapsed = ?started.elapsed(), "calculated tf-idf vectors");

        self.dirty = false;
        TrainStats {
            document_count: doc_count,
            distinct_term_count: self.idf.len(),
            removed_terms,
        }
    }
}

/// Similarity queries.
impl TfIdfCorpus {
    /// Cosine similarity of two arbitrary term frequency vectors, reweighted
    /// against the current IDF map.
    ///
    /// Returns a score in `[0.0..1.0]`, where 1.0 means the vectors are
    /// identical after weighting. If either reweighted operand has norm 0
    /// (all of its terms were pruned or never seen), the similarity is 0.0.
    ///
    /// Returns [`Error::NotTrained`] on a dirty corpus.
    pub fn calc_similarity(&self, v1: &[Term], v2: &[Term]) -> Result<f64> {
        self.ensure_trained()?;

        let tfidf1 = reweight(v1, &self.idf);
        let tfidf2 = reweight(v2, &self.idf);
        Ok(cosine(&tfidf1, &tfidf2))
    }

    /// Ranks the stored documents by similarity to the given query vector,
    /// descending by score.
    ///
    /// The query's TF-IDF vector is computed once and scored against each
    /// document's precomputed TF-IDF vector. Documents whose TF-IDF is
    /// entirely empty are excluded from the result. A query that retains no
    /// terms after weighting returns an empty list. The sort is stable, so
    /// equal scores keep insertion order.
    ///
    /// Returns [`Error::NotTrained`] on a dirty corpus.
    pub fn similar_docs(&self, query: &[Term]) -> Result<Vec<ScoredDoc>> {
        self.ensure_trained()?;

        let query_tfidf = reweight(query, &self.idf);
        let query_norm = math::norm(&query_tfidf);
        if query_norm == 0.0 {
            return Ok(Vec::new());
        }

        let mut ranked = Vec::with_capacity(self.docs.len());
        for doc in &self.docs {
            if doc.tfidf.is_empty() {
                continue;
            }
            // a non-empty TFIDF can still have norm 0 (zero-valued terms);
            // the zero-norm policy applies here as well
            let doc_norm = math::norm(&doc.tfidf);
            let score = if doc_norm == 0.0 {
                0.0
            } else {
                (math::dot(&query_tfidf, &doc.tfidf) / (query_norm * doc_norm)).min(1.0)
            };
            ranked.push(ScoredDoc {
                doc_id: doc.id,
                score,
            });
        }

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }
}

/// Reweights a term frequency vector against an IDF map, preserving id order.
/// Terms with no IDF entry are dropped, which is equivalent to a zero weight.
fn reweight(tf: &[Term], idf: &HashMap<u64, f64>) -> SparseVector {
    tf.iter()
        .filter_map(|term| {
            idf.get(&term.id)
                .map(|&weight| Term::new(term.id, term.value * weight))
        })
        .collect()
}

/// Cosine similarity, clamped to <= 1.0 to absorb floating-point overshoot.
/// 0.0 whenever either operand has norm 0.
fn cosine(v1: &[Term], v2: &[Term]) -> f64 {
    let norm1 = math::norm(v1);
    let norm2 = math::norm(v2);
    if norm1 == 0.0 || norm2 == 0.0 {
        return 0.0;
    }
    (math::dot(v1, v2) / (norm1 * norm2)).min(1.0)
}
