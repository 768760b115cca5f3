use std::collections::HashMap;

use indexmap::IndexMap;

use crate::math::{SparseVector, Term};

/// How `vectorize` weights the occurrence count of each distinct word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// Raw occurrence counts.
    #[default]
    Counts,
    /// Occurrence count divided by the total number of input tokens.
    Ratio,
}

/// Manages the mapping between words and their corresponding integer ids.
///
/// Ids are assigned in first-seen order starting at 1 and are never reused,
/// even after [`remove`](TermDictionary::remove). `word2id` and `id2word` are
/// always mutual inverses.
///
/// Known limitation: because ids are never reused, the id space grows without
/// bound over the lifetime of the dictionary; there is no compaction pass.
///
/// ```
/// use textsim::TermDictionary;
///
/// let mut dict = TermDictionary::new();
/// let v = dict.vectorize(&["car", "john", "car"], true);
/// assert_eq!(v.len(), 2);
/// assert_eq!(dict.word(v[0].id), Some("car"));
/// ```
#[derive(Debug, Clone)]
pub struct TermDictionary {
    word2id: IndexMap<String, u64>,
    id2word: HashMap<u64, String>,
    next_term_id: u64,
    weighting: Weighting,
}

impl Default for TermDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl TermDictionary {
    /// Creates an empty dictionary using raw-count weighting.
    pub fn new() -> Self {
        Self::with_weighting(Weighting::Counts)
    }

    /// Creates an empty dictionary with the given weighting mode.
    pub fn with_weighting(weighting: Weighting) -> Self {
        TermDictionary {
            word2id: IndexMap::new(),
            id2word: HashMap::new(),
            next_term_id: 1,
            weighting,
        }
    }

    pub(crate) fn from_parts(word2id: IndexMap<String, u64>, next_term_id: u64, weighting: Weighting) -> Self {
        let id2word = word2id
            .iter()
            .map(|(word, &id)| (id, word.clone()))
            .collect();
        TermDictionary {
            word2id,
            id2word,
            next_term_id,
            weighting,
        }
    }

    /// The number of live (non-removed) words in this dictionary.
    #[inline]
    pub fn len(&self) -> usize {
        self.word2id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.word2id.is_empty()
    }

    /// The weighting mode applied by [`vectorize`](TermDictionary::vectorize).
    #[inline]
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    #[inline]
    pub fn set_weighting(&mut self, weighting: Weighting) {
        self.weighting = weighting;
    }

    /// The source word for the given term id, or `None` if the id was never
    /// assigned or has been removed.
    #[inline]
    pub fn word(&self, term_id: u64) -> Option<&str> {
        self.id2word.get(&term_id).map(|word| word.as_str())
    }

    /// The term id for the given word, or `None` if the word is unknown.
    #[inline]
    pub fn id(&self, word: &str) -> Option<u64> {
        self.word2id.get(word).copied()
    }

    pub(crate) fn word2id(&self) -> &IndexMap<String, u64> {
        &self.word2id
    }

    pub(crate) fn next_term_id(&self) -> u64 {
        self.next_term_id
    }
}

/// Vectorization and removal.
impl TermDictionary {
    /// Converts a sequence of words into a term frequency vector, sorted by
    /// increasing term id.
    ///
    /// If `update` is true, every previously-unseen word is assigned a fresh
    /// never-reused id. If `update` is false, unknown words are silently
    /// dropped from the output.
    ///
    /// Each term's value is the word's occurrence count, or the count divided
    /// by the total number of input tokens under [`Weighting::Ratio`].
    pub fn vectorize<T>(&mut self, words: &[T], update: bool) -> SparseVector
    where
        T: AsRef<str>,
    {
        let mut word2freq: IndexMap<&str, u32> = IndexMap::with_capacity(words.len());
        for word in words {
            *word2freq.entry(word.as_ref()).or_insert(0) += 1;
        }

        let total_tokens = words.len() as f64;
        let mut terms = Vec::with_capacity(word2freq.len());

        for (word, &freq) in &word2freq {
            let term_id = if update {
                Some(self.intern(word))
            } else {
                self.word2id.get(*word).copied()
            };

            if let Some(term_id) = term_id {
                let value = match self.weighting {
                    Weighting::Counts => freq as f64,
                    Weighting::Ratio => freq as f64 / total_tokens,
                };
                terms.push(Term::new(term_id, value));
            }
        }

        terms.sort_by_key(|term| term.id);
        terms
    }

    /// Removes the given terms from this dictionary, deleting both mapping
    /// directions. Ids that are not present are silently ignored. Removed ids
    /// are never reassigned.
    ///
    /// Returns the number of terms that were actually removed.
    pub fn remove(&mut self, terms: &[Term]) -> usize {
        let mut num_removed = 0;

        for term in terms {
            if let Some(word) = self.id2word.remove(&term.id) {
                // shift_remove keeps word2id in first-seen order
                self.word2id.shift_remove(&word);
                num_removed += 1;
            }
        }

        num_removed
    }

    /// Looks up or assigns the id for `word`.
    fn intern(&mut self, word: &str) -> u64 {
        if let Some(&term_id) = self.word2id.get(word) {
            return term_id;
        }

        let term_id = self.next_term_id;
        self.next_term_id += 1;
        self.word2id.insert(word.to_string(), term_id);
        self.id2word.insert(term_id, word.to_string());
        term_id
    }
}
