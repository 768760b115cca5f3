//! Persistence for dictionaries and corpora.
//!
//! The live types hold derived state (`id2word`, IDF maps, TF-IDF vectors)
//! that is never written to disk. Each one has a plain serializable shadow
//! struct holding exactly the persisted fields in a fixed order; loading
//! builds a fresh object from the shadow and rebuilds the derived state, so a
//! failed load never leaves anything half-mutated.
//!
//! Images are encoded as CBOR. There is no schema versioning.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::corpus::{Document, PrunePolicy, TfIdfCorpus};
use crate::dictionary::{TermDictionary, Weighting};
use crate::error::Result;
use crate::math::SparseVector;

/// Serializable image of a [`TermDictionary`].
///
/// Field order is fixed: word count, next term id, then the word-to-id
/// mapping in first-seen order. `id2word` is never persisted; it is rebuilt
/// by inversion on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryData {
    pub word_count: usize,
    pub next_term_id: u64,
    #[serde(with = "indexmap::map::serde_seq")]
    pub word2id: IndexMap<String, u64>,
}

impl From<&TermDictionary> for DictionaryData {
    fn from(dict: &TermDictionary) -> Self {
        DictionaryData {
            word_count: dict.len(),
            next_term_id: dict.next_term_id(),
            word2id: dict.word2id().clone(),
        }
    }
}

impl DictionaryData {
    /// Converts this image into a live dictionary, rebuilding `id2word`.
    ///
    /// The weighting mode is construction-time configuration and is not part
    /// of the persisted image.
    pub fn into_dictionary(self, weighting: Weighting) -> TermDictionary {
        TermDictionary::from_parts(self.word2id, self.next_term_id, weighting)
    }
}

/// Serializable image of a single document: id and term frequencies only.
/// The TF-IDF vector is derived and is recomputed by the next `train`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentData {
    pub id: u64,
    pub tf: SparseVector,
}

/// Serializable image of a [`TfIdfCorpus`]: the pruning policy followed by
/// the documents in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusData {
    pub prune: PrunePolicy,
    pub documents: Vec<DocumentData>,
}

impl From<&TfIdfCorpus> for CorpusData {
    fn from(corpus: &TfIdfCorpus) -> Self {
        CorpusData {
            prune: corpus.prune_policy(),
            documents: corpus
                .docs()
                .iter()
                .map(|doc| DocumentData {
                    id: doc.id,
                    tf: doc.tf().to_vec(),
                })
                .collect(),
        }
    }
}

impl CorpusData {
    /// Converts this image into a live corpus. The corpus starts dirty and
    /// must be trained before it can be queried.
    pub fn into_corpus(self) -> TfIdfCorpus {
        let docs = self
            .documents
            .into_iter()
            .map(|doc| Document::new(doc.id, doc.tf))
            .collect();
        TfIdfCorpus::from_parts(self.prune, docs)
    }
}

impl TermDictionary {
    /// Saves this dictionary to a binary file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_cbor::to_writer(&mut writer, &DictionaryData::from(self))?;
        writer.flush()?;
        Ok(())
    }

    /// Loads a dictionary from a binary file, with the default weighting
    /// mode. Use [`TermDictionary::set_weighting`] to reconfigure afterwards.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let data: DictionaryData = serde_cbor::from_reader(BufReader::new(file))?;
        Ok(data.into_dictionary(Weighting::default()))
    }
}

impl TfIdfCorpus {
    /// Saves this corpus to a binary file. Only the pruning policy and the
    /// document term frequencies are written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_cbor::to_writer(&mut writer, &CorpusData::from(self))?;
        writer.flush()?;
        Ok(())
    }

    /// Loads a corpus from a binary file. The loaded corpus is dirty and must
    /// be trained before it can be queried.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let data: CorpusData = serde_cbor::from_reader(BufReader::new(file))?;
        Ok(data.into_corpus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::math::Term;

    #[test]
    fn dictionary_roundtrip_preserves_ids_and_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.bin");

        let mut dict = TermDictionary::new();
        dict.vectorize(&["alpha", "beta", "gamma"], true);
        let beta_id = dict.id("beta").unwrap();
        dict.remove(&[Term::new(beta_id, 0.0)]);

        dict.save(&path).unwrap();
        let mut loaded = TermDictionary::load(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.id("alpha"), dict.id("alpha"));
        assert_eq!(loaded.id("gamma"), dict.id("gamma"));
        assert_eq!(loaded.id("beta"), None);
        assert_eq!(loaded.word(beta_id), None);

        // the id counter survives, so removed ids are still never reassigned
        loaded.vectorize(&["delta"], true);
        assert!(loaded.id("delta").unwrap() > beta_id);
    }

    #[test]
    fn dictionary_inverse_mapping_is_rebuilt_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.bin");

        let mut dict = TermDictionary::new();
        dict.vectorize(&["one", "two"], true);
        dict.save(&path).unwrap();

        let loaded = TermDictionary::load(&path).unwrap();
        for word in ["one", "two"] {
            let id = loaded.id(word).unwrap();
            assert_eq!(loaded.word(id), Some(word));
        }
    }

    #[test]
    fn corpus_roundtrip_preserves_documents_and_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.bin");

        let policy = PrunePolicy {
            min_doc_freq: 1,
            max_doc_ratio: 0.9,
        };
        let mut corpus = TfIdfCorpus::with_policy(policy);
        corpus.add_doc(1, vec![Term::new(1, 2.0), Term::new(4, 1.0)]);
        corpus.add_doc(2, vec![Term::new(1, 1.0), Term::new(4, 3.0)]);
        corpus.save(&path).unwrap();

        let mut loaded = TfIdfCorpus::load(&path).unwrap();
        assert_eq!(loaded.prune_policy(), policy);
        assert_eq!(loaded.doc_count(), 2);
        assert_eq!(loaded.docs()[0].tf(), corpus.docs()[0].tf());

        // a loaded corpus must be retrained before querying
        assert!(!loaded.is_trained());
        let v = vec![Term::new(1, 1.0)];
        assert!(matches!(loaded.calc_similarity(&v, &v), Err(Error::NotTrained)));

        loaded.train();
        assert!(loaded.calc_similarity(&v, &v).unwrap() > 0.0);
    }

    #[test]
    fn load_from_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.bin");
        assert!(matches!(TermDictionary::load(&path), Err(Error::Io(_))));
        assert!(matches!(TfIdfCorpus::load(&path), Err(Error::Io(_))));
    }

    #[test]
    fn load_from_corrupt_file_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"this is not cbor at all").unwrap();
        assert!(matches!(TermDictionary::load(&path), Err(Error::Codec(_))));
    }
}
