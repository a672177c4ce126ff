//! Labeled document collections.
//!
//! A [`Corpus`] owns every [`Document`] of a run in load order. Clusters refer to
//! documents by their index into [`Corpus::documents`], never by reference.
//!
//! ```rust
//! use doclump::corpus::Corpus;
//!
//! let data = "0<fff>1<fff>0:1.0\n1<fff>2<fff>2:0.5\n";
//! let corpus = Corpus::from_reader(data.as_bytes(), 3).unwrap();
//!
//! assert_eq!(corpus.len(), 2);
//! assert_eq!(corpus.documents()[1].vector(), &[0.0, 0.0, 0.5]);
//! assert_eq!(corpus.label_counts().get(1), 1);
//! ```

mod document;
pub mod loader;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

pub use document::{Document, LabelCounts};
pub use loader::{read_vocab_size, FIELD_DELIMITER};

/// Documents plus the label distribution computed at load time.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    label_counts: LabelCounts,
    vocab_size: usize,
}

impl Corpus {
    /// Build a corpus from in-memory documents.
    ///
    /// Every document must have the same dimensionality.
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let vocab_size = documents.first().map_or(0, Document::dim);
        for doc in documents.iter().skip(1) {
            if doc.dim() != vocab_size {
                return Err(Error::DimensionMismatch {
                    expected: vocab_size,
                    found: doc.dim(),
                });
            }
        }

        let label_counts = LabelCounts::from_documents(&documents);
        Ok(Self {
            documents,
            label_counts,
            vocab_size,
        })
    }

    /// Parse sparse-vector lines from `reader`.
    pub fn from_reader<R: BufRead>(reader: R, vocab_size: usize) -> Result<Self> {
        let documents = loader::read_documents(reader, vocab_size)?;
        let label_counts = LabelCounts::from_documents(&documents);
        Ok(Self {
            documents,
            label_counts,
            vocab_size,
        })
    }

    /// Load a dataset file whose vectors have `vocab_size` dimensions.
    pub fn load_with_vocab_size(path: impl AsRef<Path>, vocab_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let corpus = Self::from_reader(BufReader::new(File::open(path)?), vocab_size)?;
        info!(
            path = %path.display(),
            documents = corpus.len(),
            labels = corpus.label_counts.num_labels(),
            vocab_size,
            "loaded corpus"
        );
        Ok(corpus)
    }

    /// Load a dataset file, taking the vocabulary size from a sidecar term list.
    pub fn load(data_path: impl AsRef<Path>, vocab_path: impl AsRef<Path>) -> Result<Self> {
        let vocab_size = read_vocab_size(vocab_path)?;
        Self::load_with_vocab_size(data_path, vocab_size)
    }

    /// Documents in load order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Per-label document counts over the whole corpus.
    pub fn label_counts(&self) -> &LabelCounts {
        &self.label_counts
    }

    /// Dimensionality of every document vector.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn new_rejects_mixed_dimensions() {
        let docs = vec![
            Document::new(vec![0.0, 1.0], 0, 1),
            Document::new(vec![1.0], 0, 2),
        ];
        let err = Corpus::new(docs).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn load_uses_vocab_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = dir.path().join("words_idfs.txt");
        let data = dir.path().join("tfidf.txt");

        std::fs::write(&vocab, "a<fff>0.1\nb<fff>0.2\nc<fff>0.3\nd<fff>0.4\n").unwrap();
        let mut f = File::create(&data).unwrap();
        writeln!(f, "2<fff>10<fff>3:0.8").unwrap();
        writeln!(f, "0<fff>11<fff>0:0.6 1:0.8").unwrap();
        writeln!(f, "2<fff>12<fff>2:1.0").unwrap();

        let corpus = Corpus::load(&data, &vocab).unwrap();
        assert_eq!(corpus.vocab_size(), 4);
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.documents()[0].vector(), &[0.0, 0.0, 0.0, 0.8]);
        assert_eq!(corpus.documents()[2].doc_id(), 12);
        assert_eq!(corpus.label_counts().get(2), 2);
        assert_eq!(corpus.label_counts().get(0), 1);
    }

    #[test]
    fn empty_file_gives_empty_corpus() {
        let corpus = Corpus::from_reader("".as_bytes(), 5).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.vocab_size(), 5);
    }
}
