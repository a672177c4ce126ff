use std::collections::BTreeMap;

/// A single document: dense TF-IDF vector plus its ground-truth label.
///
/// The label is only consulted when scoring; assignment never looks at it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    vector: Vec<f32>,
    label: u32,
    doc_id: u64,
}

impl Document {
    /// Create a document from an already-dense vector.
    pub fn new(vector: Vec<f32>, label: u32, doc_id: u64) -> Self {
        Self {
            vector,
            label,
            doc_id,
        }
    }

    /// Dense feature vector (length = vocabulary size).
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    /// Ground-truth category.
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Identifier from the source dataset.
    pub fn doc_id(&self) -> u64 {
        self.doc_id
    }

    /// Vector dimensionality.
    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// Number of documents carrying each label across the whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounts {
    counts: BTreeMap<u32, usize>,
}

impl LabelCounts {
    /// Tally the labels of `documents`.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut counts = Self::default();
        for doc in documents {
            counts.record(doc.label());
        }
        counts
    }

    pub(crate) fn record(&mut self, label: u32) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    /// Count for `label` (0 if never seen).
    pub fn get(&self, label: u32) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Largest label present, if any.
    pub fn max_label(&self) -> Option<u32> {
        self.counts.keys().next_back().copied()
    }

    /// Number of distinct labels present.
    pub fn num_labels(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// `(label, count)` pairs in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.counts.iter().map(|(&l, &c)| (l, c))
    }
}
