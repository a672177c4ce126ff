//! Spherical k-means over dense document vectors.
//!
//! # The Loop
//!
//! 1. **Seed**: every cluster copies the vector of one uniformly sampled document
//!    (with replacement, so two clusters may start from the same document).
//! 2. **Assign**: each document joins the cluster whose centroid is most similar,
//!    where similarity is inverse Euclidean distance:
//!
//!    ```text
//!    sim(x, μ) = 1 / ||x - μ||      (+∞ when x == μ)
//!    ```
//!
//! 3. **Update**: each non-empty cluster moves its centroid to the mean of its
//!    members, rescaled to unit L2 norm. Empty clusters keep their old centroid.
//! 4. Repeat until the configured [`StoppingCriterion`] fires.
//!
//! All documents are assigned before any centroid moves, so the result does not
//! depend on how the assignment pass is scheduled.
//!
//! # Tie-breaking
//!
//! Clusters are scanned in index order and a later cluster only wins on a strictly
//! greater similarity. Equal similarities go to the lowest cluster index.
//!
//! # Differences from Lloyd's k-means
//!
//! - Centroids are unit vectors (the "spherical" variant), which suits
//!   L2-normalized TF-IDF documents.
//! - Empty clusters are not re-seeded; they may stay empty for the rest of the run.

use rand::prelude::*;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::centroid::Cluster;
use super::stopping::{ConvergenceHistory, StoppingCriterion};
use super::traits::Clustering;
use super::util;
use crate::corpus::{Corpus, Document};
use crate::error::{Error, Result};
use crate::metrics::{self, Evaluation};

/// Inverse-distance similarity between a document vector and a centroid.
///
/// Returns `f32::INFINITY` when the two vectors coincide exactly, otherwise a
/// strictly positive value. Higher is closer.
#[inline]
pub fn similarity(vector: &[f32], centroid: &[f32]) -> f32 {
    let dist = util::euclidean(vector, centroid);
    if dist == 0.0 {
        f32::INFINITY
    } else {
        1.0 / dist
    }
}

/// Index and similarity of the best-fit cluster for `vector`.
///
/// First cluster wins ties.
fn select_cluster(clusters: &[Cluster], vector: &[f32]) -> (usize, f32) {
    let mut best_cluster = 0;
    let mut best_sim = -1.0f32;
    for (k, cluster) in clusters.iter().enumerate() {
        let sim = similarity(vector, cluster.centroid());
        if sim > best_sim {
            best_sim = sim;
            best_cluster = k;
        }
    }
    (best_cluster, best_sim)
}

/// K-means configuration.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Random seed for centroid sampling.
    seed: Option<u64>,
    /// When to stop iterating.
    criterion: StoppingCriterion,
}

impl Kmeans {
    /// Create a new K-means clusterer with `k` clusters.
    ///
    /// Defaults: no fixed seed, [`StoppingCriterion::MaxIterations`] of 100.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: None,
            criterion: StoppingCriterion::default(),
        }
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the stopping criterion.
    pub fn with_criterion(mut self, criterion: StoppingCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Configured stopping criterion.
    pub fn criterion(&self) -> StoppingCriterion {
        self.criterion
    }

    /// Cluster a corpus.
    pub fn fit(&self, corpus: &Corpus) -> Result<KmeansFit> {
        self.fit_documents(corpus.documents())
    }

    /// Cluster a slice of documents (all of the same dimensionality).
    pub fn fit_documents(&self, documents: &[Document]) -> Result<KmeansFit> {
        // Without a fixed seed, draw one so the run can still be reproduced from logs.
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());

        let mut engine = KmeansEngine::new(documents, self.k)?;
        engine.random_init(seed);
        engine.run(self.criterion);
        Ok(engine.into_fit())
    }
}

impl Clustering for Kmeans {
    /// Cluster plain vectors; returns one cluster index per input row.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let documents: Vec<Document> = data
            .iter()
            .enumerate()
            .map(|(i, v)| Document::new(v.clone(), 0, i as u64))
            .collect();
        Ok(self.fit_documents(&documents)?.labels().to_vec())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Mutable state of one k-means run.
///
/// [`Kmeans::fit`] drives this for you; use it directly to step through
/// iterations or inspect intermediate clusters.
#[derive(Debug, Clone)]
pub struct KmeansEngine<'a> {
    documents: &'a [Document],
    clusters: Vec<Cluster>,
    iteration: usize,
    similarity_total: f64,
    history: ConvergenceHistory,
}

impl<'a> KmeansEngine<'a> {
    /// Create an engine with `k` clusters over `documents`.
    ///
    /// Centroids start at the origin until [`KmeansEngine::random_init`] runs.
    pub fn new(documents: &'a [Document], k: usize) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyInput);
        }

        if k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }

        let d = documents[0].dim();
        for doc in documents.iter().skip(1) {
            if doc.dim() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: doc.dim(),
                });
            }
        }

        Ok(Self {
            documents,
            clusters: vec![Cluster::new(vec![0.0; d]); k],
            iteration: 0,
            similarity_total: 0.0,
            history: ConvergenceHistory::default(),
        })
    }

    /// Seed every centroid with a uniformly sampled document vector.
    ///
    /// Sampling is with replacement and fully determined by `seed`. Resets the
    /// iteration counter and convergence history.
    pub fn random_init(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = self.documents.len();
        for cluster in &mut self.clusters {
            let idx = rng.random_range(0..n);
            *cluster = Cluster::new(self.documents[idx].vector().to_vec());
        }

        self.iteration = 0;
        self.similarity_total = 0.0;
        self.history = ConvergenceHistory::default();
        debug!(seed, k = self.clusters.len(), "seeded centroids");
    }

    /// Add document `doc_idx` to its best-fit cluster and return that similarity.
    pub fn assign(&mut self, doc_idx: usize) -> f32 {
        let (k, sim) = select_cluster(&self.clusters, self.documents[doc_idx].vector());
        self.clusters[k].add_member(doc_idx);
        sim
    }

    /// Clear all memberships and assign every document in load order.
    ///
    /// Returns the sum of the best-fit similarities.
    pub fn assign_all(&mut self) -> f64 {
        for cluster in &mut self.clusters {
            cluster.reset_members();
        }

        #[cfg(feature = "parallel")]
        {
            let clusters = &self.clusters;
            let choices: Vec<(usize, f32)> = self
                .documents
                .par_iter()
                .map(|doc| select_cluster(clusters, doc.vector()))
                .collect();

            // Sequential reduction keeps member order and the total deterministic.
            let mut total = 0.0f64;
            for (doc_idx, (k, sim)) in choices.into_iter().enumerate() {
                self.clusters[k].add_member(doc_idx);
                total += f64::from(sim);
            }
            total
        }

        #[cfg(not(feature = "parallel"))]
        {
            let mut total = 0.0f64;
            for doc_idx in 0..self.documents.len() {
                total += f64::from(self.assign(doc_idx));
            }
            total
        }
    }

    /// Recompute every centroid from its current members.
    pub fn update_centroids(&mut self) {
        for cluster in &mut self.clusters {
            cluster.update_centroid(self.documents);
        }
    }

    /// Run one full assign + update iteration. Returns the similarity total.
    pub fn step(&mut self) -> f64 {
        self.similarity_total = self.assign_all();
        self.update_centroids();
        self.iteration += 1;

        debug!(
            iteration = self.iteration,
            similarity_total = self.similarity_total,
            non_empty = self.clusters.iter().filter(|c| !c.is_empty()).count(),
            "k-means iteration"
        );
        self.similarity_total
    }

    /// Iterate until `criterion` is satisfied. Returns the iteration count.
    ///
    /// At least one iteration always runs.
    pub fn run(&mut self, criterion: StoppingCriterion) -> usize {
        loop {
            self.step();
            if criterion.should_stop(
                self.iteration,
                &self.clusters,
                self.similarity_total,
                &mut self.history,
            ) {
                break;
            }
        }

        info!(
            iterations = self.iteration,
            %criterion,
            similarity_total = self.similarity_total,
            "k-means converged"
        );
        self.iteration
    }

    /// Current clusters.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Similarity total of the most recent assign pass.
    pub fn similarity_total(&self) -> f64 {
        self.similarity_total
    }

    /// State recorded for the stateful stopping policies.
    pub fn history(&self) -> &ConvergenceHistory {
        &self.history
    }

    /// Finish the run and keep only its results.
    pub fn into_fit(self) -> KmeansFit {
        let mut labels = vec![0usize; self.documents.len()];
        for (k, cluster) in self.clusters.iter().enumerate() {
            for &doc_idx in cluster.members() {
                labels[doc_idx] = k;
            }
        }

        KmeansFit {
            clusters: self.clusters,
            labels,
            iterations: self.iteration,
            similarity_total: self.similarity_total,
        }
    }
}

/// Result of a finished k-means run.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    clusters: Vec<Cluster>,
    labels: Vec<usize>,
    iterations: usize,
    similarity_total: f64,
}

impl KmeansFit {
    /// Final clusters (centroids and members).
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster index per document, in load order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of iterations performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Similarity total of the last assign pass.
    pub fn similarity_total(&self) -> f64 {
        self.similarity_total
    }

    /// Member count per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Cluster::len).collect()
    }

    /// Purity against the corpus' ground-truth labels.
    pub fn purity(&self, corpus: &Corpus) -> Result<f64> {
        metrics::purity(&self.clusters, corpus.documents())
    }

    /// Normalized mutual information against the corpus' ground-truth labels.
    pub fn nmi(&self, corpus: &Corpus) -> Result<f64> {
        metrics::nmi(&self.clusters, corpus.documents(), corpus.label_counts())
    }

    /// Both quality scores plus run statistics.
    pub fn evaluate(&self, corpus: &Corpus) -> Result<Evaluation> {
        Ok(Evaluation {
            purity: self.purity(corpus)?,
            nmi: self.nmi(corpus)?,
            iterations: self.iterations,
            num_documents: corpus.len(),
            cluster_sizes: self.cluster_sizes(),
        })
    }
}
