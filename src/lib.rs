//! Document clustering over TF-IDF vectors.
//!
//! `doclump` loads labeled sparse TF-IDF vectors, groups them with a spherical
//! k-means engine, and scores the grouping against the ground-truth labels.
//!
//! - [`corpus`]: the `label<fff>doc_id<fff>index:weight ...` reader and the
//!   in-memory document arena
//! - [`cluster`]: k-means (random seeding, assign/update loop, three stopping policies)
//! - [`metrics`]: purity and normalized mutual information
//!
//! ```rust
//! use doclump::{Corpus, Kmeans, StoppingCriterion};
//!
//! let data = "0<fff>1<fff>0:1.0\n0<fff>2<fff>0:0.9 1:0.1\n";
//! let corpus = Corpus::from_reader(data.as_bytes(), 3).unwrap();
//!
//! let fit = Kmeans::new(1)
//!     .with_seed(2018)
//!     .with_criterion(StoppingCriterion::MaxIterations(1))
//!     .fit(&corpus)
//!     .unwrap();
//!
//! assert_eq!(fit.purity(&corpus).unwrap(), 1.0);
//! assert_eq!(fit.nmi(&corpus).unwrap(), 0.0);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod corpus;
pub mod error;
pub mod metrics;

pub use cluster::{
    similarity, Cluster, Clustering, ConvergenceHistory, Kmeans, KmeansEngine, KmeansFit,
    StoppingCriterion,
};
pub use corpus::{Corpus, Document, LabelCounts};
pub use error::{Error, Result};
pub use metrics::Evaluation;
