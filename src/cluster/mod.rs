//! Document clustering by iterative centroid refinement.
//!
//! ## Spherical k-means
//!
//! The engine in this module is a k-means variant tuned for TF-IDF documents:
//! assign each document to its most similar centroid, then move each centroid to
//! the unit-length mean of its members. Repeat.
//!
//! **Similarity** is inverse Euclidean distance, `1 / ||x - μ||`, with `+∞` for
//! a document that sits exactly on a centroid.
//!
//! **Objective**: with unit-length centroids, nearest-by-distance is the same as
//! largest dot product, so each iteration does not decrease
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} x · μ_k
//! ```
//!
//! ## Stopping
//!
//! Three policies, chosen once per run via [`StoppingCriterion`]:
//!
//! - **max_iters**: a fixed number of iterations.
//! - **centroid**: centroids stop moving (up to a mismatch allowance).
//! - **similarity**: total best-fit similarity stops growing by more than a threshold.
//!
//! ## Usage
//!
//! ```rust
//! use doclump::cluster::{Clustering, Kmeans, StoppingCriterion};
//!
//! let data = vec![
//!     vec![1.0, 0.0],
//!     vec![0.9, 0.1],
//!     vec![0.0, 1.0],
//!     vec![0.1, 0.9],
//! ];
//!
//! let kmeans = Kmeans::new(2)
//!     .with_seed(2018)
//!     .with_criterion(StoppingCriterion::MaxIterations(10));
//! let labels = kmeans.fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), data.len());
//! assert!(labels.iter().all(|&l| l < 2));
//! ```

mod centroid;
mod kmeans;
mod stopping;
mod traits;
mod util;

pub use centroid::Cluster;
pub use kmeans::{similarity, Kmeans, KmeansEngine, KmeansFit};
pub use stopping::{ConvergenceHistory, StoppingCriterion};
pub use traits::Clustering;
