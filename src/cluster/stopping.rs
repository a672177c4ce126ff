//! Stopping policies for the assign/update loop.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use super::centroid::Cluster;
use crate::error::{Error, Result};

/// When to end a k-means run. Checked once after every full iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoppingCriterion {
    /// Stop once this many iterations have run.
    MaxIterations(usize),
    /// Stop once at most this many new centroids are absent (by exact value)
    /// from the previous iteration's centroid set.
    CentroidStability(usize),
    /// Stop once the total best-fit similarity grew by at most this much over
    /// the previous iteration.
    SimilarityGrowth(f64),
}

impl Default for StoppingCriterion {
    fn default() -> Self {
        Self::MaxIterations(100)
    }
}

impl StoppingCriterion {
    /// Build a criterion from its name and a numeric threshold.
    ///
    /// Accepted names: `max_iters`, `centroid`, `similarity` (long forms such as
    /// `max-iterations`, `centroid-stability`, `similarity-growth` also work).
    /// Integer policies require a non-negative whole-number threshold.
    pub fn from_name(name: &str, threshold: f64) -> Result<Self> {
        match name {
            "max_iters" | "max-iters" | "max_iterations" | "max-iterations" => {
                Ok(Self::MaxIterations(whole_threshold(threshold)?))
            }
            "centroid" | "centroid_stability" | "centroid-stability" => {
                Ok(Self::CentroidStability(whole_threshold(threshold)?))
            }
            "similarity" | "similarity_growth" | "similarity-growth" => {
                if !threshold.is_finite() {
                    return Err(Error::InvalidParameter {
                        name: "threshold",
                        message: "must be finite",
                    });
                }
                Ok(Self::SimilarityGrowth(threshold))
            }
            other => Err(Error::UnknownCriterion(other.to_string())),
        }
    }

    /// Short policy name, as accepted by [`StoppingCriterion::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::MaxIterations(_) => "max_iters",
            Self::CentroidStability(_) => "centroid",
            Self::SimilarityGrowth(_) => "similarity",
        }
    }

    /// Decide whether to stop after `iteration` completed iterations.
    ///
    /// Updates `history` for the stateful policies.
    pub(crate) fn should_stop(
        &self,
        iteration: usize,
        clusters: &[Cluster],
        similarity_total: f64,
        history: &mut ConvergenceHistory,
    ) -> bool {
        match *self {
            Self::MaxIterations(max) => iteration >= max,
            Self::CentroidStability(threshold) => {
                let current: Vec<Vec<f32>> =
                    clusters.iter().map(|c| c.centroid().to_vec()).collect();
                let changed = current
                    .iter()
                    .filter(|c| !history.centroids.contains(*c))
                    .count();
                history.centroids = current;
                trace!(iteration, changed, threshold, "centroid stability check");
                changed <= threshold
            }
            Self::SimilarityGrowth(threshold) => {
                // A document sitting exactly on a centroid makes the total +∞;
                // two infinite totals in a row count as no growth.
                let growth = if similarity_total.is_infinite()
                    && similarity_total == history.similarity_total
                {
                    0.0
                } else {
                    similarity_total - history.similarity_total
                };
                history.similarity_total = similarity_total;
                trace!(iteration, growth, threshold, "similarity growth check");
                growth <= threshold
            }
        }
    }
}

fn whole_threshold(threshold: f64) -> Result<usize> {
    if !threshold.is_finite() || threshold < 0.0 || threshold.fract() != 0.0 {
        return Err(Error::InvalidParameter {
            name: "threshold",
            message: "must be a non-negative whole number for this criterion",
        });
    }
    Ok(threshold as usize)
}

impl fmt::Display for StoppingCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxIterations(t) | Self::CentroidStability(t) => {
                write!(f, "{}={}", self.name(), t)
            }
            Self::SimilarityGrowth(t) => write!(f, "{}={}", self.name(), t),
        }
    }
}

/// Parses `name=threshold`, e.g. `similarity=1000` or `max_iters=4`.
impl FromStr for StoppingCriterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((name, threshold)) = s.split_once('=') else {
            return Err(Error::InvalidParameter {
                name: "criterion",
                message: "expected name=threshold",
            });
        };
        let threshold: f64 = threshold.trim().parse().map_err(|_| Error::InvalidParameter {
            name: "threshold",
            message: "not a number",
        })?;
        Self::from_name(name.trim(), threshold)
    }
}

/// What the previous iteration left behind for the stateful stopping policies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvergenceHistory {
    centroids: Vec<Vec<f32>>,
    similarity_total: f64,
}

impl ConvergenceHistory {
    /// Centroid set recorded by the last centroid-stability check.
    pub fn centroids(&self) -> &[Vec<f32>] {
        &self.centroids
    }

    /// Similarity total recorded by the last similarity-growth check.
    pub fn similarity_total(&self) -> f64 {
        self.similarity_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters(centroids: &[&[f32]]) -> Vec<Cluster> {
        centroids.iter().map(|c| Cluster::new(c.to_vec())).collect()
    }

    #[test]
    fn from_name_accepts_known_policies() {
        assert_eq!(
            StoppingCriterion::from_name("max_iters", 4.0).unwrap(),
            StoppingCriterion::MaxIterations(4)
        );
        assert_eq!(
            StoppingCriterion::from_name("centroid", 0.0).unwrap(),
            StoppingCriterion::CentroidStability(0)
        );
        assert_eq!(
            StoppingCriterion::from_name("similarity-growth", 0.5).unwrap(),
            StoppingCriterion::SimilarityGrowth(0.5)
        );
    }

    #[test]
    fn from_name_rejects_unknown_policy() {
        let err = StoppingCriterion::from_name("entropy", 1.0).unwrap_err();
        assert!(matches!(err, Error::UnknownCriterion(name) if name == "entropy"));
    }

    #[test]
    fn integer_policies_reject_fractional_or_negative_thresholds() {
        assert!(StoppingCriterion::from_name("max_iters", 2.5).is_err());
        assert!(StoppingCriterion::from_name("centroid", -1.0).is_err());
        assert!(StoppingCriterion::from_name("similarity", f64::NAN).is_err());
    }

    #[test]
    fn parse_name_equals_threshold() {
        let c: StoppingCriterion = "similarity=1000".parse().unwrap();
        assert_eq!(c, StoppingCriterion::SimilarityGrowth(1000.0));
        assert_eq!(c.to_string(), "similarity=1000");
        assert!("max_iters".parse::<StoppingCriterion>().is_err());
    }

    #[test]
    fn max_iterations_stops_at_threshold() {
        let c = StoppingCriterion::MaxIterations(3);
        let mut h = ConvergenceHistory::default();
        assert!(!c.should_stop(1, &[], 0.0, &mut h));
        assert!(!c.should_stop(2, &[], 0.0, &mut h));
        assert!(c.should_stop(3, &[], 0.0, &mut h));
    }

    #[test]
    fn centroid_stability_counts_unseen_centroids() {
        let c = StoppingCriterion::CentroidStability(0);
        let mut h = ConvergenceHistory::default();

        // First check: nothing recorded yet, so every centroid is new.
        let a = clusters(&[&[1.0, 0.0], &[0.0, 1.0]]);
        assert!(!c.should_stop(1, &a, 0.0, &mut h));
        assert_eq!(h.centroids().len(), 2);

        // Same set, different order: membership, not position, counts.
        let b = clusters(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert!(c.should_stop(2, &b, 0.0, &mut h));

        let moved = clusters(&[&[0.0, 1.0], &[0.6, 0.8]]);
        assert!(!c.should_stop(3, &moved, 0.0, &mut h));
        assert!(StoppingCriterion::CentroidStability(1).should_stop(
            4,
            &clusters(&[&[0.0, 1.0], &[0.8, 0.6]]),
            0.0,
            &mut h
        ));
    }

    #[test]
    fn similarity_growth_compares_with_previous_total() {
        let c = StoppingCriterion::SimilarityGrowth(1.0);
        let mut h = ConvergenceHistory::default();

        assert!(!c.should_stop(1, &[], 10.0, &mut h));
        assert!(!c.should_stop(2, &[], 12.5, &mut h));
        assert!(c.should_stop(3, &[], 13.0, &mut h));
        assert_eq!(h.similarity_total(), 13.0);
    }

    #[test]
    fn repeated_infinite_totals_count_as_converged() {
        let c = StoppingCriterion::SimilarityGrowth(0.0);
        let mut h = ConvergenceHistory::default();

        assert!(!c.should_stop(1, &[], f64::INFINITY, &mut h));
        assert!(c.should_stop(2, &[], f64::INFINITY, &mut h));
    }
}
