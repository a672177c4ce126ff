//! Clustering quality against ground-truth labels: purity and NMI.
//!
//! Both scores need the clusters to partition the documents they are given.
//! An empty document set is an error rather than a NaN.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cluster::Cluster;
use crate::corpus::{Document, LabelCounts};
use crate::error::{Error, Result};

/// Added inside the logarithm of each mutual-information term.
pub const NMI_EPSILON: f64 = 1e-12;

/// Scores and statistics of one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Fraction of documents carrying their cluster's majority label.
    pub purity: f64,
    /// Normalized mutual information between clusters and labels.
    pub nmi: f64,
    /// Iterations the run took.
    pub iterations: usize,
    /// Documents scored.
    pub num_documents: usize,
    /// Member count per cluster, in cluster order.
    pub cluster_sizes: Vec<usize>,
}

/// Check that `clusters` partition `documents`: every member index is in
/// range, no document is claimed twice, and every document is claimed.
fn check_partition(clusters: &[Cluster], documents: &[Document]) -> Result<()> {
    let mut seen = vec![false; documents.len()];
    let mut total = 0usize;
    for &i in clusters.iter().flat_map(|c| c.members()) {
        let Some(slot) = seen.get_mut(i) else {
            return Err(Error::InvalidParameter {
                name: "clusters",
                message: "member index outside the scored documents",
            });
        };
        if *slot {
            return Err(Error::InvalidParameter {
                name: "clusters",
                message: "document assigned to more than one cluster",
            });
        }
        *slot = true;
        total += 1;
    }
    if total != documents.len() {
        return Err(Error::DimensionMismatch {
            expected: documents.len(),
            found: total,
        });
    }
    Ok(())
}

/// Label histogram of one cluster's members.
fn member_label_counts(cluster: &Cluster, documents: &[Document]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for &i in cluster.members() {
        *counts.entry(documents[i].label()).or_insert(0) += 1;
    }
    counts
}

/// Compute cluster purity.
///
/// ```text
/// purity = (1/N) · Σ_k max_j |ω_k ∩ c_j|
/// ```
///
/// Empty clusters contribute 0.
pub fn purity(clusters: &[Cluster], documents: &[Document]) -> Result<f64> {
    if documents.is_empty() {
        return Err(Error::InsufficientData);
    }
    check_partition(clusters, documents)?;

    let majority_sum: usize = clusters
        .iter()
        .map(|cluster| {
            member_label_counts(cluster, documents)
                .into_values()
                .max()
                .unwrap_or(0)
        })
        .sum();

    Ok(majority_sum as f64 / documents.len() as f64)
}

/// `-p·log10(p)`, with the `0·log 0 = 0` convention.
#[inline]
fn entropy_term(count: usize, n: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let p = count as f64 / n;
    -p * p.log10()
}

/// Compute Normalized Mutual Information.
///
/// ```text
/// H(Ω) = -Σ_k (|ω_k|/N) log(|ω_k|/N)
/// H(C) = -Σ_j (c_j/N) log(c_j/N)
/// I    =  Σ_k Σ_j (n_kj/N) log(N·n_kj / (|ω_k|·c_j) + ε)
/// NMI  = 2·I / (H(Ω) + H(C))
/// ```
///
/// All logarithms are base 10. When both entropies are zero (one cluster, one
/// label) the partitions carry no information and the score is 0.
pub fn nmi(
    clusters: &[Cluster],
    documents: &[Document],
    label_counts: &LabelCounts,
) -> Result<f64> {
    if documents.is_empty() {
        return Err(Error::InsufficientData);
    }
    check_partition(clusters, documents)?;
    let n = documents.len() as f64;

    let mut h_omega = 0.0f64;
    let mut mutual_info = 0.0f64;
    for cluster in clusters {
        if cluster.is_empty() {
            continue;
        }
        let wk = cluster.len() as f64;
        h_omega += entropy_term(cluster.len(), n);

        // Pairs with n_kj = 0 contribute 0·log(ε) = 0, so only present labels are visited.
        for (label, count) in member_label_counts(cluster, documents) {
            let cj = label_counts.get(label);
            if cj == 0 {
                return Err(Error::InvalidParameter {
                    name: "label_counts",
                    message: "missing a label found among cluster members",
                });
            }
            let wk_cj = count as f64;
            mutual_info += wk_cj / n * (n * wk_cj / (wk * cj as f64) + NMI_EPSILON).log10();
        }
    }

    let h_c: f64 = label_counts
        .iter()
        .map(|(_, count)| entropy_term(count, n))
        .sum();

    let denom = h_omega + h_c;
    if denom < f64::EPSILON {
        return Ok(0.0);
    }
    Ok(2.0 * mutual_info / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build clusters from explicit member lists; centroids are irrelevant here.
    fn clusters_from(members: &[&[usize]]) -> Vec<Cluster> {
        members
            .iter()
            .map(|ms| {
                let mut c = Cluster::new(vec![0.0]);
                for &m in *ms {
                    c.add_member(m);
                }
                c
            })
            .collect()
    }

    fn labeled(labels: &[u32]) -> Vec<Document> {
        labels
            .iter()
            .enumerate()
            .map(|(i, &l)| Document::new(vec![0.0], l, i as u64))
            .collect()
    }

    #[test]
    fn purity_of_perfect_split_is_one() {
        let docs = labeled(&[0, 0, 1, 1, 2]);
        let clusters = clusters_from(&[&[0, 1], &[2, 3], &[4]]);
        assert_eq!(purity(&clusters, &docs).unwrap(), 1.0);
    }

    #[test]
    fn purity_counts_majority_per_cluster() {
        let docs = labeled(&[0, 0, 1, 1, 1, 2]);
        // Cluster 0: {0,0,1} -> 2. Cluster 1: {1,1,2} -> 2. Empty cluster -> 0.
        let clusters = clusters_from(&[&[0, 1, 2], &[3, 4, 5], &[]]);
        let p = purity(&clusters, &docs).unwrap();
        assert!((p - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn nmi_of_perfect_split_is_one() {
        let docs = labeled(&[0, 0, 1, 1]);
        let counts = LabelCounts::from_documents(&docs);
        let clusters = clusters_from(&[&[0, 1], &[2, 3]]);
        let score = nmi(&clusters, &docs, &counts).unwrap();
        assert!((score - 1.0).abs() < 1e-9, "nmi = {score}");
    }

    #[test]
    fn nmi_of_single_cluster_is_zero() {
        let docs = labeled(&[0, 1, 1, 2, 2, 2]);
        let counts = LabelCounts::from_documents(&docs);
        let clusters = clusters_from(&[&[0, 1, 2, 3, 4, 5]]);
        let score = nmi(&clusters, &docs, &counts).unwrap();
        assert!(score.abs() < 1e-9, "nmi = {score}");
    }

    #[test]
    fn nmi_of_single_cluster_single_label_is_zero() {
        let docs = labeled(&[3, 3, 3]);
        let counts = LabelCounts::from_documents(&docs);
        let clusters = clusters_from(&[&[0, 1, 2]]);
        assert_eq!(nmi(&clusters, &docs, &counts).unwrap(), 0.0);
    }

    #[test]
    fn nmi_of_independent_split_is_near_zero() {
        // Each cluster has the same label mix as the whole corpus.
        let docs = labeled(&[0, 1, 0, 1]);
        let counts = LabelCounts::from_documents(&docs);
        let clusters = clusters_from(&[&[0, 1], &[2, 3]]);
        let score = nmi(&clusters, &docs, &counts).unwrap();
        assert!(score.abs() < 1e-9, "nmi = {score}");
    }

    #[test]
    fn nmi_skips_empty_clusters() {
        let docs = labeled(&[0, 0, 1, 1]);
        let counts = LabelCounts::from_documents(&docs);
        let with_empty = clusters_from(&[&[0, 1], &[], &[2, 3]]);
        let without = clusters_from(&[&[0, 1], &[2, 3]]);
        assert_eq!(
            nmi(&with_empty, &docs, &counts).unwrap(),
            nmi(&without, &docs, &counts).unwrap()
        );
    }

    #[test]
    fn nmi_is_between_zero_and_one_for_partial_agreement() {
        let docs = labeled(&[0, 0, 0, 1, 1, 1]);
        let counts = LabelCounts::from_documents(&docs);
        let clusters = clusters_from(&[&[0, 1, 3], &[2, 4, 5]]);
        let score = nmi(&clusters, &docs, &counts).unwrap();
        assert!(score > 0.0 && score < 1.0, "nmi = {score}");
    }

    #[test]
    fn empty_dataset_is_insufficient_data() {
        let clusters = clusters_from(&[&[]]);
        assert!(matches!(purity(&clusters, &[]), Err(Error::InsufficientData)));
        assert!(matches!(
            nmi(&clusters, &[], &LabelCounts::default()),
            Err(Error::InsufficientData)
        ));
    }

    #[test]
    fn nmi_rejects_label_counts_that_miss_a_member_label() {
        let docs = labeled(&[0, 1]);
        let counts = LabelCounts::from_documents(&docs[..1]);
        let clusters = clusters_from(&[&[0, 1]]);
        assert!(nmi(&clusters, &docs, &counts).is_err());
    }

    #[test]
    fn member_index_past_the_documents_is_rejected() {
        let docs = labeled(&[0]);
        let counts = LabelCounts::from_documents(&docs);
        let clusters = clusters_from(&[&[0, 2], &[1]]);
        assert!(matches!(
            purity(&clusters, &docs),
            Err(Error::InvalidParameter { name: "clusters", .. })
        ));
        assert!(matches!(
            nmi(&clusters, &docs, &counts),
            Err(Error::InvalidParameter { name: "clusters", .. })
        ));
    }

    #[test]
    fn clusters_must_cover_every_document_once() {
        let docs = labeled(&[0, 0, 1, 1]);
        let counts = LabelCounts::from_documents(&docs);

        let missing = clusters_from(&[&[0, 1], &[2]]);
        assert!(matches!(
            purity(&missing, &docs),
            Err(Error::DimensionMismatch {
                expected: 4,
                found: 3
            })
        ));
        assert!(matches!(
            nmi(&missing, &docs, &counts),
            Err(Error::DimensionMismatch { .. })
        ));

        let repeated = clusters_from(&[&[0, 1, 2], &[2, 3]]);
        assert!(purity(&repeated, &docs).is_err());
        assert!(nmi(&repeated, &docs, &counts).is_err());
    }
}
