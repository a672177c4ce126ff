use super::util;
use crate::corpus::Document;

/// One cluster: a centroid plus the documents assigned to it this iteration.
///
/// Members are indices into the corpus' document list. They are only meaningful
/// for the current iteration; the engine clears them before every assign pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    centroid: Vec<f32>,
    members: Vec<usize>,
}

impl Cluster {
    /// Create a cluster seeded with `centroid` and no members.
    pub fn new(centroid: Vec<f32>) -> Self {
        Self {
            centroid,
            members: Vec::new(),
        }
    }

    /// Current centroid.
    pub fn centroid(&self) -> &[f32] {
        &self.centroid
    }

    /// Indices of the documents assigned during the last pass.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no document chose this cluster.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn reset_members(&mut self) {
        self.members.clear();
    }

    pub(crate) fn add_member(&mut self, doc_idx: usize) {
        self.members.push(doc_idx);
    }

    /// Move the centroid to the L2-normalized mean of the members' vectors.
    ///
    /// An empty cluster keeps its previous centroid.
    pub fn update_centroid(&mut self, documents: &[Document]) {
        if self.members.is_empty() {
            return;
        }

        let rows = self.members.iter().map(|&i| documents[i].vector());
        let mut mean = util::mean_of(rows, self.centroid.len());
        util::normalize_in_place(&mut mean);
        self.centroid = mean;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_member_centroid_is_unit_length_copy() {
        let docs = vec![Document::new(vec![3.0, 0.0, 4.0], 0, 1)];
        let mut cluster = Cluster::new(vec![1.0, 1.0, 1.0]);
        cluster.add_member(0);
        cluster.update_centroid(&docs);

        let c = cluster.centroid();
        assert!((c[0] - 0.6).abs() < 1e-6);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 0.8).abs() < 1e-6);
        assert!((util::l2_norm(c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn centroid_is_normalized_mean() {
        let docs = vec![
            Document::new(vec![2.0, 0.0], 0, 1),
            Document::new(vec![0.0, 2.0], 1, 2),
            Document::new(vec![9.0, 9.0], 1, 3),
        ];
        let mut cluster = Cluster::new(vec![0.0, 0.0]);
        cluster.add_member(0);
        cluster.add_member(1);
        cluster.update_centroid(&docs);

        let expected = 1.0 / 2.0f32.sqrt();
        assert!((cluster.centroid()[0] - expected).abs() < 1e-6);
        assert!((cluster.centroid()[1] - expected).abs() < 1e-6);
    }

    #[test]
    fn empty_cluster_keeps_stale_centroid() {
        let docs = vec![Document::new(vec![1.0, 0.0], 0, 1)];
        let mut cluster = Cluster::new(vec![0.25, 0.5]);
        cluster.update_centroid(&docs);
        assert_eq!(cluster.centroid(), &[0.25, 0.5]);
    }

    #[test]
    fn all_zero_members_give_zero_centroid() {
        let docs = vec![Document::new(vec![0.0, 0.0], 0, 1)];
        let mut cluster = Cluster::new(vec![1.0, 0.0]);
        cluster.add_member(0);
        cluster.update_centroid(&docs);
        assert_eq!(cluster.centroid(), &[0.0, 0.0]);
    }

    #[test]
    fn reset_clears_members() {
        let mut cluster = Cluster::new(vec![0.0]);
        cluster.add_member(3);
        cluster.add_member(5);
        assert_eq!(cluster.members(), &[3, 5]);
        cluster.reset_members();
        assert!(cluster.is_empty());
    }
}
