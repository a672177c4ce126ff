use crate::error::Result;

/// Common interface for hard clustering of plain dense vectors (one label per row).
///
/// Use this when there is no corpus or ground truth, just vectors to group.
pub trait Clustering {
    /// Fit the model and return one cluster index per input row.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// The configured number of clusters.
    fn n_clusters(&self) -> usize;
}
