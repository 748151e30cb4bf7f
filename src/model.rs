//! K-Means clustering over the term-document matrix

use crate::error::{ClusterError, Result};
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters for a K-Means fit
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansParams {
    /// Iteration cap for a single run
    pub max_iterations: usize,
    /// A run stops once the total squared centroid shift drops below this
    pub tolerance: f64,
    /// Independent initializations; the lowest-inertia run is kept
    pub n_init: usize,
    /// Initialization seed; drawn at random when absent
    pub seed: Option<u64>,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-4,
            n_init: 10,
            seed: None,
        }
    }
}

/// Fitted K-Means model
#[derive(Debug, Clone)]
pub struct KMeansModel {
    /// Number of clusters
    pub n_clusters: usize,
    /// Cluster assignment per document, in document order
    pub labels: Array1<usize>,
    /// One centroid row per cluster
    pub centroids: Array2<f64>,
    /// Within-cluster sum of squares (inertia)
    pub inertia: f64,
    /// Iterations taken by the winning run
    pub iterations: usize,
    /// Seed the fit was started from
    pub seed: u64,
}

impl KMeansModel {
    /// Nearest centroid for a row; ties go to the lowest cluster id
    pub fn predict(&self, features: ArrayView1<f64>) -> Result<usize> {
        if features.len() != self.centroids.ncols() {
            return Err(ClusterError::input_format(format!(
                "feature vector has {} dimensions, model expects {}",
                features.len(),
                self.centroids.ncols()
            )));
        }
        Ok(nearest_centroid(features, &self.centroids))
    }

    /// Documents per cluster, indexed by cluster id
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &label in self.labels.iter() {
            sizes[label] += 1;
        }
        sizes
    }

    /// Mean silhouette coefficient over the first `sample_size` rows.
    ///
    /// A point alone in its cluster scores 0, as does every point when the
    /// sample spans a single cluster.
    pub fn compute_silhouette_sample(&self, features: &Array2<f64>, sample_size: usize) -> f64 {
        let n = features.nrows().min(sample_size);
        if n < 2 {
            return 0.0;
        }
        let sample = features.slice(s![..n, ..]);

        let total: f64 = (0..n)
            .map(|i| {
                // distance sums and counts per cluster, excluding the point itself
                let mut sums = vec![0.0; self.n_clusters];
                let mut counts = vec![0usize; self.n_clusters];
                for (j, other) in sample.outer_iter().enumerate().filter(|&(j, _)| j != i) {
                    let label = self.labels[j];
                    sums[label] += squared_distance(sample.row(i), other).sqrt();
                    counts[label] += 1;
                }

                let own = self.labels[i];
                if counts[own] == 0 {
                    return 0.0;
                }
                let a = sums[own] / counts[own] as f64;
                let b = (0..self.n_clusters)
                    .filter(|&c| c != own && counts[c] > 0)
                    .map(|c| sums[c] / counts[c] as f64)
                    .fold(f64::INFINITY, f64::min);

                if b.is_infinite() || a.max(b) == 0.0 {
                    0.0
                } else {
                    (b - a) / a.max(b)
                }
            })
            .sum();

        total / n as f64
    }
}

/// Check a requested cluster count against the number of documents
pub fn validate_cluster_count(requested: i64, n_documents: usize) -> Result<usize> {
    if requested <= 0 || requested as u64 > n_documents as u64 {
        return Err(ClusterError::InvalidClusterCount {
            requested,
            documents: n_documents,
        });
    }
    Ok(requested as usize)
}

/// Fit K-Means on `features`
///
/// # Arguments
/// * `features` - One row per document
/// * `n_clusters` - Requested K; must be in `1..=features.nrows()`
/// * `params` - Iteration cap, tolerance, restarts and seed
///
/// # Returns
/// * Fitted `KMeansModel` from the lowest-inertia initialization
pub fn fit_kmeans(
    features: &Array2<f64>,
    n_clusters: i64,
    params: &KMeansParams,
) -> Result<KMeansModel> {
    let k = validate_cluster_count(n_clusters, features.nrows())?;
    let seed = params.seed.unwrap_or_else(rand::random);
    tracing::info!(k, seed, n_init = params.n_init, "fitting K-Means");

    let mut best: Option<RunResult> = None;
    for run in 0..params.n_init.max(1) {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(run as u64));
        let candidate = fit_single(features, k, params, &mut rng);
        tracing::debug!(
            run,
            inertia = candidate.inertia,
            iterations = candidate.iterations,
            "K-Means run finished"
        );
        if best.as_ref().map_or(true, |b| candidate.inertia < b.inertia) {
            best = Some(candidate);
        }
    }

    let best = best.ok_or_else(|| ClusterError::config("n_init must be at least 1"))?;
    tracing::info!(inertia = best.inertia, iterations = best.iterations, "K-Means converged");

    Ok(KMeansModel {
        n_clusters: k,
        labels: best.labels,
        centroids: best.centroids,
        inertia: best.inertia,
        iterations: best.iterations,
        seed,
    })
}

struct RunResult {
    labels: Array1<usize>,
    centroids: Array2<f64>,
    inertia: f64,
    iterations: usize,
}

fn fit_single(
    features: &Array2<f64>,
    k: usize,
    params: &KMeansParams,
    rng: &mut StdRng,
) -> RunResult {
    let mut centroids = kmeans_plus_plus_init(features, k, rng);
    let mut labels = assign(features, &centroids);
    let mut iterations = 0;

    for _ in 0..params.max_iterations {
        iterations += 1;
        let updated = update_centroids(features, &labels, &centroids);
        let shift: f64 = (&updated - &centroids).mapv(|d| d * d).sum();
        centroids = updated;

        let next_labels = assign(features, &centroids);
        let stable = next_labels == labels;
        labels = next_labels;
        if stable || shift <= params.tolerance {
            break;
        }
    }

    let inertia = compute_inertia(features, &labels, &centroids);
    RunResult {
        labels,
        centroids,
        inertia,
        iterations,
    }
}

/// K-Means++ seeding: first centroid uniform, the rest weighted by squared distance
fn kmeans_plus_plus_init(features: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n = features.nrows();
    let mut centroids = Array2::<f64>::zeros((k, features.ncols()));
    centroids.row_mut(0).assign(&features.row(rng.gen_range(0..n)));

    let mut min_distances: Vec<f64> = features
        .outer_iter()
        .map(|row| squared_distance(row, centroids.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = min_distances.iter().sum();
        let selected = if total <= 0.0 {
            rng.gen_range(0..n)
        } else {
            let threshold = rng.gen::<f64>() * total;
            let mut cumsum = 0.0;
            let mut selected = n - 1;
            for (i, &d) in min_distances.iter().enumerate() {
                cumsum += d;
                if d > 0.0 && cumsum >= threshold {
                    selected = i;
                    break;
                }
            }
            selected
        };

        centroids.row_mut(c).assign(&features.row(selected));
        for (i, row) in features.outer_iter().enumerate() {
            let d = squared_distance(row, centroids.row(c));
            if d < min_distances[i] {
                min_distances[i] = d;
            }
        }
    }

    centroids
}

fn assign(features: &Array2<f64>, centroids: &Array2<f64>) -> Array1<usize> {
    features
        .outer_iter()
        .map(|row| nearest_centroid(row, centroids))
        .collect()
}

/// Mean of each cluster's rows; an empty cluster keeps its previous centroid
fn update_centroids(
    features: &Array2<f64>,
    labels: &Array1<usize>,
    previous: &Array2<f64>,
) -> Array2<f64> {
    let k = previous.nrows();
    let mut sums = Array2::<f64>::zeros(previous.raw_dim());
    let mut counts = vec![0usize; k];

    for (row, &label) in features.outer_iter().zip(labels.iter()) {
        let mut sum = sums.row_mut(label);
        sum += &row;
        counts[label] += 1;
    }

    for (cluster, mut centroid) in sums.axis_iter_mut(Axis(0)).enumerate() {
        if counts[cluster] == 0 {
            centroid.assign(&previous.row(cluster));
        } else {
            centroid /= counts[cluster] as f64;
        }
    }
    sums
}

fn nearest_centroid(point: ArrayView1<f64>, centroids: &Array2<f64>) -> usize {
    let mut min_distance = f64::INFINITY;
    let mut closest_cluster = 0;

    for (cluster_idx, centroid) in centroids.outer_iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < min_distance {
            min_distance = distance;
            closest_cluster = cluster_idx;
        }
    }

    closest_cluster
}

/// Compute within-cluster sum of squares (inertia)
fn compute_inertia(features: &Array2<f64>, labels: &Array1<usize>, centroids: &Array2<f64>) -> f64 {
    features
        .outer_iter()
        .zip(labels.iter())
        .map(|(row, &cluster)| squared_distance(row, centroids.row(cluster)))
        .sum()
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_blobs() -> Array2<f64> {
        array![
            [1.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 5.0, 5.0],
            [0.0, 0.0, 5.0, 4.0],
            [1.0, 1.0, 1.0, 0.0],
        ]
    }

    fn seeded(seed: u64) -> KMeansParams {
        KMeansParams {
            seed: Some(seed),
            ..KMeansParams::default()
        }
    }

    #[test]
    fn test_fit_kmeans() {
        let model = fit_kmeans(&two_blobs(), 2, &seeded(42)).unwrap();

        assert_eq!(model.n_clusters, 2);
        assert_eq!(model.labels.len(), 5);
        assert_eq!(model.centroids.shape(), &[2, 4]);
        assert_eq!(model.seed, 42);
        assert!(model.iterations >= 1);
        assert_eq!(model.labels[2], model.labels[3]);
        assert_eq!(model.labels[0], model.labels[1]);
        assert_ne!(model.labels[0], model.labels[2]);
    }

    #[test]
    fn test_every_k_covers_every_document() {
        let features = two_blobs();
        for k in 1..=features.nrows() {
            let model = fit_kmeans(&features, k as i64, &seeded(7)).unwrap();
            assert_eq!(model.labels.len(), features.nrows());
            assert!(model.labels.iter().all(|&l| l < k));
            assert_eq!(model.cluster_sizes().iter().sum::<usize>(), features.nrows());
            assert_eq!(model.centroids.nrows(), k);
        }
    }

    #[test]
    fn test_same_seed_same_partition() {
        let a = fit_kmeans(&two_blobs(), 2, &seeded(3)).unwrap();
        let b = fit_kmeans(&two_blobs(), 2, &seeded(3)).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_missing_seed_is_reported() {
        let model = fit_kmeans(&two_blobs(), 2, &KMeansParams::default()).unwrap();
        let replay = fit_kmeans(&two_blobs(), 2, &seeded(model.seed)).unwrap();
        assert_eq!(model.labels, replay.labels);
    }

    #[test]
    fn test_invalid_cluster_count() {
        let features = two_blobs();

        let result = fit_kmeans(&features, 0, &seeded(1));
        assert!(matches!(
            result,
            Err(ClusterError::InvalidClusterCount { requested: 0, documents: 5 })
        ));

        let result = fit_kmeans(&features, -3, &seeded(1));
        assert!(matches!(result, Err(ClusterError::InvalidClusterCount { requested: -3, .. })));

        let result = fit_kmeans(&features, 6, &seeded(1));
        assert!(matches!(result, Err(ClusterError::InvalidClusterCount { requested: 6, .. })));
    }

    #[test]
    fn test_identical_rows_leave_empty_clusters_valid() {
        let features = Array2::<f64>::ones((3, 2));
        let model = fit_kmeans(&features, 3, &seeded(11)).unwrap();

        // every row ties on distance, so the lowest id takes them all
        assert!(model.labels.iter().all(|&l| l == 0));
        assert_eq!(model.cluster_sizes(), vec![3, 0, 0]);
        assert!(model.centroids.iter().all(|v| v.is_finite()));
        assert_eq!(model.inertia, 0.0);
    }

    #[test]
    fn test_empty_cluster_keeps_previous_centroid() {
        let features = array![[0.0, 0.0], [2.0, 2.0]];
        let previous = array![[1.0, 1.0], [9.0, 9.0]];
        let labels = Array1::from(vec![0, 0]);

        let updated = update_centroids(&features, &labels, &previous);
        assert_eq!(updated.row(0), array![1.0, 1.0]);
        assert_eq!(updated.row(1), array![9.0, 9.0]);
    }

    #[test]
    fn test_predict_ties_go_to_lowest_id() {
        let model = KMeansModel {
            n_clusters: 2,
            labels: Array1::from(vec![0, 1]),
            centroids: array![[0.0, 0.0], [2.0, 0.0]],
            inertia: 0.0,
            iterations: 1,
            seed: 0,
        };
        assert_eq!(model.predict(array![1.0, 0.0].view()).unwrap(), 0);
        assert_eq!(model.predict(array![1.5, 0.0].view()).unwrap(), 1);
        assert!(model.predict(array![1.0, 2.0, 3.0].view()).is_err());
    }

    #[test]
    fn test_silhouette_singletons_and_single_cluster_score_zero() {
        let features = array![[0.0, 0.0], [0.0, 1.0], [9.0, 9.0]];
        let model = KMeansModel {
            n_clusters: 2,
            labels: Array1::from(vec![0, 0, 0]),
            centroids: array![[3.0, 3.3], [0.0, 0.0]],
            inertia: 0.0,
            iterations: 1,
            seed: 0,
        };
        assert_eq!(model.compute_silhouette_sample(&features, 100), 0.0);
        assert_eq!(model.compute_silhouette_sample(&features, 1), 0.0);

        let split = KMeansModel {
            labels: Array1::from(vec![0, 0, 1]),
            ..model
        };
        // the lone point in cluster 1 contributes 0
        let score = split.compute_silhouette_sample(&features, 100);
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_silhouette_is_bounded() {
        let features = two_blobs();
        let model = fit_kmeans(&features, 2, &seeded(42)).unwrap();
        let score = model.compute_silhouette_sample(&features, 100);
        assert!((-1.0..=1.0).contains(&score));
        assert!(score > 0.0);
    }
}
