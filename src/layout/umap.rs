// Compact UMAP reducer.
//
// Steps:
//   1. exact k-nearest neighbors (Euclidean)
//   2. smooth-kNN calibration: per-point rho (nearest non-zero distance) and
//      sigma (binary search so the membership mass equals log2(k))
//   3. fuzzy union of the directed memberships: w = p + q - p*q
//   4. seeded uniform random initialization in [-10, 10]
//   5. curve parameters a, b fitted to spread / min_dist
//   6. epoch-sampled SGD: attraction along graph edges, repulsion from
//      negative samples, gradients clipped to [-4, 4]
//
// Everything runs on one thread from one seeded StdRng, so a fixed seed gives
// bit-identical layouts. Exact kNN is quadratic, fine for the few hundred
// terms a term map holds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::traits::{ReductionError, ReductionParams, Reducer};

const SMOOTH_KNN_ITERATIONS: usize = 64;
const SMOOTH_KNN_TOLERANCE: f64 = 1e-5;
const MIN_K_DIST_SCALE: f64 = 1e-3;
const INIT_RANGE: f64 = 10.0;
const GRADIENT_CLIP: f64 = 4.0;

/// UMAP with umap-learn's default SGD settings.
#[derive(Debug, Clone)]
pub struct UmapReducer {
    pub epochs: usize,
    pub learning_rate: f64,
    pub negative_sample_rate: usize,
}

impl Default for UmapReducer {
    fn default() -> Self {
        Self {
            epochs: 500,
            learning_rate: 1.0,
            negative_sample_rate: 5,
        }
    }
}

impl UmapReducer {
    pub fn with_epochs(epochs: usize) -> Self {
        Self {
            epochs,
            ..Self::default()
        }
    }
}

impl Reducer for UmapReducer {
    fn reduce(
        &self,
        data: &[Vec<f32>],
        params: &ReductionParams,
    ) -> Result<Vec<Vec<f64>>, ReductionError> {
        validate(data, params)?;
        if self.epochs == 0 {
            return Err(ReductionError::InvalidParameter(
                "epochs must be at least 1".to_string(),
            ));
        }

        let n = data.len();
        let distances = pairwise_distances(data);
        let knn = nearest_neighbors(&distances, params.neighbors);
        let edges = fuzzy_graph(&knn, n, self.epochs);
        let (a, b) = find_ab_params(params.spread, params.min_dist);

        debug!(
            points = n,
            neighbors = params.neighbors,
            edges = edges.len(),
            a,
            b,
            epochs = self.epochs,
            "Running UMAP"
        );

        let mut rng = StdRng::seed_from_u64(params.seed);
        let dim = params.target_dim;
        let mut embedding: Vec<f64> = (0..n * dim)
            .map(|_| rng.random_range(-INIT_RANGE..INIT_RANGE))
            .collect();

        self.optimize(&mut embedding, dim, n, &edges, a, b, &mut rng);

        let rows: Vec<Vec<f64>> = embedding.chunks(dim).map(<[f64]>::to_vec).collect();
        if let Some(row) = rows.iter().position(|r| r.iter().any(|v| !v.is_finite())) {
            return Err(ReductionError::NonFinite(row));
        }
        Ok(rows)
    }
}

fn validate(data: &[Vec<f32>], params: &ReductionParams) -> Result<(), ReductionError> {
    let n = data.len();
    if n < 2 {
        return Err(ReductionError::TooFewPoints(n));
    }
    if params.neighbors == 0 || params.neighbors >= n {
        return Err(ReductionError::InvalidNeighbors {
            neighbors: params.neighbors,
            max: n - 1,
        });
    }
    if params.target_dim == 0 {
        return Err(ReductionError::InvalidParameter(
            "target dimensionality must be at least 1".to_string(),
        ));
    }
    if !(params.spread > 0.0 && params.spread.is_finite()) {
        return Err(ReductionError::InvalidParameter(format!(
            "spread must be positive, got {}",
            params.spread
        )));
    }
    if !(params.min_dist >= 0.0 && params.min_dist.is_finite()) {
        return Err(ReductionError::InvalidParameter(format!(
            "min_dist must be non-negative, got {}",
            params.min_dist
        )));
    }
    let expected = data[0].len();
    if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(ReductionError::RaggedInput {
            row,
            expected,
            found: r.len(),
        });
    }
    Ok(())
}

fn pairwise_distances(data: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let n = data.len();
    let mut d = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = data[i]
                .iter()
                .zip(&data[j])
                .map(|(x, y)| {
                    let diff = *x as f64 - *y as f64;
                    diff * diff
                })
                .sum::<f64>()
                .sqrt();
            d[i][j] = dist;
            d[j][i] = dist;
        }
    }
    d
}

/// The k nearest other points of every point, nearest first. Equal
/// distances fall back to index order.
fn nearest_neighbors(distances: &[Vec<f64>], k: usize) -> Vec<Vec<(usize, f64)>> {
    distances
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut others: Vec<(usize, f64)> = row
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, d)| (j, *d))
                .collect();
            others.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
            others.truncate(k);
            others
        })
        .collect()
}

/// Per-point (rho, sigma) from the smooth-kNN binary search.
fn smooth_knn(knn: &[Vec<(usize, f64)>]) -> Vec<(f64, f64)> {
    let all: Vec<f64> = knn.iter().flatten().map(|(_, d)| *d).collect();
    let global_mean = all.iter().sum::<f64>() / all.len().max(1) as f64;

    knn.iter()
        .map(|neighbors| {
            let k = neighbors.len();
            let target = (k as f64).log2();
            let rho = neighbors
                .iter()
                .map(|(_, d)| *d)
                .find(|d| *d > 0.0)
                .unwrap_or(0.0);

            let mut lo = 0.0_f64;
            let mut hi = f64::INFINITY;
            let mut mid = 1.0_f64;
            for _ in 0..SMOOTH_KNN_ITERATIONS {
                let psum: f64 = neighbors
                    .iter()
                    .map(|(_, d)| {
                        let gap = d - rho;
                        if gap > 0.0 {
                            (-gap / mid).exp()
                        } else {
                            1.0
                        }
                    })
                    .sum();

                if (psum - target).abs() < SMOOTH_KNN_TOLERANCE {
                    break;
                }
                if psum > target {
                    hi = mid;
                    mid = (lo + hi) / 2.0;
                } else {
                    lo = mid;
                    mid = if hi.is_infinite() { mid * 2.0 } else { (lo + hi) / 2.0 };
                }
            }

            let local_mean = neighbors.iter().map(|(_, d)| *d).sum::<f64>() / k.max(1) as f64;
            let scale_from = if rho > 0.0 { local_mean } else { global_mean };
            let floor = scale_from * MIN_K_DIST_SCALE;
            (rho, mid.max(floor))
        })
        .collect()
}

struct Edge {
    head: usize,
    tail: usize,
    epochs_per_sample: f64,
}

/// Symmetric fuzzy neighbor graph, both directions of every edge, with
/// edges too weak to be sampled in `epochs` dropped.
fn fuzzy_graph(knn: &[Vec<(usize, f64)>], n: usize, epochs: usize) -> Vec<Edge> {
    let calibration = smooth_knn(knn);

    let mut membership = vec![0.0_f64; n * n];
    for (i, neighbors) in knn.iter().enumerate() {
        let (rho, sigma) = calibration[i];
        for &(j, d) in neighbors {
            let gap = d - rho;
            let w = if gap <= 0.0 || sigma <= 0.0 {
                1.0
            } else {
                (-gap / sigma).exp()
            };
            membership[i * n + j] = w;
        }
    }

    let mut weighted: Vec<(usize, usize, f64)> = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let p = membership[i * n + j];
            let q = membership[j * n + i];
            let w = p + q - p * q;
            if w > 0.0 {
                weighted.push((i, j, w));
            }
        }
    }

    let max_w = weighted.iter().map(|(_, _, w)| *w).fold(0.0_f64, f64::max);
    let min_w = max_w / epochs as f64;

    weighted
        .into_iter()
        .filter(|(_, _, w)| *w >= min_w)
        .map(|(head, tail, w)| Edge {
            head,
            tail,
            epochs_per_sample: max_w / w,
        })
        .collect()
}

/// Fit `1 / (1 + a * x^(2b))` to the target low-dimensional membership
/// curve: 1 below `min_dist`, exponential decay with scale `spread` above.
/// Levenberg–Marquardt from (1, 1) over 300 points on [0, 3 * spread].
pub fn find_ab_params(spread: f64, min_dist: f64) -> (f64, f64) {
    const SAMPLES: usize = 300;
    let xs: Vec<f64> = (0..SAMPLES)
        .map(|i| 3.0 * spread * i as f64 / (SAMPLES - 1) as f64)
        .collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|&x| {
            if x < min_dist {
                1.0
            } else {
                (-(x - min_dist) / spread).exp()
            }
        })
        .collect();

    let sse = |a: f64, b: f64| -> f64 {
        xs.iter()
            .zip(&ys)
            .map(|(&x, &y)| {
                let r = 1.0 / (1.0 + a * x.powf(2.0 * b)) - y;
                r * r
            })
            .sum()
    };

    let (mut a, mut b) = (1.0_f64, 1.0_f64);
    let mut lambda = 1e-3;
    let mut cost = sse(a, b);

    for _ in 0..200 {
        let (mut jaa, mut jab, mut jbb, mut ga, mut gb) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (&x, &y) in xs.iter().zip(&ys) {
            if x <= 0.0 {
                continue;
            }
            let u = x.powf(2.0 * b);
            let denom = 1.0 + a * u;
            let r = 1.0 / denom - y;
            let dfa = -u / (denom * denom);
            let dfb = -a * u * 2.0 * x.ln() / (denom * denom);
            jaa += dfa * dfa;
            jab += dfa * dfb;
            jbb += dfb * dfb;
            ga += dfa * r;
            gb += dfb * r;
        }

        let maa = jaa * (1.0 + lambda);
        let mbb = jbb * (1.0 + lambda);
        let det = maa * mbb - jab * jab;
        if det.abs() < 1e-300 {
            break;
        }
        let da = (-ga * mbb + jab * gb) / det;
        let db = (-gb * maa + jab * ga) / det;
        let (na, nb) = (a + da, b + db);

        let new_cost = if na > 0.0 && nb > 0.0 {
            sse(na, nb)
        } else {
            f64::INFINITY
        };

        if new_cost < cost {
            let improvement = cost - new_cost;
            a = na;
            b = nb;
            cost = new_cost;
            lambda /= 10.0;
            if improvement < 1e-12 {
                break;
            }
        } else {
            lambda *= 10.0;
            if lambda > 1e10 {
                break;
            }
        }
    }

    (a, b)
}

fn clip(v: f64) -> f64 {
    v.clamp(-GRADIENT_CLIP, GRADIENT_CLIP)
}

fn squared_distance(embedding: &[f64], dim: usize, i: usize, j: usize) -> f64 {
    (0..dim)
        .map(|d| {
            let diff = embedding[i * dim + d] - embedding[j * dim + d];
            diff * diff
        })
        .sum()
}

impl UmapReducer {
    #[allow(clippy::too_many_arguments)]
    fn optimize(
        &self,
        embedding: &mut [f64],
        dim: usize,
        n: usize,
        edges: &[Edge],
        a: f64,
        b: f64,
        rng: &mut StdRng,
    ) {
        let negative_rate = self.negative_sample_rate.max(1) as f64;
        let mut next_sample: Vec<f64> = edges.iter().map(|e| e.epochs_per_sample).collect();
        let epochs_per_negative: Vec<f64> = edges
            .iter()
            .map(|e| e.epochs_per_sample / negative_rate)
            .collect();
        let mut next_negative = epochs_per_negative.clone();

        for epoch in 0..self.epochs {
            let alpha = self.learning_rate * (1.0 - epoch as f64 / self.epochs as f64);
            let now = epoch as f64;

            for (e, edge) in edges.iter().enumerate() {
                if next_sample[e] > now {
                    continue;
                }
                let (i, j) = (edge.head, edge.tail);

                let d2 = squared_distance(embedding, dim, i, j);
                let coeff = if d2 > 0.0 {
                    -2.0 * a * b * d2.powf(b - 1.0) / (a * d2.powf(b) + 1.0)
                } else {
                    0.0
                };
                for d in 0..dim {
                    let grad = clip(coeff * (embedding[i * dim + d] - embedding[j * dim + d]));
                    embedding[i * dim + d] += grad * alpha;
                    embedding[j * dim + d] -= grad * alpha;
                }
                next_sample[e] += edge.epochs_per_sample;

                let negatives = ((now - next_negative[e]) / epochs_per_negative[e]).max(0.0) as usize;
                for _ in 0..negatives {
                    let k = rng.random_range(0..n);
                    if k == i {
                        continue;
                    }
                    let d2 = squared_distance(embedding, dim, i, k);
                    let coeff = if d2 > 0.0 {
                        2.0 * b / ((0.001 + d2) * (a * d2.powf(b) + 1.0))
                    } else {
                        0.0
                    };
                    for d in 0..dim {
                        let grad = if coeff > 0.0 {
                            clip(coeff * (embedding[i * dim + d] - embedding[k * dim + d]))
                        } else {
                            GRADIENT_CLIP
                        };
                        embedding[i * dim + d] += grad * alpha;
                    }
                }
                next_negative[e] += negatives as f64 * epochs_per_negative[e];
            }
        }
    }
}
