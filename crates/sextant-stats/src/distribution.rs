use nalgebra::{SMatrix, SVector};

/// Minimum number of samples for a covariance estimate to be considered meaningful.
pub const MIN_SAMPLES: usize = 3;

/// Online estimator of the mean and covariance of `D`-dimensional samples.
///
/// Samples are folded in one at a time with Welford's update, so neither the
/// samples nor a second pass over them are needed. The accumulator keeps the
/// sample count, the running mean and the scatter matrix, i.e. the
/// unnormalized sum of outer products of the centered samples.
///
/// Example:
///
/// ```
/// use nalgebra::Vector2;
/// use sextant_stats::Distribution;
///
/// let mut dist = Distribution::<2>::new();
/// for p in [[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]] {
///     dist.add(&Vector2::from(p));
/// }
/// assert_eq!(dist.n(), 4);
/// assert!((dist.mean() - Vector2::new(1.0, 1.0)).norm() < 1e-12);
/// assert!((dist.covariance()[(0, 0)] - 4.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution<const D: usize> {
    n: usize,
    mean: SVector<f64, D>,
    scatter: SMatrix<f64, D, D>,
}

impl<const D: usize> Distribution<D> {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self {
            n: 0,
            mean: SVector::zeros(),
            scatter: SMatrix::zeros(),
        }
    }

    /// Rebuild a distribution from its sample count, mean and sample covariance.
    ///
    /// A count of zero yields the empty distribution, whatever the other fields hold.
    pub fn from_parts(n: usize, mean: SVector<f64, D>, covariance: SMatrix<f64, D, D>) -> Self {
        if n == 0 {
            return Self::new();
        }
        let scatter = if n > 1 {
            covariance * (n - 1) as f64
        } else {
            SMatrix::zeros()
        };
        Self { n, mean, scatter }
    }

    /// Fold one sample into the estimate.
    pub fn add(&mut self, sample: &SVector<f64, D>) {
        self.n += 1;
        let n = self.n as f64;
        let delta = sample - self.mean;
        self.mean += delta / n;
        // (x - mean_old)(x - mean_new)^T written in its symmetric form
        self.scatter += (delta * delta.transpose()) * ((n - 1.0) / n);
    }

    /// Combine the samples of another distribution into this one.
    pub fn merge(&mut self, other: &Self) {
        if other.n == 0 {
            return;
        }
        if self.n == 0 {
            *self = *other;
            return;
        }
        let n_a = self.n as f64;
        let n_b = other.n as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;
        self.mean += delta * (n_b / n);
        self.scatter += other.scatter + (delta * delta.transpose()) * (n_a * n_b / n);
        self.n += other.n;
    }

    /// Number of samples folded in so far.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Whether no sample has been added yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether enough samples were added for the covariance to be meaningful.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.n >= MIN_SAMPLES
    }

    /// The running mean, zero for an empty distribution.
    #[inline]
    pub fn mean(&self) -> SVector<f64, D> {
        self.mean
    }

    /// The unnormalized sum of outer products of the centered samples.
    #[inline]
    pub fn scatter(&self) -> SMatrix<f64, D, D> {
        self.scatter
    }

    /// The sample covariance `scatter / (n - 1)`.
    ///
    /// The estimate is undefined below two samples; the zero matrix is returned
    /// in that case and callers are expected to check [`Distribution::n`] or
    /// [`Distribution::is_valid`] first.
    pub fn covariance(&self) -> SMatrix<f64, D, D> {
        if self.n < 2 {
            return SMatrix::zeros();
        }
        self.scatter / (self.n - 1) as f64
    }
}

impl<const D: usize> Default for Distribution<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> Extend<SVector<f64, D>> for Distribution<D> {
    fn extend<I: IntoIterator<Item = SVector<f64, D>>>(&mut self, iter: I) {
        for sample in iter {
            self.add(&sample);
        }
    }
}

impl<const D: usize> FromIterator<SVector<f64, D>> for Distribution<D> {
    fn from_iter<I: IntoIterator<Item = SVector<f64, D>>>(iter: I) -> Self {
        let mut dist = Self::new();
        dist.extend(iter);
        dist
    }
}
