use crate::{nearest, Point, PointCloud};
use nalgebra::SMatrix;
use sextant_stats::{Distribution, EigenValueLimit};

fn valid_points<const D: usize, P: Point<D>>(cloud: &PointCloud<P>) -> impl Iterator<Item = &P> {
    cloud.iter().filter(|p| p.is_normal())
}

/// Distance from `point` to the closest valid member of `cloud`.
///
/// Returns `f64::INFINITY` if the cloud has no valid member.
pub fn hausdorff_point<const D: usize, P: Point<D>>(point: &P, cloud: &PointCloud<P>) -> f64 {
    nearest::nearest_neighbour(point, cloud).map_or(f64::INFINITY, |nn| nn.distance)
}

/// Largest distance from a valid point of `src` to its closest point in `dst`.
///
/// Returns `f64::INFINITY` if `src` has no valid point, or if `dst` has none.
///
/// Example:
///
/// ```
/// use glam::DVec2;
/// use sextant_3d::{hausdorff, PointCloud};
///
/// let src = PointCloud::new(vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)]);
/// let dst = PointCloud::new(vec![DVec2::new(0.0, 0.5)]);
/// let h = hausdorff(&src, &dst);
/// assert!((h - 1.25f64.sqrt()).abs() < 1e-12);
/// ```
pub fn hausdorff<const D: usize, P: Point<D>>(src: &PointCloud<P>, dst: &PointCloud<P>) -> f64 {
    valid_points(src)
        .map(|p| hausdorff_point(p, dst))
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |h| h.max(d))))
        .unwrap_or(f64::INFINITY)
}

/// Share of the valid points of `src` closer than `max_distance` to `dst`.
///
/// Returns `0.0` if `src` has no valid point.
pub fn hausdorff_fraction<const D: usize, P: Point<D>>(
    src: &PointCloud<P>,
    dst: &PointCloud<P>,
    max_distance: f64,
) -> f64 {
    let (accepted, valid) = valid_points(src).fold((0usize, 0usize), |(accepted, valid), p| {
        if hausdorff_point(p, dst) < max_distance {
            (accepted + 1, valid + 1)
        } else {
            (accepted, valid + 1)
        }
    });
    if valid == 0 {
        return 0.0;
    }
    accepted as f64 / valid as f64
}

/// Mean distance from the valid points of `src` to `dst`.
///
/// Returns `f64::INFINITY` if `src` has no valid point.
pub fn hausdorff_avg<const D: usize, P: Point<D>>(src: &PointCloud<P>, dst: &PointCloud<P>) -> f64 {
    let (sum, valid) = valid_points(src).fold((0.0, 0usize), |(sum, valid), p| {
        (sum + hausdorff_point(p, dst), valid + 1)
    });
    if valid == 0 {
        return f64::INFINITY;
    }
    sum / valid as f64
}

/// Mean of `exp(-d)` over the distances `d` from the valid points of `src` to `dst`.
///
/// A soft match score in `[0, 1]`, averaged rather than multiplied so that it
/// does not vanish on large clouds. Returns `0.0` if `src` has no valid point.
pub fn hausdorff_mpe<const D: usize, P: Point<D>>(src: &PointCloud<P>, dst: &PointCloud<P>) -> f64 {
    let (sum, valid) = valid_points(src).fold((0.0, 0usize), |(sum, valid), p| {
        (sum + (-hausdorff_point(p, dst)).exp(), valid + 1)
    });
    if valid == 0 {
        return 0.0;
    }
    sum / valid as f64
}

/// Sample covariance of the residuals `p - nn(p)` between `src` and `dst`.
///
/// Points of `src` without a neighbour in `dst` are skipped. Returns a matrix
/// filled with `f64::INFINITY` if `src` is empty or fewer than
/// [`sextant_stats::MIN_SAMPLES`] residuals were collected.
pub fn hausdorff_covariance<const D: usize, P: Point<D>>(
    src: &PointCloud<P>,
    dst: &PointCloud<P>,
) -> SMatrix<f64, D, D> {
    let undefined = SMatrix::<f64, D, D>::repeat(f64::INFINITY);
    if src.is_empty() {
        return undefined;
    }

    let mut distribution = Distribution::<D>::new();
    for p in valid_points(src) {
        let Some(index) = nearest::nearest_neighbour_index(p, dst) else {
            continue;
        };
        let Some(q) = dst.get(index) else {
            continue;
        };
        distribution.add(&(p.to_vector() - q.to_vector()));
    }

    if !distribution.is_valid() {
        return undefined;
    }
    distribution.covariance()
}

/// [`hausdorff_covariance`] with the eigenvalues kept above `limit`.
///
/// The undefined (all infinite) result is returned unchanged.
pub fn hausdorff_covariance_limited<const D: usize, P: Point<D>>(
    src: &PointCloud<P>,
    dst: &PointCloud<P>,
    limit: &EigenValueLimit,
) -> SMatrix<f64, D, D> {
    let covariance = hausdorff_covariance(src, dst);
    if covariance.iter().any(|v| !v.is_finite()) {
        return covariance;
    }
    limit.apply(&covariance)
}
