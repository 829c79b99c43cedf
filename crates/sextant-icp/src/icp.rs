use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};
use sextant_3d::{Point, PointCloud};
use sextant_lie::{se2::SE2, se3::SE3};

use crate::ops::{compute_centroid, cross_covariance, find_correspondences, fit_rotation};
use crate::RigidTransform;

/// How the cross-covariance is carried between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossCovariance {
    /// Rebuild the cross-covariance from the current correspondences every iteration.
    #[default]
    PerIteration,
    /// Keep adding to one running sum over all iterations, and compose each
    /// increment on the right of the estimate (`T <- T * dt`).
    ///
    /// Older correspondences keep pulling the estimate, which slows down or
    /// stalls convergence. Reproduces the results of the legacy registration.
    Accumulate,
}

/// Why the registration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The last increment was below the translation or rotation epsilon.
    ConvergedByEpsilon,
    /// The maximum number of iterations was reached.
    ConvergedByIterationLimit,
    /// No correspondence could be established, or the alignment was degenerate.
    NoCorrespondences,
}

/// Parameters of the ICP algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcpParams<T> {
    /// Maximum number of iterations to perform.
    pub max_iterations: usize,
    /// Stop once the translation increment is shorter than this.
    pub translation_epsilon: f64,
    /// Stop once the rotation increment is smaller than this angle, in radians.
    pub rotation_epsilon: f64,
    /// Points further apart than this are never associated.
    pub max_correspondence_distance: f64,
    /// Initial estimate of the transformation from the source to the destination frame.
    pub initial_transform: T,
    /// How the cross-covariance evolves over the iterations.
    pub cross_covariance: CrossCovariance,
}

impl<T> IcpParams<T> {
    /// Set the initial transformation.
    pub fn with_initial_transform(mut self, initial_transform: T) -> Self {
        self.initial_transform = initial_transform;
        self
    }

    /// Set the maximum distance between associated points.
    pub fn with_max_correspondence_distance(mut self, distance: f64) -> Self {
        self.max_correspondence_distance = distance;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for IcpParams<SE2> {
    fn default() -> Self {
        default_params::<2, SE2>()
    }
}

impl Default for IcpParams<SE3> {
    fn default() -> Self {
        default_params::<3, SE3>()
    }
}

fn default_params<const D: usize, T: RigidTransform<D>>() -> IcpParams<T> {
    IcpParams {
        max_iterations: 100,
        translation_epsilon: 1e-4,
        rotation_epsilon: 1e-4,
        max_correspondence_distance: 0.5,
        initial_transform: T::identity(),
        cross_covariance: CrossCovariance::PerIteration,
    }
}

/// Result of the ICP algorithm.
///
/// The transformation is from the source to the destination frame.
#[derive(Debug, Clone, PartialEq)]
pub struct IcpResult<T, const D: usize> {
    /// The index of the iteration that converged, or the iteration limit.
    pub iterations: usize,
    /// Why the registration stopped.
    pub termination: Termination,
    /// The estimated transformation.
    pub transform: T,
    /// The cross-covariance of the matched points, see [`CrossCovariance`].
    pub covariance: SMatrix<f64, D, D>,
}

/// Result of a 2D registration.
pub type IcpResult2d = IcpResult<SE2, 2>;

/// Result of a 3D registration.
pub type IcpResult3d = IcpResult<SE3, 3>;

/// Iterative Closest Point registration using point to point distance.
///
/// Estimates the transformation `T` such that `T * p` for the points `p` of `src`
/// lands on `dst`. Each iteration associates every transformed source point with
/// its nearest destination point within `max_correspondence_distance`, fits the
/// rigid increment `dt` that aligns the two point sets and updates `T <- dt * T`
/// (see [`CrossCovariance::Accumulate`] for the legacy update).
/// Points with non-finite coordinates are ignored on both sides.
///
/// The centroids are taken over all valid points of each cloud, so the clouds
/// are expected to cover the same part of the scene.
///
/// # Arguments
///
/// * `src` - Source point cloud.
/// * `dst` - Destination point cloud.
/// * `params` - Iteration limits, thresholds and initial estimate.
///
/// # Returns
///
/// The estimated transformation together with the stopping reason. If either
/// cloud has no valid point the initial transformation is returned with
/// [`Termination::NoCorrespondences`].
///
/// Example:
///
/// ```
/// use glam::DVec2;
/// use sextant_3d::PointCloud;
/// use sextant_icp::{icp, IcpParams, Termination};
/// use sextant_lie::se2::SE2;
///
/// let src = PointCloud::new(vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(0.0, 2.0),
///     DVec2::new(1.5, 1.0),
/// ]);
/// let offset = SE2::from_xy_theta(0.1, -0.05, 0.02);
/// let dst = src.iter().map(|p| offset * *p).collect::<PointCloud<_>>();
///
/// let result = icp(&src, &dst, &IcpParams::<SE2>::default());
/// assert_eq!(result.termination, Termination::ConvergedByEpsilon);
/// assert!((result.transform.t - offset.t).length() < 1e-6);
/// ```
pub fn icp<const D: usize, T: RigidTransform<D>>(
    src: &PointCloud<T::Point>,
    dst: &PointCloud<T::Point>,
    params: &IcpParams<T>,
) -> IcpResult<T, D> {
    let mut result = IcpResult {
        iterations: 0,
        termination: Termination::NoCorrespondences,
        transform: params.initial_transform,
        covariance: SMatrix::zeros(),
    };

    let Some(dst_mean) = compute_centroid(dst.iter()) else {
        log::warn!("icp: destination cloud has no valid point");
        return result;
    };
    if !src.iter().any(|p| p.is_normal()) {
        log::warn!("icp: source cloud has no valid point");
        return result;
    }

    let max_distance2 = params.max_correspondence_distance * params.max_correspondence_distance;
    let translation_epsilon2 = params.translation_epsilon * params.translation_epsilon;
    let rotation_epsilon2 = params.rotation_epsilon * params.rotation_epsilon;

    let mut transformed = Vec::with_capacity(src.len());
    let mut s = SMatrix::<f64, D, D>::zeros();

    for i in 0..params.max_iterations {
        // transform the source with the current estimate
        transformed.clear();
        transformed.extend(src.iter().map(|p| result.transform.transform_point(p)));

        let Some(src_mean) = compute_centroid(transformed.iter()) else {
            log::warn!("icp: transformed source has no valid point at iteration {i}");
            result.iterations = i;
            return result;
        };

        let correspondences = find_correspondences(transformed.as_slice(), dst, max_distance2);
        let (s_i, matches) =
            cross_covariance(transformed.as_slice(), dst, &correspondences, &src_mean, &dst_mean);

        log::debug!("icp: iteration {i}, {matches} correspondences");

        if matches == 0 {
            log::warn!(
                "icp: no correspondence within {} at iteration {i}",
                params.max_correspondence_distance
            );
            result.iterations = i;
            return result;
        }

        s = match params.cross_covariance {
            CrossCovariance::PerIteration => s_i,
            CrossCovariance::Accumulate => s + s_i,
        };
        result.covariance = s;

        let Some(rotation) = fit_rotation(&s) else {
            log::warn!("icp: singular value decomposition failed at iteration {i}");
            result.iterations = i;
            return result;
        };

        let dt = T::from_rotation_translation(&rotation, &(dst_mean - rotation * src_mean));
        result.transform = match params.cross_covariance {
            // dt was fitted on points already moved by the current estimate
            CrossCovariance::PerIteration => dt * result.transform,
            CrossCovariance::Accumulate => result.transform * dt,
        };

        let translation2 = dt.translation_norm_squared();
        let angle = dt.rotation_angle();
        log::debug!("icp: increment |t|^2 = {translation2:e}, angle = {angle:e}");

        if translation2 < translation_epsilon2 || angle * angle < rotation_epsilon2 {
            result.iterations = i;
            result.termination = Termination::ConvergedByEpsilon;
            return result;
        }
    }

    result.iterations = params.max_iterations;
    result.termination = Termination::ConvergedByIterationLimit;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{DVec2, DVec3};

    fn make_grid_3d() -> PointCloud<DVec3> {
        let mut points = Vec::new();
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..3 {
                    points.push(DVec3::new(x as f64, y as f64, z as f64));
                }
            }
        }
        PointCloud::new(points)
    }

    fn make_grid_2d() -> PointCloud<DVec2> {
        let mut points = Vec::new();
        for x in 0..5 {
            for y in 0..4 {
                points.push(DVec2::new(x as f64, y as f64));
            }
        }
        PointCloud::new(points)
    }

    #[test]
    fn test_default_params() {
        let params = IcpParams::<SE3>::default();
        assert_eq!(params.max_iterations, 100);
        assert_eq!(params.translation_epsilon, 1e-4);
        assert_eq!(params.rotation_epsilon, 1e-4);
        assert_eq!(params.max_correspondence_distance, 0.5);
        assert_eq!(params.initial_transform, SE3::IDENTITY);
        assert_eq!(params.cross_covariance, CrossCovariance::PerIteration);
    }

    #[test]
    fn test_identical_clouds() {
        let cloud = make_grid_3d();
        let result = icp(&cloud, &cloud, &IcpParams::<SE3>::default());
        assert_eq!(result.iterations, 0);
        assert_eq!(result.termination, Termination::ConvergedByEpsilon);
        assert_relative_eq!(result.transform.t.length(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(result.transform.r.angle(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_recovers_transform_3d() {
        let src = make_grid_3d();
        let expected = SE3::from_xyz_rpy([0.05, -0.03, 0.02], [0.02, -0.01, 0.05]);
        let dst = src.iter().map(|p| expected * *p).collect::<PointCloud<_>>();

        let result = icp(&src, &dst, &IcpParams::<SE3>::default());

        assert_eq!(result.termination, Termination::ConvergedByEpsilon);
        assert!(result.iterations < 100);
        for p in src.iter() {
            let error = (result.transform * *p - expected * *p).length();
            assert!(error < 1e-6, "residual {error} at {p}");
        }
    }

    #[test]
    fn test_recovers_transform_2d() {
        let src = make_grid_2d();
        let expected = SE2::from_xy_theta(0.1, 0.05, 0.04);
        let dst = src.iter().map(|p| expected * *p).collect::<PointCloud<_>>();

        let result = icp(&src, &dst, &IcpParams::<SE2>::default());

        assert_eq!(result.termination, Termination::ConvergedByEpsilon);
        assert_relative_eq!(result.transform.t.x, 0.1, epsilon = 1e-6);
        assert_relative_eq!(result.transform.t.y, 0.05, epsilon = 1e-6);
        assert_relative_eq!(result.transform.yaw(), 0.04, epsilon = 1e-6);
    }

    #[test]
    fn test_ignores_invalid_points() {
        let mut points = make_grid_2d().into_points();
        let expected = SE2::from_xy_theta(-0.05, 0.1, -0.03);
        let dst = points.iter().map(|p| expected * *p).collect::<PointCloud<_>>();
        points.push(DVec2::new(f64::NAN, 0.0));
        points.push(DVec2::splat(f64::INFINITY));
        let src = PointCloud::new(points);

        let result = icp(&src, &dst, &IcpParams::<SE2>::default());

        assert_eq!(result.termination, Termination::ConvergedByEpsilon);
        assert_relative_eq!(result.transform.t.x, -0.05, epsilon = 1e-6);
        assert_relative_eq!(result.transform.t.y, 0.1, epsilon = 1e-6);
        assert!(result.covariance.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_clouds() {
        let cloud = make_grid_2d();
        let empty = PointCloud::<DVec2>::default();
        let initial = SE2::from_xy_theta(1.0, 2.0, 0.5);
        let params = IcpParams::<SE2>::default().with_initial_transform(initial);

        for (src, dst) in [(&cloud, &empty), (&empty, &cloud)] {
            let result = icp(src, dst, &params);
            assert_eq!(result.iterations, 0);
            assert_eq!(result.termination, Termination::NoCorrespondences);
            assert_eq!(result.transform, initial);
            assert_eq!(result.covariance, SMatrix::<f64, 2, 2>::zeros());
        }
    }

    #[test]
    fn test_no_correspondence_within_distance() {
        let src = make_grid_2d();
        let far = SE2::from_translation(DVec2::new(100.0, 0.0));
        let dst = src.iter().map(|p| far * *p).collect::<PointCloud<_>>();

        let result = icp(&src, &dst, &IcpParams::<SE2>::default());

        assert_eq!(result.iterations, 0);
        assert_eq!(result.termination, Termination::NoCorrespondences);
        assert_eq!(result.transform, SE2::IDENTITY);
    }

    #[test]
    fn test_iteration_limit() {
        let src = make_grid_3d();
        let expected = SE3::from_xyz_rpy([0.05, -0.03, 0.02], [0.02, -0.01, 0.05]);
        let dst = src.iter().map(|p| expected * *p).collect::<PointCloud<_>>();

        let params = IcpParams::<SE3>::default().with_max_iterations(1);
        let result = icp(&src, &dst, &params);

        assert_eq!(result.iterations, 1);
        assert_eq!(result.termination, Termination::ConvergedByIterationLimit);

        let params = IcpParams::<SE3>::default().with_max_iterations(0);
        let result = icp(&src, &dst, &params);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.termination, Termination::ConvergedByIterationLimit);
        assert_eq!(result.transform, SE3::IDENTITY);
    }

    #[test]
    fn test_accumulated_covariance() {
        let src = make_grid_2d();
        let expected = SE2::from_xy_theta(0.1, 0.05, 0.04);
        let dst = src.iter().map(|p| expected * *p).collect::<PointCloud<_>>();

        let run = |cross_covariance, max_iterations| {
            let params = IcpParams {
                cross_covariance,
                ..IcpParams::<SE2>::default().with_max_iterations(max_iterations)
            };
            icp(&src, &dst, &params)
        };

        // both modes agree on the first iteration
        let first = run(CrossCovariance::PerIteration, 1);
        assert_eq!(run(CrossCovariance::Accumulate, 1).covariance, first.covariance);

        // the second iteration sees the same correspondences in both modes
        let second = run(CrossCovariance::PerIteration, 2);
        let accumulated = run(CrossCovariance::Accumulate, 2);
        assert_relative_eq!(
            accumulated.covariance,
            first.covariance + second.covariance,
            epsilon = 1e-9
        );
    }

    // One running cross-covariance, increments composed on the right of the estimate.
    fn legacy_registration(
        src: &PointCloud<DVec2>,
        dst: &PointCloud<DVec2>,
        max_iterations: usize,
    ) -> Option<(SE2, usize)> {
        let dst_mean = compute_centroid(dst.iter())?;
        let mut transform = SE2::IDENTITY;
        let mut s = nalgebra::Matrix2::zeros();
        for i in 0..max_iterations {
            let moved = src.iter().map(|p| transform * *p).collect::<Vec<_>>();
            let src_mean = compute_centroid(moved.iter())?;
            let correspondences = find_correspondences(&moved, dst, 0.5 * 0.5);
            let (s_i, _) = cross_covariance(&moved, dst, &correspondences, &src_mean, &dst_mean);
            s += s_i;
            let rotation = fit_rotation(&s)?;
            let dt = <SE2 as RigidTransform<2>>::from_rotation_translation(
                &rotation,
                &(dst_mean - rotation * src_mean),
            );
            transform = transform * dt;
            let angle = dt.r.angle();
            if dt.t.length_squared() < 1e-4 * 1e-4 || angle * angle < 1e-4 * 1e-4 {
                return Some((transform, i));
            }
        }
        Some((transform, max_iterations))
    }

    #[test]
    fn test_accumulate_reproduces_legacy_update() {
        let src = make_grid_2d();
        let expected = SE2::from_xy_theta(0.1, 0.05, 0.04);
        let dst = src.iter().map(|p| expected * *p).collect::<PointCloud<_>>();

        let params = IcpParams {
            cross_covariance: CrossCovariance::Accumulate,
            ..IcpParams::<SE2>::default()
        };
        let result = icp(&src, &dst, &params);

        let legacy = legacy_registration(&src, &dst, params.max_iterations);
        assert!(legacy.is_some());
        if let Some((transform, iterations)) = legacy {
            assert_eq!(result.transform, transform);
            if iterations < params.max_iterations {
                assert_eq!(result.termination, Termination::ConvergedByEpsilon);
            }
            assert_eq!(result.iterations, iterations);
        }
    }

    #[test]
    fn test_params_serde() -> Result<(), Box<dyn std::error::Error>> {
        let params = IcpParams::<SE2>::default().with_max_correspondence_distance(1.5);
        let json = serde_json::to_string(&params)?;
        let back: IcpParams<SE2> = serde_json::from_str(&json)?;
        assert_eq!(back.max_correspondence_distance, 1.5);
        assert_eq!(back.max_iterations, params.max_iterations);
        assert_eq!(back.cross_covariance, params.cross_covariance);
        Ok(())
    }
}
