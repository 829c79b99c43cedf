use nalgebra::{DMatrix, SMatrix, SVector};
use sextant_3d::{nearest_neighbour_within, Point, PointCloud};

/// Mean of the valid points, `None` if there are none.
pub(crate) fn compute_centroid<'a, const D: usize, P: Point<D> + 'a>(
    points: impl IntoIterator<Item = &'a P>,
) -> Option<SVector<f64, D>> {
    let (sum, count) = points
        .into_iter()
        .filter(|p| p.is_normal())
        .fold((SVector::<f64, D>::zeros(), 0usize), |(sum, count), p| {
            (sum + p.to_vector(), count + 1)
        });
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// For every point of `source`, the index of its nearest valid point of `target`
/// within the squared distance `max_distance2`.
pub(crate) fn find_correspondences<const D: usize, P: Point<D>>(
    source: &[P],
    target: &PointCloud<P>,
    max_distance2: f64,
) -> Vec<Option<usize>> {
    source
        .iter()
        .map(|p| {
            if !p.is_normal() {
                return None;
            }
            nearest_neighbour_within(p, target, max_distance2).map(|nn| nn.index)
        })
        .collect()
}

/// Sum of `(p - src_mean)(q - dst_mean)^T` over the matched pairs, and the number of pairs.
pub(crate) fn cross_covariance<const D: usize, P: Point<D>>(
    source: &[P],
    target: &PointCloud<P>,
    correspondences: &[Option<usize>],
    src_mean: &SVector<f64, D>,
    dst_mean: &SVector<f64, D>,
) -> (SMatrix<f64, D, D>, usize) {
    let mut s = SMatrix::<f64, D, D>::zeros();
    let mut matches = 0;
    for (p, index) in source.iter().zip(correspondences.iter()) {
        let Some(q) = index.and_then(|index| target.get(index)) else {
            continue;
        };
        s += (p.to_vector() - src_mean) * (q.to_vector() - dst_mean).transpose();
        matches += 1;
    }
    (s, matches)
}

/// Rotation best aligning the source to the target for the cross-covariance `s`.
///
/// With `s = U * Sigma * V^T` the rotation is `(U * V^T)^T`. If that matrix is a
/// reflection, the column of `V` with the smallest singular value is flipped.
/// Returns `None` if the decomposition fails.
pub(crate) fn fit_rotation<const D: usize>(s: &SMatrix<f64, D, D>) -> Option<SMatrix<f64, D, D>> {
    let svd = DMatrix::from_column_slice(D, D, s.as_slice()).svd(true, true);
    let u = svd.u?;
    let mut v = svd.v_t?.transpose();

    let mut rotation = (&u * v.transpose()).transpose();
    if rotation.determinant() < 0.0 {
        let smallest = svd
            .singular_values
            .iter()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, &sigma)| {
                if sigma < best.1 {
                    (i, sigma)
                } else {
                    best
                }
            })
            .0;
        v.column_mut(smallest).scale_mut(-1.0);
        rotation = (&u * v.transpose()).transpose();
    }

    if rotation.iter().any(|x| !x.is_finite()) {
        return None;
    }
    Some(SMatrix::from_column_slice(rotation.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{DVec2, DVec3};
    use nalgebra::{Matrix3, Rotation2, Rotation3, Vector2, Vector3};

    #[test]
    fn test_compute_centroid() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(f64::NAN, 1.0),
            DVec2::new(2.0, 4.0),
        ];
        assert_eq!(compute_centroid(points.iter()), Some(Vector2::new(1.0, 2.0)));
        let empty: [DVec2; 0] = [];
        assert_eq!(compute_centroid(empty.iter()), None);
        assert_eq!(compute_centroid(&[DVec3::splat(f64::INFINITY)]), None);
    }

    #[test]
    fn test_find_correspondences() {
        let target = PointCloud::new(vec![DVec2::new(0.0, 0.0), DVec2::new(5.0, 0.0)]);
        let source = [
            DVec2::new(0.1, 0.0),
            DVec2::new(4.8, 0.0),
            DVec2::new(2.5, 0.0),
            DVec2::new(f64::NAN, 0.0),
        ];
        let correspondences = find_correspondences(&source, &target, 0.25);
        assert_eq!(correspondences, vec![Some(0), Some(1), None, None]);
    }

    #[test]
    fn test_cross_covariance() {
        let target = PointCloud::new(vec![DVec2::new(1.0, 0.0), DVec2::new(-1.0, 0.0)]);
        let source = [DVec2::new(0.0, 1.0), DVec2::new(0.0, -1.0), DVec2::new(9.0, 9.0)];
        let correspondences = [Some(0), Some(1), None];
        let (s, matches) = cross_covariance(
            &source,
            &target,
            &correspondences,
            &Vector2::zeros(),
            &Vector2::zeros(),
        );
        assert_eq!(matches, 2);
        // (0, 1)(1, 0)^T + (0, -1)(-1, 0)^T
        assert_eq!(s, nalgebra::Matrix2::new(0.0, 0.0, 2.0, 0.0));
    }

    #[test]
    fn test_fit_rotation_2d() {
        let rotation = Rotation2::new(0.4);
        let points = [
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 2.0),
            Vector2::new(-1.0, -0.5),
        ];
        let s = points
            .iter()
            .map(|p| p * (rotation * *p).transpose())
            .fold(nalgebra::Matrix2::zeros(), |acc, m| acc + m);
        let fitted = fit_rotation(&s);
        assert!(fitted.is_some());
        if let Some(fitted) = fitted {
            assert_relative_eq!(fitted, *rotation.matrix(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fit_rotation_3d() {
        let rotation = Rotation3::from_euler_angles(0.2, -0.1, 0.5);
        let points = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 3.0),
            Vector3::new(-1.0, -2.0, -3.0),
        ];
        let s = points
            .iter()
            .map(|p| p * (rotation * *p).transpose())
            .fold(Matrix3::zeros(), |acc, m| acc + m);
        let fitted = fit_rotation(&s);
        assert!(fitted.is_some());
        if let Some(fitted) = fitted {
            assert_relative_eq!(fitted, *rotation.matrix(), epsilon = 1e-9);
            assert_relative_eq!(fitted.determinant(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fit_rotation_is_proper() {
        // a mirror along z would be the best orthogonal fit
        let s = Matrix3::from_diagonal(&Vector3::new(3.0, 2.0, -1.0));
        let fitted = fit_rotation(&s);
        assert!(fitted.is_some());
        if let Some(fitted) = fitted {
            assert_relative_eq!(fitted.determinant(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(fitted, Matrix3::identity(), epsilon = 1e-9);
        }
    }
}
