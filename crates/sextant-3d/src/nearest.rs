use crate::{Point, PointCloud};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The closest cloud member to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Index of the member in the cloud.
    pub index: usize,
    /// Euclidean distance between the query and the member.
    pub distance: f64,
}

// Linear scan over the valid members with squared distance below `bound`.
// Strict comparison keeps the first member among equally distant ones.
fn scan<const D: usize, P: Point<D>>(
    point: &P,
    cloud: &PointCloud<P>,
    bound: f64,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    let mut best_distance2 = bound;
    for (index, candidate) in cloud.iter().enumerate() {
        if !candidate.is_normal() {
            continue;
        }
        let distance2 = point.squared_distance(candidate);
        if distance2 < best_distance2 {
            best_distance2 = distance2;
            best = Some((index, distance2));
        }
    }
    best
}

/// Find the member of `cloud` closest to `point`.
///
/// Invalid members are skipped. Returns `None` for an empty cloud or a cloud
/// without any valid member. When several members are equally close, the one
/// with the lowest index is returned.
///
/// Example:
///
/// ```
/// use glam::DVec2;
/// use sextant_3d::{nearest_neighbour, PointCloud};
///
/// let cloud = PointCloud::new(vec![DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0)]);
/// let nn = nearest_neighbour(&DVec2::new(3.0, 3.0), &cloud).unwrap();
/// assert_eq!(nn.index, 1);
/// assert_eq!(nn.distance, 1.0);
/// ```
pub fn nearest_neighbour<const D: usize, P: Point<D>>(
    point: &P,
    cloud: &PointCloud<P>,
) -> Option<Neighbour> {
    scan(point, cloud, f64::INFINITY).map(|(index, distance2)| Neighbour {
        index,
        distance: distance2.sqrt(),
    })
}

/// Index of the member of `cloud` closest to `point`, see [`nearest_neighbour`].
pub fn nearest_neighbour_index<const D: usize, P: Point<D>>(
    point: &P,
    cloud: &PointCloud<P>,
) -> Option<usize> {
    scan(point, cloud, f64::INFINITY).map(|(index, _)| index)
}

/// Like [`nearest_neighbour`], restricted to members whose squared distance to
/// `point` is strictly below `max_distance2`.
pub fn nearest_neighbour_within<const D: usize, P: Point<D>>(
    point: &P,
    cloud: &PointCloud<P>,
    max_distance2: f64,
) -> Option<Neighbour> {
    scan(point, cloud, max_distance2).map(|(index, distance2)| Neighbour {
        index,
        distance: distance2.sqrt(),
    })
}

/// Nearest neighbour of every query point, in query order.
///
/// Invalid queries yield `None`. With the `rayon` feature the queries are
/// processed in parallel; the results are the same.
pub fn nearest_neighbours<const D: usize, P: Point<D>>(
    queries: &[P],
    cloud: &PointCloud<P>,
) -> Vec<Option<Neighbour>> {
    let query = |point: &P| {
        if point.is_normal() {
            nearest_neighbour(point, cloud)
        } else {
            None
        }
    };

    #[cfg(feature = "rayon")]
    {
        queries.par_iter().map(query).collect()
    }

    #[cfg(not(feature = "rayon"))]
    {
        queries.iter().map(query).collect()
    }
}
