#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for nearest-accident lookups.
//!
//! Bulk-loads every known accident coordinate into an R-tree once at
//! startup and answers exact k-nearest-neighbor queries against it. The
//! index is never mutated after construction, so a single instance can be
//! shared across concurrent requests without locking.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// Number of neighbors consulted per risk lookup.
pub const DEFAULT_NEIGHBORS: usize = 10;

/// Errors that can occur while building a [`SpatialIndex`].
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// The coordinate set cannot be indexed.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of what went wrong.
        message: String,
    },
}

/// A coordinate stored in the R-tree along with its position in the
/// original input sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint {
    /// `[lat, lng]`
    coords: [f64; 2],
    index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords)
    }
}

impl PointDistance for IndexedPoint {
    #[allow(clippy::suboptimal_flops)]
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.coords[0] - point[0];
        let dlng = self.coords[1] - point[1];
        dlat * dlat + dlng * dlng
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.coords == *point
    }
}

/// Pre-built nearest-neighbor index over `(lat, lng)` coordinates.
///
/// Distances are Euclidean in degree space. Returned indices refer to
/// positions in the coordinate slice passed to [`SpatialIndex::build`], so
/// they are only meaningful against that exact ordering.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Builds the index from `(lat, lng)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Configuration`] if `coordinates` is empty or
    /// contains a non-finite value.
    pub fn build(coordinates: &[(f64, f64)]) -> Result<Self, SpatialError> {
        if coordinates.is_empty() {
            return Err(SpatialError::Configuration {
                message: "cannot build a spatial index from zero coordinates".to_string(),
            });
        }

        let mut points = Vec::with_capacity(coordinates.len());
        for (index, &(lat, lng)) in coordinates.iter().enumerate() {
            if !lat.is_finite() || !lng.is_finite() {
                return Err(SpatialError::Configuration {
                    message: format!("coordinate {index} is not finite: ({lat}, {lng})"),
                });
            }
            points.push(IndexedPoint {
                coords: [lat, lng],
                index,
            });
        }

        let tree = RTree::bulk_load(points);
        log::info!("Indexed {} accident locations", tree.size());

        Ok(Self { tree })
    }

    /// Number of indexed coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Always `false` for a successfully built index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Returns the indices of the `k` coordinates nearest to `(lat, lng)`,
    /// nearest first.
    ///
    /// Returns exactly `min(k, self.len())` indices. Points at equal
    /// distance are ordered by ascending index, so identical queries always
    /// produce identical output. A non-finite query point yields no
    /// neighbors.
    #[must_use]
    pub fn query(&self, lat: f64, lng: f64, k: usize) -> Vec<usize> {
        if k == 0 || !lat.is_finite() || !lng.is_finite() {
            return Vec::new();
        }

        // The iterator yields non-decreasing distances. Keep pulling past
        // the k-th point while distances tie with it so the tie-break below
        // sees every candidate.
        let mut candidates: Vec<(f64, usize)> = Vec::with_capacity(k);
        for (point, distance_2) in self.tree.nearest_neighbor_iter_with_distance_2(&[lat, lng]) {
            if candidates.len() >= k && distance_2 > candidates[k - 1].0 {
                break;
            }
            candidates.push((distance_2, point.index));
        }

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        candidates.truncate(k);
        candidates.into_iter().map(|(_, index)| index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<(f64, f64)> {
        let mut coords = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                coords.push((34.0 + f64::from(i) * 0.1, -118.0 + f64::from(j) * 0.1));
            }
        }
        coords
    }

    fn distance_2(a: (f64, f64), b: (f64, f64)) -> f64 {
        let dlat = a.0 - b.0;
        let dlng = a.1 - b.1;
        dlat * dlat + dlng * dlng
    }

    #[test]
    fn empty_build_is_configuration_error() {
        assert!(matches!(
            SpatialIndex::build(&[]),
            Err(SpatialError::Configuration { .. })
        ));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        assert!(SpatialIndex::build(&[(34.0, -118.0), (f64::NAN, -118.0)]).is_err());
    }

    #[test]
    fn returns_min_of_k_and_len() {
        let coords = grid();
        let index = SpatialIndex::build(&coords).unwrap();
        assert_eq!(index.len(), 25);
        assert_eq!(index.query(34.2, -117.8, DEFAULT_NEIGHBORS).len(), 10);
        assert_eq!(index.query(34.2, -117.8, 100).len(), 25);
        assert!(index.query(34.2, -117.8, 0).is_empty());

        let small = SpatialIndex::build(&coords[..3]).unwrap();
        assert_eq!(small.query(34.0, -118.0, DEFAULT_NEIGHBORS).len(), 3);
    }

    #[test]
    fn results_are_nearest_first() {
        let coords = grid();
        let index = SpatialIndex::build(&coords).unwrap();
        let target = (34.13, -117.92);
        let result = index.query(target.0, target.1, DEFAULT_NEIGHBORS);

        let distances: Vec<f64> = result
            .iter()
            .map(|&i| distance_2(coords[i], target))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));

        // Exact: nothing left out is closer than the farthest returned.
        let farthest = distances[distances.len() - 1];
        for (i, &c) in coords.iter().enumerate() {
            if !result.contains(&i) {
                assert!(distance_2(c, target) >= farthest);
            }
        }
    }

    #[test]
    fn ties_break_by_index() {
        // Four points equidistant from the origin.
        let coords = vec![(0.0, 1.0), (1.0, 0.0), (0.0, -1.0), (-1.0, 0.0), (5.0, 5.0)];
        let index = SpatialIndex::build(&coords).unwrap();
        assert_eq!(index.query(0.0, 0.0, 2), vec![0, 1]);
        assert_eq!(index.query(0.0, 0.0, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn duplicate_coordinates_are_all_returned() {
        let coords = vec![(34.0, -118.0); 12];
        let index = SpatialIndex::build(&coords).unwrap();
        assert_eq!(
            index.query(34.0, -118.0, DEFAULT_NEIGHBORS),
            (0..10).collect::<Vec<_>>()
        );
    }

    #[test]
    fn repeated_queries_are_identical() {
        let index = SpatialIndex::build(&grid()).unwrap();
        let first = index.query(34.05, -117.95, DEFAULT_NEIGHBORS);
        let second = index.query(34.05, -117.95, DEFAULT_NEIGHBORS);
        assert_eq!(first, second);
    }

    #[test]
    fn non_finite_query_yields_nothing() {
        let index = SpatialIndex::build(&grid()).unwrap();
        assert!(index.query(f64::NAN, 0.0, DEFAULT_NEIGHBORS).is_empty());
    }
}
