use cobertura_core::config::{MetricKind, DEFAULT_KM_PER_DEGREE};
use cobertura_core::models::Coordinate;
use geo::algorithm::centroid::Centroid;
use geo::{Distance, Haversine, MultiPoint, Point};

/// Converts a pair of coordinates into kilometres
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceMetric {
    /// Degree-space Euclidean distance scaled by a constant.
    ///
    /// Ignores the shrinking of longitude degrees with latitude; kept because
    /// published coverage figures were produced with it.
    ScaledEuclidean { km_per_degree: f64 },

    /// Great-circle distance on a spherical Earth
    Haversine,
}

impl DistanceMetric {
    pub fn from_config(kind: MetricKind, km_per_degree: f64) -> Self {
        match kind {
            MetricKind::Scaled => DistanceMetric::ScaledEuclidean { km_per_degree },
            MetricKind::Haversine => DistanceMetric::Haversine,
        }
    }

    /// Distance in kilometres, always non-negative
    pub fn distance_km(&self, a: Coordinate, b: Coordinate) -> f64 {
        match self {
            DistanceMetric::ScaledEuclidean { km_per_degree } => {
                planar_degrees(a, b) * km_per_degree
            }
            DistanceMetric::Haversine => Haversine.distance(to_point(a), to_point(b)) / 1000.0,
        }
    }
}

impl Default for DistanceMetric {
    fn default() -> Self {
        DistanceMetric::ScaledEuclidean {
            km_per_degree: DEFAULT_KM_PER_DEGREE,
        }
    }
}

/// Euclidean distance in degree space
pub fn planar_degrees(a: Coordinate, b: Coordinate) -> f64 {
    let dx = a.longitude - b.longitude;
    let dy = a.latitude - b.latitude;
    (dx * dx + dy * dy).sqrt()
}

/// Arithmetic mean position, `None` for an empty set
pub fn centroid(coordinates: &[Coordinate]) -> Option<Coordinate> {
    let points: MultiPoint = coordinates.iter().map(|c| to_point(*c)).collect();
    points.centroid().map(|p| Coordinate::new(p.y(), p.x()))
}

fn to_point(c: Coordinate) -> Point {
    Point::new(c.longitude, c.latitude)
}
