use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use super::record::LocalityKey;

/// One row per (locality, province): the coverage table handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityAggregate {
    pub locality: String,
    pub province: String,

    /// Distinct located members
    pub member_count: usize,

    /// Mean nearest-provider distance; `None` without members or without an index
    pub mean_distance_km: Option<f64>,

    /// Located clinics in scope
    pub provider_count: usize,

    /// Located pharmacies
    pub pharmacy_count: usize,

    /// Member centroid, else clinic centroid, else pharmacy centroid
    pub representative: Coordinate,

    pub providers_per_member: Option<f64>,
    pub members_per_provider: Option<f64>,
    pub members_per_pharmacy: Option<f64>,
}

impl LocalityAggregate {
    pub fn key(&self) -> LocalityKey {
        LocalityKey {
            locality: self.locality.clone(),
            province: self.province.clone(),
        }
    }

    /// Members present but no clinic in the locality
    pub fn is_uncovered(&self) -> bool {
        self.member_count > 0 && self.provider_count == 0
    }
}

/// `numerator / denominator`, or `None` when the denominator is zero
pub fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}
