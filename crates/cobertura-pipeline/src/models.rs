use chrono::{DateTime, Utc};
use cobertura_core::models::{
    fold_name, GeoStatus, LocalityAggregate, LocalityKey, MemberRecord, ProviderRecord,
    RawCoordinate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Province, locality and specialty selection.
///
/// Every component is optional; names are compared after folding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageFilter {
    pub province: Option<String>,
    pub locality: Option<String>,
    pub specialty: Option<String>,
}

impl CoverageFilter {
    /// No restriction: every province, every locality, every specialty
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn province_key(&self) -> Option<String> {
        normalized(self.province.as_deref())
    }

    pub fn locality_key(&self) -> Option<String> {
        normalized(self.locality.as_deref())
    }

    /// Folded specialty, the cache key for member distances
    pub fn specialty_key(&self) -> Option<String> {
        normalized(self.specialty.as_deref())
    }

    /// Single province selected, used for map zoom
    pub fn is_single_province(&self) -> bool {
        self.province_key().is_some()
    }

    /// Whether a locality lies inside the province/locality scope
    pub fn contains(&self, key: &LocalityKey) -> bool {
        self.province_key().map_or(true, |p| p == key.province)
            && self.locality_key().map_or(true, |l| l == key.locality)
    }

    /// Same scope without the specialty restriction
    pub fn without_specialty(&self) -> Self {
        Self {
            specialty: None,
            ..self.clone()
        }
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value.map(fold_name).filter(|v| !v.is_empty())
}

/// Located and unlocated counts of one population in scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub base: usize,
    pub located: usize,
    pub unlocated: usize,

    /// `located / base`, `None` for an empty base
    pub success_rate: Option<f64>,

    pub reasons: BTreeMap<GeoStatus, usize>,
}

/// Headline counters of one report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub members: PopulationSummary,
    pub clinics: PopulationSummary,
    pub pharmacies: PopulationSummary,

    /// Member rows dropped as repeated addresses
    pub duplicates_removed: usize,

    /// Member and provider rows outside the configured country
    pub foreign_excluded: usize,

    /// Records whose coordinates were rewritten by a repair
    pub repaired_records: usize,

    /// Clinics in the index the distances were computed against
    pub index_size: usize,

    pub mean_distance_km: Option<f64>,
    pub localities: usize,
    pub localities_without_providers: usize,
}

/// Locality coverage table for one filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub generated_at: DateTime<Utc>,
    pub filter: CoverageFilter,
    pub summary: CoverageSummary,
    pub localities: Vec<LocalityAggregate>,
}

impl CoverageReport {
    /// Localities with members and no clinic
    pub fn uncovered(&self) -> impl Iterator<Item = &LocalityAggregate> {
        self.localities.iter().filter(|row| row.is_uncovered())
    }

    /// Uncovered localities ranked by member count, largest first
    pub fn shortfalls(&self, limit: usize) -> Vec<ShortfallRow> {
        let mut rows: Vec<ShortfallRow> = self.uncovered().map(ShortfallRow::from).collect();
        // Stable: ties keep the key order of the locality table
        rows.sort_by(|a, b| b.member_count.cmp(&a.member_count));
        rows.truncate(limit);
        rows
    }
}

/// Coverage figures for a single specialty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyRow {
    pub specialty: String,

    /// Located clinics offering the specialty, in scope
    pub provider_count: usize,

    /// Mean member distance to the nearest clinic of the specialty
    pub mean_distance_km: Option<f64>,

    /// Localities with members and no clinic of the specialty
    pub localities_without_provider: usize,
}

/// A locality with members and no clinic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortfallRow {
    pub locality: String,
    pub province: String,
    pub member_count: usize,
    pub mean_distance_km: Option<f64>,
}

impl From<&LocalityAggregate> for ShortfallRow {
    fn from(row: &LocalityAggregate) -> Self {
        Self {
            locality: row.locality.clone(),
            province: row.province.clone(),
            member_count: row.member_count,
            mean_distance_km: row.mean_distance_km,
        }
    }
}

/// Member row that could not be placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlocatedMember {
    pub member_id: String,
    pub street: String,
    pub number: String,
    pub locality: String,
    pub province: String,
    pub latitude: String,
    pub longitude: String,
    pub reason: GeoStatus,
}

impl UnlocatedMember {
    pub fn new(record: &MemberRecord, reason: GeoStatus) -> Self {
        Self {
            member_id: record.member_id.clone(),
            street: record.street.clone(),
            number: record.number.clone(),
            locality: record.locality.clone(),
            province: record.province.clone(),
            latitude: raw_text(record.latitude.as_ref()),
            longitude: raw_text(record.longitude.as_ref()),
            reason,
        }
    }
}

/// Provider row that could not be placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlocatedProvider {
    pub provider_id: String,
    pub name: String,
    pub facility_type: String,
    pub locality: String,
    pub province: String,
    pub latitude: String,
    pub longitude: String,
    pub reason: GeoStatus,
}

impl UnlocatedProvider {
    pub fn new(record: &ProviderRecord, reason: GeoStatus) -> Self {
        Self {
            provider_id: record.provider_id.clone(),
            name: record.name.clone(),
            facility_type: record.facility_type.to_string(),
            locality: record.locality.clone(),
            province: record.province.clone(),
            latitude: raw_text(record.latitude.as_ref()),
            longitude: raw_text(record.longitude.as_ref()),
            reason,
        }
    }
}

fn raw_text(value: Option<&RawCoordinate>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// Developer audit panel: unlocated rows in scope with the headline counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub filter: CoverageFilter,
    pub summary: CoverageSummary,
    pub unlocated_members: Vec<UnlocatedMember>,
    pub unlocated_providers: Vec<UnlocatedProvider>,
}
