use cobertura_core::config::ConfigSource;
use cobertura_core::models::LocalityAggregate;
use cobertura_pipeline::{
    CoverageFilter, MapMarker, PopulationSummary, ShortfallRow, SpecialtyRow, UnlocatedMember,
    UnlocatedProvider,
};
use serde::Serialize;
use tabled::Tabled;

use crate::format::{format_count, format_decimal, format_km, format_optional, format_percent};

/// Output for shortfalls command
#[derive(Debug, Serialize)]
pub struct ShortfallsOutput {
    pub filter: CoverageFilter,
    pub limit: usize,
    pub shortfalls: Vec<ShortfallRow>,
}

/// Output for specialties command
#[derive(Debug, Serialize)]
pub struct SpecialtiesOutput {
    pub filter: CoverageFilter,
    pub specialties: Vec<SpecialtyRow>,
}

/// Output for places command
#[derive(Debug, Serialize)]
pub struct PlacesOutput {
    pub province: Option<String>,
    pub places: Vec<String>,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: ConfigSource,
}

/// Output for export command
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub table: String,
    pub format: String,
    pub rows: usize,
    pub path: String,
}

#[derive(Tabled)]
pub struct LocalityTableRow {
    #[tabled(rename = "Locality")]
    pub locality: String,
    #[tabled(rename = "Province")]
    pub province: String,
    #[tabled(rename = "Members")]
    pub members: String,
    #[tabled(rename = "Mean distance")]
    pub mean_distance: String,
    #[tabled(rename = "Providers")]
    pub providers: String,
    #[tabled(rename = "Pharmacies")]
    pub pharmacies: String,
    #[tabled(rename = "Providers/member")]
    pub providers_per_member: String,
    #[tabled(rename = "Members/provider")]
    pub members_per_provider: String,
    #[tabled(rename = "Members/pharmacy")]
    pub members_per_pharmacy: String,
}

impl From<&LocalityAggregate> for LocalityTableRow {
    fn from(row: &LocalityAggregate) -> Self {
        Self {
            locality: row.locality.clone(),
            province: row.province.clone(),
            members: format_count(row.member_count),
            mean_distance: format_km(row.mean_distance_km),
            providers: format_count(row.provider_count),
            pharmacies: format_count(row.pharmacy_count),
            providers_per_member: format_optional(row.providers_per_member),
            members_per_provider: format_optional(row.members_per_provider),
            members_per_pharmacy: format_optional(row.members_per_pharmacy),
        }
    }
}

#[derive(Tabled)]
pub struct PopulationTableRow {
    #[tabled(rename = "Population")]
    pub population: String,
    #[tabled(rename = "Base")]
    pub base: String,
    #[tabled(rename = "Located")]
    pub located: String,
    #[tabled(rename = "Unlocated")]
    pub unlocated: String,
    #[tabled(rename = "Success")]
    pub success_rate: String,
}

impl PopulationTableRow {
    pub fn new(population: &str, summary: &PopulationSummary) -> Self {
        Self {
            population: population.to_string(),
            base: format_count(summary.base),
            located: format_count(summary.located),
            unlocated: format_count(summary.unlocated),
            success_rate: format_percent(summary.success_rate),
        }
    }
}

#[derive(Tabled)]
pub struct ShortfallTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Locality")]
    pub locality: String,
    #[tabled(rename = "Province")]
    pub province: String,
    #[tabled(rename = "Members")]
    pub members: String,
    #[tabled(rename = "Mean distance")]
    pub mean_distance: String,
}

impl ShortfallTableRow {
    pub fn new(rank: usize, row: &ShortfallRow) -> Self {
        Self {
            rank,
            locality: row.locality.clone(),
            province: row.province.clone(),
            members: format_count(row.member_count),
            mean_distance: format_km(row.mean_distance_km),
        }
    }
}

#[derive(Tabled)]
pub struct SpecialtyTableRow {
    #[tabled(rename = "Specialty")]
    pub specialty: String,
    #[tabled(rename = "Providers")]
    pub providers: String,
    #[tabled(rename = "Mean distance")]
    pub mean_distance: String,
    #[tabled(rename = "Localities without provider")]
    pub uncovered: String,
}

impl From<&SpecialtyRow> for SpecialtyTableRow {
    fn from(row: &SpecialtyRow) -> Self {
        Self {
            specialty: row.specialty.clone(),
            providers: format_count(row.provider_count),
            mean_distance: format_km(row.mean_distance_km),
            uncovered: format_count(row.localities_without_provider),
        }
    }
}

#[derive(Tabled)]
pub struct MarkerTableRow {
    #[tabled(rename = "Locality")]
    pub locality: String,
    #[tabled(rename = "Province")]
    pub province: String,
    #[tabled(rename = "Latitude")]
    pub latitude: String,
    #[tabled(rename = "Longitude")]
    pub longitude: String,
    #[tabled(rename = "Radius")]
    pub radius: String,
    #[tabled(rename = "Color")]
    pub color: String,
}

impl From<&MapMarker> for MarkerTableRow {
    fn from(marker: &MapMarker) -> Self {
        Self {
            locality: marker.locality.clone(),
            province: marker.province.clone(),
            latitude: format!("{:.5}", marker.coordinate.latitude),
            longitude: format!("{:.5}", marker.coordinate.longitude),
            radius: format_decimal(marker.radius),
            color: marker.color.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct UnlocatedMemberRow {
    #[tabled(rename = "Member")]
    pub member_id: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Locality")]
    pub locality: String,
    #[tabled(rename = "Latitude")]
    pub latitude: String,
    #[tabled(rename = "Longitude")]
    pub longitude: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl From<&UnlocatedMember> for UnlocatedMemberRow {
    fn from(row: &UnlocatedMember) -> Self {
        Self {
            member_id: row.member_id.clone(),
            address: format!("{} {}", row.street, row.number).trim().to_string(),
            locality: row.locality.clone(),
            latitude: row.latitude.clone(),
            longitude: row.longitude.clone(),
            reason: row.reason.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct UnlocatedProviderRow {
    #[tabled(rename = "Provider")]
    pub provider_id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub facility_type: String,
    #[tabled(rename = "Locality")]
    pub locality: String,
    #[tabled(rename = "Latitude")]
    pub latitude: String,
    #[tabled(rename = "Longitude")]
    pub longitude: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl From<&UnlocatedProvider> for UnlocatedProviderRow {
    fn from(row: &UnlocatedProvider) -> Self {
        Self {
            provider_id: row.provider_id.clone(),
            name: row.name.clone(),
            facility_type: row.facility_type.clone(),
            locality: row.locality.clone(),
            latitude: row.latitude.clone(),
            longitude: row.longitude.clone(),
            reason: row.reason.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct NameRow {
    #[tabled(rename = "Name")]
    pub name: String,
}

#[derive(Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl From<&ConfigEntry> for ConfigRow {
    fn from(entry: &ConfigEntry) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            source: format!("{:?}", entry.source),
        }
    }
}

/// Flat locality row for CSV export; the representative coordinate is split in two columns
#[derive(Debug, Serialize)]
pub struct LocalityCsvRow<'a> {
    pub locality: &'a str,
    pub province: &'a str,
    pub member_count: usize,
    pub mean_distance_km: Option<f64>,
    pub provider_count: usize,
    pub pharmacy_count: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub providers_per_member: Option<f64>,
    pub members_per_provider: Option<f64>,
    pub members_per_pharmacy: Option<f64>,
}

impl<'a> From<&'a LocalityAggregate> for LocalityCsvRow<'a> {
    fn from(row: &'a LocalityAggregate) -> Self {
        Self {
            locality: &row.locality,
            province: &row.province,
            member_count: row.member_count,
            mean_distance_km: row.mean_distance_km,
            provider_count: row.provider_count,
            pharmacy_count: row.pharmacy_count,
            latitude: row.representative.latitude,
            longitude: row.representative.longitude,
            providers_per_member: row.providers_per_member,
            members_per_provider: row.members_per_provider,
            members_per_pharmacy: row.members_per_pharmacy,
        }
    }
}
