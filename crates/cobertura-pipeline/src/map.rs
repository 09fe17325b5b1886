//! Map view of a coverage report: markers, heat points and GeoJSON export.

use cobertura_core::models::{Coordinate, LocalityAggregate};
use cobertura_geo::centroid;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::Serialize;

use crate::models::CoverageReport;

/// Centre of the country, used when there is nothing to show
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: -38.4161,
    longitude: -63.6167,
};

pub const COUNTRY_ZOOM: u8 = 4;
pub const PROVINCE_ZOOM: u8 = 7;

/// Marker colour of a locality with at least one clinic
pub const COVERED_COLOR: &str = "#1f77b4";

/// Marker colour of a locality without clinics
pub const UNCOVERED_COLOR: &str = "#d62728";

const MIN_RADIUS: f64 = 5.0;
const MAX_RADIUS: f64 = 25.0;
const MEMBERS_PER_RADIUS_STEP: f64 = 100.0;

/// One circle per locality
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub locality: String,
    pub province: String,
    pub coordinate: Coordinate,
    pub radius: f64,
    pub color: &'static str,
    pub member_count: usize,
    pub provider_count: usize,
    pub pharmacy_count: usize,
    pub mean_distance_km: Option<f64>,
}

impl MapMarker {
    pub fn from_aggregate(row: &LocalityAggregate) -> Self {
        Self {
            locality: row.locality.clone(),
            province: row.province.clone(),
            coordinate: row.representative,
            radius: marker_radius(row.member_count),
            color: if row.provider_count == 0 {
                UNCOVERED_COLOR
            } else {
                COVERED_COLOR
            },
            member_count: row.member_count,
            provider_count: row.provider_count,
            pharmacy_count: row.pharmacy_count,
            mean_distance_km: row.mean_distance_km,
        }
    }
}

/// Member density sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

/// Everything a map renderer needs for one report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    pub heat: Vec<HeatPoint>,
}

impl MapLayer {
    pub fn from_aggregates(rows: &[LocalityAggregate], single_province: bool) -> Self {
        let representatives: Vec<Coordinate> = rows.iter().map(|row| row.representative).collect();
        let center = centroid(&representatives).unwrap_or(DEFAULT_CENTER);

        let heat = rows
            .iter()
            .filter(|row| row.member_count > 0)
            .map(|row| HeatPoint {
                latitude: row.representative.latitude,
                longitude: row.representative.longitude,
                weight: row.member_count as f64,
            })
            .collect();

        Self {
            center,
            zoom: if single_province {
                PROVINCE_ZOOM
            } else {
                COUNTRY_ZOOM
            },
            markers: rows.iter().map(MapMarker::from_aggregate).collect(),
            heat,
        }
    }

    pub fn from_report(report: &CoverageReport) -> Self {
        Self::from_aggregates(&report.localities, report.filter.is_single_province())
    }
}

/// `min(25, 5 + members / 100)`
pub fn marker_radius(member_count: usize) -> f64 {
    (MIN_RADIUS + member_count as f64 / MEMBERS_PER_RADIUS_STEP).min(MAX_RADIUS)
}

/// Locality table as a point FeatureCollection, aggregate columns as properties
pub fn localities_geojson(rows: &[LocalityAggregate]) -> FeatureCollection {
    let features = rows
        .iter()
        .map(|row| {
            let position = vec![row.representative.longitude, row.representative.latitude];
            Feature {
                geometry: Some(Geometry::new(Value::Point(position))),
                properties: Some(properties(row)),
                id: None,
                bbox: None,
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

fn properties(row: &LocalityAggregate) -> JsonObject {
    let mut properties = JsonObject::new();
    let mut put = |key: &str, value: JsonValue| {
        properties.insert(key.to_string(), value);
    };
    put("locality", row.locality.clone().into());
    put("province", row.province.clone().into());
    put("member_count", row.member_count.into());
    put("mean_distance_km", row.mean_distance_km.into());
    put("provider_count", row.provider_count.into());
    put("pharmacy_count", row.pharmacy_count.into());
    put("providers_per_member", row.providers_per_member.into());
    put("members_per_provider", row.members_per_provider.into());
    put("members_per_pharmacy", row.members_per_pharmacy.into());
    put("marker_radius", marker_radius(row.member_count).into());
    properties
}
