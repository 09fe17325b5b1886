//! Cobertura Pipeline - Coverage computation
//!
//! This crate implements the coverage use cases: cleaning, classification,
//! nearest-provider distances, aggregation by locality and the derived
//! summary, specialty, shortfall and map views.

pub mod aggregate;
pub mod clean;
pub mod distance;
pub mod map;
pub mod models;
pub mod pipeline;

pub use aggregate::{group_members, group_providers, reconcile, MemberGroup, ProviderGroup};
pub use clean::{clean_members, clean_providers, CleanedMembers, CleanedProviders};
pub use distance::{DistanceCache, MemberDistances};
pub use map::{localities_geojson, HeatPoint, MapLayer, MapMarker};
pub use models::{
    AuditReport, CoverageFilter, CoverageReport, CoverageSummary, PopulationSummary,
    ShortfallRow, SpecialtyRow, UnlocatedMember, UnlocatedProvider,
};
pub use pipeline::{CoverageSession, CoverageSettings};
