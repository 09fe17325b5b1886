use chrono::Utc;
use cobertura_core::config::{LayeredConfig, RepairKind};
use cobertura_core::models::{
    BoundingBox, Coordinate, GeoStatus, LocalityAggregate, LocalityKey, MemberRecord,
    ProviderRecord, RecordSet,
};
use cobertura_core::session::DevSession;
use cobertura_geo::{classify, Classified, DistanceMetric, Located, ProviderIndex, RepairChain};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::aggregate::{group_members, group_providers, reconcile};
use crate::clean::{clean_members, clean_providers};
use crate::distance::{DistanceCache, MemberDistances};
use crate::models::{
    AuditReport, CoverageFilter, CoverageReport, CoverageSummary, PopulationSummary, SpecialtyRow,
    UnlocatedMember, UnlocatedProvider,
};

/// Inputs that shape a session, resolved from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSettings {
    pub bounding_box: BoundingBox,
    pub metric: DistanceMetric,
    pub country: String,
    pub repairs: Vec<RepairKind>,
    pub shortfall_limit: usize,
}

impl CoverageSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            bounding_box: config.bounding_box.value,
            metric: DistanceMetric::from_config(
                config.distance_metric.value,
                config.km_per_degree.value,
            ),
            country: config.country.value.clone(),
            repairs: config.coordinate_repairs.value.clone(),
            shortfall_limit: config.shortfall_limit.value,
        }
    }
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::with_defaults())
    }
}

/// Coverage computation over one loaded record set.
///
/// Cleaning, repairs and classification run once in [`CoverageSession::new`].
/// Member distances are memoized per specialty for the lifetime of the
/// session, so switching province or locality never rebuilds an index.
pub struct CoverageSession {
    settings: CoverageSettings,
    members: Classified<MemberRecord>,
    clinics: Classified<ProviderRecord>,
    pharmacies: Classified<ProviderRecord>,
    duplicates_removed: usize,
    foreign_excluded: usize,
    repaired_records: usize,
    cache: DistanceCache,
}

impl CoverageSession {
    /// Clean, repair and classify both populations
    pub fn new(records: RecordSet, settings: CoverageSettings) -> Self {
        let cleaned_members = clean_members(records.members, &settings.country);
        let cleaned_providers = clean_providers(records.providers, &settings.country);

        let chain = RepairChain::from_kinds(&settings.repairs);
        let mut members = cleaned_members.members;
        let mut providers = cleaned_providers.providers;
        let mut repaired_records = 0;
        for member in members.iter_mut() {
            repaired_records += usize::from(chain.repair_record(member));
        }
        for provider in providers.iter_mut() {
            repaired_records += usize::from(chain.repair_record(provider));
        }
        if repaired_records > 0 {
            tracing::info!(repaired_records, repairs = ?chain.names(), "Repaired coordinates");
        }

        let (pharmacies, clinics): (Vec<_>, Vec<_>) =
            providers.into_iter().partition(ProviderRecord::is_pharmacy);

        let members = classify(members, &settings.bounding_box);
        let clinics = classify(clinics, &settings.bounding_box);
        let pharmacies = classify(pharmacies, &settings.bounding_box);

        tracing::info!(
            members = members.located_count(),
            clinics = clinics.located_count(),
            pharmacies = pharmacies.located_count(),
            "Located records"
        );

        Self {
            settings,
            members,
            clinics,
            pharmacies,
            duplicates_removed: cleaned_members.duplicates_removed,
            foreign_excluded: cleaned_members.foreign_excluded + cleaned_providers.foreign_excluded,
            repaired_records,
            cache: DistanceCache::new(),
        }
    }

    pub fn settings(&self) -> &CoverageSettings {
        &self.settings
    }

    pub fn cache(&self) -> &DistanceCache {
        &self.cache
    }

    /// Provinces with at least one located member or provider
    pub fn provinces(&self) -> Vec<String> {
        self.located_keys()
            .map(|key| key.province)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Localities with at least one located record, optionally within one province
    pub fn localities(&self, province: Option<&str>) -> Vec<String> {
        let filter = CoverageFilter {
            province: province.map(str::to_string),
            ..Default::default()
        };
        self.located_keys()
            .filter(|key| filter.contains(key))
            .map(|key| key.locality)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Specialties offered by located clinics
    pub fn specialties(&self) -> Vec<String> {
        self.clinics
            .located
            .iter()
            .filter_map(|c| c.record.specialty_key())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Locality coverage table for a filter
    pub fn report(&mut self, filter: &CoverageFilter) -> CoverageReport {
        let specialty = filter.specialty_key();
        let distances = self.member_distances(specialty.as_deref());

        let member_groups = group_members(
            self.scoped_members(filter)
                .map(|(position, m)| (m, distances.distance_km(position))),
        );
        let provider_groups = group_providers(
            self.scoped_clinics(filter, specialty.as_deref())
                .chain(self.scoped_located(&self.pharmacies, filter)),
        );
        let localities = reconcile(&member_groups, &provider_groups);
        let summary = self.summarize(filter, &distances, &localities);

        tracing::debug!(
            filter = ?filter,
            localities = localities.len(),
            uncovered = summary.localities_without_providers,
            "Built coverage report"
        );

        CoverageReport {
            generated_at: Utc::now(),
            filter: filter.clone(),
            summary,
            localities,
        }
    }

    /// One row per specialty offered by located clinics, within the filter's scope
    pub fn specialty_breakdown(&mut self, filter: &CoverageFilter) -> Vec<SpecialtyRow> {
        let scope = filter.without_specialty();
        self.specialties()
            .into_iter()
            .map(|specialty| {
                let report = self.report(&scope.clone().with_specialty(specialty.clone()));
                SpecialtyRow {
                    specialty,
                    provider_count: report.summary.clinics.located,
                    mean_distance_km: report.summary.mean_distance_km,
                    localities_without_provider: report.summary.localities_without_providers,
                }
            })
            .collect()
    }

    /// Unlocated rows in scope. Requires an open developer session.
    pub fn audit(&mut self, filter: &CoverageFilter, _session: &DevSession) -> AuditReport {
        let summary = self.report(filter).summary;
        let specialty = filter.specialty_key();

        let unlocated_members = self
            .members
            .unlocated
            .iter()
            .filter(|u| in_scope(filter, &u.record.locality, &u.record.province))
            .map(|u| UnlocatedMember::new(&u.record, u.reason))
            .collect();

        let unlocated_providers = self
            .clinics
            .unlocated
            .iter()
            .filter(|u| offers(&u.record, specialty.as_deref()))
            .chain(self.pharmacies.unlocated.iter())
            .filter(|u| in_scope(filter, &u.record.locality, &u.record.province))
            .map(|u| UnlocatedProvider::new(&u.record, u.reason))
            .collect();

        AuditReport {
            generated_at: Utc::now(),
            filter: filter.clone(),
            summary,
            unlocated_members,
            unlocated_providers,
        }
    }

    fn member_distances(&mut self, specialty: Option<&str>) -> Arc<MemberDistances> {
        let members = &self.members;
        let clinics = &self.clinics;
        let metric = self.settings.metric;
        self.cache.get_or_compute(specialty, || {
            compute_distances(members, clinics, specialty, metric)
        })
    }

    fn scoped_members<'a>(
        &'a self,
        filter: &'a CoverageFilter,
    ) -> impl Iterator<Item = (usize, &'a Located<MemberRecord>)> + 'a {
        self.members
            .located
            .iter()
            .enumerate()
            .filter(move |(_, m)| in_scope(filter, &m.record.locality, &m.record.province))
    }

    fn scoped_clinics<'a>(
        &'a self,
        filter: &'a CoverageFilter,
        specialty: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Located<ProviderRecord>> + 'a {
        self.scoped_located(&self.clinics, filter)
            .filter(move |c| offers(&c.record, specialty))
    }

    fn scoped_located<'a>(
        &'a self,
        providers: &'a Classified<ProviderRecord>,
        filter: &'a CoverageFilter,
    ) -> impl Iterator<Item = &'a Located<ProviderRecord>> + 'a {
        providers
            .located
            .iter()
            .filter(move |p| in_scope(filter, &p.record.locality, &p.record.province))
    }

    fn located_keys(&self) -> impl Iterator<Item = LocalityKey> + '_ {
        let members = self.members.located.iter().map(|m| &m.record);
        let members = members.map(|r| LocalityKey::new(&r.locality, &r.province));
        let clinics = self.clinics.located.iter().map(|p| &p.record);
        let pharmacies = self.pharmacies.located.iter().map(|p| &p.record);
        let providers = clinics.chain(pharmacies);
        let providers = providers.map(|r| LocalityKey::new(&r.locality, &r.province));
        members.chain(providers)
    }

    fn summarize(
        &self,
        filter: &CoverageFilter,
        distances: &MemberDistances,
        localities: &[LocalityAggregate],
    ) -> CoverageSummary {
        let specialty = filter.specialty_key();

        let member_reasons = self
            .members
            .unlocated
            .iter()
            .filter(|u| in_scope(filter, &u.record.locality, &u.record.province))
            .map(|u| u.reason);
        let clinic_reasons = self
            .clinics
            .unlocated
            .iter()
            .filter(|u| offers(&u.record, specialty.as_deref()))
            .filter(|u| in_scope(filter, &u.record.locality, &u.record.province))
            .map(|u| u.reason);
        let pharmacy_reasons = self
            .pharmacies
            .unlocated
            .iter()
            .filter(|u| in_scope(filter, &u.record.locality, &u.record.province))
            .map(|u| u.reason);

        let scoped_distances: Vec<f64> = self
            .scoped_members(filter)
            .filter_map(|(position, _)| distances.distance_km(position))
            .collect();
        let mean_distance_km = (!scoped_distances.is_empty())
            .then(|| scoped_distances.iter().sum::<f64>() / scoped_distances.len() as f64);

        CoverageSummary {
            members: population(self.scoped_members(filter).count(), member_reasons),
            clinics: population(
                self.scoped_clinics(filter, specialty.as_deref()).count(),
                clinic_reasons,
            ),
            pharmacies: population(
                self.scoped_located(&self.pharmacies, filter).count(),
                pharmacy_reasons,
            ),
            duplicates_removed: self.duplicates_removed,
            foreign_excluded: self.foreign_excluded,
            repaired_records: self.repaired_records,
            index_size: distances.index_size,
            mean_distance_km,
            localities: localities.len(),
            localities_without_providers: localities.iter().filter(|r| r.is_uncovered()).count(),
        }
    }
}

/// Index the clinics offering `specialty` and query every located member
fn compute_distances(
    members: &Classified<MemberRecord>,
    clinics: &Classified<ProviderRecord>,
    specialty: Option<&str>,
    metric: DistanceMetric,
) -> MemberDistances {
    let index: ProviderIndex = clinics
        .located
        .iter()
        .enumerate()
        .filter(|(_, clinic)| offers(&clinic.record, specialty))
        .map(|(position, clinic)| (position, clinic.coordinate))
        .collect();

    let queries: Vec<Coordinate> = members.located.iter().map(|m| m.coordinate).collect();
    MemberDistances {
        index_size: index.len(),
        nearest: index.nearest_many(&queries, metric),
    }
}

fn offers(provider: &ProviderRecord, specialty: Option<&str>) -> bool {
    specialty.map_or(true, |wanted| provider.specialty_key().as_deref() == Some(wanted))
}

fn in_scope(filter: &CoverageFilter, locality: &str, province: &str) -> bool {
    filter.contains(&LocalityKey::new(locality, province))
}

fn population(located: usize, reasons: impl Iterator<Item = GeoStatus>) -> PopulationSummary {
    let mut summary = PopulationSummary {
        located,
        ..Default::default()
    };
    for reason in reasons {
        *summary.reasons.entry(reason).or_insert(0) += 1;
        summary.unlocated += 1;
    }
    summary.base = summary.located + summary.unlocated;
    summary.success_rate = cobertura_core::models::ratio(summary.located, summary.base);
    summary
}
