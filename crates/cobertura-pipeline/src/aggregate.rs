//! Per-locality grouping of both populations and their reconciliation.

use cobertura_core::models::{
    ratio, Coordinate, LocalityAggregate, LocalityKey, MemberRecord, ProviderRecord,
};
use cobertura_geo::{centroid, Located};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Member accumulator for one locality
#[derive(Debug, Clone, Default)]
pub struct MemberGroup {
    member_ids: HashSet<String>,
    coordinates: Vec<Coordinate>,
    distance_sum: f64,
    distance_count: usize,
}

impl MemberGroup {
    pub fn add(&mut self, member: &Located<MemberRecord>, distance_km: Option<f64>) {
        let id = member.record.member_id.trim().to_string();
        self.member_ids.insert(id);
        self.coordinates.push(member.coordinate);
        if let Some(distance) = distance_km {
            self.distance_sum += distance;
            self.distance_count += 1;
        }
    }

    /// Distinct member identifiers
    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    /// Mean over member rows that have a distance
    pub fn mean_distance_km(&self) -> Option<f64> {
        (self.distance_count > 0).then(|| self.distance_sum / self.distance_count as f64)
    }

    pub fn centroid(&self) -> Option<Coordinate> {
        centroid(&self.coordinates)
    }
}

/// Provider accumulator for one locality
#[derive(Debug, Clone, Default)]
pub struct ProviderGroup {
    clinics: Vec<Coordinate>,
    pharmacies: Vec<Coordinate>,
}

impl ProviderGroup {
    pub fn add(&mut self, provider: &Located<ProviderRecord>) {
        if provider.record.is_pharmacy() {
            self.pharmacies.push(provider.coordinate);
        } else {
            self.clinics.push(provider.coordinate);
        }
    }

    pub fn provider_count(&self) -> usize {
        self.clinics.len()
    }

    pub fn pharmacy_count(&self) -> usize {
        self.pharmacies.len()
    }

    pub fn clinic_centroid(&self) -> Option<Coordinate> {
        centroid(&self.clinics)
    }

    pub fn pharmacy_centroid(&self) -> Option<Coordinate> {
        centroid(&self.pharmacies)
    }
}

/// Group located members and their nearest-provider distances by locality
pub fn group_members<'a, I>(members: I) -> BTreeMap<LocalityKey, MemberGroup>
where
    I: IntoIterator<Item = (&'a Located<MemberRecord>, Option<f64>)>,
{
    let mut groups: BTreeMap<LocalityKey, MemberGroup> = BTreeMap::new();
    for (member, distance_km) in members {
        let key = LocalityKey::new(&member.record.locality, &member.record.province);
        groups.entry(key).or_default().add(member, distance_km);
    }
    groups
}

/// Group located clinics and pharmacies by locality
pub fn group_providers<'a, I>(providers: I) -> BTreeMap<LocalityKey, ProviderGroup>
where
    I: IntoIterator<Item = &'a Located<ProviderRecord>>,
{
    let mut groups: BTreeMap<LocalityKey, ProviderGroup> = BTreeMap::new();
    for provider in providers {
        let key = LocalityKey::new(&provider.record.locality, &provider.record.province);
        groups.entry(key).or_default().add(provider);
    }
    groups
}

/// Full outer union of both groupings, one row per key, sorted by key.
///
/// Counts missing on one side are zero. The representative coordinate falls
/// back from members to clinics to pharmacies. Ratios with a zero
/// denominator and the mean distance of a locality without members are `None`.
pub fn reconcile(
    members: &BTreeMap<LocalityKey, MemberGroup>,
    providers: &BTreeMap<LocalityKey, ProviderGroup>,
) -> Vec<LocalityAggregate> {
    let keys: BTreeSet<&LocalityKey> = members.keys().chain(providers.keys()).collect();
    let mut rows = Vec::with_capacity(keys.len());

    for key in keys {
        let member_group = members.get(key);
        let provider_group = providers.get(key);

        let member_count = member_group.map_or(0, MemberGroup::member_count);
        let provider_count = provider_group.map_or(0, ProviderGroup::provider_count);
        let pharmacy_count = provider_group.map_or(0, ProviderGroup::pharmacy_count);

        let representative = member_group
            .and_then(MemberGroup::centroid)
            .or_else(|| provider_group.and_then(ProviderGroup::clinic_centroid))
            .or_else(|| provider_group.and_then(ProviderGroup::pharmacy_centroid));

        // Every group holds at least one coordinate
        let Some(representative) = representative else {
            tracing::warn!(locality = %key, "Locality without any coordinate skipped");
            continue;
        };

        let mean_distance_km = if member_count == 0 {
            None
        } else {
            member_group.and_then(MemberGroup::mean_distance_km)
        };

        rows.push(LocalityAggregate {
            locality: key.locality.clone(),
            province: key.province.clone(),
            member_count,
            mean_distance_km,
            provider_count,
            pharmacy_count,
            representative,
            providers_per_member: ratio(provider_count, member_count),
            members_per_provider: ratio(member_count, provider_count),
            members_per_pharmacy: ratio(member_count, pharmacy_count),
        });
    }

    tracing::debug!(localities = rows.len(), "Reconciled locality groups");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobertura_core::models::FacilityType;

    fn located_member(id: &str, locality: &str, lat: f64, lon: f64) -> Located<MemberRecord> {
        Located {
            record: MemberRecord {
                member_id: id.to_string(),
                street: String::new(),
                number: String::new(),
                locality: locality.to_string(),
                province: "BUENOS AIRES".to_string(),
                country: None,
                latitude: None,
                longitude: None,
            },
            coordinate: Coordinate::new(lat, lon),
        }
    }

    fn located_provider(
        locality: &str,
        facility_type: FacilityType,
        lat: f64,
        lon: f64,
    ) -> Located<ProviderRecord> {
        Located {
            record: ProviderRecord {
                provider_id: "P".to_string(),
                name: String::new(),
                locality: locality.to_string(),
                province: "Buenos Aires".to_string(),
                country: None,
                latitude: None,
                longitude: None,
                specialty: None,
                facility_type,
            },
            coordinate: Coordinate::new(lat, lon),
        }
    }

    #[test]
    fn test_outer_union() {
        let members = [located_member("1", "A", -34.0, -58.0)];
        let providers = [located_provider("B", FacilityType::Clinic, -35.0, -59.0)];

        let rows = reconcile(
            &group_members(members.iter().map(|m| (m, None))),
            &group_providers(providers.iter()),
        );

        assert_eq!(rows.len(), 2);
        let a = &rows[0];
        assert_eq!(
            (a.locality.as_str(), a.member_count, a.provider_count),
            ("A", 1, 0)
        );
        assert_eq!(a.providers_per_member, Some(0.0));
        assert_eq!(a.members_per_provider, None);
        assert_eq!(a.mean_distance_km, None);

        let b = &rows[1];
        assert_eq!(
            (b.locality.as_str(), b.member_count, b.provider_count),
            ("B", 0, 1)
        );
        assert_eq!(b.providers_per_member, None);
        assert_eq!(b.members_per_provider, Some(0.0));
        assert_eq!(b.mean_distance_km, None);
        assert_eq!(b.representative, Coordinate::new(-35.0, -59.0));
    }

    #[test]
    fn test_distinct_members_and_mean_distance() {
        let members = [
            located_member("1", "A", -34.0, -58.0),
            located_member("1", "A", -34.2, -58.2),
            located_member("2", "A", -34.4, -58.4),
        ];
        let distances = [Some(2.0), Some(4.0), None];

        let groups = group_members(members.iter().zip(distances));
        let rows = reconcile(&groups, &BTreeMap::new());

        assert_eq!(rows[0].member_count, 2);
        assert_eq!(rows[0].mean_distance_km, Some(3.0));
        assert!((rows[0].representative.latitude + 34.2).abs() < 1e-10);
    }

    #[test]
    fn test_pharmacy_only_locality() {
        let providers = [
            located_provider("C", FacilityType::Pharmacy, -30.0, -60.0),
            located_provider("C", FacilityType::Pharmacy, -32.0, -62.0),
        ];

        let rows = reconcile(&BTreeMap::new(), &group_providers(providers.iter()));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].provider_count, 0);
        assert_eq!(rows[0].pharmacy_count, 2);
        assert_eq!(rows[0].members_per_pharmacy, Some(0.0));
        assert_eq!(rows[0].representative, Coordinate::new(-31.0, -61.0));
    }

    #[test]
    fn test_member_centroid_preferred_over_providers() {
        let members = [located_member("1", "D", -34.0, -58.0)];
        let providers = [located_provider("D", FacilityType::Clinic, -36.0, -60.0)];

        let rows = reconcile(
            &group_members(members.iter().map(|m| (m, Some(1.0)))),
            &group_providers(providers.iter()),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].representative, Coordinate::new(-34.0, -58.0));
        assert_eq!(rows[0].providers_per_member, Some(1.0));
        assert_eq!(rows[0].members_per_pharmacy, None);
    }

    #[test]
    fn test_names_are_folded_into_one_key() {
        let members = [located_member("1", "la plata", -34.9, -57.9)];
        let providers = [located_provider("LA PLATA ", FacilityType::Clinic, -34.9, -57.95)];

        let rows = reconcile(
            &group_members(members.iter().map(|m| (m, Some(4.0)))),
            &group_providers(providers.iter()),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].locality, "LA PLATA");
        assert_eq!(rows[0].province, "BUENOS AIRES");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(reconcile(&BTreeMap::new(), &BTreeMap::new()).is_empty());
    }
}
