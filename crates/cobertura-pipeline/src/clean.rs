use cobertura_core::models::{fold_name, MemberRecord, ProviderRecord};
use std::collections::HashSet;

/// Members left after cleaning, with what was dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedMembers {
    pub members: Vec<MemberRecord>,
    pub duplicates_removed: usize,
    pub foreign_excluded: usize,
}

/// Providers left after the country filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedProviders {
    pub providers: Vec<ProviderRecord>,
    pub foreign_excluded: usize,
}

/// Country filter then deduplication on trimmed (member_id, street, number).
///
/// The first occurrence of a duplicated address is kept. Records without a
/// country value are kept.
pub fn clean_members(records: Vec<MemberRecord>, country: &str) -> CleanedMembers {
    let total = records.len();
    let (members, foreign_excluded) = retain_country(records, country, |m| m.country.as_deref());

    let mut seen = HashSet::new();
    let members: Vec<MemberRecord> = members
        .into_iter()
        .filter(|member| seen.insert(member.address_key()))
        .collect();
    let duplicates_removed = total - foreign_excluded - members.len();

    if duplicates_removed > 0 || foreign_excluded > 0 {
        tracing::info!(
            duplicates_removed,
            foreign_excluded,
            kept = members.len(),
            "Cleaned members"
        );
    }

    CleanedMembers {
        members,
        duplicates_removed,
        foreign_excluded,
    }
}

/// Country filter only; providers are not deduplicated
pub fn clean_providers(records: Vec<ProviderRecord>, country: &str) -> CleanedProviders {
    let (providers, foreign_excluded) = retain_country(records, country, |p| p.country.as_deref());

    if foreign_excluded > 0 {
        tracing::info!(
            foreign_excluded,
            kept = providers.len(),
            "Cleaned providers"
        );
    }

    CleanedProviders {
        providers,
        foreign_excluded,
    }
}

fn retain_country<T>(
    records: Vec<T>,
    country: &str,
    country_of: impl Fn(&T) -> Option<&str>,
) -> (Vec<T>, usize) {
    let wanted = fold_name(country);
    let total = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|record| match country_of(record).map(fold_name) {
            Some(value) if !value.is_empty() => value == wanted,
            _ => true,
        })
        .collect();
    let excluded = total - kept.len();
    (kept, excluded)
}
