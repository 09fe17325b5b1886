use cobertura_geo::NearestProvider;
use std::collections::HashMap;
use std::sync::Arc;

/// Nearest-provider answers aligned with the located member list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberDistances {
    /// Providers in the index set the answers were computed against
    pub index_size: usize,

    pub nearest: Vec<Option<NearestProvider>>,
}

impl MemberDistances {
    /// Distance for the member at `position`, `None` without an index
    pub fn distance_km(&self, position: usize) -> Option<f64> {
        self.nearest
            .get(position)
            .copied()
            .flatten()
            .map(|hit| hit.distance_km)
    }
}

/// Per-session memo of member distances keyed by the normalized specialty.
///
/// The specialty is the only filter component that changes the index set;
/// province and locality scoping happen after distances are known.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: HashMap<Option<String>, Arc<MemberDistances>>,
    hits: usize,
    misses: usize,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached distances for `specialty`, computing them on a miss
    pub fn get_or_compute<F>(
        &mut self,
        specialty: Option<&str>,
        compute: F,
    ) -> Arc<MemberDistances>
    where
        F: FnOnce() -> MemberDistances,
    {
        let key = specialty.map(str::to_string);
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(specialty = ?key, "Distance cache hit");
            return Arc::clone(cached);
        }

        self.misses += 1;
        let computed = Arc::new(compute());
        tracing::debug!(
            specialty = ?key,
            index_size = computed.index_size,
            "Computed member distances"
        );
        self.entries.insert(key, Arc::clone(&computed));
        computed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
