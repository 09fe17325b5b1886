use crate::measure::DistanceMetric;
use cobertura_core::models::Coordinate;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::Serialize;

/// Provider position in (lon, lat) degree space, tagged with its position in the index set
type IndexedProvider = GeomWithData<[f64; 2], usize>;

/// Answer to a nearest-provider query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestProvider {
    /// Position of the provider in the collection the index was built from
    pub provider: usize,

    pub coordinate: Coordinate,

    pub distance_km: f64,
}

/// Spatial index over located provider coordinates.
///
/// Built once per index set with a bulk load; the tree is balanced and
/// read-only afterwards. Neighbours are found in degree space and then
/// measured with the requested [`DistanceMetric`].
pub struct ProviderIndex {
    tree: RTree<IndexedProvider>,
}

impl ProviderIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load an index from `(position, coordinate)` pairs
    pub fn build<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = (usize, Coordinate)>,
    {
        let entries: Vec<IndexedProvider> = providers
            .into_iter()
            .map(|(position, coordinate)| GeomWithData::new(coordinate.to_xy(), position))
            .collect();

        let tree = RTree::bulk_load(entries);
        tracing::debug!(providers = tree.size(), "Built provider index");
        Self { tree }
    }

    /// Get the total number of providers in the index
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest provider to one point, `None` when the index is empty
    pub fn nearest(&self, query: Coordinate, metric: DistanceMetric) -> Option<NearestProvider> {
        self.tree.nearest_neighbor(&query.to_xy()).map(|hit| {
            let coordinate = Coordinate::from_xy(*hit.geom());
            NearestProvider {
                provider: hit.data,
                coordinate,
                distance_km: metric.distance_km(query, coordinate),
            }
        })
    }

    /// One nearest-provider answer per query point, in query order.
    ///
    /// An empty index answers every query with `None`.
    pub fn nearest_many(
        &self,
        queries: &[Coordinate],
        metric: DistanceMetric,
    ) -> Vec<Option<NearestProvider>> {
        if self.is_empty() {
            tracing::warn!(
                queries = queries.len(),
                "Provider index is empty; distances undefined"
            );
            return vec![None; queries.len()];
        }

        queries
            .iter()
            .map(|query| self.nearest(*query, metric))
            .collect()
    }
}

impl Default for ProviderIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(usize, Coordinate)> for ProviderIndex {
    fn from_iter<I: IntoIterator<Item = (usize, Coordinate)>>(iter: I) -> Self {
        Self::build(iter)
    }
}
