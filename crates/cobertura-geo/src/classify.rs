use cobertura_core::models::{
    BoundingBox, Coordinate, GeoStatus, MemberRecord, ProviderRecord, RawCoordinate,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// A record carrying nominal latitude/longitude fields
pub trait Locatable {
    fn raw_latitude(&self) -> Option<&RawCoordinate>;

    fn raw_longitude(&self) -> Option<&RawCoordinate>;

    /// Mutable access for pre-classification repairs
    fn raw_coordinates_mut(&mut self) -> (&mut Option<RawCoordinate>, &mut Option<RawCoordinate>);
}

impl Locatable for MemberRecord {
    fn raw_latitude(&self) -> Option<&RawCoordinate> {
        self.latitude.as_ref()
    }

    fn raw_longitude(&self) -> Option<&RawCoordinate> {
        self.longitude.as_ref()
    }

    fn raw_coordinates_mut(&mut self) -> (&mut Option<RawCoordinate>, &mut Option<RawCoordinate>) {
        (&mut self.latitude, &mut self.longitude)
    }
}

impl Locatable for ProviderRecord {
    fn raw_latitude(&self) -> Option<&RawCoordinate> {
        self.latitude.as_ref()
    }

    fn raw_longitude(&self) -> Option<&RawCoordinate> {
        self.longitude.as_ref()
    }

    fn raw_coordinates_mut(&mut self) -> (&mut Option<RawCoordinate>, &mut Option<RawCoordinate>) {
        (&mut self.latitude, &mut self.longitude)
    }
}

/// A record whose coordinates parsed and fell inside the box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Located<T> {
    pub record: T,
    pub coordinate: Coordinate,
}

/// A record that could not be placed, with the first failing reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unlocated<T> {
    pub record: T,
    pub reason: GeoStatus,
}

/// Disjoint partition of a record collection
#[derive(Debug, Clone, PartialEq)]
pub struct Classified<T> {
    pub located: Vec<Located<T>>,
    pub unlocated: Vec<Unlocated<T>>,
}

impl<T> Classified<T> {
    /// Every record seen, located or not
    pub fn base_count(&self) -> usize {
        self.located.len() + self.unlocated.len()
    }

    pub fn located_count(&self) -> usize {
        self.located.len()
    }

    /// Unlocated records per reason
    pub fn reason_counts(&self) -> BTreeMap<GeoStatus, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.unlocated {
            *counts.entry(entry.reason).or_insert(0) += 1;
        }
        counts
    }
}

impl<T> Default for Classified<T> {
    fn default() -> Self {
        Self {
            located: Vec::new(),
            unlocated: Vec::new(),
        }
    }
}

/// Classify one coordinate pair.
///
/// Evaluation order is fixed: blank before unparsable before out of bounds.
pub fn classify_coordinates(
    latitude: Option<&RawCoordinate>,
    longitude: Option<&RawCoordinate>,
    bbox: &BoundingBox,
) -> Result<Coordinate, GeoStatus> {
    let blank = |value: Option<&RawCoordinate>| value.map_or(true, RawCoordinate::is_blank);
    if blank(latitude) && blank(longitude) {
        return Err(GeoStatus::EmptyCoordinates);
    }

    let lat = latitude.and_then(RawCoordinate::parse);
    let lon = longitude.and_then(RawCoordinate::parse);
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(GeoStatus::Unparsable);
    };

    if !bbox.contains(lat, lon) {
        return Err(GeoStatus::OutOfBounds);
    }

    Ok(Coordinate::new(lat, lon))
}

/// Partition records into located and unlocated
pub fn classify<T, I>(records: I, bbox: &BoundingBox) -> Classified<T>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    let mut classified = Classified::default();

    for record in records {
        match classify_coordinates(record.raw_latitude(), record.raw_longitude(), bbox) {
            Ok(coordinate) => classified.located.push(Located { record, coordinate }),
            Err(reason) => classified.unlocated.push(Unlocated { record, reason }),
        }
    }

    tracing::debug!(
        located = classified.located.len(),
        unlocated = classified.unlocated.len(),
        "Classified records against {}",
        bbox
    );

    classified
}
