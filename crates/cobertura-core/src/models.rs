pub mod coordinate;
pub mod locality;
pub mod record;

pub use coordinate::{BoundingBox, Coordinate, GeoStatus, RawCoordinate};
pub use locality::{ratio, LocalityAggregate};
pub use record::{
    fold_accent, fold_name, FacilityType, LocalityKey, MemberRecord, ProviderRecord, RecordSet,
};
