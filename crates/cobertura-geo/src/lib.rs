//! Cobertura Geo - Geo-validity, coordinate repair, and nearest-provider search
//!
//! This crate handles the geospatial stages of the coverage pipeline: deciding
//! which records are located, repairing known coordinate corruptions, and
//! answering nearest-provider queries over an R-tree.

pub mod classify;
pub mod index;
pub mod measure;
pub mod repair;

pub use classify::{classify, classify_coordinates, Classified, Locatable, Located, Unlocated};
pub use index::{NearestProvider, ProviderIndex};
pub use measure::{centroid, DistanceMetric};
pub use repair::{CoordinateRepair, DecimalComma, MissingDecimalPoint, RepairChain};
