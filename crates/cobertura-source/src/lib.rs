//! Cobertura Source - Record source ports and adapters
//!
//! This crate defines the record source port and provides CSV and
//! in-memory adapters producing normalized member and provider tables.

pub mod columns;
pub mod csv_file;
pub mod memory;
pub mod ports;

pub use csv_file::CsvSource;
pub use memory::MemorySource;
pub use ports::RecordSource;
