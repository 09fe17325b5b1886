use async_trait::async_trait;
use cobertura_core::error::Result;
use cobertura_core::models::RecordSet;

/// Port for loading the member and provider tables
///
/// Loading completes before any computation starts; adapters hand over
/// fully materialized tables.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load both populations
    async fn load(&self) -> Result<RecordSet>;

    /// Short human-readable description of where records come from
    fn describe(&self) -> String;
}
