//! In-memory record source for development and testing.

use async_trait::async_trait;
use cobertura_core::error::Result;
use cobertura_core::models::{MemberRecord, ProviderRecord, RecordSet};

use crate::ports::RecordSource;

/// Serves a fixed record set
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: RecordSet,
}

impl MemorySource {
    pub fn new(records: RecordSet) -> Self {
        Self { records }
    }

    pub fn from_parts(members: Vec<MemberRecord>, providers: Vec<ProviderRecord>) -> Self {
        Self::new(RecordSet::new(members, providers))
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn load(&self) -> Result<RecordSet> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!(
            "in-memory ({} members, {} providers)",
            self.records.members.len(),
            self.records.providers.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobertura_core::models::RawCoordinate;

    #[tokio::test]
    async fn test_memory_source_returns_records() {
        let member = MemberRecord {
            member_id: "1".to_string(),
            street: "San Martin".to_string(),
            number: "100".to_string(),
            locality: "Rosario".to_string(),
            province: "Santa Fe".to_string(),
            country: None,
            latitude: Some(RawCoordinate::Number(-32.95)),
            longitude: Some(RawCoordinate::Number(-60.65)),
        };
        let source = MemorySource::from_parts(vec![member.clone()], Vec::new());

        let records = source.load().await.unwrap();
        assert_eq!(records.members, vec![member]);
        assert!(records.providers.is_empty());
        assert_eq!(source.describe(), "in-memory (1 members, 0 providers)");
    }
}
