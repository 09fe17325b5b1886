use async_trait::async_trait;
use cobertura_core::error::{CoberturaError, Result};
use cobertura_core::models::{FacilityType, MemberRecord, ProviderRecord, RawCoordinate, RecordSet};
use csv::ByteRecord;
use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::columns::{Column, ColumnMap};
use crate::ports::RecordSource;

/// Delimited-text adapter.
///
/// Each population may be split across several files (one export per
/// region, say); parts are read in order and concatenated.
#[derive(Debug, Clone)]
pub struct CsvSource {
    members: Vec<PathBuf>,
    providers: Vec<PathBuf>,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(members: Vec<PathBuf>, providers: Vec<PathBuf>) -> Self {
        Self {
            members,
            providers,
            delimiter: b',',
        }
    }

    /// Use a different field delimiter (`;` is common in Spanish-locale exports)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn member_paths(&self) -> &[PathBuf] {
        &self.members
    }

    pub fn provider_paths(&self) -> &[PathBuf] {
        &self.providers
    }

    /// Read every member part
    pub fn read_members(&self) -> Result<Vec<MemberRecord>> {
        if self.members.is_empty() {
            return Err(CoberturaError::SourceMissing {
                population: "member".to_string(),
            });
        }

        let mut records = Vec::new();
        for path in &self.members {
            let part = read_part(path, self.delimiter, &Column::MEMBER, member_from_row)?;
            tracing::debug!(path = %path.display(), rows = part.len(), "Read member part");
            records.extend(part);
        }
        Ok(records)
    }

    /// Read every provider part
    pub fn read_providers(&self) -> Result<Vec<ProviderRecord>> {
        if self.providers.is_empty() {
            return Err(CoberturaError::SourceMissing {
                population: "provider".to_string(),
            });
        }

        let mut records = Vec::new();
        for path in &self.providers {
            let part = read_part(path, self.delimiter, &Column::PROVIDER, provider_from_row)?;
            tracing::debug!(path = %path.display(), rows = part.len(), "Read provider part");
            records.extend(part);
        }
        Ok(records)
    }

    /// Read both populations synchronously
    pub fn read_all(&self) -> Result<RecordSet> {
        let members = self.read_members()?;
        let providers = self.read_providers()?;
        tracing::info!(
            members = members.len(),
            providers = providers.len(),
            "Loaded records from {}",
            self.describe()
        );
        Ok(RecordSet::new(members, providers))
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    async fn load(&self) -> Result<RecordSet> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.read_all())
            .await
            .map_err(|e| CoberturaError::Io(std::io::Error::other(e)))?
    }

    fn describe(&self) -> String {
        format!(
            "{} member file(s), {} provider file(s)",
            self.members.len(),
            self.providers.len()
        )
    }
}

/// Read one file, resolving its own header row
fn read_part<T>(
    path: &Path,
    delimiter: u8,
    columns: &[Column],
    build: fn(&Row<'_>) -> T,
) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(CoberturaError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = open(path, delimiter)?;
    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| read_error(path, e))?
        .iter()
        .map(|field| decode(field).into_owned())
        .collect();
    let source_name = path.display().to_string();
    let map = ColumnMap::resolve(headers.iter().map(String::as_str), columns, &source_name)?;

    let mut records = Vec::new();
    let mut latin1_rows = 0;
    for result in reader.byte_records() {
        let record = result.map_err(|e| read_error(path, e))?;
        if std::str::from_utf8(record.as_slice()).is_err() {
            latin1_rows += 1;
        }
        records.push(build(&Row {
            record: &record,
            map: &map,
        }));
    }

    if latin1_rows > 0 {
        tracing::warn!(
            source = %source_name,
            rows = latin1_rows,
            "Rows are not valid UTF-8; decoded as Latin-1"
        );
    }
    Ok(records)
}

/// UTF-8 when valid, otherwise Latin-1 (one byte per character)
fn decode(field: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(field) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(field.iter().copied().map(char::from).collect()),
    }
}

fn open(path: &Path, delimiter: u8) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| read_error(path, e))
}

fn read_error(path: &Path, error: csv::Error) -> CoberturaError {
    CoberturaError::SourceRead {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// One data row seen through the resolved column positions
struct Row<'a> {
    record: &'a ByteRecord,
    map: &'a ColumnMap,
}

impl<'a> Row<'a> {
    /// Cell text; missing columns and short rows read as empty
    fn text(&self, column: Column) -> String {
        self.cell(column)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    /// Cell text, `None` when missing or blank
    fn optional(&self, column: Column) -> Option<String> {
        Some(self.text(column)).filter(|value| !value.is_empty())
    }

    /// Raw coordinate cell, left untrimmed for the classifier and repairs
    fn coordinate(&self, column: Column) -> Option<RawCoordinate> {
        self.cell(column).map(RawCoordinate::text)
    }

    fn cell(&self, column: Column) -> Option<Cow<'a, str>> {
        self.map
            .position(column)
            .and_then(|index| self.record.get(index))
            .map(decode)
    }
}

fn member_from_row(row: &Row<'_>) -> MemberRecord {
    MemberRecord {
        member_id: row.text(Column::MemberId),
        street: row.text(Column::Street),
        number: row.text(Column::Number),
        locality: row.text(Column::Locality),
        province: row.text(Column::Province),
        country: row.optional(Column::Country),
        latitude: row.coordinate(Column::Latitude),
        longitude: row.coordinate(Column::Longitude),
    }
}

fn provider_from_row(row: &Row<'_>) -> ProviderRecord {
    ProviderRecord {
        provider_id: row.text(Column::ProviderId),
        name: row.text(Column::Name),
        locality: row.text(Column::Locality),
        province: row.text(Column::Province),
        country: row.optional(Column::Country),
        latitude: row.coordinate(Column::Latitude),
        longitude: row.coordinate(Column::Longitude),
        specialty: row.optional(Column::Specialty),
        facility_type: row
            .optional(Column::FacilityType)
            .map(|value| FacilityType::from_source(&value))
            .unwrap_or_default(),
    }
}
