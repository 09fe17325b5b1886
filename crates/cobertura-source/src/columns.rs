//! Header normalization for tabular sources.
//!
//! Source spreadsheets name the same column in several ways (`LATITUD`,
//! `Latitude`, `lat`). Headers are trimmed, accent-folded and upper-cased,
//! then matched against the alias list of each logical column.

use cobertura_core::error::{CoberturaError, Result};
use cobertura_core::models::fold_accent;
use std::collections::HashMap;

/// Logical column of the member or provider table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    MemberId,
    ProviderId,
    Name,
    Street,
    Number,
    Locality,
    Province,
    Country,
    Latitude,
    Longitude,
    Specialty,
    FacilityType,
}

impl Column {
    /// Columns read from the member table, identifier first
    pub const MEMBER: [Column; 8] = [
        Column::MemberId,
        Column::Street,
        Column::Number,
        Column::Locality,
        Column::Province,
        Column::Country,
        Column::Latitude,
        Column::Longitude,
    ];

    /// Columns read from the provider table, identifier first
    pub const PROVIDER: [Column; 9] = [
        Column::ProviderId,
        Column::Name,
        Column::Locality,
        Column::Province,
        Column::Country,
        Column::Latitude,
        Column::Longitude,
        Column::Specialty,
        Column::FacilityType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::MemberId => "member_id",
            Column::ProviderId => "provider_id",
            Column::Name => "name",
            Column::Street => "street",
            Column::Number => "number",
            Column::Locality => "locality",
            Column::Province => "province",
            Column::Country => "country",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::Specialty => "specialty",
            Column::FacilityType => "facility_type",
        }
    }

    /// Accepted header spellings, already normalized
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::MemberId => &["MEMBER_ID", "ID_AFILIADO", "AFILIADO", "NRO_AFILIADO"],
            Column::ProviderId => &["PROVIDER_ID", "ID_PRESTADOR", "ID_CONSULTORIO", "CODIGO"],
            Column::Name => &["NAME", "NOMBRE", "PRESTADOR", "RAZON_SOCIAL"],
            Column::Street => &["STREET", "CALLE", "DOMICILIO"],
            Column::Number => &["NUMBER", "NUMERO", "ALTURA", "NRO"],
            Column::Locality => &["LOCALITY", "LOCALIDAD", "CIUDAD"],
            Column::Province => &["PROVINCE", "PROVINCIA"],
            Column::Country => &["COUNTRY", "PAIS"],
            Column::Latitude => &["LATITUDE", "LATITUD", "LAT"],
            Column::Longitude => &["LONGITUDE", "LONGITUD", "LON", "LNG"],
            Column::Specialty => &["SPECIALTY", "ESPECIALIDAD"],
            Column::FacilityType => &["FACILITY_TYPE", "TIPO", "TIPO_PRESTADOR"],
        }
    }

    pub fn matches(&self, header: &str) -> bool {
        let normalized = normalize_header(header);
        self.aliases().contains(&normalized.as_str())
    }
}

/// Trim, fold accents, upper-case and join words with underscores
pub fn normalize_header(header: &str) -> String {
    let folded: String = header
        .trim_start_matches('\u{feff}')
        .trim()
        .chars()
        .map(fold_accent)
        .collect();
    folded
        .split(|c: char| c.is_whitespace() || c == '-' || c == '.')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

/// Resolved positions of logical columns in one header row
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: HashMap<Column, usize>,
}

impl ColumnMap {
    /// Resolve `columns` against a header row.
    ///
    /// The first column in `columns` is the identifier and must be present.
    /// Any other missing column is logged and read as empty.
    pub fn resolve<'a, H>(headers: H, columns: &[Column], source_name: &str) -> Result<Self>
    where
        H: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers.into_iter().collect();
        let mut positions = HashMap::new();

        for column in columns {
            // First matching header wins when a file repeats a column
            match headers.iter().position(|h| column.matches(h)) {
                Some(index) => {
                    positions.insert(*column, index);
                }
                None => tracing::warn!(
                    source = source_name,
                    column = column.as_str(),
                    "Column not found; values read as empty"
                ),
            }
        }

        if let Some(identifier) = columns.first() {
            if !positions.contains_key(identifier) {
                return Err(CoberturaError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: identifier.as_str().to_string(),
                });
            }
        }

        Ok(Self { positions })
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.positions.contains_key(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Latitud "), "LATITUD");
        assert_eq!(normalize_header("Número"), "NUMERO");
        assert_eq!(normalize_header("id afiliado"), "ID_AFILIADO");
        assert_eq!(normalize_header("País"), "PAIS");
        assert_eq!(normalize_header("\u{feff}ID_AFILIADO"), "ID_AFILIADO");
        assert_eq!(normalize_header("tipo-prestador"), "TIPO_PRESTADOR");
    }

    #[test]
    fn test_column_matches_aliases() {
        assert!(Column::Latitude.matches("lat"));
        assert!(Column::Latitude.matches("LATITUD"));
        assert!(Column::Longitude.matches("Lng"));
        assert!(Column::Specialty.matches("Especialidad"));
        assert!(!Column::Latitude.matches("LATITUDE_REF"));
    }

    #[test]
    fn test_resolve_positions() {
        let headers = ["ID_AFILIADO", "CALLE", "LOCALIDAD", "LATITUD", "LONGITUD"];
        let map = ColumnMap::resolve(headers, &Column::MEMBER, "afiliados.csv").unwrap();

        assert_eq!(map.position(Column::MemberId), Some(0));
        assert_eq!(map.position(Column::Latitude), Some(3));
        assert!(!map.contains(Column::Number));
        assert!(!map.contains(Column::Country));
    }

    #[test]
    fn test_resolve_requires_identifier() {
        let headers = ["CALLE", "LATITUD", "LONGITUD"];
        let err = ColumnMap::resolve(headers, &Column::MEMBER, "afiliados.csv").unwrap_err();

        match err {
            CoberturaError::MissingColumn {
                source_name,
                column,
            } => {
                assert_eq!(source_name, "afiliados.csv");
                assert_eq!(column, "member_id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
