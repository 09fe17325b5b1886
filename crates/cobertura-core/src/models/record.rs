use serde::{Deserialize, Serialize};
use std::fmt;

use super::coordinate::RawCoordinate;

/// A member (affiliate) address row.
///
/// The same person may appear on several rows, one per registered address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub member_id: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<RawCoordinate>,
    #[serde(default)]
    pub longitude: Option<RawCoordinate>,
}

impl MemberRecord {
    /// Deduplication key: one row per distinct (member, street, number)
    pub fn address_key(&self) -> (String, String, String) {
        (
            self.member_id.trim().to_string(),
            self.street.trim().to_string(),
            self.number.trim().to_string(),
        )
    }
}

/// Facility kind of a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    #[default]
    Clinic,
    Pharmacy,
}

impl FacilityType {
    /// Map a free-text source value. Anything that is not a pharmacy is a clinic.
    pub fn from_source(value: &str) -> Self {
        match fold_name(value).as_str() {
            "PHARMACY" | "FARMACIA" | "FARMACIAS" => FacilityType::Pharmacy,
            _ => FacilityType::Clinic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Clinic => "clinic",
            FacilityType::Pharmacy => "pharmacy",
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider (clinic or pharmacy) address row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub provider_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<RawCoordinate>,
    #[serde(default)]
    pub longitude: Option<RawCoordinate>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub facility_type: FacilityType,
}

impl ProviderRecord {
    pub fn is_pharmacy(&self) -> bool {
        self.facility_type == FacilityType::Pharmacy
    }

    /// Normalized specialty, `None` when missing or blank
    pub fn specialty_key(&self) -> Option<String> {
        self.specialty
            .as_deref()
            .map(fold_name)
            .filter(|s| !s.is_empty() && s != "NONE")
    }
}

/// Trim, collapse inner whitespace, strip accents and upper-case a place or category name
pub fn fold_name(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| word.chars().map(fold_accent).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Latin-1 accented letter to its base letter
pub fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'Ñ' => 'N',
        other => other,
    }
}

/// Composite grouping key. Locality names repeat across provinces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalityKey {
    pub locality: String,
    pub province: String,
}

impl LocalityKey {
    pub fn new(locality: &str, province: &str) -> Self {
        Self {
            locality: fold_name(locality),
            province: fold_name(province),
        }
    }
}

impl fmt::Display for LocalityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.locality, self.province)
    }
}

/// The two normalized tables handed over by a record source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub members: Vec<MemberRecord>,
    pub providers: Vec<ProviderRecord>,
}

impl RecordSet {
    pub fn new(members: Vec<MemberRecord>, providers: Vec<ProviderRecord>) -> Self {
        Self { members, providers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_name() {
        assert_eq!(fold_name("  la   plata "), "LA PLATA");
        assert_eq!(fold_name(""), "");
    }

    #[test]
    fn test_fold_name_strips_accents() {
        assert_eq!(fold_name("Córdoba"), "CORDOBA");
        assert_eq!(fold_name(" río  cuarto"), "RIO CUARTO");
        assert_eq!(fold_name("Cañuelas"), fold_name("CANUELAS"));
        assert_eq!(fold_name("Pediatría"), "PEDIATRIA");
    }

    #[test]
    fn test_locality_key_normalizes() {
        assert_eq!(
            LocalityKey::new("San Isidro ", "buenos aires"),
            LocalityKey::new("SAN ISIDRO", "BUENOS  AIRES")
        );
        assert_eq!(
            LocalityKey::new("Córdoba", "Córdoba"),
            LocalityKey::new("Cordoba", "CORDOBA")
        );
        assert_ne!(
            LocalityKey::new("San Martin", "Mendoza"),
            LocalityKey::new("San Martin", "San Juan")
        );
    }

    #[test]
    fn test_facility_type_from_source() {
        assert_eq!(
            FacilityType::from_source("Farmacia"),
            FacilityType::Pharmacy
        );
        assert_eq!(
            FacilityType::from_source(" pharmacy "),
            FacilityType::Pharmacy
        );
        assert_eq!(
            FacilityType::from_source("Consultorio"),
            FacilityType::Clinic
        );
        assert_eq!(FacilityType::from_source(""), FacilityType::Clinic);
    }

    #[test]
    fn test_specialty_key() {
        let mut provider = ProviderRecord {
            provider_id: "P1".to_string(),
            name: String::new(),
            locality: String::new(),
            province: String::new(),
            country: None,
            latitude: None,
            longitude: None,
            specialty: Some(" cardiologia ".to_string()),
            facility_type: FacilityType::Clinic,
        };
        assert_eq!(provider.specialty_key().as_deref(), Some("CARDIOLOGIA"));
        provider.specialty = Some("none".to_string());
        assert_eq!(provider.specialty_key(), None);
        provider.specialty = Some("  ".to_string());
        assert_eq!(provider.specialty_key(), None);
    }

    #[test]
    fn test_address_key_trims() {
        let member = MemberRecord {
            member_id: " 42 ".to_string(),
            street: "Calle 7".to_string(),
            number: "1200 ".to_string(),
            locality: String::new(),
            province: String::new(),
            country: None,
            latitude: None,
            longitude: None,
        };
        assert_eq!(
            member.address_key(),
            ("42".to_string(), "Calle 7".to_string(), "1200".to_string())
        );
    }
}
