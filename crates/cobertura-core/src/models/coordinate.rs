use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate value as delivered by a source, before any validation.
///
/// Sources disagree on types: CSV exports carry text, JSON and spreadsheet
/// exports may carry numbers. Absence is modelled one level up as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        RawCoordinate::Text(value.into())
    }

    /// True when the value carries nothing but whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            RawCoordinate::Number(_) => false,
            RawCoordinate::Text(s) => s.trim().is_empty(),
        }
    }

    /// Parse into a finite float. Text is trimmed; no locale repair happens here.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            RawCoordinate::Number(n) => *n,
            RawCoordinate::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawCoordinate {
    fn from(value: f64) -> Self {
        RawCoordinate::Number(value)
    }
}

impl From<&str> for RawCoordinate {
    fn from(value: &str) -> Self {
        RawCoordinate::Text(value.to_string())
    }
}

impl fmt::Display for RawCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCoordinate::Number(n) => write!(f, "{}", n),
            RawCoordinate::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A validated WGS 84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Planar (x, y) form used by the spatial index
    pub fn to_xy(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn from_xy(xy: [f64; 2]) -> Self {
        Self {
            latitude: xy[1],
            longitude: xy[0],
        }
    }
}

/// Inclusive latitude/longitude envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    /// Continental Argentina envelope
    pub fn argentina() -> Self {
        Self::new(-56.0, -21.0, -74.0, -53.0)
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }

    /// Parse `min_lat,max_lat,min_lon,max_lon`
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [min_lat, max_lat, min_lon, max_lon] if min_lat <= max_lat && min_lon <= max_lon => {
                Some(Self::new(*min_lat, *max_lat, *min_lon, *max_lon))
            }
            _ => None,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::argentina()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat [{}, {}], lon [{}, {}]",
            self.min_latitude, self.max_latitude, self.min_longitude, self.max_longitude
        )
    }
}

/// Geo-validity tag, in the order the classifier evaluates it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoStatus {
    Ok,
    EmptyCoordinates,
    Unparsable,
    OutOfBounds,
}

impl GeoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoStatus::Ok => "ok",
            GeoStatus::EmptyCoordinates => "empty_coordinates",
            GeoStatus::Unparsable => "unparsable",
            GeoStatus::OutOfBounds => "out_of_bounds",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, GeoStatus::Ok)
    }
}

impl fmt::Display for GeoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_parse() {
        assert_eq!(RawCoordinate::text(" -34.6 ").parse(), Some(-34.6));
        assert_eq!(RawCoordinate::Number(-58.4).parse(), Some(-58.4));
        assert_eq!(RawCoordinate::text("").parse(), None);
        assert_eq!(RawCoordinate::text("abc").parse(), None);
        assert_eq!(RawCoordinate::Number(f64::NAN).parse(), None);
        assert_eq!(RawCoordinate::text("inf").parse(), None);
    }

    #[test]
    fn test_blank() {
        assert!(RawCoordinate::text("   ").is_blank());
        assert!(!RawCoordinate::text("0").is_blank());
        assert!(!RawCoordinate::Number(0.0).is_blank());
    }

    #[test]
    fn test_untagged_deserialize() {
        let number: RawCoordinate = serde_json::from_str("-34.5").unwrap();
        let text: RawCoordinate = serde_json::from_str("\"-34,5\"").unwrap();
        assert_eq!(number, RawCoordinate::Number(-34.5));
        assert_eq!(text, RawCoordinate::text("-34,5"));
    }

    #[test]
    fn test_bbox_contains() {
        let bbox = BoundingBox::argentina();
        assert!(bbox.contains(-34.6037, -58.3816));
        assert!(bbox.contains(-56.0, -74.0));
        assert!(!bbox.contains(0.0, 0.0));
        assert!(!bbox.contains(-34.6, -80.0));
    }

    #[test]
    fn test_bbox_parse() {
        let bbox = BoundingBox::parse("-56, -21, -74, -53").unwrap();
        assert_eq!(bbox, BoundingBox::argentina());
        assert!(BoundingBox::parse("-21,-56,-74,-53").is_none());
        assert!(BoundingBox::parse("1,2,3").is_none());
    }

    #[test]
    fn test_xy_roundtrip() {
        let c = Coordinate::new(-34.6, -58.4);
        assert_eq!(c.to_xy(), [-58.4, -34.6]);
        assert_eq!(Coordinate::from_xy(c.to_xy()), c);
    }
}
