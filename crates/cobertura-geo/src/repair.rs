//! Source-specific coordinate repairs.
//!
//! Repairs run before classification and never inside it. Each one recognizes
//! a single known corruption and leaves every other value untouched, so a bad
//! guess still ends up rejected by the bounding box.

use crate::classify::Locatable;
use cobertura_core::config::RepairKind;
use cobertura_core::models::RawCoordinate;

/// A rewrite of one raw coordinate value
pub trait CoordinateRepair: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the rewritten value, or `None` when the repair does not apply
    fn repair(&self, raw: &RawCoordinate) -> Option<RawCoordinate>;
}

/// Digit strings exported without their decimal point, e.g. `-34565076`.
///
/// A point is inserted after the first three characters of the signed string
/// (`-34.565076`). Lossy: it assumes two integer digits and a sign, which holds
/// for the Argentine dataset it was written for and nothing else is verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingDecimalPoint;

impl CoordinateRepair for MissingDecimalPoint {
    fn name(&self) -> &'static str {
        "missing_decimal_point"
    }

    fn repair(&self, raw: &RawCoordinate) -> Option<RawCoordinate> {
        let text = match raw {
            // Integral numbers beyond any valid degree value went through the same corruption
            RawCoordinate::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() > 180.0 => {
                format!("{:.0}", n)
            }
            RawCoordinate::Number(_) => return None,
            RawCoordinate::Text(s) => s.trim().to_string(),
        };

        let digits = text.strip_prefix(['-', '+']).unwrap_or(&text);
        if text.len() <= 3 || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let (head, tail) = text.split_at(3);
        Some(RawCoordinate::Text(format!("{}.{}", head, tail)))
    }
}

/// Decimal commas from Spanish-locale exports, e.g. `-34,6037`
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalComma;

impl CoordinateRepair for DecimalComma {
    fn name(&self) -> &'static str {
        "decimal_comma"
    }

    fn repair(&self, raw: &RawCoordinate) -> Option<RawCoordinate> {
        let RawCoordinate::Text(s) = raw else {
            return None;
        };
        let trimmed = s.trim();
        if trimmed.contains('.') || trimmed.matches(',').count() != 1 {
            return None;
        }
        Some(RawCoordinate::Text(trimmed.replace(',', ".")))
    }
}

/// Ordered list of repairs. The first repair that applies wins.
#[derive(Default)]
pub struct RepairChain {
    repairs: Vec<Box<dyn CoordinateRepair>>,
}

impl RepairChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from configured repair names
    pub fn from_kinds(kinds: &[RepairKind]) -> Self {
        kinds.iter().fold(Self::new(), |chain, kind| match kind {
            RepairKind::MissingDecimalPoint => chain.with(MissingDecimalPoint),
            RepairKind::DecimalComma => chain.with(DecimalComma),
        })
    }

    pub fn with(mut self, repair: impl CoordinateRepair + 'static) -> Self {
        self.repairs.push(Box::new(repair));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.repairs.iter().map(|r| r.name()).collect()
    }

    /// Repair a single value; untouched values come back as clones
    pub fn apply(&self, raw: &RawCoordinate) -> RawCoordinate {
        self.repairs
            .iter()
            .find_map(|r| r.repair(raw))
            .unwrap_or_else(|| raw.clone())
    }

    /// Repair both coordinate fields of a record, returning whether anything changed
    pub fn repair_record<T: Locatable>(&self, record: &mut T) -> bool {
        if self.is_empty() {
            return false;
        }
        let (latitude, longitude) = record.raw_coordinates_mut();
        let mut changed = false;
        for field in [latitude, longitude] {
            if let Some(raw) = field.as_ref() {
                let repaired = self.apply(raw);
                if &repaired != raw {
                    *field = Some(repaired);
                    changed = true;
                }
            }
        }
        changed
    }
}

impl std::fmt::Debug for RepairChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepairChain")
            .field("repairs", &self.names())
            .finish()
    }
}
