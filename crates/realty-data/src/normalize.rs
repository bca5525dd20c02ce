//! Record normalization
//!
//! Converts raw dataset rows into typed [`Listing`] values. The header is
//! validated once into a [`Schema`] that maps every required column to its
//! position; each row is then coerced against that schema. All parsing
//! failures of the pipeline originate here.
//!
//! # Columns
//!
//! Column names are matched exactly after trimming surrounding whitespace;
//! column order is not significant.
//!
//! | Column                  | Type    | Field                      |
//! |-------------------------|---------|----------------------------|
//! | `POSTED_BY`             | enum    | `posted_by`                |
//! | `UNDER_CONSTRUCTION`    | boolean | `under_construction`       |
//! | `RERA`                  | boolean | `has_regulatory_approval`  |
//! | `BHK_NO.`               | integer | `bedroom_count`            |
//! | `SQUARE_FT`             | float   | `area_sq_ft`               |
//! | `READY_TO_MOVE`         | boolean | `ready_to_move`            |
//! | `RESALE`                | boolean | `is_resale`                |
//! | `LONGITUDE`             | float   | `longitude`                |
//! | `LATITUDE`              | float   | `latitude`                 |
//! | `TARGET(PRICE_IN_LACS)` | float   | `price_lacs`               |
//!
//! `BHK_OR_RK` (constant across the dataset) and `ADDRESS` are recognized
//! but not retained; any other extra column is ignored as well.

use csv::StringRecord;

use crate::listing::{Listing, PostedBy};

pub const POSTED_BY: &str = "POSTED_BY";
pub const UNDER_CONSTRUCTION: &str = "UNDER_CONSTRUCTION";
pub const RERA: &str = "RERA";
pub const BHK_NO: &str = "BHK_NO.";
pub const BHK_OR_RK: &str = "BHK_OR_RK";
pub const SQUARE_FT: &str = "SQUARE_FT";
pub const READY_TO_MOVE: &str = "READY_TO_MOVE";
pub const RESALE: &str = "RESALE";
pub const ADDRESS: &str = "ADDRESS";
pub const LONGITUDE: &str = "LONGITUDE";
pub const LATITUDE: &str = "LATITUDE";
pub const PRICE_IN_LACS: &str = "TARGET(PRICE_IN_LACS)";

/// Columns that must be present for a row to be normalized.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    POSTED_BY,
    UNDER_CONSTRUCTION,
    RERA,
    BHK_NO,
    SQUARE_FT,
    READY_TO_MOVE,
    RESALE,
    LONGITUDE,
    LATITUDE,
    PRICE_IN_LACS,
];

/// Columns present in the raw data that are intentionally discarded.
pub const DISCARDED_COLUMNS: [&str; 2] = [BHK_OR_RK, ADDRESS];

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("missing required column '{column}'")]
pub struct SchemaError {
    pub column: &'static str,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("line {line}: cannot parse column '{column}' value '{raw}' as {expected}")]
pub struct TypeCoercionError {
    pub column: &'static str,
    pub raw: String,
    /// Line in the input file (the header is line 1).
    pub line: u64,
    pub expected: &'static str,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum NormalizeError {
    #[display("{_0}")]
    Schema(SchemaError),
    #[display("{_0}")]
    TypeCoercion(TypeCoercionError),
}

/// Column positions of the required fields, resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    indices: [usize; REQUIRED_COLUMNS.len()],
}

impl Schema {
    /// Resolves the required columns against header names.
    ///
    /// Header names are trimmed before comparison. When a name occurs more
    /// than once the first occurrence wins.
    pub fn from_headers<I, S>(headers: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trimmed = headers
            .into_iter()
            .map(|h| h.as_ref().trim().to_owned())
            .collect::<Vec<_>>();
        let mut indices = [0; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = trimmed
                .iter()
                .position(|h| h == column)
                .ok_or(SchemaError { column })?;
        }
        Ok(Self { indices })
    }

    fn field<'r>(&self, record: &'r StringRecord, slot: usize) -> &'r str {
        // A short (flexible) record reads as an empty value and fails coercion.
        record.get(self.indices[slot]).unwrap_or("")
    }

    /// Normalizes one data row.
    ///
    /// `line` is reported in errors; pass the file line of the record.
    pub fn normalize(
        &self,
        record: &StringRecord,
        line: u64,
    ) -> Result<Listing, TypeCoercionError> {
        let cell = |slot: usize| RawCell {
            column: REQUIRED_COLUMNS[slot],
            raw: self.field(record, slot),
            line,
        };

        let posted_by = cell(0).parse_posted_by()?;
        let under_construction = cell(1).parse_bool()?;
        let has_regulatory_approval = cell(2).parse_bool()?;
        let bedroom_count = cell(3).parse_count()?;
        let area_sq_ft = cell(4).parse_positive()?;
        let ready_to_move = cell(5).parse_bool()?;
        let is_resale = cell(6).parse_bool()?;
        let longitude = cell(7).parse_finite()?;
        let latitude = cell(8).parse_finite()?;
        let price_lacs = cell(9).parse_positive()?;

        log::trace!("line {line}: normalized {posted_by} listing");

        Ok(Listing {
            posted_by,
            under_construction,
            has_regulatory_approval,
            bedroom_count,
            area_sq_ft,
            ready_to_move,
            is_resale,
            longitude,
            latitude,
            price_lacs,
        })
    }
}

/// Normalizes a header row and its data rows.
///
/// `records` yields `(line, record)` pairs. The first failure aborts.
pub fn normalize_records<'a, I>(
    headers: &StringRecord,
    records: I,
) -> Result<Vec<Listing>, NormalizeError>
where
    I: IntoIterator<Item = (u64, &'a StringRecord)>,
{
    let schema = Schema::from_headers(headers)?;
    let listings = records
        .into_iter()
        .map(|(line, record)| schema.normalize(record, line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(listings)
}

struct RawCell<'a> {
    column: &'static str,
    raw: &'a str,
    line: u64,
}

impl RawCell<'_> {
    fn error(&self, expected: &'static str) -> TypeCoercionError {
        TypeCoercionError {
            column: self.column,
            raw: self.raw.to_owned(),
            line: self.line,
            expected,
        }
    }

    fn parse_posted_by(&self) -> Result<PostedBy, TypeCoercionError> {
        PostedBy::from_label(self.raw)
            .ok_or_else(|| self.error("one of Builder, Dealer, Owner"))
    }

    /// `0` is false, any other finite number is true; `true`/`false` are
    /// accepted in any case.
    fn parse_bool(&self) -> Result<bool, TypeCoercionError> {
        let text = self.raw.trim();
        if text.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Ok(false);
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v != 0.0),
            _ => Err(self.error("boolean")),
        }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn parse_count(&self) -> Result<u32, TypeCoercionError> {
        let text = self.raw.trim();
        if let Ok(v) = text.parse::<u32>() {
            return Ok(v);
        }
        match text.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v) => Ok(v as u32),
            _ => Err(self.error("non-negative integer")),
        }
    }

    fn parse_finite(&self) -> Result<f64, TypeCoercionError> {
        match self.raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.error("float")),
        }
    }

    fn parse_positive(&self) -> Result<f64, TypeCoercionError> {
        match self.raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => Err(self.error("positive float")),
        }
    }
}
