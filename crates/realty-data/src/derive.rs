//! Feature derivation
//!
//! Turns a [`Listing`] into a [`DerivedListing`]: the area is converted to
//! square meters and the price from lakhs to the target currency, and the
//! raw area and price are dropped.

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, PostedBy};

/// Square feet per square meter.
pub const SQ_FT_PER_SQ_M: f64 = 10.764;
/// Currency units in one lakh.
pub const LACS_TO_UNIT_RATE: f64 = 100_000.0;
/// Source-currency units per target-currency unit.
pub const FX_RATE: f64 = 94.94;

/// Conversion constants applied by [`DerivedListing::from_listing`].
///
/// The defaults are the baseline policy values; they can be overridden from
/// a configuration file or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionRates {
    pub sq_ft_per_sq_m: f64,
    pub lacs_to_unit: f64,
    pub fx_rate: f64,
}

impl Default for ConversionRates {
    fn default() -> Self {
        Self {
            sq_ft_per_sq_m: SQ_FT_PER_SQ_M,
            lacs_to_unit: LACS_TO_UNIT_RATE,
            fx_rate: FX_RATE,
        }
    }
}

impl ConversionRates {
    #[must_use]
    pub fn area_sq_m(&self, area_sq_ft: f64) -> f64 {
        area_sq_ft / self.sq_ft_per_sq_m
    }

    #[must_use]
    pub fn price_target(&self, price_lacs: f64) -> f64 {
        (price_lacs * self.lacs_to_unit) / self.fx_rate
    }
}

/// A listing with derived area and price.
///
/// `area_sq_m > 0` and `price_target > 0` whenever the rates are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedListing {
    pub posted_by: PostedBy,
    pub under_construction: bool,
    pub has_regulatory_approval: bool,
    pub bedroom_count: u32,
    pub area_sq_m: f64,
    pub ready_to_move: bool,
    pub is_resale: bool,
    pub longitude: f64,
    pub latitude: f64,
    /// Price in the target currency.
    pub price_target: f64,
}

impl DerivedListing {
    #[must_use]
    pub fn from_listing(listing: &Listing, rates: &ConversionRates) -> Self {
        let Listing {
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
        } = *listing;
        Self {
            posted_by,
            under_construction,
            has_regulatory_approval,
            bedroom_count,
            area_sq_m: rates.area_sq_m(area_sq_ft),
            ready_to_move,
            is_resale,
            longitude,
            latitude,
            price_target: rates.price_target(price_lacs),
        }
    }

    /// Numeric value of a field; booleans map to `0.0`/`1.0`.
    #[must_use]
    pub fn value(&self, field: NumericField) -> f64 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match field {
            NumericField::UnderConstruction => flag(self.under_construction),
            NumericField::HasRegulatoryApproval => flag(self.has_regulatory_approval),
            NumericField::BedroomCount => f64::from(self.bedroom_count),
            NumericField::AreaSqM => self.area_sq_m,
            NumericField::ReadyToMove => flag(self.ready_to_move),
            NumericField::IsResale => flag(self.is_resale),
            NumericField::Longitude => self.longitude,
            NumericField::Latitude => self.latitude,
            NumericField::PriceTarget => self.price_target,
        }
    }
}

/// The numeric fields of a [`DerivedListing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    UnderConstruction,
    HasRegulatoryApproval,
    BedroomCount,
    AreaSqM,
    ReadyToMove,
    IsResale,
    Longitude,
    Latitude,
    PriceTarget,
}

impl NumericField {
    /// The model features, in model column order.
    pub const FEATURES: [Self; 8] = [
        Self::UnderConstruction,
        Self::HasRegulatoryApproval,
        Self::BedroomCount,
        Self::AreaSqM,
        Self::ReadyToMove,
        Self::IsResale,
        Self::Longitude,
        Self::Latitude,
    ];

    /// Every numeric field: the features followed by the target.
    pub const ALL: [Self; 9] = [
        Self::UnderConstruction,
        Self::HasRegulatoryApproval,
        Self::BedroomCount,
        Self::AreaSqM,
        Self::ReadyToMove,
        Self::IsResale,
        Self::Longitude,
        Self::Latitude,
        Self::PriceTarget,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnderConstruction => "under_construction",
            Self::HasRegulatoryApproval => "has_regulatory_approval",
            Self::BedroomCount => "bedroom_count",
            Self::AreaSqM => "area_sq_m",
            Self::ReadyToMove => "ready_to_move",
            Self::IsResale => "is_resale",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::PriceTarget => "price_target",
        }
    }
}
