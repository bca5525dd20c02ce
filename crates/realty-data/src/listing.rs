//! Typed listing records
//!
//! A [`Listing`] is the fixed-schema form of one raw dataset row, produced
//! by the [`normalize`](crate::normalize) module. Once created it is never
//! mutated; later stages build new values from it.

use serde::{Deserialize, Serialize};

/// Who posted a listing.
///
/// The declaration order is the category encoding order used when the
/// category becomes a model feature:
///
/// | Category  | Code |
/// |-----------|------|
/// | `Builder` | 0    |
/// | `Dealer`  | 1    |
/// | `Owner`   | 2    |
///
/// The table is lexical and independent of the order in which categories
/// appear in the data.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum PostedBy {
    Builder,
    Dealer,
    Owner,
}

impl PostedBy {
    pub const LEN: usize = 3;
    pub const ALL: [Self; Self::LEN] = [Self::Builder, Self::Dealer, Self::Owner];

    /// Parses the raw `POSTED_BY` label. Surrounding whitespace is ignored,
    /// case is significant.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Builder" => Some(Self::Builder),
            "Dealer" => Some(Self::Dealer),
            "Owner" => Some(Self::Owner),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Builder => "Builder",
            Self::Dealer => "Dealer",
            Self::Owner => "Owner",
        }
    }

    /// Stable integer code of this category.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Builder => 0,
            Self::Dealer => 1,
            Self::Owner => 2,
        }
    }
}

/// One normalized listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub posted_by: PostedBy,
    pub under_construction: bool,
    /// Registered with the real-estate regulatory authority (`RERA`).
    pub has_regulatory_approval: bool,
    pub bedroom_count: u32,
    /// Always `> 0`.
    pub area_sq_ft: f64,
    pub ready_to_move: bool,
    pub is_resale: bool,
    pub longitude: f64,
    pub latitude: f64,
    /// Asking price in lakhs. Always `> 0`.
    pub price_lacs: f64,
}
