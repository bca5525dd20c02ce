use std::{
    collections::BTreeMap,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    derive::{ConversionRates, DerivedListing, NumericField},
    listing::{Listing, PostedBy},
    normalize::NormalizeError,
    raw::RawTable,
};

/// Failure to load listings. `path` names the input file, if there is one.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to read CSV input{}: {source}", in_file(path.as_deref()))]
    Csv {
        path: Option<PathBuf>,
        source: csv::Error,
    },
    #[display("failed to normalize input{}: {source}", in_file(path.as_deref()))]
    Normalize {
        path: Option<PathBuf>,
        source: NormalizeError,
    },
}

fn in_file(path: Option<&Path>) -> String {
    path.map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl LoadError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. } => Some(path),
            Self::Csv { path, .. } | Self::Normalize { path, .. } => path.as_deref(),
        }
    }

    fn with_path(self, file: &Path) -> Self {
        let path = Some(file.to_owned());
        match self {
            Self::Csv { source, .. } => Self::Csv { path, source },
            Self::Normalize { source, .. } => Self::Normalize { path, source },
            open @ Self::Open { .. } => open,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { path: None, source }
    }
}

impl From<NormalizeError> for LoadError {
    fn from(source: NormalizeError) -> Self {
        Self::Normalize { path: None, source }
    }
}

/// An ordered sequence of derived listings.
///
/// Insertion order is the source row order; duplicates are kept. A dataset
/// is never modified in place: filtering and segmentation produce new
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    listings: Vec<DerivedListing>,
}

impl Dataset {
    #[must_use]
    pub fn new(listings: Vec<DerivedListing>) -> Self {
        Self { listings }
    }

    #[must_use]
    pub fn from_listings(listings: &[Listing], rates: &ConversionRates) -> Self {
        listings
            .iter()
            .map(|listing| DerivedListing::from_listing(listing, rates))
            .collect()
    }

    /// Normalizes and derives every row of a raw table.
    pub fn from_table(table: &RawTable, rates: &ConversionRates) -> Result<Self, NormalizeError> {
        let listings = table.normalize()?;
        Ok(Self::from_listings(&listings, rates))
    }

    pub fn from_reader<R>(reader: R, rates: &ConversionRates) -> Result<Self, LoadError>
    where
        R: io::Read,
    {
        let table = RawTable::from_reader(reader)?;
        Ok(Self::from_table(&table, rates)?)
    }

    pub fn from_path<P>(path: P, rates: &ConversionRates) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_owned(),
            source,
        })?;
        let dataset =
            Self::from_reader(io::BufReader::new(file), rates).map_err(|e| e.with_path(path))?;
        log::info!("loaded {} listings from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DerivedListing> {
        self.listings.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[DerivedListing] {
        &self.listings
    }

    /// Values of one numeric field, in row order.
    #[must_use]
    pub fn column(&self, field: NumericField) -> Vec<f64> {
        self.iter().map(|listing| listing.value(field)).collect()
    }

    /// Target prices, in row order.
    #[must_use]
    pub fn targets(&self) -> Vec<f64> {
        self.column(NumericField::PriceTarget)
    }

    /// Listings posted by `category`, in row order.
    #[must_use]
    pub fn posted_by(&self, category: PostedBy) -> Self {
        self.iter()
            .filter(|listing| listing.posted_by == category)
            .cloned()
            .collect()
    }

    /// Number of listings per category. Every category is present, possibly
    /// with a zero count.
    #[must_use]
    pub fn count_by_category(&self) -> BTreeMap<PostedBy, usize> {
        let mut counts = PostedBy::ALL
            .map(|category| (category, 0))
            .into_iter()
            .collect::<BTreeMap<_, _>>();
        for listing in self {
            *counts.entry(listing.posted_by).or_default() += 1;
        }
        counts
    }
}

impl FromIterator<DerivedListing> for Dataset {
    fn from_iter<I: IntoIterator<Item = DerivedListing>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DerivedListing;
    type IntoIter = std::slice::Iter<'a, DerivedListing>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
