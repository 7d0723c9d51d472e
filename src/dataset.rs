//! The canonical property feature schema and an in-memory dataset store
//!
//! The regression core consumes a plain feature matrix and target vector; this
//! module is the dataset provider that produces them. It defines the canonical
//! feature column order, the categorical code lookups, and [`PropertyStore`], a
//! caller-owned collection of property records with a soft-delete lifecycle.
//!
//! Column order is a contract: every consumer of the model must supply features
//! in exactly the order of [`FEATURE_LABELS`].

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Number of features in the canonical property schema.
pub const NUM_FEATURES: usize = 5;

/// Canonical feature column order for the property domain.
///
/// Every feature row is `[area_m2, rooms, age_years, zone_category, property_type]`,
/// in exactly this order.
pub const FEATURE_LABELS: [&str; NUM_FEATURES] =
    ["area_m2", "rooms", "age_years", "zone_category", "property_type"];

/// Location category of a property, coded 1-5 from most to least central.
///
/// The integer codes are what the regression consumes; the labels are display
/// metadata only and play no part in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Code 1 - city center, high demand
    Center,
    /// Code 2 - central area, excellent location
    Central,
    /// Code 3 - quiet residential neighborhood
    Residential,
    /// Code 4 - suburban area with green space
    Suburban,
    /// Code 5 - outskirts, affordable prices
    Outskirts,
}

impl Zone {
    /// The numeric code used in feature rows (1-5).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Center => 1,
            Self::Central => 2,
            Self::Residential => 3,
            Self::Suburban => 4,
            Self::Outskirts => 5,
        }
    }

    /// Human-readable display label for this zone.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Center => "Center - High demand",
            Self::Central => "Central Area - Excellent location",
            Self::Residential => "Residential Neighborhood - Quiet",
            Self::Suburban => "Suburban Area - Green spaces",
            Self::Outskirts => "Outskirts - Affordable prices",
        }
    }
}

impl TryFrom<u8> for Zone {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::Center),
            2 => Ok(Self::Central),
            3 => Ok(Self::Residential),
            4 => Ok(Self::Suburban),
            5 => Ok(Self::Outskirts),
            _ => Err(Error::InvalidCode {
                code,
                kind: "zone_category",
            }),
        }
    }
}

/// Kind of property, coded 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Code 1
    House,
    /// Code 2
    Apartment,
}

impl PropertyType {
    /// The numeric code used in feature rows (1 or 2).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::House => 1,
            Self::Apartment => 2,
        }
    }

    /// Human-readable display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
        }
    }
}

impl TryFrom<u8> for PropertyType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::House),
            2 => Ok(Self::Apartment),
            _ => Err(Error::InvalidCode {
                code,
                kind: "property_type",
            }),
        }
    }
}

/// A single property record.
///
/// Records are either `active` or soft-deleted; removal never destroys data,
/// it only flips the lifecycle flag, and all model-facing queries see active
/// records only.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Store-assigned identifier.
    pub id: u64,
    /// Covered area in square meters.
    pub area_m2: f64,
    /// Number of rooms.
    pub rooms: u32,
    /// Age of the building in years.
    pub age_years: u32,
    /// Location category.
    pub zone: Zone,
    /// House or apartment.
    pub property_type: PropertyType,
    /// Sale price in USD - the regression target.
    pub price_usd: f64,
    /// Lifecycle flag; soft-deleted records have `active = false`.
    pub active: bool,
}

impl Property {
    /// Produces this record's feature row in canonical column order.
    #[must_use]
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        [
            self.area_m2,
            f64::from(self.rooms),
            f64::from(self.age_years),
            f64::from(self.zone.code()),
            f64::from(self.property_type.code()),
        ]
    }
}

/// A single allow-listed field update for a stored property.
///
/// Updates are an enumerated set rather than name/value pairs, so an update
/// request can never name a field outside the allowed list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyUpdate {
    /// Change the covered area.
    AreaM2(f64),
    /// Change the room count.
    Rooms(u32),
    /// Change the building age.
    AgeYears(u32),
    /// Change the location category.
    Zone(Zone),
    /// Change the property kind.
    PropertyType(PropertyType),
    /// Change the sale price.
    PriceUsd(f64),
}

/// Summary statistics over the active records of a store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    /// Number of active properties.
    pub total_properties: usize,
    /// Mean sale price, USD.
    pub mean_price: f64,
    /// Lowest sale price, USD.
    pub min_price: f64,
    /// Highest sale price, USD.
    pub max_price: f64,
    /// Mean covered area, m².
    pub mean_area: f64,
    /// Mean room count.
    pub mean_rooms: f64,
    /// Mean building age, years.
    pub mean_age: f64,
}

/// Caller-owned, in-memory collection of property records.
///
/// This is the dataset provider for the regression core: it owns the records,
/// enforces the soft-delete lifecycle, and produces the aligned feature matrix
/// and target vector that [`crate::Regressor::fit`] consumes.
///
/// There is no global registry - construct as many independent stores as you
/// need and hand their matrices to as many regressors as you like.
///
/// # Example
/// ```
/// use pricefit::dataset::{Property, PropertyStore, PropertyUpdate, PropertyType, Zone};
///
/// let mut store = PropertyStore::new();
/// let id = store.add(Property {
///     id: 0, // assigned by the store
///     area_m2: 120.0,
///     rooms: 3,
///     age_years: 10,
///     zone: Zone::Central,
///     property_type: PropertyType::House,
///     price_usd: 350_000.0,
///     active: true,
/// });
///
/// store.update(id, &[PropertyUpdate::PriceUsd(365_000.0)]).unwrap();
/// assert_eq!(store.len(), 1);
///
/// store.remove(id).unwrap(); // soft delete
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    records: Vec<Property>,
    next_id: u64,
}

impl PropertyStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a store pre-populated with the 30-row example dataset
    /// (Córdoba property listings) used by the original demo.
    #[must_use]
    pub fn sample() -> Self {
        #[rustfmt::skip]
        const ROWS: [(f64, u32, u32, u8, u8, f64); 30] = [
            (85.0,  2, 5,  1, 2, 320_000.0),
            (220.0, 4, 2,  1, 1, 850_000.0),
            (180.0, 3, 8,  2, 1, 580_000.0),
            (150.0, 3, 12, 2, 1, 420_000.0),
            (120.0, 3, 15, 3, 1, 350_000.0),
            (95.0,  2, 20, 3, 1, 220_000.0),
            (250.0, 4, 3,  1, 1, 950_000.0),
            (70.0,  1, 3,  1, 2, 250_000.0),
            (200.0, 3, 10, 2, 1, 520_000.0),
            (130.0, 3, 18, 3, 1, 380_000.0),
            (140.0, 3, 8,  4, 1, 320_000.0),
            (160.0, 3, 5,  4, 1, 340_000.0),
            (90.0,  2, 25, 5, 1, 180_000.0),
            (300.0, 5, 1,  1, 1, 1_200_000.0),
            (120.0, 2, 6,  1, 2, 280_000.0),
            (180.0, 3, 7,  2, 1, 450_000.0),
            (150.0, 3, 9,  3, 1, 380_000.0),
            (110.0, 2, 22, 5, 1, 240_000.0),
            (100.0, 2, 20, 5, 1, 210_000.0),
            (125.0, 3, 28, 5, 1, 260_000.0),
            (280.0, 4, 4,  2, 1, 620_000.0),
            (200.0, 3, 6,  3, 1, 440_000.0),
            (170.0, 3, 11, 4, 1, 360_000.0),
            (140.0, 2, 16, 4, 2, 290_000.0),
            (190.0, 3, 8,  2, 1, 480_000.0),
            (160.0, 3, 12, 3, 1, 400_000.0),
            (135.0, 3, 14, 4, 1, 330_000.0),
            (115.0, 2, 19, 5, 1, 250_000.0),
            (155.0, 3, 13, 3, 1, 410_000.0),
            (175.0, 3, 10, 2, 1, 470_000.0),
        ];

        let mut store = Self::new();
        for (area_m2, rooms, age_years, zone, property_type, price_usd) in ROWS {
            store.add(Property {
                id: 0,
                area_m2,
                rooms,
                age_years,
                zone: Zone::try_from(zone).expect("sample zone codes are 1-5"),
                property_type: PropertyType::try_from(property_type)
                    .expect("sample type codes are 1-2"),
                price_usd,
                active: true,
            });
        }
        store
    }

    /// Adds a property and returns its assigned id.
    ///
    /// The `id` and `active` fields of the input are overwritten: the store
    /// assigns ids, and new records always start active.
    pub fn add(&mut self, mut property: Property) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        property.id = id;
        property.active = true;
        self.records.push(property);
        id
    }

    /// Returns the active property with the given id, if any.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Property> {
        self.records.iter().find(|p| p.id == id && p.active)
    }

    /// Applies a batch of allow-listed updates to an active property.
    ///
    /// # Errors
    /// - [`Error::UnknownRecord`]: no active property has the given id.
    pub fn update(&mut self, id: u64, updates: &[PropertyUpdate]) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|p| p.id == id && p.active)
            .ok_or(Error::UnknownRecord(id))?;

        for update in updates {
            match *update {
                PropertyUpdate::AreaM2(v) => record.area_m2 = v,
                PropertyUpdate::Rooms(v) => record.rooms = v,
                PropertyUpdate::AgeYears(v) => record.age_years = v,
                PropertyUpdate::Zone(v) => record.zone = v,
                PropertyUpdate::PropertyType(v) => record.property_type = v,
                PropertyUpdate::PriceUsd(v) => record.price_usd = v,
            }
        }
        Ok(())
    }

    /// Soft-deletes a property: the record stays in the store but becomes
    /// invisible to every model-facing query.
    ///
    /// # Errors
    /// - [`Error::UnknownRecord`]: no active property has the given id.
    pub fn remove(&mut self, id: u64) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|p| p.id == id && p.active)
            .ok_or(Error::UnknownRecord(id))?;
        record.active = false;
        Ok(())
    }

    /// Iterates over the active records.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.records.iter().filter(|p| p.active)
    }

    /// Number of active records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when the store has no active records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produces the aligned `(X, Y)` training pair from the active records.
    ///
    /// X is `n × 5` with columns in canonical order; `Y[i]` is the price of
    /// row `i`.
    ///
    /// # Errors
    /// - [`Error::NoData`]: the store has no active records.
    pub fn training_matrices(&self) -> Result<(DMatrix<f64>, DVector<f64>)> {
        let active: Vec<&Property> = self.iter().collect();
        if active.is_empty() {
            return Err(Error::NoData);
        }

        let x = DMatrix::from_fn(active.len(), NUM_FEATURES, |r, c| active[r].features()[c]);
        let y = DVector::from_iterator(active.len(), active.iter().map(|p| p.price_usd));
        Ok((x, y))
    }

    /// Computes summary statistics over the active records.
    ///
    /// # Errors
    /// - [`Error::NoData`]: the store has no active records.
    pub fn stats(&self) -> Result<DatasetStats> {
        let active: Vec<&Property> = self.iter().collect();
        if active.is_empty() {
            return Err(Error::NoData);
        }

        let n = active.len() as f64;
        let mut stats = DatasetStats {
            total_properties: active.len(),
            mean_price: 0.0,
            min_price: f64::INFINITY,
            max_price: f64::NEG_INFINITY,
            mean_area: 0.0,
            mean_rooms: 0.0,
            mean_age: 0.0,
        };

        for p in active {
            stats.mean_price += p.price_usd;
            stats.mean_area += p.area_m2;
            stats.mean_rooms += f64::from(p.rooms);
            stats.mean_age += f64::from(p.age_years);
            stats.min_price = stats.min_price.min(p.price_usd);
            stats.max_price = stats.max_price.max(p.price_usd);
        }
        stats.mean_price /= n;
        stats.mean_area /= n;
        stats.mean_rooms /= n;
        stats.mean_age /= n;

        Ok(stats)
    }
}

/// Checks user-supplied numeric features against the domain's sane ranges.
///
/// Returns one message per violated rule, or an empty vector when the input is
/// acceptable. Zone and property-type validity need no checking here - the
/// [`Zone`] and [`PropertyType`] enums make invalid codes unrepresentable.
///
/// # Example
/// ```rust
/// let problems = pricefit::dataset::validate_input(0.0, 3, 10);
/// assert_eq!(problems.len(), 1); // zero area
/// ```
#[must_use]
pub fn validate_input(area_m2: f64, rooms: u32, age_years: u32) -> Vec<&'static str> {
    let mut problems = Vec::new();

    if area_m2 <= 0.0 || area_m2 > 1000.0 {
        problems.push("Area must be between 1 and 1000 m²");
    }
    if rooms == 0 || rooms > 10 {
        problems.push("Rooms must be between 1 and 10");
    }
    if age_years > 100 {
        problems.push("Age must be between 0 and 100 years");
    }

    problems
}
