use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::geo::Coordinates;

const DEFAULT_ORIGIN_CITY: &str = "Origin";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelerType {
    #[default]
    Solo,
    Couple,
    Family,
    Friends,
}

impl TravelerType {
    pub fn label(&self) -> &'static str {
        match self {
            TravelerType::Solo => "solo traveler",
            TravelerType::Couple => "couple",
            TravelerType::Family => "family",
            TravelerType::Friends => "group of friends",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Car,
    Bus,
    Train,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
        }
    }

    /// Road modes are costed by fuel, tolls and parking rather than tickets.
    pub fn is_road(&self) -> bool {
        matches!(self, TransportMode::Car)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Cheap,
    #[default]
    Moderate,
    Luxury,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Cheap => "cheap",
            BudgetTier::Moderate => "moderate",
            BudgetTier::Luxury => "luxury",
        }
    }

    /// Multiplier applied to every per-unit price estimate.
    pub fn price_factor(&self) -> f64 {
        match self {
            BudgetTier::Cheap => 0.5,
            BudgetTier::Moderate => 1.0,
            BudgetTier::Luxury => 2.5,
        }
    }

    /// Inclusive Google `price_level` range matching this tier.
    pub fn price_levels(&self) -> (u8, u8) {
        match self {
            BudgetTier::Cheap => (0, 1),
            BudgetTier::Moderate => (1, 3),
            BudgetTier::Luxury => (3, 4),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct CoordinatesInput {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl From<Coordinates> for CoordinatesInput {
    fn from(coords: Coordinates) -> Self {
        Self {
            lat: Some(coords.lat),
            lon: Some(coords.lon),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeInput {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub number_of_days: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OriginInput {
    pub city: Option<String>,
    pub coordinates: Option<CoordinatesInput>,
}

/// Trip request as it arrives from a caller. Every field may be absent;
/// `validate` turns it into a [`TripSpec`] or names the first bad field.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination_name: Option<String>,
    pub destination_coordinates: Option<CoordinatesInput>,
    pub date_range: Option<DateRangeInput>,
    pub party_size: Option<u32>,
    pub traveler_type: Option<TravelerType>,
    pub transport_mode: Option<TransportMode>,
    pub budget_tier: Option<BudgetTier>,
    pub origin: Option<OriginInput>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub number_of_days: u32,
}

impl DateRange {
    /// Calendar date of the 1-based trip day `day`.
    pub fn date_of_day(&self, day: u32) -> Option<NaiveDate> {
        self.start_date
            .checked_add_days(chrono::Days::new(u64::from(day.saturating_sub(1))))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Origin {
    pub city: String,
    pub coordinates: Coordinates,
}

/// A validated trip request with defaults applied to the optional fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripSpec {
    pub destination_name: String,
    pub destination_coordinates: Coordinates,
    pub date_range: DateRange,
    pub party_size: u32,
    pub traveler_type: TravelerType,
    pub transport_mode: TransportMode,
    pub budget_tier: BudgetTier,
    pub origin: Origin,
}

impl TripSpec {
    /// Rooms are shared two to a room.
    pub fn rooms_needed(&self) -> u32 {
        self.party_size.div_ceil(2)
    }

    pub fn nights(&self) -> u32 {
        self.date_range.number_of_days.saturating_sub(1)
    }
}

fn required_coordinates(
    input: Option<&CoordinatesInput>,
    field: &'static str,
) -> Result<Coordinates, ValidationError> {
    let input = input.ok_or_else(|| ValidationError::new(field, "coordinates are required"))?;
    let (lat, lon) = match (input.lat, input.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        (None, _) => return Err(ValidationError::new(field, "latitude is required")),
        (_, None) => return Err(ValidationError::new(field, "longitude is required")),
    };

    let coords = Coordinates::new(lat, lon);
    if !coords.is_valid() {
        return Err(ValidationError::new(
            field,
            format!("({}, {}) is not a valid latitude/longitude pair", lat, lon),
        ));
    }
    Ok(coords)
}

fn required_date_range(input: Option<&DateRangeInput>) -> Result<DateRange, ValidationError> {
    let input = input.ok_or_else(|| ValidationError::new("dateRange", "date range is required"))?;
    let start_date = input
        .start_date
        .ok_or_else(|| ValidationError::new("dateRange.startDate", "start date is required"))?;
    let end_date = input
        .end_date
        .ok_or_else(|| ValidationError::new("dateRange.endDate", "end date is required"))?;
    let number_of_days = input.number_of_days.ok_or_else(|| {
        ValidationError::new("dateRange.numberOfDays", "number of days is required")
    })?;

    if number_of_days < 1 {
        return Err(ValidationError::new(
            "dateRange.numberOfDays",
            "number of days must be at least 1",
        ));
    }
    if end_date < start_date {
        return Err(ValidationError::new(
            "dateRange.endDate",
            format!("end date {} is before start date {}", end_date, start_date),
        ));
    }

    let inclusive_days = (end_date - start_date).num_days() + 1;
    if i64::from(number_of_days) != inclusive_days {
        return Err(ValidationError::new(
            "dateRange.numberOfDays",
            format!(
                "{} does not match the {} days between {} and {}",
                number_of_days, inclusive_days, start_date, end_date
            ),
        ));
    }

    Ok(DateRange {
        start_date,
        end_date,
        number_of_days,
    })
}

impl TripRequest {
    /// Checks required fields in a fixed order and stops at the first failure.
    pub fn validate(&self) -> Result<TripSpec, ValidationError> {
        let destination_name = self
            .destination_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ValidationError::new("destinationName", "destination name is required"))?
            .to_string();

        let destination_coordinates =
            required_coordinates(self.destination_coordinates.as_ref(), "destinationCoordinates")?;

        let date_range = required_date_range(self.date_range.as_ref())?;

        let origin = self
            .origin
            .as_ref()
            .ok_or_else(|| ValidationError::new("origin", "origin is required"))?;
        let origin_coordinates =
            required_coordinates(origin.coordinates.as_ref(), "origin.coordinates")?;
        let origin_city = origin
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or(DEFAULT_ORIGIN_CITY)
            .to_string();

        let party_size = self.party_size.unwrap_or(1);
        if party_size < 1 {
            return Err(ValidationError::new("partySize", "party size must be at least 1"));
        }

        Ok(TripSpec {
            destination_name,
            destination_coordinates,
            date_range,
            party_size,
            traveler_type: self.traveler_type.unwrap_or_default(),
            transport_mode: self.transport_mode.unwrap_or_default(),
            budget_tier: self.budget_tier.unwrap_or_default(),
            origin: Origin {
                city: origin_city,
                coordinates: origin_coordinates,
            },
        })
    }
}
