use serde::{Deserialize, Serialize};

use crate::models::geo::Coordinates;
use crate::models::itinerary::EntryKind;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttractionCategory {
    Historical,
    Hilly,
    Entertainment,
    Generic,
}

impl AttractionCategory {
    /// Classify from Google place types. The first recognised type wins.
    pub fn from_place_types(types: &[String]) -> Self {
        for place_type in types {
            match place_type.as_str() {
                "museum" | "church" | "mosque" | "hindu_temple" | "synagogue"
                | "place_of_worship" | "cemetery" | "library" => {
                    return AttractionCategory::Historical
                }
                "natural_feature" | "park" | "campground" | "rv_park" => {
                    return AttractionCategory::Hilly
                }
                "amusement_park" | "aquarium" | "zoo" | "bowling_alley" | "movie_theater"
                | "stadium" | "shopping_mall" | "night_club" | "casino" => {
                    return AttractionCategory::Entertainment
                }
                _ => {}
            }
        }
        AttractionCategory::Generic
    }

    pub fn entry_kind(&self) -> EntryKind {
        match self {
            AttractionCategory::Historical => EntryKind::HistoricalAttraction,
            AttractionCategory::Hilly => EntryKind::HillyAttraction,
            AttractionCategory::Entertainment => EntryKind::EntertainmentAttraction,
            AttractionCategory::Generic => EntryKind::GenericAttraction,
        }
    }

    /// Base per-person entry fee before the budget tier factor.
    pub fn base_entry_fee(&self) -> f64 {
        match self {
            AttractionCategory::Historical => 500.0,
            AttractionCategory::Hilly => 300.0,
            AttractionCategory::Entertainment => 1500.0,
            AttractionCategory::Generic => 200.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    const ROTATION: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// Round-robin tag for the restaurant at `index` in result order.
    pub fn for_index(index: usize) -> Self {
        Self::ROTATION[index % Self::ROTATION.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub description: String,
    pub category: AttractionCategory,
    /// Per person.
    pub entry_fee: f64,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    /// Per room.
    pub price_per_night: f64,
    pub rating: Option<f64>,
    pub contact: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    /// Per person, per meal.
    pub avg_cost: f64,
    pub meal_type: MealType,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
}
