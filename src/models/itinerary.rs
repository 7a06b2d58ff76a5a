use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::geo::Coordinates;

/// Closed set of itinerary line-item kinds. Adding a variant forces the cost
/// bucket match in `CostAggregator` to be updated.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Transport,
    Hotel,
    Food,
    HistoricalAttraction,
    HillyAttraction,
    EntertainmentAttraction,
    GenericAttraction,
}

impl EntryKind {
    pub fn is_attraction(&self) -> bool {
        matches!(
            self,
            EntryKind::HistoricalAttraction
                | EntryKind::HillyAttraction
                | EntryKind::EntertainmentAttraction
                | EntryKind::GenericAttraction
        )
    }
}

/// Informational only; never read by cost math.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryEntry {
    pub date: NaiveDate,
    /// 24h `HH:MM`.
    pub time: String,
    pub kind: EntryKind,
    pub place_name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub description: String,
    pub map_url: String,
    /// Party-wide cost.
    pub estimated_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<EntryDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_value(EntryKind::HistoricalAttraction).unwrap(),
            "historicalAttraction"
        );
        assert_eq!(serde_json::to_value(EntryKind::Food).unwrap(), "food");
        let kind: EntryKind = serde_json::from_value("genericAttraction".into()).unwrap();
        assert!(kind.is_attraction());
        assert!(!EntryKind::Hotel.is_attraction());
    }
}
