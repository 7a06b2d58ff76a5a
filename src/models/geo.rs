use serde::{Deserialize, Serialize};
use url::Url;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// `lat,lng` pair as the Google APIs expect it.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }

    pub fn map_url(&self) -> String {
        match Url::parse_with_params(
            MAPS_SEARCH_URL,
            &[("api", "1".to_string()), ("query", self.as_query())],
        ) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}?api=1&query={}", MAPS_SEARCH_URL, self.as_query()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinates::new(33.6844, 73.0479).is_valid());
        assert!(!Coordinates::new(f64::NAN, 73.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_map_url_contains_query() {
        let url = Coordinates::new(35.9, 74.3).map_url();
        assert!(url.starts_with("https://www.google.com/maps/search/?api=1"));
        assert!(url.contains("query=35.9%2C74.3"));
    }
}
