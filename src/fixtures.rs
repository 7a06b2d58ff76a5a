//! A fixed demo plan served by `GET /api/tour-plans/sample` and used in tests.
//! Plan generation never falls back to it.

use chrono::{Days, NaiveDate};

use crate::models::{
    geo::Coordinates,
    itinerary::{EntryDetails, EntryKind, ItineraryEntry},
    tour_plan::{DestinationMeta, Tip, TourPlan},
    trip_request::{BudgetTier, DateRange, Origin, TransportMode, TravelerType, TripSpec},
    weather::{DailyForecast, Forecast},
};
use crate::services::cost_aggregator::CostAggregator;

const ISLAMABAD: Coordinates = Coordinates {
    lat: 33.6844,
    lon: 73.0479,
};
const MURREE: Coordinates = Coordinates {
    lat: 33.9070,
    lon: 73.3943,
};

struct Stop {
    name: &'static str,
    address: &'static str,
    coordinates: Coordinates,
}

const PEARL_CONTINENTAL: Stop = Stop {
    name: "Pearl Continental Bhurban",
    address: "Bhurban, Murree",
    coordinates: Coordinates {
        lat: 33.9606,
        lon: 73.4522,
    },
};
const CAFE_DE_PARIS: Stop = Stop {
    name: "Cafe de Paris",
    address: "Mall Road, Murree",
    coordinates: Coordinates {
        lat: 33.9078,
        lon: 73.3925,
    },
};
const LINTOTT: Stop = Stop {
    name: "Lintott's Cafe",
    address: "Mall Road, Murree",
    coordinates: Coordinates {
        lat: 33.9072,
        lon: 73.3931,
    },
};
const PATRIATA: Stop = Stop {
    name: "Patriata Chair Lift",
    address: "New Murree",
    coordinates: Coordinates {
        lat: 33.8510,
        lon: 73.4688,
    },
};
const KASHMIR_POINT: Stop = Stop {
    name: "Kashmir Point",
    address: "Kashmir Point Road, Murree",
    coordinates: Coordinates {
        lat: 33.9187,
        lon: 73.3966,
    },
};
const CHURCH: Stop = Stop {
    name: "Holy Trinity Church",
    address: "Mall Road, Murree",
    coordinates: Coordinates {
        lat: 33.9066,
        lon: 73.3929,
    },
};

fn fixture_entry(
    date: NaiveDate,
    time: &str,
    kind: EntryKind,
    stop: &Stop,
    description: &str,
    estimated_cost: f64,
) -> ItineraryEntry {
    ItineraryEntry {
        date,
        time: time.to_string(),
        kind,
        place_name: stop.name.to_string(),
        address: stop.address.to_string(),
        coordinates: stop.coordinates,
        description: description.to_string(),
        map_url: stop.coordinates.map_url(),
        estimated_cost,
        details: None,
    }
}

/// Three days in Murree for a couple driving up from Islamabad.
pub fn sample_tour_plan() -> TourPlan {
    let day1 = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default();
    let day2 = day1 + Days::new(1);
    let day3 = day1 + Days::new(2);

    let outbound = Stop {
        name: "Islamabad to Murree",
        address: "Murree",
        coordinates: MURREE,
    };
    let home = Stop {
        name: "Murree to Islamabad",
        address: "Islamabad",
        coordinates: ISLAMABAD,
    };

    let mut check_in = fixture_entry(
        day1,
        "14:00",
        EntryKind::Hotel,
        &PEARL_CONTINENTAL,
        "Check in at Pearl Continental Bhurban: 1 room(s) for 2 night(s)",
        12000.0,
    );
    check_in.details = Some(EntryDetails {
        rating: Some(4.4),
        contact: Some("+92 51 3355700".to_string()),
        amenities: vec!["lodging".to_string(), "spa".to_string()],
    });

    let itinerary = vec![
        fixture_entry(
            day1,
            "08:00",
            EntryKind::Transport,
            &outbound,
            "Travel by car from Islamabad to Murree (62 km)",
            2494.0,
        ),
        check_in,
        fixture_entry(day1, "08:00", EntryKind::Food, &CAFE_DE_PARIS, "Breakfast at Cafe de Paris", 2000.0),
        fixture_entry(
            day1,
            "10:00",
            EntryKind::HillyAttraction,
            &PATRIATA,
            "Explore Patriata Chair Lift (park)",
            600.0,
        ),
        fixture_entry(day1, "13:00", EntryKind::Food, &LINTOTT, "Lunch at Lintott's Cafe", 2000.0),
        fixture_entry(day1, "19:00", EntryKind::Food, &CAFE_DE_PARIS, "Dinner at Cafe de Paris", 2000.0),
        fixture_entry(
            day1,
            "22:00",
            EntryKind::Hotel,
            &PEARL_CONTINENTAL,
            "Return to Pearl Continental Bhurban for the night",
            0.0,
        ),
        fixture_entry(day2, "08:00", EntryKind::Food, &CAFE_DE_PARIS, "Breakfast at Cafe de Paris", 2000.0),
        fixture_entry(
            day2,
            "10:00",
            EntryKind::HillyAttraction,
            &KASHMIR_POINT,
            "Explore Kashmir Point (natural feature)",
            600.0,
        ),
        fixture_entry(day2, "13:00", EntryKind::Food, &LINTOTT, "Lunch at Lintott's Cafe", 2000.0),
        fixture_entry(day2, "19:00", EntryKind::Food, &CAFE_DE_PARIS, "Dinner at Cafe de Paris", 2000.0),
        fixture_entry(
            day2,
            "22:00",
            EntryKind::Hotel,
            &PEARL_CONTINENTAL,
            "Return to Pearl Continental Bhurban for the night",
            0.0,
        ),
        fixture_entry(day3, "08:00", EntryKind::Food, &CAFE_DE_PARIS, "Breakfast at Cafe de Paris", 2000.0),
        fixture_entry(
            day3,
            "10:00",
            EntryKind::HistoricalAttraction,
            &CHURCH,
            "Explore Holy Trinity Church (church)",
            1000.0,
        ),
        fixture_entry(day3, "13:00", EntryKind::Food, &LINTOTT, "Lunch at Lintott's Cafe", 2000.0),
        fixture_entry(day3, "19:00", EntryKind::Food, &CAFE_DE_PARIS, "Dinner at Cafe de Paris", 2000.0),
        fixture_entry(
            day3,
            "16:00",
            EntryKind::Transport,
            &home,
            "Return by car from Murree to Islamabad (62 km)",
            2494.0,
        ),
    ];

    let cost_summary = CostAggregator::aggregate(&itinerary);

    let days: Vec<DailyForecast> = [(day1, 14.0, 22.0, "Clear"), (day2, 13.0, 20.0, "Clouds"), (day3, 12.0, 19.0, "Rain")]
        .into_iter()
        .map(|(date, min_temp_c, max_temp_c, condition)| DailyForecast {
            date,
            min_temp_c,
            max_temp_c,
            condition: condition.to_string(),
            humidity: Some(55.0),
        })
        .collect();

    TourPlan {
        trip_request: TripSpec {
            destination_name: "Murree".to_string(),
            destination_coordinates: MURREE,
            date_range: DateRange {
                start_date: day1,
                end_date: day3,
                number_of_days: 3,
            },
            party_size: 2,
            traveler_type: TravelerType::Couple,
            transport_mode: TransportMode::Car,
            budget_tier: BudgetTier::Moderate,
            origin: Origin {
                city: "Islamabad".to_string(),
                coordinates: ISLAMABAD,
            },
        },
        itinerary,
        cost_summary,
        tips: vec![
            Tip::new(
                "Avoid weekend traffic",
                "Mall Road fills up on Saturdays; leave Islamabad before 7am.",
            ),
            Tip::new(
                "Pack a warm layer",
                "Evenings in the hills are cool even in June.",
            ),
            Tip::new(
                "Ride the chair lift early",
                "Queues at Patriata are shortest right after opening.",
            ),
        ],
        weather: Forecast::from_days(days),
        destination_meta: DestinationMeta {
            name: "Murree".to_string(),
            coordinates: MURREE,
            map_url: MURREE.map_url(),
            distance_from_origin_km: 62.0,
            hotel_options: 1,
            restaurant_options: 2,
            attraction_options: 3,
        },
    }
}
