use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::TransportError;
use crate::models::{geo::Coordinates, trip_request::TransportMode};
use crate::services::interfaces::GeoDistanceService;

const FUEL_PRICE_PER_LITER: f64 = 280.0;
const CAR_KM_PER_LITER: f64 = 10.0;
const TOLL_PER_100_KM: f64 = 200.0;
const MAINTENANCE_PER_1000_KM: f64 = 500.0;
const PARKING_FEE: f64 = 200.0;
const TICKET_PER_100_KM: f64 = 500.0;

/// Cost of one leg. Road-mode components are zero for public transport and
/// `ticket_price_per_person` is zero for road modes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransportEstimate {
    pub mode: TransportMode,
    pub distance_km: f64,
    pub fuel_cost: f64,
    pub toll_fees: f64,
    pub maintenance_cost: f64,
    pub parking_fees: f64,
    pub ticket_price_per_person: f64,
    pub total_cost: f64,
}

impl TransportEstimate {
    pub fn for_distance(distance_km: f64, mode: TransportMode, party_size: u32) -> Self {
        let party = f64::from(party_size);

        if mode.is_road() {
            let fuel_cost = distance_km * FUEL_PRICE_PER_LITER / CAR_KM_PER_LITER;
            let toll_fees = (distance_km / 100.0).ceil() * TOLL_PER_100_KM;
            let maintenance_cost = (distance_km / 1000.0).ceil() * MAINTENANCE_PER_1000_KM;
            let parking_fees = PARKING_FEE * if party_size > 2 { 2.0 } else { 1.0 };

            Self {
                mode,
                distance_km,
                fuel_cost,
                toll_fees,
                maintenance_cost,
                parking_fees,
                ticket_price_per_person: 0.0,
                total_cost: fuel_cost + toll_fees + maintenance_cost + parking_fees,
            }
        } else {
            let ticket_price_per_person = (distance_km / 100.0).ceil() * TICKET_PER_100_KM;

            Self {
                mode,
                distance_km,
                fuel_cost: 0.0,
                toll_fees: 0.0,
                maintenance_cost: 0.0,
                parking_fees: 0.0,
                ticket_price_per_person,
                total_cost: ticket_price_per_person * party,
            }
        }
    }
}

pub struct TransportCostEstimator {
    distance_service: Arc<dyn GeoDistanceService>,
}

impl TransportCostEstimator {
    pub fn new(distance_service: Arc<dyn GeoDistanceService>) -> Self {
        Self { distance_service }
    }

    /// Estimate one leg between `origin` and `destination`. Fails when the
    /// distance cannot be looked up or is not positive.
    pub async fn estimate(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TransportMode,
        party_size: u32,
    ) -> Result<TransportEstimate, TransportError> {
        let distance_km = self
            .distance_service
            .distance_km(origin, destination)
            .await
            .map_err(|e| {
                warn!("Distance lookup failed: {}", e);
                TransportError::DistanceLookup(e.to_string())
            })?;

        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(TransportError::InvalidDistance(distance_km));
        }

        let estimate = TransportEstimate::for_distance(distance_km, mode, party_size);
        debug!(
            "Transport estimate: {:.1} km by {} for {} traveler(s) = {:.2}",
            distance_km,
            mode.as_str(),
            party_size,
            estimate.total_cost
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use async_trait::async_trait;

    struct FixedDistance(Option<f64>);

    #[async_trait]
    impl GeoDistanceService for FixedDistance {
        async fn distance_km(&self, _: Coordinates, _: Coordinates) -> Result<f64, ServiceError> {
            self.0
                .ok_or_else(|| ServiceError::Api("NOT_FOUND".to_string()))
        }
    }

    fn estimator(distance: Option<f64>) -> TransportCostEstimator {
        TransportCostEstimator::new(Arc::new(FixedDistance(distance)))
    }

    fn points() -> (Coordinates, Coordinates) {
        (Coordinates::new(33.68, 73.04), Coordinates::new(35.92, 74.31))
    }

    #[test]
    fn test_car_leg_for_party_of_four() {
        let estimate = TransportEstimate::for_distance(300.0, TransportMode::Car, 4);
        assert_eq!(estimate.fuel_cost, 8400.0);
        assert_eq!(estimate.toll_fees, 600.0);
        assert_eq!(estimate.maintenance_cost, 500.0);
        assert_eq!(estimate.parking_fees, 400.0);
        assert_eq!(estimate.total_cost, 9900.0);
    }

    #[test]
    fn test_small_party_parks_one_car() {
        let estimate = TransportEstimate::for_distance(300.0, TransportMode::Car, 2);
        assert_eq!(estimate.parking_fees, 200.0);
        assert_eq!(estimate.total_cost, 9700.0);
    }

    #[test]
    fn test_public_transport_is_per_ticket() {
        let bus = TransportEstimate::for_distance(250.0, TransportMode::Bus, 3);
        assert_eq!(bus.ticket_price_per_person, 1500.0);
        assert_eq!(bus.total_cost, 4500.0);
        assert_eq!(bus.fuel_cost, 0.0);

        let train = TransportEstimate::for_distance(100.0, TransportMode::Train, 1);
        assert_eq!(train.total_cost, 500.0);
    }

    #[test]
    fn test_estimate_uses_looked_up_distance() {
        let (origin, destination) = points();
        let estimate = tokio_test::block_on(estimator(Some(300.0)).estimate(
            origin,
            destination,
            TransportMode::Car,
            4,
        ))
        .unwrap();
        assert_eq!(estimate.distance_km, 300.0);
        assert_eq!(estimate.total_cost, 9900.0);
    }

    #[test]
    fn test_lookup_failure_is_transport_error() {
        let (origin, destination) = points();
        let err = tokio_test::block_on(estimator(None).estimate(
            origin,
            destination,
            TransportMode::Bus,
            1,
        ))
        .unwrap_err();
        assert!(matches!(err, TransportError::DistanceLookup(ref msg) if msg.contains("NOT_FOUND")));
    }

    #[test]
    fn test_non_positive_distance_rejected() {
        let (origin, destination) = points();
        for distance in [0.0, -12.0, f64::NAN] {
            let err = tokio_test::block_on(estimator(Some(distance)).estimate(
                origin,
                destination,
                TransportMode::Car,
                1,
            ))
            .unwrap_err();
            assert!(matches!(err, TransportError::InvalidDistance(_)));
        }
    }
}
