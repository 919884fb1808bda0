use crate::domain::model::{RateOptions, RateQuery, ShipmentEvent};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Measurement-unit lookup supplied by the host system.
///
/// A ratio multiplies a value in the host's primary unit into the named
/// carrier unit. `None` means the unit is not configured, which the unit
/// converter surfaces as a fatal configuration error.
pub trait MeasureService: Send + Sync {
    fn weight_ratio(&self, unit: &str) -> Option<Decimal>;
    fn dimension_ratio(&self, unit: &str) -> Option<Decimal>;
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn get_rates(&self, query: &RateQuery) -> RateOptions;
}

#[async_trait]
pub trait ShipmentTracker: Send + Sync {
    async fn shipment_events(&self, tracking_number: &str) -> Vec<ShipmentEvent>;

    /// Third-party tracking page for human display; never parsed here.
    fn tracking_url(&self, tracking_number: &str) -> String;
}
