use crate::config::UspsSettings;
use crate::core::http::UspsHttpClient;
use crate::core::request::{country_display_name, RequestBuilder};
use crate::core::splitter::{split_packages, ShipmentScope};
use crate::core::units::UnitConverter;
use crate::core::filter;
use crate::domain::model::{RateOptions, RateQuery, ShipmentEvent};
use crate::domain::ports::{MeasureService, RateProvider, ShipmentTracker};
use crate::utils::error::Result;
use async_trait::async_trait;

const TRACKING_PAGE_URL: &str = "https://tools.usps.com/go/TrackConfirmAction?tLabels=";

/// Shipments originating in these territories use the domestic RateV4 API.
const DOMESTIC_ORIGINS: [&str; 10] = [
    "USA", // United States
    "PRI", // Puerto Rico
    "UMI", // United States minor outlying islands
    "ASM", // American Samoa
    "GUM", // Guam
    "MHL", // Marshall Islands
    "FSM", // Micronesia
    "MNP", // Northern Mariana Islands
    "PLW", // Palau
    "VIR", // Virgin Islands (U.S.)
];

/// Orchestrates a rate or tracking lookup: convert units, split packages,
/// build the request document, call the carrier, parse and filter.
///
/// Stateless between calls; configuration is read-only, so concurrent
/// lookups need no synchronization. Transport and parse failures never
/// escape: they degrade to empty or error-list results.
pub struct UspsService {
    settings: UspsSettings,
    converter: UnitConverter,
    http: UspsHttpClient,
}

impl UspsService {
    pub fn new(settings: UspsSettings, measures: &dyn MeasureService) -> Result<Self> {
        settings.validate()?;
        let converter = UnitConverter::for_carrier(measures)?;
        let http = UspsHttpClient::new(&settings)?;

        Ok(Self {
            settings,
            converter,
            http,
        })
    }

    fn is_domestic(query: &RateQuery) -> bool {
        match &query.origin_country_code {
            Some(code) => DOMESTIC_ORIGINS.contains(&code.as_str()),
            None => true,
        }
    }

    async fn fetch_rates(&self, query: &RateQuery) -> Result<RateOptions> {
        let is_domestic = Self::is_domestic(query);

        let total_ounces = self.converter.convert_weight(query.weight, 1);
        let length = self.converter.convert_dimension(query.dimensions.length, 1);
        let width = self.converter.convert_dimension(query.dimensions.width, 1);
        let height = self.converter.convert_dimension(query.dimensions.height, 1);

        let scope = if is_domestic {
            ShipmentScope::Domestic
        } else {
            ShipmentScope::International
        };
        let packages = split_packages(scope, total_ounces, length, width, height);
        tracing::debug!(
            "Quoting {} package(s), {} oz total, domestic={}",
            packages.len(),
            total_ounces,
            is_domestic
        );

        let builder = RequestBuilder::new(&self.settings);
        let request_xml = if is_domestic {
            builder.domestic_rates(
                &packages,
                &query.origin_zip,
                &query.destination_zip,
                total_ounces,
            )?
        } else {
            let country = country_display_name(
                &query.destination_country.iso3,
                &query.destination_country.name,
            );
            builder.international_rates(&packages, query.subtotal(), country, &query.origin_zip)?
        };

        let response = self.http.get_rates(&request_xml, is_domestic).await?;
        Ok(filter::aggregate_options(&response, &self.settings))
    }
}

#[async_trait]
impl RateProvider for UspsService {
    async fn get_rates(&self, query: &RateQuery) -> RateOptions {
        match self.fetch_rates(query).await {
            Ok(options) => options,
            Err(error) => {
                let message =
                    format!("USPS service is currently unavailable, try again later. {error}");
                tracing::error!("{message}");
                RateOptions::from_errors(vec![message])
            }
        }
    }
}

#[async_trait]
impl ShipmentTracker for UspsService {
    async fn shipment_events(&self, tracking_number: &str) -> Vec<ShipmentEvent> {
        if tracking_number.trim().is_empty() {
            return Vec::new();
        }

        let request_xml = match RequestBuilder::new(&self.settings).tracking(tracking_number) {
            Ok(xml) => xml,
            Err(error) => {
                tracing::error!("Could not build USPS tracking request: {error}");
                return Vec::new();
            }
        };

        match self.http.get_track_events(&request_xml).await {
            Ok(Some(info)) => info
                .details
                .into_iter()
                .map(|detail| ShipmentEvent {
                    event: detail.event,
                    date: detail.date,
                    location: detail.city,
                    country: detail.country,
                })
                .collect(),
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::error!(
                    "Error while getting USPS shipment tracking info - {tracking_number}: {error}"
                );
                Vec::new()
            }
        }
    }

    fn tracking_url(&self, tracking_number: &str) -> String {
        format!("{TRACKING_PAGE_URL}{tracking_number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BoxDimensions, Country};
    use rust_decimal::Decimal;

    fn query(origin_country: Option<&str>) -> RateQuery {
        RateQuery {
            origin_zip: "10022".to_string(),
            destination_zip: "20008".to_string(),
            origin_country_code: origin_country.map(str::to_string),
            destination_country: Country {
                iso3: "USA".to_string(),
                name: "United States".to_string(),
            },
            items: Vec::new(),
            weight: Decimal::from(35),
            dimensions: BoxDimensions {
                length: Decimal::from(10),
                width: Decimal::from(8),
                height: Decimal::from(6),
            },
        }
    }

    #[test]
    fn us_territories_are_domestic_origins() {
        for code in ["USA", "PRI", "GUM", "VIR"] {
            assert!(UspsService::is_domestic(&query(Some(code))));
        }
        for code in ["CAN", "FRA", "JPN"] {
            assert!(!UspsService::is_domestic(&query(Some(code))));
        }
        assert!(UspsService::is_domestic(&query(None)));
    }
}
