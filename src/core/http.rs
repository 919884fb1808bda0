use crate::config::UspsSettings;
use crate::core::response;
use crate::domain::model::{RateResponseSet, TrackInfo};
use crate::utils::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;

const RATES_API_DOMESTIC: &str = "RateV4";
const RATES_API_INTERNATIONAL: &str = "IntlRateV2";
const TRACK_API: &str = "TrackV2";

const USER_AGENT: &str = concat!("usps-rates/", env!("CARGO_PKG_VERSION"));

/// Thin client for the USPS Web Tools endpoint. Every API rides the same
/// GET with the request document in the `XML` query parameter.
pub struct UspsHttpClient {
    client: Client,
    base_url: String,
}

impl UspsHttpClient {
    pub fn new(settings: &UspsSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));

        let client = Client::builder()
            .timeout(settings.client_timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.clone(),
        })
    }

    pub async fn get_rates(&self, request_xml: &str, is_domestic: bool) -> Result<RateResponseSet> {
        let api = if is_domestic {
            RATES_API_DOMESTIC
        } else {
            RATES_API_INTERNATIONAL
        };
        let body = self.get(api, request_xml).await?;
        Ok(response::parse_rate_response(&body, is_domestic))
    }

    pub async fn get_track_events(&self, request_xml: &str) -> Result<Option<TrackInfo>> {
        let body = self.get(TRACK_API, request_xml).await?;
        Ok(response::parse_track_response(&body))
    }

    async fn get(&self, api: &str, request_xml: &str) -> Result<String> {
        tracing::debug!("USPS {} request to {}", api, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("API", api), ("XML", request_xml)])
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("USPS {} response status: {}", api, response.status());
        Ok(response.text().await?)
    }
}
