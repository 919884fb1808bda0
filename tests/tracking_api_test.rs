use chrono::NaiveDate;
use httpmock::prelude::*;
use rust_decimal::Decimal;
use usps_rates::{
    CarrierNativeMeasures, ServiceAllowList, ShipmentTracker, UspsService, UspsSettings,
};

fn service(url: String) -> UspsService {
    let settings = UspsSettings {
        url,
        username: "123USERID".to_string(),
        password: "secret".to_string(),
        additional_handling_charge: Decimal::ZERO,
        carrier_services_domestic: ServiceAllowList::default(),
        carrier_services_international: ServiceAllowList::default(),
        client_timeout_secs: 5,
    };
    UspsService::new(settings, &CarrierNativeMeasures).unwrap()
}

const TRACK_BODY: &str = r#"<TrackResponse>
    <TrackInfo ID="EJ958083578US">
        <TrackSummary>
            <Event>DELIVERED</Event>
            <EventCity>NEWTON</EventCity>
            <EventState>IA</EventState>
            <EventZIPCode>50208</EventZIPCode>
            <EventCountry>US</EventCountry>
            <EventDate>May 10, 2024</EventDate>
        </TrackSummary>
        <TrackDetail>
            <Event>ARRIVAL AT UNIT</Event>
            <EventCity>NEWTON</EventCity>
            <EventState>IA</EventState>
            <EventCountry>US</EventCountry>
            <EventDate>May 09, 2024</EventDate>
        </TrackDetail>
        <TrackDetail>
            <Event>ACCEPTANCE</Event>
            <EventCity>DES MOINES</EventCity>
            <EventState>IA</EventState>
            <EventCountry>US</EventCountry>
            <EventDate>May 08, 2024</EventDate>
        </TrackDetail>
    </TrackInfo>
</TrackResponse>"#;

#[tokio::test]
async fn tracking_events_come_from_the_detail_entries() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/")
            .query_param("API", "TrackV2")
            .query_param_exists("XML");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(TRACK_BODY);
    });

    let service = service(server.url("/"));
    let events = service.shipment_events("EJ958083578US").await;

    api_mock.assert();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "ARRIVAL AT UNIT");
    assert_eq!(events[0].location, "NEWTON");
    assert_eq!(events[0].country, "US");
    assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
    assert_eq!(events[1].event, "ACCEPTANCE");
}

#[tokio::test]
async fn missing_track_info_means_no_events() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/").query_param("API", "TrackV2");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body("<TrackResponse></TrackResponse>");
    });

    let service = service(server.url("/"));
    let events = service.shipment_events("EJ958083578US").await;

    assert!(events.is_empty());
}

#[tokio::test]
async fn transport_failure_means_no_events() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(503);
    });

    let service = service(server.url("/"));
    let events = service.shipment_events("EJ958083578US").await;

    assert!(events.is_empty());
}

#[tokio::test]
async fn blank_tracking_number_skips_the_carrier_call() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body("<TrackResponse></TrackResponse>");
    });

    let service = service(server.url("/"));
    assert!(service.shipment_events("").await.is_empty());
    assert!(service.shipment_events("   ").await.is_empty());

    api_mock.assert_hits(0);
}

#[test]
fn tracking_url_links_to_the_carrier_page() {
    let service = service("https://production.shippingapis.com/ShippingAPI.dll".to_string());

    assert_eq!(
        service.tracking_url("EJ958083578US"),
        "https://tools.usps.com/go/TrackConfirmAction?tLabels=EJ958083578US"
    );
}
