use crate::core::xml::XmlElement;
use crate::domain::model::{
    DomesticRates, PackageRateResult, PostageQuote, RateResponseSet, ResponseError, TrackEvent,
    TrackInfo,
};
use crate::utils::error::Result;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

const EVENT_DATE_FORMAT: &str = "%b %d, %Y";

/// Parses a RateV4 / IntlRateV2 response body.
///
/// Malformed documents are swallowed into an empty response: callers cannot
/// distinguish "no offers" from garbage, matching the external contract.
/// The failure is still logged as a diagnostic.
pub fn parse_rate_response(body: &str, is_domestic: bool) -> RateResponseSet {
    match try_parse_rates(body, is_domestic) {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!("Discarding unparsable USPS rate response: {error}");
            RateResponseSet::empty(is_domestic)
        }
    }
}

fn try_parse_rates(body: &str, is_domestic: bool) -> Result<RateResponseSet> {
    let root = XmlElement::parse(body)?;
    let mut packages = Vec::new();

    if root.name == "Error" {
        packages.push(PackageRateResult::Error(parse_error(&root)));
    }

    for package in root.children_named("Package") {
        if is_domestic {
            packages.push(parse_domestic_package(package));
        } else {
            packages.push(parse_international_package(package));
        }
    }

    Ok(RateResponseSet {
        is_domestic,
        packages,
    })
}

fn parse_domestic_package(package: &XmlElement) -> PackageRateResult {
    if let Some(error) = package.child("Error") {
        return PackageRateResult::Error(parse_error(error));
    }

    PackageRateResult::Domestic(DomesticRates {
        zip_origination: package.child_text("ZipOrigination").to_string(),
        zip_destination: package.child_text("ZipDestination").to_string(),
        zone: package.child_value("Zone"),
        pounds: package.child_value("Pounds"),
        ounces: package.child_value("Ounces"),
        size: package.child_text("Size").to_string(),
        machinable: package.child_bool("Machinable"),
        postage: package
            .children_named("Postage")
            .map(|postage| PostageQuote {
                id: postage.attr_value("CLASSID"),
                rate: postage.child_value("Rate"),
                service: normalize_service_name(postage.child_text("MailService")),
            })
            .collect(),
    })
}

fn parse_international_package(package: &XmlElement) -> PackageRateResult {
    if let Some(error) = package.child("Error") {
        return PackageRateResult::Error(parse_error(error));
    }

    PackageRateResult::International(
        package
            .children_named("Service")
            .map(|service| PostageQuote {
                id: service.attr_value("ID"),
                rate: service.child_value("Postage"),
                service: normalize_service_name(service.child_text("SvcDescription")),
            })
            .collect(),
    )
}

fn parse_error(error: &XmlElement) -> ResponseError {
    ResponseError {
        number: error.child_text("Number").to_string(),
        description: error.child_text("Description").to_string(),
        source: error.child_text("Source").to_string(),
        help_context: error.child_text("HelpContext").to_string(),
        help_file: error.child_text("HelpFile").to_string(),
    }
}

/// Parses a TrackV2 response body. `None` when the document is malformed or
/// carries no `<TrackInfo>`, as opposed to a result with an empty detail
/// list.
pub fn parse_track_response(body: &str) -> Option<TrackInfo> {
    let root = match XmlElement::parse(body) {
        Ok(root) => root,
        Err(error) => {
            tracing::warn!("Discarding unparsable USPS tracking response: {error}");
            return None;
        }
    };

    let info = root.child("TrackInfo")?;
    let summary = parse_track_event(info.child("TrackSummary")?);

    Some(TrackInfo {
        tracking_id: info.attr("ID").unwrap_or_default().to_string(),
        summary,
        details: info.children_named("TrackDetail").map(parse_track_event).collect(),
    })
}

fn parse_track_event(element: &XmlElement) -> TrackEvent {
    TrackEvent {
        event: element.child_text("Event").to_string(),
        city: element.child_text("EventCity").to_string(),
        state: element.child_text("EventState").to_string(),
        zip: element.child_text("EventZIPCode").to_string(),
        country: element.child_text("EventCountry").to_string(),
        firm_name: element.child_text("FirmName").to_string(),
        person_name: element.child_text("Name").to_string(),
        date: NaiveDate::parse_from_str(element.child_text("EventDate"), EVENT_DATE_FORMAT)
            .unwrap_or_default(),
    }
}

static VENDOR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(usps\s*)?").expect("valid vendor prefix pattern"));

/// USPS double-escapes the `<sup>` trademark markup in service names; turn
/// the known sequences into the literal symbols, then make sure the name
/// leads with the vendor.
fn normalize_service_name(raw: &str) -> String {
    let name = raw
        .replace("&lt;sup&gt;&amp;reg;&lt;/sup&gt;", "\u{00AE}")
        .replace("&lt;sup&gt;&#174;&lt;/sup&gt;", "\u{00AE}")
        .replace("&lt;sup&gt;&amp;trade;&lt;/sup&gt;", "\u{2122}")
        .replace("&lt;sup&gt;&#8482;&lt;/sup&gt;", "\u{2122}");

    VENDOR_PREFIX.replace(&name, "USPS ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const DOMESTIC_FIXTURE: &str = r#"<RateV4Response>
        <Package ID="0">
            <ZipOrigination>10022</ZipOrigination>
            <ZipDestination>20008</ZipDestination>
            <Pounds>2</Pounds>
            <Ounces>3</Ounces>
            <Size>REGULAR</Size>
            <Machinable>TRUE</Machinable>
            <Zone>3</Zone>
            <Postage CLASSID="1">
                <MailService>Priority Mail 2-Day&amp;lt;sup&amp;gt;&amp;#8482;&amp;lt;/sup&amp;gt;</MailService>
                <Rate>10.20</Rate>
            </Postage>
            <Postage CLASSID="4">
                <MailService>USPS Retail Ground&amp;lt;sup&amp;gt;&amp;#174;&amp;lt;/sup&amp;gt;</MailService>
                <Rate>9.45</Rate>
            </Postage>
        </Package>
    </RateV4Response>"#;

    #[test]
    fn domestic_response_yields_quotes_per_classid() {
        let response = parse_rate_response(DOMESTIC_FIXTURE, true);

        assert!(response.is_domestic);
        assert!(!response.has_errors());
        assert_eq!(response.packages.len(), 1);

        let PackageRateResult::Domestic(rates) = &response.packages[0] else {
            panic!("expected a domestic package");
        };
        assert_eq!(rates.zip_origination, "10022");
        assert_eq!(rates.zone, 3);
        assert!(rates.machinable);
        assert_eq!(rates.postage.len(), 2);

        assert_eq!(rates.postage[0].id, 1);
        assert_eq!(rates.postage[0].rate, Decimal::new(1020, 2));
        assert_eq!(rates.postage[0].service, "USPS Priority Mail 2-Day\u{2122}");

        assert_eq!(rates.postage[1].id, 4);
        assert_eq!(rates.postage[1].service, "USPS Retail Ground\u{00AE}");
    }

    #[test]
    fn root_error_becomes_single_error_package() {
        let body = r#"<Error>
            <Number>80040B1A</Number>
            <Description>Authorization failure</Description>
            <Source>USPSCOM::DoAuth</Source>
            <HelpContext>1000440</HelpContext>
            <HelpFile></HelpFile>
        </Error>"#;

        let response = parse_rate_response(body, true);

        assert!(response.has_errors());
        assert_eq!(response.packages.len(), 1);
        let error = response.packages[0].error().unwrap();
        assert_eq!(error.description, "Authorization failure");
        assert_eq!(
            error.to_message(),
            "Error Desc: Authorization failure. Help Context: 1000440."
        );
    }

    #[test]
    fn package_level_error_stops_field_extraction() {
        let body = r#"<RateV4Response>
            <Package ID="0">
                <Error>
                    <Number>-2147218040</Number>
                    <Description>Invalid Destination ZIP Code</Description>
                    <HelpContext>1000440</HelpContext>
                </Error>
            </Package>
        </RateV4Response>"#;

        let response = parse_rate_response(body, true);

        assert_eq!(response.packages.len(), 1);
        assert!(response.packages[0].quotes().is_empty());
        assert_eq!(
            response.packages[0].error().unwrap().description,
            "Invalid Destination ZIP Code"
        );
    }

    #[test]
    fn international_services_become_individual_quotes() {
        let body = r#"<IntlRateV2Response>
            <Package ID="0">
                <Service ID="12">
                    <Postage>55.25</Postage>
                    <SvcDescription>USPS GXG&amp;lt;sup&amp;gt;&amp;amp;trade;&amp;lt;/sup&amp;gt; Envelopes</SvcDescription>
                </Service>
                <Service ID="2">
                    <Postage>40.95</Postage>
                    <SvcDescription>Priority Mail International&amp;lt;sup&amp;gt;&amp;amp;reg;&amp;lt;/sup&amp;gt;</SvcDescription>
                </Service>
            </Package>
        </IntlRateV2Response>"#;

        let response = parse_rate_response(body, false);

        assert!(!response.is_domestic);
        assert_eq!(response.packages.len(), 1);
        let quotes = response.packages[0].quotes();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].id, 12);
        assert_eq!(quotes[0].service, "USPS GXG\u{2122} Envelopes");
        assert_eq!(quotes[1].id, 2);
        assert_eq!(quotes[1].rate, Decimal::new(4095, 2));
        assert_eq!(
            quotes[1].service,
            "USPS Priority Mail International\u{00AE}"
        );
    }

    #[test]
    fn international_package_without_services_is_empty_not_error() {
        let body = r#"<IntlRateV2Response><Package ID="0"></Package></IntlRateV2Response>"#;

        let response = parse_rate_response(body, false);

        assert_eq!(response.packages.len(), 1);
        assert!(!response.has_errors());
        assert!(response.packages[0].quotes().is_empty());
    }

    #[test]
    fn zero_packages_yield_empty_result() {
        let response = parse_rate_response("<RateV4Response></RateV4Response>", true);

        assert!(response.packages.is_empty());
        assert!(!response.has_errors());
    }

    #[test]
    fn malformed_document_is_swallowed_into_empty_response() {
        for body in ["", "not xml at all", "<RateV4Response><Package>"] {
            let response = parse_rate_response(body, true);
            assert!(response.packages.is_empty());
        }
    }

    #[test]
    fn vendor_prefix_is_not_duplicated() {
        assert_eq!(normalize_service_name("Priority Mail"), "USPS Priority Mail");
        assert_eq!(normalize_service_name("USPS Retail Ground"), "USPS Retail Ground");
        assert_eq!(normalize_service_name("usps Retail Ground"), "USPS Retail Ground");
    }

    const TRACK_FIXTURE: &str = r#"<TrackResponse>
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
                <EventDate>May 09, 2024</EventDate>
            </TrackDetail>
        </TrackInfo>
    </TrackResponse>"#;

    #[test]
    fn track_response_parses_summary_and_details() {
        let info = parse_track_response(TRACK_FIXTURE).unwrap();

        assert_eq!(info.tracking_id, "EJ958083578US");
        assert_eq!(info.summary.event, "DELIVERED");
        assert_eq!(
            info.summary.date,
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
        );
        assert_eq!(info.details.len(), 1);
        assert_eq!(info.details[0].event, "ARRIVAL AT UNIT");
        assert_eq!(info.details[0].city, "NEWTON");
    }

    #[test]
    fn unparsable_event_date_defaults_to_epoch() {
        let body = r#"<TrackResponse><TrackInfo ID="X">
            <TrackSummary><Event>ENROUTE</Event><EventDate>soon</EventDate></TrackSummary>
        </TrackInfo></TrackResponse>"#;

        let info = parse_track_response(body).unwrap();

        assert_eq!(info.summary.date, NaiveDate::default());
        assert!(info.details.is_empty());
    }

    #[test]
    fn missing_track_info_is_no_result() {
        assert!(parse_track_response("<TrackResponse></TrackResponse>").is_none());
        assert!(parse_track_response("garbage").is_none());
    }
}
