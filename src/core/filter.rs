use crate::config::{ServiceAllowList, UspsSettings};
use crate::domain::model::{PostageQuote, RateOptions, RateResponseSet, ShippingOption};
use rust_decimal::Decimal;

/// Reduces a parsed rate response to the customer-visible options.
///
/// Quotes are kept only when their service code is allow-listed; surviving
/// quotes are grouped by code in first-seen order, rates summed across
/// packages of a multi-package shipment, and the handling surcharge added
/// once per aggregated option. Any erroring package short-circuits the call
/// to its error messages; partial success is never reported.
pub fn aggregate_options(response: &RateResponseSet, settings: &UspsSettings) -> RateOptions {
    let allow_list = if response.is_domestic {
        &settings.carrier_services_domestic
    } else {
        &settings.carrier_services_international
    };

    if allow_list.is_empty() || response.packages.is_empty() {
        return RateOptions::default();
    }

    if response.has_errors() {
        let errors = response
            .packages
            .iter()
            .filter_map(|package| package.error())
            .map(|error| error.to_message())
            .collect();
        return RateOptions::from_errors(errors);
    }

    let mut aggregated: Vec<(i32, String, Decimal)> = Vec::new();
    for quote in response.packages.iter().flat_map(|package| package.quotes()) {
        if !is_offered(quote, response.is_domestic, allow_list) {
            continue;
        }
        match aggregated.iter_mut().find(|(id, _, _)| *id == quote.id) {
            Some((_, _, rate)) => *rate += quote.rate,
            None => aggregated.push((quote.id, quote.service.clone(), quote.rate)),
        }
    }

    RateOptions {
        options: aggregated
            .into_iter()
            .map(|(_, name, rate)| ShippingOption {
                name,
                rate: rate + settings.additional_handling_charge,
            })
            .collect(),
        errors: Vec::new(),
    }
}

fn is_offered(quote: &PostageQuote, is_domestic: bool, allow_list: &ServiceAllowList) -> bool {
    // Letter and postcard tiers are withheld from domestic offers unless the
    // operator re-enabled them with the "letter" token.
    if is_domestic && !allow_list.allows_letters() {
        let service = quote.service.to_lowercase();
        if service.contains("letter") || service.contains("postcard") {
            return false;
        }
    }

    allow_list.allows(&quote.id.to_string())
}
