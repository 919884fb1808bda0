use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Country reference as the host system knows it: three-letter ISO code plus
/// the display name shown to customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub iso3: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Bounding box of the whole shipment, in the host system's primary
/// dimension unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

/// One rate lookup as supplied by the caller. Weight and dimensions come from
/// the host's measurement service in its primary units; the cart items are
/// only used for the declared value of international shipments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateQuery {
    pub origin_zip: String,
    pub destination_zip: String,
    /// ISO3 code of the shipping origin. `None` is classified as domestic.
    pub origin_country_code: Option<String>,
    pub destination_country: Country,
    pub items: Vec<CartItem>,
    pub weight: Decimal,
    pub dimensions: BoxDimensions,
}

impl RateQuery {
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}

/// REGULAR when every dimension fits in 12", LARGE otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageSizeClass {
    Regular,
    Large,
}

impl PackageSizeClass {
    pub fn classify(length: i32, height: i32, width: i32) -> Self {
        if length > 12 || height > 12 || length > width {
            PackageSizeClass::Large
        } else {
            PackageSizeClass::Regular
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageSizeClass::Regular => "Regular",
            PackageSizeClass::Large => "Large",
        }
    }
}

/// One carrier-legal package: the unit the rate request is built from.
/// Weight and dimensions are whole carrier units (pounds/ounces, inches),
/// already floored per the splitting rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub id: u32,
    pub pounds: i32,
    pub ounces: i32,
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub girth: i32,
    pub size_class: PackageSizeClass,
    /// Always false in outgoing requests.
    pub machinable: bool,
}

/// A carrier-quoted price for one mail class on one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostageQuote {
    pub id: i32,
    pub service: String,
    pub rate: Decimal,
}

/// `<Error>` payload returned by the USPS API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub number: String,
    pub description: String,
    pub source: String,
    pub help_context: String,
    pub help_file: String,
}

impl ResponseError {
    pub fn to_message(&self) -> String {
        format!(
            "Error Desc: {}. Help Context: {}.",
            self.description, self.help_context
        )
    }
}

/// Domestic per-package response fields alongside the postage quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomesticRates {
    pub zip_origination: String,
    pub zip_destination: String,
    /// Postal rate zones between the origin and destination ZIP codes.
    pub zone: i32,
    pub pounds: i32,
    pub ounces: i32,
    pub size: String,
    pub machinable: bool,
    pub postage: Vec<PostageQuote>,
}

/// Outcome for a single package in the rate response. A package either
/// carries quotes or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageRateResult {
    Domestic(DomesticRates),
    International(Vec<PostageQuote>),
    Error(ResponseError),
}

impl PackageRateResult {
    pub fn quotes(&self) -> &[PostageQuote] {
        match self {
            PackageRateResult::Domestic(rates) => &rates.postage,
            PackageRateResult::International(quotes) => quotes,
            PackageRateResult::Error(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&ResponseError> {
        match self {
            PackageRateResult::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// Parsed rate response for one API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResponseSet {
    pub is_domestic: bool,
    pub packages: Vec<PackageRateResult>,
}

impl RateResponseSet {
    pub fn empty(is_domestic: bool) -> Self {
        Self {
            is_domestic,
            packages: Vec::new(),
        }
    }

    /// If any package carries an error the whole response is treated as
    /// failed; partial success is not reported.
    pub fn has_errors(&self) -> bool {
        self.packages.iter().any(|p| p.error().is_some())
    }
}

/// One tracking event as returned by TrackV2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub event: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub firm_name: String,
    pub person_name: String,
    /// Epoch date when the carrier's date text is missing or unparsable.
    pub date: NaiveDate,
}

/// Full tracking record: the carrier-provided order of `details` is
/// chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub tracking_id: String,
    pub summary: TrackEvent,
    pub details: Vec<TrackEvent>,
}

/// Normalized tracking event handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentEvent {
    pub event: String,
    pub date: NaiveDate,
    pub location: String,
    pub country: String,
}

/// A priced, customer-visible shipping option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub name: String,
    pub rate: Decimal,
}

/// Facade result: either populated options or a non-empty errors list,
/// never an unwound error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOptions {
    pub options: Vec<ShippingOption>,
    pub errors: Vec<String>,
}

impl RateOptions {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            options: Vec::new(),
            errors,
        }
    }
}
