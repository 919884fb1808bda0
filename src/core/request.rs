use crate::config::UspsSettings;
use crate::domain::model::PackageDescriptor;
use crate::utils::error::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_decimal::Decimal;

/// Service name-tokens requested from the domestic RateV4 API.
pub const DOMESTIC_SERVICE_TOKENS: [&str; 7] = [
    "First Class",
    "Priority",
    "Express",
    "Parcel",
    "Library",
    "BPM",
    "Media",
];

const FIRST_CLASS: &str = "First Class";

/// No First Class tier exists for packages of 14 ounces or more.
const FIRST_CLASS_OUNCE_LIMIT: i32 = 14;

const API_REVISION: &str = "2";

/// Declared-value ceiling accepted by most international service options.
const MAX_DECLARED_VALUE: i32 = 400;

/// USPS wants country NAMES for international shipments, and for a handful
/// of countries its spelling diverges from the standard display name.
pub fn country_display_name<'a>(iso3: &str, standard_name: &'a str) -> &'a str {
    match iso3 {
        "LBY" => "Cyjrenaica (Libya)",
        "LAO" => "Laos",
        "FLK" => "South Georgia (Falkland Islands)",
        "IRN" => "Iran",
        "SJM" => "Svalbard and Jan Mayen Islands",
        "SWZ" => "Swaziland (Eswatini)",
        "VAT" => "Vatican City",
        "SSD" => "Sudan",
        "ANT" => "Netherlands",
        "PCN" => "Pitcairn Island",
        "BIH" => "Bosnia-Herzegovina",
        "BVT" => "Norway",
        "CCK" => "Cocos Island (Australia)",
        "CIV" => "Ivory Coast",
        "RUS" => "Russia",
        "KOR" => "South Korea",
        "PRK" => "North Korea",
        _ => standard_name,
    }
}

/// Assembles the RateV4 / IntlRateV2 / TrackFieldRequest documents. Output
/// is compact; only standard XML text escaping is applied.
pub struct RequestBuilder<'a> {
    username: &'a str,
    password: &'a str,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(settings: &'a UspsSettings) -> Self {
        Self {
            username: &settings.username,
            password: &settings.password,
        }
    }

    /// One `<Package>` per descriptor and service token. First Class is
    /// omitted once the shipment weighs 14 ounces or more.
    pub fn domestic_rates(
        &self,
        packages: &[PackageDescriptor],
        origin_zip: &str,
        destination_zip: &str,
        total_ounces: i32,
    ) -> Result<String> {
        let origin = zip_digits(origin_zip);
        let destination = zip_digits(destination_zip);

        let mut writer = Writer::new(Vec::new());
        self.open_rate_root(&mut writer, "RateV4Request")?;

        for package in packages {
            for service in DOMESTIC_SERVICE_TOKENS {
                if service == FIRST_CLASS && total_ounces >= FIRST_CLASS_OUNCE_LIMIT {
                    continue;
                }

                let mut element = BytesStart::new("Package");
                element.push_attribute(("ID", package.id.to_string().as_str()));
                writer.write_event(Event::Start(element))?;

                text_element(&mut writer, "Service", service)?;
                text_element(&mut writer, "ZipOrigination", &origin)?;
                text_element(&mut writer, "ZipDestination", &destination)?;
                text_element(&mut writer, "Pounds", &package.pounds.to_string())?;
                text_element(&mut writer, "Ounces", &package.ounces.to_string())?;
                text_element(&mut writer, "Container", "")?;
                text_element(&mut writer, "Size", package.size_class.as_str())?;
                text_element(&mut writer, "Width", &package.width.to_string())?;
                text_element(&mut writer, "Length", &package.length.to_string())?;
                text_element(&mut writer, "Height", &package.height.to_string())?;
                text_element(&mut writer, "Girth", &package.girth.to_string())?;
                text_element(&mut writer, "Machinable", "false")?;
                if service == FIRST_CLASS {
                    text_element(&mut writer, "FirstClassMailType", "PARCEL")?;
                }

                writer.write_event(Event::End(BytesEnd::new("Package")))?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("RateV4Request")))?;
        Ok(into_string(writer))
    }

    /// One `<Package>` per descriptor. The declared value is capped at 400
    /// before serialization.
    pub fn international_rates(
        &self,
        packages: &[PackageDescriptor],
        declared_value: Decimal,
        country_name: &str,
        origin_zip: &str,
    ) -> Result<String> {
        let cap = Decimal::from(MAX_DECLARED_VALUE);
        let declared_value = if declared_value > cap { cap } else { declared_value };

        let mut writer = Writer::new(Vec::new());
        self.open_rate_root(&mut writer, "IntlRateV2Request")?;

        for package in packages {
            let mut element = BytesStart::new("Package");
            element.push_attribute(("ID", package.id.to_string().as_str()));
            writer.write_event(Event::Start(element))?;

            text_element(&mut writer, "Pounds", &package.pounds.to_string())?;
            text_element(&mut writer, "Ounces", &package.ounces.to_string())?;
            text_element(&mut writer, "Machinable", "false")?;
            text_element(&mut writer, "MailType", "Package")?;
            writer.write_event(Event::Start(BytesStart::new("GXG")))?;
            text_element(&mut writer, "POBoxFlag", "N")?;
            text_element(&mut writer, "GiftFlag", "N")?;
            writer.write_event(Event::End(BytesEnd::new("GXG")))?;
            text_element(&mut writer, "ValueOfContents", &declared_value.to_string())?;
            text_element(&mut writer, "Country", country_name)?;
            text_element(&mut writer, "Container", "RECTANGULAR")?;
            text_element(&mut writer, "Size", package.size_class.as_str())?;
            text_element(&mut writer, "Width", &package.width.to_string())?;
            text_element(&mut writer, "Length", &package.length.to_string())?;
            text_element(&mut writer, "Height", &package.height.to_string())?;
            text_element(&mut writer, "Girth", &package.girth.to_string())?;
            text_element(&mut writer, "OriginZip", origin_zip)?;
            text_element(&mut writer, "CommercialFlag", "N")?;

            writer.write_event(Event::End(BytesEnd::new("Package")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("IntlRateV2Request")))?;
        Ok(into_string(writer))
    }

    pub fn tracking(&self, tracking_number: &str) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        let mut root = BytesStart::new("TrackFieldRequest");
        root.push_attribute(("USERID", self.username));
        root.push_attribute(("PASSWORD", self.password));
        writer.write_event(Event::Start(root))?;

        let mut track_id = BytesStart::new("TrackID");
        track_id.push_attribute(("ID", tracking_number));
        writer.write_event(Event::Empty(track_id))?;

        writer.write_event(Event::End(BytesEnd::new("TrackFieldRequest")))?;
        Ok(into_string(writer))
    }

    fn open_rate_root(&self, writer: &mut Writer<Vec<u8>>, root_tag: &str) -> Result<()> {
        let mut root = BytesStart::new(root_tag);
        root.push_attribute(("USERID", self.username));
        root.push_attribute(("PASSWORD", self.password));
        writer.write_event(Event::Start(root))?;
        text_element(writer, "Revision", API_REVISION)?;
        Ok(())
    }
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    if !value.is_empty() {
        writer.write_event(Event::Text(BytesText::new(value)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn into_string(writer: Writer<Vec<u8>>) -> String {
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

/// ZIPs go out as at most five digits; everything else is stripped.
fn zip_digits(zip: &str) -> String {
    zip.chars().filter(|c| c.is_ascii_digit()).take(5).collect()
}
