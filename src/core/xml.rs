use crate::utils::error::{Result, ShippingError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::str::FromStr;

/// Minimal owned element tree.
///
/// USPS documents are small, so the whole response is materialized before
/// field extraction; the accessors below mirror the child/attribute
/// navigation the rate and tracking parsers need, with missing or
/// unparsable values decaying to defaults.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn parse(document: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(document);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        ShippingError::MalformedResponse {
                            message: "unbalanced closing tag".to_string(),
                        }
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::Eof => {
                    return Err(ShippingError::MalformedResponse {
                        message: "document has no root element".to_string(),
                    })
                }
                _ => {}
            }
        }
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child element text, empty when the child is absent.
    pub fn child_text(&self, name: &str) -> &str {
        self.child(name).map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Parsed child element value, default when absent or unparsable.
    pub fn child_value<T: FromStr + Default>(&self, name: &str) -> T {
        self.child_text(name).trim().parse().unwrap_or_default()
    }

    pub fn child_bool(&self, name: &str) -> bool {
        matches!(
            self.child_text(name).trim().to_ascii_lowercase().as_str(),
            "true" | "1"
        )
    }

    /// Parsed attribute value, default when absent or unparsable.
    pub fn attr_value<T: FromStr + Default>(&self, name: &str) -> T {
        self.attr(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default()
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        ..Default::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        element.attributes.insert(
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            attribute.unescape_value()?.into_owned(),
        );
    }
    Ok(element)
}
