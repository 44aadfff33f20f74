use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// A parsed XML element: name, concatenated text, child elements in
/// document order. Attributes are not kept; the vendor schema has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;
        loop {
            match reader.read_event().map_err(malformed)? {
                Event::Start(start) => {
                    stack.push(Element::named(String::from_utf8_lossy(start.name().as_ref())));
                }
                Event::Empty(start) => {
                    let element = Element::named(String::from_utf8_lossy(start.name().as_ref()));
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape().map_err(malformed)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Deserialization("unbalanced closing tag".into()))?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Deserialization("unexpected end of document".into()));
        }
        root.ok_or_else(|| Error::Deserialization("response contained no XML element".into()))
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the named child; absent and empty elements both read as
    /// `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// A present element is a set flag: `1`/`true` read as true, anything
    /// else (including empty) as false.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.child(name)
            .map(|c| matches!(c.text.trim(), "1" | "true" | "True" | "TRUE"))
    }

    /// Texts of `<container><item>…</item></container>`.
    pub fn list(&self, container: &str, item: &str) -> Vec<String> {
        self.child(container)
            .map(|c| {
                c.children(item)
                    .map(|i| i.text.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn datetime(&self, name: &str) -> Result<Option<NaiveDateTime>> {
        self.text(name).map(|raw| parse_datetime(name, &raw)).transpose()
    }

    pub fn number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| Error::Deserialization(format!("<{name}> is not a number: {raw}")))
            })
            .transpose()
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn malformed(e: quick_xml::Error) -> Error {
    Error::Deserialization(e.to_string())
}

fn parse_datetime(name: &str, raw: &str) -> Result<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| Error::Deserialization(format!("<{name}> is not a date: {raw}")))
}
