use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};

/// Compact (no indentation) XML writer with helpers for the vendor's
/// conventions: optional elements are skipped, booleans are `1`/`0`.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Starts a document with `<?xml version="1.0"?>` and a newline.
    pub fn document() -> Result<Self> {
        let mut writer = Self {
            inner: Writer::new(Vec::new()),
        };
        writer.write(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        writer.inner.get_mut().push(b'\n');
        Ok(writer)
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn start(&mut self, name: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str) -> Result<()> {
        self.write(Event::Empty(BytesStart::new(name)))
    }

    pub fn element(&mut self, name: &str, value: &str) -> Result<()> {
        self.start(name)?;
        if !value.is_empty() {
            self.write(Event::Text(BytesText::new(value)))?;
        }
        self.end(name)
    }

    pub fn optional(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.element(name, value),
            None => Ok(()),
        }
    }

    pub fn flag(&mut self, name: &str, value: bool) -> Result<()> {
        self.element(name, if value { "1" } else { "0" })
    }

    pub fn optional_flag(&mut self, name: &str, value: Option<bool>) -> Result<()> {
        match value {
            Some(value) => self.flag(name, value),
            None => Ok(()),
        }
    }

    /// `<container><item>v</item>…</container>`, skipped when `values` is
    /// empty.
    pub fn list(&mut self, container: &str, item: &str, values: &[String]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        self.nested(container, |w| {
            for value in values {
                w.element(item, value)?;
            }
            Ok(())
        })
    }

    pub fn nested(&mut self, name: &str, body: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        self.start(name)?;
        body(self)?;
        self.end(name)
    }

    /// Like [`nested`](Self::nested) but writes `<name/>` when `is_empty`.
    pub fn container(
        &mut self,
        name: &str,
        is_empty: bool,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        if is_empty {
            self.empty(name)
        } else {
            self.nested(name, body)
        }
    }

    pub fn finish(self) -> Result<String> {
        let mut xml = String::from_utf8(self.inner.into_inner())
            .map_err(|e| Error::Serialization(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}
