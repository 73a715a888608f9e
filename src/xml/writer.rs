use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;

use super::format::format_decimal;
use crate::core::{Profile, ZugferdError};

fn xml_io(e: std::io::Error) -> ZugferdError {
    ZugferdError::Io(e)
}

/// Indenting XML writer that drops elements the document profile does not
/// allow.
///
/// Every `*_if` method takes the set of profiles the element is allowed in.
/// A skipped start element hides its whole subtree: nested writes are
/// no-ops until the matching [`ProfileAwareXmlWriter::end_element`].
pub struct ProfileAwareXmlWriter<W: Write> {
    writer: Writer<W>,
    profile: Profile,
    /// Open elements and whether each one was written.
    stack: Vec<(String, bool)>,
}

impl<W: Write> ProfileAwareXmlWriter<W> {
    pub fn new(inner: W, profile: Profile) -> Result<Self, ZugferdError> {
        let mut writer = Writer::new_with_indent(inner, b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self {
            writer,
            profile,
            stack: Vec::new(),
        })
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn visible(&self) -> bool {
        self.stack.iter().all(|(_, written)| *written)
    }

    fn allowed(&self, allowed: Profile) -> bool {
        self.visible() && self.profile.includes(allowed)
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, ZugferdError> {
        self.start_element_with_attrs_if(name, &[], Profile::UNKNOWN, true)
    }

    pub fn start_element_if(&mut self, name: &str, allowed: Profile) -> Result<&mut Self, ZugferdError> {
        self.start_element_with_attrs_if(name, &[], allowed, false)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, ZugferdError> {
        self.start_element_with_attrs_if(name, attrs, Profile::UNKNOWN, true)
    }

    fn start_element_with_attrs_if(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        allowed: Profile,
        always: bool,
    ) -> Result<&mut Self, ZugferdError> {
        let write = if always { self.visible() } else { self.allowed(allowed) };
        if write {
            let mut elem = BytesStart::new(name);
            for (k, v) in attrs {
                elem.push_attribute((*k, *v));
            }
            self.writer.write_event(Event::Start(elem)).map_err(xml_io)?;
        }
        self.stack.push((name.to_owned(), write));
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, ZugferdError> {
        let Some((open, written)) = self.stack.pop() else {
            return Err(ZugferdError::Xml(format!("end of '{name}' without start")));
        };
        debug_assert_eq!(open, name, "mismatched end element");
        if written {
            self.writer
                .write_event(Event::End(BytesEnd::new(open)))
                .map_err(xml_io)?;
        }
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, ZugferdError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, ZugferdError> {
        if !self.visible() {
            return Ok(self);
        }
        self.write_text_element(name, text, attrs)
    }

    pub fn text_element_if(
        &mut self,
        name: &str,
        text: &str,
        allowed: Profile,
    ) -> Result<&mut Self, ZugferdError> {
        self.text_element_with_attrs_if(name, text, &[], allowed)
    }

    pub fn text_element_with_attrs_if(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
        allowed: Profile,
    ) -> Result<&mut Self, ZugferdError> {
        if !self.allowed(allowed) {
            return Ok(self);
        }
        self.write_text_element(name, text, attrs)
    }

    /// Write `name` only when `text` is present and not blank.
    pub fn optional_element(
        &mut self,
        name: &str,
        text: Option<&str>,
        allowed: Profile,
    ) -> Result<&mut Self, ZugferdError> {
        match text.filter(|t| !t.trim().is_empty()) {
            Some(text) => self.text_element_if(name, text, allowed),
            None => Ok(self),
        }
    }

    /// Decimal with a fixed number of places, optionally with `currencyID`.
    pub fn decimal_element_if(
        &mut self,
        name: &str,
        value: Decimal,
        places: u32,
        currency: Option<&str>,
        allowed: Profile,
    ) -> Result<&mut Self, ZugferdError> {
        let text = format_decimal(value, places);
        match currency.filter(|c| !c.is_empty()) {
            Some(c) => self.text_element_with_attrs_if(name, &text, &[("currencyID", c)], allowed),
            None => self.text_element_if(name, &text, allowed),
        }
    }

    pub fn optional_decimal_element(
        &mut self,
        name: &str,
        value: Option<Decimal>,
        places: u32,
        currency: Option<&str>,
        allowed: Profile,
    ) -> Result<&mut Self, ZugferdError> {
        match value {
            Some(v) => self.decimal_element_if(name, v, places, currency, allowed),
            None => Ok(self),
        }
    }

    /// Quantity with a `unitCode` attribute when a unit is known.
    pub fn quantity_element_if(
        &mut self,
        name: &str,
        quantity: Decimal,
        unit: Option<&str>,
        allowed: Profile,
    ) -> Result<&mut Self, ZugferdError> {
        let text = format_decimal(quantity, 4);
        match unit.filter(|u| !u.is_empty()) {
            Some(u) => self.text_element_with_attrs_if(name, &text, &[("unitCode", u)], allowed),
            None => self.text_element_if(name, &text, allowed),
        }
    }

    fn write_text_element(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, ZugferdError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer.write_event(Event::Start(elem)).map_err(xml_io)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn render(profile: Profile, f: impl FnOnce(&mut ProfileAwareXmlWriter<&mut Vec<u8>>)) -> String {
        let mut buf = Vec::new();
        let mut w = ProfileAwareXmlWriter::new(&mut buf, profile).unwrap();
        f(&mut w);
        drop(w);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn gated_element_hides_subtree() {
        let xml = render(Profile::BASIC, |w| {
            w.start_element("Root").unwrap();
            w.start_element_if("Extended", Profile::EXTENDED).unwrap();
            w.text_element("Inner", "hidden").unwrap();
            w.start_element("Deeper").unwrap();
            w.text_element("Leaf", "hidden").unwrap();
            w.end_element("Deeper").unwrap();
            w.end_element("Extended").unwrap();
            w.text_element_if("Shown", "yes", Profile::BASIC | Profile::COMFORT).unwrap();
            w.end_element("Root").unwrap();
        });
        assert!(!xml.contains("Extended"));
        assert!(!xml.contains("hidden"));
        assert!(!xml.contains("Deeper"));
        assert!(xml.contains("<Shown>yes</Shown>"));
        assert!(xml.contains("</Root>"));
    }

    #[test]
    fn optional_and_decimal_helpers() {
        let xml = render(Profile::COMFORT, |w| {
            w.start_element("Root").unwrap();
            w.optional_element("Blank", Some("  "), Profile::COMFORT).unwrap();
            w.optional_element("Absent", None, Profile::COMFORT).unwrap();
            w.decimal_element_if("Amount", dec!(1234.5), 2, Some("EUR"), Profile::COMFORT)
                .unwrap();
            w.quantity_element_if("Qty", dec!(3), Some("HUR"), Profile::COMFORT).unwrap();
            w.quantity_element_if("Bare", dec!(1), None, Profile::COMFORT).unwrap();
            w.end_element("Root").unwrap();
        });
        assert!(!xml.contains("Blank"));
        assert!(!xml.contains("Absent"));
        assert!(xml.contains(r#"<Amount currencyID="EUR">1234.50</Amount>"#));
        assert!(xml.contains(r#"<Qty unitCode="HUR">3.0000</Qty>"#));
        assert!(xml.contains("<Bare>1.0000</Bare>"));
    }

    #[test]
    fn text_is_escaped() {
        let xml = render(Profile::BASIC, |w| {
            w.text_element("Name", "Müller & Söhne <GmbH>").unwrap();
        });
        assert!(xml.contains("Müller &amp; Söhne &lt;GmbH&gt;"));
    }

    #[test]
    fn unbalanced_end_is_an_error() {
        let mut buf = Vec::new();
        let mut w = ProfileAwareXmlWriter::new(&mut buf, Profile::BASIC).unwrap();
        assert!(w.end_element("Root").is_err());
    }
}
