// ABOUTME: Thin quick-xml writer wrapper shared by the Atom and RSS encoders.
// ABOUTME: Emits an indented UTF-8 document with escaped text and attributes.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::EncodeError;

pub(crate) struct XmlDoc {
    writer: Writer<Vec<u8>>,
}

impl XmlDoc {
    /// Starts a document with the XML declaration already written.
    pub(crate) fn new() -> Result<Self, EncodeError> {
        let mut doc = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        };
        doc.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(doc)
    }

    pub(crate) fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), EncodeError> {
        self.event(Event::Start(start_tag(name, attrs)))
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<(), EncodeError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), EncodeError> {
        self.event(Event::Empty(start_tag(name, attrs)))
    }

    /// Writes `<name attrs>text</name>`.
    pub(crate) fn text(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), EncodeError> {
        self.open(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    pub(crate) fn finish(self) -> Result<String, EncodeError> {
        String::from_utf8(self.writer.into_inner()).map_err(EncodeError::xml)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), EncodeError> {
        self.writer.write_event(event).map_err(EncodeError::xml)
    }
}

fn start_tag<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &attr in attrs {
        start.push_attribute(attr);
    }
    start
}
