//! TMX 1.4 XML parsing and serialization for [`TmxDocument`].
//!
//! Reads `<header>` attributes and `<prop>` elements, and `<tu>` elements
//! with their `<note>`, `<prop>`, and `<tuv><seg>` children. Unknown
//! elements are skipped. Writing produces a stable document: header props
//! and units are emitted in model order with XML escaping applied.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{
    fs::File,
    io::{BufRead, Read, Write},
    path::Path,
};

use crate::{
    document::TmxDocument,
    error::Error,
    traits::Parser,
    types::{Header, TransUnit, Variant},
};

impl Parser for TmxDocument {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut doc = TmxDocument::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"header" => parse_header(e, &mut xml_reader, &mut doc.header)?,
                    b"tu" => {
                        let unit = parse_trans_unit(e, &mut xml_reader)?;
                        doc.add_unit(unit);
                    }
                    _ => {}
                },
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"header" => {
                    parse_header_attributes(e, &mut doc.header)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(doc)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        let mut tmx_start = BytesStart::new("tmx");
        tmx_start.push_attribute(("version", "1.4"));
        xml_writer.write_event(Event::Start(tmx_start))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        let mut header_start = BytesStart::new("header");
        if !self.header.creation_tool.is_empty() {
            header_start.push_attribute(("creationtool", self.header.creation_tool.as_str()));
        }
        header_start.push_attribute(("srclang", self.header.source_lang.as_str()));
        header_start.push_attribute(("adminlang", "en"));
        header_start.push_attribute(("segtype", "block"));
        header_start.push_attribute(("o-tmf", "tmx"));
        header_start.push_attribute(("datatype", "plaintext"));
        xml_writer.write_event(Event::Start(header_start))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for (key, value) in &self.header.props {
            write_prop(&mut xml_writer, key, value)?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("header")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        xml_writer.write_event(Event::Start(BytesStart::new("body")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for unit in self.iter() {
            write_trans_unit(&mut xml_writer, unit)?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("body")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("tmx")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }

    /// Override default file reading to support BOM-aware decoding (desktop
    /// tools write TMX as UTF-8 with BOM or UTF-16).
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}

fn parse_header_attributes(e: &BytesStart, header: &mut Header) -> Result<(), Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        match attr.key.as_ref() {
            b"srclang" => header.source_lang = attr.unescape_value()?.to_string(),
            b"creationtool" => header.creation_tool = attr.unescape_value()?.to_string(),
            _ => {}
        }
    }
    Ok(())
}

fn parse_header<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
    header: &mut Header,
) -> Result<(), Error> {
    parse_header_attributes(e, header)?;

    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"prop" => {
                let (key, value) = parse_prop(e, xml_reader)?;
                header.props.insert(key, value);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"header" => break,
            Ok(Event::Eof) => return Err(Error::invalid_document("unexpected EOF in header")),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(())
}

fn parse_trans_unit<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<TransUnit, Error> {
    let mut id = None;
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        if attr.key.as_ref() == b"tuid" {
            id = Some(attr.unescape_value()?.to_string());
        }
    }
    let id = id.ok_or_else(|| Error::DataMismatch("tu element missing 'tuid'".to_string()))?;

    let mut unit = TransUnit::new(id);
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"note" => unit.add_note(read_element_text(xml_reader, b"note")?),
                b"prop" => {
                    let (key, value) = parse_prop(e, xml_reader)?;
                    unit.props.insert(key, value);
                }
                b"tuv" => {
                    if let Some(variant) = parse_variant(e, xml_reader)? {
                        unit.set_variant(variant.lang, variant.text);
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"tu" => break,
            Ok(Event::Eof) => return Err(Error::invalid_document("unexpected EOF in tu")),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(unit)
}

fn parse_variant<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<Option<Variant>, Error> {
    let mut lang = None;
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        match attr.key.as_ref() {
            b"xml:lang" | b"lang" => lang = Some(attr.unescape_value()?.to_string()),
            _ => {}
        }
    }
    let lang =
        lang.ok_or_else(|| Error::DataMismatch("tuv element missing 'xml:lang'".to_string()))?;

    let mut buf = Vec::new();
    let mut text = None;
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"seg" => {
                text = Some(read_element_text(xml_reader, b"seg")?);
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"seg" => {
                text = Some(String::new());
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"tuv" => break,
            Ok(Event::Eof) => return Err(Error::invalid_document("unexpected EOF in tuv")),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(text.map(|t| Variant::new(lang, t)))
}

fn parse_prop<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<(String, String), Error> {
    let mut key = None;
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        if attr.key.as_ref() == b"type" {
            key = Some(attr.unescape_value()?.to_string());
        }
    }
    let key = key.ok_or_else(|| Error::DataMismatch("prop element missing 'type'".to_string()))?;
    let value = read_element_text(xml_reader, b"prop")?;
    Ok((key, value))
}

/// Collects the text content of the current element up to its end tag.
fn read_element_text<R: BufRead>(xml_reader: &mut Reader<R>, tag: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut value = String::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => value.push_str(&e.unescape().map_err(Error::XmlParse)?),
            Ok(Event::End(ref e)) if e.name().as_ref() == tag => break,
            Ok(Event::Eof) => return Err(Error::invalid_document("unexpected EOF")),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(value)
}

fn write_prop<W: Write>(xml_writer: &mut Writer<W>, key: &str, value: &str) -> Result<(), Error> {
    let mut elem = BytesStart::new("prop");
    elem.push_attribute(("type", key));
    xml_writer.write_event(Event::Start(elem))?;
    xml_writer.write_event(Event::Text(BytesText::new(value)))?;
    xml_writer.write_event(Event::End(BytesEnd::new("prop")))?;
    xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
    Ok(())
}

fn write_trans_unit<W: Write>(xml_writer: &mut Writer<W>, unit: &TransUnit) -> Result<(), Error> {
    let mut tu_start = BytesStart::new("tu");
    tu_start.push_attribute(("tuid", unit.id.as_str()));
    xml_writer.write_event(Event::Start(tu_start))?;
    xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

    for note in &unit.notes {
        xml_writer.write_event(Event::Start(BytesStart::new("note")))?;
        xml_writer.write_event(Event::Text(BytesText::new(note)))?;
        xml_writer.write_event(Event::End(BytesEnd::new("note")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
    }

    for (key, value) in &unit.props {
        write_prop(xml_writer, key, value)?;
    }

    for variant in &unit.variants {
        let mut tuv_start = BytesStart::new("tuv");
        tuv_start.push_attribute(("xml:lang", variant.lang.as_str()));
        xml_writer.write_event(Event::Start(tuv_start))?;
        xml_writer.write_event(Event::Start(BytesStart::new("seg")))?;
        xml_writer.write_event(Event::Text(BytesText::new(&variant.text)))?;
        xml_writer.write_event(Event::End(BytesEnd::new("seg")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("tuv")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
    }

    xml_writer.write_event(Event::End(BytesEnd::new("tu")))?;
    xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
    Ok(())
}
