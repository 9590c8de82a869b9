//! Support for Android `strings.xml` documents.
//!
//! Only `<string>` elements are read. Their text keeps surrounding
//! whitespace and inline markup (`<b>`, `<xliff:g>`) as written; entity
//! references in character data are decoded. Other children of
//! `<resources>` (`<plurals>`, `<string-array>`, comments) are skipped when
//! reading and kept untouched by [`patch`].

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use encoding_rs_io::DecodeReaderBytesBuilder;
use quick_xml::{
    Decoder, Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;

use crate::{
    error::Error,
    escape::escape_text,
    traits::TextFormat,
    types::{Locale, StringItem},
};

pub const ELEMENT_RESOURCES: &str = "resources";
pub const ELEMENT_STRING: &str = "string";
pub const ATTRIBUTE_NAME: &str = "name";

/// Indent width used by [`TextFormat::render`].
pub const DEFAULT_INDENT: usize = 4;

/// Placeholder path for structural errors raised while reading from memory.
const IN_MEMORY: &str = "<input>";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Format {
    pub items: Vec<StringItem>,
}

impl Format {
    pub fn new(items: Vec<StringItem>) -> Self {
        Self { items }
    }

    pub fn into_locale(self, code: impl Into<String>) -> Locale {
        Locale::new(code, self.items)
    }

    /// Writes a fresh document with the given indent width.
    pub fn write_with_indent<W: Write>(&self, writer: W, indent: usize) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(writer, b' ', indent);
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new(ELEMENT_RESOURCES)))?;
        for item in &self.items {
            write_string(&mut xml_writer, item)?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new(ELEMENT_RESOURCES)))?;
        xml_writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

impl From<&Locale> for Format {
    fn from(locale: &Locale) -> Self {
        Self::new(locale.items.clone())
    }
}

impl TextFormat for Format {
    /// Parse from any reader. The root element must be `<resources>`.
    fn parse<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut skip_buf = Vec::new();
        let mut root_seen = false;
        let mut items = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) if !root_seen => {
                    check_root(&e)?;
                    root_seen = true;
                }
                Event::Empty(e) if !root_seen => {
                    check_root(&e)?;
                    root_seen = true;
                }
                Event::Start(e) if e.name().as_ref() == ELEMENT_STRING.as_bytes() => {
                    let name = string_name(&e, xml_reader.decoder())?;
                    let text = read_body(&mut xml_reader)?.text;
                    items.push(StringItem { name, text });
                }
                Event::Empty(e) if e.name().as_ref() == ELEMENT_STRING.as_bytes() => {
                    items.push(StringItem {
                        name: string_name(&e, xml_reader.decoder())?,
                        text: String::new(),
                    });
                }
                Event::Start(e) => {
                    let end = e.to_end().into_owned();
                    xml_reader.read_to_end_into(end.name(), &mut skip_buf)?;
                    skip_buf.clear();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !root_seen {
            return Err(Error::structural(IN_MEMORY, "missing <resources> root element"));
        }
        Ok(Format { items })
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        Self::parse(open_decoded(path)?).map_err(|e| with_path(e, path))
    }

    /// Write to any writer with the default indent.
    fn render<W: Write>(&self, writer: W) -> Result<(), Error> {
        self.write_with_indent(writer, DEFAULT_INDENT)
    }
}

/// Rewrites an existing document with `items` applied.
///
/// A `<string>` whose name is in `items` and whose text differs gets its
/// content replaced in place; a text equal to the current one, or to its
/// quote-escaped form, leaves the element as it was. Names the document
/// lacks are appended before `</resources>` in `items` order.
///
/// Every other element is copied through, the content of `<string>` and
/// `<item>` elements byte for byte. Whitespace-only text between elements
/// is dropped and the output is re-indented with `indent` spaces.
pub fn patch<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    items: &[StringItem],
    indent: usize,
) -> Result<(), Error> {
    let texts: HashMap<&str, &StringItem> = items
        .iter()
        .map(|item| (item.name.as_str(), item))
        .collect();
    let mut patched: HashSet<String> = HashSet::new();

    let mut xml_reader = Reader::from_reader(reader);
    let mut xml_writer = Writer::new_with_indent(writer, b' ', indent);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut root_seen = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) if depth == 0 => {
                check_root(&e)?;
                root_seen = true;
                depth = 1;
                xml_writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) if depth == 0 => {
                check_root(&e)?;
                root_seen = true;
                xml_writer.write_event(Event::Start(e.into_owned()))?;
                append_missing(&mut xml_writer, items, &patched)?;
                xml_writer.write_event(Event::End(BytesEnd::new(ELEMENT_RESOURCES)))?;
            }
            Event::Start(e) if depth == 1 && e.name().as_ref() == ELEMENT_STRING.as_bytes() => {
                let name = string_name(&e, xml_reader.decoder())?;
                let start = e.into_owned();
                let body = read_body(&mut xml_reader)?;
                match texts.get(name.as_str()) {
                    Some(item) if !is_unchanged(&item.text, &body.text) => {
                        xml_writer.write_event(Event::Start(start))?;
                        write_text(&mut xml_writer, &item.text)?;
                        xml_writer.write_event(Event::End(BytesEnd::new(ELEMENT_STRING)))?;
                    }
                    _ => copy_element(&mut xml_writer, start, &body.raw)?,
                }
                if texts.contains_key(name.as_str()) {
                    patched.insert(name);
                }
            }
            Event::Empty(e) if depth == 1 && e.name().as_ref() == ELEMENT_STRING.as_bytes() => {
                let name = string_name(&e, xml_reader.decoder())?;
                match texts.get(name.as_str()) {
                    Some(item) if !item.text.is_empty() => {
                        xml_writer.write_event(Event::Start(e.into_owned()))?;
                        write_text(&mut xml_writer, &item.text)?;
                        xml_writer.write_event(Event::End(BytesEnd::new(ELEMENT_STRING)))?;
                    }
                    _ => xml_writer.write_event(Event::Empty(e))?,
                }
                if texts.contains_key(name.as_str()) {
                    patched.insert(name);
                }
            }
            // `<item>` of plurals and arrays: text content, copied as is.
            Event::Start(e) if depth >= 2 => {
                let start = e.into_owned();
                let body = read_body(&mut xml_reader)?;
                copy_element(&mut xml_writer, start, &body.raw)?;
            }
            Event::Start(e) => {
                depth += 1;
                xml_writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                if depth == 1 {
                    append_missing(&mut xml_writer, items, &patched)?;
                }
                depth = depth.saturating_sub(1);
                xml_writer.write_event(Event::End(e))?;
            }
            Event::Text(e) if e.iter().all(u8::is_ascii_whitespace) => {}
            Event::Eof => break,
            other => xml_writer.write_event(other)?,
        }
        buf.clear();
    }

    if !root_seen {
        return Err(Error::structural(IN_MEMORY, "missing <resources> root element"));
    }
    xml_writer.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Applies `items` to the document at `path` (see [`patch`]) and writes it back.
pub fn patch_file<P: AsRef<Path>>(path: P, items: &[StringItem], indent: usize) -> Result<(), Error> {
    let path = path.as_ref();
    let mut output = Vec::new();
    patch(open_decoded(path)?, &mut output, items, indent).map_err(|e| with_path(e, path))?;
    std::fs::write(path, output)?;
    Ok(())
}

fn open_decoded(path: &Path) -> Result<impl BufRead, Error> {
    let file = File::open(path)?;
    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding_rs::UTF_8))
        .bom_override(true)
        .build(file);
    Ok(BufReader::new(decoder))
}

fn with_path(error: Error, path: &Path) -> Error {
    match error {
        Error::StructuralRead { reason, .. } => Error::structural(path, reason),
        other => other,
    }
}

fn check_root(e: &BytesStart) -> Result<(), Error> {
    if e.name().as_ref() == ELEMENT_RESOURCES.as_bytes() {
        return Ok(());
    }
    Err(Error::structural(
        IN_MEMORY,
        format!(
            "expected <{}> root element, found <{}>",
            ELEMENT_RESOURCES,
            String::from_utf8_lossy(e.name().as_ref())
        ),
    ))
}

fn string_name(e: &BytesStart, decoder: Decoder) -> Result<String, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == ATTRIBUTE_NAME.as_bytes() {
            let name = attr.decode_and_unescape_value(decoder)?.into_owned();
            if name.is_empty() {
                break;
            }
            return Ok(name);
        }
    }
    Err(Error::InvalidResource(
        "string tag missing 'name'".to_string(),
    ))
}

/// Content of one element, read up to its end tag.
struct Body {
    /// Decoded character data with inline tags kept as markup.
    text: String,
    /// The content exactly as it appears in the document.
    raw: String,
}

fn read_body<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<Body, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut raw = Writer::new(Vec::new());
    let mut depth = 0usize;
    loop {
        let event = xml_reader.read_event_into(&mut buf)?;
        match &event {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e)),
            Event::Start(e) => {
                depth += 1;
                text.push('<');
                text.push_str(&String::from_utf8_lossy(e));
                text.push('>');
            }
            Event::Empty(e) => {
                text.push('<');
                text.push_str(&String::from_utf8_lossy(e));
                text.push_str("/>");
            }
            Event::End(_) if depth == 0 => break,
            Event::End(e) => {
                depth -= 1;
                text.push_str("</");
                text.push_str(&String::from_utf8_lossy(e));
                text.push('>');
            }
            Event::Eof => {
                return Err(Error::InvalidResource(
                    "unexpected end of document inside an element".to_string(),
                ));
            }
            _ => {}
        }
        raw.write_event(event)?;
        buf.clear();
    }
    Ok(Body {
        text,
        raw: String::from_utf8_lossy(&raw.into_inner()).into_owned(),
    })
}

// Incoming texts are quote-escaped; the document may hold either form.
fn is_unchanged(incoming: &str, current: &str) -> bool {
    incoming == current || incoming == escape_text(current)
}

fn copy_element<W: Write>(
    xml_writer: &mut Writer<W>,
    start: BytesStart<'static>,
    raw: &str,
) -> Result<(), Error> {
    let end = start.to_end().into_owned();
    xml_writer.write_event(Event::Start(start))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped(raw)))?;
    xml_writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_string<W: Write>(xml_writer: &mut Writer<W>, item: &StringItem) -> Result<(), Error> {
    let mut elem = BytesStart::new(ELEMENT_STRING);
    elem.push_attribute((ATTRIBUTE_NAME, item.name.as_str()));
    xml_writer.write_event(Event::Start(elem))?;
    write_text(xml_writer, &item.text)?;
    xml_writer.write_event(Event::End(BytesEnd::new(ELEMENT_STRING)))?;
    Ok(())
}

// Quotes are left as the escaper made them. Text holding well-formed inline
// markup keeps its tags; anything else has `<`, `>` and `&` escaped.
fn write_text<W: Write>(xml_writer: &mut Writer<W>, text: &str) -> Result<(), Error> {
    let content = match markup_content(text) {
        Some(markup) => markup,
        None => partial_escape(text).into_owned(),
    };
    xml_writer.write_event(Event::Text(BytesText::from_escaped(content)))?;
    Ok(())
}

/// Escapes character data outside tags and drops the backslash the escaper
/// put before quotes inside tags. `None` when the result is not a balanced
/// markup fragment.
fn markup_content(text: &str) -> Option<String> {
    if !text.contains('<') {
        return None;
    }
    let mut content = String::with_capacity(text.len() + 8);
    let mut in_tag = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' if !in_tag => {
                in_tag = true;
                content.push(c);
            }
            '>' if in_tag => {
                in_tag = false;
                content.push(c);
            }
            '\\' if in_tag && matches!(chars.peek(), Some('"' | '\'')) => {}
            '&' if !in_tag => content.push_str("&amp;"),
            '>' => content.push_str("&gt;"),
            _ => content.push(c),
        }
    }
    is_balanced_fragment(&content).then_some(content)
}

fn is_balanced_fragment(content: &str) -> bool {
    let wrapped = format!("<{ELEMENT_STRING}>{content}</{ELEMENT_STRING}>");
    let mut reader = Reader::from_str(&wrapped);
    let mut depth = 0usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Decl(_) | Event::PI(_) | Event::DocType(_)) => return false,
            Ok(Event::Eof) => return depth == 0,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

fn append_missing<W: Write>(
    xml_writer: &mut Writer<W>,
    items: &[StringItem],
    patched: &HashSet<String>,
) -> Result<(), Error> {
    let mut appended = HashSet::new();
    for item in items {
        if patched.contains(&item.name) || !appended.insert(item.name.as_str()) {
            continue;
        }
        write_string(xml_writer, item)?;
    }
    Ok(())
}
