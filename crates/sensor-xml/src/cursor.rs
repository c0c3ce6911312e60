use std::fmt::Display;
use std::io::BufRead;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, XmlError};

/// A start (or empty) element reached by the cursor.
///
/// Elements are detached snapshots of the tag: name, unescaped attributes and
/// the nesting depth at which the tag was read. They stay valid after the
/// cursor has moved past them and are used to scope further cursor calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    depth: usize,
    empty: bool,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depth of the element; the root element has depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True for self-closing tags, which have neither children nor text.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn require_attr(&self, key: &str) -> Result<&str> {
        self.attr(key).ok_or_else(|| XmlError::MissingAttribute {
            element: self.name.clone(),
            attribute: key.to_string(),
        })
    }

    /// Parses an optional attribute; a present but unparsable value is an
    /// [`XmlError::InvalidAttribute`].
    pub fn parse_attr<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.attr(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|error| self.invalid_attr(key, raw, error)),
        }
    }

    /// Builds the error reported for an attribute value the caller rejects.
    pub fn invalid_attr(&self, key: &str, value: &str, reason: impl Display) -> XmlError {
        XmlError::InvalidAttribute {
            element: self.name.clone(),
            attribute: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

enum Step {
    Open(Element),
    Leaf(Element),
    Close,
    Text(String),
    Eof,
}

/// Forward-only hierarchical cursor over an XML document.
pub struct XmlCursor<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    open: Vec<String>,
    seen_root: bool,
}

impl<R: BufRead> XmlCursor<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            open: Vec::new(),
            seen_root: false,
        }
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Advances to the document element.
    pub fn root(&mut self) -> Result<Element> {
        loop {
            match self.step()? {
                Step::Open(element) | Step::Leaf(element) => return Ok(element),
                Step::Close | Step::Text(_) => {}
                Step::Eof => return Err(XmlError::NoRootElement),
            }
        }
    }

    /// Next direct child of `parent`, skipping over the unread remainder of
    /// any earlier child. Returns `None` once `parent` is closed.
    pub fn next_child(&mut self, parent: &Element) -> Result<Option<Element>> {
        self.next_matching(parent, |element| element.depth == parent.depth + 1)
    }

    /// Next direct child of `parent` named `name`.
    pub fn next_child_named(&mut self, parent: &Element, name: &str) -> Result<Option<Element>> {
        self.next_matching(parent, |element| {
            element.depth == parent.depth + 1 && element.name == name
        })
    }

    /// Next element named `name` at any depth below `ancestor`.
    pub fn next_descendant_named(
        &mut self,
        ancestor: &Element,
        name: &str,
    ) -> Result<Option<Element>> {
        self.next_matching(ancestor, |element| element.name == name)
    }

    /// Collects all text below `element` and consumes it.
    pub fn text(&mut self, element: &Element) -> Result<String> {
        let mut text = String::new();
        if !self.is_inside(element) {
            return Ok(text);
        }
        loop {
            match self.step()? {
                Step::Text(chunk) => text.push_str(&chunk),
                Step::Open(_) | Step::Leaf(_) => {}
                Step::Close => {
                    if self.depth() < element.depth {
                        return Ok(text);
                    }
                }
                Step::Eof => return Ok(text),
            }
        }
    }

    /// Consumes the rest of `element` without looking at it.
    pub fn skip(&mut self, element: &Element) -> Result<()> {
        self.next_matching(element, |_| false).map(|_| ())
    }

    /// Reads the document to its end. Anything but whitespace after the
    /// document element is an error.
    pub fn finish(&mut self) -> Result<()> {
        loop {
            match self.step()? {
                Step::Text(text) if self.open.is_empty() && !text.trim().is_empty() => {
                    return Err(XmlError::TrailingContent {
                        position: self.reader.buffer_position() as u64,
                        found: text.trim().to_string(),
                    });
                }
                Step::Eof => return Ok(()),
                Step::Open(_) | Step::Leaf(_) | Step::Close | Step::Text(_) => {}
            }
        }
    }

    fn is_inside(&self, element: &Element) -> bool {
        !element.empty && self.depth() >= element.depth
    }

    fn next_matching<F>(&mut self, scope: &Element, matches: F) -> Result<Option<Element>>
    where
        F: Fn(&Element) -> bool,
    {
        if !self.is_inside(scope) {
            return Ok(None);
        }
        loop {
            match self.step()? {
                Step::Open(element) | Step::Leaf(element) => {
                    if matches(&element) {
                        return Ok(Some(element));
                    }
                }
                Step::Close => {
                    if self.depth() < scope.depth {
                        return Ok(None);
                    }
                }
                Step::Text(_) => {}
                Step::Eof => return Ok(None),
            }
        }
    }

    fn step(&mut self) -> Result<Step> {
        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|source| XmlError::Syntax {
                    position: self.reader.buffer_position() as u64,
                    source,
                })?;
            let position = self.reader.buffer_position() as u64;
            let step = match event {
                Event::Start(start) => {
                    let element = build_element(&start, self.open.len() + 1, false, position)?;
                    self.enter_top_level(&element, position)?;
                    self.open.push(element.name.clone());
                    Step::Open(element)
                }
                Event::Empty(start) => {
                    let element = build_element(&start, self.open.len() + 1, true, position)?;
                    self.enter_top_level(&element, position)?;
                    Step::Leaf(element)
                }
                Event::End(end) => {
                    if self.open.pop().is_none() {
                        return Err(XmlError::TrailingContent {
                            position,
                            found: format!("</{}>", String::from_utf8_lossy(end.name().as_ref())),
                        });
                    }
                    Step::Close
                }
                Event::Text(text) => Step::Text(unescape(std::str::from_utf8(&text)?)?.into_owned()),
                Event::CData(data) => Step::Text(std::str::from_utf8(&data)?.to_string()),
                Event::GeneralRef(reference) => {
                    let name = std::str::from_utf8(&reference)?;
                    Step::Text(unescape(&format!("&{name};"))?.into_owned())
                }
                Event::Eof => match self.open.last() {
                    Some(element) => {
                        return Err(XmlError::UnexpectedEof {
                            element: element.clone(),
                        });
                    }
                    None => Step::Eof,
                },
                _ => continue,
            };
            return Ok(step);
        }
    }

    /// A document has exactly one top-level element.
    fn enter_top_level(&mut self, element: &Element, position: u64) -> Result<()> {
        if element.depth != 1 {
            return Ok(());
        }
        if self.seen_root {
            return Err(XmlError::TrailingContent {
                position,
                found: format!("<{}>", element.name),
            });
        }
        self.seen_root = true;
        Ok(())
    }
}

fn build_element(
    start: &BytesStart<'_>,
    depth: usize,
    empty: bool,
    position: u64,
) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|source| XmlError::Attribute { position, source })?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attribute.value)?;
        attributes.push((key, unescape(raw)?.into_owned()));
    }
    Ok(Element {
        name,
        attributes,
        depth,
        empty,
    })
}
