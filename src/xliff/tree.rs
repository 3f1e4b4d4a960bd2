//! Order-preserving XML element tree backed by quick-xml.
//!
//! Parsing keeps every element, attribute, comment and text node so that
//! tool metadata in XLIFF headers survives a rewrite. Whitespace-only text
//! between elements is dropped and regenerated on output with two-space
//! indentation; text inside leaf or mixed-content elements is never touched.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

/// A node in element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

/// An XML element with its raw (possibly prefixed) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Malformed XML, located by byte offset into the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at byte {offset})")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

impl SyntaxError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self { offset, message: message.into() }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Vec::new(), children: Vec::new() }
    }

    /// Name without namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit_once(':').map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace an attribute in place, or append it when absent.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.local_name() == local)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.elements_mut().filter(move |el| el.local_name() == local)
    }

    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|el| el.local_name() == local)
    }

    /// Index into `children` of the first element with this local name.
    pub fn position_of(&self, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.local_name() == local))
    }

    pub fn insert_child(&mut self, index: usize, node: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }

    /// Drop child elements for which `keep` returns false. Other nodes stay.
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.children.retain(|node| match node {
            Node::Element(el) => keep(el),
            _ => true,
        });
    }

    /// Concatenated text of all descendant text and CDATA nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }

    /// Replace all content with a single text node (none for empty text).
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    fn has_text_content(&self) -> bool {
        self.children
            .iter()
            .any(|node| matches!(node, Node::Text(_) | Node::CData(_)))
    }

    /// Strip indentation whitespace from element-only content.
    fn normalize_whitespace(&mut self) {
        let has_elements = self.children.iter().any(|n| matches!(n, Node::Element(_)));
        let only_blank_text = self.children.iter().all(|n| match n {
            Node::Text(t) => t.trim().is_empty(),
            _ => true,
        });
        if has_elements && only_blank_text {
            self.children.retain(|n| !matches!(n, Node::Text(_)));
        }
    }

    fn start_tag(&self) -> BytesStart<'_> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute(Attribute {
                key: QName(key.as_bytes()),
                value: Cow::Owned(escape_attr(value).into_bytes()),
            });
        }
        start
    }
}

fn escape_attr(value: &str) -> String {
    partial_escape(value).replace('"', "&quot;")
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        // Adjacent text (e.g. split around an entity) is merged
        if let (Node::Text(add), Some(Node::Text(prev))) = (&node, parent.children.last_mut()) {
            prev.push_str(add);
            return;
        }
        parent.children.push(node);
    }
}

fn element_from(start: &BytesStart<'_>, offset: usize) -> Result<Element, SyntaxError> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| SyntaxError::new(offset, e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| SyntaxError::new(offset, e.to_string()))?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

/// Parse a complete document and return its root element.
pub fn parse(text: &str) -> Result<Element, SyntaxError> {
    let mut reader = Reader::from_str(text);
    reader.check_end_names(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| SyntaxError::new(reader.buffer_position(), e.to_string()))?;

        match event {
            Event::Start(ref e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(SyntaxError::new(offset, "more than one root element"));
                }
                stack.push(element_from(e, offset)?);
            }
            Event::Empty(ref e) => {
                let el = element_from(e, offset)?;
                if stack.is_empty() {
                    if root.is_some() {
                        return Err(SyntaxError::new(offset, "more than one root element"));
                    }
                    root = Some(el);
                } else {
                    push_child(&mut stack, Node::Element(el));
                }
            }
            Event::End(_) => {
                let Some(mut el) = stack.pop() else {
                    return Err(SyntaxError::new(offset, "unexpected closing tag"));
                };
                el.normalize_whitespace();
                if stack.is_empty() {
                    root = Some(el);
                } else {
                    push_child(&mut stack, Node::Element(el));
                }
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| SyntaxError::new(offset, err.to_string()))?;
                if stack.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(SyntaxError::new(offset, "text outside the root element"));
                    }
                } else {
                    push_child(&mut stack, Node::Text(text.into_owned()));
                }
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|err| SyntaxError::new(offset, err.to_string()))?
                    .to_string();
                push_child(&mut stack, Node::CData(text));
            }
            Event::Comment(e) => {
                push_child(&mut stack, Node::Comment(String::from_utf8_lossy(&e).into_owned()));
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(SyntaxError::new(
            text.len(),
            format!("unexpected end of document, <{}> is not closed", open.name),
        ));
    }

    root.ok_or_else(|| SyntaxError::new(0, "document has no root element"))
}

/// Serialize with an XML declaration, two-space indentation and a final newline.
pub fn write(root: &Element) -> Result<String, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| quick_xml::Error::NonDecodable(Some(e.utf8_error())))
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &Element) -> Result<(), quick_xml::Error> {
    if el.children.is_empty() {
        writer.write_event(Event::Empty(el.start_tag()))?;
        return Ok(());
    }

    writer.write_event(Event::Start(el.start_tag()))?;

    if el.has_text_content() {
        // Text content goes out verbatim on one line; the indenting writer
        // would otherwise push whitespace into translatable strings.
        let mut inline = String::new();
        for node in &el.children {
            write_inline(&mut inline, node);
        }
        writer.write_event(Event::Text(BytesText::from_escaped(inline)))?;
    } else {
        for node in &el.children {
            match node {
                Node::Element(child) => write_element(writer, child)?,
                Node::Comment(c) => {
                    writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?
                }
                Node::Text(_) | Node::CData(_) => {}
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}

fn write_inline(out: &mut String, node: &Node) {
    match node {
        Node::Text(t) => out.push_str(&partial_escape(t)),
        Node::CData(t) => {
            out.push_str("<![CDATA[");
            out.push_str(t);
            out.push_str("]]>");
        }
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in &el.attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            if el.children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &el.children {
                write_inline(out, child);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}
