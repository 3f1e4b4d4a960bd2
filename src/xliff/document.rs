//! XLIFF 1.2 document model: `file` sections holding `trans-unit` entries.

use std::fs;
use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};

use super::tree::{self, Element, Node};

/// Namespace URI of XLIFF 1.2.
pub const XLIFF_NS: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// A document that is not well-formed XML or not XLIFF at all.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("can't parse {name}: {message}")]
#[diagnostic(code(l10nkit::xliff::parse))]
pub struct ParseError {
    pub name: String,
    pub message: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,
}

impl ParseError {
    fn new(name: &str, text: &str, offset: usize, message: String) -> Self {
        let offset = offset.min(text.len());
        Self {
            name: name.to_string(),
            message,
            src: NamedSource::new(name, text.to_string()),
            span: (offset, 0).into(),
        }
    }
}

/// Failure to bring a document into memory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("can't read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XliffDocument {
    root: Element,
}

impl XliffDocument {
    /// Parse from text; `name` labels diagnostics (usually the file path).
    pub fn parse(name: &str, text: &str) -> Result<Self, ParseError> {
        let root = tree::parse(text)
            .map_err(|e| ParseError::new(name, text, e.offset, e.message))?;

        if root.local_name() != "xliff" {
            return Err(ParseError::new(
                name,
                text,
                0,
                format!("root element is <{}>, expected <xliff>", root.name),
            ));
        }
        if root.attr("xmlns").is_some_and(|ns| ns != XLIFF_NS) {
            tracing::warn!(document = name, "unexpected XLIFF namespace");
        }

        Ok(Self { root })
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        Ok(Self::parse(&path.display().to_string(), &text)?)
    }

    pub fn to_xml(&self) -> Result<String, quick_xml::Error> {
        tree::write(&self.root)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// `file` sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Element> {
        self.root.children_named("file")
    }

    pub fn sections_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.root.children_named_mut("file")
    }

    pub fn section_count(&self) -> usize {
        self.sections().count()
    }

    /// Remove sections for which `keep` is false, returning how many went.
    pub fn retain_sections(&mut self, mut keep: impl FnMut(&Element) -> bool) -> usize {
        let before = self.section_count();
        self.root
            .retain_elements(|el| el.local_name() != "file" || keep(el));
        before - self.section_count()
    }
}

/// Every `trans-unit` below a section, including ones nested in `group`s.
pub fn units(section: &Element) -> Vec<&Element> {
    let mut out = Vec::new();
    collect_units(section, &mut out);
    out
}

fn collect_units<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.elements() {
        if child.local_name() == "trans-unit" {
            out.push(child);
        } else {
            collect_units(child, out);
        }
    }
}

pub fn units_mut(section: &mut Element) -> Vec<&mut Element> {
    let mut out = Vec::new();
    collect_units_mut(section, &mut out);
    out
}

fn collect_units_mut<'a>(el: &'a mut Element, out: &mut Vec<&'a mut Element>) {
    for child in el.elements_mut() {
        if child.local_name() == "trans-unit" {
            out.push(child);
        } else {
            collect_units_mut(child, out);
        }
    }
}

/// Remove units for which `keep` is false, returning how many went.
pub fn retain_units(section: &mut Element, keep: &mut impl FnMut(&Element) -> bool) -> usize {
    let before = section.children.len();
    section.retain_elements(|el| el.local_name() != "trans-unit" || keep(el));
    let mut removed = before - section.children.len();

    for child in section.elements_mut() {
        if child.local_name() != "trans-unit" {
            removed += retain_units(child, keep);
        }
    }
    removed
}

/// Accessors for `file` elements.
pub trait SectionExt {
    /// The `original` attribute, empty when absent.
    fn original(&self) -> &str;
    fn target_language(&self) -> Option<&str>;
}

impl SectionExt for Element {
    fn original(&self) -> &str {
        self.attr("original").unwrap_or_default()
    }

    fn target_language(&self) -> Option<&str> {
        self.attr("target-language").filter(|lang| !lang.is_empty())
    }
}

/// Accessors and edits for `trans-unit` elements.
pub trait TransUnitExt {
    fn unit_id(&self) -> Option<&str>;
    fn source_text(&self) -> String;
    fn targets(&self) -> Vec<&Element>;
    fn notes(&self) -> Vec<&Element>;
    fn has_target(&self) -> bool;

    /// Set the text of every target, creating one right after `source`
    /// when the unit has none.
    fn set_target_text(&mut self, text: &str);

    /// Remove all targets, returning how many there were.
    fn remove_targets(&mut self) -> usize;

    /// Replace the text of existing notes. Returns false if nothing changed.
    fn set_note_text(&mut self, text: &str) -> bool;
}

impl TransUnitExt for Element {
    fn unit_id(&self) -> Option<&str> {
        self.attr("id")
    }

    fn source_text(&self) -> String {
        self.child("source").map(Element::text).unwrap_or_default()
    }

    fn targets(&self) -> Vec<&Element> {
        self.children_named("target").collect()
    }

    fn notes(&self) -> Vec<&Element> {
        self.children_named("note").collect()
    }

    fn has_target(&self) -> bool {
        self.child("target").is_some()
    }

    fn set_target_text(&mut self, text: &str) {
        if self.has_target() {
            for target in self.children_named_mut("target") {
                target.set_text(text);
            }
            return;
        }

        let source = self.position_of("source");
        let name = match source.and_then(|i| match &self.children[i] {
            Node::Element(el) => el.prefix(),
            _ => None,
        }) {
            Some(prefix) => format!("{prefix}:target"),
            None => "target".to_string(),
        };

        let mut target = Element::new(name);
        target.set_text(text);
        self.insert_child(source.map_or(0, |i| i + 1), Node::Element(target));
    }

    fn remove_targets(&mut self) -> usize {
        let before = self.children.len();
        self.retain_elements(|el| el.local_name() != "target");
        before - self.children.len()
    }

    fn set_note_text(&mut self, text: &str) -> bool {
        let mut changed = false;
        for note in self.children_named_mut("note") {
            if note.text() != text {
                note.set_text(text);
                changed = true;
            }
        }
        changed
    }
}
