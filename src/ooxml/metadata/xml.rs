//! Namespace-aware scanning and rewriting of property parts.
//!
//! A property part is a root element whose direct children are the
//! properties. Scanning records, for every direct child, its resolved name,
//! its byte ranges in the source, and its text when it has no element
//! children. Rewrites splice new bytes into those ranges, so declarations,
//! comments, processing instructions and unknown children pass through
//! untouched.

use crate::common::xml::{Splicer, escape_xml, resolve_reference, unescape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::metadata::value::format_timestamp;
use crate::ooxml::opc::constants::namespace as ns;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::ops::Range;

/// One namespace declaration; an empty prefix is the default namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    pub prefix: String,
    pub uri: String,
}

/// Name, attributes and text of a scanned element.
#[derive(Debug, Clone)]
pub(crate) struct ElementInfo {
    pub qname: String,
    pub namespace: Option<String>,
    pub local_name: String,
    /// Non-namespace attributes, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Declarations made on this element
    pub bindings: Vec<Binding>,
    /// Character data, or `None` when the element has element children
    pub text: Option<String>,
}

impl ElementInfo {
    /// Whether the element has this namespace URI and local name.
    #[inline]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// Attribute value by qualified name.
    pub fn attribute(&self, qname: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == qname)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value by local name, ignoring any prefix.
    pub fn attribute_local(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| split_qname(k).1 == local_name)
            .map(|(_, v)| v.as_str())
    }

    /// Prefix of the element name, if any.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        split_qname(&self.qname).0
    }
}

/// A direct child of the root.
#[derive(Debug, Clone)]
pub(crate) struct Child {
    pub element: ElementInfo,
    /// The whole element, tags included
    pub outer: Range<usize>,
    /// Bytes between start and end tag; `None` for an empty-element tag
    pub content: Option<Range<usize>>,
    /// First element child, for typed values such as `<vt:lpwstr>`
    pub first_child: Option<ElementInfo>,
}

/// How the root element is closed.
#[derive(Debug, Clone)]
enum RootClose {
    /// Offset of `</root>`
    EndTag(usize),
    /// Range of the `/>` that closes `<root/>`
    EmptyTag(Range<usize>),
}

/// A scanned property part.
#[derive(Debug)]
pub(crate) struct PropertyPart<'a> {
    source: &'a [u8],
    pub root: ElementInfo,
    pub children: Vec<Child>,
    close: RootClose,
}

impl<'a> PropertyPart<'a> {
    /// Scan a part.
    ///
    /// Fails with `OoxmlError::Xml` when the part is not well-formed.
    pub fn scan(source: &'a [u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(source);

        let mut scopes: Vec<Vec<Binding>> = Vec::new();
        let mut root: Option<ElementInfo> = None;
        let mut close: Option<RootClose> = None;
        let mut children = Vec::new();
        let mut current: Option<Child> = None;
        let mut in_first_child = false;

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader.read_event()?;
            let end = reader.buffer_position() as usize;
            let depth = scopes.len();

            match &event {
                Event::Start(e) => {
                    if depth == 0 && root.is_some() {
                        return Err(OoxmlError::Xml("More than one root element".to_string()));
                    }
                    let info = element_info(e, &scopes)?;
                    scopes.push(info.bindings.clone());
                    match depth {
                        0 => root = Some(info),
                        1 => {
                            current = Some(Child {
                                element: info,
                                outer: start..end,
                                content: Some(end..end),
                                first_child: None,
                            });
                        },
                        2 => {
                            if let Some(child) = current.as_mut() {
                                child.element.text = None;
                                in_first_child = child.first_child.is_none();
                                if in_first_child {
                                    child.first_child = Some(info);
                                }
                            }
                        },
                        3 if in_first_child => {
                            if let Some(first) = current.as_mut().and_then(|c| c.first_child.as_mut()) {
                                first.text = None;
                            }
                        },
                        _ => {},
                    }
                },
                Event::Empty(e) => {
                    if depth == 0 && root.is_some() {
                        return Err(OoxmlError::Xml("More than one root element".to_string()));
                    }
                    let info = element_info(e, &scopes)?;
                    match depth {
                        0 => {
                            root = Some(info);
                            close = Some(RootClose::EmptyTag(end - 2..end));
                        },
                        1 => children.push(Child {
                            element: info,
                            outer: start..end,
                            content: None,
                            first_child: None,
                        }),
                        2 => {
                            if let Some(child) = current.as_mut() {
                                child.element.text = None;
                                if child.first_child.is_none() {
                                    child.first_child = Some(info);
                                }
                            }
                        },
                        3 if in_first_child => {
                            if let Some(first) = current.as_mut().and_then(|c| c.first_child.as_mut()) {
                                first.text = None;
                            }
                        },
                        _ => {},
                    }
                },
                Event::End(_) => {
                    scopes.pop();
                    match depth {
                        1 => close = Some(RootClose::EndTag(start)),
                        2 => {
                            if let Some(mut child) = current.take() {
                                if let Some(content) = child.content.as_mut() {
                                    content.end = start;
                                }
                                child.outer.end = end;
                                children.push(child);
                            }
                        },
                        3 => in_first_child = false,
                        _ => {},
                    }
                },
                Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                    let piece = character_data(&source[start..end], &event)?;
                    let target = match depth {
                        2 => current.as_mut().and_then(|c| c.element.text.as_mut()),
                        3 if in_first_child => current
                            .as_mut()
                            .and_then(|c| c.first_child.as_mut())
                            .and_then(|f| f.text.as_mut()),
                        _ => None,
                    };
                    if let Some(text) = target {
                        text.push_str(&piece);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        match (root, close) {
            (Some(root), Some(close)) if scopes.is_empty() => Ok(Self {
                source,
                root,
                children,
                close,
            }),
            (None, _) => Err(OoxmlError::Xml("Part has no root element".to_string())),
            _ => Err(OoxmlError::Xml(
                "Unexpected end of part inside an element".to_string(),
            )),
        }
    }

    /// Fail unless the root element has the given name.
    pub fn expect_root(&self, namespace: &str, local_name: &str) -> Result<()> {
        if self.root.is(namespace, local_name) {
            Ok(())
        } else {
            Err(OoxmlError::Xml(format!(
                "Expected root element {{{}}}{}, found {}",
                namespace, local_name, self.root.qname
            )))
        }
    }

    /// Direct children with this namespace URI and local name.
    pub fn children_named<'s>(
        &'s self,
        namespace: &'s str,
        local_name: &'s str,
    ) -> impl Iterator<Item = &'s Child> + 's {
        self.children
            .iter()
            .filter(move |c| c.element.is(namespace, local_name))
    }

    /// Prefix the root scope binds to `uri`, if any.
    ///
    /// The root's own prefix wins when it maps to `uri`.
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        if self.root.namespace.as_deref() == Some(uri) {
            return Some(self.root.prefix().unwrap_or(""));
        }
        self.root
            .bindings
            .iter()
            .find(|b| b.uri == uri)
            .map(|b| b.prefix.as_str())
    }

    /// Name for a new element in `uri`, plus the declaration it needs when the
    /// root scope does not bind `uri`.
    pub fn qualified_name(&self, uri: &str, local_name: &str, preferred_prefix: &str) -> (String, String) {
        match self.prefix_for(uri) {
            Some("") => (local_name.to_string(), String::new()),
            Some(prefix) => (format!("{}:{}", prefix, local_name), String::new()),
            None => (
                format!("{}:{}", preferred_prefix, local_name),
                format!(r#" xmlns:{}="{}""#, preferred_prefix, uri),
            ),
        }
    }

    /// Replace the content of a child, reopening an empty-element tag if needed.
    pub fn replace_content(&self, splicer: &mut Splicer, child: &Child, content_xml: String) -> Result<()> {
        match &child.content {
            Some(range) => splicer.replace(range.clone(), content_xml),
            None => {
                let raw = std::str::from_utf8(&self.source[child.outer.clone()])
                    .map_err(|e| OoxmlError::Xml(format!("Invalid UTF-8 in element: {}", e)))?;
                let open = raw.trim_end_matches("/>").trim_end();
                splicer.replace(
                    child.outer.clone(),
                    format!("{}>{}</{}>", open, content_xml, child.element.qname),
                );
            },
        }
        Ok(())
    }

    /// Append serialized children just before the root end tag.
    pub fn append(&self, splicer: &mut Splicer, children_xml: String) {
        if children_xml.is_empty() {
            return;
        }
        match &self.close {
            RootClose::EndTag(at) => splicer.insert(*at, children_xml),
            RootClose::EmptyTag(range) => splicer.replace(
                range.clone(),
                format!(">{}</{}>", children_xml, self.root.qname),
            ),
        }
    }

    /// Text of the first timestamp typed `W3CDTF`, used as a formatting template.
    fn w3cdtf_template(&self) -> Option<&str> {
        self.children
            .iter()
            .find(|c| {
                c.element
                    .attribute_local("type")
                    .is_some_and(|t| split_qname(t).1 == "W3CDTF")
            })
            .and_then(|c| c.element.text.as_deref())
    }
}

/// New content for a leaf property.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LeafValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl LeafValue {
    /// Unescaped text, following the precision of `previous` for timestamps.
    fn render(&self, previous: Option<&str>) -> String {
        match self {
            LeafValue::Text(s) => s.clone(),
            LeafValue::Timestamp(dt) => format_timestamp(dt, previous),
        }
    }
}

/// An edit of one leaf property of a part.
#[derive(Debug, Clone)]
pub(crate) struct LeafEdit {
    pub namespace: &'static str,
    pub local_name: &'static str,
    pub preferred_prefix: &'static str,
    /// Whether a newly created element gets `xsi:type="dcterms:W3CDTF"`
    pub w3cdtf: bool,
    pub value: LeafValue,
}

/// Apply leaf edits to a part whose root is `{root_ns}root_local`.
///
/// Present elements get their content replaced; missing ones are appended
/// before the root end tag, in edit order.
pub(crate) fn rewrite_leaves(
    source: &[u8],
    root_ns: &str,
    root_local: &str,
    edits: &[LeafEdit],
) -> Result<Vec<u8>> {
    let part = PropertyPart::scan(source)?;
    part.expect_root(root_ns, root_local)?;

    let mut splicer = Splicer::new();
    let mut appended = String::new();

    for edit in edits {
        let mut found = false;
        for child in part.children_named(edit.namespace, edit.local_name) {
            found = true;
            let text = edit.value.render(child.element.text.as_deref());
            part.replace_content(&mut splicer, child, escape_xml(&text))?;
        }
        if !found {
            appended.push_str(&new_leaf(&part, edit));
        }
    }

    part.append(&mut splicer, appended);
    Ok(splicer.apply(source))
}

/// Serialize a leaf that the part does not have yet.
fn new_leaf(part: &PropertyPart<'_>, edit: &LeafEdit) -> String {
    let (qname, mut decls) = part.qualified_name(edit.namespace, edit.local_name, edit.preferred_prefix);
    let text = edit.value.render(part.w3cdtf_template());

    if edit.w3cdtf {
        let xsi = match part.prefix_for(ns::XSI) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => {
                decls.push_str(&format!(r#" xmlns:xsi="{}""#, ns::XSI));
                "xsi".to_string()
            },
        };
        let dcterms = match split_qname(&qname) {
            (Some(p), _) if edit.namespace == ns::DCTERMS => format!("{}:", p),
            (None, _) if edit.namespace == ns::DCTERMS => String::new(),
            _ => match part.prefix_for(ns::DCTERMS) {
                Some("") => String::new(),
                Some(p) => format!("{}:", p),
                None => {
                    decls.push_str(&format!(r#" xmlns:dcterms="{}""#, ns::DCTERMS));
                    "dcterms:".to_string()
                },
            },
        };
        decls.push_str(&format!(r#" {}:type="{}W3CDTF""#, xsi, dcterms));
    }

    format!("<{}{}>{}</{}>", qname, decls, escape_xml(&text), qname)
}

/// Parse the name, attributes and declarations of a start tag.
fn element_info(e: &BytesStart<'_>, scopes: &[Vec<Binding>]) -> Result<ElementInfo> {
    let qname = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| OoxmlError::Xml(format!("Invalid UTF-8 in element name: {}", err)))?
        .to_string();

    let mut attributes = Vec::new();
    let mut bindings = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| OoxmlError::Xml(format!("Invalid UTF-8 in attribute name: {}", err)))?
            .to_string();
        let value = attr.unescape_value()?.to_string();

        if key == "xmlns" {
            bindings.push(Binding {
                prefix: String::new(),
                uri: value,
            });
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            bindings.push(Binding {
                prefix: prefix.to_string(),
                uri: value,
            });
        } else {
            attributes.push((key, value));
        }
    }

    let (prefix, local_name) = split_qname(&qname);
    let wanted = prefix.unwrap_or("");
    let namespace = bindings
        .iter()
        .rev()
        .chain(scopes.iter().rev().flat_map(|scope| scope.iter().rev()))
        .find(|b| b.prefix == wanted)
        .map(|b| b.uri.clone())
        .filter(|uri| !uri.is_empty());

    Ok(ElementInfo {
        local_name: local_name.to_string(),
        qname,
        namespace,
        attributes,
        bindings,
        text: Some(String::new()),
    })
}

/// Decode one run of character data from its raw bytes.
fn character_data(raw: &[u8], event: &Event<'_>) -> Result<String> {
    let raw = std::str::from_utf8(raw)
        .map_err(|e| OoxmlError::Xml(format!("Invalid UTF-8 in text content: {}", e)))?;
    Ok(match event {
        Event::CData(_) => raw
            .strip_prefix("<![CDATA[")
            .and_then(|s| s.strip_suffix("]]>"))
            .unwrap_or(raw)
            .to_string(),
        Event::GeneralRef(_) => resolve_reference(raw).unwrap_or_else(|| raw.to_string()),
        _ => unescape_xml(raw),
    })
}

/// "dc:title" -> (Some("dc"), "title"), "title" -> (None, "title").
fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}
