//! XML parser and serializer for [`Document`].
//!
//! Parsing resolves every prefix to its namespace URI, so the tree only ever
//! holds `{uri}local` names. Serialization regenerates the declarations:
//! the caller names the default namespace, everything else gets `nsN`
//! prefixes declared on the root element.

use crate::config::MAX_ELEMENT_DEPTH;
use crate::error::{Error, Result};
use crate::tree::{Attribute, Document, NodeId, QName};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;
use std::io::{Read, Write};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

impl Document {
    /// Parse a document from any source implementing `Read`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use camt053_downgrade::tree::Document;
    ///
    /// let mut file = File::open("statement.xml")?;
    /// let document = Document::from_read(&mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut xml_content = String::new();
        reader.read_to_string(&mut xml_content)?;
        Self::parse_str(&xml_content)
    }

    /// Parse a document from a string.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut builder = TreeBuilder::default();

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let ns = namespace_uri(resolved)?;
            match event {
                Event::Start(start) => {
                    let (name, attributes) = read_start(&reader, ns, &start)?;
                    builder.open(name, attributes)?;
                }
                Event::Empty(start) => {
                    let (name, attributes) = read_start(&reader, ns, &start)?;
                    builder.open(name, attributes)?;
                    builder.close();
                }
                Event::End(_) => builder.close(),
                Event::Text(text) => builder.text(&text.unescape()?),
                Event::CData(cdata) => builder.text(&utf8(&cdata)?),
                Event::Eof => break,
                // Declaration, comments, processing instructions and doctype
                // carry nothing the fixes look at.
                _ => {}
            }
        }

        builder.finish()
    }

    /// Serialize the document with an XML declaration, writing elements in
    /// `default_ns` without a prefix.
    pub fn write_to<W: Write>(&self, writer: &mut W, default_ns: &str) -> Result<()> {
        let prefixes = Prefixes::collect(self, default_ns);
        let mut xml = Writer::new(&mut *writer);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.get_mut().write_all(b"\n")?;
        self.write_element(&mut xml, &prefixes)?;
        xml.get_mut().write_all(b"\n")?;

        Ok(())
    }

    /// Serialize into a `String`. See [`write_to`](Self::write_to).
    pub fn to_xml_string(&self, default_ns: &str) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, default_ns)?;
        String::from_utf8(buffer).map_err(|e| Error::XmlError(e.to_string()))
    }

    /// Pretty-print in place: two spaces per nesting level.
    ///
    /// Only `text`/`tail` values that are absent or whitespace-only are
    /// replaced, so character data is never altered. Whitespace-only text of
    /// an element without children is dropped, so `<Ustrd> </Ustrd>` and a
    /// `TxsSummry` emptied by a fix both come out as empty elements.
    pub fn indent(&mut self) {
        let root = self.root();
        let mut pending = vec![(root, 0usize)];

        while let Some((id, level)) = pending.pop() {
            let children = self.children(id);

            if children.is_empty() {
                if self.text(id).is_some_and(|text| text.trim().is_empty()) {
                    self.set_text(id, None);
                }
            } else {
                if is_blank(self.text(id)) {
                    self.set_text(id, Some(format!("{}  ", newline(level))));
                }
                pending.extend(children.iter().rev().map(|&child| (child, level + 1)));
            }

            // The last child's tail closes its parent, one level up.
            if let Some(parent) = self.parent(id) {
                if is_blank(self.tail(id)) {
                    let closes_parent = self.last_child(parent) == Some(id);
                    let tail_level = if closes_parent { level - 1 } else { level };
                    self.set_tail(id, Some(newline(tail_level)));
                }
            }
        }

        self.set_tail(root, None);
    }

    fn write_element<W: Write>(&self, xml: &mut Writer<W>, prefixes: &Prefixes) -> Result<()> {
        let mut pending = vec![WriteStep::Open(self.root(), None)];

        while let Some(step) = pending.pop() {
            let (id, scope) = match step {
                WriteStep::Open(id, scope) => (id, scope),
                WriteStep::Close(id, tag) => {
                    xml.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
                    self.write_tail(xml, id)?;
                    continue;
                }
            };

            let name = self.name(id);
            let tag = prefixes.element_name(name);
            let mut start = BytesStart::new(tag.as_str());
            let mut scope = scope;

            match name.ns.as_deref() {
                Some(ns) if ns == prefixes.default && scope != Some(ns) => {
                    start.push_attribute(("xmlns", ns));
                    scope = Some(ns);
                }
                None if scope.is_some() => {
                    start.push_attribute(("xmlns", ""));
                    scope = None;
                }
                _ => {}
            }

            if id == self.root() {
                for (uri, prefix) in &prefixes.declared {
                    let key = format!("xmlns:{prefix}");
                    start.push_attribute((key.as_str(), uri.as_str()));
                }
            }

            for attr in self.attributes(id) {
                let key = prefixes.attribute_name(&attr.name);
                start.push_attribute((key.as_str(), attr.value.as_str()));
            }

            let children = self.children(id);
            match self.text(id) {
                None if children.is_empty() => {
                    xml.write_event(Event::Empty(start))?;
                    self.write_tail(xml, id)?;
                }
                text => {
                    xml.write_event(Event::Start(start))?;
                    if let Some(text) = text {
                        xml.write_event(Event::Text(BytesText::new(text)))?;
                    }
                    pending.push(WriteStep::Close(id, tag));
                    let opens = children.iter().rev().map(|&child| WriteStep::Open(child, scope));
                    pending.extend(opens);
                }
            }
        }

        Ok(())
    }

    fn write_tail<W: Write>(&self, xml: &mut Writer<W>, id: NodeId) -> Result<()> {
        if id == self.root() {
            return Ok(());
        }
        if let Some(tail) = self.tail(id) {
            xml.write_event(Event::Text(BytesText::new(tail)))?;
        }
        Ok(())
    }
}

/// Serialization work item: start an element with the default namespace in
/// scope, or close it with its written tag.
enum WriteStep<'d> {
    Open(NodeId, Option<&'d str>),
    Close(NodeId, String),
}

fn newline(level: usize) -> String {
    format!("\n{}", "  ".repeat(level))
}

fn is_blank(text: Option<&str>) -> bool {
    text.map_or(true, |text| text.trim().is_empty())
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| Error::XmlError(e.to_string()))
}

fn namespace_uri(resolved: ResolveResult) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => utf8(ns.as_ref()).map(Some),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(Error::XmlError(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn read_start(
    reader: &NsReader<&[u8]>,
    ns: Option<String>,
    start: &BytesStart,
) -> Result<(QName, Vec<Attribute>)> {
    let name = QName {
        ns,
        local: utf8(start.local_name().as_ref())?,
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let attr_name = QName {
            ns: namespace_uri(resolved)?,
            local: utf8(local.as_ref())?,
        };
        attributes.push(Attribute {
            name: attr_name,
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok((name, attributes))
}

/// Assembles a [`Document`] from a stream of parse events.
#[derive(Default)]
struct TreeBuilder {
    document: Option<Document>,
    open: Vec<NodeId>,
    closed_root: bool,
}

impl TreeBuilder {
    fn open(&mut self, name: QName, attributes: Vec<Attribute>) -> Result<()> {
        if self.open.len() >= MAX_ELEMENT_DEPTH {
            return Err(Error::XmlError(format!(
                "elements nested deeper than {MAX_ELEMENT_DEPTH} levels"
            )));
        }

        let id = if let Some(document) = self.document.as_mut() {
            let Some(&parent) = self.open.last() else {
                return Err(Error::XmlError("multiple root elements".to_string()));
            };
            let id = document.create_element(name);
            document.append_child(parent, id);
            id
        } else {
            let document = Document::new(name);
            let root = document.root();
            self.document = Some(document);
            root
        };
        if let Some(document) = self.document.as_mut() {
            *document.attributes_mut(id) = attributes;
        }
        self.open.push(id);
        Ok(())
    }

    fn close(&mut self) {
        self.open.pop();
        if self.open.is_empty() {
            self.closed_root = true;
        }
    }

    fn text(&mut self, content: &str) {
        let (Some(document), Some(&current)) = (self.document.as_mut(), self.open.last()) else {
            // Whitespace around the root element.
            return;
        };
        match document.last_child(current) {
            Some(last) => {
                let tail = format!("{}{}", document.tail(last).unwrap_or_default(), content);
                document.set_tail(last, Some(tail));
            }
            None => {
                let text = format!("{}{}", document.text(current).unwrap_or_default(), content);
                document.set_text(current, Some(text));
            }
        }
    }

    fn finish(self) -> Result<Document> {
        if !self.open.is_empty() || (self.document.is_some() && !self.closed_root) {
            return Err(Error::XmlError("unexpected end of document".to_string()));
        }
        self.document
            .ok_or_else(|| Error::XmlError("document has no root element".to_string()))
    }
}

/// Prefix assignment for serialization.
struct Prefixes {
    default: String,
    /// `(namespace, prefix)` in order of first use.
    declared: Vec<(String, String)>,
}

impl Prefixes {
    fn collect(document: &Document, default_ns: &str) -> Self {
        let mut prefixes = Prefixes {
            default: default_ns.to_string(),
            declared: Vec::new(),
        };
        for id in document.subtree(document.root()) {
            if let Some(ns) = document.name(id).ns.as_deref() {
                if ns != default_ns {
                    prefixes.declare(ns);
                }
            }
            for attr in document.attributes(id) {
                if let Some(ns) = attr.name.ns.as_deref() {
                    prefixes.declare(ns);
                }
            }
        }
        prefixes
    }

    fn declare(&mut self, ns: &str) {
        if ns == XML_NAMESPACE || self.prefix(ns).is_some() {
            return;
        }
        let prefix = format!("ns{}", self.declared.len());
        self.declared.push((ns.to_string(), prefix));
    }

    fn prefix(&self, ns: &str) -> Option<&str> {
        if ns == XML_NAMESPACE {
            return Some("xml");
        }
        self.declared
            .iter()
            .find(|(uri, _)| uri == ns)
            .map(|(_, prefix)| prefix.as_str())
    }

    fn element_name(&self, name: &QName) -> String {
        match name.ns.as_deref() {
            Some(ns) if ns != self.default => self.prefixed(ns, &name.local),
            _ => name.local.clone(),
        }
    }

    fn attribute_name(&self, name: &QName) -> String {
        match name.ns.as_deref() {
            Some(ns) => self.prefixed(ns, &name.local),
            None => name.local.clone(),
        }
    }

    fn prefixed(&self, ns: &str, local: &str) -> String {
        match self.prefix(ns) {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        }
    }
}
