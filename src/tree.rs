//! In-memory XML element tree.
//!
//! Elements live in an `indextree` arena owned by [`Document`] and are
//! addressed by [`NodeId`]. Every element knows its parent, so removing an
//! element never requires searching the whole tree for it.

use indextree::Arena;
use std::fmt;

pub use indextree::NodeId;

/// Namespace-qualified name of an element or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI, `None` for unqualified names.
    pub ns: Option<String>,
    /// Local part of the name.
    pub local: String,
}

impl QName {
    /// Build a name in namespace `ns`.
    pub fn new(ns: &str, local: &str) -> Self {
        QName {
            ns: Some(ns.to_string()),
            local: local.to_string(),
        }
    }

    /// Build a name without a namespace.
    pub fn unqualified(local: &str) -> Self {
        QName {
            ns: None,
            local: local.to_string(),
        }
    }

    /// Whether this is `{ns}local`.
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.local == local
    }
}

/// Clark notation, `{urn:example}Local`.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ns {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// An attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// Payload of a tree node.
#[derive(Debug, Clone)]
struct Element {
    name: QName,
    attributes: Vec<Attribute>,
    text: Option<String>,
    tail: Option<String>,
}

impl Element {
    fn new(name: QName) -> Self {
        Element {
            name,
            attributes: Vec::new(),
            text: None,
            tail: None,
        }
    }
}

/// A parsed XML document: one root element and everything beneath it.
///
/// Besides its children, an element carries `text` (character data before
/// its first child) and `tail` (character data after its end tag, up to the
/// next sibling or the parent's end tag).
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<Element>,
    root: NodeId,
}

impl Document {
    /// Create a document consisting of a single root element.
    pub fn new(root: QName) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(Element::new(root));
        Document { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn element(&self, id: NodeId) -> &Element {
        self.arena[id].get()
    }

    fn element_mut(&mut self, id: NodeId) -> &mut Element {
        self.arena[id].get_mut()
    }

    /// Create a detached element. Attach it with [`append_child`](Self::append_child)
    /// or [`insert_after`](Self::insert_after).
    pub fn create_element(&mut self, name: QName) -> NodeId {
        self.arena.new_node(Element::new(name))
    }

    pub fn name(&self, id: NodeId) -> &QName {
        &self.element(id).name
    }

    pub fn set_name(&mut self, id: NodeId, name: QName) {
        self.element_mut(id).name = name;
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        &self.element(id).attributes
    }

    pub fn attributes_mut(&mut self, id: NodeId) -> &mut Vec<Attribute> {
        &mut self.element_mut(id).attributes
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.element(id).text.as_deref()
    }

    /// Text with surrounding whitespace removed; `None` when it is empty or
    /// whitespace only.
    pub fn text_trimmed(&self, id: NodeId) -> Option<&str> {
        self.text(id).map(str::trim).filter(|text| !text.is_empty())
    }

    pub fn set_text(&mut self, id: NodeId, text: Option<String>) {
        self.element_mut(id).text = text;
    }

    pub fn tail(&self, id: NodeId) -> Option<&str> {
        self.element(id).tail.as_deref()
    }

    pub fn set_tail(&mut self, id: NodeId, tail: Option<String>) {
        self.element_mut(id).tail = tail;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].last_child()
    }

    /// Append `child` as the last child of `parent`, detaching it first if
    /// it is attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    /// Insert `new_sibling` right after `sibling`, under the same parent.
    pub fn insert_after(&mut self, sibling: NodeId, new_sibling: NodeId) {
        sibling.insert_after(new_sibling, &mut self.arena);
    }

    /// Unlink `id` (and its subtree) from its parent. Returns `false` when
    /// it was not attached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if self.parent(id).is_none() {
            return false;
        }
        id.detach(&mut self.arena);
        true
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id) {
            child.detach(&mut self.arena);
        }
    }

    /// `id` and all elements beneath it, in document order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        id.descendants(&self.arena).collect()
    }

    /// Every element named `{ns}local` strictly beneath `id`, in document order.
    pub fn find_descendants(&self, id: NodeId, ns: &str, local: &str) -> Vec<NodeId> {
        id.descendants(&self.arena)
            .skip(1)
            .filter(|&node| self.name(node).is(ns, local))
            .collect()
    }

    /// First direct child of `id` named `{ns}local`.
    pub fn find_child(&self, id: NodeId, ns: &str, local: &str) -> Option<NodeId> {
        id.children(&self.arena).find(|&child| self.name(child).is(ns, local))
    }

    /// Elements reached from `id` by following a `/`-separated path of
    /// direct-child local names, all in namespace `ns`.
    pub fn find_all(&self, id: NodeId, ns: &str, path: &str) -> Vec<NodeId> {
        let mut current = vec![id];
        for step in path.split('/').filter(|step| !step.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|node| node.children(&self.arena))
                .filter(|&child| self.name(child).is(ns, step))
                .collect();
        }
        current
    }

    /// First element of [`find_all`](Self::find_all).
    pub fn find_one(&self, id: NodeId, ns: &str, path: &str) -> Option<NodeId> {
        self.find_all(id, ns, path).into_iter().next()
    }

    /// Return the first child `{ns}local` of `parent`, appending a new empty
    /// one when there is none.
    pub fn ensure_child(&mut self, parent: NodeId, ns: &str, local: &str) -> NodeId {
        if let Some(child) = self.find_child(parent, ns, local) {
            return child;
        }
        let child = self.create_element(QName::new(ns, local));
        self.append_child(parent, child);
        child
    }

    /// Append a new child `{ns}local` holding `text`.
    pub fn append_text_element(
        &mut self,
        parent: NodeId,
        ns: &str,
        local: &str,
        text: impl Into<String>,
    ) -> NodeId {
        let child = self.create_element(QName::new(ns, local));
        self.set_text(child, Some(text.into()));
        self.append_child(parent, child);
        child
    }
}
