//! Arena DOM built by html5ever.
//!
//! Every parsed document lives in an indextree [`Arena`]. Render output for a
//! custom element is parsed into the arena of the document that hosts the
//! element, so assembling a shadow root moves nodes instead of copying them.

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, QualName, parse_document};
use indexmap::IndexMap;
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;

use crate::trace;

/// A parsed HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes of the document, plus any detached documents parsed into it.
    pub arena: Arena<NodeData>,

    /// The invisible document node (parent of `<html>`).
    pub root: NodeId,

    /// DOCTYPE name if present (usually "html")
    pub doctype: Option<StrTendril>,
}

impl Document {
    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Element data of a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id).kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.get_mut(id).kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// Tag name of a node, `None` for documents, text and comments.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|elem| elem.tag.as_ref())
    }

    fn find_child(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        parent
            .children(&self.arena)
            .find(|&id| self.tag(id) == Some(tag))
    }

    /// Get the `<html>` element if present
    pub fn html(&self) -> Option<NodeId> {
        self.find_child(self.root, "html")
    }

    /// Get the `<head>` element if present
    pub fn head(&self) -> Option<NodeId> {
        self.find_child(self.html()?, "head")
    }

    /// Get the `<body>` element if present
    pub fn body(&self) -> Option<NodeId> {
        self.find_child(self.html()?, "body")
    }

    /// Create a detached HTML element.
    pub fn create_element<'a>(
        &mut self,
        tag: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> NodeId {
        let attrs = attrs
            .into_iter()
            .map(|(name, value)| (name.to_string(), StrTendril::from(value)))
            .collect();
        self.arena.new_node(NodeData {
            kind: NodeKind::Element(ElementData {
                tag: StrTendril::from(tag),
                attrs,
            }),
            ns: Namespace::Html,
        })
    }

    /// Parse `html` as a full document into this document's arena.
    ///
    /// Returns the detached document node of the new tree. Nothing links it to
    /// [`Document::root`] until its nodes are moved somewhere.
    pub fn parse_detached(&mut self, html: &str) -> NodeId {
        let arena = std::mem::replace(&mut self.arena, Arena::new());
        let parsed = parse_with(ArenaSink::with_arena(arena), html);
        self.arena = parsed.arena;
        parsed.root
    }

    /// Detach the content of a parsed document so it can be used as fragment content.
    ///
    /// The nodes come out in the order a template would receive them when the
    /// document is re-read as template content: document-level comments, the
    /// children of `<head>`, then the children of `<body>`. The emptied shell
    /// (`root`, `<html>`, `<head>`, `<body>`) is removed from the arena unless
    /// `root` is this document's own root.
    pub fn take_content(&mut self, root: NodeId) -> Vec<NodeId> {
        let mut content = Vec::new();
        let top: Vec<NodeId> = root.children(&self.arena).collect();
        for id in top {
            if self.tag(id) != Some("html") {
                content.push(id);
                continue;
            }
            let sections: Vec<NodeId> = id.children(&self.arena).collect();
            for section in sections {
                match self.tag(section) {
                    Some("head") | Some("body") => content.extend(section.children(&self.arena)),
                    _ => content.push(section),
                }
            }
        }

        for &id in &content {
            id.detach(&mut self.arena);
        }
        if root != self.root {
            root.remove_subtree(&mut self.arena);
        }
        trace!("took {} content nodes from {:?}", content.len(), root);
        content
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub ns: Namespace,
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of `<html>`)
    Document,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content (StrTendril is refcounted - cheap to clone)
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

/// Element data (tag + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, lowercase for HTML elements
    pub tag: StrTendril,

    /// Attributes in source order. Keys carry their namespace prefix
    /// (`xlink:href`) when the parser reported one.
    pub attrs: IndexMap<String, StrTendril>,
}

impl ElementData {
    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|value| value.as_ref())
    }

    /// Set an attribute value, keeping the position of an existing attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: &str) {
        self.attrs.insert(name.into(), StrTendril::from(value));
    }

    /// Set an attribute as the last one, moving an existing attribute of that name.
    pub fn push_attr(&mut self, name: impl Into<String>, value: &str) {
        let name = name.into();
        self.attrs.shift_remove(&name);
        self.attrs.insert(name, StrTendril::from(value));
    }
}

/// XML namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/2000/svg" => Namespace::Svg,
            "http://www.w3.org/1998/Math/MathML" => Namespace::MathMl,
            _ => Namespace::Html,
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

/// Parse HTML into an arena-based [`Document`].
pub fn parse(html: &str) -> Document {
    parse_with(ArenaSink::with_arena(Arena::new()), html)
}

fn parse_with(sink: ArenaSink, html: &str) -> Document {
    parse_document(sink, Default::default()).one(StrTendril::from(html))
}

fn attr_key(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation for building arena-based DOM
struct ArenaSink {
    arena: RefCell<Arena<NodeData>>,

    /// Document node (parent of `<html>`)
    document: NodeId,

    doctype: RefCell<Option<StrTendril>>,
}

impl ArenaSink {
    fn with_arena(mut arena: Arena<NodeData>) -> Self {
        let document = arena.new_node(NodeData {
            kind: NodeKind::Document,
            ns: Namespace::Html,
        });

        ArenaSink {
            arena: RefCell::new(arena),
            document,
            doctype: RefCell::new(None),
        }
    }

    fn new_text(arena: &mut Arena<NodeData>, text: StrTendril) -> NodeId {
        arena.new_node(NodeData {
            kind: NodeKind::Text(text),
            ns: Namespace::Html,
        })
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        Document {
            arena: self.arena.into_inner(),
            root: self.document,
            doctype: self.doctype.into_inner(),
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers on its own
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        let node = arena[*target].get();

        let local = match &node.kind {
            NodeKind::Element(elem) => LocalName::from(elem.tag.as_ref()),
            _ => LocalName::from(""),
        };
        OwnedElemName(QualName {
            prefix: None,
            ns: html5ever::Namespace::from(node.ns.url()),
            local,
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let ns = Namespace::from_url(name.ns.as_ref());
        let attrs = attrs
            .into_iter()
            .map(|attr| (attr_key(&attr.name), attr.value))
            .collect();

        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Element(ElementData {
                tag: StrTendril::from(name.local.as_ref()),
                attrs,
            }),
            ns,
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(text),
            ns: Namespace::Html,
        })
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // Processing instructions only exist in XML; keep an empty comment in their place
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(StrTendril::new()),
            ns: Namespace::Html,
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                // Adjacent text merges into one node
                if let Some(last_child) = arena[*parent].last_child()
                    && let NodeKind::Text(existing) = &mut arena[last_child].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = Self::new_text(&mut arena, text);
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                let text_node = Self::new_text(&mut arena, text);
                sibling.insert_before(text_node, &mut arena);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(name);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are kept as ordinary children of the template element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = &mut arena[*target].get_mut().kind {
            for attr in attrs {
                elem.attrs
                    .entry(attr_key(&attr.name))
                    .or_insert(attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}
