//! HTML5 serializer for the arena DOM.
//!
//! Follows the HTML fragment serialization algorithm:
//!
//! - Void elements never get end tags
//! - Text is escaped (`&`, no-break space, `<`, `>`)
//! - Attribute values are double-quoted and escaped (`&`, no-break space, `"`)
//! - Children of raw text elements (script, style, ...) are written as-is
//! - Template contents are written as the template's children

use indextree::NodeId;
use std::fmt::Write;

use crate::dom::{Document, ElementData, NodeKind};

/// Serialize a whole document: DOCTYPE (if any), then every top-level node.
pub fn serialize_document(doc: &Document) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, doc);
    ser.write_document();
    out
}

/// Serialize one node and its subtree (outer HTML).
pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, doc);
    ser.write_node(id, false);
    out
}

/// HTML5 void elements - these never have end tags.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

struct Serializer<'a, W: Write> {
    out: &'a mut W,
    doc: &'a Document,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(out: &'a mut W, doc: &'a Document) -> Self {
        Self { out, doc }
    }

    fn write_text_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let _ = match c {
                '&' => self.out.write_str("&amp;"),
                '\u{a0}' => self.out.write_str("&nbsp;"),
                '<' => self.out.write_str("&lt;"),
                '>' => self.out.write_str("&gt;"),
                _ => self.out.write_char(c),
            };
        }
    }

    fn write_attr_value_escaped(&mut self, text: &str) {
        for c in text.chars() {
            let _ = match c {
                '&' => self.out.write_str("&amp;"),
                '\u{a0}' => self.out.write_str("&nbsp;"),
                '"' => self.out.write_str("&quot;"),
                _ => self.out.write_char(c),
            };
        }
    }

    fn write_document(&mut self) {
        let doc = self.doc;
        if let Some(doctype) = &doc.doctype {
            let _ = write!(self.out, "<!DOCTYPE {}>", doctype);
        }
        self.write_children(doc.root, false);
    }

    fn write_children(&mut self, id: NodeId, raw: bool) {
        let doc = self.doc;
        for child in id.children(&doc.arena) {
            self.write_node(child, raw);
        }
    }

    fn write_node(&mut self, id: NodeId, raw: bool) {
        let doc = self.doc;
        match &doc.get(id).kind {
            NodeKind::Document => self.write_children(id, false),
            NodeKind::Element(elem) => self.write_element(id, elem),
            NodeKind::Text(text) if raw => {
                let _ = self.out.write_str(text);
            }
            NodeKind::Text(text) => self.write_text_escaped(text),
            NodeKind::Comment(text) => {
                let _ = write!(self.out, "<!--{}-->", text);
            }
        }
    }

    fn write_element(&mut self, id: NodeId, elem: &ElementData) {
        let tag = elem.tag.as_ref();

        let _ = write!(self.out, "<{}", tag);
        for (name, value) in &elem.attrs {
            let _ = write!(self.out, " {}=\"", name);
            self.write_attr_value_escaped(value);
            let _ = self.out.write_char('"');
        }
        let _ = self.out.write_char('>');

        if is_void_element(tag) {
            return;
        }

        self.write_children(id, is_raw_text_element(tag));
        let _ = write!(self.out, "</{}>", tag);
    }
}

impl Document {
    /// Serialize this document to an HTML string.
    pub fn to_html(&self) -> String {
        serialize_document(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    fn body_html(html: &str) -> String {
        let doc = parse(html);
        let body = doc.body().expect("should have body");
        doc.children(body)
            .map(|id| serialize_node(&doc, id))
            .collect()
    }

    #[test]
    fn test_element_roundtrip() {
        assert_eq!(body_html("<div>Hello</div>"), "<div>Hello</div>");
    }

    #[test]
    fn test_attribute_order_is_preserved() {
        assert_eq!(
            body_html(r#"<div id="main" class="container">x</div>"#),
            r#"<div id="main" class="container">x</div>"#
        );
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(
            body_html("<div>&lt;script&gt; &amp; \"quotes\"&nbsp;</div>"),
            "<div>&lt;script&gt; &amp; \"quotes\"&nbsp;</div>"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(
            body_html(r#"<a href="?a=1&amp;b=2" title='say "hi" <now>'></a>"#),
            r#"<a href="?a=1&amp;b=2" title="say &quot;hi&quot; <now>"></a>"#
        );
    }

    #[test]
    fn test_void_elements() {
        let output = body_html(r#"<br><img src="test.png"><input>"#);
        assert_eq!(output, r#"<br><img src="test.png"><input>"#);
    }

    #[test]
    fn test_raw_text_elements() {
        let output = body_html("<div><script>if (a < b && c > d) {}</script><style>a>b{}</style></div>");
        assert_eq!(
            output,
            "<div><script>if (a < b && c > d) {}</script><style>a>b{}</style></div>"
        );
    }

    #[test]
    fn test_comment_serialization() {
        assert_eq!(
            body_html("<div><!--a comment--></div>"),
            "<div><!--a comment--></div>"
        );
    }

    #[test]
    fn test_template_children_are_written() {
        assert_eq!(
            body_html("<div><template><p>in</p></template></div>"),
            "<div><template><p>in</p></template></div>"
        );
    }

    #[test]
    fn test_document_serialization() {
        let doc = parse("<!DOCTYPE html><title>t</title><p>x</p>");
        assert_eq!(
            doc.to_html(),
            "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_document_without_doctype() {
        let doc = parse("<my-el></my-el>");
        assert_eq!(
            serialize_document(&doc),
            "<html><head></head><body><my-el></my-el></body></html>"
        );
    }
}
