//! Expanding custom elements into declarative shadow roots.
//!
//! Every element whose tag is a valid custom element name is looked up in the
//! [`Registry`]. A registered element's render output is parsed into the host
//! document's arena, expanded recursively, and wrapped in a
//! `<template shadowrootmode="open">` that becomes the host's first child. The
//! host's own children stay after it as light DOM.

use indextree::NodeId;

use crate::dom::Document;
use crate::enhance::EnhanceOptions;
use crate::name::is_custom_element;
use crate::registry::Registry;
use crate::render::{Render, RenderState};
use crate::walk::{Visit, try_walk};
use crate::{Error, Map, Markup, ValueBridge, debug, trace};

/// Value of the `enhanced` attribute set on custom elements.
pub const ENHANCED_MARKER: &str = "✨";

/// State of one top-level expansion.
pub(crate) struct Expander<'a> {
    registry: &'a Registry,
    options: &'a EnhanceOptions,
    store: &'a mut Map,
    ids: &'a mut dyn FnMut() -> String,
    bridge: ValueBridge,
    /// Shared by every element expanded during this call, at any depth.
    context: Map,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        options: &'a EnhanceOptions,
        store: &'a mut Map,
        ids: &'a mut dyn FnMut() -> String,
        bridge: ValueBridge,
    ) -> Self {
        Self {
            registry,
            options,
            store,
            ids,
            bridge,
            context: Map::new(),
        }
    }

    /// Expand every custom element in the tree under `root`.
    pub(crate) fn expand(&mut self, doc: &mut Document, root: NodeId) -> Result<(), Error> {
        self.expand_subtree(doc, root, 0)
    }

    fn expand_subtree(&mut self, doc: &mut Document, root: NodeId, depth: usize) -> Result<(), Error> {
        let _flow = try_walk(doc, root, |doc, id| -> Result<Visit, Error> {
            let Some(tag) = doc.tag(id) else {
                return Ok(Visit::Continue);
            };
            // Template contents are inert, and that includes shadow roots built here
            if tag == "template" {
                return Ok(Visit::SkipChildren);
            }
            if !is_custom_element(tag) {
                return Ok(Visit::Continue);
            }

            let tag = tag.to_string();
            self.expand_element(doc, id, &tag, depth)?;
            Ok(Visit::Continue)
        })?;
        Ok(())
    }

    fn expand_element(
        &mut self,
        doc: &mut Document,
        host: NodeId,
        tag: &str,
        depth: usize,
    ) -> Result<(), Error> {
        let registry = self.registry;
        match registry.lookup(tag) {
            Some(Some(render)) => self.attach_shadow_root(doc, host, tag, render, depth)?,
            Some(None) => {
                return Err(Error::MissingRender {
                    tag: tag.to_string(),
                });
            }
            None => {
                debug!("<{}> is not registered, leaving it as is", tag);
            }
        }

        if self.options.enhanced_attr
            && let Some(elem) = doc.element_mut(host)
        {
            elem.push_attr("enhanced", ENHANCED_MARKER);
        }
        Ok(())
    }

    fn attach_shadow_root(
        &mut self,
        doc: &mut Document,
        host: NodeId,
        tag: &str,
        render: &dyn Render,
        depth: usize,
    ) -> Result<(), Error> {
        let limit = self.options.max_depth;
        if depth >= limit {
            return Err(Error::TooDeep {
                tag: tag.to_string(),
                limit,
            });
        }

        let attrs = self.decode_attrs(doc, host);
        let instance_id = (self.ids)();
        debug!(tag, %instance_id, depth, "expanding custom element");

        let mut state = RenderState {
            attrs,
            context: &mut self.context,
            instance_id,
            store: &mut *self.store,
        };
        let rendered = render
            .render(&mut Markup::new(&mut self.bridge), &mut state)
            .map_err(|source| Error::Render {
                tag: tag.to_string(),
                source,
            })?;

        let fragment = doc.parse_detached(&rendered);
        self.expand_subtree(doc, fragment, depth + 1)?;
        let content = doc.take_content(fragment);

        let template = doc.create_element("template", [("shadowrootmode", "open")]);
        for sheet in &self.options.shadow_stylesheets {
            let href = sheet.href.as_deref().unwrap_or("");
            let link = doc.create_element("link", [("rel", "stylesheet"), ("href", href)]);
            template.append(link, &mut doc.arena);
        }
        for id in content {
            template.append(id, &mut doc.arena);
        }
        host.prepend(template, &mut doc.arena);

        trace!("attached shadow root to <{}>", tag);
        Ok(())
    }

    /// The host's attributes with placeholder tokens turned back into values.
    fn decode_attrs(&self, doc: &Document, host: NodeId) -> Map {
        let Some(elem) = doc.element(host) else {
            return Map::new();
        };
        elem.attrs
            .iter()
            .map(|(name, value)| (name.clone(), self.bridge.decode(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;
    use crate::enhance::Stylesheet;
    use crate::serialize::serialize_node;
    use crate::{RenderResult, Value};

    fn expand_body(
        registry: &Registry,
        options: &EnhanceOptions,
        input: &str,
    ) -> Result<String, Error> {
        let mut doc = parse(input);
        let mut store = Map::new();
        let mut counter = 0;
        let mut ids = || {
            counter += 1;
            format!("id{counter}")
        };
        let root = doc.root;
        Expander::new(registry, options, &mut store, &mut ids, ValueBridge::new())
            .expand(&mut doc, root)?;

        let body = doc.body().expect("should have body");
        Ok(doc
            .children(body)
            .map(|id| serialize_node(&doc, id))
            .collect())
    }

    fn article_registry() -> Registry {
        let mut registry = Registry::new();
        registry.define("my-article", |_, _| {
            Ok("<article><slot name=\"content\"><p>fallback</p></slot></article>".to_string())
        });
        registry
    }

    #[test]
    fn test_shadow_root_comes_before_light_dom() {
        let out = expand_body(
            &article_registry(),
            &EnhanceOptions::default(),
            "<my-article><p slot=\"content\">real</p></my-article>",
        )
        .expect("expand");

        assert_eq!(
            out,
            "<my-article enhanced=\"✨\"><template shadowrootmode=\"open\"><article><slot name=\"content\"><p>fallback</p></slot></article></template><p slot=\"content\">real</p></my-article>"
        );
    }

    #[test]
    fn test_unregistered_elements_are_only_marked() {
        let out = expand_body(
            &article_registry(),
            &EnhanceOptions::default(),
            "<other-thing a=\"1\"><b>x</b></other-thing><div></div>",
        )
        .expect("expand");

        assert_eq!(out, "<other-thing a=\"1\" enhanced=\"✨\"><b>x</b></other-thing><div></div>");
    }

    #[test]
    fn test_marker_is_appended_last() {
        let out = expand_body(
            &article_registry(),
            &EnhanceOptions::default(),
            "<my-el enhanced=\"x\" a=\"1\"></my-el>",
        )
        .expect("expand");

        assert_eq!(out, "<my-el a=\"1\" enhanced=\"✨\"></my-el>");
    }

    #[test]
    fn test_template_contents_are_left_alone() {
        let out = expand_body(
            &article_registry(),
            &EnhanceOptions::default(),
            "<div><template><my-article></my-article></template></div>",
        )
        .expect("expand");

        assert_eq!(out, "<div><template><my-article></my-article></template></div>");
    }

    #[test]
    fn test_stylesheets_lead_every_shadow_root() {
        let mut registry = Registry::new();
        registry
            .define("my-outer", |_, _| Ok("<my-inner></my-inner>".to_string()))
            .define("my-inner", |_, _| Ok("<i>in</i>".to_string()));
        let options = EnhanceOptions::default()
            .enhanced_attr(false)
            .shadow_stylesheet(Stylesheet::new("x.css"))
            .shadow_stylesheet(Stylesheet::default());

        let out = expand_body(&registry, &options, "<my-outer></my-outer>").expect("expand");
        let links = "<link rel=\"stylesheet\" href=\"x.css\"><link rel=\"stylesheet\" href=\"\">";
        assert_eq!(
            out,
            format!(
                "<my-outer><template shadowrootmode=\"open\">{links}<my-inner><template shadowrootmode=\"open\">{links}<i>in</i></template></my-inner></template></my-outer>"
            )
        );
    }

    #[test]
    fn test_render_state() {
        let mut registry = Registry::new();
        registry
            .define("my-parent", |html, state| {
                state
                    .context
                    .insert("from-parent".to_string(), Value::from(state.instance_id.clone()));
                let items = Value::list([Value::from("a"), Value::from("b")]);
                Ok(html.render(&["<my-child items=\"", "\"></my-child>"], [items])?)
            })
            .define("my-child", |html, state| {
                let count = state.attr("items").and_then(Value::as_list).map_or(0, <[Value]>::len);
                let parent = state.context.get("from-parent").cloned().unwrap_or_default();
                Ok(html.render(
                    &["<span>", " ", " ", "</span>"],
                    [Value::from(count as u32), parent, Value::from(state.instance_id.clone())],
                )?)
            });
        let options = EnhanceOptions::default().enhanced_attr(false);

        let out = expand_body(&registry, &options, "<my-parent></my-parent>").expect("expand");
        assert_eq!(
            out,
            "<my-parent><template shadowrootmode=\"open\"><my-child items=\"__b_0\"><template shadowrootmode=\"open\"><span>2 id1 id2</span></template></my-child></template></my-parent>"
        );
    }

    #[test]
    fn test_declared_without_render_fails() {
        let mut registry = Registry::new();
        registry.declare("my-ghost");

        let err = expand_body(&registry, &EnhanceOptions::default(), "<my-ghost></my-ghost>")
            .expect_err("should fail");
        assert_eq!(err.to_string(), "could not find the template function for my-ghost");
    }

    #[test]
    fn test_self_recursion_hits_the_depth_limit() {
        let mut registry = Registry::new();
        registry.define("my-loop", |html, _| Ok(html.render(&["<my-loop></my-loop>"], [])?));
        let options = EnhanceOptions::default().max_depth(3);

        let err = expand_body(&registry, &options, "<my-loop></my-loop>").expect_err("should fail");
        assert!(matches!(err, Error::TooDeep { ref tag, limit: 3 } if tag == "my-loop"));
    }

    #[test]
    fn test_render_errors_name_the_element() {
        fn broken(_: &mut Markup<'_>, _: &mut RenderState<'_>) -> RenderResult {
            Err("database is down".into())
        }
        let mut registry = Registry::new();
        registry.define("my-broken", broken);

        let err = expand_body(&registry, &EnhanceOptions::default(), "<my-broken></my-broken>")
            .expect_err("should fail");
        assert!(matches!(err, Error::Render { ref tag, .. } if tag == "my-broken"));
        assert_eq!(err.to_string(), "rendering <my-broken> failed: database is down");
    }
}
