//! Entry points: build markup, expand it, serialize the result.

use crate::bridge::strip_placeholders;
use crate::dom::parse;
use crate::expand::Expander;
use crate::serialize::{serialize_document, serialize_node};
use crate::{Error, Map, Markup, Registry, Value, ValueBridge, debug};

/// A stylesheet linked from every generated shadow root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Written as an empty `href` when absent.
    pub href: Option<String>,
}

impl Stylesheet {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
        }
    }
}

impl From<&str> for Stylesheet {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

/// Options for expansion and output.
#[derive(Debug, Clone)]
pub struct EnhanceOptions {
    /// Return only the first node of `<body>` instead of the whole document (default: false).
    pub body_content: bool,
    /// Mark every custom element with `enhanced="✨"` (default: true).
    pub enhanced_attr: bool,
    /// Stylesheets linked at the top of every shadow root, in order.
    pub shadow_stylesheets: Vec<Stylesheet>,
    /// How deeply custom elements may nest inside each other's render output (default: 64).
    pub max_depth: usize,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            body_content: false,
            enhanced_attr: true,
            shadow_stylesheets: Vec::new(),
            max_depth: 64,
        }
    }
}

impl EnhanceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output the first node of `<body>` only.
    pub fn body_content(mut self) -> Self {
        self.body_content = true;
        self
    }

    /// Turn the `enhanced` marker on or off.
    pub fn enhanced_attr(mut self, enabled: bool) -> Self {
        self.enhanced_attr = enabled;
        self
    }

    /// Add one shadow root stylesheet.
    pub fn shadow_stylesheet(mut self, sheet: impl Into<Stylesheet>) -> Self {
        self.shadow_stylesheets.push(sheet.into());
        self
    }

    /// Add several shadow root stylesheets.
    pub fn shadow_stylesheets(mut self, sheets: impl IntoIterator<Item = Stylesheet>) -> Self {
        self.shadow_stylesheets.extend(sheets);
        self
    }

    /// Set the nesting limit.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Expands custom elements in markup into declarative shadow DOM.
///
/// The store outlives individual calls: whatever a render function writes
/// there is visible to every later call on the same enhancer. Placeholder
/// tokens and the `context` map only live for one call.
pub struct Enhancer {
    options: EnhanceOptions,
    registry: Registry,
    store: Map,
    ids: Box<dyn FnMut() -> String>,
}

impl Enhancer {
    pub fn new(options: EnhanceOptions, registry: Registry) -> Self {
        Self {
            options,
            registry,
            store: Map::new(),
            ids: Box::new(default_id),
        }
    }

    /// Seed the store.
    pub fn with_store(mut self, store: Map) -> Self {
        self.store = store;
        self
    }

    /// Replace the generator of per-instance ids.
    pub fn with_id_generator(mut self, ids: impl FnMut() -> String + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn options(&self) -> &EnhanceOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &Map {
        &self.store
    }

    /// Expand the markup made of `segments` interleaved with `values`.
    ///
    /// ```
    /// use dumpling::{EnhanceOptions, Enhancer, Registry, Value};
    ///
    /// let mut registry = Registry::new();
    /// registry.define("my-count", |html, state| {
    ///     let n = state.attr("items").and_then(Value::as_list).map_or(0, |items| items.len());
    ///     Ok(html.render(&["<b>", "</b>"], [Value::from(n as u32)])?)
    /// });
    ///
    /// let mut enhancer = Enhancer::new(EnhanceOptions::new().body_content(), registry);
    /// let out = enhancer
    ///     .html(&["<my-count items=\"", "\"></my-count>"], [Value::list([Value::Null, Value::Null])])
    ///     .unwrap();
    /// assert_eq!(
    ///     out,
    ///     "<my-count items=\"\" enhanced=\"✨\"><template shadowrootmode=\"open\"><b>2</b></template></my-count>"
    /// );
    /// ```
    pub fn html(
        &mut self,
        segments: &[&str],
        values: impl IntoIterator<Item = Value>,
    ) -> Result<String, Error> {
        self.html_with(|markup| markup.render(segments, values))
    }

    /// Expand the markup `build` produces with the call's [`Markup`] builder.
    pub fn html_with<F>(&mut self, build: F) -> Result<String, Error>
    where
        F: FnOnce(&mut Markup<'_>) -> Result<String, Error>,
    {
        let mut bridge = ValueBridge::new();
        let markup = build(&mut Markup::new(&mut bridge))?;
        self.expand_markup(&markup, bridge)
    }

    /// Expand plain markup text.
    pub fn html_str(&mut self, markup: &str) -> Result<String, Error> {
        self.expand_markup(markup, ValueBridge::new())
    }

    fn expand_markup(&mut self, markup: &str, bridge: ValueBridge) -> Result<String, Error> {
        debug!("expanding {} bytes of markup", markup.len());
        let mut doc = parse(markup);
        let root = doc.root;
        Expander::new(
            &self.registry,
            &self.options,
            &mut self.store,
            &mut *self.ids,
            bridge,
        )
        .expand(&mut doc, root)?;

        let out = if self.options.body_content {
            match doc.body().and_then(|body| doc.children(body).next()) {
                Some(first) => serialize_node(&doc, first),
                None => String::new(),
            }
        } else {
            serialize_document(&doc)
        };
        Ok(strip_placeholders(&out))
    }
}

/// Seven random characters from `0-9a-z`.
pub fn default_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..7)
        .map(|_| char::from(ALPHABET[fastrand::usize(..ALPHABET.len())]))
        .collect()
}
