//! The render capability of a custom element.

use crate::{Map, Markup, Value};

/// Error type render functions may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a render function returns: the element's shadow markup.
pub type RenderResult = Result<String, BoxError>;

/// Produces the shadow markup of one custom element instance.
///
/// Closures with the right signature implement this trait, and so can any
/// type that carries its own configuration:
///
/// ```
/// use dumpling::{Markup, Render, RenderResult, RenderState, Value};
///
/// struct Greeting {
///     punctuation: &'static str,
/// }
///
/// impl Render for Greeting {
///     fn render(&self, html: &mut Markup<'_>, state: &mut RenderState<'_>) -> RenderResult {
///         let name = state.attr_str("name").unwrap_or("stranger").to_string();
///         Ok(html.render(&["<p>Hello, ", "", "</p>"], [Value::from(name), Value::from(self.punctuation)])?)
///     }
/// }
/// ```
pub trait Render {
    fn render(&self, html: &mut Markup<'_>, state: &mut RenderState<'_>) -> RenderResult;
}

impl<F> Render for F
where
    F: Fn(&mut Markup<'_>, &mut RenderState<'_>) -> RenderResult,
{
    fn render(&self, html: &mut Markup<'_>, state: &mut RenderState<'_>) -> RenderResult {
        self(html, state)
    }
}

/// Input of one render function invocation.
#[derive(Debug)]
pub struct RenderState<'a> {
    /// The element's attributes, with placeholder tokens decoded.
    pub attrs: Map,

    /// Scratch space shared by every element expanded during one top-level call.
    pub context: &'a mut Map,

    /// Fresh identifier for this element instance.
    pub instance_id: String,

    /// Long-lived store shared by every call made through one enhancer.
    pub store: &'a mut Map,
}

impl RenderState<'_> {
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// An attribute that holds plain text.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }
}
