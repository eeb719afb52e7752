//! Building markup text from literal segments and interpolated values.

use crate::bridge::ValueBridge;
use crate::{Error, Value};

/// Markup builder handed to render functions.
///
/// Interpolated values go through the render call's [`ValueBridge`], so a
/// list or callback written into an attribute arrives intact at the nested
/// element that reads it.
pub struct Markup<'b> {
    bridge: &'b mut ValueBridge,
}

impl<'b> Markup<'b> {
    pub fn new(bridge: &'b mut ValueBridge) -> Self {
        Self { bridge }
    }

    /// Text for one interpolated value.
    pub fn encode(&mut self, value: impl Into<Value>) -> String {
        self.bridge.encode(value.into())
    }

    /// Interleave `segments` with `values`:
    /// `segments[0] + values[0] + segments[1] + ... + segments[n]`.
    ///
    /// There must be exactly one value fewer than segments.
    ///
    /// ```
    /// use dumpling::{Markup, Value, ValueBridge};
    ///
    /// let mut bridge = ValueBridge::new();
    /// let mut html = Markup::new(&mut bridge);
    /// let out = html
    ///     .render(&["<todo-list items=\"", "\" count=\"", "\"></todo-list>"], [
    ///         Value::list([Value::from("milk")]),
    ///         Value::from(1),
    ///     ])
    ///     .unwrap();
    /// assert_eq!(out, "<todo-list items=\"__b_0\" count=\"1\"></todo-list>");
    /// ```
    pub fn render(
        &mut self,
        segments: &[&str],
        values: impl IntoIterator<Item = Value>,
    ) -> Result<String, Error> {
        let values: Vec<Value> = values.into_iter().collect();
        if segments.len() != values.len() + 1 {
            return Err(Error::Interpolation {
                segments: segments.len(),
                values: values.len(),
            });
        }

        let mut out = String::from(segments[0]);
        for (value, segment) in values.into_iter().zip(&segments[1..]) {
            out.push_str(&self.bridge.encode(value));
            out.push_str(segment);
        }
        Ok(out)
    }

    /// Start a fluent builder that alternates text and values freely.
    pub fn template(&mut self) -> Template<'_, 'b> {
        Template {
            markup: self,
            out: String::new(),
        }
    }
}

/// Fluent form of [`Markup::render`].
///
/// ```
/// use dumpling::{Markup, Value, ValueBridge};
///
/// let mut bridge = ValueBridge::new();
/// let mut html = Markup::new(&mut bridge);
/// let out = html
///     .template()
///     .text("<user-card name=\"")
///     .value("Ada")
///     .text("\" on-select=\"")
///     .value(Value::function(|_| Value::Null))
///     .text("\"></user-card>")
///     .finish();
/// assert_eq!(out, "<user-card name=\"Ada\" on-select=\"__b_0\"></user-card>");
/// ```
pub struct Template<'m, 'b> {
    markup: &'m mut Markup<'b>,
    out: String,
}

impl Template<'_, '_> {
    pub fn text(mut self, text: &str) -> Self {
        self.out.push_str(text);
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        let encoded = self.markup.encode(value);
        self.out.push_str(&encoded);
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}
