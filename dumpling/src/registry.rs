//! Custom element definitions.

use indexmap::IndexMap;
use std::fmt;

use crate::debug;
use crate::render::{Render, RenderResult, RenderState};
use crate::Markup;

enum Entry {
    Render(Box<dyn Render>),
    /// Known tag whose render function has not been supplied.
    Unresolved,
}

/// Maps custom element tag names to their render functions.
///
/// ```
/// use dumpling::{Registry, Value};
///
/// let mut registry = Registry::new();
/// registry.define("my-greeting", |html, state| {
///     let name = state.attr("name").cloned().unwrap_or(Value::from("world"));
///     Ok(html.render(&["<p>Hello, ", "!</p>"], [name])?)
/// });
/// assert!(registry.contains("my-greeting"));
/// ```
#[derive(Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `tag` with a render closure. Replaces any earlier definition.
    pub fn define<F>(&mut self, tag: impl Into<String>, render: F) -> &mut Self
    where
        F: Fn(&mut Markup<'_>, &mut RenderState<'_>) -> RenderResult + 'static,
    {
        self.register(tag, render)
    }

    /// Define `tag` with any [`Render`] implementation.
    pub fn register(&mut self, tag: impl Into<String>, render: impl Render + 'static) -> &mut Self {
        let tag = tag.into();
        debug!("defining <{}>", tag);
        self.entries.insert(tag, Entry::Render(Box::new(render)));
        self
    }

    /// Register `tag` without a render function.
    ///
    /// Expanding such an element fails with [`Error::MissingRender`](crate::Error::MissingRender).
    pub fn declare(&mut self, tag: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        debug!("declaring <{}> without a render function", tag);
        self.entries.insert(tag, Entry::Unresolved);
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Outer `None`: unknown tag. Inner `None`: declared without a render function.
    pub(crate) fn lookup(&self, tag: &str) -> Option<Option<&dyn Render>> {
        self.entries.get(tag).map(|entry| match entry {
            Entry::Render(render) => Some(render.as_ref()),
            Entry::Unresolved => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tag names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut registry = Registry::new();
        registry
            .define("my-a", |_, _| Ok("<p>a</p>".to_string()))
            .declare("my-b");

        assert_eq!(registry.len(), 2);
        assert!(matches!(registry.lookup("my-a"), Some(Some(_))));
        assert!(matches!(registry.lookup("my-b"), Some(None)));
        assert!(registry.lookup("my-c").is_none());
        assert!(!registry.contains("my-c"));
    }

    #[test]
    fn test_redefining_keeps_position() {
        let mut registry = Registry::new();
        registry.declare("my-a").declare("my-b");
        registry.define("my-a", |_, _| Ok(String::new()));

        assert_eq!(registry.names().collect::<Vec<_>>(), ["my-a", "my-b"]);
        assert!(matches!(registry.lookup("my-a"), Some(Some(_))));
        assert_eq!(format!("{registry:?}"), r#"{"my-a", "my-b"}"#);
    }
}
