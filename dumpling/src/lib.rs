//! Server-side expansion of custom elements into declarative shadow DOM.
//!
//! dumpling provides:
//! - **Expansion**: every registered custom element gets its render output,
//!   itself fully expanded, as a `<template shadowrootmode="open">` first child
//! - **Value bridge**: lists, maps and callbacks survive being written into
//!   markup attributes and arrive intact at nested render functions
//! - **Arena DOM**: browser-compatible HTML5 parsing via html5ever, plus HTML5-correct serialization
//!
//! # Example
//!
//! ```rust
//! use dumpling::{EnhanceOptions, Enhancer, Registry};
//!
//! let mut registry = Registry::new();
//! registry.define("my-article", |_html, _state| {
//!     Ok("<article><slot name=\"content\"><p>fallback</p></slot></article>".to_string())
//! });
//!
//! let mut enhancer = Enhancer::new(EnhanceOptions::new().body_content(), registry);
//! let out = enhancer
//!     .html_str("<my-article><p slot=\"content\">real</p></my-article>")
//!     .unwrap();
//!
//! assert_eq!(
//!     out,
//!     "<my-article enhanced=\"✨\"><template shadowrootmode=\"open\"><article><slot name=\"content\"><p>fallback</p></slot></article></template><p slot=\"content\">real</p></my-article>"
//! );
//! ```

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

mod bridge;
pub mod dom;
mod enhance;
mod error;
mod expand;
mod markup;
mod name;
mod registry;
mod render;
pub mod serialize;
pub mod walk;
mod value;

pub use bridge::{PLACEHOLDER_PREFIX, ValueBridge, strip_placeholders};
pub use dom::{Document, parse};
pub use enhance::{EnhanceOptions, Enhancer, Stylesheet, default_id};
pub use error::Error;
pub use expand::ENHANCED_MARKER;
pub use markup::{Markup, Template};
pub use name::is_custom_element;
pub use registry::Registry;
pub use render::{BoxError, Render, RenderResult, RenderState};
pub use serialize::{serialize_document, serialize_node};
pub use value::{Function, Map, Value};
pub use walk::{Visit, try_walk, walk};
