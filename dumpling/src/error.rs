use crate::render::BoxError;

/// Errors returned while expanding custom elements.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A custom element was declared but never given a render function.
    #[error("could not find the template function for {tag}")]
    MissingRender { tag: String },

    /// A render function failed.
    #[error("rendering <{tag}> failed: {source}")]
    Render {
        tag: String,
        #[source]
        source: BoxError,
    },

    /// Markup was given a value count that does not fit its segments.
    #[error("{values} values do not fit between {segments} markup segments")]
    Interpolation { segments: usize, values: usize },

    /// Custom elements nested deeper than the configured limit.
    #[error("custom elements nested more than {limit} deep at <{tag}>")]
    TooDeep { tag: String, limit: usize },
}
