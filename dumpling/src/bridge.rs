//! Carrying non-text values through markup text.
//!
//! Render functions describe their output as markup text, yet the attributes
//! of a nested element may need to be lists, maps or callbacks. Encoding such a
//! value stores it and yields a placeholder token (`__b_0`, `__b_1`, ...) that
//! fits anywhere in markup. When the nested element's attributes are read, the
//! token is decoded back to the very same value.
//!
//! One bridge serves one top-level render call and is dropped with it.

use crate::Value;
use crate::trace;

/// Prefix shared by every placeholder token.
pub const PLACEHOLDER_PREFIX: &str = "__b_";

#[derive(Debug, Default)]
pub struct ValueBridge {
    /// Token `__b_<n>` maps to `values[n]`.
    values: Vec<Value>,
}

impl ValueBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup text for `value`: strings and numbers as they are, anything else
    /// as a freshly minted placeholder token.
    pub fn encode(&mut self, value: Value) -> String {
        if let Some(text) = value.to_markup() {
            return text;
        }

        let token = format!("{PLACEHOLDER_PREFIX}{}", self.values.len());
        trace!("minted placeholder {} for {:?}", token, value);
        self.values.push(value);
        token
    }

    /// The value behind a placeholder token, or `text` itself as a string value.
    ///
    /// Text that only looks like a token (right prefix, but no value was
    /// stored under it by this bridge) comes back unchanged.
    pub fn decode(&self, text: &str) -> Value {
        match self.lookup(text) {
            Some(value) => value.clone(),
            None => Value::String(text.to_string()),
        }
    }

    fn lookup(&self, text: &str) -> Option<&Value> {
        let index = text.strip_prefix(PLACEHOLDER_PREFIX)?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.values.get(index.parse::<usize>().ok()?)
    }

    /// Number of values stored so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Remove every placeholder token (`__b_` followed by digits) from `text`.
///
/// Tokens still present after serialization were interpolated into places
/// that never got decoded, such as text content.
pub fn strip_placeholders(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(PLACEHOLDER_PREFIX) {
        let after = &rest[pos + PLACEHOLDER_PREFIX.len()..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            // Not a token; a real one may still start inside this prefix
            out.push_str(&rest[..=pos]);
            rest = &rest[pos + 1..];
        } else {
            out.push_str(&rest[..pos]);
            rest = &after[digits..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_and_numbers_pass_through() {
        let mut bridge = ValueBridge::new();
        assert_eq!(bridge.encode(Value::from("hello")), "hello");
        assert_eq!(bridge.encode(Value::from(42)), "42");
        assert_eq!(bridge.encode(Value::from(0.25)), "0.25");
        assert!(bridge.is_empty());
    }

    #[test]
    fn test_other_values_get_increasing_tokens() {
        let mut bridge = ValueBridge::new();
        assert_eq!(bridge.encode(Value::list([])), "__b_0");
        assert_eq!(bridge.encode(Value::from(true)), "__b_1");
        assert_eq!(bridge.encode(Value::Null), "__b_2");
        assert_eq!(bridge.len(), 3);
    }

    #[test]
    fn test_decode_returns_the_same_value() {
        let mut bridge = ValueBridge::new();
        let items = Value::list([Value::from("a"), Value::from("b")]);
        let callback = Value::function(|_| Value::Null);

        let items_token = bridge.encode(items.clone());
        let callback_token = bridge.encode(callback.clone());

        assert!(bridge.decode(&items_token).same(&items));
        assert!(bridge.decode(&callback_token).same(&callback));
        assert_eq!(bridge.decode("__b_1").call(&[]).map(|v| v.same(&Value::Null)), Some(true));
    }

    #[test]
    fn test_decode_plain_text() {
        let bridge = ValueBridge::new();
        assert_eq!(bridge.decode("plain").as_str(), Some("plain"));
        assert_eq!(bridge.decode("").as_str(), Some(""));
    }

    #[test]
    fn test_decode_unknown_tokens_pass_through() {
        let mut bridge = ValueBridge::new();
        bridge.encode(Value::from(false));

        assert_eq!(bridge.decode("__b_7").as_str(), Some("__b_7"));
        assert_eq!(bridge.decode("__b_").as_str(), Some("__b_"));
        assert_eq!(bridge.decode("__b_0x").as_str(), Some("__b_0x"));
        assert_eq!(bridge.decode("__b_+0").as_str(), Some("__b_+0"));
        assert_eq!(bridge.decode("__b_0").as_bool(), Some(false));
    }

    #[test]
    fn test_bridges_do_not_share_tokens() {
        let mut first = ValueBridge::new();
        let second = ValueBridge::new();
        let token = first.encode(Value::from(true));
        assert_eq!(second.decode(&token).as_str(), Some(token.as_str()));
    }

    #[test]
    fn test_strip_placeholders() {
        assert_eq!(strip_placeholders("<p>__b_0</p>"), "<p></p>");
        assert_eq!(strip_placeholders("a__b_12b__b_3"), "ab");
        assert_eq!(strip_placeholders("no tokens"), "no tokens");
        assert_eq!(strip_placeholders("__b_ alone"), "__b_ alone");
        assert_eq!(strip_placeholders("__b__b_1"), "__b");
        assert_eq!(strip_placeholders("✨__b_4✨"), "✨✨");
    }
}
