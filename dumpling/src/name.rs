//! Valid custom element names.
//!
//! A name is eligible for expansion when it is a valid custom element name:
//! a lowercase ASCII letter, then name characters, with at least one hyphen,
//! and not one of the hyphenated names the HTML, SVG and MathML specs reserve.

/// Hyphenated names that are never custom elements.
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Characters allowed after the first letter of a custom element name
/// (`PotentialCustomElementName`), hyphen excluded.
fn is_name_char(c: char) -> bool {
    matches!(c,
        '.' | '0'..='9' | '_' | 'a'..='z'
        | '\u{B7}'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{203F}'..='\u{2040}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns true if `tag` is a valid, non-reserved custom element name.
///
/// ```
/// use dumpling::is_custom_element;
///
/// assert!(is_custom_element("my-article"));
/// assert!(!is_custom_element("font-face"));
/// assert!(!is_custom_element("Article"));
/// ```
pub fn is_custom_element(tag: &str) -> bool {
    let mut chars = tag.chars();
    if !matches!(chars.next(), Some('a'..='z')) {
        return false;
    }

    let mut has_hyphen = false;
    for c in chars {
        if c == '-' {
            has_hyphen = true;
        } else if !is_name_char(c) {
            return false;
        }
    }

    has_hyphen && !RESERVED_NAMES.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_names() {
        assert!(is_custom_element("my-article"));
        assert!(is_custom_element("a-b"));
        assert!(is_custom_element("x-"));
        assert!(is_custom_element("my-very-long-element-name"));
        assert!(is_custom_element("el.v2-item_3"));
    }

    #[test]
    fn test_requires_hyphen() {
        assert!(!is_custom_element("article"));
        assert!(!is_custom_element("div"));
        assert!(!is_custom_element(""));
    }

    #[test]
    fn test_first_character_must_be_lowercase_ascii() {
        assert!(!is_custom_element("Article"));
        assert!(!is_custom_element("My-article"));
        assert!(!is_custom_element("1-up"));
        assert!(!is_custom_element("-foo"));
        assert!(!is_custom_element("é-foo"));
    }

    #[test]
    fn test_rejects_characters_outside_the_grammar() {
        assert!(!is_custom_element("my-Article"));
        assert!(!is_custom_element("my-art icle"));
        assert!(!is_custom_element("my-art:icle"));
        assert!(!is_custom_element("my\u{D7}-tag"));
    }

    #[test]
    fn test_unicode_name_characters() {
        assert!(is_custom_element("math-α"));
        assert!(is_custom_element("emotion-😍"));
        assert!(is_custom_element("x-\u{B7}"));
        assert!(!is_custom_element("日-本"));
        assert!(is_custom_element("a日-本"));
    }

    #[test]
    fn test_reserved_names() {
        for name in RESERVED_NAMES {
            assert!(!is_custom_element(name), "{name} should be reserved");
        }
        assert!(is_custom_element("font-faces"));
    }
}
