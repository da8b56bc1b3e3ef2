//! Utility functions for XML reading and writing.
//!
//! Name checks follow the XML 1.0 `Name` production, restricted to what a
//! namespace-unaware document needs.

/// Checks if a string is a legal XML element or attribute name.
///
/// The first character must be a letter, `_` or `:`; the rest may also
/// contain digits, `-`, `.` and the middle dot.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    c == '_' || c == ':' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || c.is_numeric() || matches!(c, '-' | '.' | '\u{B7}')
}

/// Checks if an attribute name is a namespace declaration.
pub fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

/// Checks if character data contains nothing but XML whitespace.
pub fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|c| matches!(c, ' ' | '\n' | '\r' | '\t'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("root"));
        assert!(is_valid_name("_text"));
        assert!(is_valid_name("item-2.b"));
        assert!(is_valid_name("ns:item"));
        assert!(is_valid_name("größe"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1item"));
        assert!(!is_valid_name("-item"));
        assert!(!is_valid_name("has space"));
        assert!(!is_valid_name("a<b"));
    }

    #[test]
    fn test_is_namespace_declaration() {
        assert!(is_namespace_declaration("xmlns"));
        assert!(is_namespace_declaration("xmlns:xhtml"));
        assert!(!is_namespace_declaration("xmlnsfoo"));
        assert!(!is_namespace_declaration("id"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \n\t  "));
        assert!(!is_blank(" hi "));
    }
}
