use regex::Regex;
use std::sync::LazyLock;

/// A custom field reference up to the colon ending its name, e.g.
/// `custom_fields\/Colour name:`. Field names may contain spaces.
///
/// The whitespace class is ASCII only and a reference never spans a line
/// terminator (`\r`, `\n`, U+0085, U+2028, U+2029).
static CUSTOM_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"custom_fields[A-Za-z\\/]*?(?-u:\s)[^\r\n\x{85}\x{2028}\x{2029}]*?:")
        .expect("custom field pattern compiles")
});

/// Escapes raw query text for the engine's query-string grammar.
///
/// Slashes are escaped first; the custom field pattern expects them that way.
pub fn normalize(raw: &str) -> String {
    escape_custom_fields(&escape_slashes(raw))
}

pub fn escape_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if c == '/' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes every space inside custom field references, leaving the rest alone.
pub fn escape_custom_fields(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    let mut last_match_end = 0;

    for m in CUSTOM_FIELD.find_iter(s) {
        output.push_str(&s[last_match_end..m.start()]);
        output.push_str(&m.as_str().replace(' ', "\\ "));
        last_match_end = m.end();
    }

    output.push_str(&s[last_match_end..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slashes_get_one_backslash_each() {
        assert_eq!(escape_slashes("path:/a/b"), r"path:\/a\/b");
        assert_eq!(escape_slashes("no slashes here"), "no slashes here");
        assert_eq!(escape_slashes(""), "");
    }

    #[test]
    fn custom_field_spaces_are_escaped_inside_the_match_only() {
        assert_eq!(
            normalize("custom_fields/Colour name:blue AND title:x y"),
            r"custom_fields\/Colour\ name:blue AND title:x y"
        );
    }

    #[test]
    fn every_custom_field_reference_is_rewritten() {
        let raw = "custom_fields/a b:x OR custom_fields/c d e:y";
        assert_eq!(normalize(raw), r"custom_fields\/a\ b:x OR custom_fields\/c\ d\ e:y");
    }

    #[test]
    fn references_stop_at_line_terminators_and_non_ascii_space() {
        assert_eq!(normalize("custom_fields/a b\rc:x"), "custom_fields\\/a b\rc:x");
        assert_eq!(normalize("custom_fields/a b\u{2028}c:x"), "custom_fields\\/a b\u{2028}c:x");
        assert_eq!(normalize("custom_fields/a\u{a0}b:x"), "custom_fields\\/a\u{a0}b:x");
        assert_eq!(normalize("custom_fields/a\tb c:x"), "custom_fields\\/a\tb\\ c:x");
    }

    #[test]
    fn input_without_custom_fields_passes_through() {
        assert_eq!(escape_custom_fields("title:hello world"), "title:hello world");
        assert_eq!(escape_custom_fields("custom_fields"), "custom_fields");
        assert_eq!(escape_custom_fields("custom_fields no colon"), "custom_fields no colon");
    }
}
