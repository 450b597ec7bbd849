//! Text helpers for generated writes.

/// First line of every generated file; a blank line and a `//line`
/// directive for the start of the source follow it.
pub const GENERATED_HEADER: &str = "// Code generated by tgo DO NOT EDIT.\n";

/// Render a static fragment so it can sit inside a Go raw string literal.
///
/// `decoded` is the fragment's value, `quoted` an interpreted Go string
/// literal with the same value. A fragment a raw literal cannot hold is
/// spliced in as a concatenation with the quoted form: a backtick, a
/// character Go rejects or drops in source text (NUL, carriage return, a
/// byte order mark), or bytes that are not valid UTF-8.
pub fn raw_fragment(decoded: Option<&str>, quoted: &str) -> String {
    match decoded {
        Some(text) if !text.contains(['`', '\r', '\0', '\u{feff}']) => text.to_string(),
        _ => format!("`+{quoted}+`"),
    }
}

/// The head of a static write, up to where its text starts.
pub fn static_write_head(ctx: &str) -> String {
    format!("if err := {ctx}.WriteString(`")
}

/// The head of a dynamic write, up to where the expression starts.
pub fn dynamic_write_head(runtime: &str, ctx: &str) -> String {
    format!("if err := {runtime}.DynamicWrite({ctx},")
}

/// Error check closing a generated write, `indent` starting with `\n`.
pub fn write_tail(close: &str, indent: &str) -> String {
    format!("{close}; err != nil {{{indent}\treturn err{indent}}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_fragment() {
        assert_eq!(raw_fragment(Some("<p>"), "\"<p>\""), "<p>");
        assert_eq!(raw_fragment(Some("a`b"), "\"a`b\""), "`+\"a`b\"+`");
        assert_eq!(raw_fragment(None, "\"\\xff\""), "`+\"\\xff\"+`");
        assert_eq!(
            raw_fragment(Some("a\0b\rc"), "\"a\\x00b\\rc\""),
            "`+\"a\\x00b\\rc\"+`"
        );
        assert_eq!(raw_fragment(Some("\u{feff}x"), "\"\\ufeffx\""), "`+\"\\ufeffx\"+`");
        assert_eq!(raw_fragment(Some("a\nb\tc"), "\"a\\nb\\tc\""), "a\nb\tc");
    }

    #[test]
    fn test_write_pieces() {
        let code = format!(
            "{}hi{}",
            static_write_head("ctx"),
            write_tail("`)", "\n\t")
        );
        assert_eq!(
            code,
            "if err := ctx.WriteString(`hi`); err != nil {\n\t\treturn err\n\t}"
        );
        assert_eq!(
            dynamic_write_head("tgo", "ctx"),
            "if err := tgo.DynamicWrite(ctx,"
        );
    }
}
