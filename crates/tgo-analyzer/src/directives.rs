//! Hand-written line directives.
//!
//! The transpiler emits its own `//line` and `/*line*/` comments; one already
//! present in the input would corrupt the position mapping.

use source_map::SourceFile;
use tgo_parser::File;

use crate::{AnalyzeError, AnalyzeErrorKind};

pub fn check(file: &File, source: &SourceFile) -> Vec<AnalyzeError> {
    file.comments
        .iter()
        .filter(|comment| comment.body().starts_with("line"))
        .map(|comment| {
            AnalyzeError::new(
                AnalyzeErrorKind::Directive,
                "line directive is not allowed inside of the tgo file",
                source,
                comment.span,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::test_utils::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_directive_forms() {
        let src = "package a\n\n//line a.go:1\nvar a = 1 /*line b.go:2:3*/\n\n// line spaced\n//lines\n";
        assert_eq!(
            run(src),
            vec![
                "test.tgo:3:1: line directive is not allowed inside of the tgo file",
                "test.tgo:4:11: line directive is not allowed inside of the tgo file",
                "test.tgo:7:1: line directive is not allowed inside of the tgo file",
            ]
        );
    }
}
